use super::{new_client, BalanceSource, SourceError, TokenBalance};
use ethabi::{
    ethereum_types::{H160, U256},
    ParamType, Token,
};
use std::{str::FromStr, time::Duration};

/// Contract-level balance read over JSON-RPC: `eth_call` of
/// `balanceOf(address)` followed by `decimals()`.
pub struct Source {
    host: url::Url,
    token_contract: String,
    client: reqwest::Client,
}

impl Source {
    pub fn new(host: url::Url, token_contract: String, timeout: Duration) -> Source {
        Source {
            host,
            token_contract,
            client: new_client(timeout),
        }
    }

    async fn eth_call(&self, data: String) -> Result<Vec<u8>, SourceError> {
        let response = self
            .client
            .post(self.host.clone())
            .json(&json::RpcRequest {
                jsonrpc: "2.0",
                id: 1,
                method: "eth_call",
                params: serde_json::json!([
                    { "to": self.token_contract, "data": data },
                    "latest"
                ]),
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SourceError::Upstream(format!(
                "invalid status code got as a result: {}",
                response.status()
            )));
        }
        let resp: json::RpcResponse = response.json().await?;
        if let Some(error) = resp.error {
            return Err(SourceError::Upstream(format!(
                "rpc error {}: {}",
                error.code, error.message
            )));
        }
        let result = resp.result.ok_or_else(|| {
            SourceError::Upstream("rpc response carries neither result nor error".to_string())
        })?;
        hex::decode(result.strip_prefix("0x").unwrap_or(&result))
            .map_err(|e| SourceError::Upstream(format!("malformed call result: {e}")))
    }
}

fn parse_address(address: &str) -> Result<H160, SourceError> {
    H160::from_str(address.strip_prefix("0x").unwrap_or(address))
        .map_err(|e| SourceError::Upstream(format!("malformed address {address:?}: {e}")))
}

fn balance_of_calldata(holder: H160) -> String {
    let selector = ethabi::short_signature("balanceOf", &[ParamType::Address]);
    let args = ethabi::encode(&[Token::Address(holder)]);
    format!("0x{}{}", hex::encode(selector), hex::encode(args))
}

fn decimals_calldata() -> String {
    format!(
        "0x{}",
        hex::encode(ethabi::short_signature("decimals", &[]))
    )
}

fn decode_uint(bytes: &[u8]) -> Result<U256, SourceError> {
    let tokens = ethabi::decode(&[ParamType::Uint(256)], bytes)
        .map_err(|e| SourceError::Upstream(format!("abi decode failed: {e}")))?;
    match tokens.first() {
        Some(Token::Uint(value)) => Ok(*value),
        _ => Err(SourceError::Upstream(
            "expected a single uint in call result".to_string(),
        )),
    }
}

#[async_trait::async_trait]
impl BalanceSource for Source {
    async fn token_balance(&self, address: &str) -> Result<TokenBalance, SourceError> {
        let holder = parse_address(address)?;
        let raw = decode_uint(&self.eth_call(balance_of_calldata(holder)).await?)?;
        let decimals = decode_uint(&self.eth_call(decimals_calldata()).await?)?;
        if decimals > U256::from(255u64) {
            return Err(SourceError::Upstream(format!(
                "unreasonable token decimals: {decimals}"
            )));
        }
        Ok(TokenBalance {
            raw,
            decimals: decimals.low_u32(),
        })
    }

    fn host(&self) -> String {
        self.host.to_string()
    }
}

mod json {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize)]
    pub struct RpcRequest {
        pub jsonrpc: &'static str,
        pub id: u32,
        pub method: &'static str,
        pub params: serde_json::Value,
    }

    #[derive(Debug, Deserialize)]
    pub struct RpcResponse {
        pub result: Option<String>,
        pub error: Option<RpcError>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RpcError {
        pub code: i64,
        pub message: String,
    }
}
