use super::{new_client, BalanceSource, SourceError, TokenBalance};
use ethabi::ethereum_types::U256;
use std::time::Duration;

/// Explorer-style token balance lookup
/// (`module=account&action=tokenbalance`). The explorer reports raw
/// integer amounts, so the token precision comes from configuration.
pub struct Source {
    host: url::Url,
    api_key: String,
    token_contract: String,
    token_decimals: u32,
    client: reqwest::Client,
}

impl Source {
    pub fn new(
        host: url::Url,
        api_key: String,
        token_contract: String,
        token_decimals: u32,
        timeout: Duration,
    ) -> Source {
        Source {
            host,
            api_key,
            token_contract,
            token_decimals,
            client: new_client(timeout),
        }
    }
}

#[async_trait::async_trait]
impl BalanceSource for Source {
    async fn token_balance(&self, address: &str) -> Result<TokenBalance, SourceError> {
        let response = self
            .client
            .get(self.host.join("/api").unwrap())
            .query(&[
                ("module", "account"),
                ("action", "tokenbalance"),
                ("contractaddress", self.token_contract.as_str()),
                ("address", address),
                ("tag", "latest"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SourceError::Upstream(format!(
                "invalid status code got as a result: {}",
                response.status()
            )));
        }
        let resp: json::BalanceResponse = response.json().await?;
        if resp.status != "1" {
            return Err(SourceError::Upstream(format!(
                "{}: {}",
                resp.message, resp.result
            )));
        }
        let raw = U256::from_dec_str(resp.result.trim()).map_err(|e| {
            SourceError::Upstream(format!("malformed balance {:?}: {}", resp.result, e))
        })?;
        Ok(TokenBalance {
            raw,
            decimals: self.token_decimals,
        })
    }

    fn host(&self) -> String {
        self.host.to_string()
    }
}

mod json {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct BalanceResponse {
        pub status: String,
        pub message: String,
        pub result: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use pretty_assertions::assert_eq;

    fn source(server: &MockServer) -> Source {
        Source::new(
            server.base_url().parse().unwrap(),
            "KEY".to_string(),
            "0x4206931337dc273a630d328da6441786bfad668f".to_string(),
            18,
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn parses_balance() {
        let server = MockServer::start();
        let handle = server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path("/api")
                .query_param("module", "account")
                .query_param("action", "tokenbalance")
                .query_param("address", "0x00000000000000000000000000000000000000aa")
                .query_param("apikey", "KEY");
            then.status(200).json_body(serde_json::json!({
                "status": "1",
                "message": "OK",
                "result": "1500000000000000000"
            }));
        });

        let balance = source(&server)
            .token_balance("0x00000000000000000000000000000000000000aa")
            .await
            .expect("balance lookup failed");
        handle.assert();
        assert_eq!(
            balance,
            TokenBalance {
                raw: U256::from_dec_str("1500000000000000000").unwrap(),
                decimals: 18
            }
        );
    }

    #[tokio::test]
    async fn explorer_rejection_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/api");
            then.status(200).json_body(serde_json::json!({
                "status": "0",
                "message": "NOTOK",
                "result": "Max rate limit reached"
            }));
        });

        let result = source(&server)
            .token_balance("0x00000000000000000000000000000000000000aa")
            .await;
        assert!(matches!(result, Err(SourceError::Upstream(_))));
    }

    #[tokio::test]
    async fn http_failure_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/api");
            then.status(502);
        });

        let result = source(&server)
            .token_balance("0x00000000000000000000000000000000000000aa")
            .await;
        assert!(matches!(result, Err(SourceError::Upstream(_))));
    }
}
