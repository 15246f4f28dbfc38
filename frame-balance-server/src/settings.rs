use config::{Config, File};
use serde::{de::IgnoredAny, Deserialize};
use serde_with::serde_as;
use std::{net::SocketAddr, str::FromStr, time::Duration};
use url::Url;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub server: ServerSettings,
    pub sources: SourcesSettings,
    pub token: TokenSettings,

    // Is required as we deny unknown fields, but allow users provide
    // path to config through PREFIX__CONFIG env variable. If removed,
    // the setup would fail with `unknown field `config`, expected one of...`
    #[serde(rename = "config")]
    pub config_path: IgnoredAny,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from_str("0.0.0.0:8050").expect("valid addr"),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesSettings {
    pub balance_mode: BalanceMode,
    pub etherscan: EtherscanSettings,
    pub rpc: RpcSettings,
    pub neynar: NeynarSettings,
    pub coingecko: CoingeckoSettings,

    /// Per-call bound for every outbound request. On expiry the call is
    /// abandoned and its fallback value is used; no retries.
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub request_timeout: Duration,
}

impl Default for SourcesSettings {
    fn default() -> Self {
        Self {
            balance_mode: BalanceMode::Explorer,
            etherscan: Default::default(),
            rpc: Default::default(),
            neynar: Default::default(),
            coingecko: Default::default(),
            request_timeout: frame_balance::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceMode {
    /// Explorer-style balance-by-address query.
    Explorer,
    /// Direct `balanceOf`/`decimals` contract read over JSON-RPC.
    Contract,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EtherscanSettings {
    pub url: Url,
    pub api_key: String,
    pub token_contract: String,
    pub token_decimals: u32,
}

impl Default for EtherscanSettings {
    fn default() -> Self {
        Self {
            url: Url::parse("https://api.etherscan.io/").expect("valid url"),
            api_key: String::new(),
            token_contract: String::new(),
            token_decimals: 18,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RpcSettings {
    pub url: Url,
    pub token_contract: String,
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            url: Url::parse("https://cloudflare-eth.com/").expect("valid url"),
            token_contract: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NeynarSettings {
    pub url: Url,
    pub api_key: String,
}

impl Default for NeynarSettings {
    fn default() -> Self {
        Self {
            url: Url::parse("https://api.neynar.com/").expect("valid url"),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoingeckoSettings {
    pub url: Url,
    pub token_id: String,
}

impl Default for CoingeckoSettings {
    fn default() -> Self {
        Self {
            url: Url::parse("https://api.coingecko.com/").expect("valid url"),
            token_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenSettings {
    pub symbol: String,
    pub explorer_base_url: Url,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            symbol: "TOKEN".to_string(),
            explorer_base_url: Url::parse("https://etherscan.io/").expect("valid url"),
        }
    }
}

impl Settings {
    pub fn new() -> anyhow::Result<Self> {
        let config_path = std::env::var("FRAME_BALANCE__CONFIG");

        let mut builder = Config::builder();
        if let Ok(config_path) = config_path {
            builder = builder.add_source(File::with_name(&config_path));
        };
        // Use `__` so that it would be possible to address keys with underscores in names (e.g. `api_key`)
        builder =
            builder.add_source(config::Environment::with_prefix("FRAME_BALANCE").separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    /// Required keys must be present before the handler may run; there
    /// are no inlined fallback secrets.
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.sources.balance_mode {
            BalanceMode::Explorer => {
                anyhow::ensure!(
                    !self.sources.etherscan.api_key.is_empty(),
                    "sources.etherscan.api_key is required in explorer mode"
                );
                anyhow::ensure!(
                    !self.sources.etherscan.token_contract.is_empty(),
                    "sources.etherscan.token_contract is required in explorer mode"
                );
            }
            BalanceMode::Contract => {
                anyhow::ensure!(
                    !self.sources.rpc.token_contract.is_empty(),
                    "sources.rpc.token_contract is required in contract mode"
                );
            }
        }
        anyhow::ensure!(
            !self.sources.neynar.api_key.is_empty(),
            "sources.neynar.api_key is required"
        );
        anyhow::ensure!(
            !self.sources.coingecko.token_id.is_empty(),
            "sources.coingecko.token_id is required"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.sources.etherscan.api_key = "KEY".to_string();
        settings.sources.etherscan.token_contract = "0x00".to_string();
        settings.sources.neynar.api_key = "KEY".to_string();
        settings.sources.coingecko.token_id = "degen".to_string();
        settings
    }

    #[test]
    fn defaults_are_rejected_without_secrets() {
        assert!(Settings::default().validate().is_err());
    }

    #[test]
    fn explorer_mode_requires_explorer_keys() {
        let mut settings = valid_settings();
        settings.sources.etherscan.api_key.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn contract_mode_ignores_explorer_keys() {
        let mut settings = valid_settings();
        settings.sources.balance_mode = BalanceMode::Contract;
        settings.sources.etherscan.api_key.clear();
        settings.sources.rpc.token_contract = "0x00".to_string();
        settings.validate().expect("contract mode should validate");
    }
}
