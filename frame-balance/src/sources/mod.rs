pub mod coingecko;
pub mod etherscan;
pub mod neynar;
pub mod rpc;

use async_trait::async_trait;
use ethabi::ethereum_types::U256;
use mockall::automock;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request timed out")]
    Timeout,
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            SourceError::Timeout
        } else {
            SourceError::Upstream(error.to_string())
        }
    }
}

/// Raw token amount together with the precision needed to display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBalance {
    pub raw: U256,
    pub decimals: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[automock]
#[async_trait]
pub trait AddressSource {
    // Addresses are returned in priority descending order (first - authoritative)
    async fn linked_addresses(&self, fid: u64) -> Result<Vec<String>, SourceError>;

    // for errors
    fn host(&self) -> String;
}

#[automock]
#[async_trait]
pub trait ProfileSource {
    async fn profile(&self, fid: u64) -> Result<Profile, SourceError>;

    // for errors
    fn host(&self) -> String;
}

#[automock]
#[async_trait]
pub trait BalanceSource {
    async fn token_balance(&self, address: &str) -> Result<TokenBalance, SourceError>;

    // for errors
    fn host(&self) -> String;
}

#[automock]
#[async_trait]
pub trait PriceSource {
    async fn price_usd(&self) -> Result<f64, SourceError>;

    // for errors
    fn host(&self) -> String;
}

pub fn new_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("client options are static")
}
