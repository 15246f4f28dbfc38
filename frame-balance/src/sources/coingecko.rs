use super::{new_client, PriceSource, SourceError};
use std::{collections::HashMap, time::Duration};

/// USD price quote for the tracked token.
pub struct Source {
    host: url::Url,
    token_id: String,
    client: reqwest::Client,
}

impl Source {
    pub fn new(host: url::Url, token_id: String, timeout: Duration) -> Source {
        Source {
            host,
            token_id,
            client: new_client(timeout),
        }
    }
}

#[async_trait::async_trait]
impl PriceSource for Source {
    async fn price_usd(&self) -> Result<f64, SourceError> {
        let response = self
            .client
            .get(self.host.join("/api/v3/simple/price").unwrap())
            .query(&[
                ("ids", self.token_id.as_str()),
                ("vs_currencies", "usd"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SourceError::Upstream(format!(
                "invalid status code got as a result: {}",
                response.status()
            )));
        }
        let resp: HashMap<String, HashMap<String, f64>> = response.json().await?;
        resp.get(&self.token_id)
            .and_then(|quotes| quotes.get("usd"))
            .copied()
            .ok_or_else(|| {
                SourceError::Upstream(format!("no usd price for {:?}", self.token_id))
            })
    }

    fn host(&self) -> String {
        self.host.to_string()
    }
}
