use super::{new_client, AddressSource, Profile, ProfileSource, SourceError};
use std::time::Duration;

/// Social-graph identity lookup. One user-bulk endpoint serves both the
/// linked-address resolution and the profile (display name + avatar).
pub struct Source {
    host: url::Url,
    api_key: String,
    client: reqwest::Client,
}

impl Source {
    pub fn new(host: url::Url, api_key: String, timeout: Duration) -> Source {
        Source {
            host,
            api_key,
            client: new_client(timeout),
        }
    }

    async fn user(&self, fid: u64) -> Result<json::User, SourceError> {
        let mut url = self.host.join("/v2/farcaster/user/bulk").unwrap();
        url.query_pairs_mut().append_pair("fids", &fid.to_string());
        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .header("api_key", &self.api_key)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SourceError::Upstream(format!(
                "invalid status code got as a result: {}",
                response.status()
            )));
        }
        let resp: json::UserBulkResponse = response.json().await?;
        resp.users
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::Upstream(format!("no user found for fid {fid}")))
    }
}

#[async_trait::async_trait]
impl AddressSource for Source {
    async fn linked_addresses(&self, fid: u64) -> Result<Vec<String>, SourceError> {
        let user = self.user(fid).await?;
        Ok(user
            .verified_addresses
            .map(|addresses| addresses.eth_addresses)
            .unwrap_or_default())
    }

    fn host(&self) -> String {
        self.host.to_string()
    }
}

#[async_trait::async_trait]
impl ProfileSource for Source {
    async fn profile(&self, fid: u64) -> Result<Profile, SourceError> {
        let user = self.user(fid).await?;
        Ok(Profile {
            display_name: user.display_name,
            avatar_url: user.pfp_url,
        })
    }

    fn host(&self) -> String {
        self.host.to_string()
    }
}

mod json {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct UserBulkResponse {
        pub users: Vec<User>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct User {
        pub display_name: Option<String>,
        pub pfp_url: Option<String>,
        pub verified_addresses: Option<VerifiedAddresses>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub struct VerifiedAddresses {
        pub eth_addresses: Vec<String>,
    }
}
