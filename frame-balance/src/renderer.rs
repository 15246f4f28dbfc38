use crate::{
    frame::{Align, FrameResponse, Intent, Style, VisualNode},
    sources::{AddressSource, BalanceSource, PriceSource, Profile, ProfileSource, SourceError},
    units,
};
use std::sync::Arc;

const DEFAULT_AVATAR_URL: &str = "https://example.com/default-profile-picture.jpg";

/// Decoded inbound frame interaction. Both fields are absent on the
/// very first render by construction; the signed raw payload is
/// verified and decoded by the hosting layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct InteractionState {
    pub fid: Option<u64>,
    pub address: Option<String>,
}

/// Outcome of the balance lookup after formatting. A failed lookup
/// renders as "0" with the error marker set, which adds an explanatory
/// line to the frame and suppresses the usd estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceResult {
    pub amount: String,
    pub is_error: bool,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub token_symbol: String,
    pub explorer_base_url: url::Url,
}

pub struct FrameRenderer {
    addresses: Arc<dyn AddressSource + Send + Sync>,
    profiles: Arc<dyn ProfileSource + Send + Sync>,
    balances: Arc<dyn BalanceSource + Send + Sync>,
    prices: Arc<dyn PriceSource + Send + Sync>,
    settings: RenderSettings,
}

fn fail_soft<T>(
    call: &'static str,
    host: impl FnOnce() -> String,
    result: Result<T, SourceError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::error!("could not call {} for host {}, error: {}", call, host(), error);
            None
        }
    }
}

impl FrameRenderer {
    pub fn new(
        addresses: Arc<dyn AddressSource + Send + Sync>,
        profiles: Arc<dyn ProfileSource + Send + Sync>,
        balances: Arc<dyn BalanceSource + Send + Sync>,
        prices: Arc<dyn PriceSource + Send + Sync>,
        settings: RenderSettings,
    ) -> FrameRenderer {
        FrameRenderer {
            addresses,
            profiles,
            balances,
            prices,
            settings,
        }
    }

    /// The static prompt screen. No network calls, no failure mode.
    pub fn render_initial(&self) -> FrameResponse {
        FrameResponse {
            image: Self::screen(vec![Self::title(format!(
                "Check your {} balance",
                self.settings.token_symbol
            ))]),
            intents: vec![Intent::post("Check Balance", "/check")],
        }
    }

    /// Resolves address, balance, price and profile for the viewer and
    /// renders the result. Every lookup is independently fail-soft, so
    /// a frame is produced for any input; errors escaping here are
    /// mapped to the retry frame by [`Self::render_check_or_error`].
    pub async fn render_check(
        &self,
        state: &InteractionState,
    ) -> Result<FrameResponse, anyhow::Error> {
        let Some(fid) = state.fid else {
            return Ok(Self::error_frame(
                "No identity found. Open this frame from your feed and try again.",
            ));
        };

        let address = match &state.address {
            Some(address) => Some(address.clone()),
            None => fail_soft(
                "linked_addresses",
                || self.addresses.host(),
                self.addresses.linked_addresses(fid).await,
            )
            .and_then(|addresses| addresses.into_iter().next()),
        };
        let Some(address) = address else {
            return Ok(Self::error_frame("No wallet connected to this account."));
        };

        let balance = match fail_soft(
            "token_balance",
            || self.balances.host(),
            self.balances.token_balance(&address).await,
        ) {
            Some(balance) => BalanceResult {
                amount: units::format_units(balance.raw, balance.decimals),
                is_error: false,
            },
            None => BalanceResult {
                amount: "0".to_string(),
                is_error: true,
            },
        };

        let price = if balance.is_error {
            None
        } else {
            fail_soft("price_usd", || self.prices.host(), self.prices.price_usd().await)
        };

        let profile = fail_soft("profile", || self.profiles.host(), self.profiles.profile(fid).await)
            .unwrap_or_default();

        self.result_frame(fid, &address, &balance, price, &profile)
    }

    /// Top-level boundary: anything escaping the render pipeline still
    /// degrades to a rendered frame, never a protocol-level failure.
    pub async fn render_check_or_error(&self, state: &InteractionState) -> FrameResponse {
        self.render_check(state).await.unwrap_or_else(|error| {
            tracing::error!("frame render failed: {:#}", error);
            Self::error_frame("Something went wrong. Please retry.")
        })
    }

    fn result_frame(
        &self,
        fid: u64,
        address: &str,
        balance: &BalanceResult,
        price: Option<f64>,
        profile: &Profile,
    ) -> Result<FrameResponse, anyhow::Error> {
        let display_name = profile
            .display_name
            .clone()
            .unwrap_or_else(|| format!("fid {fid}"));
        let avatar_url = profile
            .avatar_url
            .clone()
            .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string());

        let mut children = vec![
            VisualNode::image(
                avatar_url,
                100,
                100,
                Style {
                    border_radius: Some("50%".to_string()),
                    ..Default::default()
                },
            ),
            Self::title(display_name),
            Self::line(format!(
                "Balance: {} {}",
                balance.amount, self.settings.token_symbol
            )),
        ];
        if balance.is_error {
            children.push(Self::note("Balance lookup failed, refresh to retry"));
        } else if let Some(usd) = usd_value(&balance.amount, price) {
            children.push(Self::line(format!("~ ${usd:.2}")));
        }
        children.push(Self::note(short_address(address)));

        let explorer_url = self
            .settings
            .explorer_base_url
            .join(&format!("address/{address}"))?;

        Ok(FrameResponse {
            image: Self::screen(children),
            intents: vec![
                Intent::post("Refresh", "/check"),
                Intent::post("Back", "/"),
                Intent::link("View on explorer", explorer_url.to_string()),
            ],
        })
    }

    pub fn error_frame(message: &str) -> FrameResponse {
        FrameResponse {
            image: Self::screen(vec![
                Self::title("Something went wrong"),
                Self::note(message),
            ]),
            intents: vec![Intent::post("Retry", "/check")],
        }
    }

    fn screen(children: Vec<VisualNode>) -> VisualNode {
        VisualNode::container(
            Style {
                background: Some("linear-gradient(to right, #432889, #17101F)".to_string()),
                align: Some(Align::Center),
                ..Default::default()
            },
            children,
        )
    }

    fn title(content: impl Into<String>) -> VisualNode {
        VisualNode::text(
            content,
            Style {
                color: Some("white".to_string()),
                font_size: Some(48),
                ..Default::default()
            },
        )
    }

    fn line(content: impl Into<String>) -> VisualNode {
        VisualNode::text(
            content,
            Style {
                color: Some("white".to_string()),
                font_size: Some(32),
                ..Default::default()
            },
        )
    }

    fn note(content: impl Into<String>) -> VisualNode {
        VisualNode::text(
            content,
            Style {
                color: Some("#a0a0a0".to_string()),
                font_size: Some(24),
                ..Default::default()
            },
        )
    }
}

fn usd_value(amount: &str, price: Option<f64>) -> Option<f64> {
    let price = price?;
    let amount: f64 = amount.parse().ok()?;
    Some(amount * price)
}

// The address is taken from the inbound payload unvalidated, so
// shortening must not assume ASCII.
fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        address.to_string()
    } else {
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}
