mod frame;
mod renderer;
mod units;

pub mod sources;

pub use frame::{Align, FrameResponse, Intent, Style, VisualNode};
pub use renderer::{BalanceResult, FrameRenderer, InteractionState, RenderSettings};
pub use sources::*;
pub use units::format_units;
