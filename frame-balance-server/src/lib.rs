mod run;
mod settings;

pub mod service;

pub use run::{frame_balance, new_renderer};
pub use settings::*;
