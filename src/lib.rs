// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod audio;
pub mod clock;
pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod panels;
pub mod round;
pub mod runtime;
pub mod sinks;
pub mod stats;
pub mod util;

pub use controller::{ClickOutcome, RoundController};
pub use error::GameError;
pub use panels::PanelSet;
pub use round::Phase;
