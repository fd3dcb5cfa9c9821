pub mod config;
pub mod error;
pub mod types;

pub use config::{BatteryConfig, ExpansionConfig, ServiceConfig, VerifierConfig};
pub use error::{Result, VerifierError};
pub use types::{Action, Position, RawAction};
