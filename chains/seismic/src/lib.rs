pub mod campaign;
pub mod config;
pub mod contracts;
pub mod deployer;
pub mod error;
pub mod orchestrator;
pub mod registry;
pub mod ui;
pub mod utils;

pub use config::{RunMode, SeismicConfig};
pub use error::{DeployError, RunError};
pub use orchestrator::{Orchestrator, RunSummary};
