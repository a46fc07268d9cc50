//! Provisions the chat widget schema on a hosted REST backend.
//!
//! [`Provisioner`] holds the individual idempotent steps; [`run::run_setup`]
//! and [`run::run_check`] chain them the way the `chatbase-setup` and
//! `chatbase-check` binaries in `chatbase-cli` do.

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod provisioner;
pub mod run;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{Reply, RestBackend, TableProbe};
pub use config::{ConfigError, ProvisionerConfig, ServiceKey};
pub use error::{BackendError, StepError};
pub use http::HttpBackend;
pub use provisioner::{BatchReport, Provisioner, SMOKE_TEST_USER_ID, StatementOutcome};
pub use run::{CheckOutcome, SetupOutcome, SetupStage, run_check, run_setup};
