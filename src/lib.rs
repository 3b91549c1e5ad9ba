//! PR Review Harness - fixture-driven bootstrap for an AI review action
//!
//! This library reconstructs the process environment a CI review action
//! expects, using static pull-request payload fixtures in place of live
//! GitHub Actions context, and then invokes the action entrypoint.

pub mod bootstrap;
pub mod entrypoint;
pub mod env;
pub mod error;
pub mod fixture;
pub mod inputs;
pub mod secrets;
pub mod token;
pub mod validate;

pub use bootstrap::{Bootstrapper, BootstrapConfig, BootstrapResult, DEFAULT_REPOSITORY};
pub use entrypoint::{CommandEntrypoint, Entrypoint, EntrypointResult};
pub use env::{names, ActionEnv};
pub use error::{Error, Result};
pub use fixture::{payload_filename, PayloadRef, PrPayload, Scenario};
pub use inputs::{ActionInputs, InputOverrides};
pub use secrets::Redactor;
pub use token::{TokenChain, TokenSource};
pub use validate::{Validate, ValidationResult, KNOWN_PROVIDERS};
