//! # spire-env
//!
//! Episode controller exposing the game as a discrete-action RL environment.

pub mod config;
pub mod env;
pub mod environment;

pub use config::EnvConfig;
pub use env::{ResetOutcome, SpireEnv};
pub use environment::{Environment, StepInfo, StepResult};
