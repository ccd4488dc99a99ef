//! Environment trait

use async_trait::async_trait;
use serde::Serialize;
use spire_core::{
    ACTION_SPACE_SIZE, ActionMask, OBS_SIZE, Observation, Result, RewardComponents, ScreenType,
};

/// Per-step diagnostics
#[derive(Debug, Clone, Default, Serialize)]
pub struct StepInfo {
    /// Legal actions for the snapshot the observation was built from
    pub action_mask: ActionMask,
    /// Steps taken in the current episode
    pub step: u32,
    pub screen_type: ScreenType,
    /// Set when the step ended because the connection was lost
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Reset fell back to a snapshot that did not look like a fresh run
    pub degraded_reset: bool,
}

/// Outcome of one step
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub reward_components: RewardComponents,
    /// Run ended, or the game went away
    pub terminated: bool,
    /// Step limit reached
    pub truncated: bool,
    pub info: StepInfo,
}

/// A discrete-action RL environment
#[async_trait]
pub trait Environment: Send {
    /// Start a new episode
    async fn reset(&mut self) -> Result<(Observation, StepInfo)>;

    /// Apply one discrete action
    async fn step(&mut self, action: i64) -> Result<StepResult>;

    /// One-line status, `None` before the first reset
    fn render(&self) -> Option<String>;

    /// Release the connection; safe to call repeatedly
    async fn close(&mut self);

    fn action_space_size(&self) -> usize {
        ACTION_SPACE_SIZE
    }

    fn observation_size(&self) -> usize {
        OBS_SIZE
    }
}
