//! # spire-core
//!
//! Translation layer between a card-game run and a fixed discrete RL interface.
//!
//! This crate provides:
//! - The game state snapshot model
//! - Discrete action layout and command decoding
//! - Action masks
//! - Fixed-shape observations
//! - Reward shaping
//! - Error types shared by the bridge and the environment

pub mod action;
pub mod error;
pub mod mask;
pub mod observation;
pub mod reward;
pub mod state;

pub use action::{
    ACTION_SPACE_SIZE, ActionSlot, ActionType, Command, NOOP_ACTION, action_name, decode_action,
};
pub use error::{Result, SpireError};
pub use mask::{ActionMask, action_mask};
pub use observation::{OBS_SIZE, Observation, build_observation};
pub use reward::{Reward, RewardComponents, RewardFunction, RewardWeights, ShapedReward};
pub use state::{GameState, ScreenType};
