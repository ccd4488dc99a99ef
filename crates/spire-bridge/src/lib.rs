//! TCP bridge to the game mod
//!
//! This crate provides:
//! - Length-prefixed framing over any async stream
//! - The protobuf wire schema and its mapping onto `spire_core` types
//! - A TCP connection manager
//! - [`SpireBridge`], the lockstep command/snapshot channel

pub mod bridge;
pub mod frame;
pub mod protocol;
pub mod tcp;
pub mod wire;

pub use bridge::{BridgeConfig, SpireBridge};
pub use frame::{MAX_FRAME_LEN, read_frame, write_frame};
pub use protocol::{decode_action, decode_state, encode_action, encode_state};
pub use tcp::{ConnectionState, TcpConnection};
