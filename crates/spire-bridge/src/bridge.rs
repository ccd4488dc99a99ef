//! Typed request/response channel to the game
//!
//! Strict lockstep: one command out, one snapshot back. There is no
//! background reader, the caller awaits each response in turn.

use serde::{Deserialize, Serialize};
use spire_core::action::Command;
use spire_core::state::GameState;
use spire_core::{Result, SpireError};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::protocol::{decode_state, encode_action};
use crate::tcp::{ConnectionState, TcpConnection};

/// Where and how to reach the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout: Duration,
    /// `None` waits forever
    pub response_timeout: Option<Duration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 9999,
            connect_timeout: Duration::from_secs(10),
            response_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Bridge between the environment and the game mod
pub struct SpireBridge {
    config: BridgeConfig,
    conn: TcpConnection,
}

impl SpireBridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            conn: TcpConnection::new(),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.conn.state()
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    pub async fn connect(&mut self) -> Result<()> {
        self.conn
            .connect(
                &self.config.host,
                self.config.port,
                self.config.connect_timeout,
            )
            .await
    }

    /// Send a command to the game
    pub async fn send_command(&mut self, command: &Command) -> Result<()> {
        let payload = encode_action(command);
        debug!("[Rust→Game] len={} cmd={}", payload.len(), command);
        self.conn.send_frame(&payload).await
    }

    /// Wait for the next snapshot
    ///
    /// `Ok(None)` means the game closed the stream. A timeout or an
    /// undecodable payload closes the connection: the stream position is
    /// unknown after either.
    pub async fn receive_state(&mut self) -> Result<Option<GameState>> {
        let frame = match self.config.response_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.conn.receive_frame()).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!("No response from game within {:?}", limit);
                    self.conn.close().await;
                    return Err(SpireError::Timeout(format!(
                        "no game state within {:?}",
                        limit
                    )));
                }
            },
            None => self.conn.receive_frame().await?,
        };

        let Some(payload) = frame else {
            return Ok(None);
        };

        match decode_state(&payload) {
            Ok(state) => {
                debug!(
                    "[Game→Rust] len={} screen={} floor={} hp={}",
                    payload.len(),
                    state.screen_type,
                    state.player.floor,
                    state.player.hp
                );
                Ok(Some(state))
            }
            Err(e) => {
                error!("Failed to decode game state: {}", e);
                self.conn.close().await;
                Err(e)
            }
        }
    }

    /// Send a command and wait for the resulting snapshot
    pub async fn exchange(&mut self, command: &Command) -> Result<Option<GameState>> {
        self.send_command(command).await?;
        self.receive_state().await
    }

    pub async fn close(&mut self) {
        self.conn.close().await;
    }
}
