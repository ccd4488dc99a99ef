//! TCP connection to the game process
//!
//! The game mod listens, we connect. The connection is either absent or one
//! open stream; any read/write failure drops the stream so a later call sees
//! `NotConnected` instead of a half-dead socket.

use spire_core::{Result, SpireError};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::frame::{read_frame, write_frame};

/// Connection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// A single TCP stream to the game
#[derive(Debug, Default)]
pub struct TcpConnection {
    stream: Option<TcpStream>,
}

impl TcpConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        if self.stream.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Open the stream; a no-op when already connected
    pub async fn connect(&mut self, host: &str, port: u16, timeout: Duration) -> Result<()> {
        if self.stream.is_some() {
            debug!("Already connected to {}:{}", host, port);
            return Ok(());
        }

        let addr = format!("{}:{}", host, port);
        let stream = match tokio::time::timeout(timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(SpireError::Connection(format!(
                    "Failed to connect to {}: {}",
                    addr, e
                )));
            }
            Err(_) => {
                return Err(SpireError::Connection(format!(
                    "Connect to {} timed out after {:?}",
                    addr, timeout
                )));
            }
        };

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }

        info!("Connected to game at {}", addr);
        self.stream = Some(stream);
        Ok(())
    }

    /// Write one frame
    pub async fn send_frame(&mut self, payload: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(SpireError::NotConnected)?;
        if let Err(e) = write_frame(stream, payload).await {
            warn!("Send failed, dropping connection: {}", e);
            self.stream = None;
            return Err(e);
        }
        Ok(())
    }

    /// Read one frame
    ///
    /// Returns `Ok(None)` when the peer closed the stream; the connection is
    /// dropped in that case.
    pub async fn receive_frame(&mut self) -> Result<Option<Vec<u8>>> {
        let stream = self.stream.as_mut().ok_or(SpireError::NotConnected)?;
        match read_frame(stream).await {
            Ok(Some(payload)) => Ok(Some(payload)),
            Ok(None) => {
                info!("Game closed the connection");
                self.stream = None;
                Ok(None)
            }
            Err(e) => {
                warn!("Receive failed, dropping connection: {}", e);
                self.stream = None;
                Err(e)
            }
        }
    }

    /// Shut the stream down; safe to call repeatedly
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                debug!("Shutdown error ignored: {}", e);
            }
            info!("Connection closed");
        }
    }
}
