use std::io::Read;
use std::time::Duration;

use async_trait::async_trait;
use serialport::SerialPort;
use thiserror::Error;
use tracing::debug;

// Lines longer than this without a terminator are junk, not telemetry.
const MAX_PENDING_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to open serial port {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },
    #[error("device disconnected")]
    Disconnected,
    #[error("serial read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// What one bounded read produced. `Idle` covers a read timeout with no
/// complete line buffered; the caller is expected to back off briefly and try
/// again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    Idle,
}

/// Line-oriented byte source with a bounded-wait read and an explicit close.
#[async_trait]
pub trait LineSource: Send {
    async fn read_line(&mut self) -> Result<ReadOutcome, TransportError>;
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Serial implementation. Reads are synchronous with the port's configured
/// timeout, matching the single-consumer blocking model the controller
/// expects; byte chunks are buffered and split on `\n`.
pub struct SerialLineSource {
    port: Option<Box<dyn SerialPort>>,
    pending: Vec<u8>,
}

impl SerialLineSource {
    pub fn open(
        path: &str,
        baud_rate: u32,
        read_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let port = serialport::new(path, baud_rate)
            .timeout(read_timeout)
            .open()
            .map_err(|source| TransportError::Open {
                path: path.to_string(),
                source,
            })?;

        Ok(Self {
            port: Some(port),
            pending: Vec::with_capacity(256),
        })
    }

    /// Pops the first complete line out of the pending buffer, if any.
    /// Lines that are not valid UTF-8 are dropped with a debug log.
    fn take_buffered_line(&mut self) -> Option<ReadOutcome> {
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            match std::str::from_utf8(&raw[..raw.len() - 1]) {
                Ok(text) => {
                    return Some(ReadOutcome::Line(text.trim().to_string()));
                }
                Err(err) => {
                    debug!(%err, "dropping undecodable serial line");
                }
            }
        }
        None
    }
}

#[async_trait]
impl LineSource for SerialLineSource {
    async fn read_line(&mut self) -> Result<ReadOutcome, TransportError> {
        let mut chunk = [0_u8; 256];
        loop {
            if let Some(line) = self.take_buffered_line() {
                return Ok(line);
            }

            let port = self.port.as_mut().ok_or(TransportError::Disconnected)?;
            match port.read(&mut chunk) {
                Ok(0) => return Err(TransportError::Disconnected),
                Ok(n) => {
                    self.pending.extend_from_slice(&chunk[..n]);
                    if self.pending.len() > MAX_PENDING_BYTES {
                        debug!(
                            pending = self.pending.len(),
                            "discarding oversized unterminated input"
                        );
                        self.pending.clear();
                    }
                }
                Err(err) if err.kind() == std::io::ErrorKind::TimedOut => {
                    return Ok(ReadOutcome::Idle);
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        // Dropping the handle releases the port.
        self.port = None;
        self.pending.clear();
        Ok(())
    }
}
