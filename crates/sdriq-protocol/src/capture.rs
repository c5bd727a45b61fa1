//! Capture-session state machine.

use tracing::{info, warn};

use sdriq_core::types::{CaptureMode, CaptureState};
use sdriq_core::{Error, Result};

use crate::commands;
use crate::engine::ControlEngine;
use crate::items::CI_RECEIVER_STATE;

/// Tracks whether a capture is in progress and guards the run/stop
/// transitions.
///
/// The controller refuses out-of-order transitions before anything is
/// written to the link, and only changes state once the device has
/// acknowledged the receiver-state set. A failed transaction leaves the
/// state untouched so the caller can retry.
#[derive(Debug, Default)]
pub struct CaptureController {
    state: CaptureState,
}

impl CaptureController {
    /// Create a controller in the idle state.
    pub fn new() -> Self {
        CaptureController {
            state: CaptureState::Idle,
        }
    }

    /// The current session state.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Start capturing.
    ///
    /// A `block_count` of zero selects contiguous streaming; any other value
    /// selects one-shot capture of that many blocks, clamped to the one-byte
    /// field the protocol provides.
    pub async fn start(&mut self, engine: &mut ControlEngine, block_count: u16) -> Result<()> {
        if let CaptureState::Running(_) = self.state {
            return Err(Error::InvalidTransition {
                from: "running",
                to: "running",
            });
        }

        let mode = if block_count == 0 {
            CaptureMode::Contiguous
        } else {
            let blocks = match u8::try_from(block_count) {
                Ok(n) => n,
                Err(_) => {
                    warn!(block_count, "one-shot block count clamped to 255");
                    u8::MAX
                }
            };
            CaptureMode::OneShot(blocks)
        };

        engine
            .set_item(CI_RECEIVER_STATE, &commands::start_capture_params(mode))
            .await?;
        self.state = CaptureState::Running(mode);
        info!(%mode, "capture started");
        Ok(())
    }

    /// Stop a running capture and return the receiver to idle.
    pub async fn stop(&mut self, engine: &mut ControlEngine) -> Result<()> {
        if self.state == CaptureState::Idle {
            return Err(Error::InvalidTransition {
                from: "idle",
                to: "idle",
            });
        }

        engine
            .set_item(CI_RECEIVER_STATE, &commands::stop_capture_params())
            .await?;
        self.state = CaptureState::Idle;
        info!("capture stopped");
        Ok(())
    }
}
