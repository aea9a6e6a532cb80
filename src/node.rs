// Manual control node: key presses in, stamped drive commands out
// Commands are only produced while the mux has the keyboard selected.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

// local imports
use crate::config::{topic_key_expr, NodeParams, DRIVE_QUEUE_DEPTH, KEY_QUEUE_DEPTH};
use crate::error::{NodeError, Result};
use crate::messages::{DriveCommandStamped, MuxState};
use crate::mux::MuxGate;
use crate::translator::{translate, DriveParams, TranslatorState};

pub struct ManualControlNode {
    drive: DriveParams,
    frame_id: String,
    state: TranslatorState,
    gate: MuxGate,
}

impl ManualControlNode {
    pub fn new(params: &NodeParams) -> Self {
        Self {
            drive: params.drive_params(),
            frame_id: params.frame_id.clone(),
            state: TranslatorState::default(),
            gate: MuxGate::new(params.key_mux_idx, params.keyboard_enabled_at_start),
        }
    }

    /// Handle one key press. Returns the command to publish, if any.
    pub fn on_key(&mut self, key: &str) -> Option<DriveCommandStamped> {
        let gate_enabled = self.gate.keyboard_enabled();
        let translation = translate(key, gate_enabled, self.state, &self.drive);
        self.state = translation.state;

        match translation.command {
            Some(drive) => {
                info!(
                    "Key {:?} -> velocity={:.2}, steering_angle={:.2}",
                    key, drive.velocity, drive.steering_angle
                );
                Some(DriveCommandStamped::stamp(drive, &self.frame_id))
            }
            None => {
                if gate_enabled {
                    debug!("Ignoring key {:?}", key);
                } else {
                    debug!("Keyboard not selected by mux, ignoring key {:?}", key);
                }
                None
            }
        }
    }

    /// Handle a new set of mux flags
    pub fn on_mux(&mut self, state: MuxState) {
        if self.gate.update(state) {
            if self.gate.keyboard_enabled() {
                info!("Keyboard control enabled (mux slot {})", self.gate.slot());
            } else {
                info!("Keyboard control disabled (mux slot {})", self.gate.slot());
            }
        }
    }

    /// Handle a raw key payload from the keyboard topic (UTF-8 text)
    pub fn on_key_payload(&mut self, payload: &[u8]) -> Option<DriveCommandStamped> {
        match std::str::from_utf8(payload) {
            Ok(key) => self.on_key(key),
            Err(e) => {
                debug!("Ignoring non UTF-8 key payload: {}", e);
                None
            }
        }
    }

    /// Handle a raw JSON payload from the mux state topic.
    /// Malformed payloads are logged and leave the gate as it was.
    pub fn on_mux_payload(&mut self, payload: &[u8]) {
        match serde_json::from_slice::<MuxState>(payload) {
            Ok(state) => self.on_mux(state),
            Err(e) => warn!("Failed to parse mux state: {}", e),
        }
    }

    pub fn keyboard_enabled(&self) -> bool {
        self.gate.keyboard_enabled()
    }

    pub fn state(&self) -> TranslatorState {
        self.state
    }
}

/// Outcome of handing a command to the outbound queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOutcome {
    Queued,
    Dropped,
    Closed,
}

/// Queue a command for publishing without waiting. A full queue drops it.
pub fn queue_drive(
    tx: &mpsc::Sender<DriveCommandStamped>,
    cmd: DriveCommandStamped,
) -> QueueOutcome {
    match tx.try_send(cmd) {
        Ok(()) => QueueOutcome::Queued,
        Err(TrySendError::Full(cmd)) => {
            warn!("Drive queue full, dropping command: {:?}", cmd.drive);
            QueueOutcome::Dropped
        }
        Err(TrySendError::Closed(_)) => {
            warn!("Drive publisher stopped");
            QueueOutcome::Closed
        }
    }
}

pub async fn run(params: NodeParams) -> Result<()> {
    params.validate()?;
    let key_topic = topic_key_expr("keyboard_topic", &params.keyboard_topic)?;
    let mux_state_topic = topic_key_expr("mux_state_topic", &params.mux_state_topic)?;
    let drive_topic = topic_key_expr("mux_topic", &params.mux_topic)?;

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let key_sub = session
        .declare_subscriber(key_topic.clone())
        .with(zenoh::handlers::RingChannel::new(KEY_QUEUE_DEPTH))
        .await?;
    let mux_sub = session.declare_subscriber(mux_state_topic.clone()).await?;
    let pub_drive = session.declare_publisher(drive_topic.clone()).await?;

    // Bounded outbound queue, drained by its own task
    let (drive_tx, mut drive_rx) = mpsc::channel::<DriveCommandStamped>(DRIVE_QUEUE_DEPTH);
    let publisher = tokio::spawn(async move {
        while let Some(cmd) = drive_rx.recv().await {
            let cmd_json = serde_json::to_string(&cmd)?;
            pub_drive.put(cmd_json).await?;
        }
        Ok::<(), NodeError>(())
    });

    let mut node = ManualControlNode::new(&params);

    info!(
        "Manual control node started: speed={}, steer_angle={}, mux slot {} ({})",
        params.keyboard_speed,
        params.keyboard_steer_angle,
        params.key_mux_idx,
        if node.keyboard_enabled() { "enabled" } else { "disabled" }
    );
    info!("Subscribed to: {}, {}", key_topic, mux_state_topic);
    info!("Publishing to: {}", drive_topic);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            sample = key_sub.recv_async() => {
                let sample = sample?;
                let payload = sample.payload().to_bytes();

                if let Some(cmd) = node.on_key_payload(&payload) {
                    if queue_drive(&drive_tx, cmd) == QueueOutcome::Closed {
                        break;
                    }
                }
            }
            sample = mux_sub.recv_async() => {
                let sample = sample?;
                let payload = sample.payload().to_bytes();
                node.on_mux_payload(&payload);
            }
            res = &mut shutdown => {
                res?;
                info!("Shutting down");
                break;
            }
        }
    }

    // Let queued commands go out before closing
    drop(drive_tx);
    match publisher.await {
        Ok(res) => res?,
        Err(e) => warn!("Drive publisher task failed: {}", e),
    }

    session.close().await?;
    Ok(())
}
