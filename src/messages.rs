// Define message types for the node

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

// Drive command produced by the translator (no header)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct DriveCommand {
    pub velocity: f64,
    pub steering_angle: f64,
}

impl DriveCommand {
    pub fn new(velocity: f64, steering_angle: f64) -> Self {
        Self {
            velocity,
            steering_angle,
        }
    }
}

/// Timestamp and frame filled in at the publishing boundary
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Header {
    pub stamp_nanos: u64,
    pub frame_id: String,
}

impl Header {
    /// Header stamped with the current wall-clock time
    pub fn now(frame_id: &str) -> Self {
        Self {
            stamp_nanos: stamp_nanos(SystemTime::now()),
            frame_id: frame_id.to_string(),
        }
    }
}

/// Nanoseconds since the epoch, saturating at u64::MAX
fn stamp_nanos(time: SystemTime) -> u64 {
    let nanos = time.duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    u64::try_from(nanos).unwrap_or(u64::MAX)
}

// Node -> drive topic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriveCommandStamped {
    pub header: Header,
    pub drive: DriveCommand,
}

impl DriveCommandStamped {
    pub fn stamp(drive: DriveCommand, frame_id: &str) -> Self {
        Self {
            header: Header::now(frame_id),
            drive,
        }
    }
}

/// Enable flags published by the mux, one slot per control source.
/// A non-zero entry means that source is currently in control.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MuxState {
    pub data: Vec<i32>,
}

impl MuxState {
    pub fn is_enabled(&self, idx: usize) -> bool {
        self.data.get(idx).is_some_and(|&flag| flag != 0)
    }
}
