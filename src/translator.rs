// Key -> drive command translation
//
// Pure function over (key, gate flag, previous velocity). The caller owns the
// state and passes it in on every call; nothing here touches the transport.

use crate::messages::DriveCommand;

/// Speed and steering magnitudes used for keyboard driving
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveParams {
    pub keyboard_speed: f64,
    pub keyboard_steer_angle: f64,
}

/// Memory carried between key presses
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TranslatorState {
    /// Velocity of the last emitted command (not the last key seen)
    pub previous_velocity: f64,
}

/// Keys that produce a drive command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveKey {
    Forward,
    Reverse,
    SteerLeft,
    SteerRight,
    Stop,
}

impl DriveKey {
    /// Exact, case-sensitive match on the whole payload
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "w" => Some(DriveKey::Forward),
            "s" => Some(DriveKey::Reverse),
            "a" => Some(DriveKey::SteerLeft),
            "d" => Some(DriveKey::SteerRight),
            " " => Some(DriveKey::Stop),
            _ => None,
        }
    }

    fn command(self, params: &DriveParams, state: TranslatorState) -> DriveCommand {
        match self {
            DriveKey::Forward => DriveCommand::new(params.keyboard_speed, 0.0),
            DriveKey::Reverse => DriveCommand::new(-params.keyboard_speed, 0.0),
            // Steering keeps the current speed
            DriveKey::SteerLeft => {
                DriveCommand::new(state.previous_velocity, params.keyboard_steer_angle)
            }
            DriveKey::SteerRight => {
                DriveCommand::new(state.previous_velocity, -params.keyboard_steer_angle)
            }
            DriveKey::Stop => DriveCommand::new(0.0, 0.0),
        }
    }
}

/// Result of translating one key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Translation {
    /// `None` when the command is suppressed
    pub command: Option<DriveCommand>,
    pub state: TranslatorState,
}

/// Translate a key press into an optional drive command.
///
/// Nothing is emitted (and `state` comes back untouched) when the gate is
/// disabled or the key is not one of `w`, `s`, `a`, `d` or space. Unknown keys
/// are deliberately silent rather than zeroing the vehicle; only space stops.
pub fn translate(
    key: &str,
    gate_enabled: bool,
    state: TranslatorState,
    params: &DriveParams,
) -> Translation {
    let command = gate_enabled
        .then(|| DriveKey::parse(key))
        .flatten()
        .map(|drive_key| drive_key.command(params, state));

    let state = match command {
        Some(cmd) => TranslatorState {
            previous_velocity: cmd.velocity,
        },
        None => state,
    };

    Translation { command, state }
}
