// Read-only view of the mux enable flags
//
// The mux (owned elsewhere) publishes one flag per control source. This node
// only ever reads the keyboard slot and never writes the array back.

use crate::messages::MuxState;

#[derive(Debug, Clone)]
pub struct MuxGate {
    slot: usize,
    latest: Option<MuxState>,
    initial_enabled: bool,
}

impl MuxGate {
    pub fn new(slot: usize, initial_enabled: bool) -> Self {
        Self {
            slot,
            latest: None,
            initial_enabled,
        }
    }

    /// Replace the flag array with the latest one from the mux.
    /// Returns true if the keyboard slot changed state.
    pub fn update(&mut self, state: MuxState) -> bool {
        let was_enabled = self.keyboard_enabled();
        self.latest = Some(state);
        was_enabled != self.keyboard_enabled()
    }

    /// Whether the keyboard is the active control source.
    /// Falls back to `initial_enabled` until the mux has published.
    pub fn keyboard_enabled(&self) -> bool {
        match &self.latest {
            Some(state) => state.is_enabled(self.slot),
            None => self.initial_enabled,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }
}
