/// Movement steps a power pellet keeps the ghosts frightened.
pub const POWER_STEPS: u32 = 30;
/// Below this many remaining steps the frightened ghosts flash.
const FLASH_STEPS: u32 = 10;

/// Shared frightened timer, counted in movement steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PelletCycle {
    remaining: u32,
}

impl PelletCycle {
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_flashing(&self) -> bool {
        self.is_active() && self.remaining < FLASH_STEPS
    }

    /// (Re)starts the timer; a second pellet refills it rather than stacking.
    pub fn activate(&mut self) {
        self.remaining = POWER_STEPS;
    }

    /// Counts one movement step down. Returns true on the step that expires
    /// the cycle, when the caller must calm every frightened ghost.
    pub fn decay(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn reset(&mut self) {
        self.remaining = 0;
    }
}
