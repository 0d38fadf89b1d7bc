//! Outlet state — the 8-bit vector of "what is currently switched on".
//!
//! One bit per physical outlet on the relay board, index 0..7. Index 0 is
//! the FIRST bit shifted out to the register, which also makes it the
//! leftmost character of the `00000000` display form used in logs. The
//! vector is owned exclusively by the control loop and only ever replaced
//! wholesale with the policy's output, never partially mutated.

use core::fmt;

/// Fixed 8-bit outlet vector.
///
/// Stored as a `u8` with outlet index 0 in the most significant bit, so the
/// `{:08b}` rendering of the raw byte reads left-to-right in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutletState(u8);

impl OutletState {
    /// Every outlet deenergised. Startup and shutdown state.
    pub const ALL_OFF: OutletState = OutletState(0);

    /// Build from a raw byte where bit 7 (MSB) is outlet index 0.
    ///
    /// Written so that a binary literal reads in index order:
    /// `from_byte(0b0001_0010)` has outlets 3 and 6 on.
    pub const fn from_byte(byte: u8) -> Self {
        OutletState(byte)
    }

    /// Raw byte form (MSB = outlet index 0).
    pub const fn to_byte(self) -> u8 {
        self.0
    }

    /// Whether the outlet at `index` (0..8) is on.
    pub fn is_on(self, index: u8) -> bool {
        debug_assert!(index < 8);
        self.0 & Self::mask(index) != 0
    }

    /// Switch the outlet at `index` (0..8) on or off.
    pub fn set(&mut self, index: u8, on: bool) {
        debug_assert!(index < 8);
        if on {
            self.0 |= Self::mask(index);
        } else {
            self.0 &= !Self::mask(index);
        }
    }

    /// Bits in wire order: index 0 first, exactly the order the shift
    /// register driver must clock them out.
    pub fn bits(self) -> impl Iterator<Item = bool> {
        (0..8u8).map(move |i| self.is_on(i))
    }

    const fn mask(index: u8) -> u8 {
        1 << (7 - index)
    }
}

impl fmt::Display for OutletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)
    }
}
