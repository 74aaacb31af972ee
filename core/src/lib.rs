#![no_std]

extern crate alloc;

use core::ops::RangeInclusive;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use options::*;
pub use types::*;

mod engine;
mod error;
mod options;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub dividend: Strength,
    pub divisor: Quotient,
}

impl GameConfig {
    pub const DIVIDEND_RANGE: RangeInclusive<Strength> = 10..=999;
    pub const DIVISOR_RANGE: RangeInclusive<Quotient> = 2..=20;

    pub const fn new_unchecked(dividend: Strength, divisor: Quotient) -> Self {
        Self { dividend, divisor }
    }

    pub fn new(dividend: Strength, divisor: Quotient) -> Result<Self> {
        if !Self::DIVIDEND_RANGE.contains(&dividend) {
            return Err(GameError::DividendOutOfRange);
        }
        if !Self::DIVISOR_RANGE.contains(&divisor) {
            return Err(GameError::DivisorOutOfRange);
        }
        Ok(Self::new_unchecked(dividend, divisor))
    }

    /// Damage dealt by a single shot with the given quotient. Saturates so
    /// absurd free-text quotients classify as overkill instead of wrapping.
    pub const fn damage_for(&self, quotient: Quotient) -> Strength {
        quotient.saturating_mul(self.divisor)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(366, 6)
    }
}

/// One committed shot. The history is append-only and only cleared by a
/// reset or a new game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub quotient: Quotient,
    pub damage: Strength,
}

/// Cosmetic classification of a committed shot. Never feeds back into the
/// state machine.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ShotQuality {
    Weak,
    Solid,
}

/// Outcome of firing a quotient
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FireOutcome {
    InvalidQuotient,
    Overkill {
        quotient: Quotient,
        damage: Strength,
    },
    Committed {
        quotient: Quotient,
        damage: Strength,
        remaining: Strength,
        shots_used: usize,
        quality: ShotQuality,
        status: GameStatus,
    },
}

impl FireOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}
