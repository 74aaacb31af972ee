/// Wall integrity counter. Signed so an over-breach stays representable
/// even though the overkill guard rejects it before commit.
pub type Strength = i32;

/// Player-chosen multiplier for one shot.
pub type Quotient = i32;

/// Shot budget for one mission.
pub const MAX_SHOTS: usize = 4;
