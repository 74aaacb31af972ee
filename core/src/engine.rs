use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Playing
    }
}

/// The wall-breaking reducer. Sole owner of the authoritative game state;
/// every other component holds read-only views derived from its accessors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreakerEngine {
    config: GameConfig,
    remaining: Strength,
    shots: Vec<Shot>,
    status: GameStatus,
}

impl BreakerEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            remaining: config.dividend,
            shots: Vec::new(),
            status: GameStatus::default(),
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn dividend(&self) -> Strength {
        self.config.dividend
    }

    pub fn divisor(&self) -> Quotient {
        self.config.divisor
    }

    pub fn remaining(&self) -> Strength {
        self.remaining
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn shots_used(&self) -> usize {
        self.shots.len()
    }

    pub fn shots_left(&self) -> usize {
        MAX_SHOTS.saturating_sub(self.shots.len())
    }

    /// Raw-string entry point for the custom quotient field. The engine owns
    /// input validation: trim, integer parse, positivity.
    pub fn fire_input(&mut self, input: &str) -> Result<FireOutcome> {
        self.check_playing()?;

        match input.trim().parse::<Quotient>() {
            Ok(quotient) => self.fire(quotient),
            Err(_) => Ok(FireOutcome::InvalidQuotient),
        }
    }

    pub fn fire(&mut self, quotient: Quotient) -> Result<FireOutcome> {
        self.check_playing()?;

        if quotient <= 0 {
            return Ok(FireOutcome::InvalidQuotient);
        }

        let damage = self.config.damage_for(quotient);
        if damage > self.remaining {
            log::debug!(
                "overkill: {} x {} = {} against {}",
                quotient,
                self.config.divisor,
                damage,
                self.remaining
            );
            return Ok(FireOutcome::Overkill { quotient, damage });
        }

        let before = self.remaining;
        self.shots.push(Shot { quotient, damage });
        self.remaining -= damage;
        self.evaluate_status();

        // damage < 0.2 * strength-before-shot, in integer form
        let quality = if damage.saturating_mul(5) < before {
            ShotQuality::Weak
        } else {
            ShotQuality::Solid
        };

        log::debug!(
            "shot {}: {} x {} = {}, wall at {} ({:?})",
            self.shots.len(),
            quotient,
            self.config.divisor,
            damage,
            self.remaining,
            self.status
        );

        Ok(FireOutcome::Committed {
            quotient,
            damage,
            remaining: self.remaining,
            shots_used: self.shots.len(),
            quality,
            status: self.status,
        })
    }

    /// Restores the wall to full strength and clears the shot history.
    pub fn reset(&mut self) {
        self.remaining = self.config.dividend;
        self.shots.clear();
        self.status = GameStatus::Playing;
    }

    /// Applies an already-validated config, then behaves as [`reset`].
    ///
    /// [`reset`]: Self::reset
    pub fn new_game(&mut self, config: GameConfig) {
        log::debug!("new game: {} / {}", config.dividend, config.divisor);
        self.config = config;
        self.reset();
    }

    fn evaluate_status(&mut self) {
        self.status = if self.remaining == 0 {
            GameStatus::Won
        } else if self.remaining < 0 {
            // only reachable if the overkill guard were ever bypassed
            GameStatus::Lost
        } else if self.shots.len() >= MAX_SHOTS {
            GameStatus::Lost
        } else {
            GameStatus::Playing
        };
    }

    fn check_playing(&self) -> Result<()> {
        if self.status.is_playing() {
            Ok(())
        } else {
            Err(GameError::AlreadyEnded)
        }
    }
}

impl Default for BreakerEngine {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(dividend: Strength, divisor: Quotient) -> BreakerEngine {
        BreakerEngine::new(GameConfig::new(dividend, divisor).unwrap())
    }

    fn history_sum(engine: &BreakerEngine) -> Strength {
        engine.shots().iter().map(|shot| shot.damage).sum()
    }

    #[test]
    fn exact_quotient_breaches_the_wall() {
        let mut engine = engine(366, 6);

        let outcome = engine.fire(61).unwrap();

        assert_eq!(
            outcome,
            FireOutcome::Committed {
                quotient: 61,
                damage: 366,
                remaining: 0,
                shots_used: 1,
                quality: ShotQuality::Solid,
                status: GameStatus::Won,
            }
        );
        assert_eq!(engine.status(), GameStatus::Won);
        assert_eq!(engine.remaining(), 0);
    }

    #[test]
    fn overkill_is_rejected_without_mutation() {
        let mut engine = engine(366, 6);

        let outcome = engine.fire(70).unwrap();

        assert_eq!(
            outcome,
            FireOutcome::Overkill {
                quotient: 70,
                damage: 420
            }
        );
        assert!(!outcome.has_update());
        assert_eq!(engine.remaining(), 366);
        assert_eq!(engine.shots_used(), 0);
        assert_eq!(engine.status(), GameStatus::Playing);
    }

    #[test]
    fn exhausting_the_shot_budget_locks_out() {
        let mut engine = engine(366, 6);

        for _ in 0..3 {
            assert!(engine.fire(1).unwrap().has_update());
            assert_eq!(engine.status(), GameStatus::Playing);
        }
        let outcome = engine.fire(1).unwrap();

        assert_eq!(engine.shots_used(), 4);
        assert_eq!(engine.remaining(), 342);
        assert_eq!(engine.status(), GameStatus::Lost);
        assert!(matches!(
            outcome,
            FireOutcome::Committed {
                status: GameStatus::Lost,
                ..
            }
        ));
    }

    #[test]
    fn non_positive_quotients_are_invalid() {
        let mut engine = engine(366, 6);

        assert_eq!(engine.fire(0).unwrap(), FireOutcome::InvalidQuotient);
        assert_eq!(engine.fire(-5).unwrap(), FireOutcome::InvalidQuotient);
        assert_eq!(engine.remaining(), 366);
        assert_eq!(engine.shots_used(), 0);
    }

    #[test]
    fn first_shot_win_on_small_wall() {
        let mut engine = engine(100, 5);

        let outcome = engine.fire(20).unwrap();

        assert!(matches!(
            outcome,
            FireOutcome::Committed {
                damage: 100,
                remaining: 0,
                status: GameStatus::Won,
                ..
            }
        ));
    }

    #[test]
    fn no_shots_are_accepted_after_the_game_ends() {
        let mut engine = engine(100, 5);
        engine.fire(20).unwrap();

        assert_eq!(engine.fire(1), Err(GameError::AlreadyEnded));
        assert_eq!(engine.fire_input("1"), Err(GameError::AlreadyEnded));
        assert_eq!(engine.remaining(), 0);
        assert_eq!(engine.shots_used(), 1);
    }

    #[test]
    fn strength_always_equals_dividend_minus_history() {
        let mut engine = engine(366, 6);

        for quotient in [10, 5, 1] {
            engine.fire(quotient).unwrap();
            assert_eq!(engine.remaining(), engine.dividend() - history_sum(&engine));
        }

        engine.reset();
        assert_eq!(engine.remaining(), engine.dividend() - history_sum(&engine));

        engine.fire(30).unwrap();
        assert_eq!(engine.remaining(), engine.dividend() - history_sum(&engine));
    }

    #[test]
    fn raw_input_is_trimmed_and_parsed_by_the_engine() {
        let mut engine = engine(366, 6);

        assert_eq!(engine.fire_input("abc").unwrap(), FireOutcome::InvalidQuotient);
        assert_eq!(engine.fire_input("").unwrap(), FireOutcome::InvalidQuotient);
        assert_eq!(engine.fire_input("12.5").unwrap(), FireOutcome::InvalidQuotient);
        assert_eq!(engine.shots_used(), 0);

        assert!(engine.fire_input("  61 ").unwrap().has_update());
        assert_eq!(engine.status(), GameStatus::Won);
    }

    #[test]
    fn shot_quality_splits_at_a_fifth_of_the_wall() {
        // 0.2 * 366 = 73.2
        {
            let mut engine = engine(366, 6);
            assert!(matches!(
                engine.fire(12).unwrap(), // damage 72
                FireOutcome::Committed {
                    quality: ShotQuality::Weak,
                    ..
                }
            ));
        }

        {
            let mut engine = engine(366, 6);
            assert!(matches!(
                engine.fire(13).unwrap(), // damage 78
                FireOutcome::Committed {
                    quality: ShotQuality::Solid,
                    ..
                }
            ));
        }
    }

    #[test]
    fn reset_restores_a_terminal_game() {
        let mut engine = engine(100, 5);
        engine.fire(20).unwrap();
        assert!(engine.is_finished());

        engine.reset();

        assert_eq!(engine.status(), GameStatus::Playing);
        assert_eq!(engine.remaining(), 100);
        assert!(engine.shots().is_empty());
    }

    #[test]
    fn new_game_swaps_the_config_and_resets() {
        let mut engine = engine(366, 6);
        engine.fire(10).unwrap();

        engine.new_game(GameConfig::new(100, 5).unwrap());

        assert_eq!(engine.dividend(), 100);
        assert_eq!(engine.divisor(), 5);
        assert_eq!(engine.remaining(), 100);
        assert!(engine.shots().is_empty());
        assert_eq!(engine.status(), GameStatus::Playing);
    }

    #[test]
    fn config_ranges_are_enforced_at_the_boundaries() {
        assert!(GameConfig::new(10, 2).is_ok());
        assert!(GameConfig::new(999, 20).is_ok());
        assert_eq!(GameConfig::new(9, 6), Err(GameError::DividendOutOfRange));
        assert_eq!(GameConfig::new(1000, 6), Err(GameError::DividendOutOfRange));
        assert_eq!(GameConfig::new(366, 1), Err(GameError::DivisorOutOfRange));
        assert_eq!(GameConfig::new(366, 21), Err(GameError::DivisorOutOfRange));
    }

    #[test]
    fn huge_quotients_saturate_into_overkill() {
        let mut engine = engine(366, 6);

        let outcome = engine.fire(Quotient::MAX).unwrap();

        assert!(matches!(outcome, FireOutcome::Overkill { .. }));
        assert_eq!(engine.remaining(), 366);
    }
}
