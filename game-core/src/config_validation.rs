use game_types::{MAX_PLAYERS, MIN_PLAYERS};
use serde::{Deserialize, Serialize};

/// How many special roles a round deals. Civilians fill the remaining seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub undercover: usize,
    pub mister_white: usize,
}

impl RoleCounts {
    pub fn new(undercover: usize, mister_white: usize) -> Self {
        Self {
            undercover,
            mister_white,
        }
    }

    pub fn civilians(&self, player_count: usize) -> usize {
        player_count.saturating_sub(self.undercover + self.mister_white)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    fn rejected(reason: String) -> Self {
        Self {
            is_valid: false,
            error: Some(reason),
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    /// Check a requested role composition against the balance rules.
    ///
    /// Pure and advisory: the engine validates again before dealing a round.
    pub fn validate(player_count: usize, undercover: usize, mister_white: usize) -> ValidationResult {
        if player_count < MIN_PLAYERS {
            return ValidationResult::rejected(format!(
                "At least {} players are needed, got {}",
                MIN_PLAYERS, player_count
            ));
        }
        if player_count > MAX_PLAYERS {
            return ValidationResult::rejected(format!(
                "At most {} players can play, got {}",
                MAX_PLAYERS, player_count
            ));
        }
        if undercover == 0 && mister_white == 0 {
            return ValidationResult::rejected(
                "At least one undercover or Mister White is required".to_string(),
            );
        }

        let specials = undercover + mister_white;
        let half = player_count / 2;
        if specials > half {
            return ValidationResult::rejected(format!(
                "Undercovers and Mister Whites together cannot exceed {} for {} players",
                half, player_count
            ));
        }

        let civilians = player_count - specials;
        if civilians < undercover + 1 {
            return ValidationResult::rejected(format!(
                "Civilians ({}) must outnumber undercovers ({})",
                civilians, undercover
            ));
        }

        if undercover == 0 && mister_white > player_count / 4 {
            return ValidationResult::rejected(format!(
                "Without undercovers, at most {} Mister White(s) for {} players",
                player_count / 4,
                player_count
            ));
        }

        ValidationResult::ok()
    }

    /// Deterministically correct a requested composition into a valid one.
    ///
    /// Applying the correction to its own output returns that output unchanged.
    pub fn auto_adjust(player_count: usize, undercover: usize, mister_white: usize) -> RoleCounts {
        // Below three players nothing can start; three players only support one undercover.
        if player_count <= MIN_PLAYERS {
            return RoleCounts::new(1, 0);
        }

        let mut undercover = undercover;
        let mut mister_white = mister_white;

        if undercover == 0 && mister_white == 0 {
            undercover = 1;
        }

        let mister_white_only_cap = player_count / 4;
        if undercover == 0 {
            mister_white = mister_white.min(mister_white_only_cap);
        }

        // Civilians must strictly outnumber undercovers.
        while undercover > 0 && player_count.saturating_sub(undercover + mister_white) < undercover + 1 {
            undercover -= 1;
        }
        if undercover == 0 {
            mister_white = mister_white.min(mister_white_only_cap);
        }

        // Special roles fill at most half the table, undercovers give way first.
        let half = player_count / 2;
        let specials = undercover + mister_white;
        if specials > half {
            let excess = specials - half;
            let from_undercover = excess.min(undercover);
            undercover -= from_undercover;
            mister_white -= excess - from_undercover;
        }
        if undercover == 0 {
            mister_white = mister_white.min(mister_white_only_cap);
        }

        if undercover == 0 && mister_white == 0 {
            undercover = 1;
        }

        RoleCounts::new(undercover, mister_white)
    }

    /// Largest undercover count the setup screen should offer.
    pub fn max_undercovers(player_count: usize, mister_white: usize) -> usize {
        if player_count < MIN_PLAYERS {
            return 1;
        }
        let by_half = (player_count / 2).saturating_sub(mister_white);
        // civilians >= undercover + 1  <=>  2u <= n - w - 1
        let by_majority = player_count.saturating_sub(mister_white + 1) / 2;
        by_half.min(by_majority).max(1)
    }
}
