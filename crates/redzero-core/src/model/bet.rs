use serde::{Deserialize, Serialize};

pub const MIN_BET: u8 = 7;
pub const MAX_BET: u8 = 12;

/// A bet as recorded for the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub player_name: String,
    #[serde(default)]
    pub amount: u8,
    #[serde(default)]
    pub without_trump: bool,
    #[serde(default)]
    pub skipped: bool,
}

impl Bet {
    pub fn new(player_name: impl Into<String>, amount: u8, without_trump: bool) -> Self {
        Self {
            player_name: player_name.into(),
            amount: clamp_bet(amount),
            without_trump,
            skipped: false,
        }
    }

    pub fn skip(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            amount: 0,
            without_trump: false,
            skipped: true,
        }
    }

    /// Whether this bet takes precedence over `other`.
    ///
    /// Higher amounts win. On equal amounts a without-trump bet beats one
    /// with trump; otherwise the standing bet keeps precedence.
    pub fn outranks(&self, other: &Bet) -> bool {
        if self.skipped {
            return false;
        }
        if other.skipped {
            return true;
        }
        self.amount > other.amount
            || (self.amount == other.amount && self.without_trump && !other.without_trump)
    }
}

/// Decision produced by a bidder before it is attributed to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetDecision {
    pub amount: u8,
    pub without_trump: bool,
    pub skipped: bool,
}

impl BetDecision {
    pub const fn skip() -> Self {
        Self {
            amount: MIN_BET,
            without_trump: false,
            skipped: true,
        }
    }

    pub fn bid(amount: u8, without_trump: bool) -> Self {
        Self {
            amount: clamp_bet(amount),
            without_trump,
            skipped: false,
        }
    }

    pub fn into_bet(self, player_name: impl Into<String>) -> Bet {
        if self.skipped {
            Bet::skip(player_name)
        } else {
            Bet::new(player_name, self.amount, self.without_trump)
        }
    }
}

pub fn clamp_bet(amount: u8) -> u8 {
    amount.clamp(MIN_BET, MAX_BET)
}

/// Smallest amount that may be bid over `highest`. The dealer may match.
pub fn minimum_raise(highest: Option<&Bet>, is_dealer: bool) -> u8 {
    match highest {
        None => MIN_BET,
        Some(bet) if is_dealer => bet.amount.max(MIN_BET),
        Some(bet) => bet.amount.saturating_add(1).max(MIN_BET),
    }
}

/// Highest standing bet in placement order, ignoring skips.
pub fn highest_bet(bets: &[Bet]) -> Option<&Bet> {
    bets.iter()
        .filter(|bet| !bet.skipped)
        .fold(None, |best: Option<&Bet>, bet| match best {
            Some(current) if !bet.outranks(current) => Some(current),
            _ => Some(bet),
        })
}
