mod analysis;
mod bid;
mod memory;
mod play;
mod trump;
mod weights;

pub use analysis::{HandAnalysis, HandQuality, analyze_hand};
pub use bid::{BidChoice, BidPlanner};
pub use memory::{CardMemory, MemoryBook, SpecialStatus};
pub use play::{BROWN_ZERO_TO_PARTNER, PlayChoice, PlayContext, PlayPlanner, TrickPosition};
pub use trump::TrumpPlanner;
pub use weights::{BidWeights, DelayProfile, PlayWeights, SkipTable};

use redzero_core::model::card::Card;
use redzero_core::model::color::Color;

/// Skill tier of a bot. Higher tiers play more deterministically and bid
/// more selectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Parses a label case-insensitively; `None` for labels that name no tier.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "normal" | "default" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Like [`Difficulty::parse`], but anything unrecognised is medium.
    pub fn from_label(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }

    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        read("REDZERO_BOT_DIFFICULTY")
            .map(|raw| Self::from_label(&raw))
            .unwrap_or_default()
    }

    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn count_color(cards: &[Card], color: Color) -> usize {
    cards.iter().filter(|card| card.color == color).count()
}
