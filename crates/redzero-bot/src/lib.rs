pub mod bot;
pub mod engine;

pub use bot::{
    BidChoice, BidPlanner, BidWeights, CardMemory, DelayProfile, Difficulty, HandAnalysis,
    HandQuality, MemoryBook, PlayChoice, PlayContext, PlayPlanner, PlayWeights, SkipTable,
    SpecialStatus, TrickPosition, TrumpPlanner, analyze_hand,
};
pub use engine::{BotEngine, select_team};
