//! Decision entry points for one bot process.
//!
//! [`BotEngine`] owns everything that used to be ambient: the difficulty, the
//! per-game card memories and the random source. Several bots at one table
//! can share a single engine; set the difficulty right before each call when
//! they differ.

use crate::bot::{
    BidChoice, BidPlanner, BidWeights, CardMemory, DelayProfile, Difficulty, MemoryBook,
    PlayChoice, PlayContext, PlayPlanner, PlayWeights, SkipTable, TrumpPlanner,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use redzero_core::model::bet::BetDecision;
use redzero_core::model::card::Card;
use redzero_core::model::color::Color;
use redzero_core::model::player::{GameId, PlayerId};
use redzero_core::model::state::GameState;
use redzero_core::rules;
use std::time::Duration;
use tracing::{Level, event};

pub use redzero_core::model::player::select_team;

pub struct BotEngine<R = StdRng> {
    difficulty: Difficulty,
    memories: MemoryBook,
    bid_weights: BidWeights,
    play_weights: PlayWeights,
    skips: SkipTable,
    rng: R,
}

impl BotEngine<StdRng> {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_entropy())
    }

    pub fn seeded(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(difficulty, StdRng::seed_from_u64(seed))
    }

    /// Engine configured from `REDZERO_BOT_DIFFICULTY`.
    pub fn from_env() -> Self {
        Self::new(Difficulty::from_env())
    }
}

impl<R: Rng> BotEngine<R> {
    pub fn with_rng(difficulty: Difficulty, rng: R) -> Self {
        Self {
            difficulty,
            memories: MemoryBook::new(),
            bid_weights: BidWeights::default(),
            play_weights: PlayWeights::default(),
            skips: SkipTable::default(),
            rng,
        }
    }

    pub fn with_weights(mut self, bid: BidWeights, play: PlayWeights, skips: SkipTable) -> Self {
        self.bid_weights = bid;
        self.play_weights = play;
        self.skips = skips;
        self
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn init_memory(&mut self, game_id: &GameId) {
        self.memories.init(game_id);
    }

    /// Folds the snapshot's current trick into its game's memory. Call once
    /// per observed checkpoint, not for a discarded delayed action.
    pub fn update_memory(&mut self, state: &GameState) -> &CardMemory {
        self.memories.update(state)
    }

    pub fn clear_memory(&mut self, game_id: &GameId) {
        self.memories.clear(game_id);
    }

    pub fn memory(&self, game_id: &GameId) -> Option<&CardMemory> {
        self.memories.get(game_id)
    }

    pub fn tracked_games(&self) -> usize {
        self.memories.len()
    }

    pub fn make_bet(&mut self, state: &GameState, player_id: &PlayerId) -> BetDecision {
        let choice = BidPlanner::choose(
            state,
            player_id,
            self.difficulty,
            &self.bid_weights,
            &self.skips,
            &mut self.rng,
        );
        log_bid_decision(state, player_id, self.difficulty, &choice);
        choice.decision
    }

    /// `None` when the player is not seated or has nothing left to play.
    pub fn play_card(&mut self, state: &GameState, player_id: &PlayerId) -> Option<Card> {
        let memory = self.memories.get(&state.id);
        let ctx = PlayContext::new(state, player_id, memory, &self.play_weights)?;
        let legal = rules::legal_plays(ctx.hand, state.current_trick.plays());
        let choice = PlayPlanner::choose(&legal, &ctx, self.difficulty, &mut self.rng)?;
        log_play_decision(state, player_id, self.difficulty, &legal, &choice);
        Some(choice.card)
    }

    pub fn choose_trump(&self, state: &GameState, player_id: &PlayerId) -> Option<Color> {
        let player = state.player(player_id)?;
        Some(TrumpPlanner::choose(player.hand.cards()))
    }

    /// Human-feel latency before acting. Scheduling and discarding stale
    /// actions is up to the caller.
    pub fn action_delay(&mut self) -> Duration {
        DelayProfile::for_difficulty(self.difficulty).sample(&mut self.rng)
    }
}

fn log_bid_decision(
    state: &GameState,
    player_id: &PlayerId,
    difficulty: Difficulty,
    choice: &BidChoice,
) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let (estimated_tricks, quality) = match &choice.analysis {
        Some(analysis) => (analysis.estimated_tricks, format!("{:?}", analysis.hand_quality)),
        None => (0.0, String::from("none")),
    };
    let highest = state.highest_bet().map(|bet| bet.amount).unwrap_or(0);

    event!(
        target: "redzero_bot::bid",
        Level::INFO,
        game = %state.id,
        player = %player_id,
        difficulty = %difficulty,
        dealer = state.is_dealer(player_id),
        highest,
        estimated_tricks,
        quality = %quality,
        amount = choice.decision.amount,
        without_trump = choice.decision.without_trump,
        skipped = choice.decision.skipped,
        reason = choice.reason,
    );
}

fn log_play_decision(
    state: &GameState,
    player_id: &PlayerId,
    difficulty: Difficulty,
    legal: &[Card],
    choice: &PlayChoice,
) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }

    let legal_preview = if legal.len() <= 6 {
        legal
            .iter()
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} cards", legal.len())
    };

    event!(
        target: "redzero_bot::play",
        Level::INFO,
        game = %state.id,
        player = %player_id,
        difficulty = %difficulty,
        trump = ?state.trump,
        trick_cards = state.current_trick.len(),
        legal_count = legal.len(),
        legal = %legal_preview,
        chosen = %choice.card,
        score = choice.score,
        reason = choice.reason,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use redzero_core::model::bet::Bet;
    use redzero_core::model::hand::Hand;
    use redzero_core::model::player::TeamId;
    use redzero_core::model::state::{GamePhase, PlayerState};
    use redzero_core::model::trick::{Play, Trick};

    fn snapshot(hands: [Vec<Card>; 4], trick: Vec<Play>, current: usize) -> GameState {
        let players = hands
            .into_iter()
            .enumerate()
            .map(|(idx, cards)| {
                let mut player =
                    PlayerState::new(PlayerId::new(format!("p{idx}")), format!("P{idx}"), select_team(idx));
                player.hand = Hand::with_cards(cards);
                player
            })
            .collect();
        GameState {
            id: GameId::from("engine"),
            players,
            trump: Some(Color::Blue),
            current_trick: Trick::from(trick),
            dealer_index: 3,
            current_player_index: current,
            current_bets: Vec::new(),
            phase: GamePhase::Playing,
        }
    }

    #[test]
    fn select_team_alternates() {
        assert_eq!(select_team(0), TeamId::One);
        assert_eq!(select_team(1), TeamId::Two);
        assert_eq!(select_team(2), TeamId::One);
        assert_eq!(select_team(3), TeamId::Two);
    }

    #[test]
    fn difficulty_setter_round_trips() {
        let mut engine = BotEngine::seeded(Difficulty::Easy, 1);
        assert_eq!(engine.difficulty(), Difficulty::Easy);
        engine.set_difficulty(Difficulty::Hard);
        assert_eq!(engine.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn play_card_handles_missing_player_and_empty_hand() {
        let state = snapshot([vec![], vec![], vec![], vec![]], Vec::new(), 0);
        let mut engine = BotEngine::seeded(Difficulty::Hard, 3);
        assert_eq!(engine.play_card(&state, &PlayerId::from("p0")), None);
        assert_eq!(engine.play_card(&state, &PlayerId::from("ghost")), None);
    }

    #[test]
    fn play_card_follows_suit() {
        let state = snapshot(
            [
                vec![],
                vec![Card::new(Color::Red, 2), Card::new(Color::Green, 7), Card::new(Color::Red, 6)],
                vec![],
                vec![],
            ],
            vec![Play::new("p0", Card::new(Color::Red, 4))],
            1,
        );
        for difficulty in Difficulty::ALL {
            let mut engine = BotEngine::seeded(difficulty, 9);
            for _ in 0..20 {
                let card = engine.play_card(&state, &PlayerId::from("p1")).unwrap();
                assert_eq!(card.color, Color::Red);
            }
        }
    }

    #[test]
    fn make_bet_for_unknown_player_skips() {
        let mut state = snapshot([vec![], vec![], vec![], vec![]], Vec::new(), 0);
        state.phase = GamePhase::Betting;
        state.current_bets.push(Bet::new("P0", 8, false));
        let mut engine = BotEngine::seeded(Difficulty::Medium, 4);
        assert!(engine.make_bet(&state, &PlayerId::from("ghost")).skipped);
    }

    #[test]
    fn memory_lifecycle() {
        let state = snapshot(
            [vec![], vec![Card::RED_ZERO], vec![], vec![]],
            vec![Play::new("p0", Card::new(Color::Red, 7))],
            1,
        );
        let mut engine = BotEngine::seeded(Difficulty::Hard, 5);
        engine.init_memory(&state.id);
        assert_eq!(engine.memory(&state.id).unwrap().remaining_count(), 32);

        let memory = engine.update_memory(&state);
        assert_eq!(memory.remaining_count(), 31);
        assert_eq!(memory.red_zero_status(), crate::bot::SpecialStatus::InHand);

        engine.clear_memory(&state.id);
        assert!(engine.memory(&state.id).is_none());
        assert_eq!(engine.tracked_games(), 0);
        engine.init_memory(&state.id);
        assert_eq!(engine.memory(&state.id).unwrap().remaining_count(), 32);
    }

    #[test]
    fn action_delay_within_difficulty_window() {
        let expected = [(Difficulty::Easy, 1_500, 3_000), (Difficulty::Medium, 1_000, 2_000), (Difficulty::Hard, 600, 1_400)];
        let mut engine = BotEngine::seeded(Difficulty::Medium, 12);
        for (difficulty, low, high) in expected {
            engine.set_difficulty(difficulty);
            for _ in 0..100 {
                let ms = engine.action_delay().as_millis();
                assert!(ms >= low && ms < high, "{difficulty}: {ms}");
            }
        }
    }

    #[test]
    fn choose_trump_uses_own_hand() {
        let state = snapshot(
            [
                vec![Card::new(Color::Green, 1), Card::new(Color::Green, 2), Card::new(Color::Red, 7)],
                vec![],
                vec![],
                vec![],
            ],
            Vec::new(),
            0,
        );
        let engine = BotEngine::seeded(Difficulty::Hard, 0);
        assert_eq!(engine.choose_trump(&state, &PlayerId::from("p0")), Some(Color::Green));
        assert_eq!(engine.choose_trump(&state, &PlayerId::from("ghost")), None);
    }
}
