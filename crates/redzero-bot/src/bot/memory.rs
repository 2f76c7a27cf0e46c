//! Per-game card counting shared by every bot seated in that game.

use redzero_core::model::card::{Card, DECK_SIZE, MAX_VALUE};
use redzero_core::model::color::Color;
use redzero_core::model::player::GameId;
use redzero_core::model::state::GameState;
use std::collections::HashMap;

/// Where a special card is known to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpecialStatus {
    #[default]
    Unknown,
    InHand,
    Played,
}

/// What has been observed of the deck during one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardMemory {
    played: Vec<Card>,
    remaining: [bool; DECK_SIZE],
    remaining_count: usize,
    highest_remaining: [Option<u8>; 4],
    red_zero: SpecialStatus,
    brown_zero: SpecialStatus,
}

impl Default for CardMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl CardMemory {
    pub fn new() -> Self {
        Self {
            played: Vec::with_capacity(DECK_SIZE),
            remaining: [true; DECK_SIZE],
            remaining_count: DECK_SIZE,
            highest_remaining: [Some(MAX_VALUE); 4],
            red_zero: SpecialStatus::Unknown,
            brown_zero: SpecialStatus::Unknown,
        }
    }

    pub fn played(&self) -> &[Card] {
        &self.played
    }

    pub fn remaining_count(&self) -> usize {
        self.remaining_count
    }

    pub fn is_remaining(&self, card: Card) -> bool {
        card.value <= MAX_VALUE && self.remaining[card.index()]
    }

    /// Highest value of `color` not yet seen played, if any.
    pub fn highest_remaining(&self, color: Color) -> Option<u8> {
        self.highest_remaining[color.index()]
    }

    pub fn red_zero_status(&self) -> SpecialStatus {
        self.red_zero
    }

    pub fn brown_zero_status(&self) -> SpecialStatus {
        self.brown_zero
    }

    /// Records `card` as played. Returns `false` when it was already gone
    /// or is not a card of this deck.
    pub fn note_played(&mut self, card: Card) -> bool {
        if card.value > MAX_VALUE {
            return false;
        }
        let slot = card.index();
        if !self.remaining[slot] {
            return false;
        }
        self.remaining[slot] = false;
        self.remaining_count -= 1;
        self.played.push(card);

        if card.is_red_zero() {
            self.red_zero = SpecialStatus::Played;
        } else if card.is_brown_zero() {
            self.brown_zero = SpecialStatus::Played;
        }

        if self.highest_remaining[card.color.index()] == Some(card.value) {
            self.rescan_highest(card.color);
        }
        true
    }

    /// Marks specials found in the observer's own hand, once.
    pub fn note_own_hand(&mut self, hand: &[Card]) {
        if self.red_zero == SpecialStatus::Unknown && hand.contains(&Card::RED_ZERO) {
            self.red_zero = SpecialStatus::InHand;
        }
        if self.brown_zero == SpecialStatus::Unknown && hand.contains(&Card::BROWN_ZERO) {
            self.brown_zero = SpecialStatus::InHand;
        }
    }

    /// Folds the current trick and the acting player's hand into memory.
    pub fn observe(&mut self, state: &GameState) {
        for play in state.current_trick.plays() {
            self.note_played(play.card);
        }
        if let Some(player) = state.current_player() {
            self.note_own_hand(player.hand.cards());
        }
    }

    fn rescan_highest(&mut self, color: Color) {
        self.highest_remaining[color.index()] = (0..=MAX_VALUE)
            .rev()
            .find(|&value| self.remaining[Card::new(color, value).index()]);
    }
}

/// Card memories keyed by game, shared by all bots at the same table.
#[derive(Debug, Clone, Default)]
pub struct MemoryBook {
    games: HashMap<GameId, CardMemory>,
}

impl MemoryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `game_id`. An existing memory is left untouched.
    pub fn init(&mut self, game_id: &GameId) -> &mut CardMemory {
        self.games.entry(game_id.clone()).or_default()
    }

    /// Applies a snapshot to its game's memory, creating it on first use.
    pub fn update(&mut self, state: &GameState) -> &CardMemory {
        let memory = self.init(&state.id);
        memory.observe(state);
        memory
    }

    pub fn get(&self, game_id: &GameId) -> Option<&CardMemory> {
        self.games.get(game_id)
    }

    pub fn clear(&mut self, game_id: &GameId) -> Option<CardMemory> {
        self.games.remove(game_id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
