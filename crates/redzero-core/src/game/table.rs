//! Local table driver used for self-play and integration tests.
//!
//! It mirrors the rules the bots reason about (turn order, follow-color,
//! betting circuit, trick resolution) closely enough to run whole rounds
//! offline. Points credited here are the sum of trick values per team; they
//! are a benchmarking proxy, not the authoritative score.

use crate::model::bet::{Bet, BetDecision, MAX_BET, highest_bet, minimum_raise};
use crate::model::card::Card;
use crate::model::color::Color;
use crate::model::deck::Deck;
use crate::model::player::{GameId, PlayerId, TeamId, select_team};
use crate::model::state::{GamePhase, GameState, PlayerState};
use crate::model::trick::{Play, Trick, TrickError};
use crate::rules::legal_plays;
use std::fmt;

#[derive(Debug, Clone)]
pub struct SeatSpec {
    pub id: PlayerId,
    pub name: String,
}

impl SeatSpec {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    pub holder: PlayerId,
    pub team: TeamId,
    pub amount: u8,
    pub without_trump: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrickResult {
    pub winner: PlayerId,
    pub team: TeamId,
    pub value: i32,
    pub plays: Vec<Play>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub contract: Contract,
    pub team_points: [i32; 2],
    pub team_tricks: [u32; 2],
    pub contract_made: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    WrongPhase {
        expected: GamePhase,
        actual: GamePhase,
    },
    OutOfTurn {
        expected: PlayerId,
        actual: PlayerId,
    },
    UnknownPlayer(PlayerId),
    DealerMustBid,
    BetOutOfRange(u8),
    BetTooLow {
        amount: u8,
        minimum: u8,
    },
    CardNotInHand(Card),
    IllegalPlay(Card),
    TrickPending,
    TrickIncomplete,
    NoContract,
    Trick(TrickError),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::WrongPhase { expected, actual } => {
                write!(f, "expected phase {expected:?} but table is in {actual:?}")
            }
            TableError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to act next but got {actual}")
            }
            TableError::UnknownPlayer(player) => write!(f, "unknown player {player}"),
            TableError::DealerMustBid => {
                write!(f, "dealer cannot skip when no bet is standing")
            }
            TableError::BetOutOfRange(amount) => write!(f, "bet amount {amount} out of range"),
            TableError::BetTooLow { amount, minimum } => {
                write!(f, "bet of {amount} is below the minimum of {minimum}")
            }
            TableError::CardNotInHand(card) => write!(f, "{card} is not in hand"),
            TableError::IllegalPlay(card) => write!(f, "{card} does not follow the led color"),
            TableError::TrickPending => write!(f, "completed trick must be resolved first"),
            TableError::TrickIncomplete => write!(f, "trick is not complete"),
            TableError::NoContract => write!(f, "no contract has been established"),
            TableError::Trick(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TableError {}

impl From<TrickError> for TableError {
    fn from(err: TrickError) -> Self {
        TableError::Trick(err)
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    state: GameState,
    contract: Option<Contract>,
    history: Vec<TrickResult>,
}

impl Table {
    pub fn deal(game_id: GameId, seats: [SeatSpec; 4], dealer_index: usize, seed: u64) -> Self {
        let hands = Deck::shuffled_with_seed(seed).deal();
        let players = seats
            .into_iter()
            .zip(hands)
            .enumerate()
            .map(|(idx, (seat, hand))| PlayerState {
                id: seat.id,
                name: seat.name,
                hand,
                team_id: select_team(idx),
                tricks_won: 0,
                points_won: 0,
            })
            .collect();
        let dealer_index = dealer_index % 4;

        Self {
            state: GameState {
                id: game_id,
                players,
                trump: None,
                current_trick: Trick::new(),
                dealer_index,
                current_player_index: (dealer_index + 1) % 4,
                current_bets: Vec::new(),
                phase: GamePhase::Betting,
            },
            contract: None,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }

    pub fn history(&self) -> &[TrickResult] {
        &self.history
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn expected_player(&self) -> Option<&PlayerId> {
        self.state.current_player().map(|player| &player.id)
    }

    pub fn submit_bet(&mut self, player: &PlayerId, decision: BetDecision) -> Result<(), TableError> {
        self.ensure_phase(GamePhase::Betting)?;
        let index = self.ensure_turn(player)?;
        let is_dealer = index == self.state.dealer_index;
        let name = self.state.players[index].name.clone();

        let bet = if decision.skipped {
            if is_dealer && !self.state.has_standing_bet() {
                return Err(TableError::DealerMustBid);
            }
            Bet::skip(name)
        } else {
            if decision.amount > MAX_BET {
                return Err(TableError::BetOutOfRange(decision.amount));
            }
            let highest = self.state.highest_bet();
            let minimum = minimum_raise(highest, is_dealer);
            let candidate = Bet::new(name, decision.amount, decision.without_trump);
            let accepted = match highest {
                None => decision.amount >= minimum,
                Some(standing) if is_dealer => candidate.amount >= standing.amount,
                Some(standing) => candidate.outranks(standing),
            };
            if !accepted {
                return Err(TableError::BetTooLow {
                    amount: decision.amount,
                    minimum,
                });
            }
            candidate
        };

        self.state.current_bets.push(bet);
        if is_dealer {
            self.close_betting()
        } else {
            self.state.current_player_index = (index + 1) % 4;
            Ok(())
        }
    }

    pub fn declare_trump(&mut self, player: &PlayerId, color: Color) -> Result<(), TableError> {
        self.ensure_phase(GamePhase::TrumpSelection)?;
        self.ensure_turn(player)?;
        self.state.trump = Some(color);
        self.state.phase = GamePhase::Playing;
        Ok(())
    }

    pub fn play_card(&mut self, player: &PlayerId, card: Card) -> Result<(), TableError> {
        self.ensure_phase(GamePhase::Playing)?;
        if self.state.current_trick.is_complete() {
            return Err(TableError::TrickPending);
        }
        let index = self.ensure_turn(player)?;
        let hand = &self.state.players[index].hand;
        if !hand.contains(card) {
            return Err(TableError::CardNotInHand(card));
        }
        if !legal_plays(hand.cards(), self.state.current_trick.plays()).contains(&card) {
            return Err(TableError::IllegalPlay(card));
        }

        self.state.current_trick.play(player.clone(), card)?;
        self.state.players[index].hand.remove(card);
        if !self.state.current_trick.is_complete() {
            self.state.current_player_index = (index + 1) % 4;
        }
        Ok(())
    }

    /// Credits the completed trick to its winner, who leads the next one.
    pub fn resolve_trick(&mut self) -> Result<TrickResult, TableError> {
        self.ensure_phase(GamePhase::Playing)?;
        if !self.state.current_trick.is_complete() {
            return Err(TableError::TrickIncomplete);
        }
        let winner = self
            .state
            .current_trick
            .winner(self.state.trump)
            .cloned()
            .ok_or(TableError::TrickIncomplete)?;
        let winner_index = self
            .state
            .player_index(&winner)
            .ok_or_else(|| TableError::UnknownPlayer(winner.clone()))?;
        let value = self.state.current_trick.value();

        let seat = &mut self.state.players[winner_index];
        seat.tricks_won += 1;
        seat.points_won += value;
        let team = seat.team_id;

        let finished = std::mem::take(&mut self.state.current_trick);
        let result = TrickResult {
            winner,
            team,
            value,
            plays: finished.plays().to_vec(),
        };
        self.history.push(result.clone());
        self.state.current_player_index = winner_index;

        if self.state.players.iter().all(|player| player.hand.is_empty()) {
            self.state.phase = GamePhase::RoundEnd;
        }
        Ok(result)
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        if self.state.phase != GamePhase::RoundEnd {
            return None;
        }
        let contract = self.contract.clone()?;
        let mut team_points = [0i32; 2];
        let mut team_tricks = [0u32; 2];
        for player in &self.state.players {
            team_points[player.team_id.index()] += player.points_won;
            team_tricks[player.team_id.index()] += player.tricks_won;
        }
        let contract_made = team_points[contract.team.index()] >= i32::from(contract.amount);
        Some(RoundOutcome {
            contract,
            team_points,
            team_tricks,
            contract_made,
        })
    }

    fn close_betting(&mut self) -> Result<(), TableError> {
        let dealer_name = self
            .state
            .dealer()
            .map(|dealer| dealer.name.clone())
            .ok_or(TableError::NoContract)?;
        // The dealer acts last and may only bid at or above the standing bet.
        let winning = self
            .state
            .current_bets
            .iter()
            .find(|bet| !bet.skipped && bet.player_name == dealer_name)
            .or_else(|| highest_bet(&self.state.current_bets))
            .cloned()
            .ok_or(TableError::NoContract)?;

        let holder = self
            .state
            .player_by_name(&winning.player_name)
            .ok_or(TableError::NoContract)?;
        let holder_index = self
            .state
            .player_index(&holder.id)
            .ok_or(TableError::NoContract)?;
        self.contract = Some(Contract {
            holder: holder.id.clone(),
            team: holder.team_id,
            amount: winning.amount,
            without_trump: winning.without_trump,
        });

        self.state.current_player_index = holder_index;
        if winning.without_trump {
            self.state.trump = None;
            self.state.phase = GamePhase::Playing;
        } else {
            self.state.phase = GamePhase::TrumpSelection;
        }
        Ok(())
    }

    fn ensure_phase(&self, expected: GamePhase) -> Result<(), TableError> {
        if self.state.phase != expected {
            return Err(TableError::WrongPhase {
                expected,
                actual: self.state.phase,
            });
        }
        Ok(())
    }

    fn ensure_turn(&self, player: &PlayerId) -> Result<usize, TableError> {
        let index = self
            .state
            .player_index(player)
            .ok_or_else(|| TableError::UnknownPlayer(player.clone()))?;
        if index != self.state.current_player_index {
            let expected = self
                .expected_player()
                .cloned()
                .ok_or_else(|| TableError::UnknownPlayer(player.clone()))?;
            return Err(TableError::OutOfTurn {
                expected,
                actual: player.clone(),
            });
        }
        Ok(index)
    }
}
