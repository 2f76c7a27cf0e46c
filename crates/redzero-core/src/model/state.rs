use crate::model::bet::{Bet, highest_bet};
use crate::model::color::Color;
use crate::model::hand::Hand;
use crate::model::player::{GameId, PlayerId, TeamId};
use crate::model::trick::Trick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Waiting,
    Betting,
    TrumpSelection,
    Playing,
    RoundEnd,
    GameEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub hand: Hand,
    pub team_id: TeamId,
    #[serde(default)]
    pub tricks_won: u32,
    #[serde(default)]
    pub points_won: i32,
}

impl PlayerState {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, team_id: TeamId) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hand: Hand::new(),
            team_id,
            tricks_won: 0,
            points_won: 0,
        }
    }
}

/// Read-only snapshot of a game as delivered by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub id: GameId,
    pub players: Vec<PlayerState>,
    #[serde(default)]
    pub trump: Option<Color>,
    #[serde(default)]
    pub current_trick: Trick,
    pub dealer_index: usize,
    pub current_player_index: usize,
    #[serde(default)]
    pub current_bets: Vec<Bet>,
    pub phase: GamePhase,
}

impl GameState {
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|player| &player.id == id)
    }

    pub fn player_index(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|player| &player.id == id)
    }

    pub fn dealer(&self) -> Option<&PlayerState> {
        self.players.get(self.dealer_index)
    }

    pub fn is_dealer(&self, id: &PlayerId) -> bool {
        self.dealer().is_some_and(|dealer| &dealer.id == id)
    }

    pub fn current_player(&self) -> Option<&PlayerState> {
        self.players.get(self.current_player_index)
    }

    /// The other player on `id`'s team.
    pub fn partner_of(&self, id: &PlayerId) -> Option<&PlayerState> {
        let me = self.player(id)?;
        self.players
            .iter()
            .find(|player| player.team_id == me.team_id && player.id != me.id)
    }

    pub fn has_standing_bet(&self) -> bool {
        self.current_bets.iter().any(|bet| !bet.skipped)
    }

    pub fn highest_bet(&self) -> Option<&Bet> {
        highest_bet(&self.current_bets)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&PlayerState> {
        self.players.iter().find(|player| player.name == name)
    }
}
