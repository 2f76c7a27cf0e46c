use crate::model::card::Card;
use crate::model::color::Color;
use crate::model::player::PlayerId;
use crate::rules;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TRICK_SIZE: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trick {
    plays: Vec<Play>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    pub player_id: PlayerId,
    pub card: Card,
}

impl Play {
    pub fn new(player_id: impl Into<PlayerId>, card: Card) -> Self {
        Self {
            player_id: player_id.into(),
            card,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrickError {
    TrickComplete,
    AlreadyPlayed(PlayerId),
}

impl fmt::Display for TrickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrickError::TrickComplete => write!(f, "trick already complete"),
            TrickError::AlreadyPlayed(player) => {
                write!(f, "{player} has already played this trick")
            }
        }
    }
}

impl std::error::Error for TrickError {}

impl Trick {
    pub fn new() -> Self {
        Self {
            plays: Vec::with_capacity(TRICK_SIZE),
        }
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() >= TRICK_SIZE
    }

    pub fn lead_color(&self) -> Option<Color> {
        self.plays.first().map(|play| play.card.color)
    }

    pub fn contains(&self, card: Card) -> bool {
        self.plays.iter().any(|play| play.card == card)
    }

    pub fn play(&mut self, player: PlayerId, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        if self.plays.iter().any(|play| play.player_id == player) {
            return Err(TrickError::AlreadyPlayed(player));
        }

        self.plays.push(Play {
            player_id: player,
            card,
        });
        Ok(())
    }

    /// The trick as it would stand after `player` adds `card`.
    pub fn with_play(&self, player: &PlayerId, card: Card) -> Trick {
        let mut next = self.clone();
        next.plays.push(Play {
            player_id: player.clone(),
            card,
        });
        next
    }

    pub fn winner(&self, trump: Option<Color>) -> Option<&PlayerId> {
        rules::trick_winner(&self.plays, trump)
    }

    pub fn value(&self) -> i32 {
        rules::trick_value(&self.plays)
    }
}

impl From<Vec<Play>> for Trick {
    fn from(plays: Vec<Play>) -> Self {
        Self { plays }
    }
}

#[cfg(test)]
mod tests {
    use super::{Play, Trick, TrickError};
    use crate::model::card::Card;
    use crate::model::color::Color;
    use crate::model::player::PlayerId;

    fn id(raw: &str) -> PlayerId {
        PlayerId::from(raw)
    }

    #[test]
    fn rejects_fifth_play_and_repeat_players() {
        let mut trick = Trick::new();
        trick.play(id("a"), Card::new(Color::Red, 1)).unwrap();
        assert_eq!(
            trick.play(id("a"), Card::new(Color::Red, 2)),
            Err(TrickError::AlreadyPlayed(id("a")))
        );
        trick.play(id("b"), Card::new(Color::Red, 2)).unwrap();
        trick.play(id("c"), Card::new(Color::Red, 3)).unwrap();
        trick.play(id("d"), Card::new(Color::Red, 4)).unwrap();
        assert!(trick.is_complete());
        assert_eq!(
            trick.play(id("e"), Card::new(Color::Red, 5)),
            Err(TrickError::TrickComplete)
        );
    }

    #[test]
    fn winner_respects_trump() {
        let mut trick = Trick::new();
        trick.play(id("a"), Card::new(Color::Green, 7)).unwrap();
        trick.play(id("b"), Card::new(Color::Blue, 1)).unwrap();
        trick.play(id("c"), Card::new(Color::Green, 2)).unwrap();
        assert_eq!(trick.winner(None), Some(&id("a")));
        assert_eq!(trick.winner(Some(Color::Blue)), Some(&id("b")));
        assert_eq!(trick.lead_color(), Some(Color::Green));
    }

    #[test]
    fn with_play_leaves_original_untouched() {
        let trick = Trick::from(vec![Play::new("a", Card::new(Color::Red, 3))]);
        let next = trick.with_play(&id("b"), Card::RED_ZERO);
        assert_eq!(trick.len(), 1);
        assert_eq!(next.len(), 2);
        assert_eq!(next.value(), 6);
    }

    #[test]
    fn deserializes_from_entry_array() {
        let json = r#"[{"playerId":"p1","card":{"color":"red","value":0}}]"#;
        let trick: Trick = serde_json::from_str(json).unwrap();
        assert_eq!(trick.plays()[0].player_id, id("p1"));
        assert!(trick.contains(Card::RED_ZERO));
    }
}
