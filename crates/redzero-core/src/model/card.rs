use crate::model::color::Color;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Highest face value of any card.
pub const MAX_VALUE: u8 = 7;

/// Number of distinct cards in a deck (4 colors x 8 values).
pub const DECK_SIZE: usize = 32;

const VALUES_PER_COLOR: usize = MAX_VALUE as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCard")]
pub struct Card {
    pub color: Color,
    pub value: u8,
}

/// Wire form of a card before the value range is checked.
#[derive(Deserialize)]
struct RawCard {
    color: Color,
    value: u8,
}

impl TryFrom<RawCard> for Card {
    type Error = CardError;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        Card::try_new(raw.color, raw.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardError {
    ValueOutOfRange(u8),
    IndexOutOfRange(usize),
}

impl fmt::Display for CardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardError::ValueOutOfRange(value) => {
                write!(f, "card value {value} is outside 0..={MAX_VALUE}")
            }
            CardError::IndexOutOfRange(index) => {
                write!(f, "card index {index} is outside 0..{DECK_SIZE}")
            }
        }
    }
}

impl std::error::Error for CardError {}

impl Card {
    /// Bonus card: capturing it is worth extra.
    pub const RED_ZERO: Card = Card::new(Color::Red, 0);
    /// Penalty card: capturing it costs points.
    pub const BROWN_ZERO: Card = Card::new(Color::Brown, 0);

    pub const fn new(color: Color, value: u8) -> Self {
        Self { color, value }
    }

    pub fn try_new(color: Color, value: u8) -> Result<Self, CardError> {
        if value > MAX_VALUE {
            return Err(CardError::ValueOutOfRange(value));
        }
        Ok(Self::new(color, value))
    }

    pub const fn is_red_zero(self) -> bool {
        matches!(self.color, Color::Red) && self.value == 0
    }

    pub const fn is_brown_zero(self) -> bool {
        matches!(self.color, Color::Brown) && self.value == 0
    }

    pub const fn is_special(self) -> bool {
        self.is_red_zero() || self.is_brown_zero()
    }

    /// Dense index in `0..DECK_SIZE`, grouped by color.
    pub const fn index(self) -> usize {
        self.color.index() * VALUES_PER_COLOR + self.value as usize
    }

    pub fn from_index(index: usize) -> Result<Self, CardError> {
        let color = Color::from_index(index / VALUES_PER_COLOR)
            .ok_or(CardError::IndexOutOfRange(index))?;
        Ok(Self::new(color, (index % VALUES_PER_COLOR) as u8))
    }

    pub const fn sort_key(self) -> (u8, u8) {
        (self.color as u8, self.value)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, CardError, DECK_SIZE};
    use crate::model::color::Color;

    #[test]
    fn special_cards_identified() {
        assert!(Card::RED_ZERO.is_red_zero());
        assert!(Card::RED_ZERO.is_special());
        assert!(Card::BROWN_ZERO.is_brown_zero());
        assert!(!Card::new(Color::Green, 0).is_special());
        assert!(!Card::new(Color::Red, 1).is_red_zero());
    }

    #[test]
    fn try_new_rejects_out_of_range_values() {
        assert_eq!(
            Card::try_new(Color::Blue, 8),
            Err(CardError::ValueOutOfRange(8))
        );
        assert!(Card::try_new(Color::Blue, 7).is_ok());
    }

    #[test]
    fn index_covers_whole_deck() {
        for index in 0..DECK_SIZE {
            let card = Card::from_index(index).unwrap();
            assert_eq!(card.index(), index);
        }
        assert!(Card::from_index(DECK_SIZE).is_err());
    }

    #[test]
    fn display_is_color_letter_then_value() {
        assert_eq!(Card::RED_ZERO.to_string(), "R0");
        assert_eq!(Card::BROWN_ZERO.to_string(), "B0");
        assert_eq!(Card::new(Color::Green, 7).to_string(), "G7");
        assert_eq!(Card::new(Color::Blue, 3).to_string(), "U3");
    }

    #[test]
    fn deserialize_checks_value_range() {
        let card: Card = serde_json::from_str(r#"{"color":"green","value":7}"#).unwrap();
        assert_eq!(card, Card::new(Color::Green, 7));

        let err = serde_json::from_str::<Card>(r#"{"color":"red","value":8}"#).unwrap_err();
        assert!(err.to_string().contains("card value 8"));
        assert!(serde_json::from_str::<Card>(r#"{"color":"blue","value":9}"#).is_err());
    }
}
