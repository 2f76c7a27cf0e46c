//! Card ordering, legality and trick resolution shared by the bots and the
//! local table driver. The authoritative server applies the same rules.

use crate::model::card::Card;
use crate::model::color::Color;
use crate::model::player::PlayerId;
use crate::model::trick::Play;

pub const TRUMP_POWER_BASE: u8 = 100;
pub const LED_POWER_BASE: u8 = 50;

/// Base worth of any captured trick.
pub const TRICK_BASE_VALUE: i32 = 1;
pub const RED_ZERO_BONUS: i32 = 5;
pub const BROWN_ZERO_PENALTY: i32 = -3;

/// Strength of `card` within a trick: trump beats the led color, which beats
/// everything else.
pub fn card_power(card: Card, trump: Option<Color>, led: Option<Color>) -> u8 {
    if Some(card.color) == trump {
        TRUMP_POWER_BASE + card.value
    } else if Some(card.color) == led {
        LED_POWER_BASE + card.value
    } else {
        card.value
    }
}

/// Cards from `hand` that may be played onto `trick` (must follow the led color).
pub fn legal_plays(hand: &[Card], trick: &[Play]) -> Vec<Card> {
    let Some(led) = trick.first().map(|play| play.card.color) else {
        return hand.to_vec();
    };
    let following: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|card| card.color == led)
        .collect();
    if following.is_empty() {
        hand.to_vec()
    } else {
        following
    }
}

pub fn trick_winner(trick: &[Play], trump: Option<Color>) -> Option<&PlayerId> {
    let led = trick.first().map(|play| play.card.color);
    trick
        .iter()
        .max_by_key(|play| card_power(play.card, trump, led))
        .map(|play| &play.player_id)
}

pub fn trick_value(trick: &[Play]) -> i32 {
    let mut value = TRICK_BASE_VALUE;
    if trick.iter().any(|play| play.card.is_red_zero()) {
        value += RED_ZERO_BONUS;
    }
    if trick.iter().any(|play| play.card.is_brown_zero()) {
        value += BROWN_ZERO_PENALTY;
    }
    value
}

/// Whether `player` would hold the trick after adding `card` to it.
pub fn can_win(trick: &[Play], player: &PlayerId, card: Card, trump: Option<Color>) -> bool {
    let led = trick
        .first()
        .map(|play| play.card.color)
        .or(Some(card.color));
    let power = card_power(card, trump, led);
    let beats_all = trick
        .iter()
        .all(|play| card_power(play.card, trump, led) < power);
    beats_all && !trick.iter().any(|play| &play.player_id == player)
}
