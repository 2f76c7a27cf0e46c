//! Hand strength profile used for bidding.
//!
//! The evaluator turns a hand (and the trump color, when one is known) into
//! an estimated number of tricks, a quality tier and a recommended bet. It is
//! recomputed for every bidding decision and never cached.

use super::count_color;
use super::weights::BidWeights;
use rand::Rng;
use redzero_core::model::bet::{MAX_BET, MIN_BET};
use redzero_core::model::card::{Card, MAX_VALUE};
use redzero_core::model::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandQuality {
    Weak,
    Normal,
    Strong,
    Exceptional,
}

impl HandQuality {
    pub fn from_tricks(rounded_tricks: u8, weights: &BidWeights) -> Self {
        if rounded_tricks >= weights.exceptional_at {
            HandQuality::Exceptional
        } else if rounded_tricks >= weights.strong_at {
            HandQuality::Strong
        } else if rounded_tricks >= weights.normal_at {
            HandQuality::Normal
        } else {
            HandQuality::Weak
        }
    }

    pub const fn index(self) -> usize {
        match self {
            HandQuality::Weak => 0,
            HandQuality::Normal => 1,
            HandQuality::Strong => 2,
            HandQuality::Exceptional => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandAnalysis {
    pub trump_count: usize,
    /// Sum of trump values held.
    pub trump_strength: u32,
    pub high_cards: usize,
    pub has_red_zero: bool,
    pub has_brown_zero: bool,
    pub color_counts: [usize; 4],
    pub longest_color: Option<Color>,
    pub longest_run: usize,
    pub four_of_color: bool,
    pub suit_control: [bool; 4],
    pub red_zero_controllable: bool,
    pub brown_zero_vulnerable: bool,
    pub estimated_tricks: f32,
    pub rounded_tricks: u8,
    pub hand_quality: HandQuality,
    pub recommended_bet: u8,
    pub should_bet_without_trump: bool,
}

impl HandAnalysis {
    pub fn evaluate<R: Rng + ?Sized>(
        hand: &[Card],
        trump: Option<Color>,
        weights: &BidWeights,
        rng: &mut R,
    ) -> Self {
        let trump_cards: Vec<Card> = match trump {
            Some(color) => hand.iter().copied().filter(|c| c.color == color).collect(),
            None => Vec::new(),
        };
        let trump_count = trump_cards.len();
        let trump_strength: u32 = trump_cards.iter().map(|c| u32::from(c.value)).sum();
        let high_cards = hand
            .iter()
            .filter(|c| c.value >= weights.high_card_min)
            .count();
        let has_red_zero = hand.contains(&Card::RED_ZERO);
        let has_brown_zero = hand.contains(&Card::BROWN_ZERO);

        let mut color_counts = [0usize; 4];
        for color in Color::ALL {
            color_counts[color.index()] = count_color(hand, color);
        }
        let (longest_color, longest_run) = longest_color(&color_counts);
        let four_of_color = color_counts.iter().any(|&n| n >= weights.four_of_color);

        let mut suit_control = [false; 4];
        for color in Color::ALL {
            let controls = hand
                .iter()
                .any(|c| c.color == color && c.value >= weights.control_card_min);
            suit_control[color.index()] =
                controls && color_counts[color.index()] >= weights.control_length_min;
        }

        let red_zero_controllable =
            red_zero_controllable(hand, trump, has_red_zero, trump_count, weights);
        let brown_zero_vulnerable = has_brown_zero
            || hand
                .iter()
                .filter(|c| c.color == Color::Brown)
                .all(|c| c.value <= weights.brown_low_max);

        let estimated_tricks = estimate_tricks(
            hand,
            trump,
            trump_count,
            trump_strength,
            &color_counts,
            has_red_zero && red_zero_controllable,
            has_brown_zero,
            weights,
        );
        let rounded_tricks = estimated_tricks.round().max(0.0) as u8;
        let hand_quality = HandQuality::from_tricks(rounded_tricks, weights);
        let recommended_bet = recommend_bet(hand_quality, weights, rng);

        let should_bet_without_trump = match longest_color {
            Some(color) => {
                longest_run >= weights.four_of_color
                    && suit_control[color.index()]
                    && high_cards >= weights.without_trump_high_cards
                    && !has_brown_zero
            }
            None => false,
        };

        Self {
            trump_count,
            trump_strength,
            high_cards,
            has_red_zero,
            has_brown_zero,
            color_counts,
            longest_color,
            longest_run,
            four_of_color,
            suit_control,
            red_zero_controllable,
            brown_zero_vulnerable,
            estimated_tricks,
            rounded_tricks,
            hand_quality,
            recommended_bet,
            should_bet_without_trump,
        }
    }

    pub fn has_suit_control(&self, color: Color) -> bool {
        self.suit_control[color.index()]
    }

    pub fn color_count(&self, color: Color) -> usize {
        self.color_counts[color.index()]
    }
}

/// Evaluates `hand` with the default weights.
pub fn analyze_hand<R: Rng + ?Sized>(hand: &[Card], trump: Option<Color>, rng: &mut R) -> HandAnalysis {
    HandAnalysis::evaluate(hand, trump, &BidWeights::default(), rng)
}

fn longest_color(counts: &[usize; 4]) -> (Option<Color>, usize) {
    let mut best: Option<(Color, usize)> = None;
    for color in Color::ALL {
        let count = counts[color.index()];
        if count == 0 {
            continue;
        }
        match best {
            Some((_, top)) if top >= count => {}
            _ => best = Some((color, count)),
        }
    }
    match best {
        Some((color, count)) => (Some(color), count),
        None => (None, 0),
    }
}

fn red_zero_controllable(
    hand: &[Card],
    trump: Option<Color>,
    held: bool,
    trump_count: usize,
    weights: &BidWeights,
) -> bool {
    if held {
        let red_support = hand
            .iter()
            .any(|c| c.color == Color::Red && !c.is_red_zero() && c.value >= weights.red_zero_support_min);
        red_support || trump_count >= weights.red_zero_support_trumps
    } else {
        // Capturable from an opponent with the red-7 or a solid trump.
        let red_top = hand.contains(&Card::new(Color::Red, MAX_VALUE));
        let strong_trump = trump.is_some_and(|color| {
            hand.iter()
                .any(|c| c.color == color && c.value >= weights.red_zero_support_min)
        });
        red_top || strong_trump
    }
}

#[allow(clippy::too_many_arguments)]
fn estimate_tricks(
    hand: &[Card],
    trump: Option<Color>,
    trump_count: usize,
    trump_strength: u32,
    color_counts: &[usize; 4],
    red_zero_in_control: bool,
    has_brown_zero: bool,
    weights: &BidWeights,
) -> f32 {
    let mut tricks = trump_count.min(weights.trump_trick_cap) as f32;
    if trump_strength >= weights.trump_strength_bonus_at {
        tricks += weights.trump_strength_bonus;
    }

    for color in Color::ALL {
        if Some(color) == trump {
            continue;
        }
        let has_seven = hand.contains(&Card::new(color, MAX_VALUE));
        let has_six = hand.contains(&Card::new(color, MAX_VALUE - 1));
        if has_seven {
            tricks += weights.seven_trick;
        } else if has_six {
            tricks += weights.six_trick;
        }
        if color_counts[color.index()] >= weights.four_of_color {
            tricks += weights.long_color_trick;
        }
    }

    if red_zero_in_control {
        tricks += weights.red_zero_controlled;
    }
    if has_brown_zero {
        tricks += weights.brown_zero_held;
    }
    tricks
}

fn recommend_bet<R: Rng + ?Sized>(quality: HandQuality, weights: &BidWeights, rng: &mut R) -> u8 {
    let bet = match quality {
        HandQuality::Exceptional => {
            if rng.gen_bool(weights.exceptional_raise_chance) {
                12
            } else {
                11
            }
        }
        HandQuality::Strong => {
            if rng.gen_bool(weights.strong_raise_chance) {
                10
            } else {
                9
            }
        }
        HandQuality::Normal => {
            if rng.gen_bool(weights.normal_raise_chance) {
                8
            } else {
                7
            }
        }
        HandQuality::Weak => MIN_BET,
    };
    bet.clamp(MIN_BET, MAX_BET)
}
