use redzero_core::model::card::Card;
use redzero_core::model::color::Color;

/// Picks the trump color for a contract holder.
pub struct TrumpPlanner;

impl TrumpPlanner {
    /// Longest color wins, then the higher value sum. Full ties go to the
    /// earlier color, so red (and a held red-0 with it) is kept first.
    pub fn choose(hand: &[Card]) -> Color {
        let mut best = Color::Red;
        let mut best_key = (0usize, 0u32);
        for color in Color::ALL {
            let (count, sum) = hand
                .iter()
                .filter(|card| card.color == color)
                .fold((0usize, 0u32), |(count, sum), card| {
                    (count + 1, sum + u32::from(card.value))
                });
            let key = (count, sum);
            if key > best_key {
                best = color;
                best_key = key;
            }
        }
        best
    }
}
