use crate::model::card::{Card, DECK_SIZE, MAX_VALUE};
use crate::model::color::Color;
use crate::model::hand::Hand;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::array;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for color in Color::ALL.iter().copied() {
            for value in 0..=MAX_VALUE {
                cards.push(Card::new(color, value));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Deals round-robin into four hands of eight cards each.
    pub fn deal(&self) -> [Hand; 4] {
        let mut hands: [Hand; 4] = array::from_fn(|_| Hand::new());
        for (index, card) in self.cards.iter().enumerate() {
            hands[index % 4].add(*card);
        }
        hands
    }
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_32_unique_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.cards().len(), 32);
        let unique: HashSet<_> = deck.cards().iter().copied().collect();
        assert_eq!(unique.len(), 32);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(42);
        let deck_b = Deck::shuffled_with_seed(42);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = Deck::shuffled_with_seed(1);
        let deck_b = Deck::shuffled_with_seed(2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn deal_splits_eight_cards_per_hand() {
        let hands = Deck::shuffled_with_seed(7).deal();
        let mut seen = HashSet::new();
        for hand in &hands {
            assert_eq!(hand.len(), 8);
            for card in hand.iter() {
                assert!(seen.insert(*card));
            }
        }
        assert_eq!(seen.len(), 32);
    }
}
