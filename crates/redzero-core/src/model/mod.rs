pub mod bet;
pub mod card;
pub mod color;
pub mod deck;
pub mod hand;
pub mod player;
pub mod state;
pub mod trick;
