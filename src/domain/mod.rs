pub mod card;
pub mod deck;
pub mod review;

pub use card::{Card, CardStatus};
pub use deck::Deck;
pub use review::Outcome;
