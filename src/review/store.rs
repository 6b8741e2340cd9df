//! The storage port a review session reads cards and decks through.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Card, Deck, Outcome};
use crate::error::Result;

/// Lookups and writes a review session needs from deck/card storage.
///
/// Missing records are reported as the matching `*NotFound` error; the
/// session treats them as fatal.
pub trait CardStore {
  fn get_deck(&self, deck_id: i64) -> Result<Deck>;

  /// Card at a 1-based position within the deck
  fn get_card_by_offset(&self, deck_id: i64, ordinal: i64) -> Result<Card>;

  fn get_card(&self, card_id: i64) -> Result<Card>;

  /// Overwrite the stored deck with this record. Implementations may apply
  /// the write later, so a read right after may not see it yet.
  fn update_deck(&self, deck: &Deck) -> Result<()>;

  /// Count one answer against the stored deck.
  ///
  /// The default re-reads the deck and overwrites it. Stores shared between
  /// sessions should increment in place instead, so no attempt is lost to a
  /// concurrent writer.
  fn record_attempt(&self, deck_id: i64, outcome: Outcome, at: DateTime<Utc>) -> Result<()> {
    let mut deck = self.get_deck(deck_id)?;
    deck.record(outcome, at);
    self.update_deck(&deck)
  }
}

impl<S: CardStore + ?Sized> CardStore for &S {
  fn get_deck(&self, deck_id: i64) -> Result<Deck> {
    (**self).get_deck(deck_id)
  }

  fn get_card_by_offset(&self, deck_id: i64, ordinal: i64) -> Result<Card> {
    (**self).get_card_by_offset(deck_id, ordinal)
  }

  fn get_card(&self, card_id: i64) -> Result<Card> {
    (**self).get_card(card_id)
  }

  fn update_deck(&self, deck: &Deck) -> Result<()> {
    (**self).update_deck(deck)
  }

  fn record_attempt(&self, deck_id: i64, outcome: Outcome, at: DateTime<Utc>) -> Result<()> {
    (**self).record_attempt(deck_id, outcome, at)
  }
}

impl<S: CardStore + ?Sized> CardStore for Arc<S> {
  fn get_deck(&self, deck_id: i64) -> Result<Deck> {
    (**self).get_deck(deck_id)
  }

  fn get_card_by_offset(&self, deck_id: i64, ordinal: i64) -> Result<Card> {
    (**self).get_card_by_offset(deck_id, ordinal)
  }

  fn get_card(&self, card_id: i64) -> Result<Card> {
    (**self).get_card(card_id)
  }

  fn update_deck(&self, deck: &Deck) -> Result<()> {
    (**self).update_deck(deck)
  }

  fn record_attempt(&self, deck_id: i64, outcome: Outcome, at: DateTime<Utc>) -> Result<()> {
    (**self).record_attempt(deck_id, outcome, at)
  }
}
