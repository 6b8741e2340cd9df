//! Random card sampling by ordinal probing.
//!
//! Each slot draws a random 1-based position in the deck. When the card at
//! that position is not eligible the sampler walks forward one position at a
//! time, wrapping from the last position back to the first, and gives up
//! after visiting every position once.

use rand::Rng;

use super::store::CardStore;
use crate::domain::Card;
use crate::error::Result;

/// Map any position onto `1..=deck_size`. `deck_size` must be positive.
pub fn wrap_ordinal(ordinal: i64, deck_size: i64) -> i64 {
  (ordinal - 1).rem_euclid(deck_size) + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchivedCards {
  Skip,
  Allow,
}

pub struct CardSampler<'a, S: CardStore + ?Sized> {
  store: &'a S,
  deck_id: i64,
  deck_size: i64,
  archived: ArchivedCards,
}

impl<'a, S: CardStore + ?Sized> CardSampler<'a, S> {
  pub fn new(store: &'a S, deck_id: i64, deck_size: i64, archived: ArchivedCards) -> Self {
    Self {
      store,
      deck_id,
      deck_size,
      archived,
    }
  }

  /// Draw up to `count` distinct eligible cards.
  pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<Card>> {
    let mut chosen = Vec::with_capacity(count);
    self.sample_into(&mut chosen, count, rng)?;
    Ok(chosen)
  }

  /// Draw up to `count` more cards, appending them to `chosen`.
  ///
  /// Cards already in `chosen` count as duplicates. Returns how many cards
  /// were added, which is less than `count` when the deck ran out of
  /// eligible cards.
  pub fn sample_into<R: Rng + ?Sized>(
    &self,
    chosen: &mut Vec<Card>,
    count: usize,
    rng: &mut R,
  ) -> Result<usize> {
    if self.deck_size <= 0 || count == 0 {
      return Ok(0);
    }

    for added in 0..count {
      match self.probe(chosen, rng)? {
        Some(card) => chosen.push(card),
        None => {
          tracing::debug!(
            "Deck {} ran out of eligible cards after {} of {}",
            self.deck_id,
            added,
            count
          );
          return Ok(added);
        }
      }
    }

    Ok(count)
  }

  /// One slot: random start, then linear probing over at most `deck_size`
  /// distinct positions.
  fn probe<R: Rng + ?Sized>(&self, chosen: &[Card], rng: &mut R) -> Result<Option<Card>> {
    let mut ordinal = rng.random_range(1..=self.deck_size);
    let mut card = self.store.get_card_by_offset(self.deck_id, ordinal)?;
    let mut visited = 1;

    while !self.is_eligible(&card, chosen) {
      if visited >= self.deck_size {
        return Ok(None);
      }
      ordinal = wrap_ordinal(ordinal + 1, self.deck_size);
      card = self.store.get_card_by_offset(self.deck_id, ordinal)?;
      visited += 1;
    }

    Ok(Some(card))
  }

  fn is_eligible(&self, card: &Card, chosen: &[Card]) -> bool {
    if self.archived == ArchivedCards::Skip && card.status.is_archived() {
      return false;
    }
    !chosen.iter().any(|c| c.same_card(card))
  }
}
