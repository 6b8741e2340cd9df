//! First-attempt results of a review session.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};

use crate::domain::{Card, Outcome};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewedCard {
  pub card: Card,
  pub outcome: Outcome,
}

/// Outcomes keyed by card id, in the order cards were first answered.
///
/// Each card's entry is written once; later attempts never change it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeMap {
  entries: IndexMap<i64, ReviewedCard>,
}

impl OutcomeMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record `outcome` unless the card already has one. Returns the outcome
  /// that is kept.
  pub fn record(&mut self, card: &Card, outcome: Outcome) -> Outcome {
    match self.entries.entry(card.id) {
      Entry::Occupied(existing) => existing.get().outcome,
      Entry::Vacant(slot) => {
        slot.insert(ReviewedCard {
          card: card.clone(),
          outcome,
        });
        outcome
      }
    }
  }

  pub fn get(&self, card_id: i64) -> Option<Outcome> {
    self.entries.get(&card_id).map(|r| r.outcome)
  }

  pub fn contains(&self, card_id: i64) -> bool {
    self.entries.contains_key(&card_id)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &ReviewedCard> {
    self.entries.values()
  }

  pub fn correct_count(&self) -> usize {
    self.iter().filter(|r| r.outcome.is_correct()).count()
  }
}
