use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::Card;

/// Cards still to be answered correctly, in presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingQueue {
  cards: VecDeque<Card>,
}

impl PendingQueue {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn head(&self) -> Option<&Card> {
    self.cards.front()
  }

  /// Requeue a card at the end
  pub fn push_back(&mut self, card: Card) {
    self.cards.push_back(card);
  }

  /// Remove the first occurrence of `card`, returning whether one was found
  pub fn remove_first(&mut self, card: &Card) -> bool {
    match self.cards.iter().position(|c| c.same_card(card)) {
      Some(idx) => self.cards.remove(idx).is_some(),
      None => false,
    }
  }

  pub fn len(&self) -> usize {
    self.cards.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cards.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Card> {
    self.cards.iter()
  }
}

impl From<Vec<Card>> for PendingQueue {
  fn from(cards: Vec<Card>) -> Self {
    Self {
      cards: cards.into(),
    }
  }
}
