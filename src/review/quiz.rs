//! Multiple-choice quiz sets: the target card plus distractors drawn from
//! the same deck.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sampler::{ArchivedCards, CardSampler};
use super::store::CardStore;
use crate::config;
use crate::domain::{Card, Deck};
use crate::error::Result;

/// The cards offered for one question, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSet {
  pub target: Card,
  pub choices: Vec<Card>,
}

impl QuizSet {
  pub fn offers(&self, card_id: i64) -> Option<&Card> {
    self.choices.iter().find(|c| c.id == card_id)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizBuild {
  Ready(QuizSet),
  /// The deck does not hold enough distinct cards to fill every choice
  InsufficientCards,
}

/// Build the quiz set for `target`.
///
/// Distractors may be archived cards; only the cards under review are
/// filtered by status.
pub fn build_quiz_set<S, R>(store: &S, target: &Card, deck: &Deck, rng: &mut R) -> Result<QuizBuild>
where
  S: CardStore + ?Sized,
  R: Rng + ?Sized,
{
  let mut members = Vec::with_capacity(config::QUIZ_CHOICES);
  members.push(target.clone());

  CardSampler::new(store, deck.id, deck.size, ArchivedCards::Allow).sample_into(
    &mut members,
    config::DISTRACTOR_COUNT,
    rng,
  )?;

  if members.len() < config::QUIZ_CHOICES {
    tracing::debug!(
      "Deck {} has only {} distinct cards for a quiz on card {}",
      deck.id,
      members.len(),
      target.id
    );
    return Ok(QuizBuild::InsufficientCards);
  }

  Ok(QuizBuild::Ready(QuizSet {
    target: target.clone(),
    choices: shuffle_by_removal(members, rng),
  }))
}

/// Fill display slots one at a time with a uniformly chosen remaining card
fn shuffle_by_removal<R: Rng + ?Sized>(mut remaining: Vec<Card>, rng: &mut R) -> Vec<Card> {
  let mut ordered = Vec::with_capacity(remaining.len());
  while !remaining.is_empty() {
    let idx = rng.random_range(0..remaining.len());
    ordered.push(remaining.swap_remove(idx));
  }
  ordered
}
