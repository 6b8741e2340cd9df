use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::review::Outcome;

/// A named collection of cards with aggregate score counters.
///
/// `size` is denormalized: the card CRUD layer keeps it equal to the number
/// of cards referencing this deck. Sampling relies on it for ordinal bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
  pub id: i64,
  pub title: String,
  pub size: i64,
  pub correct_count: i64,
  pub wrong_count: i64,
  pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl Deck {
  pub fn new(title: String) -> Self {
    Self {
      id: 0,
      title,
      size: 0,
      correct_count: 0,
      wrong_count: 0,
      last_reviewed_at: None,
    }
  }

  pub fn guessed_right(&mut self, at: DateTime<Utc>) {
    self.correct_count += 1;
    self.last_reviewed_at = Some(at);
  }

  pub fn guessed_wrong(&mut self, at: DateTime<Utc>) {
    self.wrong_count += 1;
    self.last_reviewed_at = Some(at);
  }

  pub fn record(&mut self, outcome: Outcome, at: DateTime<Utc>) {
    match outcome {
      Outcome::Correct => self.guessed_right(at),
      Outcome::Incorrect => self.guessed_wrong(at),
    }
  }

  pub fn total_attempts(&self) -> i64 {
    self.correct_count + self.wrong_count
  }

  /// Share of correct answers as a percentage, 0 when never reviewed
  pub fn percent_right(&self) -> f64 {
    let total = self.total_attempts();
    if total > 0 {
      self.correct_count as f64 * 100.0 / total as f64
    } else {
      0.0
    }
  }
}
