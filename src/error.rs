//! Error types for review sessions and the storage they read from.

use thiserror::Error;

use crate::db::DbLockError;

#[derive(Debug, Error)]
pub enum ReviewError {
  #[error("Deck not found: {0}")]
  DeckNotFound(i64),

  #[error("Card not found: {0}")]
  CardNotFound(i64),

  /// The deck's size counter points past its last card
  #[error("No card at position {ordinal} of deck {deck_id}")]
  OrdinalNotFound { deck_id: i64, ordinal: i64 },

  #[error("No quiz is waiting for an answer")]
  NoQuizPending,

  #[error("Card {0} is not one of the offered choices")]
  ChoiceNotOffered(i64),

  #[error("Snapshot is for deck {found}, session reviews deck {expected}")]
  SnapshotMismatch { expected: i64, found: i64 },

  /// The snapshot names cards this deck cannot quiz
  #[error("Invalid snapshot: {0}")]
  InvalidSnapshot(String),

  #[error("Database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error(transparent)]
  Unavailable(#[from] DbLockError),
}

impl ReviewError {
  /// True for lookups the storage layer could not resolve. These abort the
  /// session: referential integrity is the CRUD layer's job.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::DeckNotFound(_) | Self::CardNotFound(_) | Self::OrdinalNotFound { .. }
    )
  }
}

pub type Result<T> = std::result::Result<T, ReviewError>;
