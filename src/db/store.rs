//! SQLite-backed [`CardStore`] with an optional background deck writer.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::{
  get_card_by_id, get_card_by_offset, get_deck_by_id, record_deck_attempt, try_lock, update_deck,
  DbPool,
};
use crate::domain::{Card, Deck, Outcome};
use crate::error::{Result, ReviewError};
use crate::review::CardStore;

/// A deck write waiting for the writer task
#[derive(Debug)]
enum DeckWrite {
  Overwrite(Deck),
  Attempt {
    deck_id: i64,
    outcome: Outcome,
    at: DateTime<Utc>,
  },
}

impl DeckWrite {
  fn deck_id(&self) -> i64 {
    match self {
      Self::Overwrite(deck) => deck.id,
      Self::Attempt { deck_id, .. } => *deck_id,
    }
  }
}

#[derive(Clone)]
pub struct SqliteStore {
  pool: DbPool,
  writer: Option<mpsc::UnboundedSender<DeckWrite>>,
}

impl SqliteStore {
  /// Store that writes deck updates synchronously
  pub fn new(pool: DbPool) -> Self {
    Self { pool, writer: None }
  }

  /// Store whose deck updates are queued and applied in order by a single
  /// writer task, so answering a card never waits on the database.
  ///
  /// Must be called from within a tokio runtime.
  pub fn with_write_queue(pool: DbPool) -> Self {
    let (tx, mut rx) = mpsc::unbounded_channel::<DeckWrite>();
    let writer_pool = pool.clone();

    tokio::spawn(async move {
      while let Some(write) = rx.recv().await {
        let pool = writer_pool.clone();
        let deck_id = write.deck_id();
        match tokio::task::spawn_blocking(move || apply(&pool, &write)).await {
          Ok(Ok(())) => {}
          Ok(Err(e)) => tracing::warn!("Failed to write deck {}: {}", deck_id, e),
          Err(e) => tracing::warn!("Deck writer task for deck {} failed: {}", deck_id, e),
        }
      }
      tracing::debug!("Deck write queue closed");
    });

    Self {
      pool,
      writer: Some(tx),
    }
  }

  fn submit(&self, write: DeckWrite) -> Result<()> {
    if let Some(writer) = &self.writer {
      match writer.send(write) {
        Ok(()) => return Ok(()),
        Err(mpsc::error::SendError(write)) => {
          tracing::warn!("Deck write queue closed, writing deck {} directly", write.deck_id());
          return apply(&self.pool, &write);
        }
      }
    }
    apply(&self.pool, &write)
  }
}

fn apply(pool: &DbPool, write: &DeckWrite) -> Result<()> {
  let conn = try_lock(pool)?;
  let found = match write {
    DeckWrite::Overwrite(deck) => update_deck(&conn, deck)?,
    DeckWrite::Attempt {
      deck_id,
      outcome,
      at,
    } => record_deck_attempt(&conn, *deck_id, *outcome, *at)?,
  };
  if !found {
    // The deck was deleted while a session was still scoring it
    tracing::debug!("Skipped score update for deleted deck {}", write.deck_id());
  }
  Ok(())
}

impl CardStore for SqliteStore {
  fn get_deck(&self, deck_id: i64) -> Result<Deck> {
    let conn = try_lock(&self.pool)?;
    get_deck_by_id(&conn, deck_id)?.ok_or(ReviewError::DeckNotFound(deck_id))
  }

  fn get_card_by_offset(&self, deck_id: i64, ordinal: i64) -> Result<Card> {
    let conn = try_lock(&self.pool)?;
    get_card_by_offset(&conn, deck_id, ordinal)?
      .ok_or(ReviewError::OrdinalNotFound { deck_id, ordinal })
  }

  fn get_card(&self, card_id: i64) -> Result<Card> {
    let conn = try_lock(&self.pool)?;
    get_card_by_id(&conn, card_id)?.ok_or(ReviewError::CardNotFound(card_id))
  }

  fn update_deck(&self, deck: &Deck) -> Result<()> {
    self.submit(DeckWrite::Overwrite(deck.clone()))
  }

  fn record_attempt(&self, deck_id: i64, outcome: Outcome, at: DateTime<Utc>) -> Result<()> {
    self.submit(DeckWrite::Attempt {
      deck_id,
      outcome,
      at,
    })
  }
}
