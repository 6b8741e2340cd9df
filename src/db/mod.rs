pub mod cards;
pub mod decks;
pub mod schema;
pub mod store;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{Card, CardStatus, Deck};

// Re-export all public items from submodules
pub use cards::*;
pub use decks::*;
pub use schema::run_migrations;
pub use store::SqliteStore;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug)]
pub struct DbLockError;

impl std::fmt::Display for DbLockError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Database unavailable")
  }
}

impl std::error::Error for DbLockError {}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    DbLockError
  })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).ok();
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    if let Err(e) = std::fs::copy(path, &backup_path) {
      tracing::warn!("Could not create database backup: {}", e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

/// Populate an empty database with a few starter decks
pub fn seed_sample_decks(conn: &Connection) -> Result<()> {
  let count: i64 = conn.query_row("SELECT COUNT(*) FROM decks", [], |row| row.get(0))?;
  if count > 0 {
    return Ok(());
  }

  for (title, cards) in get_sample_deck_data() {
    let deck_id = insert_deck(conn, &Deck::new(title.to_string()))?;
    for (front, back) in cards {
      let card = Card::new(
        front.to_string(),
        back.to_string(),
        CardStatus::StillLearning,
        deck_id,
      );
      insert_card(conn, &card)?;
    }
  }

  tracing::info!("Seeded sample decks");
  Ok(())
}

fn get_sample_deck_data() -> Vec<(&'static str, Vec<(&'static str, &'static str)>)> {
  vec![
    (
      "Spanish Basics",
      vec![
        ("hola", "hello"),
        ("adiós", "goodbye"),
        ("gracias", "thank you"),
        ("por favor", "please"),
        ("perro", "dog"),
        ("gato", "cat"),
        ("agua", "water"),
        ("pan", "bread"),
        ("casa", "house"),
        ("libro", "book"),
      ],
    ),
    (
      "World Capitals",
      vec![
        ("Paris", "France"),
        ("Tokyo", "Japan"),
        ("Canberra", "Australia"),
        ("Ottawa", "Canada"),
        ("Nairobi", "Kenya"),
        ("Lima", "Peru"),
        ("Oslo", "Norway"),
        ("Hanoi", "Vietnam"),
        ("Cairo", "Egypt"),
        ("Brasília", "Brazil"),
      ],
    ),
    ("Chemistry Symbols", vec![("Na", "sodium"), ("Fe", "iron"), ("Au", "gold")]),
    ("Empty Deck", vec![]),
  ]
}
