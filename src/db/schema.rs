use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Cascading card deletes depend on this; it is a per-connection setting
  conn.execute_batch("PRAGMA foreign_keys = ON;")?;

  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS decks (
      deck_id INTEGER PRIMARY KEY AUTOINCREMENT,
      title TEXT NOT NULL,
      size INTEGER NOT NULL DEFAULT 0,
      correct_count INTEGER NOT NULL DEFAULT 0,
      wrong_count INTEGER NOT NULL DEFAULT 0,
      last_reviewed_at TEXT
    );

    CREATE TABLE IF NOT EXISTS cards (
      card_id INTEGER PRIMARY KEY AUTOINCREMENT,
      front TEXT NOT NULL,
      back TEXT NOT NULL,
      status TEXT NOT NULL DEFAULT 'still_learning',
      deck_id INTEGER NOT NULL,
      FOREIGN KEY (deck_id) REFERENCES decks(deck_id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_cards_deck_id ON cards(deck_id);
    "#,
  )?;

  Ok(())
}
