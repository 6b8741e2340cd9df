use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::{Deck, Outcome};

/// Insert a new deck. Decks always start empty; `size` grows as cards are
/// inserted through [`super::insert_card`].
pub fn insert_deck(conn: &Connection, deck: &Deck) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO decks (title, size, correct_count, wrong_count, last_reviewed_at)
    VALUES (?1, 0, ?2, ?3, ?4)
    "#,
    params![
      deck.title,
      deck.correct_count,
      deck.wrong_count,
      deck.last_reviewed_at.map(|dt| dt.to_rfc3339()),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Overwrite a deck's title and score fields with the given record.
///
/// `size` is deliberately not written: it belongs to the card CRUD
/// functions, and a deck record held by a long-running review session must
/// not roll back cards added in the meantime.
pub fn update_deck(conn: &Connection, deck: &Deck) -> Result<bool> {
  let changed = conn.execute(
    r#"
    UPDATE decks
    SET title = ?1, correct_count = ?2, wrong_count = ?3, last_reviewed_at = ?4
    WHERE deck_id = ?5
    "#,
    params![
      deck.title,
      deck.correct_count,
      deck.wrong_count,
      deck.last_reviewed_at.map(|dt| dt.to_rfc3339()),
      deck.id,
    ],
  )?;
  Ok(changed > 0)
}

/// Count one answer against a deck in place.
///
/// Increments rather than overwrites, so concurrent sessions on the same
/// deck never lose each other's attempts. Returns false if the deck is gone.
pub fn record_deck_attempt(
  conn: &Connection,
  deck_id: i64,
  outcome: Outcome,
  at: DateTime<Utc>,
) -> Result<bool> {
  let (correct, wrong) = match outcome {
    Outcome::Correct => (1, 0),
    Outcome::Incorrect => (0, 1),
  };
  let changed = conn.execute(
    r#"
    UPDATE decks
    SET correct_count = correct_count + ?1, wrong_count = wrong_count + ?2, last_reviewed_at = ?3
    WHERE deck_id = ?4
    "#,
    params![correct, wrong, at.to_rfc3339(), deck_id],
  )?;
  Ok(changed > 0)
}

/// Delete a deck together with all of its cards
pub fn delete_deck(conn: &Connection, deck_id: i64) -> Result<bool> {
  let changed = conn.execute("DELETE FROM decks WHERE deck_id = ?1", params![deck_id])?;
  Ok(changed > 0)
}

pub fn get_deck_by_id(conn: &Connection, deck_id: i64) -> Result<Option<Deck>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT deck_id, title, size, correct_count, wrong_count, last_reviewed_at
    FROM decks WHERE deck_id = ?1
    "#,
  )?;

  let mut rows = stmt.query(params![deck_id])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row_to_deck(row)?))
  } else {
    Ok(None)
  }
}

pub fn get_all_decks(conn: &Connection) -> Result<Vec<Deck>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT deck_id, title, size, correct_count, wrong_count, last_reviewed_at
    FROM decks
    ORDER BY deck_id
    "#,
  )?;

  let decks = stmt
    .query_map([], |row| row_to_deck(row))?
    .collect::<Result<Vec<_>>>()?;
  Ok(decks)
}

fn row_to_deck(row: &rusqlite::Row) -> Result<Deck> {
  let last_reviewed: Option<String> = row.get(5)?;

  Ok(Deck {
    id: row.get(0)?,
    title: row.get(1)?,
    size: row.get(2)?,
    correct_count: row.get(3)?,
    wrong_count: row.get(4)?,
    last_reviewed_at: last_reviewed.and_then(|s| {
      DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
    }),
  })
}
