use rusqlite::{params, Connection, Result};

use crate::domain::{Card, CardStatus};

/// Insert a card and count it towards its deck's size
pub fn insert_card(conn: &Connection, card: &Card) -> Result<i64> {
  let tx = conn.unchecked_transaction()?;
  tx.execute(
    "INSERT INTO cards (front, back, status, deck_id) VALUES (?1, ?2, ?3, ?4)",
    params![card.front, card.back, card.status.as_str(), card.deck_id],
  )?;
  let id = tx.last_insert_rowid();
  tx.execute(
    "UPDATE decks SET size = size + 1 WHERE deck_id = ?1",
    params![card.deck_id],
  )?;
  tx.commit()?;
  Ok(id)
}

/// Update a card's text, status and deck.
///
/// Moving a card to another deck moves one unit of `size` along with it.
/// Returns false if the card does not exist.
pub fn update_card(conn: &Connection, card: &Card) -> Result<bool> {
  let tx = conn.unchecked_transaction()?;
  let old_deck_id = match deck_of_card(&tx, card.id)? {
    Some(id) => id,
    None => return Ok(false),
  };

  tx.execute(
    "UPDATE cards SET front = ?1, back = ?2, status = ?3, deck_id = ?4 WHERE card_id = ?5",
    params![card.front, card.back, card.status.as_str(), card.deck_id, card.id],
  )?;

  if old_deck_id != card.deck_id {
    tx.execute(
      "UPDATE decks SET size = size - 1 WHERE deck_id = ?1",
      params![old_deck_id],
    )?;
    tx.execute(
      "UPDATE decks SET size = size + 1 WHERE deck_id = ?1",
      params![card.deck_id],
    )?;
  }

  tx.commit()?;
  Ok(true)
}

/// Delete a card and remove it from its deck's size
pub fn delete_card(conn: &Connection, card_id: i64) -> Result<bool> {
  let tx = conn.unchecked_transaction()?;
  let deck_id = match deck_of_card(&tx, card_id)? {
    Some(id) => id,
    None => return Ok(false),
  };

  tx.execute("DELETE FROM cards WHERE card_id = ?1", params![card_id])?;
  tx.execute(
    "UPDATE decks SET size = size - 1 WHERE deck_id = ?1",
    params![deck_id],
  )?;
  tx.commit()?;
  Ok(true)
}

fn deck_of_card(conn: &Connection, card_id: i64) -> Result<Option<i64>> {
  let result = conn.query_row(
    "SELECT deck_id FROM cards WHERE card_id = ?1",
    params![card_id],
    |row| row.get(0),
  );

  match result {
    Ok(deck_id) => Ok(Some(deck_id)),
    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
    Err(e) => Err(e),
  }
}

pub fn get_card_by_id(conn: &Connection, card_id: i64) -> Result<Option<Card>> {
  let mut stmt = conn.prepare(
    "SELECT card_id, front, back, status, deck_id FROM cards WHERE card_id = ?1",
  )?;

  let mut rows = stmt.query(params![card_id])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row_to_card(row)?))
  } else {
    Ok(None)
  }
}

/// Get the card at a 1-based position within a deck.
///
/// Positions follow card id order, the same order as
/// [`get_cards_in_deck`]. Callers bound the position with the deck's size.
pub fn get_card_by_offset(conn: &Connection, deck_id: i64, ordinal: i64) -> Result<Option<Card>> {
  if ordinal < 1 {
    return Ok(None);
  }

  let mut stmt = conn.prepare(
    r#"
    SELECT card_id, front, back, status, deck_id
    FROM cards
    WHERE deck_id = ?1
    ORDER BY card_id
    LIMIT 1 OFFSET ?2
    "#,
  )?;

  let mut rows = stmt.query(params![deck_id, ordinal - 1])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row_to_card(row)?))
  } else {
    Ok(None)
  }
}

pub fn get_cards_in_deck(conn: &Connection, deck_id: i64) -> Result<Vec<Card>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT card_id, front, back, status, deck_id
    FROM cards
    WHERE deck_id = ?1
    ORDER BY card_id
    "#,
  )?;

  let cards = stmt
    .query_map(params![deck_id], |row| row_to_card(row))?
    .collect::<Result<Vec<_>>>()?;
  Ok(cards)
}

/// Case-insensitive substring search over front and back text
pub fn search_cards(conn: &Connection, query: &str) -> Result<Vec<Card>> {
  let pattern = format!("%{}%", query.to_lowercase());
  let mut stmt = conn.prepare(
    r#"
    SELECT card_id, front, back, status, deck_id
    FROM cards
    WHERE lower(front) LIKE ?1 OR lower(back) LIKE ?1
    ORDER BY card_id
    "#,
  )?;

  let cards = stmt
    .query_map(params![pattern], |row| row_to_card(row))?
    .collect::<Result<Vec<_>>>()?;
  Ok(cards)
}

/// Live card count for a deck, the value `decks.size` has to match
pub fn count_cards_in_deck(conn: &Connection, deck_id: i64) -> Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM cards WHERE deck_id = ?1",
    params![deck_id],
    |row| row.get(0),
  )
}

fn row_to_card(row: &rusqlite::Row) -> Result<Card> {
  let status_str: String = row.get(3)?;

  Ok(Card {
    id: row.get(0)?,
    front: row.get(1)?,
    back: row.get(2)?,
    status: CardStatus::from_str(&status_str).unwrap_or_default(),
    deck_id: row.get(4)?,
  })
}
