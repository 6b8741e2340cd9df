//! Test utilities: a temporary SQLite database and an in-memory card store.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tempfile::TempDir;

use crate::db::{self, DbPool};
use crate::domain::{Card, CardStatus, Deck};
use crate::error::{Result, ReviewError};
use crate::review::CardStore;

/// Test environment with a migrated database in a temporary directory.
///
/// The directory is removed when the environment is dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    pub pool: DbPool,
}

impl TestEnv {
    /// Create a test environment using the production `init_db` path
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let pool = db::init_db(&temp.path().join("flashcards.db"))?;
        Ok(Self { temp, pool })
    }

    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.pool.lock().unwrap()
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Insert a deck whose cards have the given fronts and `"{front} back"`
    /// backs, returning the deck id.
    pub fn deck_with_cards(&self, title: &str, fronts: &[&str]) -> i64 {
        let conn = self.conn();
        let deck_id = db::insert_deck(&conn, &Deck::new(title.to_string())).unwrap();
        for front in fronts {
            let card = Card::new(
                front.to_string(),
                format!("{} back", front),
                CardStatus::StillLearning,
                deck_id,
            );
            db::insert_card(&conn, &card).unwrap();
        }
        deck_id
    }
}

#[derive(Default)]
struct MemoryData {
    decks: Vec<Deck>,
    /// All cards in insertion order, which is also their ordinal order
    cards: Vec<Card>,
    next_id: i64,
}

/// In-memory [`CardStore`] that counts how it is used.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<MemoryData>,
    offset_lookups: AtomicUsize,
    deck_writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a deck with one card per status, fronts `"{title} 1"`, `"{title} 2"`, ...
    pub fn add_deck(&self, title: &str, statuses: &[CardStatus]) -> i64 {
        let cards: Vec<(String, String, CardStatus)> = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                (
                    format!("{} {}", title, i + 1),
                    format!("{} back {}", title, i + 1),
                    *status,
                )
            })
            .collect();
        self.add_deck_with_cards(title, &cards)
    }

    /// Add a deck of `count` cards that are all still being learned
    pub fn add_active_deck(&self, title: &str, count: usize) -> i64 {
        self.add_deck(title, &vec![CardStatus::StillLearning; count])
    }

    pub fn add_deck_with_cards(&self, title: &str, cards: &[(String, String, CardStatus)]) -> i64 {
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        let deck_id = data.next_id;

        let mut deck = Deck::new(title.to_string());
        deck.id = deck_id;
        deck.size = cards.len() as i64;
        data.decks.push(deck);

        for (front, back, status) in cards {
            data.next_id += 1;
            let mut card = Card::new(front.clone(), back.clone(), *status, deck_id);
            card.id = data.next_id;
            data.cards.push(card);
        }
        deck_id
    }

    /// Append a card to a deck, growing its size the way the card CRUD layer does
    pub fn add_card(&self, deck_id: i64, front: &str, status: CardStatus) -> Card {
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        let mut card = Card::new(front.to_string(), format!("{} back", front), status, deck_id);
        card.id = data.next_id;
        data.cards.push(card.clone());
        if let Some(deck) = data.decks.iter_mut().find(|d| d.id == deck_id) {
            deck.size += 1;
        }
        card
    }

    /// Delete a card and shrink its deck
    pub fn remove_card(&self, card_id: i64) {
        let mut data = self.data.lock().unwrap();
        let Some(index) = data.cards.iter().position(|c| c.id == card_id) else {
            return;
        };
        let card = data.cards.remove(index);
        if let Some(deck) = data.decks.iter_mut().find(|d| d.id == card.deck_id) {
            deck.size -= 1;
        }
    }

    pub fn set_front(&self, card_id: i64, front: &str) {
        let mut data = self.data.lock().unwrap();
        if let Some(card) = data.cards.iter_mut().find(|c| c.id == card_id) {
            card.front = front.to_string();
        }
    }

    /// Delete a deck and its cards
    pub fn remove_deck(&self, deck_id: i64) {
        let mut data = self.data.lock().unwrap();
        data.decks.retain(|d| d.id != deck_id);
        data.cards.retain(|c| c.deck_id != deck_id);
    }

    /// Cards of a deck in ordinal order
    pub fn cards_in_deck(&self, deck_id: i64) -> Vec<Card> {
        let data = self.data.lock().unwrap();
        data.cards.iter().filter(|c| c.deck_id == deck_id).cloned().collect()
    }

    pub fn offset_lookups(&self) -> usize {
        self.offset_lookups.load(Ordering::SeqCst)
    }

    pub fn deck_writes(&self) -> usize {
        self.deck_writes.load(Ordering::SeqCst)
    }
}

impl CardStore for MemoryStore {
    fn get_deck(&self, deck_id: i64) -> Result<Deck> {
        let data = self.data.lock().unwrap();
        data.decks
            .iter()
            .find(|d| d.id == deck_id)
            .cloned()
            .ok_or(ReviewError::DeckNotFound(deck_id))
    }

    fn get_card_by_offset(&self, deck_id: i64, ordinal: i64) -> Result<Card> {
        self.offset_lookups.fetch_add(1, Ordering::SeqCst);
        let data = self.data.lock().unwrap();
        let index = usize::try_from(ordinal - 1)
            .map_err(|_| ReviewError::OrdinalNotFound { deck_id, ordinal })?;
        data.cards
            .iter()
            .filter(|c| c.deck_id == deck_id)
            .nth(index)
            .cloned()
            .ok_or(ReviewError::OrdinalNotFound { deck_id, ordinal })
    }

    fn get_card(&self, card_id: i64) -> Result<Card> {
        let data = self.data.lock().unwrap();
        data.cards
            .iter()
            .find(|c| c.id == card_id)
            .cloned()
            .ok_or(ReviewError::CardNotFound(card_id))
    }

    fn update_deck(&self, deck: &Deck) -> Result<()> {
        self.deck_writes.fetch_add(1, Ordering::SeqCst);
        let mut data = self.data.lock().unwrap();
        match data.decks.iter_mut().find(|d| d.id == deck.id) {
            Some(stored) => {
                *stored = deck.clone();
                Ok(())
            }
            None => Err(ReviewError::DeckNotFound(deck.id)),
        }
    }
}
