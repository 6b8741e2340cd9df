//! The review session controller.
//!
//! A session samples up to `SESSION_SIZE` cards from one deck and quizzes
//! them one at a time. Cards answered incorrectly go to the back of the
//! queue and come around again until they are answered correctly. Only the
//! first answer for each card is kept in the outcome map, while the deck's
//! score counters count every attempt.

use chrono::Utc;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::evaluator::evaluate;
use super::outcomes::OutcomeMap;
use super::queue::PendingQueue;
use super::quiz::{build_quiz_set, QuizBuild, QuizSet};
use super::sampler::{ArchivedCards, CardSampler};
use super::store::CardStore;
use crate::config;
use crate::db::LogOnError;
use crate::domain::{Card, Deck, Outcome};
use crate::error::{Result, ReviewError};

/// Where a session is in its question/answer cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
  /// Ready to quiz the head of the queue
  Presenting,
  AwaitingAnswer { quiz: QuizSet },
  /// The last answer was wrong; `card` is the one that should have been picked
  RevealingAnswer { card: Card },
  Done,
  /// The deck cannot fill a quiz. Terminal.
  InsufficientCards,
}

/// What the host should show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
  Quiz(QuizSet),
  InsufficientCards,
  Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answered {
  pub outcome: Outcome,
  pub correct_card: Card,
}

/// Everything needed to resume a session later, including a quiz that was
/// on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
  pub deck_id: i64,
  pub pending: PendingQueue,
  pub outcomes: OutcomeMap,
  pub phase: Phase,
}

pub struct ReviewSession<S: CardStore> {
  store: S,
  /// Deck as last read from the store, refreshed before every question
  deck: Deck,
  pending: PendingQueue,
  outcomes: OutcomeMap,
  phase: Phase,
  rng: StdRng,
}

impl<S: CardStore> ReviewSession<S> {
  /// Start reviewing a deck. A deck with no reviewable cards starts `Done`.
  pub fn start(store: S, deck_id: i64, mut rng: StdRng) -> Result<Self> {
    let deck = store.get_deck(deck_id)?;
    let cards = CardSampler::new(&store, deck.id, deck.size, ArchivedCards::Skip)
      .sample(config::SESSION_SIZE, &mut rng)?;

    let phase = if cards.is_empty() {
      Phase::Done
    } else {
      Phase::Presenting
    };
    tracing::info!(
      "Started review of deck {} ({}) with {} cards",
      deck.id,
      deck.title,
      cards.len()
    );

    Ok(Self {
      store,
      deck,
      pending: PendingQueue::from(cards),
      outcomes: OutcomeMap::new(),
      phase,
      rng,
    })
  }

  /// Resume a session from a snapshot, re-reading the deck from storage.
  ///
  /// Snapshots come from outside the process, so every card they still
  /// have to quiz is checked against the store.
  pub fn from_snapshot(store: S, snapshot: SessionSnapshot, rng: StdRng) -> Result<Self> {
    let deck = store.get_deck(snapshot.deck_id)?;
    check_snapshot(&store, &snapshot)?;
    Ok(Self {
      store,
      deck,
      pending: snapshot.pending,
      outcomes: snapshot.outcomes,
      phase: snapshot.phase,
      rng,
    })
  }

  /// Present the quiz for the head of the queue.
  ///
  /// While a quiz is waiting for an answer this returns that same quiz.
  /// After an incorrect answer it first moves past the revealed card.
  pub fn present_next(&mut self) -> Result<Presentation> {
    match &self.phase {
      Phase::AwaitingAnswer { quiz } => return Ok(Presentation::Quiz(quiz.clone())),
      Phase::Done => return Ok(Presentation::Done),
      Phase::InsufficientCards => return Ok(Presentation::InsufficientCards),
      Phase::RevealingAnswer { card } => {
        let card = card.clone();
        self.advance_past(&card);
        if self.phase == Phase::Done {
          return Ok(Presentation::Done);
        }
      }
      Phase::Presenting => {}
    }

    let Some(head_id) = self.pending.head().map(|c| c.id) else {
      self.finish();
      return Ok(Presentation::Done);
    };

    // Cards may have been added, edited or removed since the last question
    self.deck = self.store.get_deck(self.deck.id)?;
    let current = self.store.get_card(head_id)?;

    match build_quiz_set(&self.store, &current, &self.deck, &mut self.rng)? {
      QuizBuild::Ready(quiz) => {
        self.phase = Phase::AwaitingAnswer { quiz: quiz.clone() };
        Ok(Presentation::Quiz(quiz))
      }
      QuizBuild::InsufficientCards => {
        tracing::info!("Deck {} has too few cards for a quiz", self.deck.id);
        self.phase = Phase::InsufficientCards;
        Ok(Presentation::InsufficientCards)
      }
    }
  }

  /// Answer the quiz in flight with one of its offered cards.
  pub fn submit_answer(&mut self, chosen_card_id: i64) -> Result<Answered> {
    let Phase::AwaitingAnswer { quiz } = &self.phase else {
      return Err(ReviewError::NoQuizPending);
    };
    let chosen = quiz
      .offers(chosen_card_id)
      .ok_or(ReviewError::ChoiceNotOffered(chosen_card_id))?;
    let target = quiz.target.clone();
    let outcome = evaluate(&chosen.front, &target);

    self.outcomes.record(&target, outcome);
    self.score(outcome);

    match outcome {
      Outcome::Correct => self.advance_past(&target),
      Outcome::Incorrect => {
        self.pending.push_back(target.clone());
        self.phase = Phase::RevealingAnswer {
          card: target.clone(),
        };
      }
    }

    Ok(Answered {
      outcome,
      correct_card: target,
    })
  }

  pub fn snapshot(&self) -> SessionSnapshot {
    SessionSnapshot {
      deck_id: self.deck.id,
      pending: self.pending.clone(),
      outcomes: self.outcomes.clone(),
      phase: self.phase.clone(),
    }
  }

  /// Replace this session's progress with a snapshot of the same deck
  pub fn restore(&mut self, snapshot: SessionSnapshot) -> Result<()> {
    if snapshot.deck_id != self.deck.id {
      return Err(ReviewError::SnapshotMismatch {
        expected: self.deck.id,
        found: snapshot.deck_id,
      });
    }
    check_snapshot(&self.store, &snapshot)?;
    self.pending = snapshot.pending;
    self.outcomes = snapshot.outcomes;
    self.phase = snapshot.phase;
    Ok(())
  }

  /// First-attempt outcomes, once the session is done
  pub fn final_outcomes(&self) -> Option<&OutcomeMap> {
    match self.phase {
      Phase::Done => Some(&self.outcomes),
      _ => None,
    }
  }

  /// Outcomes recorded so far
  pub fn outcomes(&self) -> &OutcomeMap {
    &self.outcomes
  }

  pub fn pending(&self) -> &PendingQueue {
    &self.pending
  }

  pub fn phase(&self) -> &Phase {
    &self.phase
  }

  pub fn deck(&self) -> &Deck {
    &self.deck
  }

  fn score(&mut self, outcome: Outcome) {
    let now = Utc::now();
    self.deck.record(outcome, now);
    // A lost score update costs one counter tick, not the session
    self
      .store
      .record_attempt(self.deck.id, outcome, now)
      .log_warn("Failed to save deck score");
  }

  fn advance_past(&mut self, card: &Card) {
    self.pending.remove_first(card);
    if self.pending.is_empty() {
      self.finish();
    } else {
      self.phase = Phase::Presenting;
    }
  }

  fn finish(&mut self) {
    self.phase = Phase::Done;
    tracing::info!(
      "Finished review of deck {}: {}/{} right on first try",
      self.deck.id,
      self.outcomes.correct_count(),
      self.outcomes.len()
    );
  }
}

fn invalid(message: String) -> ReviewError {
  ReviewError::InvalidSnapshot(message)
}

/// Reject snapshots that mention cards of another deck, cards that no
/// longer exist, or a quiz that does not fit its queue.
fn check_snapshot<S: CardStore + ?Sized>(store: &S, snapshot: &SessionSnapshot) -> Result<()> {
  let deck_id = snapshot.deck_id;

  // Reviewed cards are history; only their recorded deck is checked
  if let Some(stray) = snapshot.outcomes.iter().find(|r| r.card.deck_id != deck_id) {
    return Err(invalid(format!("card {} is not in deck {}", stray.card.id, deck_id)));
  }

  let mut live: Vec<&Card> = snapshot.pending.iter().collect();
  match &snapshot.phase {
    Phase::AwaitingAnswer { quiz } => {
      if quiz.offers(quiz.target.id).is_none() {
        return Err(invalid(format!("quiz on card {} does not offer it", quiz.target.id)));
      }
      if !snapshot.pending.head().is_some_and(|head| head.same_card(&quiz.target)) {
        return Err(invalid(format!("card {} is not next in the queue", quiz.target.id)));
      }
      live.extend(quiz.choices.iter());
    }
    Phase::RevealingAnswer { card } => {
      if !snapshot.pending.iter().any(|c| c.same_card(card)) {
        return Err(invalid(format!("revealed card {} is not queued", card.id)));
      }
    }
    Phase::Presenting | Phase::Done | Phase::InsufficientCards => {}
  }

  for card in live {
    let stored = match store.get_card(card.id) {
      Ok(stored) => stored,
      Err(e) if e.is_not_found() => {
        return Err(invalid(format!("card {} no longer exists", card.id)));
      }
      Err(e) => return Err(e),
    };
    if stored.deck_id != deck_id {
      return Err(invalid(format!("card {} is not in deck {}", card.id, deck_id)));
    }
  }
  Ok(())
}
