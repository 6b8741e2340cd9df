use serde::{Deserialize, Serialize};

/// Learning status of a card. Archived cards are skipped when a review
/// session picks its cards, but may still show up as distractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
  #[default]
  StillLearning,
  Learned,
  Archived,
}

impl CardStatus {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "still_learning" => Some(Self::StillLearning),
      "learned" => Some(Self::Learned),
      "archived" => Some(Self::Archived),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::StillLearning => "still_learning",
      Self::Learned => "learned",
      Self::Archived => "archived",
    }
  }

  pub fn is_archived(&self) -> bool {
    matches!(self, Self::Archived)
  }
}

/// A front/back text pair belonging to one deck.
///
/// During review the back is shown as the question and the front is the
/// answer the user has to pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
  pub id: i64,
  pub front: String,
  pub back: String,
  pub status: CardStatus,
  pub deck_id: i64,
}

impl Card {
  pub fn new(front: String, back: String, status: CardStatus, deck_id: i64) -> Self {
    Self {
      id: 0,
      front,
      back,
      status,
      deck_id,
    }
  }

  /// Cards are identified by id; text and status may change underneath.
  pub fn same_card(&self, other: &Card) -> bool {
    self.id == other.id
  }
}
