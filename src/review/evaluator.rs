use crate::domain::{Card, Outcome};

/// Grade a chosen answer by exact match against the target's front text.
pub fn evaluate(chosen_front: &str, target: &Card) -> Outcome {
  if chosen_front == target.front {
    Outcome::Correct
  } else {
    Outcome::Incorrect
  }
}
