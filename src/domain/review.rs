use serde::{Deserialize, Serialize};

/// Result of one evaluated answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  Correct,
  Incorrect,
}

impl Outcome {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Correct => "correct",
      Self::Incorrect => "incorrect",
    }
  }

  pub fn is_correct(&self) -> bool {
    matches!(self, Self::Correct)
  }
}
