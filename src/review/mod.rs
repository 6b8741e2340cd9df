//! The review engine: card sampling, quiz building, grading and the
//! session controller that ties them together.

pub mod evaluator;
pub mod outcomes;
pub mod queue;
pub mod quiz;
pub mod sampler;
pub mod session;
pub mod store;

pub use evaluator::evaluate;
pub use outcomes::{OutcomeMap, ReviewedCard};
pub use queue::PendingQueue;
pub use quiz::{build_quiz_set, QuizBuild, QuizSet};
pub use sampler::{wrap_ordinal, ArchivedCards, CardSampler};
pub use session::{Answered, Phase, Presentation, ReviewSession, SessionSnapshot};
pub use store::CardStore;
