//! JSON HTTP surface over deck/card CRUD and review sessions.

pub mod cards;
pub mod decks;
pub mod review;

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{delete, get, post},
  Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::db::DbLockError;
use crate::error::ReviewError;
use crate::state::AppState;

pub use cards::{delete_card, get_card, search_cards, update_card};
pub use decks::{create_card, create_deck, delete_deck, get_deck, list_cards, list_decks, update_deck};
pub use review::{
  answer, delete_session, get_snapshot, next_quiz, put_snapshot, resume_review, start_review,
  summary,
};

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/decks", get(list_decks).post(create_deck))
    .route("/decks/{id}", get(get_deck).put(update_deck).delete(delete_deck))
    .route("/decks/{id}/cards", get(list_cards).post(create_card))
    .route("/decks/{id}/review", post(start_review))
    .route("/cards/search", get(search_cards))
    .route("/cards/{id}", get(get_card).put(update_card).delete(delete_card))
    .route("/review", post(resume_review))
    .route("/review/{sid}", delete(delete_session))
    .route("/review/{sid}/next", get(next_quiz))
    .route("/review/{sid}/answer", post(answer))
    .route("/review/{sid}/snapshot", get(get_snapshot).put(put_snapshot))
    .route("/review/{sid}/summary", get(summary))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Error response with a JSON `{"error": ...}` body
#[derive(Debug)]
pub struct ApiError {
  status: StatusCode,
  message: String,
}

impl ApiError {
  pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status,
      message: message.into(),
    }
  }

  pub fn invalid(message: impl Into<String>) -> Self {
    Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
  }

  pub fn session_not_found(session_id: &str) -> Self {
    Self::new(StatusCode::NOT_FOUND, format!("Review session not found: {}", session_id))
  }

  pub fn status(&self) -> StatusCode {
    self.status
  }
}

impl From<ReviewError> for ApiError {
  fn from(e: ReviewError) -> Self {
    let status = match &e {
      _ if e.is_not_found() => StatusCode::NOT_FOUND,
      ReviewError::NoQuizPending | ReviewError::SnapshotMismatch { .. } => StatusCode::CONFLICT,
      ReviewError::ChoiceNotOffered(_) | ReviewError::InvalidSnapshot(_) => {
        StatusCode::UNPROCESSABLE_ENTITY
      }
      _ => {
        tracing::error!("Request failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    Self::new(status, e.to_string())
  }
}

impl From<rusqlite::Error> for ApiError {
  fn from(e: rusqlite::Error) -> Self {
    ReviewError::from(e).into()
  }
}

impl From<DbLockError> for ApiError {
  fn from(e: DbLockError) -> Self {
    ReviewError::from(e).into()
  }
}

impl From<tokio::task::JoinError> for ApiError {
  fn from(e: tokio::task::JoinError) -> Self {
    tracing::error!("Blocking task failed: {}", e);
    Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (
      self.status,
      Json(serde_json::json!({ "error": self.message })),
    )
      .into_response()
  }
}

pub type ApiResult<T> = Result<T, ApiError>;
