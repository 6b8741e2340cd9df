//! Review session endpoints.
//!
//! Sessions live in the in-memory registry. Every session operation may
//! read cards from SQLite, so it runs on the blocking pool.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::db::SqliteStore;
use crate::domain::{Card, Outcome};
use crate::review::{Presentation, ReviewSession, ReviewedCard, SessionSnapshot};
use crate::sessions::lock_session;
use crate::state::AppState;

use super::{ApiError, ApiResult};

type Session = ReviewSession<SqliteStore>;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
}

/// One answer option. Only the front is shown; it is what gets graded.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChoiceView {
    pub card_id: i64,
    pub front: String,
}

impl From<&Card> for ChoiceView {
    fn from(card: &Card) -> Self {
        Self {
            card_id: card.id,
            front: card.front.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextResponse {
    Quiz {
        /// The back of the card under review
        question: String,
        choices: Vec<ChoiceView>,
    },
    InsufficientCards,
    Done,
}

impl From<Presentation> for NextResponse {
    fn from(presentation: Presentation) -> Self {
        match presentation {
            Presentation::Quiz(quiz) => NextResponse::Quiz {
                question: quiz.target.back.clone(),
                choices: quiz.choices.iter().map(ChoiceView::from).collect(),
            },
            Presentation::InsufficientCards => NextResponse::InsufficientCards,
            Presentation::Done => NextResponse::Done,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub card_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub outcome: Outcome,
    pub correct_answer: ChoiceView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub deck_id: i64,
    pub correct: usize,
    pub total: usize,
    /// Cards in the order they were first answered
    pub reviewed: Vec<ReviewedCard>,
}

fn new_rng() -> StdRng {
    StdRng::from_rng(&mut rand::rng())
}

/// Run `op` against a registered session on the blocking pool
async fn with_session<T, F>(state: &AppState, session_id: &str, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Session) -> ApiResult<T> + Send + 'static,
{
    let session = state
        .sessions
        .get(session_id)
        .ok_or_else(|| ApiError::session_not_found(session_id))?;

    tokio::task::spawn_blocking(move || {
        let mut guard = lock_session(&session);
        op(&mut *guard)
    })
    .await?
}

async fn register<F>(state: &AppState, build: F) -> ApiResult<(StatusCode, Json<SessionCreated>)>
where
    F: FnOnce() -> ApiResult<Session> + Send + 'static,
{
    let session = tokio::task::spawn_blocking(build).await??;
    let deck_id = session.deck().id;
    let session_id = state.sessions.insert(session);
    tracing::debug!("Registered review session {} for deck {}", session_id, deck_id);
    Ok((StatusCode::CREATED, Json(SessionCreated { session_id })))
}

/// POST /decks/{id}/review
pub async fn start_review(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<SessionCreated>)> {
    let store = state.store.clone();
    register(&state, move || Ok(ReviewSession::start(store, deck_id, new_rng())?)).await
}

/// POST /review
///
/// Resume a previously snapshotted session under a new session ID.
pub async fn resume_review(
    State(state): State<AppState>,
    Json(snapshot): Json<SessionSnapshot>,
) -> ApiResult<(StatusCode, Json<SessionCreated>)> {
    let store = state.store.clone();
    register(&state, move || Ok(ReviewSession::from_snapshot(store, snapshot, new_rng())?)).await
}

/// GET /review/{sid}/next
pub async fn next_quiz(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<NextResponse>> {
    with_session(&state, &session_id, |session| {
        Ok(Json(session.present_next()?.into()))
    })
    .await
}

/// POST /review/{sid}/answer
pub async fn answer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AnswerRequest>,
) -> ApiResult<Json<AnswerResponse>> {
    with_session(&state, &session_id, move |session| {
        let answered = session.submit_answer(request.card_id)?;
        Ok(Json(AnswerResponse {
            outcome: answered.outcome,
            correct_answer: ChoiceView::from(&answered.correct_card),
        }))
    })
    .await
}

/// GET /review/{sid}/snapshot
pub async fn get_snapshot(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionSnapshot>> {
    with_session(&state, &session_id, |session| Ok(Json(session.snapshot()))).await
}

/// PUT /review/{sid}/snapshot
pub async fn put_snapshot(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(snapshot): Json<SessionSnapshot>,
) -> ApiResult<StatusCode> {
    with_session(&state, &session_id, move |session| {
        session.restore(snapshot)?;
        Ok(StatusCode::NO_CONTENT)
    })
    .await
}

/// GET /review/{sid}/summary
pub async fn summary(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SummaryResponse>> {
    with_session(&state, &session_id, |session| {
        let outcomes = session
            .final_outcomes()
            .ok_or_else(|| ApiError::new(StatusCode::CONFLICT, "Review session is not finished"))?;
        Ok(Json(SummaryResponse {
            deck_id: session.deck().id,
            correct: outcomes.correct_count(),
            total: outcomes.len(),
            reviewed: outcomes.iter().cloned().collect(),
        }))
    })
    .await
}

/// DELETE /review/{sid}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.sessions.remove(&session_id) {
        return Err(ApiError::session_not_found(&session_id));
    }
    Ok(StatusCode::NO_CONTENT)
}
