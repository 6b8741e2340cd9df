//! Deck CRUD, plus listing and adding the cards of one deck.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::{self, try_lock};
use crate::domain::{Card, CardStatus, Deck};
use crate::error::ReviewError;
use crate::state::AppState;

use super::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct DeckRequest {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckResponse {
    #[serde(flatten)]
    pub deck: Deck,
    pub percent_right: f64,
}

impl From<Deck> for DeckResponse {
    fn from(deck: Deck) -> Self {
        let percent_right = deck.percent_right();
        Self {
            deck,
            percent_right,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CardRequest {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub status: CardStatus,
}

fn validated_title(title: &str) -> ApiResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::invalid("Deck title must not be empty"));
    }
    Ok(title.to_string())
}

/// Card fronts are what answers are graded against, so they must be present
pub(super) fn validate_card_text(front: &str, back: &str) -> ApiResult<()> {
    if front.trim().is_empty() || back.trim().is_empty() {
        return Err(ApiError::invalid("Card front and back must not be empty"));
    }
    Ok(())
}

fn load_deck(conn: &rusqlite::Connection, deck_id: i64) -> ApiResult<Deck> {
    Ok(db::get_deck_by_id(conn, deck_id)?.ok_or(ReviewError::DeckNotFound(deck_id))?)
}

/// GET /decks
pub async fn list_decks(State(state): State<AppState>) -> ApiResult<Json<Vec<DeckResponse>>> {
    let conn = try_lock(&state.db)?;
    let decks = db::get_all_decks(&conn)?;
    Ok(Json(decks.into_iter().map(DeckResponse::from).collect()))
}

/// POST /decks
pub async fn create_deck(
    State(state): State<AppState>,
    Json(request): Json<DeckRequest>,
) -> ApiResult<(StatusCode, Json<DeckResponse>)> {
    let title = validated_title(&request.title)?;
    let conn = try_lock(&state.db)?;
    let deck_id = db::insert_deck(&conn, &Deck::new(title))?;
    tracing::info!("Created deck {}", deck_id);
    let deck = load_deck(&conn, deck_id)?;
    Ok((StatusCode::CREATED, Json(deck.into())))
}

/// GET /decks/{id}
pub async fn get_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> ApiResult<Json<DeckResponse>> {
    let conn = try_lock(&state.db)?;
    Ok(Json(load_deck(&conn, deck_id)?.into()))
}

/// PUT /decks/{id}
///
/// Renames the deck. Scores and size are kept.
pub async fn update_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Json(request): Json<DeckRequest>,
) -> ApiResult<Json<DeckResponse>> {
    let title = validated_title(&request.title)?;
    let conn = try_lock(&state.db)?;
    let mut deck = load_deck(&conn, deck_id)?;
    deck.title = title;
    db::update_deck(&conn, &deck)?;
    Ok(Json(deck.into()))
}

/// DELETE /decks/{id}
///
/// Removes the deck together with its cards.
pub async fn delete_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> ApiResult<StatusCode> {
    let conn = try_lock(&state.db)?;
    if !db::delete_deck(&conn, deck_id)? {
        return Err(ReviewError::DeckNotFound(deck_id).into());
    }
    tracing::info!("Deleted deck {}", deck_id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /decks/{id}/cards
pub async fn list_cards(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> ApiResult<Json<Vec<Card>>> {
    let conn = try_lock(&state.db)?;
    load_deck(&conn, deck_id)?;
    Ok(Json(db::get_cards_in_deck(&conn, deck_id)?))
}

/// POST /decks/{id}/cards
pub async fn create_card(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Json(request): Json<CardRequest>,
) -> ApiResult<(StatusCode, Json<Card>)> {
    validate_card_text(&request.front, &request.back)?;
    let conn = try_lock(&state.db)?;
    load_deck(&conn, deck_id)?;

    let mut card = Card::new(request.front, request.back, request.status, deck_id);
    card.id = db::insert_card(&conn, &card)?;
    Ok((StatusCode::CREATED, Json(card)))
}
