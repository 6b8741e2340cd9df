//! Card CRUD and search.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::db::{self, try_lock};
use crate::domain::{Card, CardStatus};
use crate::error::ReviewError;
use crate::state::AppState;

use super::decks::validate_card_text;
use super::ApiResult;

#[derive(Debug, Deserialize)]
pub struct UpdateCardRequest {
    pub front: String,
    pub back: String,
    pub status: CardStatus,
    /// Moves the card when it differs from the current deck
    pub deck_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /cards/{id}
pub async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
) -> ApiResult<Json<Card>> {
    let conn = try_lock(&state.db)?;
    let card = db::get_card_by_id(&conn, card_id)?.ok_or(ReviewError::CardNotFound(card_id))?;
    Ok(Json(card))
}

/// PUT /cards/{id}
pub async fn update_card(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    Json(request): Json<UpdateCardRequest>,
) -> ApiResult<Json<Card>> {
    validate_card_text(&request.front, &request.back)?;
    let conn = try_lock(&state.db)?;
    if db::get_deck_by_id(&conn, request.deck_id)?.is_none() {
        return Err(ReviewError::DeckNotFound(request.deck_id).into());
    }

    let mut card = Card::new(request.front, request.back, request.status, request.deck_id);
    card.id = card_id;
    if !db::update_card(&conn, &card)? {
        return Err(ReviewError::CardNotFound(card_id).into());
    }
    Ok(Json(card))
}

/// DELETE /cards/{id}
pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
) -> ApiResult<StatusCode> {
    let conn = try_lock(&state.db)?;
    if !db::delete_card(&conn, card_id)? {
        return Err(ReviewError::CardNotFound(card_id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /cards/search?q=
///
/// Case-insensitive substring match on either side of the card.
pub async fn search_cards(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Card>>> {
    let needle = query.q.trim();
    if needle.is_empty() {
        return Ok(Json(Vec::new()));
    }
    let conn = try_lock(&state.db)?;
    Ok(Json(db::search_cards(&conn, needle)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::decks::DeckResponse;
    use crate::handlers::test_support::test_server;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_update_delete_card() {
        let (env, server) = test_server();
        let deck_id = env.deck_with_cards("d", &["perro"]);
        let card_id = db::get_cards_in_deck(&env.conn(), deck_id).unwrap()[0].id;
        let path = format!("/cards/{}", card_id);

        let card: Card = server.get(&path).await.json();
        assert_eq!(card.front, "perro");

        let response = server
            .put(&path)
            .json(&json!({ "front": "gato", "back": "cat", "status": "archived", "deck_id": deck_id }))
            .await;
        response.assert_status_ok();
        let updated: Card = server.get(&path).await.json();
        assert_eq!(updated.front, "gato");
        assert_eq!(updated.status, CardStatus::Archived);

        server.delete(&path).await.assert_status(StatusCode::NO_CONTENT);
        server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
        server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);

        let deck: DeckResponse = server.get(&format!("/decks/{}", deck_id)).await.json();
        assert_eq!(deck.deck.size, 0);
    }

    #[tokio::test]
    async fn test_move_card_between_decks() {
        let (env, server) = test_server();
        let from = env.deck_with_cards("from", &["a", "b"]);
        let to = env.deck_with_cards("to", &[]);
        let card_id = db::get_cards_in_deck(&env.conn(), from).unwrap()[0].id;

        server
            .put(&format!("/cards/{}", card_id))
            .json(&json!({ "front": "a", "back": "a back", "status": "learned", "deck_id": to }))
            .await
            .assert_status_ok();

        let from: DeckResponse = server.get(&format!("/decks/{}", from)).await.json();
        let to: DeckResponse = server.get(&format!("/decks/{}", to)).await.json();
        assert_eq!(from.deck.size, 1);
        assert_eq!(to.deck.size, 1);
    }

    #[tokio::test]
    async fn test_update_into_missing_deck() {
        let (env, server) = test_server();
        let deck_id = env.deck_with_cards("d", &["a"]);
        let card_id = db::get_cards_in_deck(&env.conn(), deck_id).unwrap()[0].id;

        server
            .put(&format!("/cards/{}", card_id))
            .json(&json!({ "front": "a", "back": "b", "status": "learned", "deck_id": 999 }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .put("/cards/999")
            .json(&json!({ "front": "a", "back": "b", "status": "learned", "deck_id": deck_id }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (env, server) = test_server();
        env.deck_with_cards("d", &["Paris", "Lima", "Oslo"]);

        let hits: Vec<Card> = server.get("/cards/search").add_query_param("q", "pAR").await.json();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].front, "Paris");

        // Backs match too
        let hits: Vec<Card> = server.get("/cards/search").add_query_param("q", "BACK").await.json();
        assert_eq!(hits.len(), 3);

        let hits: Vec<Card> = server.get("/cards/search").await.json();
        assert!(hits.is_empty());
    }
}
