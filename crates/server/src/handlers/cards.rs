use anicards_core::domain::model::StatKey;
use anicards_core::render::render_card;
use axum::{
    body::Bytes,
    extract::{Path as AxumPath, State},
    http::header,
    response::{IntoResponse, Redirect},
    Json,
};

use crate::app_state::AppState;
use crate::errors::ServerError;
use crate::models::{validate_username, GenerateRequest, StatCardResponse};
use crate::repo;

/// Fetches fresh statistics, renders every requested card and replaces the
/// user's stored set. Nothing stored changes if AniList or rendering fails.
pub async fn generate_svgs(
    State(state): State<AppState>,
    AxumPath(username): AxumPath<String>,
    body: Bytes,
) -> Result<Redirect, ServerError> {
    let username = validate_username(&username)?;
    let request = GenerateRequest::from_form(&body, &state.default_colors)?;
    tracing::info!(username = %username, keys = %request.keys_list(), "generating stat cards");

    let fetched = state
        .anilist
        .fetch_user_stats(&username, &request.keys)
        .await
        .inspect_err(|e| tracing::warn!(username = %username, error = %e, "anilist fetch failed"))?;

    let mut svgs = Vec::with_capacity(request.keys.len());
    for key in &request.keys {
        match render_card(
            *key,
            &fetched.stats,
            &username,
            &request.colors,
            request.card_type,
        )? {
            Some(svg) => svgs.push((*key, svg)),
            None => tracing::debug!(username = %username, key = %key, "no data for card"),
        }
    }

    repo::replace_user_cards(&state, &username, fetched.user_id, &request, &svgs).await?;
    tracing::info!(username = %username, cards = svgs.len(), "stat cards stored");

    Ok(Redirect::to(&format!("/StatCards/{username}")))
}

pub async fn get_svg(
    State(state): State<AppState>,
    AxumPath((username, key)): AxumPath<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    let username = validate_username(&username)?;
    let key: StatKey = key.parse()?;

    let svg = repo::load_svg(&state, &username, key)
        .await?
        .ok_or_else(|| ServerError::not_found(format!("no {key} card stored for '{username}'")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        svg,
    ))
}

pub async fn statcard_summary(
    State(state): State<AppState>,
    AxumPath(username): AxumPath<String>,
) -> Result<Json<StatCardResponse>, ServerError> {
    let username = validate_username(&username)?;
    let cards = repo::load_user_cards(&state, &username)
        .await?
        .ok_or_else(|| ServerError::not_found(format!("no stat cards stored for '{username}'")))?;

    Ok(Json(StatCardResponse {
        username,
        stored: cards.svgs.iter().map(|(key, _)| *key).collect(),
        keys: cards.keys,
        colors: cards.colors,
        card_type: cards.card_type,
    }))
}
