mod cards;
mod pages;

#[cfg(test)]
mod tests;

use axum::Router;
use axum::routing::{
  get,
  post
};

use crate::app_state::AppState;

pub fn router(
  state: AppState
) -> Router {
  Router::new()
        .route("/", get(pages::home))
        .route("/faq", get(pages::faq))
        .route("/health", get(health))
        .route("/StatCards", get(pages::stat_cards))
        .route("/StatCards/:username", get(pages::user_page))
        .route("/get_svg/:username/:key", get(cards::get_svg))
        .route("/v1/users/:username/statcards", get(cards::statcard_summary))
        .route("/:username", get(pages::user_redirect))
        .route("/:username/generate_svgs", post(cards::generate_svgs))
        .with_state(state)
}

async fn health() -> &'static str {
  "ok"
}
