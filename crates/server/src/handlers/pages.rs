use anicards_core::domain::model::StatKey;
use anicards_core::render::template::{
  escape_xml,
  fill
};
use axum::extract::{
  Path as AxumPath,
  State
};
use axum::response::{
  Html,
  Redirect
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::app_state::AppState;
use crate::errors::ServerError;
use crate::models::validate_username;
use crate::repo;

const HOME_PAGE: &str =
  include_str!("../../res/pages/index.html");
const FAQ_PAGE: &str =
  include_str!("../../res/pages/faq.html");
const GENERATOR_PAGE: &str = include_str!(
  "../../res/pages/stat_cards.html"
);
const USER_PAGE: &str =
  include_str!("../../res/pages/user.html");
const USER_ITEM: &str = include_str!(
  "../../res/pages/user_item.html"
);

pub async fn home() -> Html<&'static str> {
  Html(HOME_PAGE)
}

pub async fn faq() -> Html<&'static str> {
  Html(FAQ_PAGE)
}

pub async fn stat_cards(
  State(state): State<AppState>
) -> Result<Html<String>, ServerError> {
  let colors = &state.default_colors;

  let key_options = StatKey::ALL
    .iter()
    .map(|key| {
      format!(
        "        <label><input \
         type=\"checkbox\" name=\"keys\" \
         value=\"{key}\"/> {}</label>",
        escape_xml(key.title())
      )
    })
    .collect::<Vec<_>>()
    .join("\n");

  let page = fill(GENERATOR_PAGE, &[
    ("title_color", colors.title.clone()),
    (
      "background_color",
      colors.background.clone()
    ),
    ("text_color", colors.text.clone()),
    (
      "circle_color",
      colors.circle.clone()
    ),
    ("key_options", key_options)
  ])?;

  Ok(Html(page))
}

/// Lists every stored card as an inline
/// base64 image.
pub async fn user_page(
  State(state): State<AppState>,
  AxumPath(username): AxumPath<String>
) -> Result<Html<String>, ServerError> {
  let username =
    validate_username(&username)?;

  let cards =
    repo::load_user_cards(&state, &username)
      .await?
      .ok_or_else(|| {
        ServerError::not_found(format!(
          "no stat cards stored for \
           '{username}'"
        ))
      })?;

  let mut items =
    Vec::with_capacity(cards.svgs.len());

  for (key, svg) in &cards.svgs {
    let item = fill(USER_ITEM, &[
      ("title", escape_xml(key.title())),
      ("data", STANDARD.encode(svg)),
      ("key", key.to_string()),
      (
        "card_type",
        cards.card_type.as_str().to_string()
      ),
      (
        "link",
        format!("/get_svg/{username}/{key}")
      )
    ])?;
    items.push(item);
  }

  let page = fill(USER_PAGE, &[
    ("username", escape_xml(&username)),
    ("items", items.join("\n"))
  ])?;

  Ok(Html(page))
}

pub async fn user_redirect(
  AxumPath(username): AxumPath<String>
) -> Result<Redirect, ServerError> {
  let username =
    validate_username(&username)?;

  Ok(Redirect::to(&format!(
    "/StatCards/{username}"
  )))
}
