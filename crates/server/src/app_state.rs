use anicards_core::anilist::AniListClient;
use anicards_core::domain::model::CardColors;
use sqlx::{Pool, Postgres, Sqlite};

#[derive(Clone)]
pub struct AppState {
    pub sqlite: Option<Pool<Sqlite>>,
    pub postgres: Option<Pool<Postgres>>,
    pub anilist: AniListClient,
    pub default_colors: CardColors,
}
