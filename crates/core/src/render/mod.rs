//! SVG stat card rendering.

mod cards;
pub mod font;
pub mod styles;
pub mod template;

use thiserror::Error;
use tracing::debug;

use crate::domain::model::{CardColors, CardType, StatKey, UserStats};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template placeholder '{0}' has no value")]
    UnresolvedPlaceholder(String),
    #[error("template placeholder opened at byte {0} is never closed")]
    UnclosedPlaceholder(usize),
    #[error("svg template has no <defs> element")]
    MissingDefs,
}

/// Renders the card for `key`, or `None` when `stats` holds nothing for it.
pub fn render_card(
    key: StatKey,
    stats: &UserStats,
    username: &str,
    colors: &CardColors,
    card_type: CardType,
) -> Result<Option<String>, RenderError> {
    debug!(username, %key, card_type = card_type.as_str(), "rendering card");

    let svg = match card_type {
        CardType::Default => match key {
            StatKey::AnimeStats => stats
                .anime
                .as_ref()
                .map(|s| cards::anime_stats(s, username, colors))
                .transpose()?,
            StatKey::MangaStats => stats
                .manga
                .as_ref()
                .map(|s| cards::manga_stats(s, username, colors))
                .transpose()?,
            StatKey::SocialStats => stats
                .social
                .as_ref()
                .map(|s| cards::social_stats(s, username, colors))
                .transpose()?,
            list_key => match (list_key.list_kind(), stats.top_list(list_key)) {
                (Some((format, kind)), Some(items)) => Some(cards::extra_stats(
                    items, username, format, kind, colors,
                )?),
                _ => None,
            },
        },
    };

    if svg.is_none() {
        debug!(username, %key, "no data for card");
    }
    Ok(svg)
}
