//! Pulls the card statistics out of a decoded AniList response.

use serde_json::Value;

use crate::anilist::AniListError;
use crate::domain::model::{
    top_items, AnimeStats, ItemKind, MangaStats, MediaFormat, SocialStats, StatKey, TopItem,
    UserStats,
};

pub const TOP_N: usize = 5;

fn lookup<'a>(root: &'a Value, path: &[&str]) -> Result<&'a Value, AniListError> {
    let mut node = root;
    for segment in path {
        node = node
            .get(segment)
            .filter(|v| !v.is_null())
            .ok_or_else(|| AniListError::MissingData(path.join(".")))?;
    }
    Ok(node)
}

fn int_at(root: &Value, path: &[&str]) -> Result<i64, AniListError> {
    lookup(root, path)?
        .as_i64()
        .ok_or_else(|| AniListError::MissingData(path.join(".")))
}

fn float_at(root: &Value, path: &[&str]) -> Result<f64, AniListError> {
    lookup(root, path)?
        .as_f64()
        .ok_or_else(|| AniListError::MissingData(path.join(".")))
}

fn str_at<'a>(root: &'a Value, path: &[&str]) -> Result<&'a str, AniListError> {
    lookup(root, path)?
        .as_str()
        .ok_or_else(|| AniListError::MissingData(path.join(".")))
}

/// Path below each list entry that holds the display name.
fn name_path(kind: ItemKind) -> &'static [&'static str] {
    match kind {
        ItemKind::Genre => &["genre"],
        ItemKind::Tag => &["tag", "name"],
        ItemKind::VoiceActor => &["voiceActor", "name", "full"],
        ItemKind::Studio => &["studio", "name"],
        ItemKind::Staff => &["staff", "name", "full"],
    }
}

fn list_field(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Genre => "genres",
        ItemKind::Tag => "tags",
        ItemKind::VoiceActor => "voiceActors",
        ItemKind::Studio => "studios",
        ItemKind::Staff => "staff",
    }
}

fn format_field(format: MediaFormat) -> &'static str {
    match format {
        MediaFormat::Anime => "anime",
        MediaFormat::Manga => "manga",
    }
}

pub fn extract_top_list(
    data: &Value,
    format: MediaFormat,
    kind: ItemKind,
) -> Result<Vec<TopItem>, AniListError> {
    let path = ["User", "statistics", format_field(format), list_field(kind)];
    let entries = lookup(data, &path)?
        .as_array()
        .ok_or_else(|| AniListError::MissingData(path.join(".")))?;

    let items = entries
        .iter()
        .map(|entry| {
            Ok(TopItem {
                name: str_at(entry, name_path(kind))?.to_string(),
                count: int_at(entry, &["count"])?,
            })
        })
        .collect::<Result<Vec<_>, AniListError>>()?;

    Ok(top_items(items, TOP_N))
}

pub fn extract_anime(data: &Value) -> Result<AnimeStats, AniListError> {
    let base = ["User", "statistics", "anime"];
    let at = |field: &'static str| [base[0], base[1], base[2], field];
    Ok(AnimeStats {
        count: int_at(data, &at("count"))?,
        episodes_watched: int_at(data, &at("episodesWatched"))?,
        minutes_watched: int_at(data, &at("minutesWatched"))?,
        mean_score: float_at(data, &at("meanScore"))?,
        standard_deviation: float_at(data, &at("standardDeviation"))?,
    })
}

pub fn extract_manga(data: &Value) -> Result<MangaStats, AniListError> {
    let base = ["User", "statistics", "manga"];
    let at = |field: &'static str| [base[0], base[1], base[2], field];
    Ok(MangaStats {
        count: int_at(data, &at("count"))?,
        chapters_read: int_at(data, &at("chaptersRead"))?,
        volumes_read: int_at(data, &at("volumesRead"))?,
        mean_score: float_at(data, &at("meanScore"))?,
        standard_deviation: float_at(data, &at("standardDeviation"))?,
    })
}

pub fn extract_social(data: &Value) -> Result<SocialStats, AniListError> {
    let page_total = |page: &str| int_at(data, &[page, "pageInfo", "total"]);

    let history_path = ["User", "stats", "activityHistory"];
    let total_activity = lookup(data, &history_path)?
        .as_array()
        .ok_or_else(|| AniListError::MissingData(history_path.join(".")))?
        .iter()
        .map(|day| int_at(day, &["amount"]))
        .sum::<Result<i64, AniListError>>()?;

    Ok(SocialStats {
        total_followers: page_total("followersPage")?,
        total_following: page_total("followingPage")?,
        total_activity,
        thread_posts_comments_count: page_total("threadsPage")?
            + page_total("threadCommentsPage")?,
        total_reviews: page_total("reviewsPage")?,
    })
}

/// Builds the stats for a user. Summary cards are always extracted; top
/// lists only for the keys asked for.
pub fn extract_user_stats(data: &Value, keys: &[StatKey]) -> Result<UserStats, AniListError> {
    let mut stats = UserStats {
        anime: Some(extract_anime(data)?),
        manga: Some(extract_manga(data)?),
        social: Some(extract_social(data)?),
        ..UserStats::default()
    };

    for key in keys {
        if let Some((format, kind)) = key.list_kind() {
            stats.set_top_list(*key, extract_top_list(data, format, kind)?);
        }
    }

    Ok(stats)
}
