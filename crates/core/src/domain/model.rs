//! Domain models: stat card keys,
//! fetched statistics, colour palettes
//! and the error taxonomy shared by the
//! client and the renderer.

use std::fmt;
use std::str::FromStr;

use serde::{
  Deserialize,
  Serialize
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]

pub enum DomainError {
  #[error("unknown stat key '{0}'")]
  UnknownStatKey(String),
  #[error("unknown card type '{0}'")]
  UnknownCardType(String),
  #[error("invalid colour '{0}'")]
  InvalidColor(String),
  #[error(
    "expected 4 colours, got {0}"
  )]
  ColorCount(usize)
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]

pub enum StatKey {
  AnimeStats,
  SocialStats,
  MangaStats,
  AnimeGenres,
  AnimeTags,
  AnimeVoiceActors,
  AnimeStudios,
  AnimeStaff,
  MangaGenres,
  MangaTags,
  MangaStaff
}

impl StatKey {
  pub const ALL: [StatKey; 11] = [
    StatKey::AnimeStats,
    StatKey::SocialStats,
    StatKey::MangaStats,
    StatKey::AnimeGenres,
    StatKey::AnimeTags,
    StatKey::AnimeVoiceActors,
    StatKey::AnimeStudios,
    StatKey::AnimeStaff,
    StatKey::MangaGenres,
    StatKey::MangaTags,
    StatKey::MangaStaff
  ];

  pub fn as_str(
    self
  ) -> &'static str {
    match self {
      | StatKey::AnimeStats => {
        "animeStats"
      }
      | StatKey::SocialStats => {
        "socialStats"
      }
      | StatKey::MangaStats => {
        "mangaStats"
      }
      | StatKey::AnimeGenres => {
        "animeGenres"
      }
      | StatKey::AnimeTags => {
        "animeTags"
      }
      | StatKey::AnimeVoiceActors => {
        "animeVoiceActors"
      }
      | StatKey::AnimeStudios => {
        "animeStudios"
      }
      | StatKey::AnimeStaff => {
        "animeStaff"
      }
      | StatKey::MangaGenres => {
        "mangaGenres"
      }
      | StatKey::MangaTags => {
        "mangaTags"
      }
      | StatKey::MangaStaff => {
        "mangaStaff"
      }
    }
  }

  /// Human readable label used on
  /// the generator page.
  pub fn title(
    self
  ) -> &'static str {
    match self {
      | StatKey::AnimeStats => {
        "Anime Stats"
      }
      | StatKey::SocialStats => {
        "Social Stats"
      }
      | StatKey::MangaStats => {
        "Manga Stats"
      }
      | StatKey::AnimeGenres => {
        "Anime Genres"
      }
      | StatKey::AnimeTags => {
        "Anime Tags"
      }
      | StatKey::AnimeVoiceActors => {
        "Anime Voice Actors"
      }
      | StatKey::AnimeStudios => {
        "Anime Studios"
      }
      | StatKey::AnimeStaff => {
        "Anime Staff"
      }
      | StatKey::MangaGenres => {
        "Manga Genres"
      }
      | StatKey::MangaTags => {
        "Manga Tags"
      }
      | StatKey::MangaStaff => {
        "Manga Staff"
      }
    }
  }

  /// Top-list keys resolve to the
  /// media format and item kind they
  /// list; summary cards return None.
  pub fn list_kind(
    self
  ) -> Option<(MediaFormat, ItemKind)>
  {
    use ItemKind::*;
    use MediaFormat::*;

    match self {
      | StatKey::AnimeGenres => {
        Some((Anime, Genre))
      }
      | StatKey::AnimeTags => {
        Some((Anime, Tag))
      }
      | StatKey::AnimeVoiceActors => {
        Some((Anime, VoiceActor))
      }
      | StatKey::AnimeStudios => {
        Some((Anime, Studio))
      }
      | StatKey::AnimeStaff => {
        Some((Anime, Staff))
      }
      | StatKey::MangaGenres => {
        Some((Manga, Genre))
      }
      | StatKey::MangaTags => {
        Some((Manga, Tag))
      }
      | StatKey::MangaStaff => {
        Some((Manga, Staff))
      }
      | StatKey::AnimeStats
      | StatKey::SocialStats
      | StatKey::MangaStats => None
    }
  }
}

impl fmt::Display for StatKey {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for StatKey {
  type Err = DomainError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let trimmed = s.trim();

    StatKey::ALL
      .into_iter()
      .find(|k| k.as_str() == trimmed)
      .ok_or_else(|| {
        DomainError::UnknownStatKey(
          trimmed.to_string()
        )
      })
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]

pub enum MediaFormat {
  Anime,
  Manga
}

impl MediaFormat {
  pub fn label(
    self
  ) -> &'static str {
    match self {
      | MediaFormat::Anime => "Anime",
      | MediaFormat::Manga => "Manga"
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]

pub enum ItemKind {
  Genre,
  Tag,
  VoiceActor,
  Studio,
  Staff
}

impl ItemKind {
  pub fn label(
    self
  ) -> &'static str {
    match self {
      | ItemKind::Genre => "Genres",
      | ItemKind::Tag => "Tags",
      | ItemKind::VoiceActor => {
        "Voice Actors"
      }
      | ItemKind::Studio => "Studios",
      | ItemKind::Staff => "Staff"
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
)]

pub enum CardType {
  #[default]
  Default
}

impl CardType {
  pub fn as_str(
    self
  ) -> &'static str {
    match self {
      | CardType::Default => "Default"
    }
  }
}

impl FromStr for CardType {
  type Err = DomainError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s.trim() {
      | "" | "Default" | "default" => {
        Ok(CardType::Default)
      }
      | other => {
        Err(
          DomainError::UnknownCardType(
            other.to_string()
          )
        )
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]

pub struct AnimeStats {
  pub count:              i64,
  pub episodes_watched:   i64,
  pub minutes_watched:    i64,
  pub mean_score:         f64,
  pub standard_deviation: f64
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]

pub struct MangaStats {
  pub count:              i64,
  pub chapters_read:      i64,
  pub volumes_read:       i64,
  pub mean_score:         f64,
  pub standard_deviation: f64
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]

pub struct SocialStats {
  pub total_followers: i64,
  pub total_following: i64,
  pub total_activity:  i64,
  pub thread_posts_comments_count:
    i64,
  pub total_reviews:   i64
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]

pub struct TopItem {
  pub name:  String,
  pub count: i64
}

/// Everything fetched for one user.
/// Top lists are only present for the
/// keys that were requested.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Default,
  Serialize,
  Deserialize,
)]

pub struct UserStats {
  pub anime:  Option<AnimeStats>,
  pub manga:  Option<MangaStats>,
  pub social: Option<SocialStats>,
  pub anime_genres:
    Option<Vec<TopItem>>,
  pub anime_tags:
    Option<Vec<TopItem>>,
  pub anime_voice_actors:
    Option<Vec<TopItem>>,
  pub anime_studios:
    Option<Vec<TopItem>>,
  pub anime_staff:
    Option<Vec<TopItem>>,
  pub manga_genres:
    Option<Vec<TopItem>>,
  pub manga_tags:
    Option<Vec<TopItem>>,
  pub manga_staff:
    Option<Vec<TopItem>>
}

impl UserStats {
  pub fn top_list(
    &self,
    key: StatKey
  ) -> Option<&[TopItem]> {
    let list = match key {
      | StatKey::AnimeGenres => {
        &self.anime_genres
      }
      | StatKey::AnimeTags => {
        &self.anime_tags
      }
      | StatKey::AnimeVoiceActors => {
        &self.anime_voice_actors
      }
      | StatKey::AnimeStudios => {
        &self.anime_studios
      }
      | StatKey::AnimeStaff => {
        &self.anime_staff
      }
      | StatKey::MangaGenres => {
        &self.manga_genres
      }
      | StatKey::MangaTags => {
        &self.manga_tags
      }
      | StatKey::MangaStaff => {
        &self.manga_staff
      }
      | StatKey::AnimeStats
      | StatKey::SocialStats
      | StatKey::MangaStats => {
        return None;
      }
    };

    list.as_deref()
  }

  pub fn set_top_list(
    &mut self,
    key: StatKey,
    items: Vec<TopItem>
  ) {
    let slot = match key {
      | StatKey::AnimeGenres => {
        &mut self.anime_genres
      }
      | StatKey::AnimeTags => {
        &mut self.anime_tags
      }
      | StatKey::AnimeVoiceActors => {
        &mut self.anime_voice_actors
      }
      | StatKey::AnimeStudios => {
        &mut self.anime_studios
      }
      | StatKey::AnimeStaff => {
        &mut self.anime_staff
      }
      | StatKey::MangaGenres => {
        &mut self.manga_genres
      }
      | StatKey::MangaTags => {
        &mut self.manga_tags
      }
      | StatKey::MangaStaff => {
        &mut self.manga_staff
      }
      | StatKey::AnimeStats
      | StatKey::SocialStats
      | StatKey::MangaStats => return
    };

    *slot = Some(items);
  }

  pub fn has(
    &self,
    key: StatKey
  ) -> bool {
    match key {
      | StatKey::AnimeStats => {
        self.anime.is_some()
      }
      | StatKey::MangaStats => {
        self.manga.is_some()
      }
      | StatKey::SocialStats => {
        self.social.is_some()
      }
      | other => {
        self.top_list(other).is_some()
      }
    }
  }
}

/// Card palette in the order it is
/// stored: title, background, text,
/// circle.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]

pub struct CardColors {
  pub title:      String,
  pub background: String,
  pub text:       String,
  pub circle:     String
}

impl Default for CardColors {
  fn default() -> Self {
    Self {
      title:      "#fe428e".into(),
      background: "#141321".into(),
      text:       "#a9fef7".into(),
      circle:     "#fe428e".into()
    }
  }
}

impl CardColors {
  pub fn new(
    title: &str,
    background: &str,
    text: &str,
    circle: &str
  ) -> Result<Self, DomainError> {
    Ok(Self {
      title:      validate_color(title)?,
      background: validate_color(
        background
      )?,
      text:       validate_color(text)?,
      circle:     validate_color(
        circle
      )?
    })
  }

  pub fn parse_list(
    raw: &str
  ) -> Result<Self, DomainError> {
    let parts: Vec<&str> =
      raw.split(',').collect();

    match parts.as_slice() {
      | [title, background, text, circle] => {
        Self::new(
          title, background, text,
          circle
        )
      }
      | other => {
        Err(DomainError::ColorCount(
          other.len()
        ))
      }
    }
  }

  pub fn to_list(&self) -> String {
    [
      self.title.as_str(),
      self.background.as_str(),
      self.text.as_str(),
      self.circle.as_str()
    ]
    .join(",")
  }
}

/// Accepts `#rgb`, `#rrggbb` and
/// `#rrggbbaa`; the value ends up
/// inside a stylesheet so nothing else
/// is let through.
pub fn validate_color(
  raw: &str
) -> Result<String, DomainError> {
  let trimmed = raw.trim();

  let valid = trimmed
    .strip_prefix('#')
    .is_some_and(|hex| {
      matches!(hex.len(), 3 | 6 | 8)
        && hex
          .chars()
          .all(|c| c.is_ascii_hexdigit())
    });

  if valid {
    Ok(trimmed.to_ascii_lowercase())
  } else {
    Err(DomainError::InvalidColor(
      trimmed.to_string()
    ))
  }
}

/// Sorts by count descending and keeps
/// the first `n`. The sort is stable so
/// ties keep the API order.
pub fn top_items(
  mut items: Vec<TopItem>,
  n: usize
) -> Vec<TopItem> {
  items.sort_by(|a, b| {
    b.count.cmp(&a.count)
  });
  items.truncate(n);
  items
}
