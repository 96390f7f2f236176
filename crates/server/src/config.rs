use std::path::{
  Path,
  PathBuf
};
use std::time::Duration;

use anicards_core::anilist::DEFAULT_ENDPOINT;
use anicards_core::domain::model::CardColors;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]

pub enum ConfigError {
  #[error("config IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("config parse error: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("config invalid: {0}")]
  Invalid(String)
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]

pub enum AppMode {
  Dev,
  Prod
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]

pub enum SqlDialect {
  Sqlite,
  Postgres
}

#[derive(Debug, Deserialize)]

pub struct ServerConfig {
  pub app:      AppConfig,
  pub http:     HttpConfig,
  pub database: DatabaseConfig,
  pub sqlite:   SqliteConfig,
  pub postgres: Option<PostgresConfig>,
  pub logging:  LoggingConfig,
  pub anilist:  AniListConfig,
  #[serde(default)]
  pub cards:    CardsConfig,
  pub dev:      DevConfig
}

#[derive(Debug, Deserialize)]

pub struct AppConfig {
  pub mode: AppMode
}

#[derive(Debug, Deserialize)]

pub struct HttpConfig {
  pub host: String,
  pub port: u16
}

#[derive(Debug, Deserialize)]

pub struct DatabaseConfig {
  pub dialect: String
}

#[derive(Debug, Deserialize)]

pub struct SqliteConfig {
  pub path: String
}

#[derive(Debug, Deserialize)]

pub struct PostgresConfig {
  pub host:     String,
  pub port:     u16,
  pub database: String,
  pub user:     String,
  pub password: String,
  pub ssl_mode: String,
  pub schema:   String
}

#[derive(Debug, Deserialize)]

pub struct LoggingConfig {
  pub level: Option<String>
}

#[derive(Debug, Deserialize)]

pub struct AniListConfig {
  pub endpoint:        Option<String>,
  pub timeout_seconds: u64,
  pub user_agent:      String
}

#[derive(Debug, Default, Deserialize)]

pub struct CardsConfig {
  pub title_color:      Option<String>,
  pub background_color: Option<String>,
  pub text_color:       Option<String>,
  pub circle_color:     Option<String>
}

#[derive(Debug, Deserialize)]

pub struct DevConfig {
  pub reset_on_start: bool
}

impl ServerConfig {
  pub async fn load(
    path: &Path
  ) -> Result<Self, ConfigError> {
    let base_dir = path
      .parent()
      .ok_or_else(|| {
        ConfigError::Invalid(
          "config path has no parent"
            .into()
        )
      })?;

    let schema_path = base_dir
      .join("schemas")
      .join("server.schema.json");

    let schema =
      load_schema(&schema_path).await?;

    let content =
      tokio::fs::read_to_string(path)
        .await?;

    Self::parse(
      &schema,
      &content,
      &path.display().to_string()
    )
  }

  pub fn parse(
    schema: &str,
    content: &str,
    name: &str
  ) -> Result<Self, ConfigError> {
    validate_toml(
      schema, content, name
    )?;

    let config: ServerConfig =
      toml::from_str(content)?;

    config.dialect()?;
    config.default_colors()?;

    Ok(config)
  }

  pub fn dialect(
    &self
  ) -> Result<SqlDialect, ConfigError>
  {
    match self
      .database
      .dialect
      .trim()
      .to_lowercase()
      .as_str()
    {
      | "sqlite" => {
        Ok(SqlDialect::Sqlite)
      }
      | "postgres" => {
        Ok(SqlDialect::Postgres)
      }
      | other => {
        Err(ConfigError::Invalid(
          format!(
            "invalid database.dialect \
             '{other}'"
          )
        ))
      }
    }
  }

  pub fn sqlite_path(
    &self,
    base_dir: &Path
  ) -> PathBuf {
    let raw = self.sqlite.path.trim();

    if raw.is_empty() {
      return base_dir
        .join("anicards.sqlite");
    }

    base_dir.join(raw)
  }

  pub fn anilist_endpoint(
    &self
  ) -> &str {
    self
      .anilist
      .endpoint
      .as_deref()
      .map(str::trim)
      .filter(|e| !e.is_empty())
      .unwrap_or(DEFAULT_ENDPOINT)
  }

  pub fn anilist_timeout(
    &self
  ) -> Duration {
    Duration::from_secs(
      self
        .anilist
        .timeout_seconds
        .max(1)
    )
  }

  /// Palette used when a generate
  /// request leaves a colour out.
  pub fn default_colors(
    &self
  ) -> Result<CardColors, ConfigError>
  {
    let fallback = CardColors::default();
    let cards = &self.cards;

    CardColors::new(
      cards
        .title_color
        .as_deref()
        .unwrap_or(&fallback.title),
      cards
        .background_color
        .as_deref()
        .unwrap_or(
          &fallback.background
        ),
      cards
        .text_color
        .as_deref()
        .unwrap_or(&fallback.text),
      cards
        .circle_color
        .as_deref()
        .unwrap_or(&fallback.circle)
    )
    .map_err(|e| {
      ConfigError::Invalid(format!(
        "cards: {e}"
      ))
    })
  }
}

async fn load_schema(
  path: &Path
) -> Result<String, ConfigError> {
  let content =
    tokio::fs::read_to_string(path)
      .await
      .map_err(|_| {
        ConfigError::Invalid(format!(
          "schema not found at {}",
          path.display()
        ))
      })?;

  Ok(content)
}

fn validate_toml(
  schema: &str,
  toml_input: &str,
  name: &str
) -> Result<(), ConfigError> {
  let schema_json: serde_json::Value =
    serde_json::from_str(schema)
      .map_err(|e| {
        ConfigError::Invalid(format!(
          "schema parse error: {e}"
        ))
      })?;

  let compiled =
    jsonschema::validator_for(
      &schema_json
    )
    .map_err(|e| {
      ConfigError::Invalid(format!(
        "schema compile error: {e}"
      ))
    })?;

  let toml_value: toml::Value =
    toml::from_str(toml_input)
      .map_err(|e| {
        ConfigError::Invalid(format!(
          "{name}: {e}"
        ))
      })?;

  let json_value =
    serde_json::to_value(toml_value)
      .map_err(|e| {
        ConfigError::Invalid(
          e.to_string()
        )
      })?;

  let mut errors =
    compiled.iter_errors(&json_value);

  if let Some(err) = errors.next() {
    let mut messages =
      vec![err.to_string()];

    for e in errors.take(4) {
      messages.push(e.to_string());
    }

    return Err(ConfigError::Invalid(
      format!(
        "schema validation failed for \
         {name}: {}",
        messages.join("; ")
      )
    ));
  }

  Ok(())
}

pub(crate) fn validate_schema_name(
  raw: &str
) -> Result<String, ConfigError> {
  let trimmed = raw.trim();

  if trimmed.is_empty() {
    return Err(ConfigError::Invalid(
      "postgres schema cannot be empty"
        .into()
    ));
  }

  if !trimmed.chars().all(|c| {
    c.is_ascii_alphanumeric()
      || c == '_'
  }) {
    return Err(ConfigError::Invalid(
      format!(
        "invalid postgres schema \
         '{trimmed}': only \
         alphanumeric and '_' allowed"
      )
    ));
  }

  Ok(trimmed.to_string())
}
