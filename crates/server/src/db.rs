use std::path::Path;

use anicards_core::anilist::AniListClient;
use anicards_core::domain::model::CardColors;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{
  SqliteConnectOptions,
  SqlitePoolOptions
};

use crate::app_state::AppState;
use crate::config::{
  ConfigError,
  ServerConfig,
  SqlDialect,
  validate_schema_name
};

pub async fn connect_db(
  config: &ServerConfig,
  config_path: &Path,
  anilist: AniListClient,
  default_colors: CardColors
) -> Result<AppState, ConfigError> {
  match config.dialect()? {
    | SqlDialect::Sqlite => {
      let base_dir = config_path
        .parent()
        .ok_or_else(|| {
          ConfigError::Invalid(
            "config path has no parent"
              .into()
          )
        })?;

      let path =
        config.sqlite_path(base_dir);

      let options =
        SqliteConnectOptions::new()
          .filename(&path)
          .create_if_missing(true)
          .foreign_keys(true);

      let pool =
        SqlitePoolOptions::new()
          .max_connections(5)
          .connect_with(options)
          .await
          .map_err(|e| {
            ConfigError::Invalid(
              format!(
                "sqlite connect \
                 failed: {e}"
              )
            )
          })?;

      tracing::info!(
        path = %path.display(),
        "sqlite database opened"
      );

      Ok(AppState {
        sqlite: Some(pool),
        postgres: None,
        anilist,
        default_colors
      })
    }
    | SqlDialect::Postgres => {
      let pg = config
        .postgres
        .as_ref()
        .ok_or_else(|| {
          ConfigError::Invalid(
            "postgres section missing"
              .into()
          )
        })?;

      let schema =
        validate_schema_name(
          &pg.schema
        )?;

      let url = format!(
        "postgres://{}:{}@{}:{}/{}?\
         sslmode={}",
        pg.user,
        pg.password,
        pg.host,
        pg.port,
        pg.database,
        pg.ssl_mode
      );

      let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(set_search_path(
          schema.clone()
        ))
        .connect(&url)
        .await
        .map_err(|e| {
          ConfigError::Invalid(format!(
            "postgres connect failed: \
             {e}"
          ))
        })?;

      tracing::info!(
        host = %pg.host,
        schema = %schema,
        "postgres pool connected"
      );

      Ok(AppState {
        sqlite: None,
        postgres: Some(pool),
        anilist,
        default_colors
      })
    }
  }
}

const TABLES: [&str; 3] =
  ["svgs", "statcards", "users"];

pub async fn reset_server_data(
  config: &ServerConfig,
  state: &AppState
) -> Result<(), ConfigError> {
  match config.dialect()? {
    | SqlDialect::Sqlite => {
      let pool = state
        .sqlite
        .as_ref()
        .ok_or_else(|| {
          ConfigError::Invalid(
            "sqlite pool missing"
              .into()
          )
        })?;

      for table in TABLES {
        let query = format!(
          "DELETE FROM {table}"
        );

        if let Err(e) =
          sqlx::query(&query)
            .execute(pool)
            .await
          && !is_missing_table_error(&e)
        {
          return Err(
            ConfigError::Invalid(
              format!(
                "cleanup {table} \
                 failed: {e}"
              )
            )
          );
        }
      }
    }
    | SqlDialect::Postgres => {
      let pool = state
        .postgres
        .as_ref()
        .ok_or_else(|| {
          ConfigError::Invalid(
            "postgres pool missing"
              .into()
          )
        })?;

      let schema = config
        .postgres
        .as_ref()
        .ok_or_else(|| {
          ConfigError::Invalid(
            "postgres section missing"
              .into()
          )
        })?
        .schema
        .as_str();

      let schema =
        validate_schema_name(schema)?;

      let table_list = TABLES
        .iter()
        .map(|t| {
          format!(
            "{}.{}",
            quote_ident(&schema),
            quote_ident(t)
          )
        })
        .collect::<Vec<_>>()
        .join(", ");

      let stmt = format!(
        "TRUNCATE TABLE {table_list} \
         RESTART IDENTITY CASCADE"
      );

      if let Err(e) = sqlx::query(&stmt)
        .execute(pool)
        .await
        && !is_missing_table_error(&e)
      {
        return Err(
          ConfigError::Invalid(
            format!(
              "cleanup failed: {e}"
            )
          )
        );
      }
    }
  }

  tracing::warn!(
    "server data reset on start"
  );

  Ok(())
}

#[allow(clippy::type_complexity)]
pub fn set_search_path(
  schema: String
) -> impl Fn(
  &mut sqlx::PgConnection,
  sqlx::pool::PoolConnectionMetadata
) -> std::pin::Pin<
  Box<
    dyn std::future::Future<
        Output = Result<
          (),
          sqlx::Error
        >
      > + Send
      + '_
  >
> {
  let schema_name = schema;

  move |conn, _meta| {
    let schema_copy =
      schema_name.clone();

    Box::pin(async move {
      let schema_ident =
        quote_ident(&schema_copy);

      let create_stmt = format!(
        "CREATE SCHEMA IF NOT EXISTS \
         {schema_ident}"
      );

      sqlx::query(&create_stmt)
        .execute(&mut *conn)
        .await?;

      let search_stmt = format!(
        "SET search_path TO \
         {schema_ident}"
      );

      sqlx::query(&search_stmt)
        .execute(&mut *conn)
        .await?;

      Ok(())
    })
  }
}

fn is_missing_table_error(
  e: &sqlx::Error
) -> bool {
  matches!(
      e,
      sqlx::Error::Database(db_err)
        if db_err.code().as_deref() == Some("42P01")
          || db_err.message().contains("no such table")
  )
}

pub fn quote_ident(
  name: &str
) -> String {
  format!(
    "\"{}\"",
    name.replace('"', "\"\"")
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identifiers_are_quoted() {
    assert_eq!(
      quote_ident("svg"),
      "\"svg\""
    );
    assert_eq!(
      quote_ident("a\"b"),
      "\"a\"\"b\""
    );
  }
}
