//! Stat card persistence. Every function runs against whichever pool the
//! server was started with.

use anicards_core::domain::model::{CardColors, CardType, StatKey};
use sqlx::{Pool, Sqlite};

use crate::app_state::AppState;
use crate::errors::{map_db_error, ServerError};
use crate::models::{GenerateRequest, StatCardRow, SvgRow, UserCards};

/// Swaps a user's stored cards for a freshly generated set. The user row is
/// upserted and the old statcard and svgs are replaced in one transaction.
pub async fn replace_user_cards(
    state: &AppState,
    username: &str,
    anilist_id: i64,
    request: &GenerateRequest,
    svgs: &[(StatKey, String)],
) -> Result<(), ServerError> {
    let keys = request.keys_list();
    let colors = request.colors.to_list();
    let card_type = request.card_type.as_str();

    if let Some(pool) = &state.postgres {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| map_db_error(e, "begin transaction failed"))?;

        let user_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, anilist_id, created_at, updated_at) \
             VALUES ($1, $2, NOW(), NOW()) \
             ON CONFLICT (username) DO UPDATE SET anilist_id = EXCLUDED.anilist_id, updated_at = NOW() \
             RETURNING id",
        )
        .bind(username)
        .bind(anilist_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, "user upsert failed"))?;

        sqlx::query("DELETE FROM svgs WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "svg cleanup failed"))?;
        sqlx::query("DELETE FROM statcards WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "statcard cleanup failed"))?;

        sqlx::query(
            "INSERT INTO statcards (user_id, keys, colors, card_type, generated_at) \
             VALUES ($1, $2, $3, $4, NOW())",
        )
        .bind(user_id)
        .bind(&keys)
        .bind(&colors)
        .bind(card_type)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, "statcard insert failed"))?;

        for (key, data) in svgs {
            sqlx::query("INSERT INTO svgs (user_id, key, data) VALUES ($1, $2, $3)")
                .bind(user_id)
                .bind(key.as_str())
                .bind(data)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_db_error(e, "svg insert failed"))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_db_error(e, "commit failed"))?;
        return Ok(());
    }

    let pool = sqlite_pool(state)?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| map_db_error(e, "begin transaction failed"))?;

    let user_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, anilist_id, created_at, updated_at) \
         VALUES (?1, ?2, datetime('now'), datetime('now')) \
         ON CONFLICT (username) DO UPDATE SET anilist_id = excluded.anilist_id, updated_at = excluded.updated_at \
         RETURNING id",
    )
    .bind(username)
    .bind(anilist_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_db_error(e, "user upsert failed"))?;

    sqlx::query("DELETE FROM svgs WHERE user_id = ?1")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, "svg cleanup failed"))?;
    sqlx::query("DELETE FROM statcards WHERE user_id = ?1")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, "statcard cleanup failed"))?;

    sqlx::query(
        "INSERT INTO statcards (user_id, keys, colors, card_type, generated_at) \
         VALUES (?1, ?2, ?3, ?4, datetime('now'))",
    )
    .bind(user_id)
    .bind(&keys)
    .bind(&colors)
    .bind(card_type)
    .execute(&mut *tx)
    .await
    .map_err(|e| map_db_error(e, "statcard insert failed"))?;

    for (key, data) in svgs {
        sqlx::query("INSERT INTO svgs (user_id, key, data) VALUES (?1, ?2, ?3)")
            .bind(user_id)
            .bind(key.as_str())
            .bind(data)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "svg insert failed"))?;
    }

    tx.commit()
        .await
        .map_err(|e| map_db_error(e, "commit failed"))?;
    Ok(())
}

pub async fn load_user_cards(
    state: &AppState,
    username: &str,
) -> Result<Option<UserCards>, ServerError> {
    let (card, svgs) = if let Some(pool) = &state.postgres {
        let card = sqlx::query_as::<_, StatCardRow>(
            "SELECT s.keys, s.colors, s.card_type FROM statcards s \
             JOIN users u ON u.id = s.user_id WHERE u.username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_db_error(e, "statcard query failed"))?;
        let svgs = sqlx::query_as::<_, SvgRow>(
            "SELECT v.key, v.data FROM svgs v \
             JOIN users u ON u.id = v.user_id WHERE u.username = $1 ORDER BY v.id",
        )
        .bind(username)
        .fetch_all(pool)
        .await
        .map_err(|e| map_db_error(e, "svg query failed"))?;
        (card, svgs)
    } else {
        let pool = sqlite_pool(state)?;
        let card = sqlx::query_as::<_, StatCardRow>(
            "SELECT s.keys, s.colors, s.card_type FROM statcards s \
             JOIN users u ON u.id = s.user_id WHERE u.username = ?1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(|e| map_db_error(e, "statcard query failed"))?;
        let svgs = sqlx::query_as::<_, SvgRow>(
            "SELECT v.key, v.data FROM svgs v \
             JOIN users u ON u.id = v.user_id WHERE u.username = ?1 ORDER BY v.id",
        )
        .bind(username)
        .fetch_all(pool)
        .await
        .map_err(|e| map_db_error(e, "svg query failed"))?;
        (card, svgs)
    };

    let Some(card) = card else {
        return Ok(None);
    };

    let keys = parse_keys(&card.keys)?;
    let colors = CardColors::parse_list(&card.colors)
        .map_err(|e| ServerError::internal(format!("stored colours unreadable: {e}")))?;
    let card_type: CardType = card
        .card_type
        .parse()
        .map_err(|e| ServerError::internal(format!("stored card type unreadable: {e}")))?;

    let mut svgs = svgs
        .into_iter()
        .map(|row| {
            let key: StatKey = row
                .key
                .parse()
                .map_err(|e| ServerError::internal(format!("stored svg key unreadable: {e}")))?;
            Ok((key, row.data))
        })
        .collect::<Result<Vec<_>, ServerError>>()?;
    svgs.sort_by_key(|(key, _)| keys.iter().position(|k| k == key).unwrap_or(usize::MAX));

    Ok(Some(UserCards {
        keys,
        colors,
        card_type,
        svgs,
    }))
}

pub async fn load_svg(
    state: &AppState,
    username: &str,
    key: StatKey,
) -> Result<Option<String>, ServerError> {
    if let Some(pool) = &state.postgres {
        return sqlx::query_scalar::<_, String>(
            "SELECT v.data FROM svgs v JOIN users u ON u.id = v.user_id \
             WHERE u.username = $1 AND v.key = $2",
        )
        .bind(username)
        .bind(key.as_str())
        .fetch_optional(pool)
        .await
        .map_err(|e| map_db_error(e, "svg query failed"));
    }

    let pool = sqlite_pool(state)?;
    sqlx::query_scalar::<_, String>(
        "SELECT v.data FROM svgs v JOIN users u ON u.id = v.user_id \
         WHERE u.username = ?1 AND v.key = ?2",
    )
    .bind(username)
    .bind(key.as_str())
    .fetch_optional(pool)
    .await
    .map_err(|e| map_db_error(e, "svg query failed"))
}

fn sqlite_pool(state: &AppState) -> Result<&Pool<Sqlite>, ServerError> {
    state
        .sqlite
        .as_ref()
        .ok_or_else(|| ServerError::internal("database pool missing"))
}

fn parse_keys(raw: &str) -> Result<Vec<StatKey>, ServerError> {
    raw.split(',')
        .filter(|k| !k.trim().is_empty())
        .map(|k| {
            k.parse::<StatKey>()
                .map_err(|e| ServerError::internal(format!("stored keys unreadable: {e}")))
        })
        .collect()
}
