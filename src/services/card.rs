//! Card service — normalization, insert, and reads for business cards.
//!
//! DESIGN
//! ======
//! Submissions arrive as a loose bag of optional strings. `NewCard` is the
//! trimmed, validated form; building it is the only place the identity rule
//! (one of name/email/phone/company) is enforced, so nothing reaches the
//! store without passing it.
//!
//! Title, address, and free-form notes have no columns of their own. They
//! are folded into the `notes` column as labeled lines at insert time.
//!
//! ERROR HANDLING
//! ==============
//! Every operation is a single statement, so a failed insert leaves no row
//! behind. Store errors are passed up unchanged for the route layer to
//! report.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

// =============================================================================
// TYPES
// =============================================================================

pub const VALIDATION_MESSAGE: &str = "At least one of name, email, phone, or company is required";

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("At least one of name, email, phone, or company is required")]
    Validation,
    #[error("card not found: {0}")]
    NotFound(i64),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Raw submitted fields, as decoded from either a JSON or a form body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub title: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Trimmed submission that satisfies the identity rule.
///
/// Serializes with the submitted field names; create responses echo it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCard {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub website: String,
    pub title: String,
    pub address: String,
    pub notes: String,
}

/// Persisted card, keyed by column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CardRow {
    pub id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    /// Creation time rendered by the store as ISO-8601, with an offset only
    /// when the column carries one.
    pub dt: Option<String>,
}

fn trimmed(value: Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_owned()
}

impl NewCard {
    /// Trim every field and enforce the identity rule.
    ///
    /// # Errors
    ///
    /// Returns `CardError::Validation` when name, email, phone, and company
    /// are all blank.
    pub fn from_fields(fields: CardFields) -> Result<Self, CardError> {
        let card = Self {
            name: trimmed(fields.name),
            email: trimmed(fields.email),
            phone: trimmed(fields.phone),
            company: trimmed(fields.company),
            website: trimmed(fields.website),
            title: trimmed(fields.title),
            address: trimmed(fields.address),
            notes: trimmed(fields.notes),
        };

        if [&card.name, &card.email, &card.phone, &card.company]
            .iter()
            .all(|field| field.is_empty())
        {
            return Err(CardError::Validation);
        }

        Ok(card)
    }

    /// Stored `notes` value: one labeled line per non-empty sub-field.
    #[must_use]
    pub fn combined_notes(&self) -> String {
        [("Title", &self.title), ("Address", &self.address), ("Notes", &self.notes)]
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// QUERIES
// =============================================================================

// `to_json` renders `dt` as ISO-8601 and keeps the offset when the column is
// `timestamptz`; a plain `timestamp` comes back without one.
const LIST_CARDS_SQL: &str = r#"SELECT c.id::bigint AS id, c.full_name, c.email, c.phone, c.company_name,
       c.website, c.notes, to_json(c.dt) #>> '{}' AS dt
FROM business_cards c
ORDER BY c.dt DESC, c.id DESC"#;

const GET_CARD_SQL: &str = r#"SELECT c.id::bigint AS id, c.full_name, c.email, c.phone, c.company_name,
       c.website, c.notes, to_json(c.dt) #>> '{}' AS dt
FROM business_cards c
WHERE c.id = $1"#;

/// Insert a card and return its store-assigned id.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_card(pool: &PgPool, card: &NewCard) -> Result<i64, CardError> {
    let (id,) = sqlx::query_as::<_, (i64,)>(
        "INSERT INTO business_cards (full_name, email, phone, company_name, website, notes)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id::bigint",
    )
    .bind(&card.name)
    .bind(&card.email)
    .bind(&card.phone)
    .bind(&card.company)
    .bind(&card.website)
    .bind(card.combined_notes())
    .fetch_one(pool)
    .await?;

    info!(card_id = id, "saved business card");
    Ok(id)
}

/// List every card, most recently created first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_cards(pool: &PgPool) -> Result<Vec<CardRow>, CardError> {
    let rows = sqlx::query_as::<_, CardRow>(LIST_CARDS_SQL).fetch_all(pool).await?;
    Ok(rows)
}

/// Fetch one card by id.
///
/// # Errors
///
/// Returns `CardError::NotFound` if no row has this id, or a database error
/// if the query fails.
pub async fn get_card(pool: &PgPool, id: i64) -> Result<CardRow, CardError> {
    sqlx::query_as::<_, CardRow>(GET_CARD_SQL)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(CardError::NotFound(id))
}

#[cfg(test)]
#[path = "card_test.rs"]
mod tests;
