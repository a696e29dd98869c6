//! Card routes — submission decoding, create, list, and fetch.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::Form;
use serde::Serialize;

use crate::services::card::{self, CardError, CardFields, CardRow, NewCard};
use crate::state::AppState;

// =============================================================================
// ERRORS
// =============================================================================

/// JSON error body (`{"error": ...}`) with its status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

/// Map a service error to a response. `context` prefixes store failures.
pub(crate) fn card_error_to_api(err: CardError, context: &str) -> ApiError {
    match err {
        CardError::Validation => ApiError::new(StatusCode::BAD_REQUEST, card::VALIDATION_MESSAGE),
        CardError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, "Card not found"),
        CardError::Database(e) => {
            tracing::error!(error = %e, context, "card store operation failed");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{context}: {e}"))
        }
    }
}

// =============================================================================
// SUBMISSION EXTRACTOR
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyKind {
    Json,
    UrlEncoded,
    Multipart,
    Other,
}

impl BodyKind {
    pub(crate) fn from_headers(headers: &HeaderMap) -> Self {
        let Some(raw) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
            return Self::Other;
        };
        let essence = raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        match essence.as_str() {
            "application/json" => Self::Json,
            "application/x-www-form-urlencoded" => Self::UrlEncoded,
            "multipart/form-data" => Self::Multipart,
            other if other.starts_with("application/") && other.ends_with("+json") => Self::Json,
            _ => Self::Other,
        }
    }
}

/// Card fields decoded according to the request's `Content-Type`.
///
/// JSON bodies go through `Json`, form bodies through `Form` or `Multipart`.
/// Both form encodings keep the first value of a repeated name.
/// Any other body decodes as an empty submission, which then fails
/// validation.
pub struct CardSubmission(pub CardFields);

impl<S> FromRequest<S> for CardSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match BodyKind::from_headers(req.headers()) {
            BodyKind::Json => {
                let Json(fields) = Json::<CardFields>::from_request(req, state)
                    .await
                    .map_err(|e| invalid_body(&e.body_text()))?;
                Ok(Self(fields))
            }
            BodyKind::UrlEncoded => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| invalid_body(&e.body_text()))?;
                let mut fields = CardFields::default();
                for (name, value) in pairs {
                    assign_field(&mut fields, &name, value);
                }
                Ok(Self(fields))
            }
            BodyKind::Multipart => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| invalid_body(&e.body_text()))?;
                let fields = read_multipart(multipart)
                    .await
                    .map_err(|e| invalid_body(&e.body_text()))?;
                Ok(Self(fields))
            }
            BodyKind::Other => Ok(Self(CardFields::default())),
        }
    }
}

fn invalid_body(cause: &str) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid request body: {cause}"))
}

async fn read_multipart(mut multipart: Multipart) -> Result<CardFields, MultipartError> {
    let mut fields = CardFields::default();
    while let Some(field) = multipart.next_field().await? {
        // Uploaded files are not form values.
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field.text().await?;
        assign_field(&mut fields, &name, value);
    }
    Ok(fields)
}

/// Store a named form value. The first occurrence of a name wins; unknown
/// names are ignored.
pub(crate) fn assign_field(fields: &mut CardFields, name: &str, value: String) {
    let slot = match name {
        "name" => &mut fields.name,
        "email" => &mut fields.email,
        "phone" => &mut fields.phone,
        "company" => &mut fields.company,
        "website" => &mut fields.website,
        "title" => &mut fields.title,
        "address" => &mut fields.address,
        "notes" => &mut fields.notes,
        _ => return,
    };
    if slot.is_none() {
        *slot = Some(value);
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Serialize)]
pub struct CreateCardResponse {
    pub message: &'static str,
    pub id: i64,
    pub data: NewCard,
}

#[derive(Serialize)]
pub struct CardListResponse {
    pub cards: Vec<CardRow>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct CardResponse {
    pub card: CardRow,
}

/// `POST /process-card` — validate, normalize, and store one card.
///
/// `data` echoes the trimmed submission, so `data.notes` is the raw notes
/// field rather than the combined value written to the `notes` column.
pub async fn process_card(
    State(state): State<AppState>,
    CardSubmission(fields): CardSubmission,
) -> Result<Json<CreateCardResponse>, ApiError> {
    tracing::debug!(?fields, "received card submission");

    let card = NewCard::from_fields(fields).map_err(|e| card_error_to_api(e, "Save failed"))?;
    let id = card::create_card(&state.pool, &card)
        .await
        .map_err(|e| card_error_to_api(e, "Save failed"))?;

    Ok(Json(CreateCardResponse { message: "Business card saved successfully", id, data: card }))
}

/// `GET /cards` — list every card, newest first.
pub async fn list_cards(State(state): State<AppState>) -> Result<Json<CardListResponse>, ApiError> {
    let cards = card::list_cards(&state.pool)
        .await
        .map_err(|e| card_error_to_api(e, "Failed to fetch cards"))?;
    let count = cards.len();
    Ok(Json(CardListResponse { cards, count }))
}

/// `GET /cards/:id` — fetch one card. Non-integer ids never reach the store.
pub async fn get_card(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CardResponse>, ApiError> {
    let Ok(Path(id)) = id else {
        return Err(ApiError::new(StatusCode::NOT_FOUND, "Not found"));
    };

    let card = card::get_card(&state.pool, id)
        .await
        .map_err(|e| card_error_to_api(e, "Failed to fetch card"))?;
    Ok(Json(CardResponse { card }))
}

#[cfg(test)]
#[path = "cards_test.rs"]
mod tests;
