//! Admin route handlers for reviewing contact submissions.
//!
//! These routes carry no authentication yet; keep them behind access
//! control at the edge.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use larkspur_core::ContactId;

use crate::error::AppError;
use crate::filters;
use crate::models::{Contact, FormError};
use crate::state::AppState;

/// Admin contact list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/contacts.html")]
pub struct AdminContactsTemplate {
    pub contacts: Vec<Contact>,
}

/// Form carrying the id of the submission to act on.
#[derive(Debug, Deserialize)]
pub struct ContactActionForm {
    #[serde(default)]
    pub id: String,
}

/// List every contact submission, oldest first.
///
/// # Errors
///
/// Returns `AppError::StorageDisabled` when no database is configured, or
/// `AppError::Database` if the query fails.
#[instrument(skip(state))]
pub async fn list_contacts(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let contacts = state.contacts()?.list_all().await?;
    Ok(AdminContactsTemplate { contacts })
}

/// Mark a submission completed, then return to the list.
///
/// An id that matches no row is logged and otherwise ignored.
///
/// # Errors
///
/// Returns `AppError::Validation` for an unparseable id,
/// `AppError::StorageDisabled` when no database is configured, or
/// `AppError::Database` if the update fails.
#[instrument(skip(state))]
pub async fn update_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactActionForm>,
) -> Result<Redirect, AppError> {
    let id = parse_contact_id(&form.id)?;
    if !state.contacts()?.mark_completed(id).await? {
        tracing::warn!(%id, "Update targeted a contact that does not exist");
    }
    Ok(Redirect::to("/admin/contact"))
}

/// Delete a submission, then return to the list.
///
/// An id that matches no row is logged and otherwise ignored.
///
/// # Errors
///
/// Returns `AppError::Validation` for an unparseable id,
/// `AppError::StorageDisabled` when no database is configured, or
/// `AppError::Database` if the delete fails.
#[instrument(skip(state))]
pub async fn delete_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactActionForm>,
) -> Result<Redirect, AppError> {
    let id = parse_contact_id(&form.id)?;
    if !state.contacts()?.delete(id).await? {
        tracing::warn!(%id, "Delete targeted a contact that does not exist");
    }
    Ok(Redirect::to("/admin/contact"))
}

fn parse_contact_id(raw: &str) -> Result<ContactId, FormError> {
    raw.trim()
        .parse::<i64>()
        .map(ContactId::from)
        .map_err(|_| FormError::InvalidId(raw.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contact_id_accepts_trimmed_digits() {
        assert_eq!(parse_contact_id("42").unwrap(), ContactId::new(42));
        assert_eq!(parse_contact_id(" 7 ").unwrap(), ContactId::new(7));
    }

    #[test]
    fn test_parse_contact_id_rejects_garbage() {
        let err = parse_contact_id("abc").unwrap_err();
        assert_eq!(err, FormError::InvalidId("abc".to_string()));

        assert!(parse_contact_id("").is_err());
        assert!(parse_contact_id("12.5").is_err());
    }
}
