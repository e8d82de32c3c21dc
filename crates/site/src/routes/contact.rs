//! Contact form route handlers.
//!
//! Renders the form, validates submissions, stores them, and fires off
//! notification mail without blocking the response.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::models::{ContactForm, NewContact};
use crate::services::Mailer;
use crate::state::AppState;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    /// Show the thank-you banner after a successful submission.
    pub success: bool,
}

/// Query string for the contact page.
#[derive(Debug, Deserialize)]
pub struct ContactQuery {
    pub success: Option<String>,
}

/// Display the contact form.
#[instrument]
pub async fn show(Query(query): Query<ContactQuery>) -> impl IntoResponse {
    ContactTemplate {
        success: query.success.as_deref() == Some("true"),
    }
}

/// Accept a contact form submission.
///
/// The submission is validated and stored, then notification mail goes out
/// on background tasks so relay latency never delays the redirect.
///
/// # Errors
///
/// Returns `AppError::Validation` for an incomplete form,
/// `AppError::StorageDisabled` when no database is configured, or
/// `AppError::Database` if the insert fails.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<Redirect, AppError> {
    let submission = NewContact::parse(form)?;
    let stored = state.contacts()?.create(&submission).await?;

    tracing::info!(id = %stored.id, subject = %stored.subject, "Contact submission stored");

    if let Some(mailer) = state.mailer() {
        notify(mailer.clone(), submission);
    } else {
        tracing::warn!("Mail is not configured; skipping contact notifications");
    }

    Ok(Redirect::to("/contact?success=true"))
}

/// Send both notification messages on background tasks.
///
/// Delivery failures are logged and never surfaced to the visitor; the
/// submission is already stored at this point.
fn notify(mailer: Mailer, submission: NewContact) {
    let admin_mailer = mailer.clone();
    let admin_copy = submission.clone();
    tokio::spawn(async move {
        if let Err(e) = admin_mailer.send_contact_notification(&admin_copy).await {
            tracing::warn!("Failed to send admin notification: {e}");
        }
    });

    tokio::spawn(async move {
        if let Err(e) = mailer.send_contact_confirmation(&submission).await {
            tracing::warn!("Failed to send confirmation: {e}");
        }
    });
}
