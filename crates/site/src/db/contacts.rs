//! Contact submission repository.

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use larkspur_core::{ContactId, ContactStatus};

use super::RepositoryError;
use crate::models::{Contact, NewContact};

/// Repository for contact submissions.
pub struct ContactRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new repository with the given pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a validated submission and return the stored row.
    ///
    /// New submissions always start out pending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    pub async fn create(&self, submission: &NewContact) -> Result<Contact, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO contact (name, email, phone, subject, message, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, name, email, phone, subject, message, status
            ",
        )
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.phone)
        .bind(&submission.subject)
        .bind(&submission.message)
        .bind(ContactStatus::Pending.as_str())
        .fetch_one(self.pool)
        .await?;

        contact_from_row(&row)
    }

    /// List every submission, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails or a stored status is
    /// unreadable.
    pub async fn list_all(&self) -> Result<Vec<Contact>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, email, phone, subject, message, status
            FROM contact
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(contact_from_row).collect()
    }

    /// Mark a submission completed. Returns `false` when no row matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the update fails.
    pub async fn mark_completed(&self, id: ContactId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE contact SET status = ?1 WHERE id = ?2")
            .bind(ContactStatus::Completed.as_str())
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a submission. Returns `false` when no row matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the delete fails.
    pub async fn delete(&self, id: ContactId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM contact WHERE id = ?1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn contact_from_row(row: &SqliteRow) -> Result<Contact, RepositoryError> {
    let status_raw: String = row.try_get("status")?;
    let status = status_raw
        .parse::<ContactStatus>()
        .map_err(RepositoryError::DataCorruption)?;

    Ok(Contact {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        subject: row.try_get("subject")?,
        message: row.try_get("message")?,
        status,
    })
}
