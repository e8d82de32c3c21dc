//! Contact submission models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use larkspur_core::{ContactId, ContactStatus};

/// Errors produced while reading submitted form data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid id: {0}")]
    InvalidId(String),
}

/// A stored contact submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
}

/// Raw contact form fields as posted by the browser.
///
/// Every field defaults to empty so a partial post deserializes and is
/// rejected by [`NewContact::parse`] instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// A validated contact submission ready to be stored.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl NewContact {
    /// Validate a posted form.
    ///
    /// Fields are trimmed; a field that is empty after trimming fails with
    /// the first missing field in form order.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingField` naming the offending field.
    pub fn parse(form: ContactForm) -> Result<Self, FormError> {
        Ok(Self {
            name: required_field("name", &form.name)?,
            email: required_field("email", &form.email)?,
            phone: required_field("phone", &form.phone)?,
            subject: required_field("subject", &form.subject)?,
            message: required_field("message", &form.message)?,
        })
    }
}

fn required_field(name: &'static str, value: &str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingField(name));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled_form() -> ContactForm {
        ContactForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+44 20 7946 0000".to_string(),
            subject: "Commission inquiry".to_string(),
            message: "I would like to discuss a project.".to_string(),
        }
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let mut form = filled_form();
        form.name = "  Ada Lovelace  ".to_string();
        form.message = "\n\tHello\n".to_string();

        let contact = NewContact::parse(form).unwrap();
        assert_eq!(contact.name, "Ada Lovelace");
        assert_eq!(contact.message, "Hello");
    }

    #[test]
    fn test_parse_rejects_empty_field() {
        let mut form = filled_form();
        form.message = String::new();

        let err = NewContact::parse(form).unwrap_err();
        assert_eq!(err, FormError::MissingField("message"));
    }

    #[test]
    fn test_parse_rejects_whitespace_only_field() {
        let mut form = filled_form();
        form.email = "   ".to_string();

        let err = NewContact::parse(form).unwrap_err();
        assert_eq!(err, FormError::MissingField("email"));
    }

    #[test]
    fn test_parse_reports_first_missing_field_in_form_order() {
        let form = ContactForm {
            name: String::new(),
            email: String::new(),
            phone: "123".to_string(),
            subject: "Hi".to_string(),
            message: "Hello".to_string(),
        };

        let err = NewContact::parse(form).unwrap_err();
        assert_eq!(err, FormError::MissingField("name"));
    }

    #[test]
    fn test_form_error_display() {
        assert_eq!(
            FormError::MissingField("subject").to_string(),
            "missing required field: subject"
        );
        assert_eq!(
            FormError::InvalidId("abc".to_string()).to_string(),
            "invalid id: abc"
        );
    }
}
