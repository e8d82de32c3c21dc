//! Business logic services for the site.
//!
//! # Services
//!
//! - `mailer` - Outbound notification mail for contact submissions

pub mod mailer;

pub use mailer::{CapturedMail, Mailer, MailerError};
