//! Domain models for the site.

pub mod contact;

pub use contact::*;
