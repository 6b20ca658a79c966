//! Run configuration.
//!
//! Settings live in an ini file (settings.ini by default) with the
//! prediction service credentials in one section and utility defaults in
//! another. See [`Settings`] for the full key list.

mod file;

pub use file::{Settings, SettingsError};
