//! Router Module Index
//!
//! One module per store, plus the public service endpoints. Each store lives on a single
//! path and dispatches on the HTTP verb, with the resource selected by query parameters.

/// Health probe.
pub mod public;

/// Content Store: news, achievements, gallery, settings.
pub mod content;

/// Registration Store: sign-ups and the admin flag.
pub mod registrations;
