//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own normalization and persistence so route handlers can
//! stay focused on request decoding and status mapping.

pub mod card;
