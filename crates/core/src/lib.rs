//! Domain core for the label back-office.
//!
//! Everything in this crate is pure and synchronous: callers fetch
//! snapshots from the registration store and pass them in. There are no
//! database or async dependencies here.

pub mod batch;
pub mod error;
pub mod import_export;
pub mod isrc;
pub mod lifecycle;
pub mod notice;
pub mod reconciliation;
pub mod registration;
pub mod shares;
pub mod types;
