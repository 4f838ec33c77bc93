//! Reconciliation and transfer engine.
//!
//! A run reads the remote inventory ([`inventory::fetch`]), optionally removes
//! remote duplicates ([`dedupe::delete_duplicates`]), then walks the local
//! library ([`scan::scan`]) and uploads whatever the remote side is missing
//! ([`reconcile::reconcile`]). [`reconcile::sync`] does all of it.
//!
//! Everything runs on one task: each remote call is awaited before the next
//! one starts, and retries sleep in place.

mod context;
pub mod dedupe;
pub mod error;
pub mod inventory;
pub mod reconcile;
pub mod retry;
pub mod scan;
pub mod snapshot;
pub mod transfer;

pub use crate::context::Context;
pub use crate::reconcile::{Decision, Reconciliation, Tallies, reconcile, reconcile_photo, sync};
pub use crate::retry::RetryPolicy;
pub use crate::scan::{LocalPhoto, ScanFilter};
pub use crate::snapshot::{Album, Photo, Snapshot};
