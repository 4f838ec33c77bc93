//! The photo repository capability.
//!
//! Everything the sync engine needs from a photo-hosting service is expressed
//! by the [`PhotoRepository`] trait: listing albums and their photos page by
//! page, uploading a file, creating an album around a photo, appending a
//! photo to an album, and deleting a photo. Backends live in [`repository`].

pub mod error;
mod models;
pub mod repository;

pub use crate::models::{RemoteAlbum, RemotePhoto, title_from_path};
pub use crate::repository::PhotoRepository;
use std::sync::Arc;

pub type RepositoryHandle = Arc<dyn PhotoRepository + Send + Sync>;
