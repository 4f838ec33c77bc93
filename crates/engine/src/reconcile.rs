//! Local-to-remote reconciliation.
//!
//! Each eligible local file is looked up in the [`Snapshot`] by album name and
//! photo title. Anything missing is uploaded, and the snapshot is updated so
//! later files in the same run see the result.

use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::scan::{LocalPhoto, scan};
use crate::snapshot::{Album, Photo, Snapshot};
use crate::transfer::{self, Destination};
use crate::{dedupe, inventory};
use albumsync_remote::PhotoRepository;
use futures::StreamExt;
use std::pin::pin;

/// What happened to a single local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// A photo with the same title already exists in the album.
    AlreadyPresent,
    Uploaded {
        album_id: String,
        photo_id: String,
        created_album: bool,
    },
    /// Every upload attempt failed; the snapshot was left unchanged.
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tallies {
    pub uploaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Tallies {
    fn record(&mut self, decision: &Decision) {
        match decision {
            Decision::AlreadyPresent => self.skipped += 1,
            Decision::Uploaded { .. } => self.uploaded += 1,
            Decision::Failed => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// The inventory as it stands after every upload of the run.
    pub snapshot: Snapshot,
    pub tallies: Tallies,
}

/// Decide whether `photo` needs uploading and, if so, upload it.
pub async fn reconcile_photo(
    repository: &dyn PhotoRepository,
    ctx: &Context,
    snapshot: &mut Snapshot,
    photo: &LocalPhoto,
) -> Decision {
    let destination = match snapshot.get(&photo.album) {
        None => Destination::NewAlbum(photo.album.clone()),
        Some(album) if album.contains(&photo.title) => {
            tracing::debug!(photo.name = %photo.title, album.name = %photo.album, "[SKIP] Already uploaded");
            return Decision::AlreadyPresent;
        },
        Some(album) => Destination::Existing(album.id.clone()),
    };

    let transfer = match transfer::upload(repository, &ctx.upload, photo, destination).await {
        Ok(transfer) => transfer,
        Err(err) => {
            tracing::error!(photo.name = %photo.title, album.name = %photo.album, error = ?err, "[ERROR] Upload failed");
            return Decision::Failed;
        },
    };
    tracing::info!(
        photo.name = %photo.title,
        album.name = %photo.album,
        photo.id = %transfer.photo_id,
        "[OK] Photo uploaded"
    );

    let uploaded = Photo::new(&transfer.photo_id, &photo.title);
    match snapshot.get_mut(&photo.album) {
        Some(album) => album.insert(uploaded),
        None => snapshot.insert(&photo.album, Album::new(&transfer.album_id, [uploaded])),
    }
    Decision::Uploaded {
        album_id: transfer.album_id,
        photo_id: transfer.photo_id,
        created_album: transfer.created_album,
    }
}

/// Walk the library and reconcile every eligible file against `snapshot`.
///
/// Scan errors and failed uploads are logged and do not stop the run.
pub async fn reconcile(repository: &dyn PhotoRepository, ctx: &Context, mut snapshot: Snapshot) -> Reconciliation {
    let mut tallies = Tallies::default();
    let mut photos = pin!(scan(&ctx.root, &ctx.filter));
    while let Some(item) = photos.next().await {
        let photo = match item {
            Ok(photo) => photo,
            Err(err) => {
                tracing::error!(error = ?err, "Could not read part of the photo library");
                continue;
            },
        };
        let decision = reconcile_photo(repository, ctx, &mut snapshot, &photo).await;
        tallies.record(&decision);
    }
    tracing::info!(
        uploaded = tallies.uploaded,
        skipped = tallies.skipped,
        failed = tallies.failed,
        "[OK] Reconciliation complete"
    );
    Reconciliation { snapshot, tallies }
}

/// A full run: inventory, optional duplicate removal, then reconciliation.
pub async fn sync(repository: &dyn PhotoRepository, ctx: &Context) -> Result<Reconciliation> {
    let is_dir = tokio::fs::metadata(&ctx.root).await.map(|m| m.is_dir()).unwrap_or(false);
    if !is_dir {
        exn::bail!(ErrorKind::LibraryRoot(ctx.root.clone()));
    }
    let snapshot = inventory::fetch(repository, &ctx.retrieve).await?;
    if ctx.delete_duplicates {
        dedupe::delete_duplicates(repository, &snapshot).await;
    }
    Ok(reconcile(repository, ctx, snapshot).await)
}
