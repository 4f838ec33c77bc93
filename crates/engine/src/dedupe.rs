use crate::snapshot::Snapshot;
use albumsync_remote::PhotoRepository;

/// Delete remote photos whose title repeats the previous photo's title in
/// the same album.
///
/// Albums are visited in listing order, and the first photo of every run of
/// equal titles is kept. The snapshot itself is left untouched. Returns the
/// number of photos actually deleted.
pub async fn delete_duplicates(repository: &dyn PhotoRepository, snapshot: &Snapshot) -> usize {
    let mut deleted = 0;
    for (title, album) in snapshot.iter() {
        for pair in album.photos().windows(2) {
            let (previous, photo) = (&pair[0], &pair[1]);
            if photo.title != previous.title {
                continue;
            }
            tracing::warn!(album.name = title, photo.name = %photo.title, photo.id = %photo.id, "Deleting duplicate");
            match repository.delete_photo(&photo.id).await {
                Ok(()) => deleted += 1,
                Err(err) => {
                    tracing::error!(album.name = title, photo.id = %photo.id, error = ?err, "Could not delete duplicate");
                },
            }
        }
    }
    tracing::info!(deleted, "[OK] Duplicate scan complete");
    deleted
}
