//! Local library walk.
//!
//! [`scan`] yields every file under the library root that is a candidate for
//! upload, in a depth-first, lexically ordered walk. Files directly in the
//! root, files with other extensions, and anything under a skipped directory
//! never come out of the stream.

mod filter;

pub use self::filter::ScanFilter;
use crate::error::{ErrorKind, Result};
use albumsync_remote::title_from_path;
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A file eligible for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPhoto {
    pub path: PathBuf,
    /// Base name of the directory containing the file.
    pub album: String,
    /// File name up to the first `.`.
    pub title: String,
}

impl LocalPhoto {
    fn from_path(path: PathBuf) -> Self {
        let album = path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = title_from_path(&path);
        Self { path, album, title }
    }
}

enum Node {
    Dir(PathBuf),
    File(PathBuf),
}

/// Walk `root` and yield eligible files.
///
/// The walk is lazy and starts afresh on every call. Read errors are yielded
/// as `Err` items and the walk carries on with whatever it can still reach.
pub fn scan<'a>(root: &'a Path, filter: &'a ScanFilter) -> impl Stream<Item = Result<LocalPhoto>> + 'a {
    stream! {
        // Pending nodes, in reverse: popping yields lexical order.
        let mut stack = vec![Node::Dir(root.to_path_buf())];
        while let Some(node) = stack.pop() {
            match node {
                Node::Dir(dir) => {
                    let (children, errors) = read_sorted(&dir, filter).await;
                    for error in errors {
                        yield Err(error);
                    }
                    stack.extend(children.into_iter().rev());
                },
                Node::File(path) => {
                    if path.parent() == Some(root) {
                        tracing::info!(path = %path.display(), "[SKIP] root folder not processed");
                        continue;
                    }
                    if !filter.allows(&path) {
                        tracing::info!(path = %path.display(), "[SKIP] file not supported");
                        continue;
                    }
                    yield Ok(LocalPhoto::from_path(path));
                },
            }
        }
    }
}

/// Children of `dir` sorted by name, with skipped directories and special
/// files already removed.
async fn read_sorted(dir: &Path, filter: &ScanFilter) -> (Vec<Node>, Vec<crate::error::Error>) {
    let mut errors = Vec::new();
    let mut entries = match fs::read_dir(dir).await.or_raise(|| ErrorKind::Scan(dir.to_path_buf())) {
        Ok(entries) => entries,
        Err(err) => return (Vec::new(), vec![err]),
    };
    let mut found = Vec::new();
    loop {
        match entries.next_entry().await.or_raise(|| ErrorKind::Scan(dir.to_path_buf())) {
            Ok(Some(entry)) => found.push(entry),
            Ok(None) => break,
            // The iterator cannot be trusted to make progress after a failure.
            Err(err) => {
                errors.push(err);
                break;
            },
        }
    }
    found.sort_by_key(|entry| entry.file_name());

    let mut nodes = Vec::with_capacity(found.len());
    for entry in found {
        let path = entry.path();
        let file_type = match entry.file_type().await.or_raise(|| ErrorKind::Scan(path.clone())) {
            Ok(file_type) => file_type,
            Err(err) => {
                errors.push(err);
                continue;
            },
        };
        if file_type.is_dir() {
            if filter.skips_dir(&path) {
                tracing::debug!(path = %path.display(), "[SKIP] directory excluded");
                continue;
            }
            nodes.push(Node::Dir(path));
        } else if file_type.is_file() {
            nodes.push(Node::File(path));
        } else if file_type.is_symlink() {
            // Links to files count as files; linked directories are never entered.
            match fs::metadata(&path).await {
                Ok(target) if target.is_file() => nodes.push(Node::File(path)),
                _ => tracing::info!(path = %path.display(), "[SKIP] link does not point to a file"),
            }
        }
    }
    (nodes, errors)
}
