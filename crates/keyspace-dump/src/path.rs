//! Key to filesystem path mapping.

use etcd_store::StoreError;
use std::path::{Component, Path, PathBuf};

/// Join `key` below `destination`, one path component per key segment.
///
/// Empty and `.` segments are dropped, so `/config//a` and `config/a` land
/// on the same file. Segments that are not plain file names (`..`, or names
/// the platform treats as a prefix or root) are rejected, as is a key with no
/// segments at all: both would write outside of, or over, the destination.
pub fn key_to_path(destination: &Path, key: &str) -> Result<PathBuf, StoreError> {
    let mut path = destination.to_path_buf();
    let mut pushed = 0usize;

    for segment in key.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }

        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => path.push(name),
            _ => {
                return Err(StoreError::malformed(
                    key,
                    format!("segment '{segment}' cannot be used as a file name"),
                ))
            }
        }
        pushed += 1;
    }

    if pushed == 0 {
        return Err(StoreError::malformed(
            key,
            "key does not name a file below the destination",
        ));
    }

    Ok(path)
}
