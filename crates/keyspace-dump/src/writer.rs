//! Tree and flat dump drivers.

use crate::{key_to_path, render_value};
use etcd_store::{DumpStats, FlatEntry, KeyNode, StoreError};
use std::path::Path;
use tracing::{debug, info};

/// Write one value to `path`, creating parent directories as needed.
///
/// Existing files are overwritten in place. Returns the number of bytes
/// written after rendering.
pub async fn write_value(path: &Path, key: &str, value: &[u8]) -> Result<usize, StoreError> {
    let io_error = |source| StoreError::Io {
        key: key.to_string(),
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }

    let contents = render_value(value);
    tokio::fs::write(path, contents.as_ref())
        .await
        .map_err(io_error)?;

    debug!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(contents.len())
}

/// Dump a v2 subtree in depth-first pre-order.
///
/// Children are visited in the order the server returned them. The walk uses
/// an explicit stack since the depth of the tree is up to the server.
pub async fn dump_tree(root: &KeyNode, destination: &Path) -> Result<DumpStats, StoreError> {
    let mut stats = DumpStats::default();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if node.is_dir {
            stack.extend(node.children.iter().rev());
            continue;
        }

        if !node.children.is_empty() {
            return Err(StoreError::malformed(
                &node.key,
                format!("leaf node has {} children", node.children.len()),
            ));
        }

        let path = key_to_path(destination, &node.key)?;
        let written = write_value(&path, &node.key, &node.value).await?;
        stats.record(written);
    }

    info!(
        "Dumped {} keys ({} bytes) to {}",
        stats.files_written,
        stats.bytes_written,
        destination.display()
    );
    Ok(stats)
}

/// Dump a flat sequence of v3 entries.
pub async fn dump_entries<I>(entries: I, destination: &Path) -> Result<DumpStats, StoreError>
where
    I: IntoIterator<Item = FlatEntry>,
{
    let mut stats = DumpStats::default();

    for entry in entries {
        let path = key_to_path(destination, &entry.key)?;
        let written = write_value(&path, &entry.key, &entry.value).await?;
        stats.record(written);
    }

    info!(
        "Dumped {} keys ({} bytes) to {}",
        stats.files_written,
        stats.bytes_written,
        destination.display()
    );
    Ok(stats)
}
