//! Keyspace dump engine.
//!
//! Writes one file per leaf key below a destination directory, using the
//! key's `/`-separated segments as the relative path. Values that parse as
//! JSON are re-indented with tabs; anything else is written verbatim.
//!
//! # Example
//!
//! ```ignore
//! use etcd_store::KeyNode;
//! use keyspace_dump::dump_tree;
//!
//! let tree = KeyNode::dir("/config", vec![KeyNode::leaf("/config/a", "1")]);
//! let stats = dump_tree(&tree, Path::new("/out")).await?;
//! assert_eq!(stats.files_written, 1);
//! ```

mod path;
mod value;
mod writer;

pub use path::key_to_path;
pub use value::render_value;
pub use writer::{dump_entries, dump_tree, write_value};
