#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` enumerates a local directory tree in a deterministic depth-first
//! order. Folder uploads use it twice: once to add up the bytes that will be
//! sent, and once to create remote directories and send files in the same
//! order.
//!
//! # Design
//!
//! - [`WalkBuilder`] configures whether the root entry is emitted and whether
//!   symlinks are resolved.
//! - [`Walker`] implements [`Iterator`]. It keeps an explicit stack of open
//!   directories, so deep trees never grow the call stack. Children are sorted
//!   by name before they are yielded.
//! - [`WalkEntry::kind`] reports [`EntryKind::File`],
//!   [`EntryKind::Directory`] or [`EntryKind::Other`], looking through
//!   followed links. Dangling links are [`EntryKind::Other`].
//! - [`WalkError`] records the failed [`WalkAction`], the path and the
//!   underlying [`std::io::Error`].
//!
//! # Invariants
//!
//! - A directory is yielded before any of its descendants.
//! - Relative paths never contain `..` segments.
//! - A directory reached through several links is descended into once.
//! - The first error ends the traversal.
//!
//! # Examples
//!
//! ```
//! use walk::{EntryKind, WalkBuilder};
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path().join("src");
//! fs::create_dir_all(root.join("nested"))?;
//! fs::write(root.join("file.txt"), b"data")?;
//! fs::write(root.join("nested/more.txt"), b"more")?;
//!
//! let mut bytes = 0;
//! for entry in WalkBuilder::new(&root).include_root(false).build()? {
//!     let entry = entry?;
//!     if entry.kind() == EntryKind::File {
//!         bytes += entry.len();
//!     }
//! }
//! assert_eq!(bytes, 8);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod entry;
mod error;
mod walker;

pub use crate::builder::WalkBuilder;
pub use crate::entry::{EntryKind, WalkEntry};
pub use crate::error::{WalkAction, WalkError};
pub use crate::walker::Walker;

#[cfg(test)]
mod tests;
