//! Sizing phase: total bytes expected before anything moves.

use std::fs;
use std::path::Path;

use logging::trace_size;
use walk::{EntryKind, WalkBuilder};

use crate::error::TransferError;
use crate::orchestrator::{FolderTransfer, RemoteChild};
use crate::session::RemoteSession;

impl<S: RemoteSession + ?Sized> FolderTransfer<'_, S> {
    /// Returns the number of bytes a download of `path` would move.
    ///
    /// Folders are summed over every file beneath them. A file whose size the
    /// server cannot report counts as 0.
    pub fn remote_size(&mut self, path: &str) -> Result<u64, TransferError> {
        if self.is_remote_folder(path)? {
            self.remote_folder_size(path)
        } else {
            Ok(self.remote_file_size(path)?.unwrap_or(0))
        }
    }

    pub(crate) fn remote_file_size(&mut self, path: &str) -> Result<Option<u64>, TransferError> {
        self.session
            .size(path)
            .map_err(|error| TransferError::session("query size of", path, error))
    }

    pub(crate) fn remote_folder_size(&mut self, root: &str) -> Result<u64, TransferError> {
        let mut total = 0_u64;
        let mut pending = vec![root.to_owned()];
        while let Some(dir) = pending.pop() {
            for child in self.list_children(&dir, true)? {
                match child {
                    RemoteChild::Dir(path) => pending.push(path),
                    RemoteChild::File { path, size } => {
                        trace_size!(path = %path, size, "sized remote file");
                        total = total.saturating_add(size);
                    }
                }
            }
        }
        trace_size!(root, total, "sized remote folder");
        Ok(total)
    }
}

/// Returns the number of bytes an upload of the local folder `root` would
/// move, following symlinks.
pub fn local_folder_size(root: &Path) -> Result<u64, TransferError> {
    let walker = WalkBuilder::new(root)
        .follow_symlinks(true)
        .include_root(false)
        .build()?;
    let mut total = 0_u64;
    for entry in walker {
        let entry = entry?;
        if entry.kind() == EntryKind::File {
            total = total.saturating_add(entry.len());
        }
    }
    trace_size!(root = %root.display(), total, "sized local folder");
    Ok(total)
}

/// Returns the byte length of the local file `path`, following symlinks.
pub(crate) fn local_file_size(path: &Path) -> Result<u64, TransferError> {
    fs::metadata(path)
        .map(|metadata| metadata.len())
        .map_err(|error| TransferError::local("inspect", path, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemorySession;

    #[test]
    fn flat_folder_total_is_sum_of_file_sizes() {
        let mut session = MemorySession::new();
        session.add_file("/flat/a", &[0; 7]);
        session.add_file("/flat/b", &[0; 11]);
        session.add_file("/flat/c", &[]);
        let mut transfer = FolderTransfer::new(&mut session);
        assert_eq!(transfer.remote_size("/flat").unwrap(), 18);
    }

    #[test]
    fn nested_folders_are_summed_in_plain_mode() {
        let mut session = MemorySession::new().without_mlsd();
        session.add_file("/n/a", &[0; 5]);
        session.add_file("/n/sub/b", &[0; 3]);
        session.add_file("/n/sub/deeper/c", &[0; 2]);
        let mut transfer = FolderTransfer::new(&mut session);
        assert_eq!(transfer.remote_size("/n").unwrap(), 10);
        assert_eq!(transfer.remote_size("/n/a").unwrap(), 5);
    }

    #[test]
    fn missing_size_facts_count_as_zero() {
        let mut session = MemorySession::new().without_size_facts();
        session.add_file("/d/a", &[0; 5]);
        let mut transfer = FolderTransfer::new(&mut session);
        assert_eq!(transfer.remote_size("/d").unwrap(), 0);
    }

    #[test]
    fn local_folder_size_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/ten.bin"), [0_u8; 10]).unwrap();
        fs::write(dir.path().join("two.bin"), [0_u8; 2]).unwrap();
        assert_eq!(local_folder_size(dir.path()).unwrap(), 12);
    }
}
