//! Deciding whether a remote path names a directory.

use logging::trace_size;

use crate::error::TransferError;
use crate::orchestrator::{FolderTransfer, ListingMode};
use crate::remote_path;
use crate::session::{RemoteSession, SessionError};

impl<S: RemoteSession + ?Sized> FolderTransfer<'_, S> {
    /// Reports whether `path` names a directory on the server.
    ///
    /// With structured listing the parent directory is listed and the entry's
    /// `type` fact decides. When that listing is refused or does not contain
    /// the entry, the working directory probe is used: `CWD path` succeeding
    /// means a directory, and the previous working directory is restored.
    /// Failing that, the name must appear in a plain listing of the parent and
    /// a plain listing of the path itself must not just echo the name back.
    ///
    /// Refusals and malformed replies during the probes mean "not a
    /// directory". Socket failures are returned, and so is any failure to
    /// change back to the previous working directory, because the session
    /// would otherwise be left in the probed directory.
    pub fn is_remote_folder(&mut self, path: &str) -> Result<bool, TransferError> {
        if remote_path::is_root(path) {
            return Ok(true);
        }

        if self.listing_mode()? == ListingMode::Structured {
            if let Some(is_dir) = self.classify_from_facts(path)? {
                return Ok(is_dir);
            }
        }
        self.classify_by_probing(path)
    }

    fn classify_from_facts(&mut self, path: &str) -> Result<Option<bool>, TransferError> {
        let parent = remote_path::parent(path);
        let name = remote_path::basename(path);
        match self.session.mlsd(parent) {
            Ok(entries) => Ok(entries
                .iter()
                .filter(|entry| {
                    !entry
                        .facts()
                        .entry_type()
                        .is_some_and(|kind| kind.is_self_or_parent())
                })
                .find(|entry| remote_path::basename(entry.name()) == name)
                .map(|entry| entry.facts().is_dir())),
            Err(error) if error.is_negative_reply() => {
                trace_size!(path, %error, "parent listing refused, probing instead");
                Ok(None)
            }
            Err(error) => Err(TransferError::session("list", parent, error)),
        }
    }

    fn classify_by_probing(&mut self, path: &str) -> Result<bool, TransferError> {
        match self.session.pwd() {
            Ok(original) => match self.session.cwd(path) {
                Ok(()) => {
                    self.session.cwd(&original).map_err(|error| {
                        TransferError::session("restore working directory", &original, error)
                    })?;
                    trace_size!(path, "working directory probe succeeded");
                    return Ok(true);
                }
                Err(error) => absorb("change directory to", path, error)?,
            },
            Err(error) => absorb("query working directory for", path, error)?,
        }

        let name = remote_path::basename(path);
        let parent = remote_path::parent(path);
        let listed = match self.session.nlst(parent) {
            Ok(names) => names.iter().any(|entry| remote_path::basename(entry) == name),
            Err(error) => {
                absorb("list", parent, error)?;
                false
            }
        };
        if !listed {
            trace_size!(path, "not present in parent listing");
            return Ok(false);
        }

        match self.session.nlst(path) {
            Ok(names) => {
                let echoes_itself = matches!(
                    names.as_slice(),
                    [only] if only == remote_path::trim(path) || only == name
                );
                Ok(!echoes_itself)
            }
            Err(error) => {
                absorb("list", path, error)?;
                Ok(false)
            }
        }
    }
}

/// Swallows classification failures that only mean "not a directory".
fn absorb(action: &'static str, path: &str, error: SessionError) -> Result<(), TransferError> {
    match error {
        SessionError::Io(_) => Err(TransferError::session(action, path, error)),
        other => {
            trace_size!(path, error = %other, "{action} failed during classification");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemorySession;

    fn tree(session: &mut MemorySession) {
        session.add_file("/pub/readme.txt", b"hello");
        session.add_file("/pub/data/a.bin", &[1, 2, 3]);
        session.add_dir("/pub/empty");
    }

    #[test]
    fn roots_are_folders_without_any_command() {
        let mut session = MemorySession::new();
        let mut transfer = FolderTransfer::new(&mut session);
        for root in ["", ".", "/"] {
            assert!(transfer.is_remote_folder(root).unwrap());
        }
        drop(transfer);
        assert!(session.commands().is_empty());
    }

    #[test]
    fn structured_facts_decide_type() {
        let mut session = MemorySession::new();
        tree(&mut session);
        let mut transfer = FolderTransfer::new(&mut session);

        assert!(transfer.is_remote_folder("/pub/data").unwrap());
        assert!(transfer.is_remote_folder("/pub/empty/").unwrap());
        assert!(!transfer.is_remote_folder("/pub/readme.txt").unwrap());
        drop(transfer);
        assert_eq!(session.count("CWD"), 0);
    }

    #[test]
    fn working_directory_probe_restores_the_previous_directory() {
        let mut session = MemorySession::new().without_mlsd();
        tree(&mut session);
        session.set_cwd("/pub");
        let mut transfer = FolderTransfer::new(&mut session);

        assert!(transfer.is_remote_folder("data").unwrap());
        assert!(!transfer.is_remote_folder("readme.txt").unwrap());
        drop(transfer);
        assert_eq!(session.cwd(), "/pub");
    }

    #[test]
    fn failed_restore_of_working_directory_is_returned() {
        let mut session = MemorySession::new().without_mlsd();
        tree(&mut session);
        session.set_cwd("/removed");
        let mut transfer = FolderTransfer::new(&mut session);

        let error = transfer.is_remote_folder("/pub/data").unwrap_err();
        assert!(matches!(
            error,
            TransferError::Session {
                action: "restore working directory",
                ..
            }
        ));
    }

    #[test]
    fn missing_paths_are_not_folders() {
        let mut session = MemorySession::new().without_mlsd();
        tree(&mut session);
        let mut transfer = FolderTransfer::new(&mut session);
        assert!(!transfer.is_remote_folder("/pub/nothing").unwrap());
    }

    #[test]
    fn plain_listing_fallback_when_cwd_is_refused() {
        let mut session = MemorySession::new().without_mlsd().deny("CWD");
        tree(&mut session);
        let mut transfer = FolderTransfer::new(&mut session);

        assert!(transfer.is_remote_folder("/pub/data").unwrap());
        assert!(transfer.is_remote_folder("/pub/empty").unwrap());
        assert!(!transfer.is_remote_folder("/pub/readme.txt").unwrap());
    }

    #[test]
    fn entry_missing_from_structured_listing_falls_back_to_probe() {
        let mut session = MemorySession::new().hide_from_mlsd("/pub/data");
        tree(&mut session);
        let mut transfer = FolderTransfer::new(&mut session);

        assert!(transfer.is_remote_folder("/pub/data").unwrap());
        drop(transfer);
        assert_eq!(session.count("CWD"), 2);
    }
}
