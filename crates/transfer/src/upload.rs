//! Local to remote copies.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path};

use logging::trace_xfer;
use walk::{EntryKind, WalkBuilder};

use crate::error::TransferError;
use crate::orchestrator::FolderTransfer;
use crate::progress::{FileLabel, ProgressHandler, ProgressReader, ProgressTracker};
use crate::remote_path;
use crate::report::{Direction, TransferKind, TransferReport};
use crate::session::RemoteSession;
use crate::size::{local_file_size, local_folder_size};

impl<S: RemoteSession + ?Sized> FolderTransfer<'_, S> {
    /// Copies the local file or folder `local` into the remote directory
    /// `remote_base`.
    ///
    /// A folder lands in `remote_base/<folder name>` and a file in
    /// `remote_base/<file name>`; an empty `remote_base` means the current
    /// remote directory. Remote directories are created with `MKD`, and a
    /// `5xx` refusal is taken to mean the directory already exists. Symlinks
    /// on the local side are followed. The remote working directory is never
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::NotFound`] when `local` does not exist or
    /// holds zero bytes. Any other failure stops the transfer immediately and
    /// may leave a partially created remote tree behind.
    #[cfg_attr(
        feature = "instrument",
        tracing::instrument(skip(self, local, progress), fields(local = %local.display()))
    )]
    pub fn upload(
        &mut self,
        local: &Path,
        remote_base: &str,
        progress: Option<&mut dyn ProgressHandler>,
    ) -> Result<TransferReport, TransferError> {
        let result = self.upload_source(local, remote_base, progress);
        if let Err(error) = &result {
            tracing::error!(
                target: "ftpmirror::transfer",
                direction = "upload",
                local = %local.display(),
                remote_base,
                %error,
                "transfer failed"
            );
        }
        result
    }

    fn upload_source(
        &mut self,
        local: &Path,
        remote_base: &str,
        progress: Option<&mut dyn ProgressHandler>,
    ) -> Result<TransferReport, TransferError> {
        let metadata = match fs::metadata(local) {
            Ok(metadata) => metadata,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(TransferError::not_found(local.display().to_string()));
            }
            Err(error) => return Err(TransferError::local("inspect", local, error)),
        };

        if metadata.is_dir() {
            let total = local_folder_size(local)?;
            if total == 0 {
                return Err(TransferError::not_found(local.display().to_string()));
            }

            let remote_dir = remote_path::join(remote_base, &local_name(local)?);
            let mut tracker = ProgressTracker::new(total, progress);
            let mut report = TransferReport::new(Direction::Upload, TransferKind::Folder, total);
            tracker.announce("Starting folder upload");
            trace_xfer!(local = %local.display(), remote = %remote_dir, total, "starting folder upload");

            self.make_remote_dir(&remote_dir)?;
            report.record_directory();
            self.upload_tree(local, &remote_dir, &mut tracker, &mut report)?;
            Ok(report.finish(tracker.current()))
        } else {
            let total = local_file_size(local)?;
            if total == 0 {
                return Err(TransferError::not_found(local.display().to_string()));
            }

            let remote = remote_path::join(remote_base, &local_name(local)?);
            let mut tracker = ProgressTracker::new(total, progress);
            let mut report = TransferReport::new(Direction::Upload, TransferKind::File, total);
            tracker.announce("Starting file upload");
            trace_xfer!(local = %local.display(), remote = %remote, total, "starting file upload");

            self.upload_file(local, &remote, &mut tracker)?;
            report.record_file();
            Ok(report.finish(tracker.current()))
        }
    }

    fn upload_tree(
        &mut self,
        local: &Path,
        remote_dir: &str,
        tracker: &mut ProgressTracker<'_>,
        report: &mut TransferReport,
    ) -> Result<(), TransferError> {
        let walker = WalkBuilder::new(local)
            .follow_symlinks(true)
            .include_root(false)
            .build()?;

        for entry in walker {
            let entry = entry?;
            let remote = remote_path::join(remote_dir, &remote_relative(entry.relative_path()));
            match entry.kind() {
                EntryKind::Directory => {
                    self.make_remote_dir(&remote)?;
                    report.record_directory();
                }
                EntryKind::File => {
                    self.upload_file(entry.full_path(), &remote, tracker)?;
                    report.record_file();
                }
                EntryKind::Other => {
                    tracing::warn!(
                        target: "ftpmirror::transfer",
                        path = %entry.full_path().display(),
                        "skipping entry that is neither a file nor a directory"
                    );
                }
            }
        }
        Ok(())
    }

    fn upload_file(
        &mut self,
        local: &Path,
        remote: &str,
        tracker: &mut ProgressTracker<'_>,
    ) -> Result<(), TransferError> {
        let file = File::open(local).map_err(|error| TransferError::local("open file", local, error))?;
        let before = tracker.current();
        let local_display = local.display().to_string();
        let label = FileLabel::new(Direction::Upload, &local_display, remote);
        let mut reader = ProgressReader::new(BufReader::new(file), tracker, label);

        self.session
            .store(remote, &mut reader)
            .map_err(|error| TransferError::session("store", remote, error))?;

        trace_xfer!(
            local = %local_display,
            remote,
            bytes = tracker.current() - before,
            "uploaded file"
        );
        Ok(())
    }

    fn make_remote_dir(&mut self, path: &str) -> Result<(), TransferError> {
        match self.session.mkd(path) {
            Ok(()) => Ok(()),
            Err(error) if error.is_permanent() => {
                trace_xfer!(path, %error, "remote directory not created, assuming it exists");
                Ok(())
            }
            Err(error) => Err(TransferError::session("create directory", path, error)),
        }
    }
}

/// Final component of `path`, resolving `.` and `..` through the filesystem.
fn local_name(path: &Path) -> Result<String, TransferError> {
    if let Some(name) = path.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }
    let canonical =
        fs::canonicalize(path).map_err(|error| TransferError::local("canonicalize", path, error))?;
    canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| TransferError::not_found(path.display().to_string()))
}

fn remote_relative(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
