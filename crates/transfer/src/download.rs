//! Remote to local copies.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::vec;

use logging::trace_xfer;

use crate::error::TransferError;
use crate::orchestrator::{FolderTransfer, RemoteChild};
use crate::progress::{FileLabel, ProgressHandler, ProgressTracker, ProgressWriter};
use crate::remote_path;
use crate::report::{Direction, TransferKind, TransferReport};
use crate::session::RemoteSession;

struct PendingDir {
    local: PathBuf,
    children: vec::IntoIter<RemoteChild>,
}

impl<S: RemoteSession + ?Sized> FolderTransfer<'_, S> {
    /// Copies the remote file or folder `remote` into the local directory
    /// `local_base`.
    ///
    /// A folder lands in `local_base/<name of remote>` (the remote root lands
    /// in `local_base` itself) and a file in `local_base/<file name>`.
    /// `local_base` and any missing subdirectories are created; existing local
    /// files are truncated and rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::NotFound`] when the source resolves to zero
    /// bytes. Any other failure stops the transfer immediately and may leave a
    /// partially written local tree behind.
    #[cfg_attr(
        feature = "instrument",
        tracing::instrument(skip(self, local_base, progress), fields(local_base = %local_base.display()))
    )]
    pub fn download(
        &mut self,
        remote: &str,
        local_base: &Path,
        progress: Option<&mut dyn ProgressHandler>,
    ) -> Result<TransferReport, TransferError> {
        let result = self.download_source(remote, local_base, progress);
        if let Err(error) = &result {
            tracing::error!(
                target: "ftpmirror::transfer",
                direction = "download",
                remote,
                local_base = %local_base.display(),
                %error,
                "transfer failed"
            );
        }
        result
    }

    fn download_source(
        &mut self,
        remote: &str,
        local_base: &Path,
        progress: Option<&mut dyn ProgressHandler>,
    ) -> Result<TransferReport, TransferError> {
        if self.is_remote_folder(remote)? {
            let total = self.remote_folder_size(remote)?;
            if total == 0 {
                return Err(TransferError::not_found(remote));
            }

            let target = if remote_path::is_root(remote) {
                local_base.to_path_buf()
            } else {
                local_base.join(remote_path::basename(remote))
            };
            let mut tracker = ProgressTracker::new(total, progress);
            let mut report = TransferReport::new(Direction::Download, TransferKind::Folder, total);
            tracker.announce("Starting folder download");
            trace_xfer!(remote, local = %target.display(), total, "starting folder download");

            create_local_dir(&target)?;
            report.record_directory();
            self.download_tree(remote, target, &mut tracker, &mut report)?;
            Ok(report.finish(tracker.current()))
        } else {
            let total = self.remote_file_size(remote)?.unwrap_or(0);
            if total == 0 {
                return Err(TransferError::not_found(remote));
            }

            let target = local_base.join(remote_path::basename(remote));
            let mut tracker = ProgressTracker::new(total, progress);
            let mut report = TransferReport::new(Direction::Download, TransferKind::File, total);
            tracker.announce("Starting file download");
            trace_xfer!(remote, local = %target.display(), total, "starting file download");

            create_local_dir(local_base)?;
            self.download_file(remote, &target, &mut tracker)?;
            report.record_file();
            Ok(report.finish(tracker.current()))
        }
    }

    fn download_tree(
        &mut self,
        remote: &str,
        local: PathBuf,
        tracker: &mut ProgressTracker<'_>,
        report: &mut TransferReport,
    ) -> Result<(), TransferError> {
        let children = self.list_children(remote, false)?;
        let mut stack = vec![PendingDir {
            local,
            children: children.into_iter(),
        }];

        while let Some(pending) = stack.last_mut() {
            let Some(child) = pending.children.next() else {
                stack.pop();
                continue;
            };
            let local = pending.local.join(child.name());
            match child {
                RemoteChild::Dir(path) => {
                    create_local_dir(&local)?;
                    report.record_directory();
                    let children = self.list_children(&path, false)?;
                    stack.push(PendingDir {
                        local,
                        children: children.into_iter(),
                    });
                }
                RemoteChild::File { path, .. } => {
                    self.download_file(&path, &local, tracker)?;
                    report.record_file();
                }
            }
        }
        Ok(())
    }

    fn download_file(
        &mut self,
        remote: &str,
        local: &Path,
        tracker: &mut ProgressTracker<'_>,
    ) -> Result<(), TransferError> {
        let file =
            File::create(local).map_err(|error| TransferError::local("create file", local, error))?;
        let before = tracker.current();
        let local_display = local.display().to_string();
        let label = FileLabel::new(Direction::Download, remote, &local_display);
        let mut writer = ProgressWriter::new(BufWriter::new(file), tracker, label);

        self.session
            .retrieve(remote, &mut writer)
            .map_err(|error| TransferError::session("retrieve", remote, error))?;
        writer
            .into_inner()
            .flush()
            .map_err(|error| TransferError::local("write file", local, error))?;

        trace_xfer!(
            remote,
            local = %local_display,
            bytes = tracker.current() - before,
            "downloaded file"
        );
        Ok(())
    }
}

fn create_local_dir(path: &Path) -> Result<(), TransferError> {
    fs::create_dir_all(path).map_err(|error| TransferError::local("create directory", path, error))
}
