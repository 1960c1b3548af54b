//! The [`FolderTransfer`] orchestrator and its listing capability cache.
//!
//! The methods are spread over sibling modules: classification in
//! `classify`, sizing in `size`, and the two copy directions in `download`
//! and `upload`.

use logging::trace_size;
use protocol::{EntryType, MlsdEntry};

use crate::error::TransferError;
use crate::remote_path;
use crate::session::RemoteSession;

/// Directory listing mechanism selected for a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListingMode {
    /// `MLSD` with per-entry type and size facts.
    Structured,
    /// `NLST` names, with type and size discovered per entry.
    Plain,
}

/// Recursive copier bound to one borrowed [`RemoteSession`].
///
/// The orchestrator never opens or closes the session. It probes the
/// structured listing capability the first time it needs a listing and
/// reuses the answer for every later call, so one `FolderTransfer` should be
/// kept for the lifetime of the session.
///
/// Each top-level call ([`download`](Self::download),
/// [`upload`](Self::upload)) runs a sizing phase that moves no bytes,
/// announces the total once with zero progress, then copies entries one at a
/// time, depth first, in listing order.
pub struct FolderTransfer<'a, S: RemoteSession + ?Sized> {
    pub(crate) session: &'a mut S,
    listing: Option<ListingMode>,
}

impl<'a, S: RemoteSession + ?Sized> FolderTransfer<'a, S> {
    /// Borrows `session` for a series of transfers.
    pub fn new(session: &'a mut S) -> Self {
        Self {
            session,
            listing: None,
        }
    }

    /// Skips the capability probe and uses `mode` for every listing.
    #[must_use]
    pub const fn with_listing_mode(mut self, mode: ListingMode) -> Self {
        self.listing = Some(mode);
        self
    }

    /// Returns the borrowed session.
    pub fn session(&mut self) -> &mut S {
        &mut *self.session
    }

    /// Returns the listing mechanism, probing the server on first use.
    ///
    /// The probe lists the current directory with `MLSD`. A `4xx` or `5xx`
    /// refusal selects [`ListingMode::Plain`]; any other failure is returned
    /// and the probe is retried on the next call.
    pub fn listing_mode(&mut self) -> Result<ListingMode, TransferError> {
        if let Some(mode) = self.listing {
            return Ok(mode);
        }

        let mode = match self.session.mlsd(".") {
            Ok(_) => ListingMode::Structured,
            Err(error) if error.is_negative_reply() => {
                trace_size!(%error, "structured listing unsupported, using plain listing");
                ListingMode::Plain
            }
            Err(error) => return Err(TransferError::session("probe listing of", ".", error)),
        };
        trace_size!(endpoint = %self.session.endpoint(), mode = ?mode, "listing capability");
        self.listing = Some(mode);
        Ok(mode)
    }

    /// Lists the immediate children of the remote directory `dir`.
    ///
    /// With `sizes` set, plain-mode file entries are sized with one `SIZE`
    /// query each; otherwise their size is reported as 0. A refused plain
    /// listing (`450` or `550` to `NLST`) means an empty directory.
    pub(crate) fn list_children(
        &mut self,
        dir: &str,
        sizes: bool,
    ) -> Result<Vec<RemoteChild>, TransferError> {
        if self.listing_mode()? == ListingMode::Structured {
            match self.session.mlsd(dir) {
                Ok(entries) => return Ok(structured_children(dir, entries)),
                Err(error) if error.is_negative_reply() => {
                    trace_size!(dir, %error, "structured listing refused, using plain listing");
                }
                Err(error) => return Err(TransferError::session("list", dir, error)),
            }
        }
        self.plain_children(dir, sizes)
    }

    fn plain_children(&mut self, dir: &str, sizes: bool) -> Result<Vec<RemoteChild>, TransferError> {
        let names = match self.session.nlst(dir) {
            Ok(names) => names,
            Err(error) if error.is_negative_reply() => {
                trace_size!(dir, %error, "plain listing refused, treating directory as empty");
                Vec::new()
            }
            Err(error) => return Err(TransferError::session("list", dir, error)),
        };

        let mut children = Vec::with_capacity(names.len());
        for name in names {
            if remote_path::is_dot_entry(&name) {
                continue;
            }
            let path = remote_path::join(dir, remote_path::basename(&name));
            if self.is_remote_folder(&path)? {
                children.push(RemoteChild::Dir(path));
            } else {
                let size = if sizes {
                    self.session
                        .size(&path)
                        .map_err(|error| TransferError::session("query size of", &path, error))?
                        .unwrap_or(0)
                } else {
                    0
                };
                children.push(RemoteChild::File { path, size });
            }
        }
        Ok(children)
    }
}

/// One child of a remote directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum RemoteChild {
    Dir(String),
    File { path: String, size: u64 },
}

impl RemoteChild {
    pub(crate) fn path(&self) -> &str {
        match self {
            Self::Dir(path) | Self::File { path, .. } => path,
        }
    }

    pub(crate) fn name(&self) -> &str {
        remote_path::basename(self.path())
    }
}

fn structured_children(dir: &str, entries: Vec<MlsdEntry>) -> Vec<RemoteChild> {
    let mut children = Vec::with_capacity(entries.len());
    for entry in entries {
        let (name, facts) = entry.into_parts();
        if remote_path::is_dot_entry(&name) {
            continue;
        }
        let path = remote_path::join(dir, remote_path::basename(&name));
        match facts.entry_type() {
            Some(EntryType::Dir) => children.push(RemoteChild::Dir(path)),
            Some(EntryType::File) => {
                if facts.size().is_none() {
                    trace_size!(path = %path, "no size fact, counting as 0 bytes");
                }
                children.push(RemoteChild::File {
                    path,
                    size: facts.size().unwrap_or(0),
                });
            }
            Some(EntryType::CurrentDir | EntryType::ParentDir) => {}
            other => trace_size!(path = %path, entry_type = ?other, "skipping non-file entry"),
        }
    }
    children
}
