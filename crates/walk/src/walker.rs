use crate::entry::WalkEntry;
use crate::error::{WalkAction, WalkError};
use logging::trace_walk;
use std::collections::HashSet;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Depth-first iterator over filesystem entries.
///
/// A directory is yielded before its contents, and siblings are yielded in
/// byte-wise name order.
pub struct Walker {
    root: PathBuf,
    follow_symlinks: bool,
    pending_root: Option<WalkEntry>,
    stack: Vec<DirectoryState>,
    visited: HashSet<PathBuf>,
    finished: bool,
}

impl Walker {
    pub(crate) fn new(
        root: PathBuf,
        follow_symlinks: bool,
        include_root: bool,
    ) -> Result<Self, WalkError> {
        let root = absolutize(root)?;
        trace_walk!(root = %root.display(), follow_symlinks, "starting traversal");

        let metadata = fs::symlink_metadata(&root)
            .map_err(|error| WalkError::new(WalkAction::InspectRoot, root.clone(), error))?;
        let target = resolve_link(&root, &metadata, follow_symlinks)?;

        let mut walker = Self {
            root: root.clone(),
            follow_symlinks,
            pending_root: None,
            stack: Vec::new(),
            visited: HashSet::new(),
            finished: false,
        };

        let root_entry = WalkEntry {
            full_path: root.clone(),
            relative_path: PathBuf::new(),
            metadata,
            target,
            depth: 0,
            is_root: true,
        };
        if root_entry.resolved_metadata().is_dir() {
            walker.push_directory(root, PathBuf::new(), 0)?;
        }
        if include_root {
            walker.pending_root = Some(root_entry);
        }

        Ok(walker)
    }

    /// Returns the absolute root of the traversal.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn push_directory(
        &mut self,
        fs_path: PathBuf,
        relative_prefix: PathBuf,
        depth: usize,
    ) -> Result<(), WalkError> {
        let canonical = fs::canonicalize(&fs_path)
            .map_err(|error| WalkError::new(WalkAction::Canonicalize, fs_path.clone(), error))?;
        if !self.visited.insert(canonical) {
            trace_walk!(path = %fs_path.display(), "skipping already visited directory");
            return Ok(());
        }

        let state = DirectoryState::new(fs_path, relative_prefix, depth)?;
        self.stack.push(state);
        Ok(())
    }

    fn prepare_entry(
        &mut self,
        full_path: PathBuf,
        relative_path: PathBuf,
        depth: usize,
    ) -> Result<WalkEntry, WalkError> {
        let metadata = fs::symlink_metadata(&full_path)
            .map_err(|error| WalkError::new(WalkAction::InspectEntry, full_path.clone(), error))?;
        let target = resolve_link(&full_path, &metadata, self.follow_symlinks)?;

        let entry = WalkEntry {
            full_path,
            relative_path,
            metadata,
            target,
            depth,
            is_root: false,
        };
        trace_walk!(
            path = %entry.relative_path.display(),
            kind = ?entry.kind(),
            "visiting entry"
        );

        if entry.resolved_metadata().is_dir() {
            self.push_directory(
                entry.full_path.clone(),
                entry.relative_path.clone(),
                depth,
            )?;
        }

        Ok(entry)
    }
}

impl Iterator for Walker {
    type Item = Result<WalkEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if let Some(root) = self.pending_root.take() {
            return Some(Ok(root));
        }

        loop {
            let (full_path, relative_path, depth) = {
                let state = self.stack.last_mut()?;

                match state.next_name() {
                    Some(name) => (
                        state.fs_path.join(&name),
                        state.relative_prefix.join(&name),
                        state.depth + 1,
                    ),
                    None => {
                        self.stack.pop();
                        continue;
                    }
                }
            };

            match self.prepare_entry(full_path, relative_path, depth) {
                Ok(entry) => return Some(Ok(entry)),
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

struct DirectoryState {
    fs_path: PathBuf,
    relative_prefix: PathBuf,
    entries: std::vec::IntoIter<OsString>,
    depth: usize,
}

impl DirectoryState {
    fn new(fs_path: PathBuf, relative_prefix: PathBuf, depth: usize) -> Result<Self, WalkError> {
        let read_dir = fs::read_dir(&fs_path)
            .map_err(|error| WalkError::new(WalkAction::ReadDir, fs_path.clone(), error))?;
        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry
                .map_err(|error| WalkError::new(WalkAction::ReadEntry, fs_path.clone(), error))?;
            entries.push(entry.file_name());
        }
        entries.sort();

        trace_walk!(path = %fs_path.display(), count = entries.len(), "read directory");

        Ok(Self {
            fs_path,
            relative_prefix,
            entries: entries.into_iter(),
            depth,
        })
    }

    fn next_name(&mut self) -> Option<OsString> {
        self.entries.next()
    }
}

/// Resolves a symlink's target metadata when links are followed.
///
/// A dangling link resolves to `None` and is reported as
/// [`EntryKind::Other`](crate::EntryKind::Other) rather than as an error.
fn resolve_link(
    path: &Path,
    metadata: &fs::Metadata,
    follow_symlinks: bool,
) -> Result<Option<fs::Metadata>, WalkError> {
    if !(follow_symlinks && metadata.file_type().is_symlink()) {
        return Ok(None);
    }

    match fs::metadata(path) {
        Ok(target) => Ok(Some(target)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            trace_walk!(path = %path.display(), "dangling symlink");
            Ok(None)
        }
        Err(error) => Err(WalkError::new(
            WalkAction::InspectEntry,
            path.to_path_buf(),
            error,
        )),
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, WalkError> {
    if path.is_absolute() {
        Ok(path)
    } else {
        let cwd = env::current_dir()
            .map_err(|error| WalkError::new(WalkAction::Canonicalize, path.clone(), error))?;
        Ok(cwd.join(path))
    }
}
