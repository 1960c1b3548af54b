//! In-memory [`RemoteSession`] for exercising the orchestrator without a
//! server.
//!
//! Replies mirror what an FTP server and [`client::FtpClient`] would produce:
//! refused commands become `5xx` [`SessionError::Permanent`] errors, an
//! unknown `SIZE` is `None`, and structured listings come back as parsed
//! [`MlsdEntry`] values including the `cdir` and `pdir` entries.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Read, Write};

use protocol::{MlsdEntry, parse_mlsd_line};

use crate::session::{RemoteSession, SessionError};

#[derive(Clone, Debug)]
enum Node {
    Dir,
    File(Vec<u8>),
    Link,
}

/// Remote filesystem and session state held in memory.
#[derive(Clone, Debug)]
pub struct MemorySession {
    nodes: BTreeMap<String, Node>,
    cwd: String,
    mlsd: bool,
    size_facts: bool,
    refuse_empty_nlst: bool,
    hidden: BTreeSet<String>,
    denied: Vec<&'static str>,
    broken: Vec<&'static str>,
    chunk_size: usize,
    commands: Vec<String>,
}

impl Default for MemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySession {
    /// Creates a session holding only `/`, with `/` as working directory.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_owned(), Node::Dir);
        Self {
            nodes,
            cwd: "/".to_owned(),
            mlsd: true,
            size_facts: true,
            refuse_empty_nlst: false,
            hidden: BTreeSet::new(),
            denied: Vec::new(),
            broken: Vec::new(),
            chunk_size: 4,
            commands: Vec::new(),
        }
    }

    /// Refuses `MLSD` with `500`, like a server without RFC 3659 support.
    #[must_use]
    pub fn without_mlsd(mut self) -> Self {
        self.mlsd = false;
        self
    }

    /// Omits the `size` fact from structured listings.
    #[must_use]
    pub fn without_size_facts(mut self) -> Self {
        self.size_facts = false;
        self
    }

    /// Answers `NLST` of an empty directory with `450 No files found`.
    #[must_use]
    pub fn refuse_empty_nlst(mut self) -> Self {
        self.refuse_empty_nlst = true;
        self
    }

    /// Leaves `path` out of structured listings of its parent.
    #[must_use]
    pub fn hide_from_mlsd(mut self, path: &str) -> Self {
        self.hidden.insert(normalize("/", path));
        self
    }

    /// Refuses every `verb` command with `550`.
    #[must_use]
    pub fn deny(mut self, verb: &'static str) -> Self {
        self.denied.push(verb);
        self
    }

    /// Fails every `verb` command with a connection reset.
    #[must_use]
    pub fn disconnect_on(mut self, verb: &'static str) -> Self {
        self.broken.push(verb);
        self
    }

    /// Sets the number of bytes moved per read or write on the data path.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Adds a directory and any missing parents.
    pub fn add_dir(&mut self, path: &str) {
        let path = normalize("/", path);
        self.add_parents(&path);
        self.nodes.insert(path, Node::Dir);
    }

    /// Adds a file and any missing parent directories.
    pub fn add_file(&mut self, path: &str, contents: &[u8]) {
        let path = normalize("/", path);
        self.add_parents(&path);
        self.nodes.insert(path, Node::File(contents.to_vec()));
    }

    /// Adds a symbolic link entry that is neither file nor directory.
    pub fn add_link(&mut self, path: &str) {
        let path = normalize("/", path);
        self.add_parents(&path);
        self.nodes.insert(path, Node::Link);
    }

    /// Sets the working directory without recording a command.
    pub fn set_cwd(&mut self, path: &str) {
        self.cwd = normalize("/", path);
    }

    /// Returns the working directory.
    #[must_use]
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Returns the contents of the file at `path`.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&[u8]> {
        match self.nodes.get(&normalize("/", path)) {
            Some(Node::File(contents)) => Some(contents),
            _ => None,
        }
    }

    /// Reports whether `path` is a directory.
    #[must_use]
    pub fn is_dir(&self, path: &str) -> bool {
        matches!(self.nodes.get(&normalize("/", path)), Some(Node::Dir))
    }

    /// Returns every command received, in order, as `VERB argument`.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Returns how many `verb` commands were received.
    #[must_use]
    pub fn count(&self, verb: &str) -> usize {
        self.commands
            .iter()
            .filter(|command| command.split(' ').next() == Some(verb))
            .count()
    }

    fn add_parents(&mut self, path: &str) {
        let mut parent = parent_of(path);
        while let Some(dir) = parent {
            self.nodes.entry(dir.to_owned()).or_insert(Node::Dir);
            parent = parent_of(dir);
        }
    }

    fn begin(&mut self, verb: &'static str, argument: &str) -> Result<(), SessionError> {
        if argument.is_empty() {
            self.commands.push(verb.to_owned());
        } else {
            self.commands.push(format!("{verb} {argument}"));
        }
        if self.broken.contains(&verb) {
            return Err(SessionError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        if self.denied.contains(&verb) {
            return Err(permanent(550, "Permission denied."));
        }
        Ok(())
    }

    fn resolve(&self, argument: &str) -> String {
        normalize(&self.cwd, argument)
    }

    fn children(&self, dir: &str) -> Vec<(&str, &Node)> {
        let prefix = if dir == "/" {
            "/".to_owned()
        } else {
            format!("{dir}/")
        };
        self.nodes
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .filter_map(|(path, node)| {
                let name = &path[prefix.len()..];
                (!name.is_empty() && !name.contains('/')).then_some((name, node))
            })
            .collect()
    }
}

fn permanent(code: u16, message: &str) -> SessionError {
    SessionError::Permanent {
        code,
        message: message.to_owned(),
    }
}

fn normalize(cwd: &str, argument: &str) -> String {
    let joined = if argument.starts_with('/') {
        argument.to_owned()
    } else {
        format!("{cwd}/{argument}")
    };
    let mut parts: Vec<&str> = Vec::new();
    for part in joined.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    format!("/{}", parts.join("/"))
}

fn parent_of(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some("/"),
        Some(index) => Some(&path[..index]),
        None => None,
    }
}

impl RemoteSession for MemorySession {
    fn endpoint(&self) -> String {
        "memory".to_owned()
    }

    fn pwd(&mut self) -> Result<String, SessionError> {
        self.begin("PWD", "")?;
        Ok(self.cwd.clone())
    }

    fn cwd(&mut self, path: &str) -> Result<(), SessionError> {
        self.begin("CWD", path)?;
        let target = self.resolve(path);
        if matches!(self.nodes.get(&target), Some(Node::Dir)) {
            self.cwd = target;
            Ok(())
        } else {
            Err(permanent(550, "Failed to change directory."))
        }
    }

    fn mkd(&mut self, path: &str) -> Result<(), SessionError> {
        self.begin("MKD", path)?;
        let target = self.resolve(path);
        if self.nodes.contains_key(&target) {
            return Err(permanent(550, "Create directory operation failed."));
        }
        match parent_of(&target).and_then(|parent| self.nodes.get(parent)) {
            Some(Node::Dir) => {
                self.nodes.insert(target, Node::Dir);
                Ok(())
            }
            _ => Err(permanent(550, "Create directory operation failed.")),
        }
    }

    fn size(&mut self, path: &str) -> Result<Option<u64>, SessionError> {
        self.begin("SIZE", path)?;
        match self.nodes.get(&self.resolve(path)) {
            Some(Node::File(contents)) => Ok(Some(contents.len() as u64)),
            _ => Ok(None),
        }
    }

    fn nlst(&mut self, path: &str) -> Result<Vec<String>, SessionError> {
        self.begin("NLST", path)?;
        let target = self.resolve(path);
        match self.nodes.get(&target) {
            Some(Node::Dir) => {
                let names: Vec<String> = self
                    .children(&target)
                    .into_iter()
                    .map(|(name, _)| name.to_owned())
                    .collect();
                if names.is_empty() && self.refuse_empty_nlst {
                    return Err(SessionError::Transient {
                        code: 450,
                        message: "No files found".to_owned(),
                    });
                }
                Ok(names)
            }
            Some(_) => Ok(vec![path.to_owned()]),
            None => Err(permanent(550, "No such file or directory.")),
        }
    }

    fn mlsd(&mut self, path: &str) -> Result<Vec<MlsdEntry>, SessionError> {
        self.begin("MLSD", path)?;
        if !self.mlsd {
            return Err(permanent(500, "Unknown command."));
        }
        let target = self.resolve(path);
        if !matches!(self.nodes.get(&target), Some(Node::Dir)) {
            return Err(permanent(550, "No such directory."));
        }

        let mut lines = vec![format!("type=cdir; {target}"), "type=pdir; ..".to_owned()];
        for (name, node) in self.children(&target) {
            let child = normalize(&target, name);
            if self.hidden.contains(&child) {
                continue;
            }
            lines.push(match node {
                Node::Dir => format!("type=dir;modify=20240101000000; {name}"),
                Node::File(contents) if self.size_facts => {
                    format!("type=file;size={}; {name}", contents.len())
                }
                Node::File(_) => format!("type=file; {name}"),
                Node::Link => format!("type=OS.unix=slink:/elsewhere; {name}"),
            });
        }
        lines
            .iter()
            .map(|line| {
                parse_mlsd_line(line).map_err(|error| SessionError::Protocol(error.to_string()))
            })
            .collect()
    }

    fn retrieve(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64, SessionError> {
        self.begin("RETR", path)?;
        let contents = match self.nodes.get(&self.resolve(path)) {
            Some(Node::File(contents)) => contents.clone(),
            _ => return Err(permanent(550, "Failed to open file.")),
        };
        for chunk in contents.chunks(self.chunk_size) {
            sink.write_all(chunk)?;
        }
        Ok(contents.len() as u64)
    }

    fn store(&mut self, path: &str, source: &mut dyn Read) -> Result<u64, SessionError> {
        self.begin("STOR", path)?;
        let target = self.resolve(path);
        let parent_is_dir = parent_of(&target)
            .and_then(|parent| self.nodes.get(parent))
            .is_some_and(|node| matches!(node, Node::Dir));
        if !parent_is_dir || matches!(self.nodes.get(&target), Some(Node::Dir)) {
            return Err(permanent(553, "Could not create file."));
        }

        let mut contents = Vec::new();
        let mut buffer = vec![0_u8; self.chunk_size];
        loop {
            let read = source.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            contents.extend_from_slice(&buffer[..read]);
        }
        let len = contents.len() as u64;
        self.nodes.insert(target, Node::File(contents));
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_against_the_working_directory() {
        assert_eq!(normalize("/pub", "a.txt"), "/pub/a.txt");
        assert_eq!(normalize("/pub", "/a.txt"), "/a.txt");
        assert_eq!(normalize("/pub/sub", "../x/./y/"), "/pub/x/y");
        assert_eq!(normalize("/", ""), "/");
    }

    #[test]
    fn structured_listing_includes_cdir_and_pdir() {
        let mut session = MemorySession::new();
        session.add_file("/d/a", b"12345");
        let entries = session.mlsd("/d").unwrap();
        let names: Vec<_> = entries.iter().map(MlsdEntry::name).collect();
        assert_eq!(names, ["/d", "..", "a"]);
        assert_eq!(entries[2].facts().size(), Some(5));
        assert_eq!(session.commands(), ["MLSD /d"]);
    }

    #[test]
    fn store_then_retrieve_in_chunks() {
        let mut session = MemorySession::new().with_chunk_size(2);
        session.add_dir("/up");
        assert_eq!(session.store("/up/f", &mut &b"hello"[..]).unwrap(), 5);
        let mut out = Vec::new();
        assert_eq!(session.retrieve("/up/f", &mut out).unwrap(), 5);
        assert_eq!(out, b"hello");
        assert!(session.store("/missing/f", &mut &b"x"[..]).is_err());
    }

    #[test]
    fn denied_and_broken_commands_fail_as_configured() {
        let mut session = MemorySession::new().deny("MKD").disconnect_on("PWD");
        assert_eq!(session.mkd("/x").unwrap_err().code(), Some(550));
        assert!(matches!(session.pwd(), Err(SessionError::Io(_))));
        assert_eq!(session.count("MKD"), 1);
    }
}
