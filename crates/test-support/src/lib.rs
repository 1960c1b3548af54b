#![deny(unsafe_code)]

//! In-process FTP server for integration tests.
//!
//! [`FakeFtpServer`] listens on an ephemeral loopback port and serves an
//! in-memory tree over the subset of RFC 959 / RFC 3659 the workspace uses:
//! `USER`, `PASS`, `TYPE`, `PWD`, `CWD`, `MKD`, `SIZE`, `EPSV`, `PASV`,
//! `MLSD`, `NLST`, `RETR`, `STOR` and `QUIT`. Every received command line is
//! recorded so tests can assert on the conversation.
//!
//! ```no_run
//! use test_support::FakeFtpServer;
//!
//! let server = FakeFtpServer::builder()
//!     .file("/pub/a.txt", b"hello")
//!     .mlsd(false)
//!     .start();
//! assert!(server.is_dir("/pub"));
//! assert_eq!(server.file("/pub/a.txt").as_deref(), Some(&b"hello"[..]));
//! ```

mod session;
mod tree;

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

pub use tree::Node;
use tree::Tree;

/// Behaviour switches for a [`FakeFtpServer`].
#[derive(Clone, Debug)]
pub(crate) struct ServerOptions {
    mlsd: bool,
    epsv: bool,
    refuse_empty_nlst: bool,
    denied: Vec<String>,
}

pub(crate) struct Shared {
    tree: Tree,
    commands: Vec<String>,
}

/// Configures the initial tree and behaviour of a [`FakeFtpServer`].
#[derive(Debug)]
pub struct FakeFtpServerBuilder {
    tree: Tree,
    options: ServerOptions,
}

impl FakeFtpServerBuilder {
    /// Adds a directory, creating missing parents.
    #[must_use]
    pub fn dir(mut self, path: &str) -> Self {
        self.tree.insert_dir(&tree::resolve("/", path));
        self
    }

    /// Adds a file, creating missing parents.
    #[must_use]
    pub fn file(mut self, path: &str, contents: &[u8]) -> Self {
        self.tree
            .insert_file(&tree::resolve("/", path), contents.to_vec());
        self
    }

    /// Enables or disables `MLSD`. When disabled the server answers `500`.
    #[must_use]
    pub fn mlsd(mut self, enabled: bool) -> Self {
        self.options.mlsd = enabled;
        self
    }

    /// Enables or disables `EPSV`. When disabled the server answers `500`.
    #[must_use]
    pub fn epsv(mut self, enabled: bool) -> Self {
        self.options.epsv = enabled;
        self
    }

    /// Makes `NLST` of an empty directory answer `450 No files found`, as
    /// ProFTPD and pure-ftpd do.
    #[must_use]
    pub fn refuse_empty_nlst(mut self) -> Self {
        self.options.refuse_empty_nlst = true;
        self
    }

    /// Makes the server answer `550` to every use of `verb`.
    #[must_use]
    pub fn deny(mut self, verb: &str) -> Self {
        self.options.denied.push(verb.to_ascii_uppercase());
        self
    }

    /// Binds the listener and starts accepting connections.
    ///
    /// # Panics
    ///
    /// Panics when the loopback listener cannot be bound.
    #[must_use]
    pub fn start(self) -> FakeFtpServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake ftp server");
        let address = listener.local_addr().expect("local addr");
        let shared = Arc::new(Mutex::new(Shared {
            tree: self.tree,
            commands: Vec::new(),
        }));
        let stopping = Arc::new(AtomicBool::new(false));

        let accept_shared = Arc::clone(&shared);
        let accept_stopping = Arc::clone(&stopping);
        let options = self.options;
        let handle = thread::spawn(move || {
            for stream in listener.incoming() {
                if accept_stopping.load(Ordering::SeqCst) {
                    break;
                }
                let Ok(stream) = stream else {
                    continue;
                };
                let shared = Arc::clone(&accept_shared);
                let options = options.clone();
                thread::spawn(move || session::serve(stream, &shared, &options));
            }
        });

        FakeFtpServer {
            address,
            shared,
            stopping,
            handle: Some(handle),
        }
    }
}

/// A running in-memory FTP server. Dropping it stops the accept loop.
pub struct FakeFtpServer {
    address: SocketAddr,
    shared: Arc<Mutex<Shared>>,
    stopping: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FakeFtpServer {
    /// Starts a builder with an empty tree, `MLSD` and `EPSV` enabled.
    #[must_use]
    pub fn builder() -> FakeFtpServerBuilder {
        FakeFtpServerBuilder {
            tree: Tree::default(),
            options: ServerOptions {
                mlsd: true,
                epsv: true,
                refuse_empty_nlst: false,
                denied: Vec::new(),
            },
        }
    }

    /// Returns the control-channel address.
    #[must_use]
    pub const fn address(&self) -> SocketAddr {
        self.address
    }

    /// Returns the control-channel port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.address.port()
    }

    /// Returns the contents of the file at `path`, if one exists.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        match self.lock().tree.get(&tree::resolve("/", path)) {
            Some(Node::File(contents)) => Some(contents.clone()),
            _ => None,
        }
    }

    /// Reports whether `path` is a directory.
    #[must_use]
    pub fn is_dir(&self, path: &str) -> bool {
        self.lock().tree.is_dir(&tree::resolve("/", path))
    }

    /// Returns every path currently in the tree, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.lock().tree.paths()
    }

    /// Returns every command line received so far, across connections.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.lock().commands.clone()
    }

    /// Counts received commands whose verb equals `verb`.
    #[must_use]
    pub fn count(&self, verb: &str) -> usize {
        self.lock()
            .commands
            .iter()
            .filter(|line| {
                line.split(' ')
                    .next()
                    .is_some_and(|head| head.eq_ignore_ascii_case(verb))
            })
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for FakeFtpServer {
    fn drop(&mut self) {
        self.stopping.store(true, Ordering::SeqCst);
        let _ = TcpStream::connect(self.address);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
