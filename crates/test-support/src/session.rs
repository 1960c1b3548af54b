use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Ipv4Addr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::tree::{Node, Tree, parent, resolve};
use crate::{ServerOptions, Shared};

const IO_TIMEOUT: Duration = Duration::from_secs(10);

/// Serves one control connection until `QUIT` or disconnect.
pub fn serve(stream: TcpStream, shared: &Arc<Mutex<Shared>>, options: &ServerOptions) {
    let _ = Session::new(stream, shared, options).and_then(Session::run);
}

struct Session<'a> {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    shared: &'a Arc<Mutex<Shared>>,
    options: &'a ServerOptions,
    cwd: String,
    passive: Option<TcpListener>,
}

impl<'a> Session<'a> {
    fn new(
        stream: TcpStream,
        shared: &'a Arc<Mutex<Shared>>,
        options: &'a ServerOptions,
    ) -> io::Result<Self> {
        stream.set_read_timeout(Some(IO_TIMEOUT))?;
        stream.set_write_timeout(Some(IO_TIMEOUT))?;
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            shared,
            options,
            cwd: "/".to_owned(),
            passive: None,
        })
    }

    fn run(mut self) -> io::Result<()> {
        self.reply(220, "fake ftp ready")?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(());
            }
            let trimmed = line.trim_end_matches(['\r', '\n']);
            let (verb, argument) = match trimmed.split_once(' ') {
                Some((verb, argument)) => (verb.to_ascii_uppercase(), argument.to_owned()),
                None => (trimmed.to_ascii_uppercase(), String::new()),
            };
            self.lock().commands.push(trimmed.to_owned());

            if self.options.denied.iter().any(|denied| *denied == verb) {
                self.reply(550, "Permission denied")?;
                continue;
            }

            match verb.as_str() {
                "USER" => self.reply(331, "Password required")?,
                "PASS" => self.reply(230, "Logged in")?,
                "TYPE" => self.reply(200, "Type set")?,
                "PWD" => {
                    let quoted = self.cwd.replace('"', "\"\"");
                    self.reply(257, &format!("\"{quoted}\" is the current directory"))?;
                }
                "CWD" => self.change_dir(&argument)?,
                "MKD" => self.make_dir(&argument)?,
                "SIZE" => self.size(&argument)?,
                "EPSV" if self.options.epsv => {
                    let port = self.open_passive()?;
                    self.reply(229, &format!("Entering Extended Passive Mode (|||{port}|)"))?;
                }
                "PASV" => {
                    let port = self.open_passive()?;
                    self.reply(
                        227,
                        &format!(
                            "Entering Passive Mode (127,0,0,1,{},{})",
                            port >> 8,
                            port & 0xff
                        ),
                    )?;
                }
                "MLSD" if self.options.mlsd => self.list_structured(&argument)?,
                "NLST" => self.list_names(&argument)?,
                "RETR" => self.retrieve(&argument)?,
                "STOR" => self.store(&argument)?,
                "QUIT" => {
                    self.reply(221, "Goodbye")?;
                    return Ok(());
                }
                "EPSV" | "MLSD" => self.reply(500, "Unknown command")?,
                _ => self.reply(502, "Command not implemented")?,
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reply(&mut self, code: u16, text: &str) -> io::Result<()> {
        write!(self.writer, "{code} {text}\r\n")?;
        self.writer.flush()
    }

    fn open_passive(&mut self) -> io::Result<u16> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
        let port = listener.local_addr()?.port();
        self.passive = Some(listener);
        Ok(port)
    }

    fn accept_data(&mut self) -> io::Result<Option<TcpStream>> {
        let Some(listener) = self.passive.take() else {
            self.reply(425, "Use PASV or EPSV first")?;
            return Ok(None);
        };
        self.reply(150, "Opening data connection")?;
        let (stream, _) = listener.accept()?;
        stream.set_read_timeout(Some(IO_TIMEOUT))?;
        stream.set_write_timeout(Some(IO_TIMEOUT))?;
        Ok(Some(stream))
    }

    fn change_dir(&mut self, argument: &str) -> io::Result<()> {
        let path = resolve(&self.cwd, argument);
        if self.lock().tree.is_dir(&path) {
            self.cwd = path;
            self.reply(250, "Directory changed")
        } else {
            self.reply(550, "No such directory")
        }
    }

    fn make_dir(&mut self, argument: &str) -> io::Result<()> {
        let path = resolve(&self.cwd, argument);
        let created = {
            let mut shared = self.lock();
            if shared.tree.get(&path).is_some() || !shared.tree.is_dir(parent(&path)) {
                false
            } else {
                shared.tree.insert_dir(&path);
                true
            }
        };
        if created {
            let quoted = path.replace('"', "\"\"");
            self.reply(257, &format!("\"{quoted}\" created"))
        } else {
            self.reply(550, "Cannot create directory")
        }
    }

    fn size(&mut self, argument: &str) -> io::Result<()> {
        let path = resolve(&self.cwd, argument);
        let size = match self.lock().tree.get(&path) {
            Some(Node::File(contents)) => Some(contents.len()),
            _ => None,
        };
        match size {
            Some(size) => self.reply(213, &size.to_string()),
            None => self.reply(550, "Not a plain file"),
        }
    }

    fn list_structured(&mut self, argument: &str) -> io::Result<()> {
        let path = resolve(&self.cwd, argument);
        let lines = {
            let shared = self.lock();
            listing_lines(&shared.tree, &path, |name, node| match node {
                Node::Dir => format!("type=dir;modify=20240101000000;perm=flcdmpe; {name}"),
                Node::File(contents) => format!(
                    "type=file;size={};modify=20240101000000;perm=adfrw; {name}",
                    contents.len()
                ),
            })
            .map(|mut lines| {
                lines.insert(0, format!("type=cdir;perm=flcdmpe; {path}"));
                lines.insert(1, "type=pdir;perm=flcdmpe; ..".to_owned());
                lines
            })
        };
        self.send_lines(lines)
    }

    fn list_names(&mut self, argument: &str) -> io::Result<()> {
        let path = resolve(&self.cwd, argument);
        let lines = {
            let shared = self.lock();
            match shared.tree.get(&path) {
                Some(Node::File(_)) => Some(vec![argument.to_owned()]),
                _ => listing_lines(&shared.tree, &path, |name, _| name.to_owned()),
            }
        };
        if self.options.refuse_empty_nlst && lines.as_ref().is_some_and(Vec::is_empty) {
            self.passive = None;
            return self.reply(450, "No files found");
        }
        self.send_lines(lines)
    }

    fn send_lines(&mut self, lines: Option<Vec<String>>) -> io::Result<()> {
        let Some(lines) = lines else {
            self.passive = None;
            return self.reply(550, "No such file or directory");
        };
        let Some(mut data) = self.accept_data()? else {
            return Ok(());
        };
        for line in lines {
            write!(data, "{line}\r\n")?;
        }
        data.flush()?;
        drop(data);
        self.reply(226, "Transfer complete")
    }

    fn retrieve(&mut self, argument: &str) -> io::Result<()> {
        let path = resolve(&self.cwd, argument);
        let contents = match self.lock().tree.get(&path) {
            Some(Node::File(contents)) => Some(contents.clone()),
            _ => None,
        };
        let Some(contents) = contents else {
            self.passive = None;
            return self.reply(550, "No such file");
        };
        let Some(mut data) = self.accept_data()? else {
            return Ok(());
        };
        data.write_all(&contents)?;
        data.flush()?;
        drop(data);
        self.reply(226, "Transfer complete")
    }

    fn store(&mut self, argument: &str) -> io::Result<()> {
        let path = resolve(&self.cwd, argument);
        let writable = {
            let shared = self.lock();
            shared.tree.is_dir(parent(&path)) && !shared.tree.is_dir(&path)
        };
        if !writable {
            self.passive = None;
            return self.reply(553, "Cannot store file here");
        }
        let Some(mut data) = self.accept_data()? else {
            return Ok(());
        };
        let mut contents = Vec::new();
        data.read_to_end(&mut contents)?;
        self.lock().tree.insert_file(&path, contents);
        self.reply(226, "Transfer complete")
    }
}

fn listing_lines(
    tree: &Tree,
    path: &str,
    render: impl Fn(&str, &Node) -> String,
) -> Option<Vec<String>> {
    if !tree.is_dir(path) {
        return None;
    }
    Some(
        tree.children(path)
            .into_iter()
            .map(|(name, node)| render(&name, node))
            .collect(),
    )
}
