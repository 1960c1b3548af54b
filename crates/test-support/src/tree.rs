use std::collections::BTreeMap;

/// One node of the in-memory remote filesystem.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    /// A directory.
    Dir,
    /// A regular file and its contents.
    File(Vec<u8>),
}

/// Flat map from absolute normalized paths to nodes.
///
/// The root `/` always exists. Inserting a node creates missing parents.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: BTreeMap<String, Node>,
}

impl Default for Tree {
    fn default() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_owned(), Node::Dir);
        Self { nodes }
    }
}

impl Tree {
    pub fn get(&self, path: &str) -> Option<&Node> {
        self.nodes.get(path)
    }

    pub fn is_dir(&self, path: &str) -> bool {
        matches!(self.nodes.get(path), Some(Node::Dir))
    }

    pub fn insert_dir(&mut self, path: &str) {
        self.ensure_parents(path);
        self.nodes.entry(path.to_owned()).or_insert(Node::Dir);
    }

    pub fn insert_file(&mut self, path: &str, contents: Vec<u8>) {
        self.ensure_parents(path);
        self.nodes.insert(path.to_owned(), Node::File(contents));
    }

    /// Returns `(name, node)` pairs for the direct children of `dir`.
    pub fn children(&self, dir: &str) -> Vec<(String, &Node)> {
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
                (!name.is_empty() && !name.contains('/')).then(|| (name.to_owned(), node))
            })
            .collect()
    }

    pub fn paths(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    fn ensure_parents(&mut self, path: &str) {
        let mut current = String::new();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        for segment in segments.iter().take(segments.len().saturating_sub(1)) {
            current.push('/');
            current.push_str(segment);
            self.nodes.entry(current.clone()).or_insert(Node::Dir);
        }
    }
}

/// Resolves `argument` against `cwd` into an absolute normalized path.
///
/// `.` segments are dropped and `..` pops a segment without escaping `/`.
pub fn resolve(cwd: &str, argument: &str) -> String {
    let joined = if argument.is_empty() {
        cwd.to_owned()
    } else if argument.starts_with('/') {
        argument.to_owned()
    } else {
        format!("{cwd}/{argument}")
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        "/".to_owned()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Returns the parent of an absolute normalized path.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(index) => &path[..index],
    }
}
