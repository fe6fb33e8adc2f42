//! In-memory document used by the dashboard service and tests.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{CellSpec, Container, Document, Fragment, ImageHandle, CELL_CLASS, IMAGE_CLASS};

#[derive(Default)]
struct Tree {
    containers: HashMap<String, ContainerNode>,
    next_key: u64,
}

#[derive(Default)]
struct ContainerNode {
    children: Vec<Node>,
    mutations: u64,
}

enum Node {
    Text(String),
    Cell { key: u64, spec: CellSpec },
}

/// Read-only view of a mounted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSnapshot {
    pub id: String,
    pub alt: String,
    pub src: String,
    pub lazy: bool,
}

/// Thread-safe in-memory document. Containers are addressed by class.
#[derive(Clone, Default)]
pub struct MemoryDocument {
    tree: Arc<RwLock<Tree>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty container carrying `class`.
    pub fn add_container(&self, class: &str) {
        self.tree
            .write()
            .containers
            .entry(class.to_string())
            .or_default();
    }

    pub fn with_container(class: &str) -> Self {
        let doc = Self::new();
        doc.add_container(class);
        doc
    }
}

impl Document for MemoryDocument {
    type Container = MemoryContainer;

    fn query_selector(&self, selector: &str) -> Option<MemoryContainer> {
        let class = selector.strip_prefix('.')?;
        if !self.tree.read().containers.contains_key(class) {
            return None;
        }
        Some(MemoryContainer {
            tree: Arc::clone(&self.tree),
            class: class.to_string(),
        })
    }
}

/// Handle to one container of a `MemoryDocument`.
#[derive(Clone)]
pub struct MemoryContainer {
    tree: Arc<RwLock<Tree>>,
    class: String,
}

impl MemoryContainer {
    fn mutate<R>(&self, f: impl FnOnce(&mut ContainerNode, &mut u64) -> R) -> Option<R> {
        let mut tree = self.tree.write();
        let Tree { containers, next_key } = &mut *tree;
        let node = containers.get_mut(&self.class)?;
        node.mutations += 1;
        Some(f(node, next_key))
    }

    fn inspect<R>(&self, f: impl FnOnce(&ContainerNode) -> R) -> Option<R> {
        self.tree.read().containers.get(&self.class).map(f)
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// Concatenated text children, like `textContent`.
    pub fn text_content(&self) -> String {
        self.inspect(|node| {
            node.children
                .iter()
                .filter_map(|n| match n {
                    Node::Text(t) => Some(t.as_str()),
                    Node::Cell { .. } => None,
                })
                .collect::<String>()
        })
        .unwrap_or_default()
    }

    pub fn images(&self) -> Vec<ImageSnapshot> {
        self.inspect(|node| {
            node.children
                .iter()
                .filter_map(|n| match n {
                    Node::Cell { spec, .. } => Some(ImageSnapshot {
                        id: spec.id.clone(),
                        alt: spec.alt.clone(),
                        src: spec.src.clone(),
                        lazy: spec.lazy,
                    }),
                    Node::Text(_) => None,
                })
                .collect()
        })
        .unwrap_or_default()
    }

    pub fn image(&self, id: &str) -> Option<ImageSnapshot> {
        self.images().into_iter().find(|img| img.id == id)
    }

    /// Number of mutations applied so far.
    pub fn mutations(&self) -> u64 {
        self.inspect(|node| node.mutations).unwrap_or(0)
    }

    /// Remove the first image with identity `id`, as an outside script would.
    pub fn remove_image(&self, id: &str) -> bool {
        self.mutate(|node, _| {
            let pos = node
                .children
                .iter()
                .position(|n| matches!(n, Node::Cell { spec, .. } if spec.id == id));
            match pos {
                Some(i) => {
                    node.children.remove(i);
                    true
                }
                None => false,
            }
        })
        .unwrap_or(false)
    }

    /// Serialize the container and its children as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "<div class=\"{}\">", escape(&self.class));
        self.inspect(|node| {
            for child in &node.children {
                match child {
                    Node::Text(t) => out.push_str(&escape(t)),
                    Node::Cell { spec, .. } => {
                        let _ = write!(
                            out,
                            "<div class=\"{CELL_CLASS}\"><img{} alt=\"{}\" id=\"{}\" class=\"{IMAGE_CLASS}\" src=\"{}\"></div>",
                            if spec.lazy { " loading=\"lazy\"" } else { "" },
                            escape(&spec.alt),
                            escape(&spec.id),
                            escape(&spec.src),
                        );
                    }
                }
            }
        });
        out.push_str("</div>");
        out
    }
}

impl Container for MemoryContainer {
    type Image = MemoryImage;

    fn clear(&self) {
        self.mutate(|node, _| node.children.clear());
    }

    fn set_text(&self, text: &str) {
        self.mutate(|node, _| {
            node.children.clear();
            node.children.push(Node::Text(text.to_string()));
        });
    }

    fn append(&self, fragment: Fragment) -> Vec<MemoryImage> {
        self.mutate(|node, next_key| {
            let mut handles = Vec::with_capacity(fragment.len());
            for spec in fragment.into_cells() {
                let key = *next_key;
                *next_key += 1;
                node.children.push(Node::Cell { key, spec });
                handles.push(MemoryImage {
                    tree: Arc::clone(&self.tree),
                    class: self.class.clone(),
                    key,
                });
            }
            handles
        })
        .unwrap_or_default()
    }
}

/// Owned reference to one mounted image.
pub struct MemoryImage {
    tree: Arc<RwLock<Tree>>,
    class: String,
    key: u64,
}

impl ImageHandle for MemoryImage {
    fn set_src(&self, src: &str) -> bool {
        let mut tree = self.tree.write();
        let Some(node) = tree.containers.get_mut(&self.class) else {
            return false;
        };
        let cell = node.children.iter_mut().find_map(|n| match n {
            Node::Cell { key, spec } if *key == self.key => Some(spec),
            _ => None,
        });
        match cell {
            Some(spec) => {
                spec.src = src.to_string();
                node.mutations += 1;
                true
            }
            None => false,
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
