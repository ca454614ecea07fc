//! Recursive modification times over the include graph.
//!
//! A file's recursive modtime is the newest own modtime among the file and
//! everything it transitively includes. Include names are resolved against a
//! single base directory (the working directory for the CLI), never against the
//! including file's directory.
//!
//! Every file is visited at most once per resolver. A node is inserted into the
//! cache before its includes are followed, so an include cycle leading back to
//! it ends at the cached node instead of recursing forever. While a node is
//! still in progress its cached value is its own modtime; see `resolve`.

use crate::error::{CleanError, Result};
use crate::includes::find_includes;
use crate::time::{file_modtime, format_modtime};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    /// Includes are still being followed
    InProgress,
    /// Recursive modtime is final
    Done,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    state: NodeState,
    modtime: SystemTime,
}

/// Memoizing resolver for recursive modtimes
pub struct ModtimeResolver {
    base: PathBuf,
    nodes: HashMap<String, Node>,
}

impl ModtimeResolver {
    /// Create a resolver that looks up every file name relative to `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        ModtimeResolver {
            base: base.into(),
            nodes: HashMap::new(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Recursive modtime of `name`.
    ///
    /// A cached node is returned as-is, finished or not. Otherwise the node is
    /// cached in progress, the file is stat'ed and its own modtime becomes the
    /// node's provisional value, then each include is resolved and the newest
    /// value wins. A back-edge of an include cycle therefore sees the own
    /// modtime of the file it points to, never a zero placeholder.
    ///
    /// Fails on the first file that cannot be stat'ed or read.
    pub fn resolve(&mut self, name: &str) -> Result<SystemTime> {
        if let Some(node) = self.nodes.get(name) {
            if node.state == NodeState::InProgress {
                trace!(file = name, "include cycle");
            }
            return Ok(node.modtime);
        }

        self.nodes.insert(
            name.to_string(),
            Node {
                state: NodeState::InProgress,
                modtime: UNIX_EPOCH,
            },
        );

        let path = self.base.join(name);
        let own = file_modtime(&path).map_err(|source| CleanError::io(name, source))?;
        self.set_node(name, NodeState::InProgress, own);

        let data = fs::read(&path).map_err(|source| CleanError::io(name, source))?;
        let includes = find_includes(&String::from_utf8_lossy(&data));
        drop(data);

        let mut newest = own;
        for include in &includes {
            let modtime = self.resolve(include)?;
            trace!(file = name, include = include.as_str(), modtime = %format_modtime(modtime));
            if modtime > newest {
                newest = modtime;
            }
        }

        self.set_node(name, NodeState::Done, newest);
        debug!(
            file = name,
            includes = includes.len(),
            modtime = %format_modtime(newest),
            "resolved"
        );
        Ok(newest)
    }

    /// Final recursive modtime of `name`, if it has been fully resolved
    pub fn cached(&self, name: &str) -> Option<SystemTime> {
        self.nodes
            .get(name)
            .filter(|node| node.state == NodeState::Done)
            .map(|node| node.modtime)
    }

    /// Number of files visited so far
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn set_node(&mut self, name: &str, state: NodeState, modtime: SystemTime) {
        if let Some(node) = self.nodes.get_mut(name) {
            node.state = state;
            node.modtime = modtime;
        }
    }
}
