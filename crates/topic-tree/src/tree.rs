//! Arena-backed topic tree.

use crate::error::TreeError;
use std::collections::HashMap;

/// Topic path separator.
pub const SEPARATOR: char = '/';

const ROOT: NodeId = NodeId(0);

/// Handle to a node inside a [`TopicTree`].
///
/// Ids stay valid until the node is removed; they are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One path segment of the tree.
#[derive(Debug)]
pub struct TopicNode<T> {
    name: String,
    payload: Option<T>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    child_index: HashMap<String, NodeId>,
}

impl<T> TopicNode<T> {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            payload: None,
            parent,
            children: Vec::new(),
            child_index: HashMap::new(),
        }
    }

    /// Segment label, unique among siblings. Empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A node detached by [`TopicTree::remove`].
#[derive(Debug)]
pub struct Removed<T> {
    /// Full path the node had before removal.
    pub path: String,
    /// Payload of the removed node itself.
    pub payload: Option<T>,
    /// Number of nodes freed, including the removed node.
    pub freed: usize,
}

/// Mapping from slash-delimited paths to cached payloads, organised as a tree.
///
/// The root is synthetic: it has no name, never carries a payload, and cannot
/// be removed.
#[derive(Debug)]
pub struct TopicTree<T> {
    nodes: Vec<Option<TopicNode<T>>>,
    live: usize,
}

impl<T> Default for TopicTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TopicTree<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(TopicNode::new(String::new(), None))],
            live: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Number of nodes below the root, intermediate nodes included.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn node(&self, id: NodeId) -> Option<&TopicNode<T>> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut TopicNode<T>> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn payload(&self, id: NodeId) -> Option<&T> {
        self.node(id).and_then(TopicNode::payload)
    }

    pub fn payload_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).and_then(|node| node.payload.as_mut())
    }

    /// Insert `payload` at `path`, creating any missing intermediate nodes.
    ///
    /// An existing payload at the same path is overwritten.
    pub fn insert(&mut self, path: &str, payload: T) -> Result<NodeId, TreeError> {
        let mut current = ROOT;
        let mut segments = segments(path).peekable();
        if segments.peek().is_none() {
            return Err(TreeError::EmptyPath);
        }

        for segment in segments {
            current = match self.child(current, segment) {
                Some(existing) => existing,
                None => self.attach(current, segment),
            };
        }

        if let Some(node) = self.node_mut(current) {
            node.payload = Some(payload);
        }
        Ok(current)
    }

    /// Resolve `path` without creating nodes. Partial matches are absent.
    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        let mut current = ROOT;
        let mut matched = false;
        for segment in segments(path) {
            current = self.child(current, segment)?;
            matched = true;
        }
        matched.then_some(current)
    }

    /// Nodes sharing `id`'s parent, excluding `id`, in insertion order.
    pub fn siblings_of(&self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.node(id).and_then(TopicNode::parent) else {
            return Vec::new();
        };
        self.node(parent)
            .map(|parent| {
                parent
                    .children
                    .iter()
                    .copied()
                    .filter(|&child| child != id)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn siblings_of_path(&self, path: &str) -> Vec<NodeId> {
        self.lookup(path)
            .map(|id| self.siblings_of(id))
            .unwrap_or_default()
    }

    /// Rebuild the `/`-joined path from the root down to `id`.
    ///
    /// The root itself maps to the empty string.
    pub fn full_path(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            names.push(current.name.as_str());
            current = self.node(parent)?;
        }
        names.reverse();
        Some(names.join("/"))
    }

    /// Every node carrying a payload, in pre-order.
    pub fn payload_bearing(&self) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if node.payload.is_some() {
                found.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        found
    }

    /// `(full path, payload)` for every payload-bearing node, in pre-order.
    pub fn entries(&self) -> Vec<(String, &T)> {
        self.payload_bearing()
            .into_iter()
            .filter_map(|id| Some((self.full_path(id)?, self.payload(id)?)))
            .collect()
    }

    /// Detach the node at `path` together with its whole subtree.
    ///
    /// Returns `Ok(None)` when the path does not resolve.
    pub fn remove(&mut self, path: &str) -> Result<Option<Removed<T>>, TreeError> {
        if segments(path).next().is_none() {
            return Err(TreeError::RootRemoval);
        }
        let Some(id) = self.lookup(path) else {
            return Ok(None);
        };
        let full_path = self.full_path(id).unwrap_or_default();

        let Some(parent) = self.node(id).and_then(TopicNode::parent) else {
            return Err(TreeError::RootRemoval);
        };
        if let Some(parent) = self.node_mut(parent) {
            parent.children.retain(|&child| child != id);
            parent.child_index.retain(|_, child| *child != id);
        }

        let mut payload = None;
        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) else {
                continue;
            };
            freed += 1;
            stack.extend(node.children.iter().copied());
            if current == id {
                payload = node.payload;
            }
        }
        self.live -= freed;

        Ok(Some(Removed {
            path: full_path,
            payload,
            freed,
        }))
    }

    fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)?.child_index.get(name).copied()
    }

    fn attach(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Some(TopicNode::new(name.to_string(), Some(parent))));
        if let Some(parent) = self.node_mut(parent) {
            parent.children.push(id);
            parent.child_index.insert(name.to_string(), id);
        }
        self.live += 1;
        id
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|segment| !segment.is_empty())
}
