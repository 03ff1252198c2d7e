//! Arena-backed element tree.
//!
//! Nodes are addressed by [`NodeId`]. Removing a node detaches it (it can be
//! re-appended later); destroying it also frees the slots of its subtree.
//! Freed slots are reused, and each reuse bumps the slot's generation so a
//! stale id never resolves to the node that took its place.
//! A node is *connected* when its ancestor chain reaches the document root.
//!
//! Elements can carry one-shot `loaded` callbacks. They fire the moment the
//! element becomes connected, or immediately if it already is.

use std::collections::HashMap;
use std::fmt;

/// Handle to a node in a [`Document`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element {
        tag: String,
        /// Insertion-ordered; a name appears at most once.
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

type LoadedCallback = Box<dyn FnOnce()>;

pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    root: NodeId,
    loaded: HashMap<NodeId, Vec<LoadedCallback>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Tag of the synthetic root element.
    pub const ROOT_TAG: &'static str = "#document";

    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Element { tag: Self::ROOT_TAG.to_string(), attributes: Vec::new() },
            parent: None,
            children: Vec::new(),
        };
        Self {
            slots: vec![Slot { generation: 0, node: Some(root) }],
            free: Vec::new(),
            live: 1,
            root: NodeId { index: 0, generation: 0 },
            loaded: HashMap::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Element { tag: tag.into(), attributes: Vec::new() })
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let node = Node { kind, parent: None, children: Vec::new() };
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId { index, generation: slot.generation };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, node: Some(node) });
        NodeId { index, generation: 0 }
    }

    /// Empties the slot behind `id` and queues it for reuse.
    fn release(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize).filter(|s| s.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(node)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Slots allocated so far, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    // ── Structure ─────────────────────────────────────────────────────────

    /// Appends `child` as the last child of `parent`, detaching it from its
    /// previous parent first. Returns `false` when either id is dead, when
    /// `parent` is a text node or when the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(child) || parent == child || self.is_ancestor(child, parent) {
            return false;
        }
        match self.node(parent) {
            Some(Node { kind: NodeKind::Element { .. }, .. }) => {}
            _ => return false,
        }

        self.remove(child);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }

        if self.is_connected(child) {
            self.fire_loaded(child);
        }
        true
    }

    /// Detaches `id` from its parent. The subtree stays alive.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    /// Detaches `id` and frees its whole subtree. The root cannot be destroyed.
    pub fn destroy(&mut self, id: NodeId) {
        if id == self.root || !self.contains(id) {
            return;
        }
        self.remove(id);
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.release(n) {
                stack.extend(node.children);
            }
            self.loaded.remove(&n);
        }
    }

    /// Destroys every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.destroy(child);
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, of: NodeId) -> bool {
        let mut cur = self.parent(of);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    /// Whether the ancestor chain of `id` reaches the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == self.root || (self.contains(id) && self.is_ancestor(self.root, id))
    }

    /// Depth-first, pre-order walk of the subtree under `id`, `id` included.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let Some(node) = self.node(n) else {
                continue;
            };
            out.push(n);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    // ── Elements ──────────────────────────────────────────────────────────

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Tag name, or `None` for text nodes and dead ids.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Text(t) => Some(t),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id).iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Sets (or replaces in place) an attribute. Ignored for text nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let Some(Node { kind: NodeKind::Element { attributes, .. }, .. }) = self.node_mut(id) else {
            return;
        };
        let value = value.into();
        match attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => attributes.push((name.to_string(), value)),
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(Node { kind: NodeKind::Element { attributes, .. }, .. }) = self.node_mut(id) {
            attributes.retain(|(k, _)| k != name);
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// First connected element whose `id` attribute equals `value`.
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants(self.root).into_iter().find(|n| self.attribute(*n, "id") == Some(value))
    }

    /// First element with `tag` in the subtree under `scope`.
    pub fn first_by_tag(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(scope).into_iter().find(|n| self.tag(*n) == Some(tag))
    }

    /// Every element with `tag` in the subtree under `scope`, in document order.
    pub fn all_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope).into_iter().filter(|n| self.tag(*n) == Some(tag)).collect()
    }

    // ── Loaded signal ─────────────────────────────────────────────────────

    /// Runs `callback` once `id` is connected to the document.
    pub fn on_loaded(&mut self, id: NodeId, callback: impl FnOnce() + 'static) {
        if self.is_connected(id) {
            callback();
        } else if self.contains(id) {
            self.loaded.entry(id).or_default().push(Box::new(callback));
        }
    }

    fn fire_loaded(&mut self, subtree: NodeId) {
        if self.loaded.is_empty() {
            return;
        }
        let ready: Vec<LoadedCallback> = self
            .descendants(subtree)
            .into_iter()
            .filter_map(|n| self.loaded.remove(&n))
            .flatten()
            .collect();
        for callback in ready {
            callback();
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.len())
            .field("pending_loaded", &self.loaded.len())
            .finish()
    }
}
