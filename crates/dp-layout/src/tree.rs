// ABOUTME: Arena-backed binary tree of layout panels.
// ABOUTME: Nodes are addressed by generational ids; parents are plain back references.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::content::ContentMode;
use crate::geometry::Axis;

/// Deepest nesting a tree may reach, counted in panels below the root.
/// Parsing, layout and serialization recurse once per level.
pub const MAX_DEPTH: usize = 128;

/// Handle to a node in a [`PanelTree`]. Stale handles (to closed panels)
/// never resolve, even after their slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Stable key for a panel, handed to the renderer so it can keep per-region
/// state (scroll offsets, selection) across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelName(u64);

impl PanelName {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PanelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl std::str::FromStr for PanelName {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s, 16).map(PanelName)
    }
}

/// Orientation of a split. A horizontal split stacks its children top and
/// bottom; a vertical split puts them side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAxis {
    Horizontal,
    Vertical,
}

impl SplitAxis {
    /// Axis along which the first child's size is measured
    pub fn along(self) -> Axis {
        match self {
            SplitAxis::Horizontal => Axis::Y,
            SplitAxis::Vertical => Axis::X,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            SplitAxis::Horizontal => b'_',
            SplitAxis::Vertical => b'|',
        }
    }
}

/// Extent of a split's first child. `Auto` is resolved to half the
/// available space the first time the split is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitSize {
    #[default]
    Auto,
    Fixed(u32),
}

impl SplitSize {
    /// Zero has always meant "not laid out yet" in descriptions.
    pub fn from_raw(value: u32) -> Self {
        if value == 0 {
            SplitSize::Auto
        } else {
            SplitSize::Fixed(value)
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            SplitSize::Auto => 0,
            SplitSize::Fixed(n) => n,
        }
    }

    pub fn fixed(self) -> Option<u32> {
        match self {
            SplitSize::Auto => None,
            SplitSize::Fixed(n) => Some(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// Tree root, wraps exactly one child
    Full,
    Split {
        axis: SplitAxis,
        size: SplitSize,
        /// Set while the user drags this split's gutter
        resizing: bool,
    },
    /// `None` when the description named a mode outside the catalog
    Leaf { mode: Option<ContentMode> },
}

impl PanelKind {
    pub fn split(axis: SplitAxis, size: SplitSize) -> Self {
        PanelKind::Split {
            axis,
            size,
            resizing: false,
        }
    }

    pub fn is_internal(&self) -> bool {
        match self {
            PanelKind::Full | PanelKind::Split { .. } => true,
            PanelKind::Leaf { .. } => false,
        }
    }
}

/// Child position within a parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    pub fn other(self) -> Slot {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PanelNode {
    pub(crate) kind: PanelKind,
    pub(crate) name: PanelName,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: [Option<NodeId>; 2],
}

impl PanelNode {
    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn name(&self) -> PanelName {
        self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn child(&self, slot: Slot) -> Option<NodeId> {
        self.children[slot.index()]
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }

    pub fn content_mode(&self) -> Option<ContentMode> {
        match self.kind {
            PanelKind::Leaf { mode } => mode,
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    generation: u32,
    node: Option<PanelNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("root panel is not a full panel")]
    RootNotFull,

    #[error("root panel has a parent")]
    RootHasParent,

    #[error("panel {panel} is missing its child in slot {slot}")]
    MissingChild { panel: PanelName, slot: usize },

    #[error("panel {panel} has an unexpected child in slot {slot}")]
    ExtraChild { panel: PanelName, slot: usize },

    #[error("panel {panel} does not point back at its parent")]
    ParentMismatch { panel: PanelName },

    #[error("full panel {panel} is not the root")]
    NestedFull { panel: PanelName },

    #[error("panel name {panel} is used more than once")]
    DuplicateName { panel: PanelName },

    #[error("{count} panels are not reachable from the root")]
    Unreachable { count: usize },
}

/// Binary tree of panels. Ownership runs strictly downward; `parent` links
/// are only used to rewrite the tree upward during split and close.
#[derive(Debug, Clone)]
pub struct PanelTree {
    entries: Vec<Entry>,
    free: Vec<u32>,
    root: NodeId,
    next_name: u64,
}

impl PanelTree {
    /// A full root wrapping one leaf showing `mode`
    pub fn new(mode: ContentMode) -> Self {
        let mut tree = Self::bare();
        let root = tree.root;
        let leaf = tree.alloc(PanelKind::Leaf { mode: Some(mode) }, Some(root));
        tree.set_child(root, Slot::First, leaf);
        tree
    }

    /// A full root with no child yet; callers must attach one.
    pub(crate) fn bare() -> Self {
        let mut tree = Self {
            entries: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            next_name: 1,
        };
        tree.root = tree.alloc(PanelKind::Full, None);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&PanelNode> {
        self.entries
            .get(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_ref())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut PanelNode> {
        self.entries
            .get_mut(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.node.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<PanelKind> {
        self.node(id).map(|node| node.kind)
    }

    pub fn name(&self, id: NodeId) -> Option<PanelName> {
        self.node(id).map(|node| node.name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Number of panels above `id`; the root is at depth 0
    pub fn depth(&self, id: NodeId) -> usize {
        std::iter::successors(self.parent(id), |p| self.parent(*p)).count()
    }

    pub fn child(&self, id: NodeId, slot: Slot) -> Option<NodeId> {
        self.node(id).and_then(|node| node.child(slot))
    }

    /// Slot `child` occupies in `parent`, if it is a direct child
    pub fn idx(&self, parent: NodeId, child: NodeId) -> Option<Slot> {
        let node = self.node(parent)?;
        [Slot::First, Slot::Second]
            .into_iter()
            .find(|slot| node.child(*slot) == Some(child))
    }

    pub fn content_mode(&self, id: NodeId) -> Option<ContentMode> {
        self.node(id).and_then(PanelNode::content_mode)
    }

    /// Change what a leaf shows. Returns false if `id` is not a live leaf.
    pub fn set_content_mode(&mut self, id: NodeId, mode: ContentMode) -> bool {
        match self.node_mut(id) {
            Some(PanelNode {
                kind: PanelKind::Leaf { mode: current },
                ..
            }) => {
                *current = Some(mode);
                true
            }
            _ => false,
        }
    }

    /// Leaves in description order (depth first, first slot first)
    pub fn leaves(&self) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|id| matches!(self.kind(*id), Some(PanelKind::Leaf { .. })))
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    pub fn full_count(&self) -> usize {
        self.walk()
            .into_iter()
            .filter(|id| self.kind(*id) == Some(PanelKind::Full))
            .count()
    }

    pub fn find_by_name(&self, name: PanelName) -> Option<NodeId> {
        self.walk().into_iter().find(|id| self.name(*id) == Some(name))
    }

    /// All nodes reachable from the root, pre-order
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            out.push(id);
            // Second pushed first so the first slot is visited first
            stack.extend(node.children.iter().rev().flatten());
        }
        out
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let root = self.node(self.root).ok_or(InvariantViolation::RootNotFull)?;
        if root.kind != PanelKind::Full {
            return Err(InvariantViolation::RootNotFull);
        }
        if root.parent.is_some() {
            return Err(InvariantViolation::RootHasParent);
        }

        let mut names = HashSet::new();
        let reachable = self.walk();
        for &id in &reachable {
            let Some(node) = self.node(id) else {
                continue;
            };
            if !names.insert(node.name) {
                return Err(InvariantViolation::DuplicateName { panel: node.name });
            }

            let required = match node.kind {
                PanelKind::Full if id != self.root => {
                    return Err(InvariantViolation::NestedFull { panel: node.name });
                }
                PanelKind::Full => 1,
                PanelKind::Split { .. } => 2,
                PanelKind::Leaf { .. } => 0,
            };
            for (slot, child) in node.children.iter().enumerate() {
                match child {
                    Some(_) if slot >= required => {
                        return Err(InvariantViolation::ExtraChild {
                            panel: node.name,
                            slot,
                        });
                    }
                    None if slot < required => {
                        return Err(InvariantViolation::MissingChild {
                            panel: node.name,
                            slot,
                        });
                    }
                    Some(child) => {
                        let child = self.node(*child).ok_or(InvariantViolation::MissingChild {
                            panel: node.name,
                            slot,
                        })?;
                        if child.parent != Some(id) {
                            return Err(InvariantViolation::ParentMismatch { panel: child.name });
                        }
                    }
                    None => {}
                }
            }
        }

        let live = self.entries.iter().filter(|e| e.node.is_some()).count();
        if live != reachable.len() {
            return Err(InvariantViolation::Unreachable {
                count: live - reachable.len(),
            });
        }
        Ok(())
    }

    /// Nested, serializable copy of the tree for debugging dumps
    pub fn snapshot(&self) -> PanelSnapshot {
        self.snapshot_node(self.root)
    }

    fn snapshot_node(&self, id: NodeId) -> PanelSnapshot {
        let Some(node) = self.node(id) else {
            return PanelSnapshot::Missing;
        };
        let child = |slot: Slot| {
            Box::new(
                node.child(slot)
                    .map(|c| self.snapshot_node(c))
                    .unwrap_or(PanelSnapshot::Missing),
            )
        };
        let name = node.name.to_string();
        match node.kind {
            PanelKind::Full => PanelSnapshot::Full {
                name,
                child: child(Slot::First),
            },
            PanelKind::Split { axis, size, .. } => PanelSnapshot::Split {
                name,
                axis,
                size: size.fixed(),
                first: child(Slot::First),
                second: child(Slot::Second),
            },
            PanelKind::Leaf { mode } => PanelSnapshot::Leaf { name, mode },
        }
    }

    pub(crate) fn alloc(&mut self, kind: PanelKind, parent: Option<NodeId>) -> NodeId {
        let name = PanelName(self.next_name);
        self.next_name += 1;
        let node = PanelNode {
            kind,
            name,
            parent,
            children: [None, None],
        };

        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.node = Some(node);
            NodeId {
                index,
                generation: entry.generation,
            }
        } else {
            let index = self.entries.len() as u32;
            self.entries.push(Entry {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Free `id` and everything below it
    pub(crate) fn release_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(entry) = self.entries.get_mut(id.index as usize) else {
                continue;
            };
            if entry.generation != id.generation {
                continue;
            }
            if let Some(node) = entry.node.take() {
                stack.extend(node.children.iter().flatten());
                entry.generation = entry.generation.wrapping_add(1);
                self.free.push(id.index);
            }
        }
    }

    pub(crate) fn set_child(&mut self, parent: NodeId, slot: Slot, child: NodeId) {
        if let Some(node) = self.node_mut(parent) {
            node.children[slot.index()] = Some(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
    }
}

impl Default for PanelTree {
    fn default() -> Self {
        Self::new(ContentMode::Console)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelSnapshot {
    Full {
        name: String,
        child: Box<PanelSnapshot>,
    },
    Split {
        name: String,
        axis: SplitAxis,
        size: Option<u32>,
        first: Box<PanelSnapshot>,
        second: Box<PanelSnapshot>,
    },
    Leaf {
        name: String,
        mode: Option<ContentMode>,
    },
    Missing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tree_is_full_over_one_leaf() {
        let tree = PanelTree::new(ContentMode::Listing);
        assert_eq!(tree.kind(tree.root()), Some(PanelKind::Full));
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.full_count(), 1);

        let leaf = tree.leaves()[0];
        assert_eq!(tree.parent(leaf), Some(tree.root()));
        assert_eq!(tree.content_mode(leaf), Some(ContentMode::Listing));
        assert_eq!(tree.idx(tree.root(), leaf), Some(Slot::First));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn idx_reports_not_found_for_non_children() {
        let tree = PanelTree::default();
        let leaf = tree.leaves()[0];
        assert_eq!(tree.idx(leaf, tree.root()), None);
    }

    #[test]
    fn internal_kinds() {
        assert!(PanelKind::Full.is_internal());
        assert!(PanelKind::split(SplitAxis::Vertical, SplitSize::Auto).is_internal());
        assert!(!PanelKind::Leaf { mode: None }.is_internal());
    }

    #[test]
    fn released_ids_go_stale_when_slot_is_reused() {
        let mut tree = PanelTree::default();
        let root = tree.root();
        let old = tree.leaves()[0];
        tree.release_subtree(old);
        assert!(!tree.contains(old));

        let new = tree.alloc(PanelKind::Leaf { mode: None }, Some(root));
        tree.set_child(root, Slot::First, new);
        assert!(tree.contains(new));
        assert!(!tree.contains(old));
        assert_ne!(tree.name(new), None);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn set_content_mode_only_on_leaves() {
        let mut tree = PanelTree::default();
        let leaf = tree.leaves()[0];
        assert!(tree.set_content_mode(leaf, ContentMode::Registers));
        assert_eq!(tree.content_mode(leaf), Some(ContentMode::Registers));
        assert!(!tree.set_content_mode(tree.root(), ContentMode::Registers));
    }

    #[test]
    fn check_invariants_flags_missing_child() {
        let tree = PanelTree::bare();
        assert!(matches!(
            tree.check_invariants(),
            Err(InvariantViolation::MissingChild { slot: 0, .. })
        ));
    }

    #[test]
    fn panel_name_is_eight_hex_digits() {
        let tree = PanelTree::default();
        let name = tree.name(tree.leaves()[0]).unwrap();
        let text = name.to_string();
        assert_eq!(text.len(), 8);
        assert_eq!(text.parse::<PanelName>().unwrap(), name);
    }

    #[test]
    fn snapshot_serializes() {
        let tree = PanelTree::default();
        let json = serde_json::to_string(&tree.snapshot()).unwrap();
        assert!(json.contains("\"kind\":\"full\""));
        assert!(json.contains("\"mode\":\"console\""));
    }
}
