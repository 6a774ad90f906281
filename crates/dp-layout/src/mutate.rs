// ABOUTME: Structural edits of the panel tree: split in two and close.
// ABOUTME: Both keep the single full root and leave at least one leaf.

use crate::content::ContentMode;
use crate::tree::{NodeId, PanelKind, PanelTree, Slot, SplitAxis, SplitSize, MAX_DEPTH};

impl PanelTree {
    /// Split `id` along `axis`. `id` keeps its identity as the first child of
    /// a new split spliced into its old slot; the second child is a new leaf
    /// showing the same content. Returns the new leaf, or `None` if `id` is
    /// the root, no longer in the tree, or already nested [`MAX_DEPTH`] deep.
    pub fn split(&mut self, id: NodeId, axis: SplitAxis) -> Option<NodeId> {
        let parent = self.parent(id)?;
        if self.depth(id) >= MAX_DEPTH {
            tracing::debug!(panel = ?self.name(id), "refusing to nest panels any deeper");
            return None;
        }
        let slot = self.idx(parent, id)?;
        let mode = self.shown_mode(id);

        let split = self.alloc(PanelKind::split(axis, SplitSize::Auto), Some(parent));
        self.set_child(parent, slot, split);
        self.set_child(split, Slot::First, id);
        let leaf = self.alloc(PanelKind::Leaf { mode }, Some(split));
        self.set_child(split, Slot::Second, leaf);

        tracing::debug!(panel = ?self.name(id), ?axis, "split panel");
        debug_assert_eq!(self.check_invariants(), Ok(()));
        Some(leaf)
    }

    /// Close `id`, promoting its sibling into the slot their parent held.
    /// Returns false, changing nothing, for the root, for the only panel
    /// under the root, and for panels already closed.
    pub fn close(&mut self, id: NodeId) -> bool {
        let Some(split) = self.parent(id) else {
            tracing::debug!("ignoring close of root or closed panel");
            return false;
        };
        if self.kind(split) == Some(PanelKind::Full) {
            tracing::debug!("refusing to close the last top-level panel");
            return false;
        }
        let (Some(slot), Some(grandparent)) = (self.idx(split, id), self.parent(split)) else {
            return false;
        };
        let (Some(split_slot), Some(survivor)) =
            (self.idx(grandparent, split), self.child(split, slot.other()))
        else {
            return false;
        };

        self.set_child(grandparent, split_slot, survivor);
        // Detach both children so releasing the split leaves the survivor alone
        if let Some(node) = self.node_mut(split) {
            node.children = [None, None];
        }
        self.release_subtree(split);
        self.release_subtree(id);

        tracing::debug!(leaves = self.leaf_count(), "closed panel");
        debug_assert_eq!(self.check_invariants(), Ok(()));
        true
    }

    /// Content of `id`, or of the first leaf under it
    fn shown_mode(&self, mut id: NodeId) -> Option<ContentMode> {
        loop {
            match self.kind(id)? {
                PanelKind::Leaf { mode } => return mode,
                _ => id = self.child(id, Slot::First)?,
            }
        }
    }
}
