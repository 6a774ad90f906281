// ABOUTME: Per-frame layout walk over the panel tree.
// ABOUTME: Sizes split bands, tracks gutter drags and dispatches leaf content.

use dp_core::LayoutMetrics;

use crate::content::ContentMode;
use crate::geometry::{Axis, Rect};
use crate::tree::{NodeId, PanelKind, PanelName, PanelNode, PanelTree, Slot, SplitAxis, SplitSize};

/// Primary pointer state as seen from one rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragGesture {
    /// Button went down inside the rectangle this frame
    pub started: bool,
    /// Button is still held
    pub active: bool,
    /// Pointer movement since the previous frame
    pub delta_x: i32,
    pub delta_y: i32,
}

impl DragGesture {
    pub fn delta(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.delta_x,
            Axis::Y => self.delta_y,
        }
    }
}

/// Something the user picked in a leaf's header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Split(SplitAxis),
    Close,
    SelectMode(ContentMode),
}

/// Rendering and input toolkit the layout walk draws through.
///
/// A surface is a region being filled front to back. `child` opens a nested
/// surface over part of it; toolkits keep per-region state keyed by `name`.
pub trait Surface {
    /// Part of the current region not reserved yet
    fn available(&self) -> Rect;

    /// Reserve a band `extent` thick along `axis` from the front of the free
    /// region. A non-positive extent reserves everything left.
    fn reserve(&mut self, extent: i32, axis: Axis) -> Rect;

    /// Pointer drag state relative to `rect`
    fn drag(&mut self, rect: Rect) -> DragGesture;

    /// Run `body` inside a sub-region named `name`, framed when `border` is set
    fn child(
        &mut self,
        name: PanelName,
        rect: Rect,
        border: bool,
        body: &mut dyn FnMut(&mut Self),
    );

    /// Draw a leaf's header (split menu, close, mode picker)
    fn header(
        &mut self,
        rect: Rect,
        name: PanelName,
        mode: Option<ContentMode>,
    ) -> Option<HeaderAction>;
}

/// Draws the content of leaves. The surface handed over is already sized to
/// the leaf's body; the provider owns everything drawn in it.
pub trait ContentProvider<S: ?Sized> {
    fn render(&mut self, mode: ContentMode, surface: &mut S);
}

/// Where things ended up in one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameLayout {
    /// Whole region of each leaf, header included
    pub leaves: Vec<(PanelName, Rect)>,
    /// Grab area of each split's gutter
    pub gutters: Vec<(PanelName, Rect)>,
}

impl FrameLayout {
    pub fn leaf(&self, name: PanelName) -> Option<Rect> {
        self.leaves.iter().find(|(n, _)| *n == name).map(|(_, r)| *r)
    }

    pub fn gutter(&self, name: PanelName) -> Option<Rect> {
        self.gutters.iter().find(|(n, _)| *n == name).map(|(_, r)| *r)
    }

    /// Leaf under a point
    pub fn hit_test(&self, x: i32, y: i32) -> Option<PanelName> {
        self.leaves
            .iter()
            .find(|(_, rect)| rect.contains(x, y))
            .map(|(name, _)| *name)
    }
}

pub(crate) struct Coordinator<'a, C> {
    tree: &'a mut PanelTree,
    metrics: &'a LayoutMetrics,
    content: &'a mut C,
    actions: Vec<(NodeId, HeaderAction)>,
    layout: FrameLayout,
}

impl<'a, C> Coordinator<'a, C> {
    pub(crate) fn new(
        tree: &'a mut PanelTree,
        metrics: &'a LayoutMetrics,
        content: &'a mut C,
    ) -> Self {
        Self {
            tree,
            metrics,
            content,
            actions: Vec::new(),
            layout: FrameLayout::default(),
        }
    }

    /// Header actions are returned rather than applied so the tree keeps its
    /// shape for the whole walk.
    pub(crate) fn finish(self) -> (FrameLayout, Vec<(NodeId, HeaderAction)>) {
        (self.layout, self.actions)
    }

    pub(crate) fn panel<S: Surface>(&mut self, id: NodeId, surface: &mut S)
    where
        C: ContentProvider<S>,
    {
        let Some(node) = self.tree.node(id) else {
            return;
        };
        let (kind, name, first) = (node.kind(), node.name(), node.child(Slot::First));
        match kind {
            PanelKind::Full => {
                if let Some(child) = first {
                    self.panel(child, surface);
                }
            }
            PanelKind::Leaf { mode } => self.leaf(id, name, mode, surface),
            PanelKind::Split { axis, .. } => self.split(id, name, axis, surface),
        }
    }

    fn leaf<S: Surface>(
        &mut self,
        id: NodeId,
        name: PanelName,
        mode: Option<ContentMode>,
        surface: &mut S,
    )    where
        C: ContentProvider<S>,
    {
        self.layout.leaves.push((name, surface.available()));
        let header = surface.reserve(self.metrics.header_height, Axis::Y);
        if let Some(action) = surface.header(header, name, mode) {
            self.actions.push((id, action));
        }
        if let Some(mode) = mode {
            self.content.render(mode, surface);
        }
    }

    fn split<S: Surface>(&mut self, id: NodeId, name: PanelName, axis: SplitAxis, surface: &mut S)
    where
        C: ContentProvider<S>,
    {
        let along = axis.along();
        let gutter = match axis {
            SplitAxis::Horizontal => self.metrics.horizontal_gutter,
            SplitAxis::Vertical => self.metrics.vertical_gutter,
        }
        .max(1);
        let size = self.resolve_size(id, surface.available().extent(along), gutter);
        let first = self.tree.child(id, Slot::First);
        let second = self.tree.child(id, Slot::Second);

        let first_rect = surface.reserve(i32::try_from(size).unwrap_or(i32::MAX), along);
        self.child_region(first, first_rect, surface);

        let grab = surface
            .reserve(gutter, along)
            .inflate(self.metrics.grab_margin, along);
        self.layout.gutters.push((name, grab));
        let gesture = surface.drag(grab);
        self.track_resize(id, gesture, along);

        let second_rect = surface.reserve(0, along);
        self.child_region(second, second_rect, surface);
    }

    fn child_region<S: Surface>(&mut self, child: Option<NodeId>, rect: Rect, surface: &mut S)
    where
        C: ContentProvider<S>,
    {
        let Some((child, node)) = child.and_then(|c| self.tree.node(c).map(|n| (c, n))) else {
            return;
        };
        // Splits stay borderless; nested leaves draw the visible edges.
        let (name, border) = (node.name(), !node.kind().is_internal());
        surface.child(name, rect, border, &mut |sub| self.panel(child, sub));
    }

    /// Size of the split's first child, resolving `Auto` to half of what is
    /// available the first time round.
    fn resolve_size(&mut self, id: NodeId, available: i32, gutter: i32) -> u32 {
        let min = self.metrics.min_split_size.max(1);
        let Some(PanelNode {
            kind: PanelKind::Split { size, .. },
            ..
        }) = self.tree.node_mut(id)
        else {
            return min;
        };
        match *size {
            SplitSize::Fixed(n) => n,
            SplitSize::Auto => {
                let half = u32::try_from((available - gutter) / 2).unwrap_or(0);
                let resolved = half.max(min);
                *size = SplitSize::Fixed(resolved);
                tracing::trace!(size = resolved, "resolved split size");
                resolved
            }
        }
    }

    fn track_resize(&mut self, id: NodeId, gesture: DragGesture, along: Axis) {
        let min = self.metrics.min_split_size.max(1);
        let Some(PanelNode {
            kind: PanelKind::Split { size, resizing, .. },
            ..
        }) = self.tree.node_mut(id)
        else {
            return;
        };

        if gesture.started {
            *resizing = true;
        }
        if !*resizing {
            return;
        }
        if !gesture.active {
            *resizing = false;
            return;
        }
        let next = i64::from(size.raw()) + i64::from(gesture.delta(along));
        let next = next.clamp(i64::from(min), i64::from(u32::MAX));
        *size = SplitSize::Fixed(next as u32);
    }
}
