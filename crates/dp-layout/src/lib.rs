// ABOUTME: Split-pane layout engine for the debugger front-end.
// ABOUTME: Panel tree, description grammar, split/close edits and per-frame layout.

mod content;
mod coordinator;
mod geometry;
mod grammar;
mod mutate;
mod session;
mod tree;

pub use content::ContentMode;
pub use coordinator::{ContentProvider, DragGesture, FrameLayout, HeaderAction, Surface};
pub use geometry::{Axis, Rect};
pub use grammar::{parse, serialize, ParseError, SerializeError};
pub use session::LayoutSession;
pub use tree::{
    InvariantViolation, NodeId, PanelKind, PanelName, PanelNode, PanelSnapshot, PanelTree, Slot,
    SplitAxis, SplitSize, MAX_DEPTH,
};
