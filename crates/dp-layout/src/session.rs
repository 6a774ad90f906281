// ABOUTME: Layout session owning the panel tree for the lifetime of the UI.
// ABOUTME: Entry point for frames and for split/close/mode edits.

use dp_core::{LayoutMetrics, LayoutSettings};

use crate::content::ContentMode;
use crate::coordinator::{ContentProvider, Coordinator, FrameLayout, HeaderAction, Surface};
use crate::grammar::{self, ParseError, SerializeError};
use crate::tree::{NodeId, PanelName, PanelTree, SplitAxis};

/// The live layout. Created at startup and passed by reference into the
/// frame loop and any edit handlers.
#[derive(Debug, Clone)]
pub struct LayoutSession {
    tree: PanelTree,
    metrics: LayoutMetrics,
}

impl LayoutSession {
    /// Single console panel
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self {
            tree: PanelTree::default(),
            metrics,
        }
    }

    pub fn from_description(description: &str, metrics: LayoutMetrics) -> Result<Self, ParseError> {
        let tree = grammar::parse(description)?;
        tracing::info!(description, panels = tree.leaf_count(), "loaded layout");
        Ok(Self { tree, metrics })
    }

    pub fn from_settings(settings: &LayoutSettings) -> Result<Self, ParseError> {
        Self::from_description(&settings.description, settings.metrics)
    }

    pub fn tree(&self) -> &PanelTree {
        &self.tree
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn describe(&self) -> Result<String, SerializeError> {
        self.tree.describe()
    }

    pub fn find(&self, name: PanelName) -> Option<NodeId> {
        self.tree.find_by_name(name)
    }

    pub fn split(&mut self, id: NodeId, axis: SplitAxis) -> Option<NodeId> {
        self.tree.split(id, axis)
    }

    pub fn close(&mut self, id: NodeId) -> bool {
        self.tree.close(id)
    }

    pub fn set_content_mode(&mut self, id: NodeId, mode: ContentMode) -> bool {
        self.tree.set_content_mode(id, mode)
    }

    /// Apply something picked in a leaf header. Returns whether the tree changed.
    pub fn apply(&mut self, id: NodeId, action: HeaderAction) -> bool {
        match action {
            HeaderAction::Split(axis) => self.split(id, axis).is_some(),
            HeaderAction::Close => self.close(id),
            HeaderAction::SelectMode(mode) => self.set_content_mode(id, mode),
        }
    }

    /// Lay out and draw one frame, then apply the header actions it produced
    pub fn frame<S, C>(&mut self, surface: &mut S, content: &mut C) -> FrameLayout
    where
        S: Surface,
        C: ContentProvider<S>,
    {
        let root = self.tree.root();
        let mut coordinator = Coordinator::new(&mut self.tree, &self.metrics, content);
        coordinator.panel(root, surface);
        let (layout, actions) = coordinator.finish();

        for (id, action) in actions {
            if !self.apply(id, action) {
                tracing::debug!(?action, "header action rejected");
            }
        }
        layout
    }
}

impl Default for LayoutSession {
    fn default() -> Self {
        Self::new(LayoutMetrics::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::tests::{Recorder, ScriptedSurface};

    #[test]
    fn default_session_is_single_console() {
        let session = LayoutSession::default();
        assert_eq!(session.describe().unwrap(), "0C");
    }

    #[test]
    fn from_settings_uses_description() {
        let settings = LayoutSettings {
            description: "0_200CL".to_string(),
            ..Default::default()
        };
        let session = LayoutSession::from_settings(&settings).unwrap();
        assert_eq!(session.tree().leaf_count(), 2);
        assert_eq!(session.describe().unwrap(), "0_200CL");
    }

    #[test]
    fn bad_description_is_reported() {
        let err = LayoutSession::from_description("0_10", LayoutMetrics::default()).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd { offset: 4, .. }));
    }

    #[test]
    fn header_split_applies_after_frame() {
        let mut session = LayoutSession::default();
        let leaf = session.tree().leaves()[0];
        let name = session.tree().name(leaf).unwrap();

        let mut surface = ScriptedSurface::new(200, 100);
        surface
            .header_actions
            .insert(name, HeaderAction::Split(SplitAxis::Vertical));
        let layout = session.frame(&mut surface, &mut Recorder::default());

        // Drawn before the split took effect
        assert_eq!(layout.leaves.len(), 1);
        assert_eq!(session.describe().unwrap(), "0|0CC");

        surface.reset(200, 100);
        let layout = session.frame(&mut surface, &mut Recorder::default());
        assert_eq!(layout.leaves.len(), 2);
        assert_eq!(session.describe().unwrap(), "0|99CC");
    }

    #[test]
    fn header_close_and_mode_actions() {
        let mut session =
            LayoutSession::from_description("0_50CL", LayoutMetrics::default()).unwrap();
        let leaves = session.tree().leaves();
        let console = session.tree().name(leaves[0]).unwrap();
        let listing = session.tree().name(leaves[1]).unwrap();

        let mut surface = ScriptedSurface::new(200, 100);
        surface.header_actions.insert(console, HeaderAction::Close);
        surface
            .header_actions
            .insert(listing, HeaderAction::SelectMode(ContentMode::Registers));
        session.frame(&mut surface, &mut Recorder::default());

        assert_eq!(session.describe().unwrap(), "0r");
        assert_eq!(session.find(listing), Some(leaves[1]));
        assert_eq!(session.find(console), None);
    }

    #[test]
    fn closing_last_panel_from_header_is_ignored() {
        let mut session = LayoutSession::default();
        let name = session.tree().name(session.tree().leaves()[0]).unwrap();
        let mut surface = ScriptedSurface::new(200, 100);
        surface.header_actions.insert(name, HeaderAction::Close);
        session.frame(&mut surface, &mut Recorder::default());
        assert_eq!(session.describe().unwrap(), "0C");
    }
}
