// ABOUTME: Compact prefix grammar for persisted panel layouts.
// ABOUTME: Parses descriptions like `0|150_0CLD` into a PanelTree and back.
//
// Grammar, one production per leading byte:
//   '0' <panel>                    full root
//   '_' <digits> <panel> <panel>   horizontal split, first band `digits` high
//   '|' <digits> <panel> <panel>   vertical split, first column `digits` wide
//   <byte>                         leaf showing ContentMode::from_code(byte)

use crate::content::ContentMode;
use crate::tree::{
    InvariantViolation, NodeId, PanelKind, PanelName, PanelNode, PanelTree, Slot, SplitAxis,
    SplitSize, MAX_DEPTH,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("layout description ended at byte {offset}, expected {expected}")]
    UnexpectedEnd {
        offset: usize,
        expected: &'static str,
    },

    #[error("layout description nests deeper than {} panels at byte {offset}", MAX_DEPTH)]
    TooDeep { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    #[error("leaf panel {panel} has no content mode with a description code")]
    UnmappedContent { panel: PanelName },

    #[error("layout tree is malformed: {0}")]
    Malformed(#[from] InvariantViolation),
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    tree: PanelTree,
}

impl Parser<'_> {
    fn next(&mut self, expected: &'static str) -> Result<u8, ParseError> {
        let byte = self
            .input
            .get(self.pos)
            .copied()
            .ok_or(ParseError::UnexpectedEnd {
                offset: self.pos,
                expected,
            })?;
        self.pos += 1;
        Ok(byte)
    }

    fn digits(&mut self) -> SplitSize {
        let start = self.pos;
        while self.input.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        let value = self.input[start..self.pos].iter().fold(0u32, |acc, d| {
            acc.saturating_mul(10).saturating_add(u32::from(d - b'0'))
        });
        SplitSize::from_raw(value)
    }

    /// Parse the panel that will sit `depth` levels below the root
    fn panel(
        &mut self,
        parent: NodeId,
        depth: usize,
        expected: &'static str,
    ) -> Result<NodeId, ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep { offset: self.pos });
        }
        let tag = loop {
            // Only the root may be full; a nested marker just wraps its panel.
            match self.next(expected)? {
                b'0' => continue,
                tag => break tag,
            }
        };
        match tag {
            tag @ (b'_' | b'|') => {
                let axis = if tag == b'_' {
                    SplitAxis::Horizontal
                } else {
                    SplitAxis::Vertical
                };
                let size = self.digits();
                let split = self.tree.alloc(PanelKind::split(axis, size), Some(parent));
                let first = self.panel(split, depth + 1, "first panel of split")?;
                self.tree.set_child(split, Slot::First, first);
                let second = self.panel(split, depth + 1, "second panel of split")?;
                self.tree.set_child(split, Slot::Second, second);
                Ok(split)
            }
            code => {
                let mode = ContentMode::from_code(code);
                if mode.is_none() {
                    tracing::debug!(
                        code = %char::from(code),
                        "unknown content code in layout description"
                    );
                }
                Ok(self.tree.alloc(PanelKind::Leaf { mode }, Some(parent)))
            }
        }
    }
}

/// Parse a layout description. Bytes after the root panel are ignored.
pub fn parse(description: &str) -> Result<PanelTree, ParseError> {
    let mut parser = Parser {
        input: description.as_bytes(),
        pos: 0,
        tree: PanelTree::bare(),
    };
    let root = parser.tree.root();

    if parser.input.first() == Some(&b'0') {
        parser.pos = 1;
    }
    let child = parser.panel(root, 1, "root panel")?;
    parser.tree.set_child(root, Slot::First, child);

    if parser.pos < parser.input.len() {
        tracing::warn!(
            trailing_bytes = parser.input.len() - parser.pos,
            "ignoring trailing bytes after layout description"
        );
    }
    debug_assert_eq!(parser.tree.check_invariants(), Ok(()));
    Ok(parser.tree)
}

/// Emit the description of `tree`, the inverse of [`parse`]
pub fn serialize(tree: &PanelTree) -> Result<String, SerializeError> {
    let root = tree
        .node(tree.root())
        .ok_or(InvariantViolation::RootNotFull)?;
    let mut out = String::new();
    write_panel(tree, root, &mut out)?;
    Ok(out)
}

fn write_panel(
    tree: &PanelTree,
    node: &PanelNode,
    out: &mut String,
) -> Result<(), SerializeError> {
    match node.kind() {
        PanelKind::Full => {
            out.push('0');
            write_child(tree, node, Slot::First, out)
        }
        PanelKind::Split { axis, size, .. } => {
            out.push(char::from(axis.code()));
            out.push_str(&size.raw().to_string());
            write_child(tree, node, Slot::First, out)?;
            write_child(tree, node, Slot::Second, out)
        }
        PanelKind::Leaf { mode } => {
            let mode = mode.ok_or(SerializeError::UnmappedContent { panel: node.name() })?;
            out.push(char::from(mode.code()));
            Ok(())
        }
    }
}

fn write_child(
    tree: &PanelTree,
    node: &PanelNode,
    slot: Slot,
    out: &mut String,
) -> Result<(), SerializeError> {
    let child = node
        .child(slot)
        .and_then(|id| tree.node(id))
        .ok_or(InvariantViolation::MissingChild {
            panel: node.name(),
            slot: slot.index(),
        })?;
    write_panel(tree, child, out)
}

impl PanelTree {
    /// Layout description of this tree, see [`serialize`]
    pub fn describe(&self) -> Result<String, SerializeError> {
        serialize(self)
    }
}

impl std::str::FromStr for PanelTree {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
