//! The retained node tree.
//!
//! Nodes live in one growable array indexed by [`NodeId`]; children are
//! linked intrusively through `first_child`/`next_sibling` indices rather
//! than owned child vectors, so a tree is built in a single append pass
//! without pre-counting children.
//!
//! Index order carries structure: a node is always appended after its
//! parent, so walking ids upward (`ids`) visits parents before children
//! (pre-order) and walking them downward (`ids_rev`) visits children
//! before parents (post-order). Ids are stable within one tree
//! generation and invalid after [`Tree::clear`].

mod build;
mod desc;

pub use desc::{DescKind, FlexAttrs, NodeDesc};

use std::sync::Arc;

use smallvec::SmallVec;

use crate::arena::{Span, StrArena};
use crate::text::Font;
use crate::types::{Color, Dim, Justify, Pos};

// =============================================================================
// NodeId
// =============================================================================

/// Index of a node within its tree generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(u32);

impl NodeId {
    /// The "no node" sentinel terminating sibling chains.
    pub const NULL: Self = Self(u32::MAX);
    /// The root: a built tree always has it at index 0.
    pub const ROOT: Self = Self(0);

    pub const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

// =============================================================================
// Node variants
// =============================================================================

/// Per-container line bookkeeping: children per line, recomputed by every
/// layout pass. Containers rarely wrap into more than a handful of lines.
pub type LineCounts = SmallVec<[u32; 8]>;

/// Flex container: lays children along the main axis, wrapping into lines.
#[derive(Debug, Default)]
pub struct Container {
    pub main_justify: Justify,
    pub cross_justify: Justify,
    /// Never wrap; all children share one line even if they overflow.
    pub single_line: bool,
    pub background: Option<Color>,
    /// Written by layout pass 2, consumed by passes 3 and 4.
    pub line_counts: LineCounts,
}

/// Solid rectangle with an intrinsic size.
#[derive(Debug, Clone, Copy)]
pub struct RectNode {
    pub fill: Option<Color>,
    pub size: Dim,
}

/// One wrapped display line of a text node. `text` points into the layout
/// engine's scratch arena and is replaced on every layout pass.
#[derive(Debug, Clone, Copy)]
pub struct TextLine {
    pub text: Span,
    pub coord: Pos,
}

/// Text run in a single font.
pub struct TextNode {
    pub color: Color,
    /// Content, owned by the tree's string arena.
    pub content: Span,
    /// Backend-owned font, referenced not owned; released on drop.
    pub font: Arc<dyn Font>,
    /// Display lines computed by the most recent layout pass.
    pub lines: Vec<TextLine>,
}

/// The node discriminant with per-kind payloads.
pub enum NodeKind {
    Container(Container),
    Rect(RectNode),
    Text(TextNode),
}

/// A layout node: kind-specific payload, flex attributes, and the four
/// geometry fields the layout passes fill in.
pub struct Node {
    pub kind: NodeKind,
    pub grow: u32,
    pub shrink: u32,
    /// This node's own cross-axis alignment within its line.
    pub cross_justify: Justify,

    // Geometry, written by the four layout passes in order.
    pub avail: Dim,
    pub hypoth: Dim,
    pub target: Dim,
    pub coord: Pos,

    // Intrusive child links.
    pub first_child: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            grow: 0,
            shrink: 1,
            cross_justify: Justify::Start,
            avail: Dim::ZERO,
            hypoth: Dim::ZERO,
            target: Dim::ZERO,
            coord: Pos::ZERO,
            first_child: NodeId::NULL,
            next_sibling: NodeId::NULL,
        }
    }
}

// =============================================================================
// Tree
// =============================================================================

/// An arena-backed tree of layout nodes.
///
/// Trees are built wholesale from a [`NodeDesc`] and replaced wholesale;
/// there is no incremental mutation. [`clear`](Tree::clear) drops nodes
/// bottom-up — releasing font references and display-line storage — and
/// resets the string arena.
#[derive(Default)]
pub struct Tree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) strings: StrArena,
}

impl Tree {
    /// An empty tree; [`Tree::build`] is the way to populate one.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            strings: StrArena::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn root(&self) -> &Node {
        self.node(NodeId::ROOT)
    }

    /// Resolve a span held by one of this tree's text nodes.
    pub fn text(&self, span: Span) -> &str {
        self.strings.get(span)
    }

    /// Drop all nodes (children before parents) and invalidate all spans.
    pub fn clear(&mut self) {
        // Vec drops back-to-front, which is exactly the bottom-up order:
        // font Arcs and line vectors of children go before their parents.
        self.nodes.clear();
        self.strings.reset();
    }

    /// Pre-order ids: every parent before its children.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + use<> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Post-order ids: every child before its parent.
    pub fn ids_rev(&self) -> impl Iterator<Item = NodeId> + use<> {
        self.ids().rev()
    }

    /// The ids of `id`'s children, in sibling-chain order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.node(id).first_child,
        }
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    pub(crate) fn append(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }
}

/// Iterator over a node's children via the intrusive sibling chain.
pub struct Children<'t> {
    tree: &'t Tree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.next.is_null() {
            return None;
        }
        let id = self.next;
        self.next = self.tree.node(id).next_sibling;
        Some(id)
    }
}
