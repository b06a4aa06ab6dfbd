//! The flex layout engine.
//!
//! Four full-tree passes, run in order by [`LayoutEngine::layout`]:
//!
//! 1. **Propagate available size** (pre-order): the root gets the
//!    caller-supplied dimension; a container copies its available size to
//!    each child unmodified.
//! 2. **Compute hypothetical size** (post-order): a node's natural size
//!    before flex. Rectangles use their intrinsic size; text wraps at the
//!    available width and stacks its lines; containers partition children
//!    into lines (greedy, or one line when `single_line` is set) and
//!    aggregate the line extents.
//! 3. **Resolve target size** (pre-order): leftover main-axis space per
//!    line is distributed to children — proportionally to `grow` when
//!    positive, proportionally to `shrink × hypothetical main size` when
//!    negative, so larger children give up more. A factor of 0 opts out
//!    entirely and can never divide by zero.
//! 4. **Place coordinates** (pre-order): justification offsets across
//!    lines and along each line, each child's own cross alignment within
//!    its line, and final wrapped display lines for text nodes.
//!
//! Line membership is decided once, in pass 2, from hypothetical sizes;
//! a child that later shrinks is not repacked onto an earlier line. That
//! is a documented limitation of the greedy packing.

use smallvec::{SmallVec, smallvec};

use crate::arena::StrArena;
use crate::text::{TextElem, WordWrap};
use crate::tree::{LineCounts, NodeId, NodeKind, TextLine, Tree};
use crate::types::{Dim, Justify, Length, Pos};

// =============================================================================
// Justification
// =============================================================================

/// Resolve a justification policy over `space` leftover units and
/// `n_items` items: bump `start` by the leading offset and return the
/// padding inserted after each item.
fn justify_padding(justify: Justify, space: Length, n_items: usize, start: &mut Length) -> Length {
    let n = n_items as Length;
    let (pad, offset) = match justify {
        Justify::Start => (0.0, 0.0),
        Justify::End => (0.0, space),
        Justify::Center => (0.0, space / 2.0),
        Justify::Evenly => {
            let pad = space / (n + 1.0);
            (pad, pad)
        }
        Justify::Around => {
            let pad = if n_items > 0 { space / n } else { 0.0 };
            (pad, pad / 2.0)
        }
        Justify::Between => {
            let pad = if n_items > 1 { space / (n - 1.0) } else { 0.0 };
            (pad, 0.0)
        }
    };
    *start += offset;
    pad
}

// =============================================================================
// Line walking
// =============================================================================

/// Cursor tracking which line the next child in flow order belongs to,
/// against a container's `line_counts`.
struct LineWalk {
    li: usize,
    filled: u32,
}

impl LineWalk {
    fn new() -> Self {
        Self { li: 0, filled: 0 }
    }

    /// Line index of the next child.
    fn next(&mut self, counts: &[u32]) -> usize {
        if self.filled >= counts[self.li] {
            self.li += 1;
            self.filled = 1;
        } else {
            self.filled += 1;
        }
        self.li
    }
}

// =============================================================================
// Engine
// =============================================================================

/// The layout engine: the root dimension plus scratch storage reused
/// across runs.
#[derive(Default)]
pub struct LayoutEngine {
    /// Available (and target) size of the root node.
    pub root_dim: Dim,
    /// Holds wrapped display-line text; reset at the start of every run.
    scratch: StrArena,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            root_dim: Dim::ZERO,
            scratch: StrArena::new(),
        }
    }

    /// The arena the current generation of display lines points into.
    pub fn scratch(&self) -> &StrArena {
        &self.scratch
    }

    /// Run all four passes over the tree.
    pub fn layout(&mut self, tree: &mut Tree) {
        if tree.is_empty() {
            return;
        }
        self.scratch.reset();

        tree.node_mut(NodeId::ROOT).avail = self.root_dim;
        for id in tree.ids() {
            propagate_avail(tree, id);
        }

        for id in tree.ids_rev() {
            compute_hypoth(tree, id);
        }

        tree.node_mut(NodeId::ROOT).target = self.root_dim;
        for id in tree.ids() {
            resolve_target(tree, id);
        }

        tree.node_mut(NodeId::ROOT).coord = Pos::ZERO;
        for id in tree.ids() {
            self.place(tree, id);
        }

        log::debug!(
            "layout pass: {} nodes at {:.0}x{:.0}",
            tree.len(),
            self.root_dim.w,
            self.root_dim.h
        );
    }

    // -------------------------------------------------------------------------
    // Pass 4: placement
    // -------------------------------------------------------------------------

    fn place(&mut self, tree: &mut Tree, id: NodeId) {
        match &tree.node(id).kind {
            NodeKind::Container(_) => place_container(tree, id),
            NodeKind::Rect(_) => {}
            NodeKind::Text(_) => self.place_text(tree, id),
        }
    }

    /// Re-wrap at the final target width and lay the lines out top to
    /// bottom, `line_spacing` apart. The previous generation of lines was
    /// invalidated when the scratch arena was reset.
    fn place_text(&mut self, tree: &mut Tree, id: NodeId) {
        let Tree { nodes, strings } = tree;
        let node = &mut nodes[id.index()];
        let origin = node.coord;
        let width = node.target.w;
        let NodeKind::Text(text_node) = &mut node.kind else {
            return;
        };

        let font = text_node.font.clone();
        let spacing = font.measure("").line_spacing;
        let content = strings.get(text_node.content);
        text_node.lines.clear();

        let mut coord = origin;
        let mut wrap = WordWrap::new(content, width, |line: &str| font.measure(line).width);
        loop {
            match wrap.next_elem() {
                TextElem::Word => {}
                elem @ (TextElem::EndOfLine | TextElem::End) => {
                    text_node.lines.push(TextLine {
                        text: self.scratch.alloc(wrap.line()),
                        coord,
                    });
                    coord.y += spacing;
                    if elem == TextElem::End {
                        break;
                    }
                }
            }
        }
    }
}

// =============================================================================
// Pass 1: available size
// =============================================================================

fn propagate_avail(tree: &mut Tree, id: NodeId) {
    if !matches!(tree.node(id).kind, NodeKind::Container(_)) {
        return;
    }
    let avail = tree.node(id).avail;
    let mut child = tree.node(id).first_child;
    while !child.is_null() {
        let c = tree.node_mut(child);
        c.avail = avail;
        child = c.next_sibling;
    }
}

// =============================================================================
// Pass 2: hypothetical size
// =============================================================================

fn compute_hypoth(tree: &mut Tree, id: NodeId) {
    match &tree.node(id).kind {
        NodeKind::Container(_) => hypoth_container(tree, id),
        NodeKind::Rect(r) => {
            let size = r.size;
            tree.node_mut(id).hypoth = size;
        }
        NodeKind::Text(_) => hypoth_text(tree, id),
    }
}

/// Partition children into lines: greedy packing against the available
/// main size. A new line starts when the next child would overflow, but a
/// line always holds at least one child — children are never split.
fn line_counts(tree: &Tree, id: NodeId) -> LineCounts {
    let node = tree.node(id);
    let NodeKind::Container(c) = &node.kind else {
        unreachable!("line_counts on a non-container");
    };
    if c.single_line {
        return smallvec![tree.child_count(id) as u32];
    }

    let avail_main = node.avail.w;
    let mut counts: LineCounts = smallvec![0];
    let mut line_size = 0.0;
    for child in tree.children(id) {
        let child_size = tree.node(child).hypoth.w;
        if *counts.last().unwrap() > 0 && line_size + child_size > avail_main {
            counts.push(0);
            line_size = child_size;
        } else {
            line_size += child_size;
        }
        *counts.last_mut().unwrap() += 1;
    }
    if counts.last() == Some(&0) {
        counts.pop(); // no children at all
    }
    counts
}

fn hypoth_container(tree: &mut Tree, id: NodeId) {
    let counts = line_counts(tree, id);
    let avail = tree.node(id).avail;

    // Main: the widest line. Cross: the lines' max-heights, stacked.
    let mut main: Length = 0.0;
    let mut cross: Length = 0.0;
    let mut line = Dim::ZERO;
    let mut walk = LineWalk::new();
    let mut prev_li = 0;
    let mut visited = false;
    for child in tree.children(id) {
        let li = walk.next(&counts);
        if li != prev_li {
            cross += line.h;
            main = main.max(line.w);
            line = Dim::ZERO;
            prev_li = li;
        }
        let hypoth = tree.node(child).hypoth;
        line.w += hypoth.w;
        line.h = line.h.max(hypoth.h);
        visited = true;
    }
    if visited {
        cross += line.h;
        main = main.max(line.w);
    }

    let node = tree.node_mut(id);
    node.hypoth = Dim::new(main.min(avail.w), cross.min(avail.h));
    let NodeKind::Container(c) = &mut node.kind else {
        unreachable!();
    };
    c.line_counts = counts;
}

/// Wrap at the available width to count lines and find the widest one.
/// Height is `line_height` for the first line plus `line_spacing` per
/// additional line.
fn hypoth_text(tree: &mut Tree, id: NodeId) {
    let node = tree.node(id);
    let avail = node.avail;
    let NodeKind::Text(text_node) = &node.kind else {
        return;
    };
    let font = text_node.font.clone();
    let content = tree.strings.get(text_node.content);

    let mut n_lines = 0usize;
    let mut max_width: Length = 0.0;
    // Assigned before the loop can exit: End always measures a final
    // line, even for empty text.
    let mut metrics;
    let mut wrap = WordWrap::new(content, avail.w, |line: &str| font.measure(line).width);
    loop {
        match wrap.next_elem() {
            TextElem::Word => {}
            elem @ (TextElem::EndOfLine | TextElem::End) => {
                metrics = font.measure(wrap.line());
                n_lines += 1;
                max_width = max_width.max(metrics.width);
                if elem == TextElem::End {
                    break;
                }
            }
        }
    }

    let height = metrics.line_height + metrics.line_spacing * (n_lines - 1) as Length;
    tree.node_mut(id).hypoth = Dim::new(max_width.min(avail.w), height.min(avail.h));
}

// =============================================================================
// Pass 3: target size
// =============================================================================

#[derive(Clone, Copy)]
struct LineCalc {
    factor_sum: Length,
    cross_size: Length,
    free_space: Length,
}

/// A child's flex weight, on the basis the sign of the leftover selects:
/// `grow` when space is free, `shrink × hypothetical main size` when the
/// line overflows (so larger children shrink more).
fn flex_factor(tree: &Tree, child: NodeId, overflow: bool) -> Length {
    let node = tree.node(child);
    if overflow {
        node.shrink as Length * node.hypoth.w
    } else {
        node.grow as Length
    }
}

fn resolve_target(tree: &mut Tree, id: NodeId) {
    let NodeKind::Container(c) = &tree.node(id).kind else {
        // Rect and text targets pass through from the parent's
        // distribution (or from the root dimension, for the root).
        return;
    };
    let counts = c.line_counts.clone();
    let target_main = tree.node(id).target.w;

    let mut lines: SmallVec<[LineCalc; 8]> = smallvec![
        LineCalc {
            factor_sum: 0.0,
            cross_size: 0.0,
            free_space: target_main,
        };
        counts.len()
    ];

    let mut walk = LineWalk::new();
    for child in tree.children(id) {
        let li = walk.next(&counts);
        let hypoth = tree.node(child).hypoth;
        lines[li].cross_size = lines[li].cross_size.max(hypoth.h);
        lines[li].free_space -= hypoth.w;
    }

    let mut walk = LineWalk::new();
    for child in tree.children(id) {
        let li = walk.next(&counts);
        let overflow = lines[li].free_space < 0.0;
        lines[li].factor_sum += flex_factor(tree, child, overflow);
    }

    let mut walk = LineWalk::new();
    let mut child = tree.node(id).first_child;
    while !child.is_null() {
        let li = walk.next(&counts);
        let overflow = lines[li].free_space < 0.0;
        let factor = flex_factor(tree, child, overflow);
        let flex = if factor > 0.0 {
            lines[li].free_space * factor / lines[li].factor_sum
        } else {
            0.0
        };
        let hypoth_main = tree.node(child).hypoth.w;
        let node = tree.node_mut(child);
        node.target = Dim::new(hypoth_main + flex, lines[li].cross_size);
        child = node.next_sibling;
    }
}

// =============================================================================
// Pass 4: placement (containers)
// =============================================================================

#[derive(Clone, Copy)]
struct PlaceLine {
    flex_space: Length,
    cross_size: Length,
}

fn place_container(tree: &mut Tree, id: NodeId) {
    let NodeKind::Container(c) = &tree.node(id).kind else {
        unreachable!();
    };
    let counts = c.line_counts.clone();
    let main_justify = c.main_justify;
    let cross_justify = c.cross_justify;
    if counts.is_empty() {
        return; // no children, nothing to place
    }

    let target = tree.node(id).target;
    let origin = tree.node(id).coord;

    let mut lines: SmallVec<[PlaceLine; 8]> = smallvec![
        PlaceLine {
            flex_space: target.w,
            cross_size: 0.0,
        };
        counts.len()
    ];
    let mut walk = LineWalk::new();
    for child in tree.children(id) {
        let li = walk.next(&counts);
        let child_target = tree.node(child).target;
        lines[li].flex_space -= child_target.w;
        lines[li].cross_size = lines[li].cross_size.max(child_target.h);
    }

    let cross_flex: Length = target.h - lines.iter().map(|l| l.cross_size).sum::<Length>();
    let mut y = origin.y;
    let pad_y = justify_padding(cross_justify, cross_flex, counts.len(), &mut y);

    let mut x = origin.x;
    let mut pad_x = justify_padding(main_justify, lines[0].flex_space, counts[0] as usize, &mut x);

    let mut walk = LineWalk::new();
    let mut prev_li = 0;
    let mut child = tree.node(id).first_child;
    while !child.is_null() {
        let li = walk.next(&counts);
        if li != prev_li {
            y += lines[prev_li].cross_size + pad_y;
            prev_li = li;
            x = origin.x;
            pad_x = justify_padding(main_justify, lines[li].flex_space, counts[li] as usize, &mut x);
        }
        let node = tree.node_mut(child);
        node.coord = Pos::new(x, y);
        // The child's own cross alignment within its line's band.
        justify_padding(
            node.cross_justify,
            lines[li].cross_size - node.target.h,
            1,
            &mut node.coord.y,
        );
        x += node.target.w + pad_x;
        child = node.next_sibling;
    }
}
