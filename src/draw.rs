//! Draw-command lists.
//!
//! A [`DrawList`] is a flat, back-to-front snapshot of a laid-out tree:
//! the backend replays it top to bottom with no knowledge of the tree it
//! came from. Lists are self-contained — display-line text is copied into
//! the list's own arena — so a list stays valid after the tree mutates or
//! the engine runs another pass, and can be handed to another thread.

use std::sync::Arc;

use crate::arena::{Span, StrArena};
use crate::text::Font;
use crate::tree::{NodeKind, Tree};
use crate::types::{Color, Pos, Rect};

/// One backend drawing operation.
#[derive(Debug, Clone)]
pub enum DrawCmd {
    /// Fill `bounds` with `fill`; a `None` fill is still recorded so the
    /// backend sees every box (hit testing, debug overlays) but paints
    /// nothing.
    Rect { fill: Option<Color>, bounds: Rect },
    /// One display line of a text node.
    Text {
        color: Color,
        font: Arc<dyn Font>,
        text: Span,
        pos: Pos,
    },
}

/// A replayable list of draw commands over its own string storage.
#[derive(Debug, Default)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
    strings: StrArena,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cmds(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Text of a [`DrawCmd::Text`] command from this list.
    pub fn text(&self, span: Span) -> &str {
        self.strings.get(span)
    }

    /// Discard the previous frame and record the tree in paint order:
    /// pre-order, so a parent's background lands under its children.
    /// `lines` is the arena the tree's display-line spans point into.
    pub fn rebuild(&mut self, tree: &Tree, lines: &StrArena) {
        self.cmds.clear();
        self.strings.reset();

        for id in tree.ids() {
            let node = tree.node(id);
            match &node.kind {
                NodeKind::Container(c) => {
                    if let Some(background) = c.background {
                        self.cmds.push(DrawCmd::Rect {
                            fill: Some(background),
                            bounds: Rect::new(node.coord, node.target),
                        });
                    }
                }
                NodeKind::Rect(r) => {
                    // Intrinsic size, not the flexed target: a rectangle
                    // paints what it asked for and lets the container clip.
                    self.cmds.push(DrawCmd::Rect {
                        fill: r.fill,
                        bounds: Rect::new(node.coord, r.size),
                    });
                }
                NodeKind::Text(t) => {
                    for line in &t.lines {
                        self.cmds.push(DrawCmd::Text {
                            color: t.color,
                            font: t.font.clone(),
                            text: self.strings.alloc(lines.get(line.text)),
                            pos: line.coord,
                        });
                    }
                }
            }
        }

        log::trace!("draw list rebuilt: {} commands", self.cmds.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;
    use crate::text::MonoFonts;
    use crate::tree::NodeDesc;
    use crate::types::{Dim, Justify};

    fn draws(desc: &NodeDesc, dim: Dim) -> (DrawList, Tree, LayoutEngine) {
        let mut tree = Tree::build(desc, &MonoFonts).unwrap();
        let mut engine = LayoutEngine::new();
        engine.root_dim = dim;
        engine.layout(&mut tree);
        let mut list = DrawList::new();
        list.rebuild(&tree, engine.scratch());
        (list, tree, engine)
    }

    fn rect_bounds(cmd: &DrawCmd) -> Rect {
        match cmd {
            DrawCmd::Rect { bounds, .. } => *bounds,
            other => panic!("expected a rect command, got {other:?}"),
        }
    }

    #[test]
    fn single_rect_emits_one_command() {
        let desc = NodeDesc::container(vec![NodeDesc::rect(
            Some(Color::RED),
            Dim::new(60.0, 60.0),
        )]);
        let (list, ..) = draws(&desc, Dim::new(200.0, 200.0));
        assert_eq!(list.len(), 1);
        let bounds = rect_bounds(&list.cmds()[0]);
        assert_eq!(bounds, Rect::new(Pos::ZERO, Dim::new(60.0, 60.0)));
    }

    #[test]
    fn three_rects_keep_document_order() {
        let desc = NodeDesc::container(vec![
            NodeDesc::rect(Some(Color::RED), Dim::new(60.0, 60.0)),
            NodeDesc::rect(Some(Color::GREEN), Dim::new(20.0, 60.0)),
            NodeDesc::rect(Some(Color::BLUE), Dim::new(60.0, 60.0)),
        ])
        .main_justify(Justify::Between)
        .lines_justify(Justify::Center);
        let (list, ..) = draws(&desc, Dim::new(200.0, 200.0));
        assert_eq!(list.len(), 3);
        assert_eq!(rect_bounds(&list.cmds()[0]).origin, Pos::new(0.0, 70.0));
        assert_eq!(rect_bounds(&list.cmds()[1]).origin, Pos::new(90.0, 70.0));
        assert_eq!(rect_bounds(&list.cmds()[2]).origin, Pos::new(140.0, 70.0));
    }

    #[test]
    fn container_background_is_painted_first_and_stretched() {
        let desc = NodeDesc::container(vec![NodeDesc::rect(
            Some(Color::RED),
            Dim::new(60.0, 60.0),
        )])
        .background(Color::BLACK);
        let (list, ..) = draws(&desc, Dim::new(200.0, 200.0));
        assert_eq!(list.len(), 2);
        // Background covers the container's full target size.
        let bg = rect_bounds(&list.cmds()[0]);
        assert_eq!(bg, Rect::new(Pos::ZERO, Dim::new(200.0, 200.0)));
        match &list.cmds()[0] {
            DrawCmd::Rect { fill, .. } => assert_eq!(*fill, Some(Color::BLACK)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn nested_backgrounds_paint_outside_in() {
        let inner = NodeDesc::container(vec![]).background(Color::BLUE).grow(1);
        let desc = NodeDesc::container(vec![inner]).background(Color::BLACK);
        let (list, ..) = draws(&desc, Dim::new(200.0, 100.0));
        assert_eq!(list.len(), 2);
        match (&list.cmds()[0], &list.cmds()[1]) {
            (DrawCmd::Rect { fill: outer, .. }, DrawCmd::Rect { fill: inner, .. }) => {
                assert_eq!(*outer, Some(Color::BLACK));
                assert_eq!(*inner, Some(Color::BLUE));
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn fill_none_rect_is_still_recorded() {
        let desc = NodeDesc::container(vec![NodeDesc::rect(None, Dim::new(60.0, 60.0))]);
        let (list, ..) = draws(&desc, Dim::new(200.0, 200.0));
        assert_eq!(list.len(), 1);
        match &list.cmds()[0] {
            DrawCmd::Rect { fill, .. } => assert_eq!(*fill, None),
            _ => unreachable!(),
        }
    }

    #[test]
    fn text_emits_one_command_per_display_line() {
        let desc = NodeDesc::text("Hello, world", "size:10").color(Color::WHITE);
        let (list, ..) = draws(&desc, Dim::new(100.0, 100.0));
        assert_eq!(list.len(), 2);
        match (&list.cmds()[0], &list.cmds()[1]) {
            (
                DrawCmd::Text {
                    text: first,
                    pos: p0,
                    ..
                },
                DrawCmd::Text {
                    text: second,
                    pos: p1,
                    ..
                },
            ) => {
                assert_eq!(list.text(*first), "Hello,");
                assert_eq!(list.text(*second), "world");
                assert_eq!(*p0, Pos::new(0.0, 0.0));
                assert_eq!(*p1, Pos::new(0.0, 10.0));
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    /// A list must stay readable after the engine's scratch arena is
    /// recycled by a later pass.
    #[test]
    fn list_survives_a_relayout() {
        let desc = NodeDesc::text("Hello, world", "size:10");
        let (list, mut tree, mut engine) = draws(&desc, Dim::new(100.0, 100.0));
        engine.root_dim = Dim::new(40.0, 100.0);
        engine.layout(&mut tree);
        match &list.cmds()[0] {
            DrawCmd::Text { text, .. } => assert_eq!(list.text(*text), "Hello,"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn empty_tree_rebuilds_to_an_empty_list() {
        let tree = Tree::new();
        let engine = LayoutEngine::new();
        let mut list = DrawList::new();
        list.rebuild(&tree, engine.scratch());
        assert!(list.is_empty());
    }
}
