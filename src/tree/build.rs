//! Tree construction from descriptions.
//!
//! Building is iterative: an explicit work stack drives the traversal, so
//! arbitrarily deep descriptions cannot overflow the call stack. Nodes
//! are appended in pre-order (a parent always gets a lower index than its
//! subtree) and linked through the intrusive first-child/next-sibling
//! chain with a per-parent last-child cursor.
//!
//! The whole build is atomic: it happens into a fresh local tree, and a
//! failure (an unloadable font) drops that tree and returns the error —
//! no tree visible to the rest of the system is ever left half-built.

use crate::error::Result;
use crate::text::FontSource;
use crate::tree::desc::{DescKind, NodeDesc};
use crate::tree::{Container, Node, NodeId, NodeKind, RectNode, TextNode, Tree};

impl Tree {
    /// Build a tree from a description, resolving fonts as it goes.
    pub fn build(desc: &NodeDesc, fonts: &dyn FontSource) -> Result<Tree> {
        let mut tree = Tree::new();
        // Last appended child of each node, for O(1) sibling linking.
        let mut last_child: Vec<NodeId> = Vec::new();
        let mut work: Vec<(&NodeDesc, NodeId)> = vec![(desc, NodeId::NULL)];

        while let Some((desc, parent)) = work.pop() {
            let kind = match &desc.kind {
                DescKind::Container {
                    main_justify,
                    cross_justify,
                    single_line,
                    background,
                    ..
                } => NodeKind::Container(Container {
                    main_justify: *main_justify,
                    cross_justify: *cross_justify,
                    single_line: *single_line,
                    background: *background,
                    line_counts: Default::default(),
                }),
                DescKind::Rect { fill, size } => NodeKind::Rect(RectNode {
                    fill: *fill,
                    size: *size,
                }),
                DescKind::Text {
                    color,
                    content,
                    font,
                } => NodeKind::Text(TextNode {
                    color: *color,
                    content: tree.strings.alloc(content),
                    font: fonts.load(font)?,
                    lines: Vec::new(),
                }),
            };

            let mut node = Node::new(kind);
            node.grow = desc.flex.grow;
            node.shrink = desc.flex.shrink;
            node.cross_justify = desc.flex.cross_justify;
            let id = tree.append(node);
            last_child.push(NodeId::NULL);

            if !parent.is_null() {
                let prev = last_child[parent.index()];
                if prev.is_null() {
                    tree.node_mut(parent).first_child = id;
                } else {
                    tree.node_mut(prev).next_sibling = id;
                }
                last_child[parent.index()] = id;
            }

            if let DescKind::Container { children, .. } = &desc.kind {
                // Reversed so the pop order matches description order,
                // keeping index assignment in pre-order.
                for child in children.iter().rev() {
                    work.push((child, id));
                }
            }
        }

        log::trace!("built tree with {} nodes", tree.len());
        Ok(tree)
    }
}
