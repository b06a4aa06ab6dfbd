//! Node descriptions.
//!
//! A [`NodeDesc`] is the plain-data shape a scene is described in, the
//! output of whatever front end the embedder uses (a markup parser, a
//! builder DSL, hand-written structs in tests). [`Tree::build`] consumes
//! one and produces a linked, font-resolved tree.
//!
//! [`Tree::build`]: super::Tree::build

use crate::types::{Color, Dim, Justify};

/// Flex attributes a child carries into its parent's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexAttrs {
    /// Share of positive leftover space. 0 = don't grow.
    pub grow: u32,
    /// Overflow shrink weight (scaled by the child's main size).
    /// 0 = never shrink.
    pub shrink: u32,
    /// Cross-axis alignment of this child within its line.
    pub cross_justify: Justify,
}

impl Default for FlexAttrs {
    fn default() -> Self {
        Self {
            grow: 0,
            shrink: 1,
            cross_justify: Justify::Start,
        }
    }
}

/// Kind-specific description payload.
#[derive(Debug, Clone)]
pub enum DescKind {
    Container {
        children: Vec<NodeDesc>,
        main_justify: Justify,
        cross_justify: Justify,
        single_line: bool,
        background: Option<Color>,
    },
    Rect {
        fill: Option<Color>,
        size: Dim,
    },
    Text {
        color: Color,
        content: String,
        /// Font descriptor resolved against the scene's font source.
        font: String,
    },
}

/// Description of one node and its subtree.
#[derive(Debug, Clone)]
pub struct NodeDesc {
    pub kind: DescKind,
    pub flex: FlexAttrs,
}

impl NodeDesc {
    /// A container with default justification, wrapping enabled and no
    /// background.
    pub fn container(children: Vec<NodeDesc>) -> Self {
        Self {
            kind: DescKind::Container {
                children,
                main_justify: Justify::Start,
                cross_justify: Justify::Start,
                single_line: false,
                background: None,
            },
            flex: FlexAttrs::default(),
        }
    }

    pub fn rect(fill: Option<Color>, size: Dim) -> Self {
        Self {
            kind: DescKind::Rect { fill, size },
            flex: FlexAttrs::default(),
        }
    }

    pub fn text(content: impl Into<String>, font: impl Into<String>) -> Self {
        Self {
            kind: DescKind::Text {
                color: Color::BLACK,
                content: content.into(),
                font: font.into(),
            },
            flex: FlexAttrs::default(),
        }
    }

    // Chainable attribute setters, container-only ones ignore other kinds.

    pub fn grow(mut self, grow: u32) -> Self {
        self.flex.grow = grow;
        self
    }

    pub fn shrink(mut self, shrink: u32) -> Self {
        self.flex.shrink = shrink;
        self
    }

    pub fn cross_justify(mut self, justify: Justify) -> Self {
        self.flex.cross_justify = justify;
        self
    }

    pub fn main_justify(mut self, justify: Justify) -> Self {
        if let DescKind::Container { main_justify, .. } = &mut self.kind {
            *main_justify = justify;
        }
        self
    }

    pub fn lines_justify(mut self, justify: Justify) -> Self {
        if let DescKind::Container { cross_justify, .. } = &mut self.kind {
            *cross_justify = justify;
        }
        self
    }

    pub fn single_line(mut self, single: bool) -> Self {
        if let DescKind::Container { single_line, .. } = &mut self.kind {
            *single_line = single;
        }
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        if let DescKind::Container { background, .. } = &mut self.kind {
            *background = Some(color);
        }
        self
    }

    pub fn color(mut self, c: Color) -> Self {
        if let DescKind::Text { color, .. } = &mut self.kind {
            *color = c;
        }
        self
    }
}
