//! # flexscene
//!
//! A retained-mode scene engine: describe a tree of containers,
//! rectangles, and text; get back a flat list of draw commands laid out
//! by a flexbox-style pass, ready for any rendering backend.
//!
//! ## Architecture
//!
//! A scene tree is built once from a [`NodeDesc`] description and owned
//! whole — nodes live in one arena-style vector linked by child/sibling
//! indices, and node text lives in a string arena, so a tree moves
//! between threads as a single value. Layout is four passes over that
//! vector (available size down, natural size up, flexed size down,
//! coordinates down); the result is snapshotted into a self-contained
//! [`DrawList`].
//!
//! ```text
//! NodeDesc ──build──▶ Tree ──layout──▶ Tree (sized) ──rebuild──▶ DrawList ──▶ Backend
//! ```
//!
//! The pipelined [`Scene`] runs layout and rendering on worker threads
//! so a slow backend never blocks tree updates; [`SyncScene`] does the
//! same work inline for callers with their own loop.
//!
//! ## Modules
//!
//! - [`types`] - Geometry and color primitives
//! - [`tree`] - Node descriptions and the owned scene tree
//! - [`layout`] - The four-pass flex layout engine
//! - [`draw`] - Draw-command lists
//! - [`text`] - Fonts and word wrapping
//! - [`backend`] - The display-surface interface
//! - [`scene`] - The public engine handles

pub mod arena;
pub mod backend;
pub mod draw;
pub mod error;
pub mod layout;
pub mod scene;
pub mod text;
pub mod tree;
pub mod types;

mod pipeline;

pub use arena::Span;
pub use backend::{Backend, BackendEvent};
pub use draw::{DrawCmd, DrawList};
pub use error::{Error, Result};
pub use layout::LayoutEngine;
pub use scene::{Scene, SceneConfig, SyncScene};
pub use text::{Font, FontSource, MonoFont, MonoFonts, TextMetrics};
pub use tree::{FlexAttrs, NodeDesc, NodeId, Tree};
pub use types::{Color, Dim, Justify, Length, Pos, Rect};
