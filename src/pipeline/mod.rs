//! The three-worker pipeline behind [`Scene`](crate::scene::Scene).
//!
//! ```text
//!   caller ──msgs──▶ layout worker ──draw lists──▶ render worker
//!                         ▲                             │
//!                         └──recycled lists / resizes───┤
//!                                                       ▼
//!                                                 event worker ──▶ pipe
//! ```
//!
//! The layout worker owns the tree and the layout engine; the render
//! worker owns the backend and the frontmost draw list; the event worker
//! turns a close observation into something a caller's own event loop
//! can select on. All handoffs go over channels — draw lists move by
//! ownership, never by lock, so a slow backend can never stall a layout
//! pass and vice versa.
//!
//! Reply channels (`WaitForLayout`, `WaitForClose`) are created by the
//! caller before the request is sent, so a wakeup cannot be missed; a
//! worker that shuts down drops the reply sender and the waiting side
//! sees the disconnect instead of hanging.

mod events;
mod layout_worker;
mod render_worker;

pub(crate) use events::spawn_event_worker;
pub(crate) use layout_worker::spawn_layout_worker;
pub(crate) use render_worker::spawn_render_worker;

use std::sync::mpsc::Sender;

use crate::backend::Backend;
use crate::draw::DrawList;
use crate::tree::Tree;
use crate::types::Dim;

/// Requests handled by the layout worker.
pub(crate) enum LayoutMsg {
    /// New root dimensions; marks layout dirty.
    SetDim(Dim),
    /// Replace the scene tree; marks layout dirty.
    SetTree(Tree),
    /// Reply on the channel once the pending batch has been applied (and
    /// laid out, if anything was dirty).
    WaitForLayout(Sender<()>),
    /// A displaced draw list coming back from the render worker for reuse.
    Recycle(DrawList),
    Quit,
}

/// Requests handled by the render worker.
pub(crate) enum RenderMsg {
    /// Hand over the display surface; the worker drives it from then on.
    SetBackend(Box<dyn Backend>),
    /// A freshly built draw list becomes the frontmost frame.
    Present(DrawList),
    /// Reply on the channel once the backend has observed a close.
    WaitForClose(Sender<()>),
    Quit,
}

/// Requests handled by the event worker.
pub(crate) enum EventMsg {
    /// The render worker saw [`BackendEvent::Close`](crate::backend::BackendEvent::Close).
    CloseObserved,
    Quit,
}
