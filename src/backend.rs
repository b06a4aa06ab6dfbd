//! Backend interface.
//!
//! A backend owns a window (or any other display surface) and is driven
//! entirely from the render worker: it is polled for window events,
//! handed finished [`DrawList`]s to paint, and asked to block until the
//! next frame is due. Implementations live outside this crate; tests use
//! an in-memory fake.

use crate::draw::DrawList;
use crate::error::Result;
use crate::types::Dim;

/// A window event the backend surfaced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackendEvent {
    /// The user asked the window to close.
    Close,
    /// The drawable area changed size.
    Resize(Dim),
}

/// A display surface driven by the render worker.
///
/// `Send` because the backend is constructed by the caller and handed
/// over to the render thread; it never moves again after that.
pub trait Backend: Send {
    /// Next pending window event, or `None` when the queue is empty.
    fn poll_event(&mut self) -> Option<BackendEvent>;

    /// Replay a draw list onto the surface.
    fn render(&mut self, list: &DrawList) -> Result<()>;

    /// Block until the next frame should be drawn (vsync, a frame timer,
    /// or just a nap — the backend's call).
    fn wait_for_frame(&mut self);
}
