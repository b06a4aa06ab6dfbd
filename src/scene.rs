//! The scene: the crate's front door.
//!
//! [`Scene`] is the pipelined form — three worker threads behind a small
//! handle, with every method a message send. [`SyncScene`] is the
//! single-threaded form for callers that drive their own loop and want
//! the draw list back in hand.

use std::io::{self, PipeReader, Read};
use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use crate::backend::Backend;
use crate::draw::DrawList;
use crate::error::{Error, Result};
use crate::layout::LayoutEngine;
use crate::pipeline::{
    EventMsg, LayoutMsg, RenderMsg, spawn_event_worker, spawn_layout_worker, spawn_render_worker,
};
use crate::text::FontSource;
use crate::tree::{NodeDesc, Tree};
use crate::types::Dim;

// =============================================================================
// Configuration
// =============================================================================

/// Scene construction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Initial window size handed to the layout engine when a backend is
    /// attached; a resize event supersedes it.
    pub window_size: Dim,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window_size: Dim::new(800.0, 600.0),
        }
    }
}

// =============================================================================
// Pipelined scene
// =============================================================================

/// A scene running on its own worker threads.
///
/// The handle is cheap and `Send`; the tree, engine, and backend live on
/// the workers. Methods fail with [`Error::ShutDown`] if a worker has
/// exited.
pub struct Scene {
    fonts: Arc<dyn FontSource>,
    config: SceneConfig,
    layout_tx: Sender<LayoutMsg>,
    render_tx: Sender<RenderMsg>,
    event_tx: Sender<EventMsg>,
    closing: Arc<AtomicBool>,
    close_pipe: PipeReader,
    workers: Vec<JoinHandle<()>>,
}

impl Scene {
    pub fn new(fonts: Arc<dyn FontSource>) -> Result<Self> {
        Self::with_config(fonts, SceneConfig::default())
    }

    pub fn with_config(fonts: Arc<dyn FontSource>, config: SceneConfig) -> Result<Self> {
        let (layout_tx, layout_rx) = mpsc::channel();
        let (render_tx, render_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let (pipe_rx, pipe_tx) = io::pipe()?;
        let closing = Arc::new(AtomicBool::new(false));

        let workers = vec![
            spawn_layout_worker(layout_rx, render_tx.clone())?,
            spawn_render_worker(render_rx, layout_tx.clone(), event_tx.clone())?,
            spawn_event_worker(event_rx, closing.clone(), pipe_tx)?,
        ];
        log::debug!("scene pipeline started ({} workers)", workers.len());

        Ok(Self {
            fonts,
            config,
            layout_tx,
            render_tx,
            event_tx,
            closing,
            close_pipe: pipe_rx,
            workers,
        })
    }

    /// Build a tree from a description, on the caller's thread. Fails
    /// without side effects if any font descriptor does not resolve.
    pub fn build_tree(&self, desc: &NodeDesc) -> Result<Tree> {
        Tree::build(desc, &*self.fonts)
    }

    /// Hand a tree to the layout worker. The caller's tree is left empty;
    /// the next layout pass (and frame) uses the new one.
    pub fn set_tree(&self, tree: &mut Tree) -> Result<()> {
        self.layout_tx
            .send(LayoutMsg::SetTree(mem::take(tree)))
            .map_err(|_| Error::ShutDown)
    }

    /// Change the root dimensions for subsequent layout passes.
    pub fn set_dimensions(&self, dim: Dim) -> Result<()> {
        self.layout_tx
            .send(LayoutMsg::SetDim(dim))
            .map_err(|_| Error::ShutDown)
    }

    /// Block until every request sent before this call has been applied
    /// and, if anything changed, laid out and presented.
    pub fn wait_for_layout(&self) -> Result<()> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.layout_tx
            .send(LayoutMsg::WaitForLayout(reply_tx))
            .map_err(|_| Error::ShutDown)?;
        reply_rx.recv().map_err(|_| Error::ShutDown)
    }

    /// Hand a display surface to the render worker, which drives it from
    /// now on. Also seeds the layout with the configured window size.
    pub fn attach_backend(&self, backend: Box<dyn Backend>) -> Result<()> {
        self.render_tx
            .send(RenderMsg::SetBackend(backend))
            .map_err(|_| Error::ShutDown)?;
        self.set_dimensions(self.config.window_size)
    }

    /// Block until the backend reports a window close.
    pub fn wait_for_close(&self) -> Result<()> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.render_tx
            .send(RenderMsg::WaitForClose(reply_tx))
            .map_err(|_| Error::ShutDown)?;
        reply_rx.recv().map_err(|_| Error::ShutDown)
    }

    /// True once a window close has been observed. Never blocks.
    pub fn close_requested(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }

    /// Consume one notification byte from the event pipe. Blocks until
    /// one arrives; pair with [`event_fd`](Self::event_fd) in a `poll`
    /// loop to only read when ready.
    pub fn read_close_event(&self) -> Result<()> {
        let mut byte = [0u8; 1];
        (&self.close_pipe).read_exact(&mut byte)?;
        Ok(())
    }

    /// Raw read end of the event pipe, for the caller's own `select` or
    /// `poll` loop.
    #[cfg(unix)]
    pub fn event_fd(&self) -> std::os::fd::RawFd {
        use std::os::fd::AsRawFd;
        self.close_pipe.as_raw_fd()
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        let _ = self.layout_tx.send(LayoutMsg::Quit);
        let _ = self.render_tx.send(RenderMsg::Quit);
        let _ = self.event_tx.send(EventMsg::Quit);
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("a scene worker panicked");
            }
        }
    }
}

// =============================================================================
// Synchronous scene
// =============================================================================

/// A scene without the pipeline: the caller owns the cadence and reads
/// the draw list directly. Useful for tools, tests, and hosts with their
/// own render loop.
pub struct SyncScene {
    fonts: Arc<dyn FontSource>,
    engine: LayoutEngine,
    tree: Tree,
    draws: DrawList,
    dirty: bool,
}

impl SyncScene {
    pub fn new(fonts: Arc<dyn FontSource>) -> Self {
        Self {
            fonts,
            engine: LayoutEngine::new(),
            tree: Tree::new(),
            draws: DrawList::new(),
            dirty: false,
        }
    }

    pub fn build_tree(&self, desc: &NodeDesc) -> Result<Tree> {
        Tree::build(desc, &*self.fonts)
    }

    /// Take ownership of a tree, leaving the caller's empty.
    pub fn set_tree(&mut self, tree: &mut Tree) {
        self.tree = mem::take(tree);
        self.dirty = true;
    }

    pub fn set_dimensions(&mut self, dim: Dim) {
        self.engine.root_dim = dim;
        self.dirty = true;
    }

    /// The draw list for the current tree and dimensions, relaid out
    /// first if anything changed since the last call.
    pub fn draw_list(&mut self) -> &DrawList {
        if self.dirty {
            self.engine.layout(&mut self.tree);
            self.draws.rebuild(&self.tree, self.engine.scratch());
            self.dirty = false;
        }
        &self.draws
    }
}
