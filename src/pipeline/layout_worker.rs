//! The layout worker: sole owner of the scene tree and the layout
//! engine.
//!
//! The worker blocks for one message, then drains everything else already
//! queued, so a burst of resizes collapses into a single layout pass.
//! When anything made the layout dirty it runs the engine, rebuilds a
//! draw list (reusing a recycled one when the render worker has returned
//! it), and presents it. Waiters registered during the batch are answered
//! after the batch, whether or not a pass ran — by then the tree reflects
//! every request the waiter could have observed being sent.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use bitflags::bitflags;

use crate::draw::DrawList;
use crate::layout::LayoutEngine;
use crate::pipeline::{LayoutMsg, RenderMsg};
use crate::tree::Tree;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Dirty: u8 {
        const DIM  = 1 << 0;
        const TREE = 1 << 1;
    }
}

pub(crate) fn spawn_layout_worker(
    rx: Receiver<LayoutMsg>,
    render_tx: Sender<RenderMsg>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("flexscene-layout".into())
        .spawn(move || {
            LayoutWorker {
                rx,
                render_tx,
                engine: LayoutEngine::new(),
                tree: Tree::new(),
                spare: None,
            }
            .run();
        })
}

struct LayoutWorker {
    rx: Receiver<LayoutMsg>,
    render_tx: Sender<RenderMsg>,
    engine: LayoutEngine,
    tree: Tree,
    /// Draw list returned by the render worker, reused for the next frame.
    spare: Option<DrawList>,
}

impl LayoutWorker {
    fn run(mut self) {
        let mut waiters: Vec<Sender<()>> = Vec::new();
        loop {
            let Ok(first) = self.rx.recv() else {
                break; // every sender is gone
            };
            let mut dirty = Dirty::empty();
            let mut quit = false;
            self.apply(first, &mut dirty, &mut waiters, &mut quit);
            while let Ok(msg) = self.rx.try_recv() {
                self.apply(msg, &mut dirty, &mut waiters, &mut quit);
            }
            if quit {
                break;
            }

            if !dirty.is_empty() {
                self.engine.layout(&mut self.tree);
                let mut list = self.spare.take().unwrap_or_default();
                list.rebuild(&self.tree, self.engine.scratch());
                if self.render_tx.send(RenderMsg::Present(list)).is_err() {
                    log::warn!("render worker is gone, dropping frame");
                }
            }

            for waiter in waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
        log::debug!("layout worker shutting down");
        // Dropping `waiters` here disconnects anyone still blocked on a
        // reply; they observe the shutdown instead of hanging.
    }

    fn apply(
        &mut self,
        msg: LayoutMsg,
        dirty: &mut Dirty,
        waiters: &mut Vec<Sender<()>>,
        quit: &mut bool,
    ) {
        match msg {
            LayoutMsg::SetDim(dim) => {
                self.engine.root_dim = dim;
                *dirty |= Dirty::DIM;
            }
            LayoutMsg::SetTree(tree) => {
                self.tree = tree;
                *dirty |= Dirty::TREE;
            }
            LayoutMsg::WaitForLayout(reply) => waiters.push(reply),
            LayoutMsg::Recycle(list) => self.spare = Some(list),
            LayoutMsg::Quit => *quit = true,
        }
    }
}
