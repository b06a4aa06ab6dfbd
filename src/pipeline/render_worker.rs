//! The render worker: owns the backend and the frontmost draw list.
//!
//! Until a backend is attached (and after it reports a close) the worker
//! just blocks on its channel. With a live backend the loop is frame
//! paced instead: poll window events, paint the current list, let the
//! backend sleep until the next frame, then drain pending messages
//! without blocking. A displaced draw list goes straight back to the
//! layout worker for reuse.

use std::io;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::backend::{Backend, BackendEvent};
use crate::draw::DrawList;
use crate::pipeline::{EventMsg, LayoutMsg, RenderMsg};

pub(crate) fn spawn_render_worker(
    rx: Receiver<RenderMsg>,
    layout_tx: Sender<LayoutMsg>,
    event_tx: Sender<EventMsg>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("flexscene-render".into())
        .spawn(move || {
            RenderWorker {
                rx,
                layout_tx,
                event_tx,
                backend: None,
                display: None,
                closed: false,
                close_sent: false,
                close_waiters: Vec::new(),
            }
            .run();
        })
}

struct RenderWorker {
    rx: Receiver<RenderMsg>,
    layout_tx: Sender<LayoutMsg>,
    event_tx: Sender<EventMsg>,
    backend: Option<Box<dyn Backend>>,
    /// The frame currently on screen.
    display: Option<DrawList>,
    closed: bool,
    close_sent: bool,
    close_waiters: Vec<Sender<()>>,
}

impl RenderWorker {
    fn run(mut self) {
        loop {
            if self.backend.is_some() && !self.closed {
                self.drive_backend();
                match self.drain() {
                    Flow::Continue => {}
                    Flow::Quit => break,
                }
            } else {
                let Ok(msg) = self.rx.recv() else {
                    break;
                };
                if self.apply(msg) == Flow::Quit {
                    break;
                }
            }

            if self.closed {
                for waiter in self.close_waiters.drain(..) {
                    let _ = waiter.send(());
                }
                if !self.close_sent {
                    let _ = self.event_tx.send(EventMsg::CloseObserved);
                    self.close_sent = true;
                }
            }
        }
        log::debug!("render worker shutting down");
    }

    /// One frame: events, paint, frame pacing.
    fn drive_backend(&mut self) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        while let Some(event) = backend.poll_event() {
            match event {
                BackendEvent::Close => {
                    self.closed = true;
                    return; // stop painting immediately
                }
                BackendEvent::Resize(dim) => {
                    let _ = self.layout_tx.send(LayoutMsg::SetDim(dim));
                }
            }
        }
        if let Some(list) = &self.display
            && let Err(err) = backend.render(list)
        {
            // A failed paint is worth a frame, not a shutdown.
            log::warn!("backend render failed: {err}");
        }
        backend.wait_for_frame();
    }

    fn drain(&mut self) -> Flow {
        loop {
            match self.rx.try_recv() {
                Ok(msg) => {
                    if self.apply(msg) == Flow::Quit {
                        return Flow::Quit;
                    }
                }
                Err(TryRecvError::Empty) => return Flow::Continue,
                Err(TryRecvError::Disconnected) => return Flow::Quit,
            }
        }
    }

    fn apply(&mut self, msg: RenderMsg) -> Flow {
        match msg {
            RenderMsg::SetBackend(backend) => self.backend = Some(backend),
            RenderMsg::Present(list) => {
                if let Some(old) = self.display.replace(list) {
                    let _ = self.layout_tx.send(LayoutMsg::Recycle(old));
                }
            }
            RenderMsg::WaitForClose(reply) => {
                if self.closed {
                    let _ = reply.send(());
                } else {
                    self.close_waiters.push(reply);
                }
            }
            RenderMsg::Quit => return Flow::Quit,
        }
        Flow::Continue
    }
}

#[derive(PartialEq)]
enum Flow {
    Continue,
    Quit,
}
