//! The event worker: bridges the pipeline to the caller's event loop.
//!
//! When the render worker observes a close, this worker raises a flag the
//! caller can poll and writes one byte to a pipe the caller can `select`
//! or `poll` on alongside their own file descriptors. The pipe carries no
//! payload beyond "something happened" — the flag is the state.

use std::io::{self, PipeWriter, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use crate::pipeline::EventMsg;

/// The byte written to the event pipe for a close.
pub(crate) const CLOSE_BYTE: u8 = b'C';

pub(crate) fn spawn_event_worker(
    rx: Receiver<EventMsg>,
    closing: Arc<AtomicBool>,
    pipe: PipeWriter,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("flexscene-events".into())
        .spawn(move || run(rx, closing, pipe))
}

fn run(rx: Receiver<EventMsg>, closing: Arc<AtomicBool>, mut pipe: PipeWriter) {
    while let Ok(msg) = rx.recv() {
        match msg {
            EventMsg::CloseObserved => {
                // Flag first: a reader woken by the pipe must see it set.
                closing.store(true, Ordering::Release);
                if let Err(err) = pipe.write_all(&[CLOSE_BYTE]) {
                    log::warn!("event pipe write failed: {err}");
                }
                log::info!("window close requested");
            }
            EventMsg::Quit => break,
        }
    }
    log::debug!("event worker shutting down");
}
