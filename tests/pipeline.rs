//! End-to-end tests for the threaded scene pipeline, driven through a
//! fake in-memory backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;

use flexscene::{
    Backend, BackendEvent, Color, Dim, DrawCmd, DrawList, MonoFonts, NodeDesc, Pos, Scene,
    SceneConfig,
};

// =============================================================================
// Fake backend
// =============================================================================

/// Shared handle for poking a [`FakeBackend`] from the test thread.
#[derive(Default)]
struct FakeState {
    events: Vec<BackendEvent>,
    /// Rect origins seen in the most recent frame.
    last_rects: Vec<Pos>,
    frames: usize,
}

#[derive(Clone, Default)]
struct FakeHandle(Arc<Mutex<FakeState>>);

impl FakeHandle {
    fn push_event(&self, event: BackendEvent) {
        self.0.lock().unwrap().events.push(event);
    }

    fn frames(&self) -> usize {
        self.0.lock().unwrap().frames
    }

    fn last_rects(&self) -> Vec<Pos> {
        self.0.lock().unwrap().last_rects.clone()
    }

    fn wait_frames(&self, at_least: usize) {
        for _ in 0..500 {
            if self.frames() >= at_least {
                return;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        panic!("backend never reached {at_least} frames");
    }
}

struct FakeBackend(FakeHandle);

impl Backend for FakeBackend {
    fn poll_event(&mut self) -> Option<BackendEvent> {
        let mut state = self.0.0.lock().unwrap();
        if state.events.is_empty() {
            None
        } else {
            Some(state.events.remove(0))
        }
    }

    fn render(&mut self, list: &DrawList) -> flexscene::Result<()> {
        let mut state = self.0.0.lock().unwrap();
        state.last_rects = list
            .cmds()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Rect { bounds, .. } => Some(bounds.origin),
                DrawCmd::Text { .. } => None,
            })
            .collect();
        state.frames += 1;
        Ok(())
    }

    fn wait_for_frame(&mut self) {
        std::thread::sleep(Duration::from_millis(1));
    }
}

fn scene() -> Scene {
    let _ = env_logger::builder().is_test(true).try_init();
    Scene::new(Arc::new(MonoFonts)).unwrap()
}

fn two_rects() -> NodeDesc {
    NodeDesc::container(vec![
        NodeDesc::rect(Some(Color::RED), Dim::new(60.0, 60.0)),
        NodeDesc::rect(Some(Color::BLUE), Dim::new(60.0, 60.0)),
    ])
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn set_tree_consumes_the_tree() {
    let scene = scene();
    let mut tree = scene.build_tree(&two_rects()).unwrap();
    assert_eq!(tree.len(), 3);
    scene.set_tree(&mut tree).unwrap();
    assert!(tree.is_empty());
}

#[test]
fn wait_for_layout_observes_prior_requests() {
    let scene = scene();
    let mut tree = scene.build_tree(&two_rects()).unwrap();
    scene.set_tree(&mut tree).unwrap();
    scene.set_dimensions(Dim::new(200.0, 200.0)).unwrap();
    scene.wait_for_layout().unwrap();
}

#[test]
fn wait_for_layout_with_nothing_dirty_still_returns() {
    let scene = scene();
    scene.wait_for_layout().unwrap();
    scene.wait_for_layout().unwrap();
}

/// A burst of soon-superseded dimensions followed by a final one, then a
/// wait: frames painted after the wait must show the final width, never
/// a stale one. With `Justify::End` the two rect x-positions encode the
/// root width exactly (w-120 and w-60), so a layout pass that replied
/// before applying its dimensions would be visible here.
#[test]
fn resize_bursts_settle_on_the_final_dimension() {
    let scene = scene();
    let handle = FakeHandle::default();
    scene
        .attach_backend(Box::new(FakeBackend(handle.clone())))
        .unwrap();
    let mut tree = scene
        .build_tree(&two_rects().main_justify(flexscene::Justify::End))
        .unwrap();
    scene.set_tree(&mut tree).unwrap();

    let mut rng = rand::rng();
    for round in 0..50 {
        for _ in 0..5 {
            let stale = rng.random_range(150.0..1000.0);
            scene.set_dimensions(Dim::new(stale, 200.0)).unwrap();
        }
        let w = rng.random_range(150.0..1000.0);
        scene.set_dimensions(Dim::new(w, 200.0)).unwrap();
        scene.wait_for_layout().unwrap();

        // The list presented by that pass races at most one in-flight
        // paint of the previous list; two completed frames later it must
        // be on screen.
        let settled = handle.frames();
        handle.wait_frames(settled + 2);
        let rects = handle.last_rects();
        assert_eq!(rects.len(), 2, "round {round}, w={w}: {rects:?}");
        assert!(
            (rects[0].x - (w - 120.0)).abs() < 1e-6 && (rects[1].x - (w - 60.0)).abs() < 1e-6,
            "round {round}: stale frame at w={w}: {rects:?}"
        );
    }
}

#[test]
fn backend_receives_frames() {
    let scene = scene();
    let handle = FakeHandle::default();
    scene
        .attach_backend(Box::new(FakeBackend(handle.clone())))
        .unwrap();

    let mut tree = scene.build_tree(&two_rects()).unwrap();
    scene.set_tree(&mut tree).unwrap();
    scene.wait_for_layout().unwrap();

    handle.wait_frames(2);
    assert_eq!(
        handle.last_rects(),
        vec![Pos::new(0.0, 0.0), Pos::new(60.0, 0.0)]
    );
}

/// A resize reported by the backend flows back into layout and shows up
/// in a later frame.
#[test]
fn backend_resize_triggers_relayout() {
    let config = SceneConfig {
        window_size: Dim::new(200.0, 200.0),
    };
    let scene = Scene::with_config(Arc::new(MonoFonts), config).unwrap();
    let handle = FakeHandle::default();
    scene
        .attach_backend(Box::new(FakeBackend(handle.clone())))
        .unwrap();

    let mut tree = scene
        .build_tree(&two_rects().main_justify(flexscene::Justify::End))
        .unwrap();
    scene.set_tree(&mut tree).unwrap();
    scene.wait_for_layout().unwrap();
    handle.wait_frames(1);
    assert_eq!(
        handle.last_rects(),
        vec![Pos::new(80.0, 0.0), Pos::new(140.0, 0.0)]
    );

    handle.push_event(BackendEvent::Resize(Dim::new(400.0, 200.0)));
    for _ in 0..500 {
        if handle.last_rects() == vec![Pos::new(280.0, 0.0), Pos::new(340.0, 0.0)] {
            return;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("resize never reflected in a frame, last: {:?}", handle.last_rects());
}

#[test]
fn close_event_reaches_every_surface() {
    let scene = scene();
    let handle = FakeHandle::default();
    scene
        .attach_backend(Box::new(FakeBackend(handle.clone())))
        .unwrap();
    assert!(!scene.close_requested());

    handle.push_event(BackendEvent::Close);
    scene.wait_for_close().unwrap();
    // The pipe byte and the flag arrive with the close.
    scene.read_close_event().unwrap();
    assert!(scene.close_requested());
}

#[cfg(unix)]
#[test]
fn event_fd_is_selectable() {
    let scene = scene();
    let handle = FakeHandle::default();
    scene
        .attach_backend(Box::new(FakeBackend(handle.clone())))
        .unwrap();
    assert!(scene.event_fd() >= 0);

    handle.push_event(BackendEvent::Close);
    scene.wait_for_close().unwrap();
    scene.read_close_event().unwrap();
}

#[test]
fn wait_for_close_after_close_returns_immediately() {
    let scene = scene();
    let handle = FakeHandle::default();
    scene
        .attach_backend(Box::new(FakeBackend(handle.clone())))
        .unwrap();
    handle.push_event(BackendEvent::Close);
    scene.wait_for_close().unwrap();
    scene.wait_for_close().unwrap();
}

#[test]
fn trees_from_independent_scenes_do_not_interfere() {
    let a = scene();
    let b = scene();
    let mut tree_a = a.build_tree(&two_rects()).unwrap();
    let mut tree_b = b.build_tree(&two_rects()).unwrap();
    a.set_tree(&mut tree_a).unwrap();
    b.set_tree(&mut tree_b).unwrap();
    a.set_dimensions(Dim::new(200.0, 200.0)).unwrap();
    b.set_dimensions(Dim::new(400.0, 400.0)).unwrap();
    a.wait_for_layout().unwrap();
    b.wait_for_layout().unwrap();
}

#[test]
fn drop_joins_workers_without_a_backend() {
    let scene = scene();
    let mut tree = scene.build_tree(&two_rects()).unwrap();
    scene.set_tree(&mut tree).unwrap();
    drop(scene); // must not hang
}

#[test]
fn drop_joins_workers_with_a_live_backend() {
    let scene = scene();
    let handle = FakeHandle::default();
    scene
        .attach_backend(Box::new(FakeBackend(handle.clone())))
        .unwrap();
    let mut tree = scene.build_tree(&two_rects()).unwrap();
    scene.set_tree(&mut tree).unwrap();
    scene.wait_for_layout().unwrap();
    drop(scene); // must not hang
}
