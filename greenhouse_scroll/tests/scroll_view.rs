// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scroll view over one content view, driven end to end through the root
//! responder.

use std::collections::VecDeque;

use greenhouse_responder::context::TouchContext;
use greenhouse_responder::error::HandlerResult;
use greenhouse_responder::router::RootResponder;
use greenhouse_responder::touch::Touch;
use greenhouse_responder::types::{
    Capabilities, DragResponse, RawTouch, RawTouchEvent, StartResponse, TouchId,
};
use greenhouse_responder::view::ViewTree;
use greenhouse_scroll::config::ScrollConfig;
use greenhouse_scroll::gesture::{ScrollGesture, ScrollPhase};
use greenhouse_scroll::target::{Scheduler, ScrollTarget, TaskHandle, TaskKind};
use kurbo::{Point, Vec2};

const ROOT: u32 = 0;
const SCROLL: u32 = 1;
const CONTENT: u32 = 2;

#[derive(Default)]
struct Content {
    offset: Vec2,
    max: Vec2,
    transient: usize,
    commits: Vec<Vec2>,
}

impl ScrollTarget for Content {
    fn max_offset(&self) -> Vec2 {
        self.max
    }

    fn offset(&self) -> Vec2 {
        self.offset
    }

    fn set_transient_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.transient += 1;
    }

    fn commit_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.commits.push(offset);
    }
}

#[derive(Default)]
struct Timers {
    queue: VecDeque<(f64, TaskHandle)>,
}

impl Scheduler for Timers {
    fn schedule(&mut self, delay_ms: f64, task: TaskHandle) {
        self.queue.push_back((delay_ms, task));
    }
}

struct Scene {
    gesture: ScrollGesture<u32>,
    content: Content,
    timers: Timers,
    content_caps: Capabilities,
    log: Vec<&'static str>,
}

impl Scene {
    fn new(config: ScrollConfig, max_y: f64) -> Self {
        Self {
            gesture: ScrollGesture::new(SCROLL, config).unwrap(),
            content: Content {
                max: Vec2::new(0.0, max_y),
                ..Content::default()
            },
            timers: Timers::default(),
            content_caps: Capabilities::RESPONDER,
            log: Vec::new(),
        }
    }

    fn next_task(&mut self, kind: TaskKind) -> Option<(f64, TaskHandle)> {
        while let Some((delay, task)) = self.timers.queue.pop_front() {
            if task.kind() == kind {
                return Some((delay, task));
            }
        }
        None
    }

    /// Fire deceleration ticks until none is scheduled.
    fn settle(&mut self, now: &mut f64) -> usize {
        let mut ticks = 0;
        while let Some((delay, task)) = self.next_task(TaskKind::Tick) {
            *now += delay;
            let _ = self
                .gesture
                .tick(task, *now, &mut self.content, &mut self.timers);
            ticks += 1;
            assert!(ticks < 10_000, "deceleration never settled");
        }
        ticks
    }
}

impl ViewTree<u32> for Scene {
    fn next_responder(&self, view: &u32) -> Option<u32> {
        match *view {
            CONTENT => Some(SCROLL),
            SCROLL => Some(ROOT),
            _ => None,
        }
    }

    fn capabilities(&self, view: &u32) -> Capabilities {
        match *view {
            SCROLL => Capabilities::RESPONDER | Capabilities::CAPTURE_TOUCH,
            CONTENT => self.content_caps,
            _ => Capabilities::empty(),
        }
    }

    fn capture_touch(
        &mut self,
        view: &u32,
        _touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<bool> {
        Ok(*view == SCROLL && self.gesture.wants_capture())
    }

    fn touch_start(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<StartResponse<u32>> {
        if *view == SCROLL {
            return Ok(self
                .gesture
                .touch_start(touch, cx, &mut self.content, &mut self.timers));
        }
        self.log.push("start");
        Ok(StartResponse::Accept)
    }

    fn touches_dragged(
        &mut self,
        view: &u32,
        changed: &[&Touch<u32>],
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<DragResponse> {
        if *view == SCROLL {
            return Ok(self.gesture.touches_dragged(changed, cx, &mut self.content));
        }
        self.log.push("dragged");
        Ok(DragResponse::NoChange)
    }

    fn touch_end(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        if *view == SCROLL {
            self.gesture
                .touch_end(touch, cx, &mut self.content, &mut self.timers);
        } else {
            self.log.push("end");
        }
        Ok(())
    }

    fn touch_cancelled(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        if *view == SCROLL {
            self.gesture.touch_cancelled(touch, cx, &mut self.content);
        } else {
            self.log.push("cancelled");
        }
        Ok(())
    }
}

fn contact(id: u32, y: f64) -> RawTouch<u32> {
    RawTouch {
        id: TouchId(id),
        page: Point::new(0.0, y),
        target: CONTENT,
    }
}

fn at(timestamp: f64, changed: Vec<RawTouch<u32>>) -> RawTouchEvent<u32> {
    RawTouchEvent::new(timestamp, changed)
}

/// Start a touch at y = 500 and drag it upward far enough to scroll by 30.
fn fling(root: &mut RootResponder<u32>, scene: &mut Scene) {
    assert!(root.on_touch_start(scene, &at(0.0, vec![contact(1, 500.0)])).is_clean());
    for (t, y) in [(10.0, 490.0), (20.0, 480.0), (30.0, 460.0)] {
        assert!(root.on_touch_move(scene, &at(t, vec![contact(1, y)])).is_clean());
    }
    assert_eq!(scene.content.offset, Vec2::new(0.0, 30.0));
    assert!(root.on_touch_end(scene, &at(30.0, vec![contact(1, 460.0)])).is_clean());
}

#[test]
fn tap_is_redispatched_to_content() {
    let mut scene = Scene::new(ScrollConfig::default(), 1_000.0);
    let mut root: RootResponder<u32> = RootResponder::new();

    let _ = root.on_touch_start(&mut scene, &at(0.0, vec![contact(1, 100.0)]));
    assert_eq!(scene.gesture.phase(), ScrollPhase::Tracking);
    assert!(scene.log.is_empty());

    let report = root.on_touch_end(&mut scene, &at(60.0, vec![contact(1, 100.0)]));
    assert!(report.is_clean());
    assert_eq!(scene.log, vec!["start", "end"]);
    assert_eq!(scene.gesture.phase(), ScrollPhase::Idle);
    assert!(scene.content.commits.is_empty());
    assert!(root.engine().is_empty());
}

#[test]
fn tap_on_inert_content_leaves_the_gesture_ready() {
    let mut scene = Scene::new(ScrollConfig::default(), 1_000.0);
    scene.content_caps = Capabilities::empty();
    let mut root: RootResponder<u32> = RootResponder::new();

    let _ = root.on_touch_start(&mut scene, &at(0.0, vec![contact(1, 100.0)]));
    let report = root.on_touch_end(&mut scene, &at(60.0, vec![contact(1, 100.0)]));
    assert!(report.is_clean());
    assert_eq!(scene.gesture.phase(), ScrollPhase::Idle);
    assert!(scene.gesture.touches().is_empty());
    assert!(root.engine().is_empty());
    assert!(scene.log.is_empty());

    // The next drag still flings and comes to rest.
    scene.timers.queue.clear();
    fling(&mut root, &mut scene);
    assert_eq!(scene.gesture.phase(), ScrollPhase::Decelerating);
    let mut now = 30.0;
    let _ = scene.settle(&mut now);
    assert_eq!(scene.content.commits.len(), 1);
}

#[test]
fn delayed_content_touch_is_cancelled_once_dragging() {
    let mut scene = Scene::new(ScrollConfig::default(), 1_000.0);
    let mut root: RootResponder<u32> = RootResponder::new();
    let _ = root.on_touch_start(&mut scene, &at(0.0, vec![contact(1, 100.0)]));

    let (delay, task) = scene.next_task(TaskKind::ContentDelay).unwrap();
    assert_eq!(delay, 150.0);
    let id = scene.gesture.content_delay_elapsed(task).unwrap();
    assert!(root.capture_touch(&mut scene, id, Some(SCROLL), true).unwrap());
    assert_eq!(scene.log, vec!["start"]);
    assert_eq!(
        root.engine().touch(id).unwrap().responder_stack(),
        &[SCROLL, CONTENT]
    );

    // Under the threshold the content keeps the touch.
    let _ = root.on_touch_move(&mut scene, &at(160.0, vec![contact(1, 98.0)]));
    assert_eq!(scene.log, vec!["start", "dragged"]);
    assert_eq!(scene.gesture.phase(), ScrollPhase::Tracking);

    // Crossing it cancels the content without moving anything yet.
    let _ = root.on_touch_move(&mut scene, &at(170.0, vec![contact(1, 90.0)]));
    assert_eq!(scene.log, vec!["start", "dragged", "dragged", "cancelled"]);
    assert_eq!(scene.gesture.phase(), ScrollPhase::Dragging);
    assert_eq!(scene.content.transient, 0);
    assert_eq!(root.engine().touch(id).unwrap().responder_stack(), &[SCROLL]);

    let _ = root.on_touch_move(&mut scene, &at(180.0, vec![contact(1, 80.0)]));
    assert_eq!(scene.content.offset, Vec2::new(0.0, 10.0));
    assert_eq!(scene.log.len(), 4);
    assert_eq!(scene.gesture.content_delay_elapsed(task), None);
}

#[test]
fn fling_decelerates_and_commits_once() {
    let mut scene = Scene::new(ScrollConfig::default(), 1_000.0);
    let mut root: RootResponder<u32> = RootResponder::new();
    fling(&mut root, &mut scene);
    assert_eq!(scene.gesture.phase(), ScrollPhase::Decelerating);

    let mut now = 30.0;
    let ticks = scene.settle(&mut now);
    assert!(ticks > 10, "only {ticks} ticks");
    assert_eq!(scene.gesture.phase(), ScrollPhase::Idle);
    assert_eq!(scene.content.commits.len(), 1);
    let rest = scene.content.commits[0];
    assert!(rest.y > 30.0 && rest.y <= 1_000.0, "{rest:?}");
    assert!(scene.log.is_empty(), "content saw {:?}", scene.log);
}

#[test]
fn overscroll_rebounds_onto_the_edge() {
    let mut scene = Scene::new(ScrollConfig::default(), 200.0);
    let mut root: RootResponder<u32> = RootResponder::new();
    let _ = root.on_touch_start(&mut scene, &at(0.0, vec![contact(1, 100.0)]));
    let _ = root.on_touch_move(&mut scene, &at(10.0, vec![contact(1, 110.0)]));
    let _ = root.on_touch_move(&mut scene, &at(20.0, vec![contact(1, 160.0)]));
    let pulled = scene.content.offset.y;
    assert!(pulled < 0.0 && pulled > -50.0, "{pulled}");

    let _ = root.on_touch_end(&mut scene, &at(20.0, vec![contact(1, 160.0)]));
    let mut now = 20.0;
    let _ = scene.settle(&mut now);
    assert_eq!(scene.content.commits, vec![Vec2::ZERO]);
}

#[test]
fn new_touch_stops_deceleration_where_it_is() {
    let mut scene = Scene::new(ScrollConfig::default(), 1_000.0);
    let mut root: RootResponder<u32> = RootResponder::new();
    fling(&mut root, &mut scene);

    let (delay, task) = scene.next_task(TaskKind::Tick).unwrap();
    assert!(
        scene
            .gesture
            .tick(task, 30.0 + delay, &mut scene.content, &mut scene.timers)
    );
    let coasted = scene.content.offset;
    assert!(scene.content.commits.is_empty());

    let _ = root.on_touch_start(&mut scene, &at(45.0, vec![contact(2, 300.0)]));
    assert_eq!(scene.content.commits, vec![coasted]);
    assert_eq!(scene.gesture.phase(), ScrollPhase::Tracking);

    // The tick scheduled by the interrupted run is stale.
    let (_, stale) = scene.next_task(TaskKind::Tick).unwrap();
    assert!(
        !scene
            .gesture
            .tick(stale, 50.0, &mut scene.content, &mut scene.timers)
    );
    assert_eq!(scene.content.offset, coasted);
    assert_eq!(scene.content.commits.len(), 1);
}

#[test]
fn without_delay_content_sees_the_touch_at_once() {
    let config = ScrollConfig::default().with_delays_content_touches(false);
    let mut scene = Scene::new(config, 1_000.0);
    let mut root: RootResponder<u32> = RootResponder::new();

    let _ = root.on_touch_start(&mut scene, &at(0.0, vec![contact(1, 100.0)]));
    assert_eq!(scene.log, vec!["start"]);
    assert_eq!(
        root.engine().touch(TouchId(1)).unwrap().responder_stack(),
        &[SCROLL, CONTENT]
    );
    assert!(scene.timers.queue.is_empty());

    // Content is innermost: it is told the touch ended, the scroll view
    // that it was cancelled.
    let _ = root.on_touch_end(&mut scene, &at(40.0, vec![contact(1, 100.0)]));
    assert_eq!(scene.log, vec!["start", "end"]);
    assert_eq!(scene.gesture.phase(), ScrollPhase::Idle);
    assert!(scene.content.commits.is_empty());
}

#[test]
fn cancelled_drag_commits_the_current_offset() {
    let mut scene = Scene::new(ScrollConfig::default(), 1_000.0);
    let mut root: RootResponder<u32> = RootResponder::new();
    let _ = root.on_touch_start(&mut scene, &at(0.0, vec![contact(1, 100.0)]));
    let _ = root.on_touch_move(&mut scene, &at(10.0, vec![contact(1, 90.0)]));
    let _ = root.on_touch_move(&mut scene, &at(20.0, vec![contact(1, 75.0)]));

    let _ = root.on_touch_cancel(&mut scene, &at(25.0, vec![contact(1, 75.0)]));
    assert_eq!(scene.content.commits, vec![Vec2::new(0.0, 15.0)]);
    assert_eq!(scene.gesture.phase(), ScrollPhase::Idle);
    assert!(scene.timers.queue.iter().all(|(_, t)| t.kind() != TaskKind::Tick));
}

#[test]
fn two_fingers_scroll_by_their_centroid() {
    let mut scene = Scene::new(ScrollConfig::default(), 1_000.0);
    let mut root: RootResponder<u32> = RootResponder::new();
    let _ = root.on_touch_start(
        &mut scene,
        &at(0.0, vec![contact(1, 100.0), contact(2, 200.0)]),
    );
    assert_eq!(scene.gesture.touches(), &[TouchId(1), TouchId(2)]);

    let _ = root.on_touch_move(
        &mut scene,
        &at(10.0, vec![contact(1, 90.0), contact(2, 190.0)]),
    );
    assert_eq!(scene.gesture.phase(), ScrollPhase::Dragging);

    let _ = root.on_touch_move(
        &mut scene,
        &at(20.0, vec![contact(1, 70.0), contact(2, 170.0)]),
    );
    assert_eq!(scene.content.offset, Vec2::new(0.0, 20.0));

    // One finger lifting re-anchors on the other without a jump.
    let _ = root.on_touch_end(&mut scene, &at(25.0, vec![contact(1, 70.0)]));
    assert_eq!(scene.gesture.phase(), ScrollPhase::Dragging);
    let _ = root.on_touch_move(&mut scene, &at(35.0, vec![contact(2, 160.0)]));
    assert_eq!(scene.content.offset, Vec2::new(0.0, 30.0));
}
