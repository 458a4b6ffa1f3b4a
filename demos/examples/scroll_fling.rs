// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A fling in a scroll view.
//!
//! A list inside a scroll view is dragged upward and released. The scroll
//! view takes the touch from the list once it crosses the drag threshold,
//! then decelerates on a simulated clock and commits its offset once.
//! A second fling runs past the end of the content and rebounds onto the
//! edge.
//!
//! Run:
//! - `cargo run -p greenhouse_demos --example scroll_fling`
//! - `GREENHOUSE_LOG=greenhouse_scroll=trace cargo run -p greenhouse_demos --example scroll_fling`

use greenhouse_responder::context::TouchContext;
use greenhouse_responder::error::HandlerResult;
use greenhouse_responder::router::RootResponder;
use greenhouse_responder::touch::Touch;
use greenhouse_responder::types::{
    Capabilities, DragResponse, RawTouch, RawTouchEvent, StartResponse, TouchId,
};
use greenhouse_responder::view::ViewTree;
use greenhouse_scroll::config::{ScrollAxes, ScrollConfig};
use greenhouse_scroll::gesture::ScrollGesture;
use greenhouse_scroll::target::{Scheduler, ScrollTarget, TaskHandle, TaskKind};
use kurbo::{Point, Vec2};
use tracing::info;
use tracing_subscriber::EnvFilter;

const WINDOW: u32 = 0;
const SCROLLER: u32 = 1;
const LIST: u32 = 2;

struct List {
    offset: Vec2,
    max: Vec2,
    frames: u32,
    commits: Vec<Vec2>,
}

impl ScrollTarget for List {
    fn max_offset(&self) -> Vec2 {
        self.max
    }

    fn offset(&self) -> Vec2 {
        self.offset
    }

    fn set_transient_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.frames += 1;
    }

    fn commit_offset(&mut self, offset: Vec2) {
        info!(y = offset.y, "scroll position committed");
        self.offset = offset;
        self.commits.push(offset);
    }
}

/// Timers on a simulated clock. Ties fire in the order they were scheduled.
#[derive(Default)]
struct Clock {
    now: f64,
    due: Vec<(f64, TaskHandle)>,
}

impl Scheduler for Clock {
    fn schedule(&mut self, delay_ms: f64, task: TaskHandle) {
        self.due.push((self.now + delay_ms, task));
    }
}

impl Clock {
    /// Time of the earliest pending timer.
    fn next_at(&self) -> Option<f64> {
        self.due.iter().map(|(at, _)| *at).reduce(f64::min)
    }

    fn pop(&mut self) -> Option<(f64, TaskHandle)> {
        let at = self.next_at()?;
        let index = self.due.iter().position(|(t, _)| *t == at)?;
        Some(self.due.remove(index))
    }
}

struct Screen {
    gesture: ScrollGesture<u32>,
    list: List,
    clock: Clock,
    list_touches: u32,
}

impl ViewTree<u32> for Screen {
    fn next_responder(&self, view: &u32) -> Option<u32> {
        match *view {
            LIST => Some(SCROLLER),
            SCROLLER => Some(WINDOW),
            _ => None,
        }
    }

    fn capabilities(&self, view: &u32) -> Capabilities {
        match *view {
            SCROLLER => Capabilities::RESPONDER | Capabilities::CAPTURE_TOUCH,
            LIST => Capabilities::RESPONDER,
            _ => Capabilities::empty(),
        }
    }

    fn capture_touch(
        &mut self,
        view: &u32,
        _touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<bool> {
        Ok(*view == SCROLLER && self.gesture.wants_capture())
    }

    fn touch_start(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<StartResponse<u32>> {
        if *view == SCROLLER {
            return Ok(self
                .gesture
                .touch_start(touch, cx, &mut self.list, &mut self.clock));
        }
        self.list_touches += 1;
        Ok(StartResponse::Accept)
    }

    fn touches_dragged(
        &mut self,
        view: &u32,
        changed: &[&Touch<u32>],
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<DragResponse> {
        if *view == SCROLLER {
            return Ok(self.gesture.touches_dragged(changed, cx, &mut self.list));
        }
        Ok(DragResponse::NoChange)
    }

    fn touch_end(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        if *view == SCROLLER {
            self.gesture
                .touch_end(touch, cx, &mut self.list, &mut self.clock);
        }
        Ok(())
    }

    fn touch_cancelled(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        if *view == SCROLLER {
            self.gesture.touch_cancelled(touch, cx, &mut self.list);
        }
        Ok(())
    }
}

fn finger(y: f64) -> RawTouch<u32> {
    RawTouch {
        id: TouchId(1),
        page: Point::new(160.0, y),
        target: LIST,
    }
}

/// Drag from `from` by `dy` over `steps` moves 16 ms apart, release, and run
/// every timer until the gesture is idle again.
fn fling(root: &mut RootResponder<u32>, screen: &mut Screen, from: f64, dy: f64, steps: u32) {
    let start = screen.clock.now;
    let _ = root.on_touch_start(screen, &RawTouchEvent::new(start, vec![finger(from)]));

    let mut now = start;
    let mut y = from;
    for _ in 0..steps {
        now += 16.0;
        y += dy / f64::from(steps);
        screen.clock.now = now;
        // A content delay that fires mid-drag hands the touch to the list.
        while screen.clock.next_at().is_some_and(|at| at <= now) {
            if let Some((_, task)) = screen.clock.pop() {
                if let Some(id) = screen.gesture.content_delay_elapsed(task) {
                    let _ = root.capture_touch(screen, id, Some(SCROLLER), true);
                }
            }
        }
        let _ = root.on_touch_move(screen, &RawTouchEvent::new(now, vec![finger(y)]));
    }
    let _ = root.on_touch_end(screen, &RawTouchEvent::new(now, vec![finger(y)]));

    let mut ticks = 0;
    while let Some((at, task)) = screen.clock.pop() {
        screen.clock.now = at;
        if task.kind() == TaskKind::Tick {
            let Screen { gesture, list, clock, .. } = &mut *screen;
            let _ = gesture.tick(task, at, list, clock);
            ticks += 1;
        }
    }
    println!(
        "  dragged {:.0} px, settled at y = {:.1} after {ticks} ticks",
        -dy, screen.list.offset.y
    );
}

fn main() {
    let filter =
        EnvFilter::try_from_env("GREENHOUSE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let config = ScrollConfig::default().with_axes(ScrollAxes::VERTICAL);
    let gesture = match ScrollGesture::new(SCROLLER, config) {
        Ok(gesture) => gesture,
        Err(err) => {
            eprintln!("bad scroll config: {err}");
            return;
        }
    };
    let mut screen = Screen {
        gesture,
        list: List {
            offset: Vec2::ZERO,
            max: Vec2::new(0.0, 1_200.0),
            frames: 0,
            commits: Vec::new(),
        },
        clock: Clock::default(),
        list_touches: 0,
    };
    let mut root: RootResponder<u32> = RootResponder::new();

    println!("== Fling ==");
    fling(&mut root, &mut screen, 600.0, -240.0, 6);
    let after_first = screen.list.offset.y;
    // The first move only arms the drag; inertia carries the list past
    // where the finger left it.
    assert!(after_first > 200.0, "no inertia: {after_first}");
    assert!(after_first < 1_200.0);

    println!("== Fling past the end ==");
    fling(&mut root, &mut screen, 600.0, -500.0, 4);
    assert_eq!(screen.list.offset.y, 1_200.0);

    println!(
        "  {} frames drawn, {} commits, list saw {} touches",
        screen.list.frames,
        screen.list.commits.len(),
        screen.list_touches
    );
    assert_eq!(screen.list.commits.len(), 2);
    assert!(root.engine().is_empty());
}
