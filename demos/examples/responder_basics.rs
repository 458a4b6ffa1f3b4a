// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Responder stacks.
//!
//! A swipeable card captures every touch that starts over it and stacks its
//! button on top, so the button owns a tap. Once the finger travels far
//! enough the card claims the touch back and the button is cancelled.
//!
//! Run:
//! - `cargo run -p greenhouse_demos --example responder_basics`
//! - `GREENHOUSE_LOG=trace cargo run -p greenhouse_demos --example responder_basics`

use greenhouse_responder::context::TouchContext;
use greenhouse_responder::error::HandlerResult;
use greenhouse_responder::router::RootResponder;
use greenhouse_responder::touch::Touch;
use greenhouse_responder::types::{
    Capabilities, DragResponse, RawTouch, RawTouchEvent, StartResponse, TouchId,
};
use greenhouse_responder::view::ViewTree;
use kurbo::Point;
use tracing::info;
use tracing_subscriber::EnvFilter;

const WINDOW: u32 = 0;
const CARD: u32 = 1;
const BUTTON: u32 = 2;

/// Travel after which the card takes the touch from its button.
const SWIPE_SLOP: f64 = 10.0;

#[derive(Default)]
struct Views {
    log: Vec<String>,
}

impl Views {
    fn note(&mut self, view: u32, what: &str) {
        let name = match view {
            CARD => "card",
            BUTTON => "button",
            _ => "window",
        };
        self.log.push(format!("{name}: {what}"));
    }
}

impl ViewTree<u32> for Views {
    fn next_responder(&self, view: &u32) -> Option<u32> {
        match *view {
            BUTTON => Some(CARD),
            CARD => Some(WINDOW),
            _ => None,
        }
    }

    fn capabilities(&self, view: &u32) -> Capabilities {
        match *view {
            CARD => Capabilities::RESPONDER | Capabilities::CAPTURE_TOUCH,
            BUTTON => Capabilities::RESPONDER,
            _ => Capabilities::empty(),
        }
    }

    fn set_has_touch(&mut self, view: &u32, has_touch: bool) {
        self.note(*view, if has_touch { "pressed" } else { "released" });
    }

    fn capture_touch(
        &mut self,
        view: &u32,
        _touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<bool> {
        Ok(*view == CARD)
    }

    fn touch_start(
        &mut self,
        view: &u32,
        touch: &Touch<u32>,
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<StartResponse<u32>> {
        self.note(*view, "start");
        if *view == CARD && touch.target() == BUTTON {
            // Keep the card underneath so it can take the touch back.
            cx.make_touch_responder(touch.id(), BUTTON, true);
        }
        Ok(StartResponse::Accept)
    }

    fn touches_dragged(
        &mut self,
        view: &u32,
        changed: &[&Touch<u32>],
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<DragResponse> {
        if *view != CARD {
            return Ok(DragResponse::NoChange);
        }
        let swiping = changed
            .iter()
            .any(|t| t.displacement().hypot() > SWIPE_SLOP);
        if swiping {
            self.note(CARD, "claims the swipe");
            Ok(DragResponse::Claim)
        } else {
            Ok(DragResponse::NoChange)
        }
    }

    fn touch_end(
        &mut self,
        view: &u32,
        _touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        self.note(*view, "end");
        Ok(())
    }

    fn touch_cancelled(
        &mut self,
        view: &u32,
        _touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        self.note(*view, "cancelled");
        Ok(())
    }
}

fn contact(x: f64) -> RawTouch<u32> {
    RawTouch {
        id: TouchId(1),
        page: Point::new(x, 20.0),
        target: BUTTON,
    }
}

fn main() {
    let filter =
        EnvFilter::try_from_env("GREENHOUSE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mut views = Views::default();
    let mut root: RootResponder<u32> = RootResponder::new();

    // A tap: the button ends, the card beneath it is cancelled.
    let _ = root.on_touch_start(&mut views, &RawTouchEvent::new(0.0, vec![contact(40.0)]));
    let stack = root.engine().touch(TouchId(1)).map(|t| t.responder_stack().to_vec());
    info!(?stack, "after touch start");
    let _ = root.on_touch_end(&mut views, &RawTouchEvent::new(90.0, vec![contact(41.0)]));
    println!("== Tap ==");
    for line in views.log.drain(..) {
        println!("  {line}");
    }
    assert!(root.engine().is_empty());

    // A swipe: the card claims the touch and the button is cancelled once.
    let _ = root.on_touch_start(&mut views, &RawTouchEvent::new(200.0, vec![contact(40.0)]));
    for (t, x) in [(210.0, 44.0), (220.0, 60.0), (230.0, 90.0)] {
        let _ = root.on_touch_move(&mut views, &RawTouchEvent::new(t, vec![contact(x)]));
    }
    let _ = root.on_touch_end(&mut views, &RawTouchEvent::new(240.0, vec![contact(95.0)]));
    println!("== Swipe ==");
    for line in &views.log {
        println!("  {line}");
    }
    assert_eq!(
        views
            .log
            .iter()
            .filter(|l| l.as_str() == "button: cancelled")
            .count(),
        1
    );
}
