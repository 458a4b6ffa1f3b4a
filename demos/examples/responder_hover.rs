// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover transitions while a touch slides.
//!
//! A keyboard owns every touch that starts on it. Its keys do not respond to
//! touches, but they light up as a finger slides over them. Lifting types
//! the key under the finger.
//!
//! Each raw event runs inside one run-loop batch; the demo counts them.
//!
//! Run:
//! - `cargo run -p greenhouse_demos --example responder_hover`

use greenhouse_responder::context::TouchContext;
use greenhouse_responder::error::HandlerResult;
use greenhouse_responder::hover::{HoverEvent, HoverState, responder_path};
use greenhouse_responder::router::RootResponder;
use greenhouse_responder::touch::Touch;
use greenhouse_responder::types::{Capabilities, RawTouch, RawTouchEvent, TouchId};
use greenhouse_responder::view::{RunLoop, ViewTree};
use kurbo::Point;
use tracing_subscriber::EnvFilter;

const WINDOW: u32 = 0;
const KEYBOARD: u32 = 1;
const KEYS: [(u32, char); 3] = [(10, 'q'), (11, 'w'), (12, 'e')];

fn key_char(view: u32) -> Option<char> {
    KEYS.iter().find(|(id, _)| *id == view).map(|(_, c)| *c)
}

#[derive(Default)]
struct Keyboard {
    lit: Vec<char>,
    typed: String,
}

impl ViewTree<u32> for Keyboard {
    fn next_responder(&self, view: &u32) -> Option<u32> {
        match *view {
            WINDOW => None,
            KEYBOARD => Some(WINDOW),
            _ => Some(KEYBOARD),
        }
    }

    fn capabilities(&self, view: &u32) -> Capabilities {
        match *view {
            KEYBOARD => Capabilities::RESPONDER,
            WINDOW => Capabilities::empty(),
            _ => Capabilities::TOUCH_ENTERED | Capabilities::TOUCH_EXITED,
        }
    }

    fn touch_entered(
        &mut self,
        view: &u32,
        _touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        if let Some(c) = key_char(*view) {
            self.lit.push(c);
        }
        Ok(())
    }

    fn touch_exited(
        &mut self,
        view: &u32,
        _touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        if let Some(c) = key_char(*view) {
            self.lit.retain(|l| *l != c);
        }
        Ok(())
    }

    fn touch_end(
        &mut self,
        _view: &u32,
        touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<()> {
        if let Some(c) = touch.hovered().last().copied().and_then(key_char) {
            self.typed.push(c);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Frames {
    depth: u32,
    batches: u32,
}

impl RunLoop for Frames {
    fn begin(&mut self) {
        self.depth += 1;
    }

    fn end(&mut self) {
        self.depth -= 1;
        if self.depth == 0 {
            self.batches += 1;
        }
    }
}

fn over(key: u32, x: f64) -> RawTouch<u32> {
    RawTouch {
        id: TouchId(7),
        page: Point::new(x, 300.0),
        target: key,
    }
}

fn main() {
    let filter =
        EnvFilter::try_from_env("GREENHOUSE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // The transitions on their own, outside any dispatch.
    let mut hover: HoverState<u32> = HoverState::new();
    let keyboard = Keyboard::default();
    let first = hover.update_path(&responder_path(&keyboard, 10));
    let second = hover.update_path(&responder_path(&keyboard, 11));
    println!("== Hover paths ==\n  {first:?}\n  {second:?}");
    assert_eq!(second, vec![HoverEvent::Exited(10), HoverEvent::Entered(11)]);

    // The same transitions delivered by the root responder.
    let mut keyboard = Keyboard::default();
    let mut root: RootResponder<u32, Frames> = RootResponder::new();
    let _ = root.on_touch_start(&mut keyboard, &RawTouchEvent::new(0.0, vec![over(10, 5.0)]));
    println!("== Slide ==\n  lit {:?}", keyboard.lit);
    for (t, key, x) in [(16.0, 11, 45.0), (32.0, 12, 85.0)] {
        let _ = root.on_touch_move(&mut keyboard, &RawTouchEvent::new(t, vec![over(key, x)]));
        println!("  lit {:?}", keyboard.lit);
    }
    let _ = root.on_touch_end(&mut keyboard, &RawTouchEvent::new(48.0, vec![over(12, 86.0)]));
    println!("  lit {:?}, typed {:?}", keyboard.lit, keyboard.typed);
    println!("  {} batches", root.run_loop().batches);

    assert!(keyboard.lit.is_empty());
    assert_eq!(keyboard.typed, "e");
    assert_eq!(root.run_loop().batches, 4);
}
