// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greenhouse Responder: touch ownership for a view hierarchy, `no_std`.
//!
//! ## Overview
//!
//! This crate decides which view responds to each touch, and keeps that
//! decision consistent while touches move, hand off, and lift.
//! It does not hit test; the host resolves each contact to a view and feeds
//! the results in as [`RawTouchEvent`](crate::types::RawTouchEvent)s.
//!
//! ## Responder stacks
//!
//! Every touch carries a stack of responders. The innermost frame owns the
//! touch. A view may take a touch from its ancestor while leaving the
//! ancestor stacked below it (a scroll view passing a touch to a button),
//! and the touch can later be handed back down the stack, cancelling the
//! frames above.
//!
//! ## Pieces
//!
//! - [`ViewTree`](crate::view::ViewTree): the host's view hierarchy, its
//!   responder chain and optional callbacks, advertised through
//!   [`Capabilities`](crate::types::Capabilities).
//! - [`ViewTouchIndex`](crate::index::ViewTouchIndex): which view owns which
//!   touches, with exactly-once "has active touch" transitions.
//! - [`TouchEngine`](crate::engine::TouchEngine): capture, responder changes,
//!   drag propagation, and end/cancel delivery.
//! - [`RootResponder`](crate::router::RootResponder): routes raw platform
//!   events into the engine, one [`RunLoop`](crate::view::RunLoop) batch per
//!   event.
//! - [`HoverState`](crate::hover::HoverState): entered/exited transitions as
//!   a touch slides across views.
//!
//! ## Example
//!
//! ```
//! use greenhouse_responder::context::TouchContext;
//! use greenhouse_responder::error::HandlerResult;
//! use greenhouse_responder::router::RootResponder;
//! use greenhouse_responder::touch::Touch;
//! use greenhouse_responder::types::{
//!     Capabilities, RawTouch, RawTouchEvent, StartResponse, TouchId,
//! };
//! use greenhouse_responder::view::ViewTree;
//! use kurbo::Point;
//!
//! /// View 0 is the root, view 1 a button inside it.
//! #[derive(Default)]
//! struct Views {
//!     taps: u32,
//! }
//!
//! impl ViewTree<u32> for Views {
//!     fn next_responder(&self, view: &u32) -> Option<u32> {
//!         (*view == 1).then_some(0)
//!     }
//!
//!     fn capabilities(&self, view: &u32) -> Capabilities {
//!         if *view == 1 { Capabilities::RESPONDER } else { Capabilities::empty() }
//!     }
//!
//!     fn touch_start(
//!         &mut self,
//!         _view: &u32,
//!         _touch: &Touch<u32>,
//!         _cx: &mut TouchContext<'_, u32>,
//!     ) -> HandlerResult<StartResponse<u32>> {
//!         Ok(StartResponse::Accept)
//!     }
//!
//!     fn touch_end(
//!         &mut self,
//!         _view: &u32,
//!         _touch: &Touch<u32>,
//!         _cx: &mut TouchContext<'_, u32>,
//!     ) -> HandlerResult<()> {
//!         self.taps += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut views = Views::default();
//! let mut root: RootResponder<u32> = RootResponder::new();
//! let contact = RawTouch { id: TouchId(0), page: Point::new(4.0, 4.0), target: 1 };
//!
//! let report = root.on_touch_start(&mut views, &RawTouchEvent::new(0.0, vec![contact.clone()]));
//! assert!(report.is_clean());
//! assert_eq!(root.engine().index().owner_of(TouchId(0)), Some(1));
//!
//! let _ = root.on_touch_end(&mut views, &RawTouchEvent::new(80.0, vec![contact]));
//! assert_eq!(views.taps, 1);
//! assert!(root.engine().is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Logging goes through `tracing`;
//! the crate never installs a subscriber.

#![no_std]

extern crate alloc;

pub mod context;
pub mod engine;
pub mod error;
pub mod hover;
pub mod index;
pub mod router;
pub mod touch;
pub mod types;
pub mod view;

#[cfg(test)]
mod testing;
