// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use greenhouse_responder::context::TouchContext;
use greenhouse_responder::error::HandlerResult;
use greenhouse_responder::router::RootResponder;
use greenhouse_responder::touch::Touch;
use greenhouse_responder::types::{
    Capabilities, DragResponse, RawTouch, RawTouchEvent, StartResponse, TouchId,
};
use greenhouse_responder::view::ViewTree;
use kurbo::Point;

/// A single chain `0 → 1 → … → depth-1`. The leaf accepts touches, the
/// middle views track hover, and the root captures when `capture_root` is set.
struct Chain {
    depth: u32,
    capture_root: bool,
}

impl ViewTree<u32> for Chain {
    fn next_responder(&self, view: &u32) -> Option<u32> {
        view.checked_sub(1)
    }

    fn capabilities(&self, view: &u32) -> Capabilities {
        if *view == 0 {
            Capabilities::RESPONDER | Capabilities::CAPTURE_TOUCH
        } else if *view + 1 == self.depth {
            Capabilities::RESPONDER
        } else {
            Capabilities::TOUCH_ENTERED | Capabilities::TOUCH_EXITED
        }
    }

    fn capture_touch(
        &mut self,
        _view: &u32,
        _touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<bool> {
        Ok(self.capture_root)
    }

    fn touch_start(
        &mut self,
        _view: &u32,
        _touch: &Touch<u32>,
        _cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<StartResponse<u32>> {
        Ok(StartResponse::Accept)
    }

    fn touches_dragged(
        &mut self,
        view: &u32,
        changed: &[&Touch<u32>],
        cx: &mut TouchContext<'_, u32>,
    ) -> HandlerResult<DragResponse> {
        black_box(cx.averaged_touches_for_view(view));
        black_box(changed.len());
        Ok(DragResponse::NoChange)
    }
}

fn contacts(n: u32, target: u32, y: f64) -> Vec<RawTouch<u32>> {
    (0..n)
        .map(|i| RawTouch {
            id: TouchId(i),
            page: Point::new(f64::from(i) * 20.0, y),
            target,
        })
        .collect()
}

fn gesture(root: &mut RootResponder<u32>, chain: &mut Chain, touches: u32, moves: u32) {
    let leaf = chain.depth - 1;
    let start = RawTouchEvent::new(0.0, contacts(touches, leaf, 0.0));
    black_box(root.on_touch_start(chain, &start));
    for m in 1..=moves {
        let t = f64::from(m) * 16.0;
        let event = RawTouchEvent::new(t, contacts(touches, leaf, t));
        black_box(root.on_touch_move(chain, &event));
    }
    let end = RawTouchEvent::new(
        f64::from(moves + 1) * 16.0,
        contacts(touches, leaf, 0.0),
    );
    black_box(root.on_touch_end(chain, &end));
}

fn bench_gestures(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture");
    for &depth in &[4_u32, 16, 64] {
        for &touches in &[1_u32, 5] {
            group.throughput(Throughput::Elements(u64::from(touches)));
            group.bench_function(format!("depth{depth}_touches{touches}"), |b| {
                b.iter_batched(
                    || {
                        (
                            RootResponder::<u32>::new(),
                            Chain {
                                depth,
                                capture_root: false,
                            },
                        )
                    },
                    |(mut root, mut chain)| gesture(&mut root, &mut chain, touches, 10),
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_responder_changes(c: &mut Criterion) {
    let mut group = c.benchmark_group("responder");
    let depth = 32_u32;
    group.bench_function("stack_and_hand_back_depth32", |b| {
        b.iter_batched(
            || {
                let mut chain = Chain {
                    depth,
                    capture_root: true,
                };
                let mut root = RootResponder::<u32>::new();
                let start = RawTouchEvent::new(0.0, contacts(1, depth - 1, 0.0));
                let _ = root.on_touch_start(&mut chain, &start);
                (root, chain)
            },
            |(mut root, mut chain)| {
                let id = TouchId(0);
                let _ = root.make_touch_responder(&mut chain, id, depth - 1, true);
                let _ = root.make_touch_responder(&mut chain, id, 0, true);
                black_box(root.engine().touch(id).map(|t| t.responder_stack().len()));
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_gestures, bench_responder_changes);
criterion_main!(benches);
