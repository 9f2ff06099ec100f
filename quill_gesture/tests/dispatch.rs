// Copyright 2025 the Quill Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end dispatch: recognizers against a real scene, whole touch
//! sequences, and frames.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use kurbo::Point;
use quill_gesture::{
    DispatchError, Dispatcher, Gesture, IgnoreReason, Lifecycle, Outcome, RecognizerError,
    Recognizers,
};
use quill_input::{Event, Frame, MalformedReason, Phase, PointerKind, RawSample, TouchId};
use quill_scene::{Capabilities, Interactive, Query, Scene};

const TOOLBAR: Capabilities = Capabilities::from_bits(1 << 0);
const BLOCK_ZONE: Capabilities = Capabilities::from_bits(1 << 1);
const HANDLE: Capabilities = Capabilities::from_bits(1 << 2);

#[derive(Debug)]
struct Node {
    at: Point,
    caps: Capabilities,
}

impl Interactive for Node {
    fn position(&self) -> Point {
        self.at
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }
}

fn node(x: f64, y: f64, caps: Capabilities) -> Node {
    Node {
        at: Point::new(x, y),
        caps,
    }
}

/// Host singletons for these tests.
#[derive(Debug, Default)]
struct Host {
    calls: Vec<(TouchId, &'static str, Lifecycle)>,
    drag_actions: u32,
    meta_mode: bool,
}

type Ctx<'a> = quill_gesture::EventContext<'a, Node, Host>;

/// A gesture recording every lifecycle call into the host.
fn recording(name: &'static str) -> Gesture<Node, Host> {
    let mut gesture = Gesture::new(name);
    for lifecycle in Lifecycle::ALL {
        gesture = gesture.on(lifecycle, move |ctx: &mut Ctx<'_>| {
            let id = ctx.id();
            ctx.host.calls.push((id, name, lifecycle));
        });
    }
    gesture
}

fn sample(kind: PointerKind, phase: Phase, id: u64, x: f64, y: f64, t: u64) -> Event {
    Event::new(kind, phase, TouchId(id), Point::new(x, y), t)
}

fn finger(phase: Phase, id: u64, x: f64, y: f64, t: u64) -> Event {
    sample(PointerKind::Finger, phase, id, x, y, t)
}

fn pencil(phase: Phase, id: u64, x: f64, y: f64, t: u64) -> Event {
    sample(PointerKind::Pencil, phase, id, x, y, t)
}

#[test]
fn drag_past_own_threshold_ends_as_drag() {
    let mut scene = Scene::new();
    scene.insert(None, node(100.0, 100.0, TOOLBAR));

    let mut recognizers = Recognizers::new();
    recognizers.push("toolbar-drag", |ctx: &Ctx<'_>| {
        let query = Query::capable(TOOLBAR).near(ctx.position()).too_far(50.0);
        if ctx.find(&query).is_none() {
            return Ok(None);
        }
        Ok(Some(
            recording("toolbar-drag")
                .moved(|ctx| {
                    if ctx.state.drag_dist() > 100.0 && !ctx.state.is_dragging() {
                        ctx.state.mark_dragging();
                        ctx.host.drag_actions += 1;
                    }
                }),
        ))
    });
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    let began = d
        .dispatch(&finger(Phase::Began, 1, 120.0, 100.0, 0), &scene, &mut host)
        .unwrap();
    assert_eq!(
        began,
        Outcome::Claimed {
            gesture: "toolbar-drag".into(),
            recognizer: 0
        }
    );

    d.dispatch(&finger(Phase::Moved, 1, 260.0, 100.0, 16), &scene, &mut host)
        .unwrap();
    assert_eq!(d.state_of(TouchId(1)).map(|s| s.drag_dist()), Some(140.0));
    assert_eq!(host.drag_actions, 1, "moved fired the drag action");

    let ended = d
        .dispatch(&finger(Phase::Ended, 1, 260.0, 100.0, 32), &scene, &mut host)
        .unwrap();
    assert_eq!(ended, Outcome::Finished(Lifecycle::EndedDrag));
    assert_eq!(
        host.calls,
        [
            (TouchId(1), "toolbar-drag", Lifecycle::Began),
            (TouchId(1), "toolbar-drag", Lifecycle::EndedDrag),
        ]
    );
}

#[test]
fn block_zone_vetoes_lower_priority_tap() {
    let mut scene = Scene::new();
    scene.insert(None, node(10.0, 10.0, BLOCK_ZONE));

    let tap_built = Rc::new(RefCell::new(0_u32));
    let mut recognizers = Recognizers::new();
    let counter = tap_built.clone();
    recognizers
        .push("block-zone", |ctx: &Ctx<'_>| {
            let query = Query::capable(BLOCK_ZONE).near(ctx.position()).too_far(20.0);
            Ok(ctx.find(&query).map(|_| Gesture::new("block-zone")))
        })
        .push("normal-tap", move |_: &Ctx<'_>| {
            *counter.borrow_mut() += 1;
            Ok(Some(recording("normal-tap")))
        });
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    let began = d
        .dispatch(&finger(Phase::Began, 1, 10.0, 10.0, 0), &scene, &mut host)
        .unwrap();
    assert_eq!(
        began,
        Outcome::Claimed {
            gesture: "block-zone".into(),
            recognizer: 0
        }
    );
    assert_eq!(d.gesture_of(TouchId(1)), Some("block-zone"));

    let ended = d
        .dispatch(&finger(Phase::Ended, 1, 10.0, 10.0, 20), &scene, &mut host)
        .unwrap();
    assert_eq!(ended, Outcome::Finished(Lifecycle::Ended));
    assert_eq!(*tap_built.borrow(), 0, "lower priority was never asked");
    assert!(host.calls.is_empty(), "veto gesture has no effect");
    assert_eq!(d.binding_count(), 0);
}

#[test]
fn unclaimed_touch_drops_later_samples() {
    let mut scene = Scene::new();
    scene.insert(None, node(500.0, 500.0, TOOLBAR));

    let mut recognizers = Recognizers::new();
    recognizers.push("toolbar", |ctx: &Ctx<'_>| {
        let query = Query::capable(TOOLBAR).near(ctx.position()).too_far(50.0);
        Ok(ctx.find(&query).map(|_| recording("toolbar")))
    });
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    let began = d
        .dispatch(&finger(Phase::Began, 3, 0.0, 0.0, 0), &scene, &mut host)
        .unwrap();
    assert_eq!(began, Outcome::Unclaimed);
    assert!(!d.is_bound(TouchId(3)), "left unbound");

    for (phase, t) in [(Phase::Moved, 8), (Phase::Moved, 16), (Phase::Ended, 24)] {
        let outcome = d
            .dispatch(&finger(phase, 3, 5.0, 5.0, t), &scene, &mut host)
            .unwrap();
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::Unbound));
    }
    assert!(host.calls.is_empty(), "no handler ran");
    assert_eq!(d.live_count(), 0, "ended forgets the live touch");
}

#[test]
fn first_registered_recognizer_wins() {
    let scene = Scene::new();
    let mut recognizers = Recognizers::new();
    recognizers
        .push("r1", |_: &Ctx<'_>| Ok(Some(recording("r1"))))
        .push("r2", |_: &Ctx<'_>| Ok(Some(recording("r2"))));
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    for id in 1..=4 {
        d.dispatch(&finger(Phase::Began, id, 0.0, 0.0, 0), &scene, &mut host)
            .unwrap();
        d.dispatch(&finger(Phase::Ended, id, 0.0, 0.0, 1), &scene, &mut host)
            .unwrap();
    }
    assert!(
        host.calls.iter().all(|(_, name, _)| *name == "r1"),
        "r2 never bound"
    );
    assert_eq!(host.calls.len(), 8);
}

#[test]
fn every_touch_sees_exactly_one_terminal() {
    let scene = Scene::new();
    let mut recognizers = Recognizers::new();
    recognizers.push("odd", |ctx: &Ctx<'_>| {
        Ok((ctx.id().0 % 2 == 1).then(|| recording("odd")))
    });
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    // Interleaved touches with a duplicate began, stray samples, a cancel,
    // and a release after cancellation.
    let script = [
        finger(Phase::Began, 1, 0.0, 0.0, 0),
        finger(Phase::Began, 2, 0.0, 0.0, 1),
        finger(Phase::Began, 3, 0.0, 0.0, 2),
        finger(Phase::Moved, 1, 1.0, 0.0, 3),
        finger(Phase::Began, 1, 9.0, 9.0, 4),
        finger(Phase::Moved, 2, 1.0, 0.0, 5),
        finger(Phase::Moved, 3, 2.0, 0.0, 6),
        finger(Phase::Cancelled, 3, 2.0, 0.0, 7),
        finger(Phase::Ended, 3, 2.0, 0.0, 8),
        finger(Phase::Moved, 1, 2.0, 0.0, 9),
        finger(Phase::Ended, 2, 1.0, 0.0, 10),
        finger(Phase::Ended, 1, 2.0, 0.0, 11),
        finger(Phase::Ended, 1, 2.0, 0.0, 12),
        finger(Phase::Began, 5, 0.0, 0.0, 13),
    ];
    for event in &script {
        d.dispatch(event, &scene, &mut host).unwrap();
    }
    d.cancel_all(&scene, &mut host);

    let mut per_touch: BTreeMap<u64, Vec<Lifecycle>> = BTreeMap::new();
    for (id, _, lifecycle) in &host.calls {
        per_touch.entry(id.0).or_default().push(*lifecycle);
    }
    assert_eq!(
        per_touch,
        BTreeMap::from([
            (
                1,
                vec![
                    Lifecycle::Began,
                    Lifecycle::Moved,
                    Lifecycle::Moved,
                    Lifecycle::Ended
                ]
            ),
            (3, vec![Lifecycle::Began, Lifecycle::Moved, Lifecycle::Cancelled]),
            (5, vec![Lifecycle::Began, Lifecycle::Cancelled]),
        ])
    );
    for calls in per_touch.values() {
        assert_eq!(calls.first(), Some(&Lifecycle::Began));
        assert_eq!(
            calls.iter().filter(|l| l.is_terminal()).count(),
            1,
            "one terminal"
        );
        assert!(
            calls.last().is_some_and(|l| l.is_terminal()),
            "terminal comes last"
        );
    }
}

#[test]
fn drag_dist_sums_steps_and_resets_per_binding() {
    let scene = Scene::new();
    let mut recognizers = Recognizers::new();
    recognizers.push("track", |_: &Ctx<'_>| Ok(Some(Gesture::new("track"))));
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    let path = [(0.0, 0.0), (3.0, 4.0), (3.0, 10.0), (0.0, 6.0), (0.0, 6.0)];
    d.dispatch(&finger(Phase::Began, 1, path[0].0, path[0].1, 0), &scene, &mut host)
        .unwrap();
    let mut expected = 0.0;
    for pair in path.windows(2) {
        let (from, to) = (Point::from(pair[0]), Point::from(pair[1]));
        expected += from.distance(to);
        d.dispatch(&finger(Phase::Moved, 1, to.x, to.y, 1), &scene, &mut host)
            .unwrap();
        assert_eq!(d.state_of(TouchId(1)).map(|s| s.drag_dist()), Some(expected));
    }
    assert_eq!(expected, 16.0);

    d.dispatch(&finger(Phase::Ended, 1, 0.0, 6.0, 2), &scene, &mut host)
        .unwrap();
    d.dispatch(&finger(Phase::Began, 1, 50.0, 50.0, 3), &scene, &mut host)
        .unwrap();
    assert_eq!(
        d.state_of(TouchId(1)).map(|s| s.drag_dist()),
        Some(0.0),
        "fresh binding starts at zero"
    );
}

#[test]
fn repeated_began_does_not_rebind() {
    let scene = Scene::new();
    let built = Rc::new(RefCell::new(0_u32));
    let counter = built.clone();
    let mut recognizers = Recognizers::new();
    recognizers.push("tap", move |_: &Ctx<'_>| {
        *counter.borrow_mut() += 1;
        Ok(Some(recording("tap")))
    });
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    d.dispatch(&finger(Phase::Began, 7, 0.0, 0.0, 0), &scene, &mut host)
        .unwrap();
    d.dispatch(&finger(Phase::Moved, 7, 4.0, 0.0, 1), &scene, &mut host)
        .unwrap();
    let again = d
        .dispatch(&finger(Phase::Began, 7, 0.0, 0.0, 2), &scene, &mut host)
        .unwrap();

    assert_eq!(again, Outcome::Ignored(IgnoreReason::AlreadyBound));
    assert_eq!(*built.borrow(), 1, "recognizers not re-run");
    assert_eq!(d.state_of(TouchId(7)).map(|s| s.drag_dist()), Some(4.0));
    assert_eq!(
        host.calls,
        [
            (TouchId(7), "tap", Lifecycle::Began),
            (TouchId(7), "tap", Lifecycle::Moved),
        ]
    );
}

#[test]
fn recognizer_failure_only_affects_its_touch() {
    let scene = Scene::new();
    let mut recognizers = Recognizers::new();
    recognizers
        .push("picky", |ctx: &Ctx<'_>| {
            if ctx.id() == TouchId(2) {
                Err(RecognizerError::new("lost the scene"))
            } else {
                Ok(None)
            }
        })
        .push("tap", |_: &Ctx<'_>| Ok(Some(recording("tap"))));
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    d.dispatch(&finger(Phase::Began, 1, 0.0, 0.0, 0), &scene, &mut host)
        .unwrap();
    let err = d
        .dispatch(&finger(Phase::Began, 2, 0.0, 0.0, 1), &scene, &mut host)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "recognizer `picky` failed for touch #2: lost the scene"
    );
    assert!(!d.is_bound(TouchId(2)), "failed closed");
    assert!(d.is_bound(TouchId(1)), "other touch untouched");

    let stray = d
        .dispatch(&finger(Phase::Ended, 2, 0.0, 0.0, 2), &scene, &mut host)
        .unwrap();
    assert_eq!(stray, Outcome::Ignored(IgnoreReason::Unbound));
    d.dispatch(&finger(Phase::Ended, 1, 0.0, 0.0, 3), &scene, &mut host)
        .unwrap();
    assert_eq!(
        host.calls,
        [
            (TouchId(1), "tap", Lifecycle::Began),
            (TouchId(1), "tap", Lifecycle::Ended),
        ]
    );
}

#[test]
fn held_finger_makes_pencil_pseudo() {
    let scene = Scene::new();
    let mut recognizers = Recognizers::new();
    recognizers
        .push("pseudo-pencil", |ctx: &Ctx<'_>| {
            let claim = ctx.kind() == PointerKind::Pencil && ctx.pseudo();
            Ok(claim.then(|| recording("pseudo-pencil")))
        })
        .push("ink", |ctx: &Ctx<'_>| {
            Ok((ctx.kind() == PointerKind::Pencil).then(|| recording("ink")))
        });
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    d.dispatch(&pencil(Phase::Began, 1, 0.0, 0.0, 0), &scene, &mut host)
        .unwrap();
    assert_eq!(d.gesture_of(TouchId(1)), Some("ink"));
    d.dispatch(&pencil(Phase::Ended, 1, 0.0, 0.0, 5), &scene, &mut host)
        .unwrap();

    // The finger is claimed by nobody but still counts while it is down.
    let finger_down = d
        .dispatch(&finger(Phase::Began, 2, 300.0, 300.0, 10), &scene, &mut host)
        .unwrap();
    assert_eq!(finger_down, Outcome::Unclaimed);
    d.dispatch(&pencil(Phase::Began, 3, 0.0, 0.0, 20), &scene, &mut host)
        .unwrap();
    assert_eq!(d.gesture_of(TouchId(3)), Some("pseudo-pencil"));
    assert_eq!(d.state_of(TouchId(3)).map(|s| s.pseudo_count()), Some(1));
}

#[test]
fn second_finger_joins_first_through_shared_state() {
    #[derive(Default)]
    struct Pinch {
        anchor: Option<TouchId>,
        pairs: Vec<(TouchId, TouchId)>,
    }

    let mut scene = Scene::new();
    scene.insert(None, node(0.0, 0.0, HANDLE));
    let pinch = Rc::new(RefCell::new(Pinch::default()));

    let mut recognizers = Recognizers::new();
    let shared = pinch.clone();
    recognizers.push("second-finger", move |_: &Ctx<'_>| {
        let Some(anchor) = shared.borrow().anchor else {
            return Ok(None);
        };
        let shared = shared.clone();
        Ok(Some(Gesture::new("pinch-partner").began(move |ctx: &mut Ctx<'_>| {
            shared.borrow_mut().pairs.push((anchor, ctx.id()));
        })))
    });
    let shared = pinch.clone();
    recognizers.push("handle", move |ctx: &Ctx<'_>| {
        let query = Query::capable(HANDLE).near(ctx.position()).too_far(10.0);
        if ctx.find(&query).is_none() {
            return Ok(None);
        }
        let on_begin = shared.clone();
        let on_end = shared.clone();
        Ok(Some(
            Gesture::new("handle")
                .began(move |ctx: &mut Ctx<'_>| on_begin.borrow_mut().anchor = Some(ctx.id()))
                .ended(move |_| on_end.borrow_mut().anchor = None),
        ))
    });
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    d.dispatch(&finger(Phase::Began, 1, 2.0, 2.0, 0), &scene, &mut host)
        .unwrap();
    assert_eq!(d.gesture_of(TouchId(1)), Some("handle"));
    d.dispatch(&finger(Phase::Began, 2, 80.0, 80.0, 5), &scene, &mut host)
        .unwrap();
    assert_eq!(d.gesture_of(TouchId(2)), Some("pinch-partner"));
    assert_eq!(pinch.borrow().pairs, [(TouchId(1), TouchId(2))]);

    d.dispatch(&finger(Phase::Ended, 1, 2.0, 2.0, 10), &scene, &mut host)
        .unwrap();
    d.dispatch(&finger(Phase::Ended, 2, 80.0, 80.0, 10), &scene, &mut host)
        .unwrap();
    let lone = d
        .dispatch(&finger(Phase::Began, 3, 80.0, 80.0, 20), &scene, &mut host)
        .unwrap();
    assert_eq!(lone, Outcome::Unclaimed, "no anchor, no partner");
}

#[test]
fn gesture_data_carries_between_calls() {
    struct Grab {
        origin: Point,
        moves: u32,
    }

    let scene = Scene::new();
    let finished = Rc::new(RefCell::new(None));
    let sink = finished.clone();
    let mut recognizers = Recognizers::new();
    recognizers.push("grab", move |_: &Ctx<'_>| {
        let sink = sink.clone();
        Ok(Some(
            Gesture::new("grab")
                .began(|ctx: &mut Ctx<'_>| {
                    let origin = ctx.position();
                    ctx.state.set_data(Grab { origin, moves: 0 });
                })
                .moved(|ctx| {
                    if let Some(grab) = ctx.state.data_mut::<Grab>() {
                        grab.moves += 1;
                    }
                })
                .ended(move |ctx| {
                    let end = ctx.position();
                    if let Some(grab) = ctx.state.take_data::<Grab>() {
                        *sink.borrow_mut() = Some((end - grab.origin, grab.moves));
                    }
                }),
        ))
    });
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    d.dispatch(&finger(Phase::Began, 1, 10.0, 10.0, 0), &scene, &mut host)
        .unwrap();
    d.dispatch(&finger(Phase::Moved, 1, 12.0, 10.0, 1), &scene, &mut host)
        .unwrap();
    d.dispatch(&finger(Phase::Moved, 1, 15.0, 14.0, 2), &scene, &mut host)
        .unwrap();
    d.dispatch(&finger(Phase::Ended, 1, 15.0, 14.0, 3), &scene, &mut host)
        .unwrap();

    assert_eq!(*finished.borrow(), Some((kurbo::Vec2::new(5.0, 4.0), 2)));
}

#[test]
fn host_singletons_reach_recognizers_and_handlers() {
    let scene = Scene::new();
    let mut recognizers = Recognizers::new();
    recognizers
        .push("meta", |ctx: &Ctx<'_>| {
            Ok(ctx.host.meta_mode.then(|| {
                Gesture::new("meta").ended(|ctx: &mut Ctx<'_>| ctx.host.meta_mode = false)
            }))
        })
        .push("plain", |_: &Ctx<'_>| Ok(Some(Gesture::new("plain"))));
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host {
        meta_mode: true,
        ..Host::default()
    };

    d.dispatch(&finger(Phase::Began, 1, 0.0, 0.0, 0), &scene, &mut host)
        .unwrap();
    assert_eq!(d.gesture_of(TouchId(1)), Some("meta"));
    d.dispatch(&finger(Phase::Ended, 1, 0.0, 0.0, 1), &scene, &mut host)
        .unwrap();
    assert!(!host.meta_mode, "handler toggled the host flag");

    d.dispatch(&finger(Phase::Began, 2, 0.0, 0.0, 2), &scene, &mut host)
        .unwrap();
    assert_eq!(d.gesture_of(TouchId(2)), Some("plain"));
}

#[test]
fn frame_drops_malformed_samples_and_keeps_going() {
    let scene = Scene::new();
    let mut recognizers = Recognizers::new();
    recognizers.push("tap", |_: &Ctx<'_>| Ok(Some(recording("tap"))));
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    let mut frame = Frame::new();
    frame.push(
        TouchId(1),
        RawSample::new(PointerKind::Finger, Phase::Began, 0.0, 0.0, 0),
    );
    frame.push(
        TouchId(2),
        RawSample {
            kind: None,
            ..RawSample::new(PointerKind::Finger, Phase::Began, 5.0, 5.0, 0)
        },
    );
    frame.push(
        TouchId(1),
        RawSample::new(PointerKind::Finger, Phase::Moved, 3.0, 4.0, 8),
    );
    frame.push(
        TouchId(2),
        RawSample::new(PointerKind::Finger, Phase::Moved, f64::NAN, 5.0, 8),
    );

    let report = d.dispatch_frame(&frame, &scene, &mut host);
    assert!(!report.is_clean(), "two samples were dropped");
    assert_eq!(report.claimed().collect::<Vec<_>>(), [TouchId(1)]);
    assert_eq!(
        report.outcomes,
        [
            (
                TouchId(1),
                Outcome::Claimed {
                    gesture: "tap".into(),
                    recognizer: 0
                }
            ),
            (TouchId(1), Outcome::Delivered(Lifecycle::Moved)),
        ]
    );
    let reasons: Vec<_> = report
        .errors
        .iter()
        .map(|err| match err {
            DispatchError::Malformed(m) => (m.id, m.reason),
            other => panic!("unexpected error: {other}"),
        })
        .collect();
    assert_eq!(
        reasons,
        [
            (TouchId(2), MalformedReason::MissingKind),
            (TouchId(2), MalformedReason::NonFinitePosition),
        ]
    );
    assert_eq!(d.state_of(TouchId(1)).map(|s| s.drag_dist()), Some(5.0));

    let mut release = Frame::new();
    release.push(
        TouchId(1),
        RawSample::new(PointerKind::Finger, Phase::Ended, 3.0, 4.0, 16),
    );
    let report = d.dispatch_frame(&release, &scene, &mut host);
    assert!(report.is_clean(), "nothing dropped");
    assert_eq!(
        report.outcomes,
        [(TouchId(1), Outcome::Finished(Lifecycle::Ended))]
    );
}

#[test]
fn cancel_reports_last_known_position() {
    let scene = Scene::new();
    let seen = Rc::new(RefCell::new(None));
    let sink = seen.clone();
    let mut recognizers = Recognizers::new();
    recognizers.push("watch", move |_: &Ctx<'_>| {
        let sink = sink.clone();
        Ok(Some(Gesture::new("watch").cancelled(move |ctx: &mut Ctx<'_>| {
            *sink.borrow_mut() = Some((ctx.event.phase, ctx.position(), ctx.event.timestamp));
        })))
    });
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    d.dispatch(&pencil(Phase::Began, 1, 0.0, 0.0, 0), &scene, &mut host)
        .unwrap();
    d.dispatch(&pencil(Phase::Moved, 1, 7.0, 3.0, 40), &scene, &mut host)
        .unwrap();
    assert!(d.cancel(TouchId(1), &scene, &mut host), "was bound");
    assert_eq!(
        *seen.borrow(),
        Some((Phase::Cancelled, Point::new(7.0, 3.0), 40))
    );
    assert!(!d.is_live(TouchId(1)), "cancel forgets the touch");
}

#[test]
fn frame_keeps_arrival_order_across_touches() {
    let scene = Scene::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let mut recognizers = Recognizers::new();
    recognizers.push("watch", move |ctx: &Ctx<'_>| {
        sink.borrow_mut().push((ctx.id().0, ctx.pseudo_count()));
        Ok(None)
    });
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    // The finger lifts after the pencil lands, so the pencil sees it.
    let frame: Frame = [
        (
            TouchId(1),
            RawSample::new(PointerKind::Finger, Phase::Began, 0.0, 0.0, 0),
        ),
        (
            TouchId(2),
            RawSample::new(PointerKind::Pencil, Phase::Began, 50.0, 50.0, 1),
        ),
        (
            TouchId(1),
            RawSample::new(PointerKind::Finger, Phase::Ended, 0.0, 0.0, 2),
        ),
    ]
    .into_iter()
    .collect();

    let report = d.dispatch_frame(&frame, &scene, &mut host);
    assert!(report.is_clean(), "nothing dropped");
    assert_eq!(*seen.borrow(), [(1, 0), (2, 1)]);
    assert_eq!(
        report.outcomes,
        [
            (TouchId(1), Outcome::Unclaimed),
            (TouchId(2), Outcome::Unclaimed),
            (TouchId(1), Outcome::Ignored(IgnoreReason::Unbound)),
        ]
    );
    assert!(!d.is_live(TouchId(1)), "finger lifted");
    assert!(d.is_live(TouchId(2)), "pencil still down");
}

#[test]
fn flick_release_updates_state_before_handler() {
    let scene = Scene::new();
    let seen = Rc::new(RefCell::new(None));
    let sink = seen.clone();
    let mut recognizers = Recognizers::new();
    recognizers.push("flick", move |_: &Ctx<'_>| {
        let sink = sink.clone();
        Ok(Some(
            recording("flick")
                .with_drag_threshold(10.0)
                .ended_drag(move |ctx: &mut Ctx<'_>| {
                    *sink.borrow_mut() = Some((
                        ctx.state.position(),
                        ctx.state.drag_dist(),
                        ctx.state.last_timestamp(),
                    ));
                }),
        ))
    });
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    d.dispatch(&finger(Phase::Began, 1, 0.0, 0.0, 0), &scene, &mut host)
        .unwrap();
    let ended = d
        .dispatch(&finger(Phase::Ended, 1, 200.0, 0.0, 8), &scene, &mut host)
        .unwrap();

    assert_eq!(ended, Outcome::Finished(Lifecycle::EndedDrag));
    assert_eq!(*seen.borrow(), Some((Point::new(200.0, 0.0), 200.0, 8)));
}

#[test]
fn cancelling_lost_contact_stops_pseudo_counting() {
    let scene = Scene::new();
    let mut recognizers = Recognizers::new();
    recognizers.push("ink", |ctx: &Ctx<'_>| {
        Ok((ctx.kind() == PointerKind::Pencil).then(|| recording("ink")))
    });
    let mut d = Dispatcher::new(recognizers);
    let mut host = Host::default();

    // The finger's `Ended` never arrives.
    let down = d
        .dispatch(&finger(Phase::Began, 1, 0.0, 0.0, 0), &scene, &mut host)
        .unwrap();
    assert_eq!(down, Outcome::Unclaimed);
    assert!(d.is_live(TouchId(1)), "unclaimed touches are live");

    assert!(!d.cancel(TouchId(1), &scene, &mut host), "nothing was bound");
    assert!(!d.is_live(TouchId(1)), "cancel forgets the touch");
    assert_eq!(d.live_count(), 0);

    d.dispatch(&pencil(Phase::Began, 2, 10.0, 10.0, 500), &scene, &mut host)
        .unwrap();
    assert_eq!(d.state_of(TouchId(2)).map(|s| s.pseudo_count()), Some(0));
    assert_eq!(host.calls, [(TouchId(2), "ink", Lifecycle::Began)]);
}
