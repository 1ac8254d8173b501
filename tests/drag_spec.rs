use speculate2::speculate;
use uuid::Uuid;
use value_canvas::drag::{DragController, DragOutcome, DragState};
use value_canvas::models::*;
use value_canvas::{Canvas, CanvasError, CanvasEvent};

/// Two pooled features and two steps.
fn setup() -> (Canvas, [Uuid; 2], [Uuid; 2]) {
    let features = [Uuid::new_v4(), Uuid::new_v4()];
    let steps = [Uuid::new_v4(), Uuid::new_v4()];

    let mut canvas = Canvas::new();
    canvas
        .load(WorkspaceSnapshot {
            features: vec![
                Feature::new(features[0], "Checkout"),
                Feature::new(features[1], "Wishlist"),
            ],
            steps: vec![
                JourneyStep::new(steps[0], 0, "Browse"),
                JourneyStep::new(steps[1], 1, "Buy"),
            ],
            actors: vec![],
            synthesis: None,
        })
        .expect("Failed to load");
    canvas.take_events();
    (canvas, features, steps)
}

speculate! {
    before {
        let (mut canvas, features, steps) = setup();
    }

    describe "lift" {
        it "enters Lifted without touching the store" {
            let before = canvas.store().snapshot();
            canvas.lift(features[0]).expect("lift failed");

            assert_eq!(canvas.drag_state(), DragState::Lifted { feature_id: features[0] });
            assert_eq!(canvas.store().snapshot(), before);
        }

        it "rejects a second session while one is lifted" {
            canvas.lift(features[0]).expect("lift failed");
            let result = canvas.lift(features[1]);

            assert_eq!(result, Err(CanvasError::SessionConflict { active: features[0] }));
            assert_eq!(canvas.drag_state().feature_id(), Some(features[0]));
        }

        it "rejects a second session while one is hovering" {
            canvas.lift(features[0]).expect("lift failed");
            canvas.hover(Some(AssignTarget::Step(steps[0])));

            assert!(matches!(canvas.lift(features[0]), Err(CanvasError::SessionConflict { .. })));
        }

        it "rejects an unknown feature without starting a session" {
            let unknown = Uuid::new_v4();
            assert_eq!(canvas.lift(unknown), Err(CanvasError::unknown_feature(unknown)));
            assert_eq!(canvas.drag_state(), DragState::Idle);
        }
    }

    describe "hover" {
        it "keeps only the latest candidate" {
            canvas.lift(features[0]).expect("lift failed");
            canvas.hover(Some(AssignTarget::Step(steps[0])));
            canvas.hover(None);
            canvas.hover(Some(AssignTarget::Step(steps[1])));

            assert_eq!(canvas.drag_state(), DragState::Hovering {
                feature_id: features[0],
                candidate: Some(AssignTarget::Step(steps[1])),
            });
        }

        it "is ignored when idle" {
            canvas.hover(Some(AssignTarget::Step(steps[0])));
            assert_eq!(canvas.drag_state(), DragState::Idle);
        }
    }

    describe "release" {
        it "commits over a step and returns to idle" {
            canvas.lift(features[0]).expect("lift failed");
            canvas.hover(Some(AssignTarget::Step(steps[1])));
            let outcome = canvas.release().expect("release failed");

            let DragOutcome::Committed(result) = outcome else {
                panic!("expected a commit, got {:?}", outcome);
            };
            assert!(result.changed);
            assert_eq!(result.new_step_id, Some(steps[1]));
            assert_eq!(canvas.drag_state(), DragState::Idle);
            assert_eq!(canvas.take_events(), vec![CanvasEvent::FeatureMoved(result)]);
        }

        it "commits over the pool" {
            canvas.assign(features[0], AssignTarget::Step(steps[0])).expect("assign failed");
            canvas.lift(features[0]).expect("lift failed");
            canvas.hover(Some(AssignTarget::Unassigned));
            canvas.release().expect("release failed");

            assert_eq!(canvas.store().step_of(features[0]), Ok(None));
        }

        it "reports an unchanged commit when dropped where it started" {
            canvas.lift(features[1]).expect("lift failed");
            canvas.hover(Some(AssignTarget::Unassigned));
            let outcome = canvas.release().expect("release failed");

            assert!(matches!(outcome, DragOutcome::Committed(r) if !r.changed));
            assert!(canvas.take_events().is_empty());
        }

        it "cancels when released over no target" {
            canvas.lift(features[0]).expect("lift failed");
            canvas.hover(Some(AssignTarget::Step(steps[0])));
            canvas.hover(None);
            let outcome = canvas.release().expect("release failed");

            assert_eq!(outcome, DragOutcome::Cancelled { feature_id: features[0] });
            assert_eq!(canvas.store().step_of(features[0]), Ok(None));
            assert_eq!(canvas.drag_state(), DragState::Idle);
        }

        it "cancels when released without ever hovering" {
            canvas.lift(features[0]).expect("lift failed");
            assert_eq!(
                canvas.release().expect("release failed"),
                DragOutcome::Cancelled { feature_id: features[0] }
            );
        }

        it "returns to idle even when the commit fails" {
            let unknown = Uuid::new_v4();
            canvas.lift(features[0]).expect("lift failed");
            canvas.hover(Some(AssignTarget::Step(unknown)));

            assert_eq!(canvas.release(), Err(CanvasError::unknown_step(unknown)));
            assert_eq!(canvas.drag_state(), DragState::Idle);
            canvas.lift(features[1]).expect("a new session should start");
        }

        it "reports no session when idle" {
            assert_eq!(canvas.release(), Ok(DragOutcome::NoSession));
        }

        it "allows a new session right after a commit" {
            canvas.lift(features[0]).expect("lift failed");
            canvas.hover(Some(AssignTarget::Step(steps[0])));
            canvas.release().expect("release failed");

            canvas.lift(features[1]).expect("a new session should start");
        }
    }

    describe "cancel" {
        it "drops the session with no side effects" {
            let before = canvas.store().snapshot();
            canvas.lift(features[0]).expect("lift failed");
            canvas.hover(Some(AssignTarget::Step(steps[0])));

            assert_eq!(canvas.cancel_drag(), DragOutcome::Cancelled { feature_id: features[0] });
            assert_eq!(canvas.store().snapshot(), before);
            assert!(canvas.take_events().is_empty());
            canvas.lift(features[1]).expect("a new session should start");
        }

        it "is harmless when idle" {
            assert_eq!(canvas.cancel_drag(), DragOutcome::NoSession);
        }
    }

    describe "reload" {
        it "cancels an active session before replacing state" {
            canvas.lift(features[0]).expect("lift failed");
            canvas.hover(Some(AssignTarget::Step(steps[1])));

            let snapshot = canvas.store().snapshot();
            canvas.load(snapshot).expect("reload failed");

            assert_eq!(canvas.drag_state(), DragState::Idle);
            assert_eq!(canvas.release(), Ok(DragOutcome::NoSession));
            assert_eq!(canvas.store().step_of(features[0]), Ok(None));
        }

        it "leaves no session behind when the reload is rejected" {
            canvas.lift(features[1]).expect("lift failed");

            let orphan = Feature::new(Uuid::new_v4(), "Orphan").assigned_to(Uuid::new_v4());
            let result = canvas.load(WorkspaceSnapshot {
                features: vec![orphan],
                steps: vec![],
                actors: vec![],
                synthesis: None,
            });

            assert!(matches!(result, Err(CanvasError::UnknownEntity { .. })));
            assert!(!canvas.drag_state().is_active());
            canvas.lift(features[0]).expect("lift after failed reload");
        }
    }

    describe "controller without a canvas" {
        it "commits through the store it is given" {
            let mut store = value_canvas::store::EntityStore::new();
            let f = Uuid::new_v4();
            let s = Uuid::new_v4();
            store.load(
                vec![Feature::new(f, "Alerts")],
                vec![JourneyStep::new(s, 0, "Monitor")],
                vec![],
                None,
            ).expect("Failed to load");

            let mut drag = DragController::new();
            drag.lift(f).expect("lift failed");
            drag.hover(Some(AssignTarget::Step(s)));
            drag.release(&mut store).expect("release failed");

            assert!(!drag.is_active());
            assert_eq!(store.step_of(f), Ok(Some(s)));
        }
    }
}
