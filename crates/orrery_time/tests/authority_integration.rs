//! Behavioural tests for the time authority's continuity and delivery guarantees.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use approx::assert_relative_eq;
use orrery_error::ErrorCode;
use orrery_time::{J2000_JD, TickOutcome, TimeAuthority, TimeContinuityConstraints};

fn authority() -> TimeAuthority {
    TimeAuthority::new(J2000_JD).expect("default authority")
}

#[test]
fn set_time_within_jump_succeeds_and_notifies() {
    let ta = authority();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = ta.subscribe(move |jd| {
        sink.borrow_mut().push(jd);
        Ok(())
    });

    ta.set_time(J2000_JD + 100.0).unwrap();
    assert_eq!(ta.current_julian_date(), J2000_JD + 100.0);
    // Initial delivery on subscribe, then the committed change.
    assert_eq!(*seen.borrow(), vec![J2000_JD, J2000_JD + 100.0]);
}

#[test]
fn jump_just_over_limit_is_discontinuity() {
    let ta = authority();
    let max = ta.constraints().max_time_jump_days;
    let err = ta.set_time(J2000_JD + max + 0.001).unwrap_err();
    assert_eq!(err.code, ErrorCode::TimeDiscontinuity);
    assert_eq!(ta.current_julian_date(), J2000_JD);
}

#[test]
fn jump_exactly_at_limit_is_allowed() {
    let ta = authority();
    let max = ta.constraints().max_time_jump_days;
    ta.set_time(J2000_JD - max).unwrap();
    assert_eq!(ta.current_julian_date(), J2000_JD - max);
}

#[test]
fn failed_set_time_does_not_notify() {
    let ta = authority();
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    let _sub = ta.subscribe(move |_| {
        c.set(c.get() + 1);
        Ok(())
    });
    assert_eq!(count.get(), 1);

    assert!(ta.set_time(J2000_JD + 10_000.0).is_err());
    assert!(ta.set_time(0.0).is_err());
    assert_eq!(count.get(), 1);
}

#[test]
fn set_time_property_over_grid() {
    let constraints = TimeContinuityConstraints::DEFAULT;
    let offsets = [-5000.0, -3652.5, -10.0, 0.0, 0.5, 3652.4, 3652.6, 40_000.0];
    for offset in offsets {
        let ta = authority();
        let target = J2000_JD + offset;
        let expected_ok =
            constraints.contains(target) && offset.abs() <= constraints.max_time_jump_days;
        let result = ta.set_time(target);
        assert_eq!(result.is_ok(), expected_ok, "offset {offset}: {result:?}");
        if expected_ok {
            assert_eq!(ta.current_julian_date(), target);
        } else {
            assert_eq!(ta.current_julian_date(), J2000_JD);
        }
    }
}

#[test]
fn subscribers_notified_in_registration_order_despite_failure() {
    let ta = authority();
    let order = Rc::new(RefCell::new(Vec::new()));

    let o1 = Rc::clone(&order);
    let _a = ta.subscribe(move |_| {
        o1.borrow_mut().push("a");
        Ok(())
    });
    let o2 = Rc::clone(&order);
    let _b = ta.subscribe(move |_| {
        o2.borrow_mut().push("b");
        Err("renderer lost its context".into())
    });
    let o3 = Rc::clone(&order);
    let _c = ta.subscribe(move |_| {
        o3.borrow_mut().push("c");
        Ok(())
    });

    order.borrow_mut().clear();
    ta.set_time(J2000_JD + 1.0).unwrap();
    assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
}

#[test]
fn unsubscribe_halts_future_delivery() {
    let ta = authority();
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    let sub = ta.subscribe(move |_| {
        c.set(c.get() + 1);
        Ok(())
    });
    ta.set_time(J2000_JD + 1.0).unwrap();
    assert_eq!(count.get(), 2);

    assert!(sub.unsubscribe());
    assert!(!sub.unsubscribe());
    ta.set_time(J2000_JD + 2.0).unwrap();
    assert_eq!(count.get(), 2);
    assert_eq!(ta.subscriber_count(), 0);
}

#[test]
fn callback_can_read_authority_during_delivery() {
    let ta = Rc::new(authority());
    let observed = Rc::new(Cell::new(0.0));
    let weak = Rc::downgrade(&ta);
    let o = Rc::clone(&observed);
    let _sub = ta.subscribe(move |jd| {
        if let Some(ta) = weak.upgrade() {
            assert_eq!(ta.current_julian_date(), jd);
        }
        o.set(jd);
        Ok(())
    });
    ta.set_time(J2000_JD + 3.0).unwrap();
    assert_eq!(observed.get(), J2000_JD + 3.0);
}

#[test]
fn tick_clamps_to_max_jump() {
    let ta = authority();
    ta.set_time_speed(1.0e7).unwrap();
    ta.start();
    // 1e7 × 1 day of real time would be ~1e7 days; clamp to max jump.
    let outcome = ta.tick(Duration::from_secs(86_400));
    let max = ta.constraints().max_time_jump_days;
    match outcome {
        TickOutcome::Advanced { julian_date } => {
            assert_relative_eq!(julian_date, J2000_JD + max, epsilon = 1e-9);
        }
        other => panic!("expected advance, got {other:?}"),
    }
}

#[test]
fn out_of_bounds_tick_is_dropped_silently() {
    let constraints = TimeContinuityConstraints::DEFAULT;
    let ta = TimeAuthority::new(constraints.max_julian_date - 0.5).unwrap();
    ta.set_time_speed(86_400.0).unwrap();
    ta.start();

    let outcome = ta.tick(Duration::from_secs(1));
    assert!(matches!(outcome, TickOutcome::Dropped { .. }), "{outcome:?}");
    assert_eq!(ta.current_julian_date(), constraints.max_julian_date - 0.5);
    assert!(ta.is_running());
}

#[test]
fn tiny_ticks_accumulate_until_precision() {
    let ta = authority();
    ta.set_time_speed(1.0).unwrap();
    ta.start();

    // 0.5 ms of real time at 1× is ~5.8e-9 days, under the 1e-8 precision.
    let first = ta.tick(Duration::from_micros(500));
    assert!(matches!(first, TickOutcome::Accumulated { .. }), "{first:?}");
    assert_eq!(ta.current_julian_date(), J2000_JD);

    let second = ta.tick(Duration::from_micros(500));
    assert!(matches!(second, TickOutcome::Advanced { .. }), "{second:?}");
    assert!(ta.current_julian_date() > J2000_JD);
}

#[test]
fn zero_speed_never_advances() {
    let ta = authority();
    ta.set_time_speed(0.0).unwrap();
    ta.start();
    for _ in 0..10 {
        ta.tick(Duration::from_secs(1));
    }
    assert_eq!(ta.current_julian_date(), J2000_JD);
}

#[test]
fn panicking_subscriber_does_not_escape_set_time() {
    let ta = authority();
    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    let _bad = ta.subscribe(move |_| {
        c.set(c.get() + 1);
        if c.get() == 2 {
            panic!("subscriber blew up");
        }
        Ok(())
    });
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _good = ta.subscribe(move |jd| {
        sink.borrow_mut().push(jd);
        Ok(())
    });

    assert!(ta.set_time(J2000_JD + 1.0).is_ok());
    assert_eq!(ta.current_julian_date(), J2000_JD + 1.0);
    assert_eq!(calls.get(), 2);
    assert_eq!(*seen.borrow(), vec![J2000_JD, J2000_JD + 1.0]);

    // The panicking subscriber stays registered and keeps receiving.
    ta.set_time(J2000_JD + 2.0).unwrap();
    assert_eq!(calls.get(), 3);
    assert_eq!(seen.borrow().last().copied(), Some(J2000_JD + 2.0));
}

#[test]
fn reentrant_set_time_leaves_every_subscriber_on_latest_epoch() {
    let ta = Rc::new(authority());
    let handle: Weak<TimeAuthority> = Rc::downgrade(&ta);
    let _first = ta.subscribe(move |jd| {
        if jd == J2000_JD + 1.0 {
            if let Some(ta) = handle.upgrade() {
                ta.set_time(J2000_JD + 2.0)?;
            }
        }
        Ok(())
    });
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _second = ta.subscribe(move |jd| {
        sink.borrow_mut().push(jd);
        Ok(())
    });

    ta.set_time(J2000_JD + 1.0).unwrap();
    assert_eq!(ta.current_julian_date(), J2000_JD + 2.0);
    let seen = seen.borrow();
    assert_eq!(seen.last().copied(), Some(ta.current_julian_date()));
    // The superseded epoch never reaches the second subscriber.
    assert_eq!(*seen, vec![J2000_JD, J2000_JD + 2.0]);
}
