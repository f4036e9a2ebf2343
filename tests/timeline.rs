use std::{cell::RefCell, rc::Rc};

use rosu::timeline::{Timeline, TimelineError};
use test_case::test_case;

const SOUNDS: &str = "sounds";
const OBJECTS: &str = "objects";

fn recorder(timeline: &mut Timeline<&'static str, u32>) -> Rc<RefCell<Vec<u32>>> {
    let fired = Rc::new(RefCell::new(Vec::new()));

    let log = fired.clone();
    let _subscription = timeline.subscribe(SOUNDS, move |x| log.borrow_mut().push(*x));

    fired
}

#[test_case(99.0, 0; "before start")]
#[test_case(100.0, 1; "at start")]
#[test_case(199.0, 1; "just before end")]
#[test_case(200.0, 0; "at end")]
fn test_interval_containment(time: f64, expected: usize) {
    let mut timeline = Timeline::new();
    timeline.add(OBJECTS, 1u32, 100.0, Some(200.0)).unwrap();

    assert_eq!(timeline.get_all_at_time(time, OBJECTS).len(), expected);
}

#[test]
fn test_intervals_in_insertion_order() {
    let mut timeline = Timeline::new();
    timeline.add(OBJECTS, 2u32, 50.0, Some(500.0)).unwrap();
    timeline.add(OBJECTS, 1u32, 0.0, Some(500.0)).unwrap();
    timeline.add(OBJECTS, 3u32, 400.0, Some(500.0)).unwrap();

    assert_eq!(timeline.get_all_at_time(450.0, OBJECTS), vec![&2, &1, &3]);
}

#[test]
fn test_range_in_time_order_with_stable_ties() {
    let mut timeline = Timeline::new();
    timeline.add(SOUNDS, 30u32, 300.0, None).unwrap();
    timeline.add(SOUNDS, 10u32, 100.0, None).unwrap();
    timeline.add(SOUNDS, 11u32, 100.0, None).unwrap();
    timeline.add(SOUNDS, 20u32, 200.0, None).unwrap();

    assert_eq!(
        timeline.get_all_in_time_range(100.0, 300.0, SOUNDS),
        vec![&10, &11, &20, &30]
    );
    assert_eq!(timeline.get_all_in_time_range(101.0, 299.0, SOUNDS), vec![&20]);
    assert!(timeline.get_all_in_time_range(300.0, 100.0, SOUNDS).is_empty());
}

#[test]
fn test_points_and_intervals_dont_mix() {
    let mut timeline = Timeline::new();
    timeline.add(SOUNDS, 1u32, 100.0, None).unwrap();
    timeline.add(SOUNDS, 2u32, 0.0, Some(1000.0)).unwrap();

    assert_eq!(timeline.get_all_at_time(100.0, SOUNDS), vec![&2]);
    assert_eq!(timeline.get_all_in_time_range(0.0, 1000.0, SOUNDS), vec![&1]);
}

#[test]
fn test_unknown_category_is_empty() {
    let timeline: Timeline<&'static str, u32> = Timeline::new();

    assert!(timeline.get_all_at_time(0.0, "nothing").is_empty());
    assert!(timeline.get_all_in_time_range(0.0, 100.0, "nothing").is_empty());
    assert_eq!(timeline.len("nothing"), 0);
    assert!(timeline.is_empty());
}

#[test]
fn test_malformed_entries() {
    let mut timeline = Timeline::new();

    assert_eq!(
        timeline.add(OBJECTS, 1u32, 200.0, Some(100.0)),
        Err(TimelineError::InvalidInterval { start: 200.0, end: 100.0 })
    );
    assert!(matches!(
        timeline.add(OBJECTS, 1u32, f64::NAN, None),
        Err(TimelineError::NonFiniteTime(_))
    ));
    assert!(timeline.add(OBJECTS, 1u32, 100.0, Some(100.0)).is_ok());
}

#[test]
fn test_dispatch_in_order_exactly_once() {
    let mut timeline = Timeline::new();
    let fired = recorder(&mut timeline);

    timeline.add(SOUNDS, 3u32, 300.0, None).unwrap();
    timeline.add(SOUNDS, 1u32, 100.0, None).unwrap();
    timeline.add(SOUNDS, 2u32, 200.0, None).unwrap();

    timeline.update(50.0);
    assert!(fired.borrow().is_empty());

    // One big step fires everything in order
    timeline.update(250.0);
    assert_eq!(*fired.borrow(), vec![1, 2]);

    timeline.update(250.0);
    timeline.update(260.0);
    assert_eq!(*fired.borrow(), vec![1, 2]);

    timeline.update(1000.0);
    assert_eq!(*fired.borrow(), vec![1, 2, 3]);
    assert_eq!(timeline.pending_len(SOUNDS), 0);
}

#[test]
fn test_backward_seek_does_not_refire() {
    let mut timeline = Timeline::new();
    let fired = recorder(&mut timeline);

    timeline.add(SOUNDS, 1u32, 100.0, None).unwrap();
    timeline.add(SOUNDS, 2u32, 200.0, None).unwrap();
    timeline.add(SOUNDS, 3u32, 300.0, None).unwrap();

    timeline.update(250.0);
    timeline.update(50.0);
    assert_eq!(timeline.cursor(), 50.0);

    timeline.update(250.0);
    assert_eq!(*fired.borrow(), vec![1, 2]);

    // Never crossed before, fires on the first forward crossing
    timeline.update(300.0);
    assert_eq!(*fired.borrow(), vec![1, 2, 3]);
}

#[test]
fn test_entry_behind_cursor_fires_on_next_update() {
    let mut timeline = Timeline::new();
    let fired = recorder(&mut timeline);

    timeline.update(500.0);
    timeline.add(SOUNDS, 7u32, 400.0, None).unwrap();
    assert!(fired.borrow().is_empty());

    timeline.update(500.0);
    assert_eq!(*fired.borrow(), vec![7]);
}

#[test]
fn test_late_subscription_gets_undispatched_entries() {
    let mut timeline = Timeline::new();
    timeline.add(SOUNDS, 1u32, 100.0, None).unwrap();
    timeline.add(SOUNDS, 2u32, 200.0, None).unwrap();

    // Nobody is listening yet
    timeline.update(150.0);
    assert_eq!(timeline.pending_len(SOUNDS), 2);

    let fired = recorder(&mut timeline);
    assert!(fired.borrow().is_empty());

    timeline.update(250.0);

    assert_eq!(*fired.borrow(), vec![1, 2]);
    assert_eq!(timeline.pending_len(SOUNDS), 0);
}

#[test]
fn test_late_subscription_skips_dispatched_entries() {
    let mut timeline = Timeline::new();
    let first = recorder(&mut timeline);

    timeline.add(SOUNDS, 1u32, 100.0, None).unwrap();
    timeline.add(SOUNDS, 2u32, 200.0, None).unwrap();

    timeline.update(150.0);

    let second = recorder(&mut timeline);
    timeline.update(250.0);

    assert_eq!(*first.borrow(), vec![1, 2]);
    assert_eq!(*second.borrow(), vec![2]);
}

#[test]
fn test_entries_wait_while_everyone_unsubscribed() {
    let mut timeline = Timeline::new();
    let fired = Rc::new(RefCell::new(Vec::new()));

    let log = fired.clone();
    let subscription = timeline.subscribe(SOUNDS, move |x: &u32| log.borrow_mut().push(*x));

    timeline.add(SOUNDS, 1u32, 100.0, None).unwrap();
    timeline.add(SOUNDS, 2u32, 200.0, None).unwrap();

    timeline.update(100.0);
    subscription.unsubscribe();
    timeline.update(300.0);

    let later = recorder(&mut timeline);
    timeline.update(300.0);

    assert_eq!(*fired.borrow(), vec![1]);
    assert_eq!(*later.borrow(), vec![2]);
}

#[test]
fn test_unsubscribe_stops_dispatch() {
    let mut timeline = Timeline::new();
    let fired = Rc::new(RefCell::new(Vec::new()));

    let log = fired.clone();
    let subscription = timeline.subscribe(SOUNDS, move |x: &u32| log.borrow_mut().push(*x));

    timeline.add(SOUNDS, 1u32, 100.0, None).unwrap();
    timeline.add(SOUNDS, 2u32, 200.0, None).unwrap();

    timeline.update(100.0);
    subscription.unsubscribe();
    timeline.update(200.0);

    assert_eq!(*fired.borrow(), vec![1]);
}

#[test]
fn test_categories_dispatch_independently() {
    let mut timeline = Timeline::new();
    let sounds = recorder(&mut timeline);

    let objects = Rc::new(RefCell::new(Vec::new()));
    let log = objects.clone();
    let _subscription = timeline.subscribe(OBJECTS, move |x: &u32| log.borrow_mut().push(*x));

    timeline.add(SOUNDS, 1u32, 100.0, None).unwrap();
    timeline.add(OBJECTS, 9u32, 100.0, None).unwrap();

    timeline.update(100.0);

    assert_eq!(*sounds.borrow(), vec![1]);
    assert_eq!(*objects.borrow(), vec![9]);
}
