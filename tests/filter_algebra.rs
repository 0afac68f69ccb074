//! Filter combinators gate key bindings and focus; `and`/`or` must
//! short-circuit the way the boolean operators they stand in for do, since
//! a later operand may be expensive (an ambient app-state read) or have
//! side effects a caller doesn't expect to trigger when it's already
//! irrelevant to the result.
#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use termform::Filter;

fn counting(calls: Arc<AtomicUsize>, value: bool) -> Filter {
    Filter::condition(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        value
    })
}

#[test]
fn always_and_never_evaluate_as_constants() {
    assert!(Filter::always().invoke());
    assert!(!Filter::never().invoke());
}

#[test]
fn and_short_circuits_on_first_false() {
    let calls = Arc::new(AtomicUsize::new(0));
    let first = counting(calls.clone(), false);
    let second = counting(calls.clone(), true);
    assert!(!first.and(&second).invoke());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn and_evaluates_both_when_first_is_true() {
    let calls = Arc::new(AtomicUsize::new(0));
    let first = counting(calls.clone(), true);
    let second = counting(calls.clone(), true);
    assert!(first.and(&second).invoke());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn or_short_circuits_on_first_true() {
    let calls = Arc::new(AtomicUsize::new(0));
    let first = counting(calls.clone(), true);
    let second = counting(calls.clone(), false);
    assert!(first.or(&second).invoke());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn invert_negates_and_double_invert_restores_behavior() {
    let flag = Arc::new(AtomicBool::new(true));
    let f = {
        let flag = flag.clone();
        Filter::condition(move || flag.load(Ordering::SeqCst))
    };
    let inverted = f.invert();
    let restored = inverted.invert();
    flag.store(true, Ordering::SeqCst);
    assert!(f.invoke());
    assert!(!inverted.invoke());
    assert!(restored.invoke());

    flag.store(false, Ordering::SeqCst);
    assert!(!f.invoke());
    assert!(inverted.invoke());
    assert!(!restored.invoke());
}

#[test]
fn invert_of_always_is_never_and_vice_versa() {
    assert!(!Filter::always().invert().invoke());
    assert!(Filter::never().invert().invoke());
}

#[test]
fn condition_reflects_live_state() {
    let flag = Arc::new(AtomicBool::new(false));
    let filter = {
        let flag = flag.clone();
        Filter::condition(move || flag.load(Ordering::SeqCst))
    };
    assert!(!filter.invoke());
    flag.store(true, Ordering::SeqCst);
    assert!(filter.invoke());
}

#[test]
fn and_of_three_filters_requires_all_true() {
    let a = Filter::always();
    let b = Filter::always();
    let c = Filter::never();
    let combined = a.and(&b).and(&c);
    assert!(!combined.invoke());
}
