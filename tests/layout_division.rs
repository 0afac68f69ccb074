//! [`divide_space`] is the weighted round-robin divider every split
//! container uses; these exercise its min/preferred/max/weight behavior
//! and the window-too-small sentinel returned when minimums don't fit.
#![allow(clippy::unwrap_used)]

use termform::layout::divide_space;
use termform::primitives::Dimension;

#[test]
fn exact_dimensions_never_grow_or_shrink() {
    let dims = vec![Dimension::exact(10), Dimension::exact(20)];
    assert_eq!(divide_space(&dims, 30), Some(vec![10, 20]));
}

#[test]
fn surplus_distributed_proportionally_to_weight() {
    let dims = vec![
        Dimension::new(0, usize::MAX, 0, 1),
        Dimension::new(0, usize::MAX, 0, 2),
    ];
    assert_eq!(divide_space(&dims, 12), Some(vec![4, 8]));
}

#[test]
fn growth_capped_at_max_then_spills_to_remaining_children() {
    let dims = vec![
        Dimension::new(0, 5, 5, 1),
        Dimension::new(0, usize::MAX, 5, 1),
    ];
    let sizes = divide_space(&dims, 20).unwrap();
    assert_eq!(sizes[0], 5);
    assert_eq!(sizes[0] + sizes[1], 20);
}

#[test]
fn leftover_space_after_every_child_hits_max_goes_to_the_last_child() {
    let dims = vec![Dimension::exact(5), Dimension::exact(5)];
    assert_eq!(divide_space(&dims, 13), Some(vec![5, 8]));
}

#[test]
fn insufficient_space_returns_none_sentinel() {
    let dims = vec![Dimension::exact(10), Dimension::exact(10)];
    assert_eq!(divide_space(&dims, 15), None);
}

#[test]
fn two_children_with_min_20_and_available_30_returns_none() {
    let dims = vec![
        Dimension::new(20, usize::MAX, 20, 1),
        Dimension::new(20, usize::MAX, 20, 1),
    ];
    assert_eq!(divide_space(&dims, 30), None);
}

#[test]
fn empty_dimension_list_divides_nothing() {
    assert_eq!(divide_space(&[], 40), Some(Vec::<usize>::new()));
}
