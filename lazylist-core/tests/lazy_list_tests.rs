use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rstest::rstest;

use lazylist_core::common_tests::sorted_set_core_tests::*;
use lazylist_core::{DeferredGuard, InvariantViolation, LazyList};

type DeferredLazyList = LazyList<i32, DeferredGuard>;

#[test]
fn test_basic() {
    let list = DeferredLazyList::default();
    test_basic_operations(&list);
}

#[test]
fn test_insert_order() {
    test_insert_order_independent::<DeferredLazyList>();
}

#[test]
fn test_duplicates() {
    test_duplicate_insert::<DeferredLazyList>();
}

#[test]
fn test_delete_missing() {
    test_delete_absent::<DeferredLazyList>();
}

#[test]
fn test_sequential() {
    test_sequential_operations::<DeferredLazyList>();
}

#[test]
fn test_range_early_stop() {
    test_range_stops_early::<DeferredLazyList>();
}

#[test]
fn test_len() {
    let list = DeferredLazyList::default();
    test_len_operations(&list);
}

#[test]
fn test_empty() {
    test_is_empty::<DeferredLazyList>();
}

#[test]
fn test_concurrent() {
    test_concurrent_operations::<DeferredLazyList>();
}

#[test]
fn test_contention() {
    test_high_contention::<DeferredLazyList>();
}

#[rstest]
#[case::empty(&[])]
#[case::insert_only(&[(true, 3), (true, 1), (true, 2)])]
#[case::delete_only(&[(false, 1), (false, 2)])]
#[case::reinsert(&[(true, 7), (false, 7), (true, 7), (true, 7), (false, 7), (true, 7)])]
#[case::interleaved(&[(true, 5), (true, -5), (false, 0), (true, 0), (false, 5), (true, 10), (false, -5)])]
fn test_model(#[case] ops: &[(bool, i32)]) {
    test_matches_model::<DeferredLazyList>(ops);
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(1234)]
fn test_shuffled_insert_then_delete(#[case] seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys: Vec<i32> = (0..300).collect();
    keys.shuffle(&mut rng);

    let mut list: DeferredLazyList = keys.iter().copied().collect();
    assert_eq!(list.iter().collect::<Vec<_>>(), (0..300).collect::<Vec<_>>());
    assert_eq!(list.check_quiescent(), Ok(()));

    keys.shuffle(&mut rng);
    let (gone, kept) = keys.split_at(150);
    for key in gone {
        assert!(list.delete(key));
    }

    let mut expected = kept.to_vec();
    expected.sort_unstable();
    assert_eq!(list.iter().collect::<Vec<_>>(), expected);
    assert_eq!(list.len(), 150);
    assert_eq!(list.guard().pending(), 150);
    assert_eq!(list.check_quiescent(), Ok(()));
}

#[test]
fn test_extend() {
    let mut list = DeferredLazyList::new();
    list.extend([3, 1, 3, 2]);
    assert_eq!(list.len(), 3);
    assert_eq!(format!("{:?}", list), "{1, 2, 3}");
}

#[test]
fn test_generic_keys() {
    let list: LazyList<String, DeferredGuard> = LazyList::new();
    assert!(list.insert("pear".to_string()));
    assert!(list.insert("apple".to_string()));
    assert!(!list.insert("pear".to_string()));
    assert!(list.contains(&"apple".to_string()));
    assert!(list.delete(&"pear".to_string()));
    assert_eq!(list.iter().collect::<Vec<_>>(), vec!["apple".to_string()]);
}

#[test]
fn test_invariant_violation_messages() {
    let err = InvariantViolation::LenMismatch {
        counted: 2,
        reported: 3,
    };
    assert_eq!(err.to_string(), "len() reports 3 but 2 nodes are linked");
    assert_eq!(
        InvariantViolation::Unsorted { position: 4 }.to_string(),
        "live keys not strictly ascending at position 4"
    );
}
