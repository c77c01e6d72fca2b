use blobvec::BlobVec;

fn bytes(value: i32) -> [u8; 4] {
    value.to_ne_bytes()
}

fn ints(values: &[i32]) -> BlobVec {
    let mut vec = BlobVec::new(4);
    for value in values {
        vec.push(&bytes(*value)).unwrap();
    }
    vec
}

fn to_ints(vec: &BlobVec) -> Vec<i32> {
    vec.as_bytes()
        .chunks_exact(4)
        .map(|b| i32::from_ne_bytes(b.try_into().unwrap()))
        .collect()
}

fn build_zero_to_three() -> BlobVec {
    let mut vec = BlobVec::new(4);
    vec.push(&bytes(0)).unwrap();
    vec.push(&bytes(3)).unwrap();
    vec.insert(1, &bytes(1)).unwrap();
    vec.insert(2, &bytes(2)).unwrap();
    vec
}

#[test]
fn test_scenario_push_and_insert() {
    let vec = build_zero_to_three();
    assert_eq!(to_ints(&vec), [0, 1, 2, 3]);
    assert_eq!(vec.len(), 4);
}

#[test]
fn test_scenario_copy_is_independent() {
    let vec = build_zero_to_three();
    let mut copy = BlobVec::new(4);
    vec.copy(&mut copy).unwrap();
    assert_eq!(to_ints(&copy), [0, 1, 2, 3]);

    copy.set(0, &bytes(9)).unwrap();
    assert_eq!(to_ints(&copy), [9, 1, 2, 3]);
    assert_eq!(to_ints(&vec), [0, 1, 2, 3]);
}

#[test]
fn test_scenario_pop_delete_remove() {
    let mut vec = build_zero_to_three();
    let mut out = [0u8; 4];

    vec.pop(&mut out).unwrap();
    assert_eq!(i32::from_ne_bytes(out), 3);
    assert_eq!(to_ints(&vec), [0, 1, 2]);

    vec.delete(2);
    vec.remove(0, &mut out).unwrap();
    assert_eq!(i32::from_ne_bytes(out), 0);
    assert_eq!(to_ints(&vec), [1]);
}

#[test]
fn test_scenario_append() {
    let mut vec = ints(&[1]);
    vec.push(&bytes(4)).unwrap();
    assert_eq!(to_ints(&vec), [1, 4]);

    let mut other = build_zero_to_three();
    vec.append(&mut other).unwrap();
    assert_eq!(to_ints(&vec), [1, 4, 0, 1, 2, 3]);
    assert!(other.is_empty());
}

#[test]
fn test_scenario_split_swap_reverse() {
    let mut vec = ints(&[1, 4, 0, 1, 2, 3]);
    let mut other = BlobVec::new(4);

    vec.split_at(&mut other, 3).unwrap();
    assert_eq!(to_ints(&vec), [1, 4, 0]);
    assert_eq!(to_ints(&other), [1, 2, 3]);

    vec.swap(0, 2);
    assert_eq!(to_ints(&vec), [0, 4, 1]);
    vec.reverse();
    assert_eq!(to_ints(&vec), [1, 4, 0]);
}

#[test]
fn test_scenario_contains_and_search() {
    let vec = ints(&[1, 4, 0]);
    assert!(vec.contains(&bytes(1)));
    assert!(!vec.contains(&bytes(7)));
    assert_eq!(vec.search(&bytes(4)), Some(1));
    assert_eq!(vec.search(&bytes(7)), None);
}

#[test]
fn test_law_push_then_pop() {
    let mut vec = ints(&[1, 2]);
    let before = to_ints(&vec);
    let mut out = [0u8; 4];

    vec.push(&bytes(42)).unwrap();
    vec.pop(&mut out).unwrap();

    assert_eq!(out, bytes(42));
    assert_eq!(to_ints(&vec), before);
}

#[test]
fn test_law_append_then_split_restores() {
    let original = ints(&[1, 2, 3]);
    let tail = ints(&[4, 5]);

    let mut vec = BlobVec::new(4);
    original.copy(&mut vec).unwrap();
    let mut other = BlobVec::new(4);
    tail.copy(&mut other).unwrap();

    let split = vec.len();
    vec.append(&mut other).unwrap();
    vec.split_at(&mut other, split).unwrap();

    assert_eq!(vec, original);
    assert_eq!(other, tail);
}

#[test]
fn test_law_double_reverse_and_swap() {
    let original = ints(&[5, 6, 7, 8, 9]);
    let mut vec = BlobVec::new(4);
    original.copy(&mut vec).unwrap();

    vec.reverse();
    vec.reverse();
    assert_eq!(vec, original);

    vec.swap(1, 3);
    vec.swap(1, 3);
    assert_eq!(vec, original);
}

#[test]
fn test_invariants_hold_through_mixed_operations() {
    let mut vec = BlobVec::new(4);
    let mut out = [0u8; 4];
    for i in 0..100i32 {
        if i % 7 == 3 && !vec.is_empty() {
            vec.swap_remove(0, &mut out).unwrap();
        } else if i % 5 == 0 {
            vec.insert(vec.len() / 2, &bytes(i)).unwrap();
        } else {
            vec.push(&bytes(i)).unwrap();
        }
        assert!(vec.len() <= vec.capacity());
        assert_eq!(vec.as_bytes().len(), vec.len() * vec.element_size());
    }
    vec.shrink_to_fit().unwrap();
    assert_eq!(vec.len(), vec.capacity());
}
