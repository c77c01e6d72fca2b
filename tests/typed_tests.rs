use blobvec::{BlobVec, BlobVecError, GrowthPolicy, TypedVec};
use bytemuck::{Pod, Zeroable};
use std::alloc::Layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn test_typed_push_peek_set() {
    let mut vec = TypedVec::<Point>::new();
    vec.push(Point { x: 1, y: 2 }).unwrap();
    vec.push(Point { x: 3, y: 4 }).unwrap();

    assert_eq!(vec.len(), 2);
    assert_eq!(vec.peek(1), &Point { x: 3, y: 4 });

    vec.set(0, Point { x: 0, y: 0 });
    vec.peek_mut(1).y = 40;
    assert_eq!(vec, [Point { x: 0, y: 0 }, Point { x: 3, y: 40 }]);
}

#[test]
fn test_typed_try_peek() {
    let vec = TypedVec::from_slice(&[1u16, 2]).unwrap();
    assert_eq!(vec.try_peek(1), Ok(&2));
    assert_eq!(
        vec.try_peek(2).unwrap_err(),
        BlobVecError::IndexOutOfBounds {
            index: 2,
            length: 2
        }
    );
}

#[test]
fn test_typed_from_slice_and_with_value() {
    let vec = TypedVec::from_slice(&[1u64, 2, 3]).unwrap();
    assert_eq!(vec.capacity(), 3);
    assert_eq!(vec.as_slice(), &[1, 2, 3]);

    let filled = TypedVec::with_value(7u8, 4).unwrap();
    assert_eq!(filled, [7, 7, 7, 7]);
}

#[test]
fn test_typed_pop_on_empty() {
    let mut vec = TypedVec::<u32>::default();
    assert_eq!(vec.pop(), None);
    vec.push(5).unwrap();
    assert_eq!(vec.pop(), Some(5));
    assert_eq!(vec.pop(), None);
}

#[test]
fn test_typed_insert_delete_swap_reverse() {
    let mut vec = TypedVec::from_slice(&[1i32, 3]).unwrap();
    vec.insert(1, 2).unwrap();
    vec.insert(0, 0).unwrap();
    assert_eq!(vec, [0, 1, 2, 3]);

    vec.delete(0);
    vec.swap_delete(0);
    assert_eq!(vec, [3, 2]);

    vec.push(1).unwrap();
    vec.swap(0, 2);
    assert_eq!(vec, [1, 2, 3]);
    vec.reverse();
    assert_eq!(vec, [3, 2, 1]);
}

#[test]
fn test_typed_as_mut_slice() {
    let mut vec = TypedVec::from_slice(&[1.0f32, 2.0]).unwrap();
    for value in vec.as_mut_slice() {
        *value *= 2.0;
    }
    assert_eq!(vec, [2.0, 4.0]);
}

#[test]
fn test_typed_search_contains() {
    let vec = TypedVec::from_slice(&[Point { x: 1, y: 1 }, Point { x: 2, y: 2 }]).unwrap();
    assert_eq!(vec.search(&Point { x: 2, y: 2 }), Some(1));
    assert!(!vec.contains(&Point { x: 3, y: 3 }));
}

#[test]
fn test_typed_capacity_management() {
    let mut vec = TypedVec::<u32>::new().with_growth_policy(GrowthPolicy::UNIT);
    vec.reserve(4).unwrap();
    assert_eq!(vec.capacity(), 4);
    vec.resize(6).unwrap();
    assert_eq!(vec.capacity(), 6);

    for i in 0..6 {
        vec.push(i).unwrap();
    }
    vec.set_growth_policy(GrowthPolicy::Fixed(2));
    vec.push(6).unwrap();
    assert_eq!(vec.capacity(), 8);

    vec.truncate(3).unwrap();
    assert_eq!(vec, [0, 1, 2]);
    assert_eq!(vec.capacity(), 3);

    vec.reserve(5).unwrap();
    vec.shrink_to_fit().unwrap();
    assert_eq!(vec.capacity(), 3);

    vec.clear();
    assert!(vec.is_empty());
    assert_eq!(vec.capacity(), 0);
}

#[test]
fn test_typed_bulk_operations() {
    let mut vec = TypedVec::from_slice(&[1u32, 2, 3, 4, 5]).unwrap();

    let mut copy = TypedVec::new();
    vec.copy(&mut copy).unwrap();
    assert_eq!(copy, vec);

    let mut middle = TypedVec::new();
    vec.inner_copy(&mut middle, 1, 3).unwrap();
    assert_eq!(middle, [2, 3]);

    let mut tail = TypedVec::new();
    vec.split_at(&mut tail, 3).unwrap();
    assert_eq!(vec, [1, 2, 3]);
    assert_eq!(tail, [4, 5]);

    vec.append(&mut tail).unwrap();
    assert_eq!(vec, [1, 2, 3, 4, 5]);
    assert!(tail.is_empty());

    vec.retain_range(1, 4).unwrap();
    assert_eq!(vec, [2, 3, 4]);
}

#[test]
fn test_typed_blob_conversions() {
    let vec = TypedVec::from_slice(&[10u32, 20]).unwrap();
    assert_eq!(vec.as_blob().element_size(), 4);

    let blob: BlobVec = vec.into();
    assert_eq!(blob.peek(1), &20u32.to_ne_bytes());

    let back = TypedVec::<u32>::from_blob(blob).unwrap();
    assert_eq!(back, [10, 20]);

    let mut raw = BlobVec::with_layout(Layout::new::<u16>());
    raw.push(&7u16.to_ne_bytes()).unwrap();
    let typed = TypedVec::<u16>::from_blob(raw).unwrap();
    assert_eq!(typed, [7]);
}

#[test]
fn test_typed_from_blob_rejects_under_aligned() {
    let result = TypedVec::<u64>::from_blob(BlobVec::new(8));
    assert_eq!(
        result.unwrap_err(),
        BlobVecError::AlignmentMismatch {
            required: 8,
            found: 1
        }
    );
}

#[test]
fn test_typed_byte_sized_from_plain_blob() {
    let mut raw = BlobVec::new(1);
    raw.push(b"a").unwrap();
    let typed = TypedVec::<u8>::from_blob(raw).unwrap();
    assert_eq!(typed, *b"a");
}

#[test]
fn test_typed_debug_and_slice_eq() {
    let vec = TypedVec::from_slice(&[1u8, 2]).unwrap();
    assert_eq!(format!("{vec:?}"), "[1, 2]");
    let slice: &[u8] = &[1, 2];
    assert!(vec == slice);
    assert!(vec == *slice);
}

#[test]
#[should_panic(expected = "element size")]
fn test_typed_zero_sized_panics() {
    let _ = TypedVec::<()>::new();
}

#[test]
#[should_panic(expected = "index out of bounds: the len is 1 but the index is 1")]
fn test_typed_remove_out_of_bounds() {
    let mut vec = TypedVec::from_slice(&[1u32]).unwrap();
    let _ = vec.remove(1);
}
