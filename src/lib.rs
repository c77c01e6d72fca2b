#![no_std]

//! `BlobVec`: a type-erased contiguous growable array.
//!
//! `BlobVec` stores elements of one fixed, runtime-chosen size in a single heap
//! buffer. Elements are opaque byte blocks: they are copied in from `&[u8]`,
//! copied out into `&mut [u8]`, moved around with overlap-safe byte copies and
//! compared byte-wise. The vector never interprets them and never runs
//! destructors on them.
//!
//! `TypedVec<T>` is a thin typed facade for plain-old-data element types.
//!
//! # Buffer lifecycle
//!
//! A vector is either *empty* (no buffer, capacity 0) or *active* (one buffer
//! of `capacity * element_size` bytes). The first insertion allocates exactly
//! the slots needed. Later insertions into a full buffer grow it according to
//! the vector's [`GrowthPolicy`]. Explicit capacity requests are exact:
//!
//! - `reserve(n)` grows the capacity by exactly `n`
//! - `resize(n)` grows the capacity to exactly `n`, never below the length
//! - `shrink_to_fit()` drops all spare capacity
//! - `truncate(n)` keeps `n` elements and shrinks the capacity to `n`
//! - `clear()` and `truncate(0)` release the buffer
//!
//! Removing elements (`pop`, `delete`, `swap_delete`) never shrinks.
//!
//! ```
//! # use blobvec::BlobVec;
//! let mut vec = BlobVec::new(4);
//! assert_eq!(vec.capacity(), 0);
//!
//! for i in 0..5i32 {
//!     vec.push(&i.to_ne_bytes()).unwrap();
//! }
//! assert_eq!(vec.len(), 5);
//! assert_eq!(vec.capacity(), 8);
//!
//! let mut out = [0u8; 4];
//! vec.pop(&mut out).unwrap();
//! assert_eq!(i32::from_ne_bytes(out), 4);
//! assert_eq!(vec.capacity(), 8);
//!
//! vec.shrink_to_fit().unwrap();
//! assert_eq!(vec.capacity(), 4);
//! ```
//!
//! # Performance Characteristics
//!
//! - `push()`: amortized O(1) under the default doubling policy
//! - `peek()`, `set()`, `swap()`, `swap_delete()`: O(1)
//! - `insert()`, `delete()`: O(n) - later elements are shifted
//! - `search()`, `contains()`: O(n) - linear byte-wise scan
//! - `copy()`, `append()`, `split_at()`: O(n) - one bulk byte copy
//!
//! # Errors and panics
//!
//! Recoverable failures (allocation, size mismatches, popping an empty
//! vector) are reported as [`BlobVecError`]. Programming errors panic after
//! logging at `error` level: a zero element size, or an index past the end.
//!
//! ```should_panic
//! # use blobvec::BlobVec;
//! let vec = BlobVec::new(4);
//! let _ = vec.peek(0); // index out of bounds: the len is 0 but the index is 0
//! ```
//!
//! # Typed access
//!
//! ```
//! # use blobvec::TypedVec;
//! let mut vec = TypedVec::<u32>::from_slice(&[3, 1, 2]).unwrap();
//! vec.insert(0, 7).unwrap();
//! vec.swap(1, 3);
//! assert_eq!(vec, [7, 2, 1, 3]);
//! assert_eq!(vec.search(&1), Some(2));
//!
//! let blob = vec.into_blob();
//! assert_eq!(blob.element_size(), 4);
//! ```
//!
//! ## `no_std` Compatibility
//!
//! The crate only needs `core` and `alloc`. Enable the optional `std` feature
//! to get `std::error::Error` for [`BlobVecError`]:
//! ```toml
//! [dependencies]
//! blobvec = { version = "0.1", features = ["std"] }
//! ```
//!
//! ## Logging
//!
//! Buffer allocation, reallocation and release are reported through the
//! [`log`] facade at `trace` level, policy-driven growth at `debug` level. No
//! logger is installed by this crate.

extern crate alloc;

mod buffer;
mod core;
mod error;
mod growth;
mod slots;
mod typed;

pub use core::{drop_many, BlobVec};
pub use error::{BlobVecError, Result};
pub use growth::{GrowthPolicy, DEFAULT_MAX_INCREMENT};
pub use typed::TypedVec;
