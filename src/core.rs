use alloc::alloc::Layout;
use core::fmt;
use core::ptr::NonNull;

use log::{debug, error, trace};

use crate::buffer::{array_layout, RawBuffer};
use crate::error::{BlobVecError, Result};
use crate::growth::GrowthPolicy;
use crate::slots::{self, Slots};

/// A contiguous growable array of opaque, fixed-size elements.
///
/// Every element occupies one `element_size`-byte slot of a single heap
/// buffer. Values go in as `&[u8]` and come out through `&mut [u8]`; the
/// vector never interprets them and never runs destructors on them.
///
/// An empty vector (capacity 0) holds no buffer at all.
pub struct BlobVec {
    len: usize,
    item: Layout,
    buffer: Option<RawBuffer>,
    growth: GrowthPolicy,
}

#[cold]
#[track_caller]
fn invalid_element_size(size: usize) -> ! {
    error!("invalid element size {size}");
    panic!("element size of a BlobVec must be between 1 and isize::MAX, got {size}");
}

#[cold]
#[track_caller]
fn index_out_of_bounds(index: usize, len: usize) -> ! {
    error!("index {index} out of bounds for length {len}");
    panic!("index out of bounds: the len is {len} but the index is {index}");
}

#[track_caller]
fn byte_layout(element_size: usize) -> Layout {
    match Layout::from_size_align(element_size, 1) {
        Ok(layout) => layout,
        Err(_) => invalid_element_size(element_size),
    }
}

impl BlobVec {
    /// Creates an empty vector of `element_size`-byte elements.
    ///
    /// The vector does not allocate until elements are added.
    ///
    /// # Panics
    ///
    /// Panics if `element_size` is 0.
    #[must_use]
    #[track_caller]
    pub fn new(element_size: usize) -> Self {
        Self::with_layout(byte_layout(element_size))
    }

    /// Creates an empty vector whose slots follow `item`.
    ///
    /// The slot size is `item.size()` rounded up to `item.align()`.
    ///
    /// # Panics
    ///
    /// Panics if `item.size()` is 0.
    #[must_use]
    #[track_caller]
    pub fn with_layout(item: Layout) -> Self {
        if item.size() == 0 {
            invalid_element_size(0);
        }
        Self {
            len: 0,
            item: item.pad_to_align(),
            buffer: None,
            growth: GrowthPolicy::default(),
        }
    }

    /// Creates an empty vector with room for exactly `capacity` elements.
    ///
    /// A `capacity` of 0 behaves like [`BlobVec::new`].
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::CapacityOverflow` or
    /// `BlobVecError::AllocationFailed` if the buffer cannot be allocated.
    ///
    /// # Panics
    ///
    /// Panics if `element_size` is 0.
    #[track_caller]
    pub fn with_capacity(capacity: usize, element_size: usize) -> Result<Self> {
        Self::with_capacity_and_layout(capacity, byte_layout(element_size))
    }

    /// [`BlobVec::with_capacity`] with an explicit slot layout.
    ///
    /// # Errors
    ///
    /// As [`BlobVec::with_capacity`].
    ///
    /// # Panics
    ///
    /// Panics if `item.size()` is 0.
    #[track_caller]
    pub fn with_capacity_and_layout(capacity: usize, item: Layout) -> Result<Self> {
        let mut vec = Self::with_layout(item);
        if capacity > 0 {
            vec.buffer = Some(RawBuffer::allocate(vec.item, capacity)?);
        }
        Ok(vec)
    }

    /// Creates a vector of `len` copies of `value`.
    ///
    /// The element size is `value.len()`; length and capacity are both `len`.
    ///
    /// # Errors
    ///
    /// As [`BlobVec::with_capacity`].
    ///
    /// # Panics
    ///
    /// Panics if `value` is empty.
    #[track_caller]
    pub fn with_value(value: &[u8], len: usize) -> Result<Self> {
        let mut vec = Self::with_capacity(len, value.len())?;
        if let Some(mut slots) = vec.slots_mut() {
            for index in 0..len {
                slots.write(index, value);
            }
        }
        vec.len = len;
        Ok(vec)
    }

    /// Creates a vector that takes ownership of an existing buffer.
    ///
    /// Length and capacity are both `len`. When `len` is 0 the buffer is not
    /// adopted and stays with the caller.
    ///
    /// # Safety
    ///
    /// - `ptr` must have been allocated by the global allocator with the
    ///   layout `Layout::from_size_align(len * element_size, 1)`, for
    ///   example by [`BlobVec::into_raw_parts`] on a vector created with
    ///   [`BlobVec::new`] after [`BlobVec::shrink_to_fit`].
    /// - The region must hold `len * element_size` initialized bytes.
    /// - Ownership moves into the vector: the caller must not free, reuse or
    ///   alias the region afterwards.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::InvalidBuffer` if `ptr` is null and
    /// `BlobVecError::CapacityOverflow` if the region size overflows.
    ///
    /// # Panics
    ///
    /// Panics if `element_size` is 0.
    #[track_caller]
    pub unsafe fn from_raw_parts(ptr: *mut u8, len: usize, element_size: usize) -> Result<Self> {
        let mut vec = Self::new(element_size);
        let ptr = NonNull::new(ptr).ok_or(BlobVecError::InvalidBuffer {
            reason: "null pointer",
        })?;
        if len > 0 {
            array_layout(vec.item, len)?;
            // Safety: upheld by the caller, the layout was checked above.
            vec.buffer = Some(unsafe { RawBuffer::from_raw_parts(ptr, len, vec.item) });
            vec.len = len;
        }
        Ok(vec)
    }

    /// Decomposes the vector into `(pointer, length, capacity)`.
    ///
    /// The caller becomes responsible for the region, which was allocated by
    /// the global allocator with the layout
    /// `Layout::from_size_align(capacity * element_size, item_layout().align())`.
    /// An empty vector yields a dangling pointer and zero capacity.
    #[must_use]
    pub fn into_raw_parts(mut self) -> (*mut u8, usize, usize) {
        let len = self.len;
        match self.buffer.take() {
            Some(buffer) => {
                let capacity = buffer.capacity();
                (buffer.into_raw().as_ptr(), len, capacity)
            }
            None => (NonNull::dangling().as_ptr(), 0, 0),
        }
    }

    /// Sets the growth policy used by inserting operations.
    #[must_use]
    pub fn with_growth_policy(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    pub fn set_growth_policy(&mut self, growth: GrowthPolicy) {
        self.growth = growth;
    }

    #[must_use]
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the buffer can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.as_ref().map_or(0, RawBuffer::capacity)
    }

    #[must_use]
    pub fn element_size(&self) -> usize {
        self.item.size()
    }

    #[must_use]
    pub fn item_layout(&self) -> Layout {
        self.item
    }

    /// The initialized elements as one byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.len * self.item.size();
        match self.buffer.as_ref() {
            Some(buffer) => &buffer.as_bytes()[..end],
            None => &[],
        }
    }

    /// The initialized elements as one mutable byte slice.
    #[must_use]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let end = self.len * self.item.size();
        match self.buffer.as_mut() {
            Some(buffer) => &mut buffer.as_bytes_mut()[..end],
            None => &mut [],
        }
    }

    fn slots_mut(&mut self) -> Option<Slots<'_>> {
        let size = self.item.size();
        self.buffer
            .as_mut()
            .map(|buffer| Slots::new(buffer.as_bytes_mut(), size))
    }

    fn read_into(&mut self, index: usize, out: &mut [u8]) {
        if let Some(slots) = self.slots_mut() {
            slots.read(index, out);
        }
    }

    fn check_size(&self, found: usize) -> Result<()> {
        if found == self.item.size() {
            Ok(())
        } else {
            Err(BlobVecError::ElementSizeMismatch {
                expected: self.item.size(),
                found,
            })
        }
    }

    #[track_caller]
    fn check_index(&self, index: usize) {
        if index >= self.len {
            index_out_of_bounds(index, self.len);
        }
    }

    /// Returns the bytes of the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    #[track_caller]
    pub fn peek(&self, index: usize) -> &[u8] {
        self.check_index(index);
        let size = self.item.size();
        &self.as_bytes()[index * size..(index + 1) * size]
    }

    /// Returns the bytes of the element at `index` for in-place mutation.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    #[track_caller]
    pub fn peek_mut(&mut self, index: usize) -> &mut [u8] {
        self.check_index(index);
        let size = self.item.size();
        &mut self.as_bytes_mut()[index * size..(index + 1) * size]
    }

    /// Returns the bytes of the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::IndexOutOfBounds` if `index` is out of bounds.
    pub fn try_peek(&self, index: usize) -> Result<&[u8]> {
        if index >= self.len {
            return Err(BlobVecError::IndexOutOfBounds {
                index,
                length: self.len,
            });
        }
        Ok(self.peek(index))
    }

    /// Overwrites the element at `index` with `value`.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::ElementSizeMismatch` if `value` is not one
    /// element long.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn set(&mut self, index: usize, value: &[u8]) -> Result<()> {
        self.check_size(value.len())?;
        self.check_index(index);
        if let Some(mut slots) = self.slots_mut() {
            slots.write(index, value);
        }
        Ok(())
    }

    /// Returns `true` if some element is byte-wise equal to `value`.
    #[must_use]
    pub fn contains(&self, value: &[u8]) -> bool {
        self.search(value).is_some()
    }

    /// Returns the index of the first element byte-wise equal to `value`.
    ///
    /// A `value` that is not exactly one element long matches nothing.
    #[must_use]
    pub fn search(&self, value: &[u8]) -> Option<usize> {
        slots::position(self.as_bytes(), self.item.size(), value)
    }

    /// Reallocates to exactly `capacity` slots, releasing the buffer at 0.
    ///
    /// Callers guarantee `capacity >= self.len`, except `truncate`, which
    /// lowers `len` right after.
    fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            self.release();
            return Ok(());
        }
        match self.buffer.as_mut() {
            Some(buffer) => buffer.reallocate(capacity),
            None => {
                self.buffer = Some(RawBuffer::allocate(self.item, capacity)?);
                Ok(())
            }
        }
    }

    fn release(&mut self) {
        if self.buffer.take().is_some() {
            trace!("cleared vector of {} elements", self.len);
        }
        self.len = 0;
    }

    /// Grows the buffer to exactly `new_capacity` slots.
    ///
    /// Does nothing if the vector can already hold `new_capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::WouldTruncate` if `new_capacity` is smaller than
    /// the length (see [`BlobVec::truncate`]), or an allocation error.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        if self.len > new_capacity {
            return Err(BlobVecError::WouldTruncate {
                length: self.len,
                requested: new_capacity,
            });
        }
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        self.set_capacity(new_capacity)
    }

    /// Grows the capacity by exactly `additional` slots.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::CapacityOverflow` or
    /// `BlobVecError::AllocationFailed`.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        if additional == 0 {
            return Ok(());
        }
        let capacity = self.capacity();
        let new_capacity =
            capacity
                .checked_add(additional)
                .ok_or(BlobVecError::CapacityOverflow {
                    capacity: usize::MAX,
                    element_size: self.item.size(),
                })?;
        self.set_capacity(new_capacity)
    }

    /// Shrinks the capacity to the length, releasing the buffer when empty.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::AllocationFailed` if the reallocation fails.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        if self.len == self.capacity() {
            return Ok(());
        }
        self.set_capacity(self.len)
    }

    /// Keeps the first `new_len` elements and shrinks the capacity to match.
    ///
    /// A `new_len` of 0 is [`BlobVec::clear`]. A `new_len` at or past the
    /// current length does nothing.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::AllocationFailed` if the reallocation fails;
    /// the vector is then unchanged.
    pub fn truncate(&mut self, new_len: usize) -> Result<()> {
        if new_len == 0 {
            self.clear();
            return Ok(());
        }
        if new_len >= self.len {
            return Ok(());
        }
        self.set_capacity(new_len)?;
        self.len = new_len;
        Ok(())
    }

    /// Removes all elements and releases the buffer.
    ///
    /// Unlike `Vec::clear`, no capacity is retained.
    pub fn clear(&mut self) {
        self.release();
    }

    /// Makes room for `additional` more elements using the growth policy.
    fn grow_for(&mut self, additional: usize) -> Result<()> {
        let capacity = self.capacity();
        let required = self
            .len
            .checked_add(additional)
            .ok_or(BlobVecError::CapacityOverflow {
                capacity: usize::MAX,
                element_size: self.item.size(),
            })?;
        if required <= capacity {
            return Ok(());
        }
        if self.buffer.is_none() {
            return self.set_capacity(required);
        }
        let step = self.growth.increment(capacity).max(required - capacity);
        debug!("growing buffer from {capacity} by {step} slots");
        self.reserve(step)
    }

    /// Appends a copy of `value`.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::ElementSizeMismatch` if `value` is not one
    /// element long, or an allocation error if growing fails.
    pub fn push(&mut self, value: &[u8]) -> Result<()> {
        self.check_size(value.len())?;
        self.grow_for(1)?;
        let len = self.len;
        if let Some(mut slots) = self.slots_mut() {
            slots.write(len, value);
        }
        self.len += 1;
        Ok(())
    }

    /// Inserts a copy of `value` at `index`, shifting later elements right.
    ///
    /// Inserting at `len()` is the same as [`BlobVec::push`].
    ///
    /// # Errors
    ///
    /// As [`BlobVec::push`].
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: &[u8]) -> Result<()> {
        self.check_size(value.len())?;
        if index > self.len {
            index_out_of_bounds(index, self.len);
        }
        self.grow_for(1)?;
        let len = self.len;
        if let Some(mut slots) = self.slots_mut() {
            slots.shift_right(index, len);
            slots.write(index, value);
        }
        self.len += 1;
        Ok(())
    }

    /// Copies the last element into `out` and removes it.
    ///
    /// The capacity is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::Empty` if there is no element and
    /// `BlobVecError::ElementSizeMismatch` if `out` is not one element long.
    /// In both cases the vector is unchanged.
    pub fn pop(&mut self, out: &mut [u8]) -> Result<()> {
        if self.len == 0 {
            return Err(BlobVecError::Empty);
        }
        self.check_size(out.len())?;
        self.read_into(self.len - 1, out);
        self.len -= 1;
        Ok(())
    }

    /// Removes the element at `index`, shifting later elements left.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn delete(&mut self, index: usize) {
        self.check_index(index);
        let len = self.len;
        if let Some(mut slots) = self.slots_mut() {
            slots.shift_left(index, len);
        }
        self.len -= 1;
    }

    /// Copies the element at `index` into `out`, then [`deletes`] it.
    ///
    /// [`deletes`]: BlobVec::delete
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::ElementSizeMismatch` if `out` is not one
    /// element long.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn remove(&mut self, index: usize, out: &mut [u8]) -> Result<()> {
        self.check_size(out.len())?;
        self.check_index(index);
        self.read_into(index, out);
        self.delete(index);
        Ok(())
    }

    /// Removes the element at `index` by moving the last element into its
    /// slot.
    ///
    /// This is *O*(1) but does not preserve ordering.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn swap_delete(&mut self, index: usize) {
        self.check_index(index);
        let last = self.len - 1;
        if index != last {
            if let Some(mut slots) = self.slots_mut() {
                slots.copy_slot(last, index);
            }
        }
        self.len -= 1;
    }

    /// Copies the element at `index` into `out`, then [`swap_delete`]s it.
    ///
    /// [`swap_delete`]: BlobVec::swap_delete
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::ElementSizeMismatch` if `out` is not one
    /// element long.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn swap_remove(&mut self, index: usize, out: &mut [u8]) -> Result<()> {
        self.check_size(out.len())?;
        self.check_index(index);
        self.read_into(index, out);
        self.swap_delete(index);
        Ok(())
    }

    /// Exchanges the elements at `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[track_caller]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.check_index(a);
        self.check_index(b);
        if let Some(mut slots) = self.slots_mut() {
            slots.swap(a, b);
        }
    }

    /// Reverses the order of the elements in place.
    pub fn reverse(&mut self) {
        let len = self.len;
        if let Some(mut slots) = self.slots_mut() {
            slots.reverse(len);
        }
    }

    /// Allocates a buffer of `capacity` slots holding a copy of `src`.
    fn duplicate(item: Layout, capacity: usize, src: &[u8]) -> Result<Option<RawBuffer>> {
        if capacity == 0 {
            return Ok(None);
        }
        let mut buffer = RawBuffer::allocate(item, capacity)?;
        buffer.as_bytes_mut()[..src.len()].copy_from_slice(src);
        Ok(Some(buffer))
    }

    /// Makes `other` a deep copy of `self`.
    ///
    /// `other` receives a new buffer with `self`'s capacity, along with
    /// `self`'s length and element layout. Its previous contents are
    /// released. On failure `other` is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::AllocationFailed` if the copy cannot be
    /// allocated.
    pub fn copy(&self, other: &mut Self) -> Result<()> {
        other.buffer = Self::duplicate(self.item, self.capacity(), self.as_bytes())?;
        other.len = self.len;
        other.item = self.item;
        Ok(())
    }

    /// Makes `other` a copy of the elements `[start, end)` of `self`.
    ///
    /// `other` ends up with length and capacity `end - start` and `self`'s
    /// element layout. On failure `other` is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::AllocationFailed` if the copy cannot be
    /// allocated.
    ///
    /// # Panics
    ///
    /// Panics if `end > len()` or `start > end`.
    #[track_caller]
    pub fn inner_copy(&self, other: &mut Self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end);
        let count = end - start;
        let size = self.item.size();
        let src = &self.as_bytes()[start * size..end * size];
        other.buffer = Self::duplicate(self.item, count, src)?;
        other.len = count;
        other.item = self.item;
        Ok(())
    }

    /// Keeps only the elements `[start, end)` and shrinks the capacity to
    /// match.
    ///
    /// This is [`BlobVec::inner_copy`] with `self` as the destination.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::AllocationFailed` if the final shrink fails; the
    /// elements are already in place and only the spare capacity remains.
    ///
    /// # Panics
    ///
    /// Panics if `end > len()` or `start > end`.
    #[track_caller]
    pub fn retain_range(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end);
        if let Some(mut slots) = self.slots_mut() {
            slots.move_to_front(start, end);
        }
        self.len = end - start;
        self.shrink_to_fit()
    }

    #[track_caller]
    fn check_range(&self, start: usize, end: usize) {
        if end > self.len {
            index_out_of_bounds(end, self.len);
        }
        if start > end {
            error!("range start {start} is past its end {end}");
            panic!("slice index starts at {start} but ends at {end}");
        }
    }

    /// Moves all elements of `other` to the end of `self`, leaving `other`
    /// empty with its buffer released.
    ///
    /// An empty `self` allocates exactly `other.len()` slots; a `self` too
    /// small to take them grows by exactly `other.len()` slots.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::ElementSizeMismatch` if the element sizes
    /// differ, or an allocation error. On error both vectors are unchanged.
    pub fn append(&mut self, other: &mut Self) -> Result<()> {
        self.check_size(other.element_size())?;
        let count = other.len;
        if count > 0 {
            if self.buffer.is_none() {
                self.set_capacity(count)?;
            } else if self.len + count > self.capacity() {
                self.reserve(count)?;
            }
            let len = self.len;
            if let Some(mut slots) = self.slots_mut() {
                slots.write_many(len, other.as_bytes());
            }
            self.len += count;
        }
        other.clear();
        Ok(())
    }

    /// Moves the elements `[index, len)` into `other`, keeping `[0, index)`.
    ///
    /// `other`'s previous contents are released; it receives a buffer of
    /// exactly the moved elements and `self`'s element layout. `self` keeps
    /// its capacity.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::AllocationFailed` if `other`'s buffer cannot be
    /// allocated. On error both vectors are unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    #[track_caller]
    pub fn split_at(&mut self, other: &mut Self, index: usize) -> Result<()> {
        if index > self.len {
            index_out_of_bounds(index, self.len);
        }
        let count = self.len - index;
        let size = self.item.size();
        let tail = &self.as_bytes()[index * size..];
        other.buffer = Self::duplicate(self.item, count, tail)?;
        other.len = count;
        other.item = self.item;
        self.len = index;
        Ok(())
    }
}

impl fmt::Debug for BlobVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobVec")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("element_size", &self.item.size())
            .field("bytes", &self.as_bytes())
            .finish()
    }
}

/// Vectors are equal when they have the same element size and byte-equal
/// elements; capacity is ignored.
impl PartialEq for BlobVec {
    fn eq(&self, other: &Self) -> bool {
        self.item.size() == other.item.size() && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for BlobVec {}

/// Drops every vector of `vecs`, front to back.
pub fn drop_many<I>(vecs: I)
where
    I: IntoIterator<Item = BlobVec>,
{
    for (i, vec) in vecs.into_iter().enumerate() {
        trace!("dropping vector #{i} ({} elements)", vec.len());
        drop(vec);
    }
}
