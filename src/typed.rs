//! Typed facade over `BlobVec`.

use alloc::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;

use bytemuck::Pod;

use crate::core::BlobVec;
use crate::error::{BlobVecError, Result};
use crate::growth::GrowthPolicy;

/// A `BlobVec` whose slots hold values of `T`.
///
/// `T: Pod` guarantees every slot is a valid `T` whatever its bytes, so the
/// buffer can be handed out as `&[T]`. Slots are laid out with
/// `Layout::new::<T>()`, which keeps them aligned for `T`.
pub struct TypedVec<T: Pod> {
    raw: BlobVec,
    _marker: PhantomData<T>,
}

impl<T: Pod> TypedVec<T> {
    /// # Panics
    ///
    /// Panics if `T` is zero-sized.
    #[must_use]
    #[track_caller]
    pub fn new() -> Self {
        Self::wrap(BlobVec::with_layout(Layout::new::<T>()))
    }

    fn wrap(raw: BlobVec) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Creates an empty vector with room for exactly `capacity` values.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the buffer cannot be allocated.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        BlobVec::with_capacity_and_layout(capacity, Layout::new::<T>()).map(Self::wrap)
    }

    /// Creates a vector holding a copy of `values`, with no spare capacity.
    ///
    /// # Errors
    ///
    /// As [`TypedVec::with_capacity`].
    #[track_caller]
    pub fn from_slice(values: &[T]) -> Result<Self> {
        let mut vec = Self::with_capacity(values.len())?;
        for value in values {
            vec.push(*value)?;
        }
        Ok(vec)
    }

    /// Creates a vector of `len` copies of `value`.
    ///
    /// # Errors
    ///
    /// As [`TypedVec::with_capacity`].
    #[track_caller]
    pub fn with_value(value: T, len: usize) -> Result<Self> {
        let mut vec = Self::with_capacity(len)?;
        for _ in 0..len {
            vec.push(value)?;
        }
        Ok(vec)
    }

    /// Reinterprets a `BlobVec` as a vector of `T`.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::ElementSizeMismatch` if the element size is not
    /// `size_of::<T>()` and `BlobVecError::AlignmentMismatch` if the slots are
    /// aligned less strictly than `T` requires. The blob is dropped in both
    /// cases.
    pub fn from_blob(raw: BlobVec) -> Result<Self> {
        let layout = Layout::new::<T>();
        if raw.element_size() != layout.size() {
            return Err(BlobVecError::ElementSizeMismatch {
                expected: layout.size(),
                found: raw.element_size(),
            });
        }
        if raw.item_layout().align() < layout.align() {
            return Err(BlobVecError::AlignmentMismatch {
                required: layout.align(),
                found: raw.item_layout().align(),
            });
        }
        Ok(Self::wrap(raw))
    }

    #[must_use]
    pub fn into_blob(self) -> BlobVec {
        self.raw
    }

    #[must_use]
    pub fn as_blob(&self) -> &BlobVec {
        &self.raw
    }

    #[must_use]
    pub fn with_growth_policy(self, growth: GrowthPolicy) -> Self {
        Self::wrap(self.raw.with_growth_policy(growth))
    }

    pub fn set_growth_policy(&mut self, growth: GrowthPolicy) {
        self.raw.set_growth_policy(growth);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        if self.raw.is_empty() {
            return &[];
        }
        bytemuck::cast_slice(self.raw.as_bytes())
    }

    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.raw.is_empty() {
            return &mut [];
        }
        bytemuck::cast_slice_mut(self.raw.as_bytes_mut())
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    #[track_caller]
    pub fn peek(&self, index: usize) -> &T {
        bytemuck::from_bytes(self.raw.peek(index))
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    #[track_caller]
    pub fn peek_mut(&mut self, index: usize) -> &mut T {
        bytemuck::from_bytes_mut(self.raw.peek_mut(index))
    }

    /// # Errors
    ///
    /// Returns `BlobVecError::IndexOutOfBounds` if `index` is out of bounds.
    pub fn try_peek(&self, index: usize) -> Result<&T> {
        self.raw.try_peek(index).map(bytemuck::from_bytes)
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn set(&mut self, index: usize, value: T) {
        *self.peek_mut(index) = value;
    }

    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.raw.contains(bytemuck::bytes_of(value))
    }

    /// Index of the first element byte-wise equal to `value`.
    #[must_use]
    pub fn search(&self, value: &T) -> Option<usize> {
        self.raw.search(bytemuck::bytes_of(value))
    }

    /// See [`BlobVec::resize`].
    ///
    /// # Errors
    ///
    /// As [`BlobVec::resize`].
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        self.raw.resize(new_capacity)
    }

    /// See [`BlobVec::reserve`].
    ///
    /// # Errors
    ///
    /// As [`BlobVec::reserve`].
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.raw.reserve(additional)
    }

    /// # Errors
    ///
    /// As [`BlobVec::shrink_to_fit`].
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        self.raw.shrink_to_fit()
    }

    /// See [`BlobVec::truncate`].
    ///
    /// # Errors
    ///
    /// As [`BlobVec::truncate`].
    pub fn truncate(&mut self, new_len: usize) -> Result<()> {
        self.raw.truncate(new_len)
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// # Errors
    ///
    /// Returns an allocation error if growing fails.
    pub fn push(&mut self, value: T) -> Result<()> {
        self.raw.push(bytemuck::bytes_of(&value))
    }

    /// # Errors
    ///
    /// Returns an allocation error if growing fails.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        self.raw.insert(index, bytemuck::bytes_of(&value))
    }

    /// Removes the last value and returns it, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        let mut value = T::zeroed();
        self.raw.pop(bytemuck::bytes_of_mut(&mut value)).ok()?;
        Some(value)
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn delete(&mut self, index: usize) {
        self.raw.delete(index);
    }

    /// Removes and returns the value at `index`, shifting later values left.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        let value = *self.peek(index);
        self.raw.delete(index);
        value
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn swap_delete(&mut self, index: usize) {
        self.raw.swap_delete(index);
    }

    /// Removes and returns the value at `index`, moving the last value into
    /// its place.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn swap_remove(&mut self, index: usize) -> T {
        let value = *self.peek(index);
        self.raw.swap_delete(index);
        value
    }

    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[track_caller]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.raw.swap(a, b);
    }

    pub fn reverse(&mut self) {
        self.raw.reverse();
    }

    /// See [`BlobVec::copy`].
    ///
    /// # Errors
    ///
    /// As [`BlobVec::copy`].
    pub fn copy(&self, other: &mut Self) -> Result<()> {
        self.raw.copy(&mut other.raw)
    }

    /// See [`BlobVec::inner_copy`].
    ///
    /// # Errors
    ///
    /// As [`BlobVec::inner_copy`].
    ///
    /// # Panics
    ///
    /// Panics if `end > len()` or `start > end`.
    #[track_caller]
    pub fn inner_copy(&self, other: &mut Self, start: usize, end: usize) -> Result<()> {
        self.raw.inner_copy(&mut other.raw, start, end)
    }

    /// See [`BlobVec::retain_range`].
    ///
    /// # Errors
    ///
    /// As [`BlobVec::retain_range`].
    ///
    /// # Panics
    ///
    /// Panics if `end > len()` or `start > end`.
    #[track_caller]
    pub fn retain_range(&mut self, start: usize, end: usize) -> Result<()> {
        self.raw.retain_range(start, end)
    }

    /// See [`BlobVec::append`].
    ///
    /// # Errors
    ///
    /// Returns an allocation error if growing fails.
    pub fn append(&mut self, other: &mut Self) -> Result<()> {
        self.raw.append(&mut other.raw)
    }

    /// See [`BlobVec::split_at`].
    ///
    /// # Errors
    ///
    /// Returns an allocation error if `other`'s buffer cannot be allocated.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    #[track_caller]
    pub fn split_at(&mut self, other: &mut Self, index: usize) -> Result<()> {
        self.raw.split_at(&mut other.raw, index)
    }
}

impl<T: Pod> Default for TypedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod + fmt::Debug> fmt::Debug for TypedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T: Pod + PartialEq> PartialEq for TypedVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Pod + Eq> Eq for TypedVec<T> {}

impl<T: Pod + PartialEq> PartialEq<[T]> for TypedVec<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Pod + PartialEq> PartialEq<&[T]> for TypedVec<T> {
    fn eq(&self, other: &&[T]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: Pod + PartialEq, const N: usize> PartialEq<[T; N]> for TypedVec<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Pod> From<TypedVec<T>> for BlobVec {
    fn from(vec: TypedVec<T>) -> Self {
        vec.into_blob()
    }
}
