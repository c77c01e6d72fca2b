//! Heap storage backing a `BlobVec`.

use alloc::alloc::{alloc_zeroed, dealloc, realloc, Layout};
use core::mem::ManuallyDrop;
use core::ptr::NonNull;
use core::slice;

use log::trace;

use crate::error::{BlobVecError, Result};

/// Computes the layout of `capacity` consecutive slots of `item`.
///
/// `item.size()` must already be a multiple of `item.align()`.
pub(crate) fn array_layout(item: Layout, capacity: usize) -> Result<Layout> {
    let overflow = || BlobVecError::CapacityOverflow {
        capacity,
        element_size: item.size(),
    };
    let bytes = item.size().checked_mul(capacity).ok_or_else(overflow)?;
    Layout::from_size_align(bytes, item.align()).map_err(|_| overflow())
}

/// An owned heap region of `capacity` slots.
///
/// The region is zero-filled when allocated or grown, so every byte of it is
/// initialized memory and may be viewed as `&[u8]`. Only non-empty regions
/// exist: an empty vector holds no `RawBuffer` at all.
#[derive(Debug)]
pub(crate) struct RawBuffer {
    ptr: NonNull<u8>,
    capacity: usize,
    item: Layout,
}

// Safety: `RawBuffer` uniquely owns a region of plain bytes.
unsafe impl Send for RawBuffer {}

// Safety: shared access only hands out `&[u8]`.
unsafe impl Sync for RawBuffer {}

impl RawBuffer {
    /// Allocates a zeroed region of `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::CapacityOverflow` if the byte size overflows and
    /// `BlobVecError::AllocationFailed` if the allocator returns null.
    pub(crate) fn allocate(item: Layout, capacity: usize) -> Result<Self> {
        debug_assert!(item.size() > 0 && capacity > 0);
        let layout = array_layout(item, capacity)?;

        // Safety: `layout` has a non-zero size.
        let ptr = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr).ok_or(BlobVecError::AllocationFailed {
            bytes: layout.size(),
        })?;

        trace!("allocated {} bytes ({capacity} slots) at {ptr:p}", layout.size());
        Ok(Self {
            ptr,
            capacity,
            item,
        })
    }

    /// Adopts a region allocated elsewhere.
    ///
    /// # Safety
    ///
    /// `ptr` must come from the global allocator with the layout
    /// `array_layout(item, capacity)`, that layout must be valid, every byte
    /// of the region must be initialized, and nothing else may use or free
    /// the region afterwards.
    pub(crate) unsafe fn from_raw_parts(ptr: NonNull<u8>, capacity: usize, item: Layout) -> Self {
        debug_assert!(capacity > 0);
        trace!("adopted {} bytes ({capacity} slots) at {ptr:p}", capacity * item.size());
        Self {
            ptr,
            capacity,
            item,
        }
    }

    /// Gives up ownership of the region without freeing it.
    pub(crate) fn into_raw(self) -> NonNull<u8> {
        let this = ManuallyDrop::new(self);
        this.ptr
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn byte_len(&self) -> usize {
        self.capacity * self.item.size()
    }

    /// Layout the region is currently allocated with.
    fn current_layout(&self) -> Layout {
        // Safety: validated by `array_layout` when the region was allocated
        // or last reallocated.
        unsafe { Layout::from_size_align_unchecked(self.byte_len(), self.item.align()) }
    }

    /// Reallocates the region to hold exactly `capacity` slots.
    ///
    /// Bytes gained by growing are zero-filled. Bytes lost by shrinking are
    /// forgotten. On failure the old region stays owned and untouched.
    ///
    /// # Errors
    ///
    /// Returns `BlobVecError::CapacityOverflow` or
    /// `BlobVecError::AllocationFailed`.
    pub(crate) fn reallocate(&mut self, capacity: usize) -> Result<()> {
        debug_assert!(capacity > 0);
        if capacity == self.capacity {
            return Ok(());
        }

        let old_layout = self.current_layout();
        let new_layout = array_layout(self.item, capacity)?;

        // Safety: `ptr` was allocated with `old_layout`, the new size is
        // non-zero and was checked by `array_layout`.
        let ptr = unsafe { realloc(self.ptr.as_ptr(), old_layout, new_layout.size()) };
        let ptr = NonNull::new(ptr).ok_or(BlobVecError::AllocationFailed {
            bytes: new_layout.size(),
        })?;

        if new_layout.size() > old_layout.size() {
            // Safety: the tail lies inside the new allocation.
            unsafe {
                ptr.as_ptr()
                    .add(old_layout.size())
                    .write_bytes(0, new_layout.size() - old_layout.size());
            }
        }

        trace!(
            "reallocated {:p} ({} slots) -> {ptr:p} ({capacity} slots)",
            self.ptr,
            self.capacity
        );
        self.ptr = ptr;
        self.capacity = capacity;
        Ok(())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        // Safety: the region is `byte_len` initialized bytes owned by `self`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.byte_len()) }
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        // Safety: as above, and `&mut self` guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.byte_len()) }
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        trace!("released {} bytes at {:p}", self.byte_len(), self.ptr);
        // Safety: we own the region and it was allocated with this layout.
        unsafe { dealloc(self.ptr.as_ptr(), self.current_layout()) }
    }
}
