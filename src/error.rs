use thiserror::Error;

/// Error types for `BlobVec` and `TypedVec` operations
///
/// Programming errors (a zero element size, an index past the end) are not
/// represented here: those operations panic. `IndexOutOfBounds` is only
/// returned by the non-panicking `try_peek`.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum BlobVecError {
    /// The allocator could not provide the requested region
    #[error("Allocation failed: could not allocate {bytes} bytes")]
    AllocationFailed {
        /// Size of the rejected allocation in bytes
        bytes: usize,
    },
    /// The byte size of the requested buffer does not fit in `isize`
    #[error("Capacity overflow: {capacity} slots of {element_size} bytes")]
    CapacityOverflow {
        /// Requested number of slots
        capacity: usize,
        /// Size of one slot in bytes
        element_size: usize,
    },
    /// A buffer handed to the vector is unusable
    #[error("Invalid buffer: {reason}")]
    InvalidBuffer {
        /// Description of why the buffer was rejected
        reason: &'static str,
    },
    /// Operation attempted on an empty vector
    #[error("Operation on empty vector")]
    Empty,
    /// `resize` was asked for a capacity below the current length
    #[error("Resize would truncate: length {length} exceeds requested capacity {requested}")]
    WouldTruncate {
        /// Current length of the vector
        length: usize,
        /// Capacity that was requested
        requested: usize,
    },
    /// A value, output slot or partner vector has the wrong element size
    #[error("Element size mismatch: expected {expected} bytes, found {found}")]
    ElementSizeMismatch {
        /// Element size of the vector
        expected: usize,
        /// Size that was provided
        found: usize,
    },
    /// A blob is not aligned strictly enough for the requested element type
    #[error("Alignment mismatch: element type requires {required}, buffer provides {found}")]
    AlignmentMismatch {
        /// Alignment required by the element type
        required: usize,
        /// Alignment of the blob slots
        found: usize,
    },
    /// Index is beyond the current vector length
    #[error("Index out of bounds: index {index} is beyond vector length {length}")]
    IndexOutOfBounds {
        /// Index that was accessed
        index: usize,
        /// Current length of the vector
        length: usize,
    },
}

pub type Result<T> = core::result::Result<T, BlobVecError>;
