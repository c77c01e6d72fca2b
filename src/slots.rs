use core::ops::Range;

/// Slot-addressed view over an element buffer.
///
/// Every move that may overlap goes through `copy_within`, which is
/// memmove-safe. Callers validate indices; an index outside the buffer is a
/// bug in the caller and panics via slice indexing.
#[derive(Debug)]
pub(crate) struct Slots<'a> {
    bytes: &'a mut [u8],
    size: usize,
}

#[allow(clippy::indexing_slicing)] // Indices are validated by `BlobVec`
impl<'a> Slots<'a> {
    pub(crate) fn new(bytes: &'a mut [u8], size: usize) -> Self {
        debug_assert!(size > 0 && bytes.len() % size == 0);
        Self { bytes, size }
    }

    /// Byte range of the slots `[start, end)`.
    fn span(&self, start: usize, end: usize) -> Range<usize> {
        start * self.size..end * self.size
    }

    pub(crate) fn write(&mut self, index: usize, value: &[u8]) {
        let range = self.span(index, index + 1);
        self.bytes[range].copy_from_slice(value);
    }

    pub(crate) fn read(&self, index: usize, out: &mut [u8]) {
        out.copy_from_slice(&self.bytes[self.span(index, index + 1)]);
    }

    /// Copies `src` into the slots starting at `index`.
    pub(crate) fn write_many(&mut self, index: usize, src: &[u8]) {
        let start = index * self.size;
        self.bytes[start..start + src.len()].copy_from_slice(src);
    }

    /// Moves slots `[index, len)` one slot to the right, opening a hole at
    /// `index`. Slot `len` must exist.
    pub(crate) fn shift_right(&mut self, index: usize, len: usize) {
        let src = self.span(index, len);
        self.bytes.copy_within(src, (index + 1) * self.size);
    }

    /// Moves slots `(index, len)` one slot to the left, overwriting `index`.
    pub(crate) fn shift_left(&mut self, index: usize, len: usize) {
        let src = self.span(index + 1, len);
        self.bytes.copy_within(src, index * self.size);
    }

    pub(crate) fn copy_slot(&mut self, from: usize, to: usize) {
        let src = self.span(from, from + 1);
        self.bytes.copy_within(src, to * self.size);
    }

    /// Moves slots `[start, end)` to the front of the buffer.
    pub(crate) fn move_to_front(&mut self, start: usize, end: usize) {
        let src = self.span(start, end);
        self.bytes.copy_within(src, 0);
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.bytes.split_at_mut(hi * self.size);
        let lo_range = lo * self.size..(lo + 1) * self.size;
        head[lo_range].swap_with_slice(&mut tail[..self.size]);
    }

    pub(crate) fn reverse(&mut self, len: usize) {
        for i in 0..len / 2 {
            self.swap(i, len - i - 1);
        }
    }
}

/// Index of the first `size`-byte slot of `bytes` equal to `value`.
pub(crate) fn position(bytes: &[u8], size: usize, value: &[u8]) -> Option<usize> {
    if value.len() != size {
        return None;
    }
    bytes.chunks_exact(size).position(|slot| slot == value)
}
