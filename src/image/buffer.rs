//! Shared sample storage behind an `Image`.
//!
//! Grounded on the teacher's `Tensor<T> { shape, data: Vec<T> }` /
//! `StridedTensor<T>` pair (`types/tensor.rs`): one owned, contiguous
//! allocation, referenced by value elsewhere. We add the sharing and
//! interior-mutability the teacher didn't need (its tensors are consumed,
//! not aliased) because views must borrow the same allocation as their
//! parent, per Design Note 9 ("views and crops are cheap value copies that
//! share the buffer via refcount").

use std::cell::UnsafeCell;
use std::sync::Arc;

/// Owned, contiguous sample storage shared by an image and all of its
/// views.
///
/// Wrapped in `UnsafeCell` so that code holding only `&ImageBuffer<T>` can
/// still write individual samples: the processing frameworks split the
/// "other dimensions" iteration space into disjoint coordinate tiles and
/// hand every worker thread a shared reference into the same buffer,
/// writing only within its own tile. `Image` never exposes an API that lets
/// two threads address the same sample concurrently; the `unsafe impl`
/// below is sound under that single caller-enforced invariant, which is the
/// concrete form of spec §5's "images are not locked; it is the caller's
/// responsibility that concurrent framework calls do not share a writable
/// image."
pub struct ImageBuffer<T> {
    data: Box<[UnsafeCell<T>]>,
}

// SAFETY: `ImageBuffer<T>` is sound to share across threads as long as
// callers never let two threads address the same cell concurrently, which
// is a property of how `Image` and the frameworks use it, not of `T`.
unsafe impl<T: Send> Send for ImageBuffer<T> {}
unsafe impl<T: Sync> Sync for ImageBuffer<T> {}

impl<T: Copy + Default> ImageBuffer<T> {
    pub fn new_zeroed(len: usize) -> Arc<ImageBuffer<T>> {
        let mut v = Vec::with_capacity(len);
        v.resize_with(len, || UnsafeCell::new(T::default()));
        Arc::new(ImageBuffer { data: v.into_boxed_slice() })
    }

    pub fn from_vec(values: Vec<T>) -> Arc<ImageBuffer<T>> {
        let data: Box<[UnsafeCell<T>]> = values.into_iter().map(UnsafeCell::new).collect();
        Arc::new(ImageBuffer { data })
    }
}

impl<T> ImageBuffer<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reads the sample at `index`. Caller guarantees no other thread is
    /// concurrently writing `index`.
    ///
    /// # Safety
    /// `index` must be in bounds.
    #[inline]
    pub unsafe fn read(&self, index: usize) -> T
    where
        T: Copy,
    {
        *self.data.get_unchecked(index).get()
    }

    /// Writes the sample at `index`. Caller guarantees exclusive access to
    /// `index` for the duration of the write (no other thread reads or
    /// writes the same index concurrently).
    ///
    /// # Safety
    /// `index` must be in bounds.
    #[inline]
    pub unsafe fn write(&self, index: usize, value: T) {
        *self.data.get_unchecked(index).get() = value;
    }

    /// Bounds-checked read, for single-threaded call sites that would
    /// rather pay the branch than prove boundedness by construction.
    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Copy,
    {
        if index < self.data.len() {
            Some(unsafe { self.read(index) })
        } else {
            None
        }
    }

    /// Bounds-checked write; see [`Self::get`].
    pub fn set(&self, index: usize, value: T) -> bool {
        if index < self.data.len() {
            unsafe { self.write(index, value) };
            true
        } else {
            false
        }
    }

    /// Copies out the whole buffer in storage order. Used by `Image::copy`
    /// and by tests asserting on raw contents.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Copy,
    {
        (0..self.data.len()).map(|i| unsafe { self.read(i) }).collect()
    }

    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr() as *const T
    }

    pub fn as_mut_ptr(&self) -> *mut T {
        self.data.as_ptr() as *mut T
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_buffer_reads_back_default() {
        let buf = ImageBuffer::<u16>::new_zeroed(4);
        for i in 0..4 {
            assert_eq!(buf.get(i), Some(0));
        }
        assert_eq!(buf.get(4), None);
    }

    #[test]
    fn write_then_read_round_trips() {
        let buf = ImageBuffer::<f64>::new_zeroed(3);
        assert!(buf.set(1, 3.5));
        assert_eq!(buf.get(1), Some(3.5));
        assert!(!buf.set(10, 1.0));
    }
}
