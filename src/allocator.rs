//! Allocation facility backing internal state
//!
//! `InternalAllocator` hands out uninitialized storage for arrays of `T`,
//! and lets its caller construct and destroy values in that storage. It is
//! backed by the platform's default allocator. All instances are equivalent:
//! storage allocated through one of them may be released through any other,
//! including one obtained by rebinding to another element type and back.
//!
//! Allocation failures are reported at the call site as an `AllocError`.
//! They never travel through the completion protocol.

use std::alloc::{self as platform, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};
use thiserror::Error;


/// Failure to allocate storage
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AllocError {
    /// The requested element count does not fit in the address space
    #[error("cannot allocate {requested} elements, at most {max} are possible")]
    CapacityOverflow { requested: usize, max: usize },

    /// The platform allocator ran out of memory
    #[error("out of memory while allocating {bytes} bytes")]
    OutOfMemory { bytes: usize },
}


/// Typed allocator for internal storage
pub struct InternalAllocator<T> {
    element: PhantomData<fn() -> T>,
}
//
impl<T> InternalAllocator<T> {
    /// Create an allocator for elements of type T
    pub const fn new() -> Self {
        InternalAllocator { element: PhantomData }
    }

    /// Get an equivalent allocator for another element type
    pub const fn rebind<U>(&self) -> InternalAllocator<U> {
        InternalAllocator::new()
    }

    /// Largest element count which can be requested
    pub const fn max_size(&self) -> usize {
        if mem::size_of::<T>() == 0 {
            usize::MAX
        } else {
            // Layouts are limited to isize::MAX bytes
            (isize::MAX as usize) / mem::size_of::<T>()
        }
    }

    /// Allocate uninitialized storage for `count` elements
    pub fn allocate(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let layout = self.layout(count)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        // SAFETY: The layout has a nonzero size
        let raw = unsafe { platform::alloc(layout) } as *mut T;
        NonNull::new(raw).ok_or(AllocError::OutOfMemory { bytes: layout.size() })
    }

    /// Release storage obtained from `allocate`
    ///
    /// # Safety
    ///
    /// `storage` must come from a call to `allocate(count)` on an allocator
    /// for the same element type, and must not have been released already.
    /// Any value constructed in the storage must have been destroyed first.
    ///
    pub unsafe fn deallocate(&self, storage: NonNull<T>, count: usize) {
        let layout = match self.layout(count) {
            Ok(layout) => layout,
            Err(_) => unreachable!("storage cannot come from a failed allocation"),
        };
        if layout.size() != 0 {
            platform::dealloc(storage.as_ptr() as *mut u8, layout);
        }
    }

    /// Move a value into uninitialized storage
    ///
    /// # Safety
    ///
    /// `slot` must point to allocated, uninitialized storage for one T.
    ///
    pub unsafe fn construct(&self, slot: NonNull<T>, value: T) {
        ptr::write(slot.as_ptr(), value);
    }

    /// Drop a value in place, leaving its storage uninitialized
    ///
    /// # Safety
    ///
    /// `slot` must point to an initialized T, which is not used afterwards.
    ///
    pub unsafe fn destroy(&self, slot: NonNull<T>) {
        ptr::drop_in_place(slot.as_ptr());
    }

    fn layout(&self, count: usize) -> Result<Layout, AllocError> {
        let overflow = AllocError::CapacityOverflow {
            requested: count,
            max: self.max_size(),
        };
        if count > self.max_size() {
            return Err(overflow);
        }
        Layout::array::<T>(count).map_err(|_| overflow)
    }
}
//
impl<T> Clone for InternalAllocator<T> {
    fn clone(&self) -> Self {
        InternalAllocator::new()
    }
}
//
impl<T> Copy for InternalAllocator<T> {}
//
impl<T> Default for InternalAllocator<T> {
    fn default() -> Self {
        InternalAllocator::new()
    }
}
//
impl<T, U> PartialEq<InternalAllocator<U>> for InternalAllocator<T> {
    fn eq(&self, _other: &InternalAllocator<U>) -> bool {
        true
    }
}
//
impl<T> Eq for InternalAllocator<T> {}
//
impl<T> std::fmt::Debug for InternalAllocator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "InternalAllocator<{}>", std::any::type_name::<T>())
    }
}
