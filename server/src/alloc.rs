/*
 * Created on Mon Jul 27 2026
 *
 * This file is a part of Skytable
 * Skytable (formerly known as TerrabaseDB or Skybase) is a free and open-source
 * NoSQL database written by Sayan Nandan ("the Author") with the
 * vision to provide flexibility in data modelling without compromising
 * on performance, queryability or scalability.
 *
 * Copyright (c) 2026, Sayan Nandan <ohsayan@outlook.com>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! Allocator abstraction shared by [`crate::grmap`] and [`crate::hullset`].
//!
//! Neither subsystem talks to the global allocator directly; both take an
//! `&impl Allocator` so that an embedder can supply an arena, a pool, or
//! plain `std::alloc` without either core caring which.

pub use core::alloc::Layout;
use core::ptr::NonNull;

/// malloc/realloc/free, abstracted away from the concrete global allocator.
///
/// # Safety
/// Implementors must return pointers valid for `layout` and must not alias
/// a live allocation across two calls without an intervening `deallocate`.
pub unsafe trait Allocator {
    /// Allocate a fresh block for `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, ()>;
    /// Grow or shrink a previous allocation described by `old_layout` to
    /// `new_layout`, preserving the overlapping prefix of its contents.
    ///
    /// # Safety
    /// `ptr` must have been returned by a previous `allocate`/`reallocate`
    /// call on `self` with `old_layout`, and not yet freed.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<u8>, ()>;
    /// Release a previous allocation.
    ///
    /// # Safety
    /// `ptr` must have been returned by a previous `allocate`/`reallocate`
    /// call on `self` with `layout`, and not yet freed.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The process's default (global) allocator.
#[derive(Clone, Copy, Default)]
pub struct Global;

unsafe impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, ()> {
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        unsafe { NonNull::new(std::alloc::alloc(layout)).ok_or(()) }
    }
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<u8>, ()> {
        if new_layout.align() != old_layout.align() {
            // the global allocator can't change alignment in place; do it the slow way
            let new = self.allocate(new_layout)?;
            let copy_len = old_layout.size().min(new_layout.size());
            core::ptr::copy_nonoverlapping(ptr.as_ptr(), new.as_ptr(), copy_len);
            self.deallocate(ptr, old_layout);
            return Ok(new);
        }
        let raw = std::alloc::realloc(ptr.as_ptr(), old_layout, new_layout.size());
        NonNull::new(raw).ok_or(())
    }
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        std::alloc::dealloc(ptr.as_ptr(), layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_alloc_roundtrip() {
        let a = Global;
        let layout = Layout::array::<u64>(8).unwrap();
        unsafe {
            let ptr = a.allocate(layout).unwrap();
            let bigger = Layout::array::<u64>(16).unwrap();
            let ptr = a.reallocate(ptr, layout, bigger).unwrap();
            a.deallocate(ptr, bigger);
        }
    }
}
