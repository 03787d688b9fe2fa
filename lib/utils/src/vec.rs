//! Append-only storage for objects that live as long as the kernel.
//!
//! [LockedVecStatic] owns boxed values behind a [RwLock] and hands out
//! `&'static` references to them. Values are never removed, so a reference
//! obtained from a `static` instance stays valid for the rest of the run.
//! The `&'static self` receivers restrict the API to such instances.

use alloc::{boxed::Box, vec, vec::Vec};
use core::{cell::UnsafeCell, fmt::Debug};
use spin::RwLock;

pub struct LockedVecStatic<T: ?Sized> {
    lock: RwLock<()>,
    cell: UnsafeCell<Vec<Box<T>>>,
}

unsafe impl<T: ?Sized + Sync> Sync for LockedVecStatic<T> {}

impl<T: ?Sized> LockedVecStatic<T> {
    pub const fn new() -> LockedVecStatic<T> {
        LockedVecStatic {
            lock: RwLock::new(()),
            cell: UnsafeCell::new(vec![]),
        }
    }

    /// Append an already-boxed value and return a stable reference to it
    /// together with its index.
    pub fn push_boxed(&'static self, value: Box<T>) -> (&'static T, usize) {
        let guard = self.lock.write();
        let vec = unsafe { &mut *self.cell.get() };
        let index = vec.len();
        vec.push(value);
        // The box gives the value a stable address; growing the vector moves
        // the boxes, not their contents.
        let stable = unsafe { &*(vec[index].as_ref() as *const T) };
        drop(guard);
        (stable, index)
    }

    pub fn get(&'static self, index: usize) -> Option<&'static T> {
        let guard = self.lock.read();
        let vec = unsafe { &*self.cell.get() };
        let res = vec
            .get(index)
            .map(|value| unsafe { &*(value.as_ref() as *const T) });
        drop(guard);
        res
    }

    /// Collect references to every stored value, preserving insertion order.
    pub fn snapshot(&'static self) -> Vec<&'static T> {
        let guard = self.lock.read();
        let vec = unsafe { &*self.cell.get() };
        let mut res = vec![];
        for value in vec.iter() {
            res.push(unsafe { &*(value.as_ref() as *const T) });
        }
        drop(guard);
        res
    }

    pub fn len(&self) -> usize {
        let guard = self.lock.read();
        let len = unsafe { &*self.cell.get() }.len();
        drop(guard);
        len
    }
}

impl<T: ?Sized + Debug> Debug for LockedVecStatic<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let guard = self.lock.read();
        let vec = unsafe { &*self.cell.get() };
        let res = f.debug_list().entries(vec.iter()).finish();
        drop(guard);
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static STORE: LockedVecStatic<usize> = LockedVecStatic::new();

    #[test]
    fn push_preserves_order() {
        let (first, i) = STORE.push_boxed(Box::new(10));
        let (second, j) = STORE.push_boxed(Box::new(20));
        assert_eq!(*first, 10);
        assert_eq!(*second, 20);
        assert_eq!(j, i + 1);
        assert_eq!(STORE.get(i), Some(&10));
        assert_eq!(STORE.get(STORE.len()), None);

        let snap = STORE.snapshot();
        assert_eq!(snap[i], &10);
        assert_eq!(snap[j], &20);
    }
}
