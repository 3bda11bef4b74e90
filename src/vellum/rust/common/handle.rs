// SPDX-License-Identifier: GPL-3.0-or-later
use crate::{vl_status_t, Error, Result, Status};
use parking_lot::RwLock;
use std::{
    ptr::{self, NonNull},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tracing::{debug, trace};

/// One kind of foreign object.
pub trait Foreign {
    type Raw;

    const NAME: &'static str;

    /// Position in the global lock order. When two handles of different
    /// kinds are locked together, the lower rank is locked first.
    const LOCK_RANK: u8;

    /// Drops the reference owned by a handle.
    unsafe fn destroy(raw: *mut Self::Raw);
}

/// Shared flag that tells dependents whether a handle has been released.
#[derive(Clone, Debug, Default)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn is_released(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn mark_released(&self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Owns one reference to a foreign object. Access goes through a
/// reader-writer lock and fails with `Error::NullHandle` once the handle has
/// been released, either explicitly or by dropping it.
pub struct ForeignHandle<K: Foreign> {
    slot: RwLock<Option<NonNull<K::Raw>>>,
    liveness: Liveness,
}

// The foreign objects are reference counted atomically and every access to
// the pointer goes through the lock.
unsafe impl<K: Foreign> Send for ForeignHandle<K> {}
unsafe impl<K: Foreign> Sync for ForeignHandle<K> {}

impl<K: Foreign> ForeignHandle<K> {
    /// Takes ownership of a freshly created object after checking its status.
    /// An object in an error state is destroyed again and its status returned.
    pub unsafe fn adopt<S>(raw: *mut K::Raw, status: S) -> Result<Self>
    where
        S: FnOnce(*mut K::Raw) -> vl_status_t,
    {
        let Some(ptr) = NonNull::new(raw) else {
            return Err(Error::Status(Status::NoMemory));
        };
        if let Err(err) = Status::check(status(ptr.as_ptr())) {
            debug!("Creating {} failed: {err}", K::NAME);
            unsafe { K::destroy(ptr.as_ptr()) };
            return Err(err);
        }
        Ok(Self::wrap(ptr))
    }

    /// Takes ownership of an object that has no status of its own.
    pub unsafe fn from_raw(raw: *mut K::Raw) -> Result<Self> {
        NonNull::new(raw)
            .map(Self::wrap)
            .ok_or(Error::Status(Status::NoMemory))
    }

    fn wrap(ptr: NonNull<K::Raw>) -> Self {
        debug!("Created {} {:p}", K::NAME, ptr);
        Self {
            slot: RwLock::new(Some(ptr)),
            liveness: Liveness::default(),
        }
    }

    /// Destroys the foreign reference. Releasing again is a no-op.
    pub fn release(&self) {
        if self.release_slot() {
            debug!("Released {}", K::NAME);
        }
    }

    fn release_slot(&self) -> bool {
        let mut slot = self.slot.write();
        match slot.take() {
            Some(ptr) => {
                unsafe { K::destroy(ptr.as_ptr()) };
                self.liveness.mark_released();
                true
            }
            None => false,
        }
    }

    pub fn is_released(&self) -> bool {
        self.slot.read().is_none()
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn with_read<T, F>(&self, func: F) -> Result<T>
    where
        F: FnOnce(*mut K::Raw) -> T,
    {
        let slot = self.slot.read();
        let ptr = slot.ok_or(Error::NullHandle)?;
        Ok(func(ptr.as_ptr()))
    }

    pub fn with_write<T, F>(&self, func: F) -> Result<T>
    where
        F: FnOnce(*mut K::Raw) -> T,
    {
        let slot = self.slot.write();
        let ptr = slot.ok_or(Error::NullHandle)?;
        Ok(func(ptr.as_ptr()))
    }

    /// Writes to this object while reading `operand`. Both locks are taken
    /// in the global order, so callers on other threads locking the same pair
    /// the other way around cannot deadlock.
    pub fn with_write_and_read<O, T, F>(&self, operand: &ForeignHandle<O>, func: F) -> Result<T>
    where
        O: Foreign,
        F: FnOnce(*mut K::Raw, *mut O::Raw) -> T,
    {
        self.write_pair::<O, T, _>(operand, |slot, other| {
            Self::call_pair::<O, T, F>(slot, other, func)
        })
    }

    /// Like `with_write_and_read`, but a released `operand` is passed to
    /// `func` as a null pointer. Only a released `self` fails.
    pub fn with_write_and_nullable<O, T, F>(
        &self,
        operand: &ForeignHandle<O>,
        func: F,
    ) -> Result<T>
    where
        O: Foreign,
        F: FnOnce(*mut K::Raw, *mut O::Raw) -> T,
    {
        self.write_pair::<O, T, _>(operand, |slot, other| {
            let ptr = slot.ok_or(Error::NullHandle)?;
            let other = other.map_or(ptr::null_mut(), NonNull::as_ptr);
            Ok(func(ptr.as_ptr(), other))
        })
    }

    /// Reads this object and `operand` together.
    pub fn with_read_pair<O, T, F>(&self, operand: &ForeignHandle<O>, func: F) -> Result<T>
    where
        O: Foreign,
        F: FnOnce(*mut K::Raw, *mut O::Raw) -> T,
    {
        if self.same_object(operand) {
            let slot = self.slot.read();
            return Self::call_pair::<O, T, F>(
                *slot,
                (*slot).map(NonNull::cast::<O::Raw>),
                func,
            );
        }
        if self.locks_before(operand) {
            let slot = self.slot.read();
            let other = operand.slot.read();
            Self::call_pair::<O, T, F>(*slot, *other, func)
        } else {
            trace!("Locking {} before {}", O::NAME, K::NAME);
            let other = operand.slot.read();
            let slot = self.slot.read();
            Self::call_pair::<O, T, F>(*slot, *other, func)
        }
    }

    fn write_pair<O, T, F>(&self, operand: &ForeignHandle<O>, func: F) -> Result<T>
    where
        O: Foreign,
        F: FnOnce(Option<NonNull<K::Raw>>, Option<NonNull<O::Raw>>) -> Result<T>,
    {
        if self.same_object(operand) {
            let slot = self.slot.write();
            return func(*slot, (*slot).map(NonNull::cast::<O::Raw>));
        }
        if self.locks_before(operand) {
            let slot = self.slot.write();
            let other = operand.slot.read();
            func(*slot, *other)
        } else {
            trace!("Locking {} before {}", O::NAME, K::NAME);
            let other = operand.slot.read();
            let slot = self.slot.write();
            func(*slot, *other)
        }
    }

    fn call_pair<O, T, F>(
        slot: Option<NonNull<K::Raw>>,
        other: Option<NonNull<O::Raw>>,
        func: F,
    ) -> Result<T>
    where
        O: Foreign,
        F: FnOnce(*mut K::Raw, *mut O::Raw) -> T,
    {
        match (slot, other) {
            (Some(a), Some(b)) => Ok(func(a.as_ptr(), b.as_ptr())),
            _ => Err(Error::NullHandle),
        }
    }

    fn same_object<O: Foreign>(&self, operand: &ForeignHandle<O>) -> bool {
        K::LOCK_RANK == O::LOCK_RANK && self.address() == operand.address()
    }

    fn locks_before<O: Foreign>(&self, operand: &ForeignHandle<O>) -> bool {
        match K::LOCK_RANK.cmp(&O::LOCK_RANK) {
            std::cmp::Ordering::Equal => self.address() < operand.address(),
            ordering => ordering.is_lt(),
        }
    }

    fn address(&self) -> usize {
        self as *const Self as *const () as usize
    }
}

impl<K: Foreign> Drop for ForeignHandle<K> {
    fn drop(&mut self) {
        if self.release_slot() {
            debug!("Released {} on drop", K::NAME);
        }
    }
}
