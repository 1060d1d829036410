// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Capped free-lists of heap-backed temporaries.
//!
//! [`ObjectPool`] is a plain LIFO stack of `Box<T>` that never grows past its
//! size limit; surplus releases are dropped. Every [`Poolable`] type also owns
//! one pool per thread, created lazily on first use and reached through
//! [`fetch_temp`]/[`release_temp`] or, preferably, the scoped [`Pooled`] guard
//! which returns its instance when dropped.
//!
//! Ownership enforces the release contract: `release` consumes the box, so a
//! value cannot be released twice or used after release, and there is no null
//! to hand back.
//!
//! ```compile_fail
//! use warp_math::{fetch_temp, release_temp, Vector3};
//! let v = fetch_temp::<Vector3>();
//! release_temp(v);
//! release_temp(v); // `v` was moved by the first release
//! ```
//!
//! Reuse policy is per type (see [`Poolable::recycle`]): matrices, quaternions
//! and transforms come back as identity; vectors and geometric primitives keep
//! whatever contents they were released with. Callers must fully initialize a
//! fetched value before reading it unless its type documents a reset.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use tracing::{debug, trace};

use crate::config;

/// A value type that can live in a thread-local [`ObjectPool`].
///
/// Implement it with [`impl_poolable!`](crate::impl_poolable), which also
/// declares the type's thread-local pool.
pub trait Poolable: Sized + 'static {
    /// Builds a brand-new instance when the free-list is empty.
    fn new_instance() -> Self;

    /// Prepares a reused instance before it is handed out again.
    ///
    /// The default keeps the released contents untouched.
    fn recycle(&mut self) {}

    /// Runs `f` against the calling thread's pool for this type.
    ///
    /// Returns `None` when the pool is unreachable (thread-local storage is
    /// being destroyed, or the pool is already borrowed further up the stack).
    fn with_local_pool<R>(f: impl FnOnce(&mut ObjectPool<Self>) -> R) -> Option<R>;
}

/// Declares the thread-local pool for a type and implements [`Poolable`].
///
/// ```
/// use warp_math::impl_poolable;
///
/// #[derive(Default)]
/// struct Scratch([f64; 8]);
///
/// impl_poolable!(Scratch, new = Scratch::default());
///
/// let tmp = warp_math::Pooled::<Scratch>::fetch();
/// assert_eq!(tmp.0.len(), 8);
/// ```
///
/// `recycle_to = expr` overwrites reused instances with `expr` on fetch.
#[macro_export]
macro_rules! impl_poolable {
    ($ty:ty, new = $new:expr) => {
        $crate::impl_poolable!(@impl $ty, $new, {});
    };
    ($ty:ty, new = $new:expr, recycle_to = $reset:expr) => {
        $crate::impl_poolable!(@impl $ty, $new, {
            fn recycle(&mut self) {
                *self = $reset;
            }
        });
    };
    (@impl $ty:ty, $new:expr, { $($recycle:tt)* }) => {
        impl $crate::pool::Poolable for $ty {
            fn new_instance() -> Self {
                $new
            }

            $($recycle)*

            fn with_local_pool<R>(
                f: impl FnOnce(&mut $crate::pool::ObjectPool<Self>) -> R,
            ) -> ::core::option::Option<R> {
                ::std::thread_local! {
                    static POOL: ::core::cell::RefCell<$crate::pool::ObjectPool<$ty>> =
                        ::core::cell::RefCell::new($crate::pool::ObjectPool::for_current_thread());
                }
                POOL.try_with(|pool| pool.try_borrow_mut().ok().map(|mut pool| f(&mut pool)))
                    .ok()
                    .flatten()
            }
        }
    };
}

/// Bounded LIFO free-list of boxed instances.
pub struct ObjectPool<T> {
    free: Vec<Box<T>>,
    max_size: usize,
}

impl<T> ObjectPool<T> {
    /// Creates an empty pool retaining at most `max_size` released items.
    pub fn new(max_size: usize) -> Self {
        Self {
            free: Vec::with_capacity(max_size),
            max_size,
        }
    }

    /// Number of released instances currently retained.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Returns `true` when no released instance is retained.
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Maximum number of retained instances.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Changes the size limit, dropping the most recently released surplus.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        if self.free.len() > max_size {
            trace!(
                ty = type_name::<T>(),
                dropped = self.free.len() - max_size,
                "trimming pool to new size limit"
            );
            self.free.truncate(max_size);
        }
    }

    /// Drops every retained instance.
    pub fn clear(&mut self) {
        self.free.clear();
    }

    /// Returns `item` to the free-list, or drops it when the pool is full.
    pub fn release(&mut self, item: Box<T>) {
        if self.free.len() < self.max_size {
            self.free.push(item);
        } else {
            trace!(ty = type_name::<T>(), "pool full; dropping released instance");
        }
    }
}

impl<T: Poolable> ObjectPool<T> {
    /// Creates a pool sized from the calling thread's [`config::current`].
    pub fn for_current_thread() -> Self {
        let max_size = config::current().max_math_pool_size;
        debug!(ty = type_name::<T>(), max_size, "creating thread-local pool");
        Self::new(max_size)
    }

    /// Pops the most recently released instance, or builds a new one.
    pub fn fetch(&mut self) -> Box<T> {
        match self.free.pop() {
            Some(mut item) => {
                item.recycle();
                item
            }
            None => Box::new(T::new_instance()),
        }
    }
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("ty", &type_name::<T>())
            .field("len", &self.free.len())
            .field("max_size", &self.max_size)
            .finish()
    }
}

/// Fetches a temporary from the calling thread's pool for `T`.
///
/// With pooling disabled in [`config::current`] a fresh instance is
/// allocated instead.
pub fn fetch_temp<T: Poolable>() -> Box<T> {
    if !config::current().use_math_pools {
        return Box::new(T::new_instance());
    }
    T::with_local_pool(ObjectPool::fetch).unwrap_or_else(|| Box::new(T::new_instance()))
}

/// Hands a temporary back to the calling thread's pool for `T`.
///
/// The instance is dropped when pooling is disabled, the pool is full, or the
/// pool is unreachable.
pub fn release_temp<T: Poolable>(item: Box<T>) {
    let cfg = config::current();
    if !cfg.use_math_pools {
        return;
    }
    // A `None` here means the item was dropped with the closure.
    let _ = T::with_local_pool(move |pool| {
        pool.set_max_size(cfg.max_math_pool_size);
        pool.release(item);
    });
}

/// Number of instances retained by the calling thread's pool for `T`.
pub fn local_pool_len<T: Poolable>() -> usize {
    T::with_local_pool(|pool| pool.len()).unwrap_or(0)
}

/// Scoped temporary borrowed from the calling thread's pool.
///
/// Dereferences to `T` and returns the instance to the same thread's pool on
/// drop, on every exit path. The guard is deliberately `!Send`.
pub struct Pooled<T: Poolable> {
    item: Option<Box<T>>,
    _thread_bound: PhantomData<*const ()>,
}

impl<T: Poolable> Pooled<T> {
    /// Borrows an instance from the pool; see [`fetch_temp`].
    pub fn fetch() -> Self {
        Self {
            item: Some(fetch_temp()),
            _thread_bound: PhantomData,
        }
    }

    /// Borrows an instance and overwrites it with `value`.
    pub fn with_value(value: T) -> Self {
        let mut guard = Self::fetch();
        *guard = value;
        guard
    }

    /// Detaches the box from the guard; it will not be released.
    pub fn into_inner(mut self) -> Box<T> {
        match self.item.take() {
            Some(item) => item,
            None => unreachable!("pooled value is only taken on drop"),
        }
    }
}

impl<T: Poolable> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.item {
            Some(item) => item,
            None => unreachable!("pooled value is only taken on drop"),
        }
    }
}

impl<T: Poolable> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.item {
            Some(item) => item,
            None => unreachable!("pooled value is only taken on drop"),
        }
    }
}

impl<T: Poolable> Drop for Pooled<T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            release_temp(item);
        }
    }
}

impl<T: Poolable + fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pooled").field(&**self).finish()
    }
}
