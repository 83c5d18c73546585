//! Reactive
//!
//! The wrapper around an [`Obj`]: reads through it are tracked
//! against the running effect, and writes through it re-run the
//! subscribed effects.

// Imports
use {
	crate::{Obj, store},
	core::{any::Any, fmt},
	std::{
		cell::RefCell,
		collections::HashMap,
		rc::{Rc, Weak},
	},
};

thread_local! {
	/// Wrapper cache.
	///
	/// One wrapper per target: wrapping the same target again yields
	/// the identical wrapper for as long as it is alive. Holds weak
	/// handles, so it pins neither wrappers nor targets; entries are
	/// evicted by the target's drop hook.
	static WRAPPERS: RefCell<HashMap<usize, Weak<dyn Any>>> = RefCell::new(HashMap::new());
}

/// Reactive inner
struct Inner<T> {
	/// Wrapped target
	target: Obj<T>,
}

/// Reactive
///
/// Behaves like its target for all property access, except that
/// reads are tracked against the running effect and writes re-run
/// the subscribed effects. Created through
/// [`reactive`](crate::reactive()).
pub struct Reactive<T> {
	/// Inner
	inner: Rc<Inner<T>>,
}

impl<T: 'static> Reactive<T> {
	/// Wraps `target`, returning its cached wrapper if it already has one.
	pub(crate) fn wrap(target: &Obj<T>) -> Self {
		WRAPPERS.with_borrow_mut(|wrappers| {
			// If the target already has a live wrapper, reuse it
			if let Some(inner) = wrappers
				.get(&target.id())
				.and_then(Weak::upgrade)
				.and_then(|inner| inner.downcast::<Inner<T>>().ok())
			{
				return Self { inner };
			}

			// Otherwise create one, and cache it before returning it
			let inner = Rc::new(Inner { target: target.clone() });
			let weak: Weak<Inner<T>> = Rc::downgrade(&inner);
			wrappers.insert(target.id(), weak as Weak<dyn Any>);
			Self { inner }
		})
	}
}

impl<T> Reactive<T> {
	/// Returns a unique identifier to this wrapper.
	///
	/// Cloning the wrapper will retain the same id
	#[must_use]
	pub fn id(&self) -> usize {
		Rc::as_ptr(&self.inner).addr()
	}

	/// Downgrades this wrapper
	#[must_use]
	pub fn downgrade(&self) -> WeakReactive<T> {
		WeakReactive {
			inner: Rc::downgrade(&self.inner),
		}
	}

	/// Returns the wrapped target.
	///
	/// Reads and writes through the raw target are invisible to
	/// tracking.
	#[must_use]
	pub fn target(&self) -> &Obj<T> {
		&self.inner.target
	}

	/// Uses a property value.
	///
	/// Tracks `(target, key)` against the running effect, whether or
	/// not the property exists.
	pub fn with<F, O>(&self, key: &str, f: F) -> O
	where
		F: FnOnce(Option<&T>) -> O,
	{
		store::track(self.inner.target.id(), key);
		self.inner.target.with(key, f)
	}

	/// Returns a copy of a property value, tracking it
	#[must_use]
	pub fn get(&self, key: &str) -> Option<T>
	where
		T: Clone,
	{
		self.with(key, |value| value.cloned())
	}

	/// Writes a property value, then re-runs all effects subscribed
	/// to it.
	///
	/// Deliberately triggers even when the new value compares equal
	/// to the previous one.
	pub fn set<K>(&self, key: K, value: T)
	where
		K: Into<Box<str>>,
	{
		let key = key.into();
		self.inner.target.insert(key.clone(), value);
		store::trigger(self.inner.target.id(), &key);
	}

	/// Updates a property value in place, then re-runs all effects
	/// subscribed to it.
	///
	/// Returns `None`, without triggering, if the property does not
	/// exist.
	pub fn update<F, O>(&self, key: &str, f: F) -> Option<O>
	where
		F: FnOnce(&mut T) -> O,
	{
		let output = self.inner.target.update(key, f)?;
		store::trigger(self.inner.target.id(), key);
		Some(output)
	}

	/// Removes a property, then re-runs all effects subscribed to it.
	///
	/// Does not trigger if the property did not exist.
	pub fn remove(&self, key: &str) -> Option<T> {
		let value = self.inner.target.remove(key)?;
		store::trigger(self.inner.target.id(), key);
		Some(value)
	}
}

impl<T> PartialEq for Reactive<T> {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}

impl<T> Eq for Reactive<T> {}

impl<T> Clone for Reactive<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Reactive<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Reactive").field("target", &self.inner.target).finish()
	}
}

/// Weak reactive
///
/// Used to refer to a wrapper without keeping it, or its target,
/// alive.
pub struct WeakReactive<T> {
	/// Inner
	inner: Weak<Inner<T>>,
}

impl<T> WeakReactive<T> {
	/// Returns a unique identifier to this wrapper.
	///
	/// Upgrading and cloning the wrapper will retain the same id
	#[must_use]
	pub fn id(&self) -> usize {
		Weak::as_ptr(&self.inner).addr()
	}

	/// Upgrades this weak wrapper
	#[must_use]
	pub fn upgrade(&self) -> Option<Reactive<T>> {
		let inner = self.inner.upgrade()?;
		Some(Reactive { inner })
	}
}

impl<T> PartialEq for WeakReactive<T> {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}

impl<T> Eq for WeakReactive<T> {}

impl<T> Clone for WeakReactive<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Weak::clone(&self.inner),
		}
	}
}

impl<T> fmt::Debug for WeakReactive<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeakReactive").field("id", &self.id()).finish()
	}
}

/// Evicts a target's cache entry, if any.
///
/// Called from the target's drop hook, so the cache may already be
/// gone during thread teardown.
pub(crate) fn evict(target: usize) {
	let _ = WRAPPERS.try_with(|wrappers| {
		wrappers.borrow_mut().remove(&target);
	});
}

/// Returns whether a target has a cache entry
#[cfg(test)]
pub(crate) fn cached(target: usize) -> bool {
	WRAPPERS.with_borrow(|wrappers| wrappers.contains_key(&target))
}
