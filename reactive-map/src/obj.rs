//! Obj
//!
//! The raw target: a string-keyed record of property values,
//! shared by handle.

// Imports
use {
	crate::{reactive, store},
	core::fmt,
	std::{
		cell::{Ref, RefCell, RefMut},
		collections::HashMap,
		rc::Rc,
	},
};

/// Obj inner
struct Inner<T> {
	/// Property values
	values: RefCell<HashMap<Box<str>, T>>,
}

impl<T> Drop for Inner<T> {
	fn drop(&mut self) {
		// Last handle is gone: drop our deps and our cached wrapper
		let id = core::ptr::from_ref(self).addr();
		store::purge(id);
		reactive::evict(id);
	}
}

/// Obj
///
/// A cheaply clonable handle to the underlying record. Identity,
/// not content, keys all caching and dependency tracking: clones
/// share the same [`id`](Self::id).
///
/// All operations on `Obj` itself are raw: they neither track a
/// dependency nor trigger any effect. Tracked access goes through
/// [`reactive`](crate::reactive()).
pub struct Obj<T> {
	/// Inner
	inner: Rc<Inner<T>>,
}

impl<T> Obj<T> {
	/// Creates a new, empty object
	#[must_use]
	pub fn new() -> Self {
		let inner = Inner {
			values: RefCell::new(HashMap::new()),
		};
		Self { inner: Rc::new(inner) }
	}

	/// Returns a unique identifier to this object.
	///
	/// Cloning the handle will retain the same id
	#[must_use]
	pub fn id(&self) -> usize {
		Rc::as_ptr(&self.inner).addr()
	}

	/// Inserts a property value, returning the previous value, if any.
	pub fn insert<K>(&self, key: K, value: T) -> Option<T>
	where
		K: Into<Box<str>>,
	{
		self.values_mut().insert(key.into(), value)
	}

	/// Removes a property, returning its value, if any.
	pub fn remove(&self, key: &str) -> Option<T> {
		self.values_mut().remove(key)
	}

	/// Uses a property value
	pub fn with<F, O>(&self, key: &str, f: F) -> O
	where
		F: FnOnce(Option<&T>) -> O,
	{
		let values = self.values();
		f(values.get(key))
	}

	/// Updates a property value in place.
	///
	/// Returns `None` if the property does not exist.
	pub fn update<F, O>(&self, key: &str, f: F) -> Option<O>
	where
		F: FnOnce(&mut T) -> O,
	{
		let mut values = self.values_mut();
		let value = values.get_mut(key)?;
		Some(f(value))
	}

	/// Returns a copy of a property value
	#[must_use]
	pub fn get(&self, key: &str) -> Option<T>
	where
		T: Clone,
	{
		self.with(key, |value| value.cloned())
	}

	/// Returns whether the object has a property `key`
	#[must_use]
	pub fn contains_key(&self, key: &str) -> bool {
		self.with(key, |value| value.is_some())
	}

	/// Returns the number of properties
	#[must_use]
	pub fn len(&self) -> usize {
		self.values().len()
	}

	/// Returns whether the object has no properties
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.values().is_empty()
	}

	/// Borrows the property map
	fn values(&self) -> Ref<'_, HashMap<Box<str>, T>> {
		self.inner
			.values
			.try_borrow()
			.expect("Cannot read a property while it's being updated")
	}

	/// Borrows the property map mutably
	fn values_mut(&self) -> RefMut<'_, HashMap<Box<str>, T>> {
		self.inner
			.values
			.try_borrow_mut()
			.expect("Cannot write a property while it's being read")
	}
}

impl<T> Default for Obj<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> PartialEq for Obj<T> {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}

impl<T> Eq for Obj<T> {}

impl<T> Clone for Obj<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Obj<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Obj")
			.field("id", &self.id())
			.field("values", &*self.values())
			.finish()
	}
}

impl<K, T> FromIterator<(K, T)> for Obj<T>
where
	K: Into<Box<str>>,
{
	fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
		let obj = Self::new();
		for (key, value) in iter {
			obj.insert(key, value);
		}
		obj
	}
}

#[cfg(test)]
mod test {
	// Imports
	use {
		super::*,
		crate::{Effect, Reactive},
	};

	#[test]
	fn raw_ops() {
		let obj = Obj::from_iter([("a", 1), ("b", 2)]);
		assert_eq!(obj.len(), 2);
		assert!(obj.contains_key("a"));
		assert_eq!(obj.get("b"), Some(2));

		assert_eq!(obj.insert("a", 3), Some(1));
		assert_eq!(obj.update("a", |value| *value * 2), Some(6));
		assert_eq!(obj.get("a"), Some(6));
		assert_eq!(obj.update("missing", |value| *value), None);

		assert_eq!(obj.remove("b"), Some(2));
		assert!(!obj.contains_key("b"));
	}

	#[test]
	fn clones_share_identity() {
		let obj = Obj::from_iter([("a", 1)]);
		let clone = obj.clone();

		assert_eq!(obj, clone);
		assert_eq!(obj.id(), clone.id());

		clone.insert("b", 2);
		assert_eq!(obj.get("b"), Some(2));

		assert_ne!(obj, Obj::<i32>::new());
	}

	/// Ensures dropping the last handle to a target purges its deps.
	#[test]
	fn drop_purges_deps() {
		let target = Obj::from_iter([("a", 0)]);
		let wrapper = Reactive::wrap(&target);

		// The effect holds the wrapper weakly, so it doesn't keep the
		// target alive through it.
		let weak = wrapper.downgrade();
		let _effect = Effect::new(move || {
			let wrapper = weak.upgrade().expect("Wrapper was dropped");
			let _ = wrapper.get("a");
		});
		assert_eq!(store::tracked_targets(), 1);

		drop(wrapper);
		drop(target);
		assert_eq!(store::tracked_targets(), 0, "Dropped target still has deps");
	}
}
