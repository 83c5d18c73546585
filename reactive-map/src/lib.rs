//! Fine-grained reactive dependency tracking for keyed objects.
//!
//! Wrapping an [`Obj`] with [`reactive()`] yields a [`Reactive`] wrapper:
//! property reads through the wrapper record which [`Effect`] performed
//! them, and property writes re-run exactly the effects that read the
//! written property.
//!
//! ```
//! use {
//! 	reactive_map::{Obj, effect, reactive},
//! 	std::{cell::Cell, rc::Rc},
//! };
//!
//! let target = Obj::from_iter([("count", 0)]);
//! let counter = reactive(&target);
//!
//! let observed = Rc::new(Cell::new(None));
//! effect({
//! 	let counter = counter.clone();
//! 	let observed = Rc::clone(&observed);
//! 	move || observed.set(counter.get("count"))
//! });
//! assert_eq!(observed.get(), Some(0));
//!
//! counter.set("count", 5);
//! assert_eq!(observed.get(), Some(5));
//! ```

// Modules
mod dep;
pub mod effect;
pub mod obj;
pub mod reactive;
mod store;

// Exports
pub use self::{
	effect::Effect,
	obj::Obj,
	reactive::{Reactive, WeakReactive},
};

/// Wraps `target` for dependency tracking.
///
/// Returns the identical wrapper for repeated calls on the same
/// target, for as long as that wrapper is alive.
#[must_use]
pub fn reactive<T: 'static>(target: &Obj<T>) -> Reactive<T> {
	Reactive::wrap(target)
}

/// Creates an effect from `f` and runs it once to gather its
/// dependencies.
///
/// No handle is returned: the effect is kept alive by its
/// subscriptions, and dropped once nothing it read remains.
#[track_caller]
pub fn effect<F>(f: F)
where
	F: Fn() + 'static,
{
	let effect = Effect::new(f);
	if effect.is_inert() {
		tracing::trace!(?effect, "Effect tracked no dependencies and will never re-run");
	}
}
