//! Dependency store
//!
//! Maps each (target, property) pair to the [`Dep`] of effects that
//! read it, and fans writes back out to those effects.

// Imports
use {
	crate::{dep::Dep, effect},
	std::{cell::RefCell, collections::HashMap},
};

/// Property key → dep, for a single target
type PropDeps = HashMap<Box<str>, Dep>;

thread_local! {
	/// Dependency store.
	///
	/// Keyed by target identity, so it never owns, nor pins, a
	/// target. Entries are created lazily on first tracked read
	/// and removed by the target's drop hook.
	static STORE: RefCell<HashMap<usize, PropDeps>> = RefCell::new(HashMap::new());
}

/// Records that the currently running effect depends on `(target, key)`.
///
/// A no-op when no effect is running: reads outside an effect are
/// legal, and simply not tracked.
pub(crate) fn track(target: usize, key: &str) {
	let Some(effect) = effect::running() else {
		return;
	};

	tracing::trace!(target_id = target, key, effect_id = effect.id(), "Tracking dependency");
	STORE.with_borrow_mut(|store| {
		store
			.entry(target)
			.or_default()
			.entry(Box::from(key))
			.or_default()
			.insert(effect);
	});
}

/// Re-runs every effect subscribed to `(target, key)`.
///
/// A no-op when the target, or the key, was never tracked.
pub(crate) fn trigger(target: usize, key: &str) {
	// Snapshot the subscribers before running any of them, and without
	// holding the store borrow: a re-run may track new dependencies on
	// this very dep, or trigger further writes.
	let effects = STORE.with_borrow(|store| {
		let dep = store.get(&target)?.get(key)?;
		Some(dep.snapshot())
	});
	let Some(effects) = effects else {
		return;
	};

	tracing::trace!(target_id = target, key, subscribers = effects.len(), "Triggering");
	for effect in effects {
		effect.run();
	}
}

/// Removes all deps of a target.
///
/// Called from the target's drop hook, so the store may already be
/// gone during thread teardown, in which case there is nothing left
/// to remove.
pub(crate) fn purge(target: usize) {
	let removed = STORE
		.try_with(|store| store.borrow_mut().remove(&target))
		.ok()
		.flatten();

	// Dropping the deps drops their effect handles, which may in turn
	// drop other targets and re-enter the store, so only drop them
	// once the borrow is released.
	drop(removed);
}

/// Returns the number of targets with deps
#[cfg(test)]
pub(crate) fn tracked_targets() -> usize {
	STORE.with_borrow(HashMap::len)
}

/// Returns the number of effects subscribed to `(target, key)`
#[cfg(test)]
pub(crate) fn subscriber_count(target: usize, key: &str) -> usize {
	STORE.with_borrow(|store| {
		store
			.get(&target)
			.and_then(|deps| deps.get(key))
			.map_or(0, Dep::len)
	})
}
