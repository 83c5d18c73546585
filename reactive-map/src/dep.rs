//! Dep
//!
//! The set of effects subscribed to a single
//! (target, property) pair.

// Imports
use {crate::Effect, std::collections::HashMap};

/// Dep
///
/// Holds strong handles: a subscribed effect stays alive for as
/// long as any dep references it, so callers don't need to keep
/// the handle returned by [`Effect::new`] around.
#[derive(Default, Debug)]
pub(crate) struct Dep {
	/// Subscribed effects, by effect id
	effects: HashMap<usize, Effect>,
}

impl Dep {
	/// Inserts an effect into this dep.
	///
	/// Inserting an already-subscribed effect is a no-op.
	pub(crate) fn insert(&mut self, effect: Effect) {
		let id = effect.id();
		self.effects.entry(id).or_insert(effect);
	}

	/// Returns an owned snapshot of the current membership.
	///
	/// Triggering iterates a snapshot, never the live set: a re-run
	/// may subscribe further effects onto this very dep.
	pub(crate) fn snapshot(&self) -> Vec<Effect> {
		self.effects.values().cloned().collect()
	}

	/// Returns the number of subscribed effects
	pub(crate) fn len(&self) -> usize {
		self.effects.len()
	}
}
