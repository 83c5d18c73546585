//! Effect
//!
//! An effect is a closure that is re-run whenever one of
//! the properties it read is written.

// Imports
use {
	core::{
		fmt,
		hash::{Hash, Hasher},
		panic::Location,
	},
	std::{cell::RefCell, rc::Rc},
};

thread_local! {
	/// Stack of currently running effects.
	///
	/// Reads are attributed to the top of the stack, so an effect
	/// run nested within another restores the outer effect once
	/// it returns.
	static EFFECT_STACK: RefCell<Vec<Effect>> = const { RefCell::new(vec![]) };
}

/// Effect inner
struct Inner {
	/// Effect runner
	run: Box<dyn Fn()>,

	/// Where this effect was defined
	defined_loc: &'static Location<'static>,
}

/// Effect
pub struct Effect {
	/// Inner
	inner: Rc<Inner>,
}

impl Effect {
	/// Creates a new effect.
	///
	/// Runs the effect once to gather its dependencies.
	#[track_caller]
	pub fn new<F>(run: F) -> Self
	where
		F: Fn() + 'static,
	{
		let inner = Inner {
			run:         Box::new(run),
			defined_loc: Location::caller(),
		};
		let effect = Self { inner: Rc::new(inner) };

		// And run it once to gather dependencies.
		effect.run();

		effect
	}

	/// Returns where this effect was defined
	pub(crate) fn defined_loc(&self) -> &'static Location<'static> {
		self.inner.defined_loc
	}

	/// Returns a unique identifier to this effect.
	///
	/// Cloning the effect will retain the same id
	#[must_use]
	pub fn id(&self) -> usize {
		Rc::as_ptr(&self.inner).addr()
	}

	/// Returns if this effect is inert.
	///
	/// An inert effect is one that will never be re-run: neither
	/// a dependency, nor any caller, holds a handle to it anymore.
	#[must_use]
	pub fn is_inert(&self) -> bool {
		Rc::strong_count(&self.inner) == 1
	}

	/// Runs the effect.
	///
	/// While the closure runs, all tracked reads are attributed to
	/// this effect. The running marker is restored on every exit
	/// path, including unwinding out of the closure.
	pub fn run(&self) {
		// Push the effect, and only pop it once we return, even if
		// the closure unwinds past us.
		EFFECT_STACK.with_borrow_mut(|effects| effects.push(self.clone()));
		scopeguard::defer! {
			EFFECT_STACK
				.with_borrow_mut(Vec::pop)
				.expect("Missing added effect");
		}

		(self.inner.run)();
	}
}

impl PartialEq for Effect {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}

impl Eq for Effect {}

impl Clone for Effect {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl Hash for Effect {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id().hash(state);
	}
}

impl fmt::Debug for Effect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Effect")
			.field("id", &self.id())
			.field("defined_loc", &format_args!("{}", self.defined_loc()))
			.finish_non_exhaustive()
	}
}

/// Returns the currently running effect, if any
#[must_use]
pub fn running() -> Option<Effect> {
	EFFECT_STACK.with_borrow(|effects| effects.last().cloned())
}
