use std::{
	fmt::{self, Debug, Formatter},
	mem,
	sync::{Arc, Weak},
};

use crate::{delegate_id::CallableId, DelegateId};

/// Object-safe core of a [`Delegate`].
trait Callable<Args>: Send + Sync {
	/// Returns `false` iff nothing was called.
	fn call(&self, args: Args) -> bool;

	fn is_alive(&self) -> bool {
		true
	}
}

struct FunctionSlot<F>(F);

impl<Args, F: Send + Sync + Fn(Args)> Callable<Args> for FunctionSlot<F> {
	fn call(&self, args: Args) -> bool {
		(self.0)(args);
		true
	}
}

struct MethodSlot<R: ?Sized, M> {
	receiver: Weak<R>,
	method: M,
}

impl<R, Args, M> Callable<Args> for MethodSlot<R, M>
where
	R: ?Sized + Send + Sync,
	M: Send + Sync + Fn(&R, Args),
{
	fn call(&self, args: Args) -> bool {
		match self.receiver.upgrade() {
			Some(receiver) => {
				(self.method)(&*receiver, args);
				true
			}
			None => false,
		}
	}

	fn is_alive(&self) -> bool {
		self.receiver.strong_count() > 0
	}
}

/// Identity of a function item, method item or non-capturing closure.
///
/// Anything with state (including function pointers) would share its type with
/// unrelated callables, so it's rejected at compile time.
fn item_id<F: 'static>() -> CallableId {
	const {
		assert!(
			mem::size_of::<F>() == 0,
			"slots must be function items or non-capturing closures"
		);
	}
	CallableId::of::<F>()
}

/// A cloneable, type-erased slot that knows its own [`DelegateId`].
///
/// Delegates compare by id only, so two delegates created separately for the same
/// receiver and method are equal.
///
/// Receivers are held weakly. Once a receiver is dropped, its delegates stay valid
/// (they keep their id) but are no longer [alive](`Delegate::is_alive`) and
/// [`Delegate::invoke`] does nothing.
///
/// ```
/// use std::sync::{atomic::{AtomicUsize, Ordering}, Arc};
/// use sts_signals::Delegate;
///
/// #[derive(Default)]
/// struct Receiver(AtomicUsize);
///
/// impl Receiver {
///     fn slot(&self, value: usize) {
///         self.0.store(value, Ordering::Relaxed);
///     }
/// }
///
/// let receiver = Arc::new(Receiver::default());
/// let delegate = Delegate::from_method(&receiver, Receiver::slot);
/// assert!(delegate.invoke(5));
/// assert_eq!(receiver.0.load(Ordering::Relaxed), 5);
///
/// drop(receiver);
/// assert!(!delegate.invoke(6));
/// ```
///
/// # Identity
///
/// Functions and methods are told apart by their item type, not their address, so
/// two functions with identical bodies remain distinct slots in optimised builds.
/// Function pointers (`fn(Args)` values) carry no such type and are not accepted by
/// [`from_fn`](`Delegate::from_fn`) and [`from_method`](`Delegate::from_method`):
///
/// ```compile_fail
/// use sts_signals::Delegate;
///
/// fn slot(_: ()) {}
/// let pointer: fn(()) = slot;
/// let _ = Delegate::from_fn(pointer);
/// ```
pub struct Delegate<Args> {
	id: DelegateId,
	target: Option<Arc<dyn Callable<Args>>>,
}

impl<Args: 'static> Delegate<Args> {
	/// Binds a free function. The receiver component of the id is `0`.
	#[must_use]
	pub fn from_fn<F>(function: F) -> Self
	where
		F: 'static + Send + Sync + Fn(Args),
	{
		Self {
			id: DelegateId::new(0, item_id::<F>()),
			target: Some(Arc::new(FunctionSlot(function))),
		}
	}

	/// Binds `method` to `receiver` without keeping `receiver` alive.
	///
	/// `R` may be a trait object, in which case `method` dispatches dynamically.
	#[must_use]
	pub fn from_method<R, M>(receiver: &Arc<R>, method: M) -> Self
	where
		R: ?Sized + 'static + Send + Sync,
		M: 'static + Send + Sync + Fn(&R, Args),
	{
		Self {
			id: DelegateId::new(
				DelegateId::address_of(Arc::as_ptr(receiver)),
				item_id::<M>(),
			),
			target: Some(Arc::new(MethodSlot {
				receiver: Arc::downgrade(receiver),
				method,
			})),
		}
	}

	/// Binds a closure.
	///
	/// Closures may capture state, so the id is derived from the allocation this
	/// delegate shares with its clones. Every call creates a distinct slot.
	#[must_use]
	pub fn from_closure(closure: impl 'static + Send + Sync + Fn(Args)) -> Self {
		let target = Arc::new(FunctionSlot(closure));
		Self {
			id: DelegateId::new(
				0,
				CallableId::Allocation(DelegateId::address_of(Arc::as_ptr(&target))),
			),
			target: Some(target),
		}
	}
}

impl<Args> Delegate<Args> {
	/// The slot identity this delegate compares by.
	#[must_use]
	pub fn id(&self) -> DelegateId {
		self.id
	}

	/// Whether this delegate is bound to anything. Only the default delegate isn't.
	#[must_use]
	pub fn is_valid(&self) -> bool {
		self.id.is_valid()
	}

	/// Whether invoking this delegate would reach its target.
	#[must_use]
	pub fn is_alive(&self) -> bool {
		self.target.as_ref().is_some_and(|target| target.is_alive())
	}

	/// Calls the bound target.
	///
	/// Returns `false` iff nothing was called, because the delegate is invalid or its
	/// receiver was dropped.
	pub fn invoke(&self, args: Args) -> bool {
		self.target.as_ref().is_some_and(|target| target.call(args))
	}
}

impl<Args> Default for Delegate<Args> {
	fn default() -> Self {
		Self {
			id: DelegateId::default(),
			target: None,
		}
	}
}

impl<Args> Clone for Delegate<Args> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			target: self.target.clone(),
		}
	}
}

impl<Args> PartialEq for Delegate<Args> {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl<Args> Eq for Delegate<Args> {}

impl<Args> Debug for Delegate<Args> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Delegate")
			.field("id", &self.id)
			.field("alive", &self.is_alive())
			.finish()
	}
}
