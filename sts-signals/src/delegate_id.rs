//! Slot identity.

use std::any::TypeId;

/// What a slot runs, independent of the receiver it is bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CallableId {
	/// No callable, as in the default id.
	#[default]
	None,
	/// A function or method item, or a non-capturing closure, identified by its type.
	///
	/// Every such item has a type of its own, so this holds even where the compiler
	/// merges functions with identical bodies into one address.
	Item(TypeId),
	/// A closure, identified by the allocation it shares with its delegate's clones.
	Allocation(usize),
}

impl CallableId {
	/// Identifies the item with type `F`.
	#[must_use]
	pub fn of<F: 'static>() -> Self {
		Self::Item(TypeId::of::<F>())
	}
}

/// Identifies a slot by the receiver it is bound to and the code it runs.
///
/// Two delegates with equal ids are the same slot, no matter how they were created.
/// A valid id has at least one non-empty component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DelegateId {
	/// Address of the receiver, or `0` for free functions and closures.
	pub receiver: usize,
	/// The code the slot runs.
	pub callable: CallableId,
}

impl DelegateId {
	/// Creates an id from its components.
	#[must_use]
	pub const fn new(receiver: usize, callable: CallableId) -> Self {
		Self { receiver, callable }
	}

	/// Uses a pointer's address as an impersonal id component.
	///
	/// Pointer metadata (slice lengths, vtables) is discarded, so a trait object and
	/// the concrete value behind it map to the same address.
	#[must_use]
	pub fn address_of<T: ?Sized>(ptr: *const T) -> usize {
		ptr.cast::<()>().addr()
	}

	/// Whether this id refers to a slot, i.e. isn't the default id.
	#[must_use]
	pub const fn is_valid(&self) -> bool {
		self.receiver != 0 || !matches!(self.callable, CallableId::None)
	}
}
