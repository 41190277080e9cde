use std::{
	cell::RefCell,
	fmt::{self, Debug, Formatter},
	mem,
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc, Weak,
	},
};

use parking_lot::ReentrantMutex;
use scopeguard::guard;
use tracing::{debug, trace};

use crate::{
	auto_disconnect::ConnectionList,
	error::{Operation, Result, SignalError},
	AutoDisconnect, AutoDisconnecting, Connection, Delegate, DelegateId,
};

struct SlotEntry<Args> {
	delegate: Delegate<Args>,
	connection: Connection,
	tracker: Option<Weak<ConnectionList>>,
	/// Set while an emission is running instead of erasing the entry.
	removed: AtomicBool,
}

impl<Args> SlotEntry<Args> {
	fn is_live(&self) -> bool {
		!self.removed.load(Ordering::Relaxed) && self.delegate.is_alive()
	}

	/// Unregisters the connection from its tracker, if any.
	fn release(&self) {
		if let Some(tracker) = self.tracker.as_ref().and_then(Weak::upgrade) {
			self.connection.detach(&tracker);
		}
	}
}

struct SignalState<Args> {
	slots: Vec<Arc<SlotEntry<Args>>>,
	/// Nesting depth of running emissions.
	emitting: usize,
	/// Serial number of the most recently connected slot.
	last_slot: u64,
}

impl<Args> SignalState<Args> {
	fn live(&self) -> impl '_ + Iterator<Item = &Arc<SlotEntry<Args>>> {
		self.slots.iter().filter(|entry| entry.is_live())
	}

	fn ensure_idle(&self, operation: Operation) -> Result<()> {
		if self.emitting > 0 {
			Err(SignalError::Emitting { operation })
		} else {
			Ok(())
		}
	}

	/// Moves matching entries out and releases them.
	///
	/// The returned entries must be dropped only after the state borrow ends,
	/// as that can run arbitrary destructors of captured closure state.
	#[must_use]
	fn take_where(
		&mut self,
		mut predicate: impl FnMut(&SlotEntry<Args>) -> bool,
	) -> Vec<Arc<SlotEntry<Args>>> {
		let (taken, kept): (Vec<_>, Vec<_>) = mem::take(&mut self.slots)
			.into_iter()
			.partition(|entry| predicate(&**entry));
		self.slots = kept;
		for entry in &taken {
			entry.release();
		}
		taken
	}

	#[must_use]
	fn prune(&mut self) -> Vec<Arc<SlotEntry<Args>>> {
		let pruned = self.take_where(|entry| !entry.is_live());
		if !pruned.is_empty() {
			debug!(count = pruned.len(), "pruned dead or removed slots");
		}
		pruned
	}
}

struct SignalCore<Args> {
	state: ReentrantMutex<RefCell<SignalState<Args>>>,
}

impl<Args> SignalCore<Args> {
	/// Target of every [`Connection`] this signal hands out.
	fn disconnect_by_connection(&self, connection: Connection) {
		if !connection.is_valid() {
			return;
		}
		let id = connection.delegate_id();

		let state = self.state.lock();
		let taken = {
			let mut state = state.borrow_mut();
			if state.emitting > 0 {
				if let Some(entry) = state.live().find(|entry| entry.connection == connection) {
					entry.removed.store(true, Ordering::Relaxed);
					entry.release();
					debug!(?id, "deferred slot removal until the emission completes");
				}
				None
			} else {
				let index = state
					.slots
					.iter()
					.position(|entry| entry.connection == connection);
				index.map(|index| {
					let entry = state.slots.remove(index);
					entry.release();
					entry
				})
			}
		};
		if taken.is_some() {
			trace!(?id, "disconnected slot");
		}
		drop(taken);
	}

	fn finish_emission(&self, state: &RefCell<SignalState<Args>>) {
		let pruned = {
			let mut state = state.borrow_mut();
			state.emitting -= 1;
			if state.emitting == 0 {
				state.prune()
			} else {
				Vec::new()
			}
		};
		drop(pruned);
	}
}

/// An ordered list of slots, all called with a clone of the same `Args` on [`emit`](`Signal::emit`).
///
/// Use a tuple as `Args` for several arguments and `()` for none.
///
/// Slots are free functions, methods bound to an [`Arc`]ed receiver or closures.
/// A slot is connected at most once, and slots are called in the order they were connected.
///
/// ```
/// use std::sync::{atomic::{AtomicI32, Ordering}, Arc};
/// use sts_signals::Signal;
///
/// #[derive(Default)]
/// struct Receiver(AtomicI32);
///
/// impl Receiver {
///     fn slot(&self, (enabled, value): (bool, i32)) {
///         if enabled {
///             self.0.store(value, Ordering::Relaxed);
///         }
///     }
/// }
///
/// let signal = Signal::<(bool, i32)>::new();
/// let receiver = Arc::new(Receiver::default());
///
/// signal.connect(&receiver, Receiver::slot).unwrap();
/// signal.connect(&receiver, Receiver::slot).unwrap(); // already connected
/// assert_eq!(signal.slot_count(), 1);
///
/// signal.emit((true, 5));
/// assert_eq!(receiver.0.load(Ordering::Relaxed), 5);
///
/// assert_eq!(signal.disconnect_receiver(&receiver), Ok(1));
/// assert!(signal.is_empty());
/// ```
///
/// # Threading
///
/// Every signal is [`Send`] and [`Sync`]. An emission holds the signal's lock, so calls
/// from other threads wait until it completes. Calls from inside a slot on the emitting
/// thread don't wait. Of those, connecting and the `disconnect…` methods fail with
/// [`SignalError::Emitting`], while [`Connection::disconnect`] is deferred.
pub struct Signal<Args> {
	core: Arc<SignalCore<Args>>,
}

impl<Args: 'static> Default for Signal<Args> {
	fn default() -> Self {
		Self::new()
	}
}

impl<Args: 'static> Signal<Args> {
	/// Creates a signal without slots.
	#[must_use]
	pub fn new() -> Self {
		Self {
			core: Arc::new(SignalCore {
				state: ReentrantMutex::new(RefCell::new(SignalState {
					slots: Vec::new(),
					emitting: 0,
					last_slot: 0,
				})),
			}),
		}
	}

	/// Connects a free function.
	///
	/// `function` must be a function item or a non-capturing closure. Its type is its
	/// identity, see [`Delegate#identity`].
	///
	/// # Errors
	///
	/// Iff called from inside one of this signal's slots.
	pub fn connect_fn<F>(&self, function: F) -> Result<Connection>
	where
		F: 'static + Send + Sync + Fn(Args),
	{
		self.connect_delegate(Delegate::from_fn(function), None)
	}

	/// Connects `method` bound to `receiver`.
	///
	/// The signal doesn't keep `receiver` alive. Once it's dropped, the slot stops being
	/// called and counted, and is erased later on.
	///
	/// # Errors
	///
	/// Iff called from inside one of this signal's slots.
	pub fn connect<R, M>(&self, receiver: &Arc<R>, method: M) -> Result<Connection>
	where
		R: ?Sized + 'static + Send + Sync,
		M: 'static + Send + Sync + Fn(&R, Args),
	{
		self.connect_delegate(Delegate::from_method(receiver, method), None)
	}

	/// Like [`connect`](`Signal::connect`), but also registers the connection with the
	/// receiver's [`AutoDisconnect`], which removes the slot as soon as it's dropped.
	///
	/// # Errors
	///
	/// Iff called from inside one of this signal's slots.
	pub fn connect_auto<R, M>(&self, receiver: &Arc<R>, method: M) -> Result<Connection>
	where
		R: ?Sized + 'static + Send + Sync + AutoDisconnecting,
		M: 'static + Send + Sync + Fn(&R, Args),
	{
		self.connect_auto_with(receiver, receiver.auto_disconnect(), method)
	}

	/// Like [`connect_auto`](`Signal::connect_auto`) with an explicitly chosen tracker.
	///
	/// Use this when a receiver holds several [`AutoDisconnect`]s.
	///
	/// # Errors
	///
	/// Iff called from inside one of this signal's slots.
	pub fn connect_auto_with<R, M>(
		&self,
		receiver: &Arc<R>,
		tracker: &AutoDisconnect,
		method: M,
	) -> Result<Connection>
	where
		R: ?Sized + 'static + Send + Sync,
		M: 'static + Send + Sync + Fn(&R, Args),
	{
		self.connect_delegate(
			Delegate::from_method(receiver, method),
			Some(tracker.connections()),
		)
	}

	/// Connects a closure.
	///
	/// Each call connects a new slot. Keep the returned [`Connection`] to disconnect it.
	///
	/// # Errors
	///
	/// Iff called from inside one of this signal's slots.
	pub fn connect_closure(
		&self,
		closure: impl 'static + Send + Sync + Fn(Args),
	) -> Result<Connection> {
		self.connect_delegate(Delegate::from_closure(closure), None)
	}

	fn connect_delegate(
		&self,
		delegate: Delegate<Args>,
		tracker: Option<&Arc<ConnectionList>>,
	) -> Result<Connection> {
		let state = self.core.state.lock();
		let (connection, pruned) = {
			let mut state = state.borrow_mut();
			state.ensure_idle(Operation::Connect)?;
			let pruned = state.prune();

			let existing = state
				.live()
				.find(|entry| entry.delegate == delegate)
				.map(|entry| entry.connection.clone());
			if let Some(connection) = existing {
				trace!(id = ?delegate.id(), "slot is already connected");
				(connection, pruned)
			} else {
				state.last_slot += 1;
				let connection = Connection::new(
					delegate.id(),
					Delegate::from_method(&self.core, SignalCore::<Args>::disconnect_by_connection),
				)
				.with_slot(state.last_slot);
				if let Some(tracker) = tracker {
					connection.attach(tracker);
				}
				trace!(id = ?delegate.id(), tracked = tracker.is_some(), "connected slot");
				state.slots.push(Arc::new(SlotEntry {
					delegate,
					connection: connection.clone(),
					tracker: tracker.map(Arc::downgrade),
					removed: AtomicBool::new(false),
				}));
				(connection, pruned)
			}
		};
		drop(pruned);
		Ok(connection)
	}

	/// Disconnects a free function.
	///
	/// # Errors
	///
	/// Iff called from inside one of this signal's slots.
	pub fn disconnect_fn<F>(&self, function: F) -> Result<usize>
	where
		F: 'static + Send + Sync + Fn(Args),
	{
		let id = Delegate::from_fn(function).id();
		self.disconnect_where(|delegate_id| delegate_id == id)
	}

	/// Disconnects `method` bound to `receiver`.
	///
	/// # Errors
	///
	/// Iff called from inside one of this signal's slots.
	pub fn disconnect<R, M>(&self, receiver: &Arc<R>, method: M) -> Result<usize>
	where
		R: ?Sized + 'static + Send + Sync,
		M: 'static + Send + Sync + Fn(&R, Args),
	{
		let id = Delegate::from_method(receiver, method).id();
		self.disconnect_where(|delegate_id| delegate_id == id)
	}

	/// Disconnects all methods bound to `receiver`.
	///
	/// # Errors
	///
	/// Iff called from inside one of this signal's slots.
	pub fn disconnect_receiver<R: ?Sized>(&self, receiver: &Arc<R>) -> Result<usize> {
		let address = DelegateId::address_of(Arc::as_ptr(receiver));
		self.disconnect_where(|delegate_id| delegate_id.receiver == address)
	}

	/// Disconnects every slot.
	///
	/// # Errors
	///
	/// Iff called from inside one of this signal's slots.
	pub fn disconnect_all(&self) -> Result<usize> {
		self.disconnect_where(|_| true)
	}

	fn disconnect_where(&self, mut predicate: impl FnMut(DelegateId) -> bool) -> Result<usize> {
		let state = self.core.state.lock();
		let (pruned, taken) = {
			let mut state = state.borrow_mut();
			state.ensure_idle(Operation::Disconnect)?;
			let pruned = state.prune();
			let taken = state.take_where(|entry| predicate(entry.delegate.id()));
			(pruned, taken)
		};
		let count = taken.len();
		if count > 0 {
			trace!(count, "disconnected slots");
		}
		drop((pruned, taken));
		Ok(count)
	}

	/// Number of connected slots whose receiver is still alive.
	#[must_use]
	pub fn slot_count(&self) -> usize {
		self.core.state.lock().borrow().live().count()
	}

	/// Whether [`slot_count`](`Signal::slot_count`) is zero.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.slot_count() == 0
	}

	/// Whether this signal is being emitted on the current thread.
	///
	/// Waits for emissions on other threads to complete first.
	#[must_use]
	pub fn is_emitting(&self) -> bool {
		self.core.state.lock().borrow().emitting > 0
	}

	/// Calls each live slot in connection order with a clone of `args`.
	///
	/// Slots may emit this signal again. Slots disconnected during the emission are
	/// skipped from then on.
	///
	/// Returns the number of slots that were called.
	pub fn emit(&self, args: Args) -> usize
	where
		Args: Clone,
	{
		let state = self.core.state.lock();
		state.borrow_mut().emitting += 1;
		let state = guard(state, |state| self.core.finish_emission(&state));

		let mut called = 0;
		let mut index = 0;
		loop {
			// Slots can't be inserted or erased while emitting, so indices are stable.
			let entry = match state.borrow().slots.get(index) {
				Some(entry) => Arc::clone(entry),
				None => break,
			};
			index += 1;

			if entry.removed.load(Ordering::Relaxed) {
				continue;
			}
			if entry.delegate.invoke(args.clone()) {
				called += 1;
			}
		}
		trace!(called, "emitted signal");
		called
	}
}

impl<Args> Drop for Signal<Args> {
	fn drop(&mut self) {
		let state = self.core.state.lock();
		let slots = mem::take(&mut state.borrow_mut().slots);
		for entry in &slots {
			entry.release();
		}
		drop(slots);
	}
}

impl<Args> Debug for Signal<Args> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let maybe_guard = self.core.state.try_lock();
		let maybe_state = maybe_guard.as_ref().and_then(|guard| guard.try_borrow().ok());
		let mut debug = f.debug_struct("Signal");
		match maybe_state {
			Some(state) => debug
				.field(
					"slots",
					&state
						.live()
						.map(|entry| entry.delegate.id())
						.collect::<Vec<_>>(),
				)
				.field("emitting", &state.emitting)
				.finish(),
			None => debug.field("slots", &"(locked)").finish(),
		}
	}
}
