use crate::{auto_disconnect::ConnectionList, Delegate, DelegateId};

/// Links a connected slot back to the signal holding it.
///
/// A connection is a plain value: cloning it doesn't connect anything again, and
/// dropping it doesn't disconnect. Call [`Connection::disconnect`] for that.
///
/// Two connections are equal iff they refer to the same slot *and* the same signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connection {
	id: DelegateId,
	/// Serial number of the slot within its signal, `0` if unassigned.
	slot: u64,
	disconnect: Delegate<Connection>,
}

impl Connection {
	/// `disconnect` is invoked with a copy of the new connection by [`Connection::disconnect`].
	#[must_use]
	pub fn new(id: DelegateId, disconnect: Delegate<Connection>) -> Self {
		Self {
			id,
			slot: 0,
			disconnect,
		}
	}

	pub(crate) fn with_slot(self, slot: u64) -> Self {
		Self { slot, ..self }
	}

	/// A connection that can't disconnect anything.
	#[must_use]
	pub fn unbound(id: DelegateId) -> Self {
		Self::new(id, Delegate::default())
	}

	/// Whether this connection refers to a slot at all.
	#[must_use]
	pub fn is_valid(&self) -> bool {
		self.id.is_valid()
	}

	/// Identity of the connected slot.
	#[must_use]
	pub fn delegate_id(&self) -> DelegateId {
		self.id
	}

	/// Removes the slot from its signal.
	///
	/// This never fails: if the signal is currently being emitted, the slot is skipped for
	/// the rest of that emission and erased once it completes. If the signal or the slot is
	/// gone, this does nothing.
	///
	/// A connection handed out by a [`Signal`](`crate::Signal`) only ever removes the slot it
	/// was created for. Once that slot was removed by other means, a later slot with an equal
	/// [`DelegateId`] (for example a closure allocated at the same address) is left alone.
	pub fn disconnect(&self) {
		if self.is_valid() && self.disconnect.is_valid() {
			self.disconnect.invoke(self.clone());
		}
	}

	pub(crate) fn attach(&self, connections: &ConnectionList) {
		if self.is_valid() {
			connections.lock().push(self.clone());
		}
	}

	pub(crate) fn detach(&self, connections: &ConnectionList) {
		if self.is_valid() {
			let mut connections = connections.lock();
			if let Some(index) = connections.iter().position(|c| c == self) {
				connections.remove(index);
			}
		}
	}
}
