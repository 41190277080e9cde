use std::{
	fmt::{self, Debug, Formatter},
	mem,
	sync::Arc,
};

use parking_lot::Mutex;
use tracing::trace;

use crate::Connection;

pub(crate) type ConnectionList = Mutex<Vec<Connection>>;

/// Disconnects every slot connected through it when dropped.
///
/// Embed one in a receiver and connect with [`Signal::connect_auto`](`crate::Signal::connect_auto`)
/// to have the receiver's slots removed from their signals as soon as it's dropped:
///
/// ```
/// use std::sync::Arc;
/// use sts_signals::{AutoDisconnect, AutoDisconnecting, Signal};
///
/// #[derive(Default)]
/// struct Receiver {
///     auto_disconnect: AutoDisconnect,
/// }
///
/// impl Receiver {
///     fn slot(&self, _: bool) {}
/// }
///
/// impl AutoDisconnecting for Receiver {
///     fn auto_disconnect(&self) -> &AutoDisconnect {
///         &self.auto_disconnect
///     }
/// }
///
/// let signal = Signal::new();
/// let receiver = Arc::new(Receiver::default());
/// signal.connect_auto(&receiver, Receiver::slot).unwrap();
/// assert_eq!(receiver.auto_disconnect.signals_connected(), 1);
///
/// drop(receiver);
/// assert!(signal.is_empty());
/// ```
///
/// A receiver may hold several trackers; pick one explicitly with
/// [`Signal::connect_auto_with`](`crate::Signal::connect_auto_with`).
#[derive(Default)]
pub struct AutoDisconnect {
	connections: Arc<ConnectionList>,
}

/// Gives [`Signal::connect_auto`](`crate::Signal::connect_auto`) access to a receiver's tracker.
pub trait AutoDisconnecting {
	/// The tracker new connections are registered with.
	fn auto_disconnect(&self) -> &AutoDisconnect;
}

impl AutoDisconnecting for AutoDisconnect {
	fn auto_disconnect(&self) -> &AutoDisconnect {
		self
	}
}

impl AutoDisconnect {
	/// Creates a tracker without connections.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of connections currently registered here.
	#[must_use]
	pub fn signals_connected(&self) -> usize {
		self.connections.lock().len()
	}

	pub(crate) fn connections(&self) -> &Arc<ConnectionList> {
		&self.connections
	}
}

impl Drop for AutoDisconnect {
	fn drop(&mut self) {
		// The lock must not be held while signals call back into `Connection::detach`.
		let connections = mem::take(&mut *self.connections.lock());
		if !connections.is_empty() {
			trace!(count = connections.len(), "auto-disconnecting");
		}
		for connection in &connections {
			connection.disconnect();
		}
	}
}

impl Debug for AutoDisconnect {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let maybe_guard = self.connections.try_lock();
		f.debug_struct("AutoDisconnect")
			.field(
				"connections",
				maybe_guard
					.as_ref()
					.map_or(&"(locked)" as &dyn Debug, |guard| &**guard),
			)
			.finish()
	}
}
