use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// What a [`Signal`](`crate::Signal`) was asked to do when it refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Any of the `connect…` methods.
	Connect,
	/// Any of the `disconnect…` methods, except for
	/// [`Connection::disconnect`](`crate::Connection::disconnect`).
	Disconnect,
}

impl Display for Operation {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Operation::Connect => "connect",
			Operation::Disconnect => "disconnect",
		})
	}
}

/// Why a [`Signal`](`crate::Signal`) refused to change its slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
	/// A slot tried to change the slot list of the signal that is currently calling it.
	///
	/// Use [`Connection::disconnect`](`crate::Connection::disconnect`) to remove a slot
	/// from inside an emission instead.
	#[error("cannot {operation} a slot while the signal is being emitted")]
	Emitting {
		/// What was attempted.
		operation: Operation,
	},
}

/// Shorthand for results of [`Signal`](`crate::Signal`) methods.
pub type Result<T, E = SignalError> = core::result::Result<T, E>;
