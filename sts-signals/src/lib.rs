#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![doc = include_str!("../README.md")]
//!
//! # Threading Notes
//!
//! Slots run on the thread that calls [`Signal::emit`], while that signal's lock is held.
//! A slot that waits on another thread which in turn emits the same signal will deadlock.

mod auto_disconnect;
mod connection;
mod delegate;
mod delegate_id;
mod error;
mod signal;

pub use auto_disconnect::{AutoDisconnect, AutoDisconnecting};
pub use connection::Connection;
pub use delegate::Delegate;
pub use delegate_id::{CallableId, DelegateId};
pub use error::{Operation, Result, SignalError};
pub use signal::Signal;
