#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering::Relaxed};

use sts_signals::{AutoDisconnect, AutoDisconnecting};

#[derive(Debug, Default)]
pub struct Receiver {
	v1: AtomicUsize,
	v2: AtomicUsize,
}

impl Receiver {
	pub fn slot(&self, (v1, v2): (usize, usize)) {
		self.v1.store(v1, Relaxed);
		self.v2.store(v2, Relaxed);
	}

	pub fn swapped_slot(&self, (v1, v2): (usize, usize)) {
		self.v1.store(v2, Relaxed);
		self.v2.store(v1, Relaxed);
	}

	pub fn values(&self) -> (usize, usize) {
		(self.v1.load(Relaxed), self.v2.load(Relaxed))
	}
}

#[derive(Debug, Default)]
pub struct TrackedReceiver {
	called: AtomicBool,
	auto_disconnect: AutoDisconnect,
}

impl TrackedReceiver {
	pub fn slot(&self, state: bool) {
		self.called.store(state, Relaxed);
	}

	pub fn called(&self) -> bool {
		self.called.load(Relaxed)
	}
}

impl AutoDisconnecting for TrackedReceiver {
	fn auto_disconnect(&self) -> &AutoDisconnect {
		&self.auto_disconnect
	}
}
