use std::sync::{
	atomic::{AtomicBool, Ordering::Relaxed},
	Arc,
};

use sts_signals::{AutoDisconnect, AutoDisconnecting, Signal};

mod _receiver;
use _receiver::TrackedReceiver;

#[derive(Default)]
struct Receiver1 {
	called: AtomicBool,
	auto_disconnect: AutoDisconnect,
}

impl Receiver1 {
	fn slot_r1(&self, state: bool) {
		self.called.store(state, Relaxed);
	}
}

impl AutoDisconnecting for Receiver1 {
	fn auto_disconnect(&self) -> &AutoDisconnect {
		&self.auto_disconnect
	}
}

/// Holds two trackers, so the one to use must be chosen explicitly.
#[derive(Default)]
struct Receiver3 {
	first: Receiver1,
	second: Receiver1,
	called: AtomicBool,
}

impl Receiver3 {
	fn slot_r3(&self, state: bool) {
		self.called.store(state, Relaxed);
	}
}

#[test]
fn several_trackers() {
	let signal = Signal::<bool>::new();
	let r1 = Arc::new(Receiver1::default());
	let r2 = Arc::new(TrackedReceiver::default());
	let r3 = Arc::new(Receiver3::default());

	signal.connect_auto(&r1, Receiver1::slot_r1).unwrap();
	signal.connect_auto(&r2, TrackedReceiver::slot).unwrap();
	signal
		.connect_auto_with(&r3, &r3.second.auto_disconnect, Receiver3::slot_r3)
		.unwrap();
	// Duplicate, not connected again.
	signal
		.connect_auto_with(&r3, &r3.first.auto_disconnect, Receiver3::slot_r3)
		.unwrap();
	assert_eq!(signal.slot_count(), 3);
	assert_eq!(r3.first.auto_disconnect.signals_connected(), 0);
	assert_eq!(r3.second.auto_disconnect.signals_connected(), 1);

	signal.emit(true);
	assert!(r1.called.load(Relaxed));
	assert!(r2.called());
	assert!(r3.called.load(Relaxed));

	drop(r3);
	assert_eq!(signal.slot_count(), 2);
	signal.emit(false);
	assert!(!r1.called.load(Relaxed));
	assert!(!r2.called());

	drop(r1);
	assert_eq!(signal.slot_count(), 1);
	signal.emit(true);
	assert!(r2.called());

	drop(r2);
	assert_eq!(signal.slot_count(), 0);
}

#[test]
fn signal_dropping() {
	let sig1 = Signal::<bool>::new();
	let sig2 = Signal::<bool>::new();
	let r1 = Arc::new(Receiver1::default());
	let r2 = Arc::new(TrackedReceiver::default());
	let r3 = Arc::new(Receiver3::default());

	sig1.connect_auto(&r1, Receiver1::slot_r1).unwrap();
	sig1.connect_auto(&r2, TrackedReceiver::slot).unwrap();
	sig1
		.connect_auto_with(&r3, &r3.first.auto_disconnect, Receiver3::slot_r3)
		.unwrap();
	assert_eq!(r1.auto_disconnect.signals_connected(), 1);
	assert_eq!(r2.auto_disconnect().signals_connected(), 1);
	assert_eq!(r3.first.auto_disconnect.signals_connected(), 1);

	sig1.emit(true);
	assert!(r1.called.load(Relaxed));
	assert!(r2.called());
	assert!(r3.called.load(Relaxed));

	sig2.connect_auto(&r1, Receiver1::slot_r1).unwrap();
	sig2.connect_auto(&r2, TrackedReceiver::slot).unwrap();
	sig2
		.connect_auto_with(&r3, &r3.first.auto_disconnect, Receiver3::slot_r3)
		.unwrap();
	assert_eq!(r1.auto_disconnect.signals_connected(), 2);
	assert_eq!(r2.auto_disconnect().signals_connected(), 2);
	assert_eq!(r3.first.auto_disconnect.signals_connected(), 2);

	sig2.emit(false);
	assert!(!r1.called.load(Relaxed));
	assert!(!r2.called());
	assert!(!r3.called.load(Relaxed));

	drop(sig1);
	assert_eq!(r1.auto_disconnect.signals_connected(), 1);
	assert_eq!(r2.auto_disconnect().signals_connected(), 1);
	assert_eq!(r3.first.auto_disconnect.signals_connected(), 1);

	sig2.emit(true);
	assert!(r1.called.load(Relaxed));
	assert!(r2.called());
	assert!(r3.called.load(Relaxed));

	drop(sig2);
	assert_eq!(r1.auto_disconnect.signals_connected(), 0);
	assert_eq!(r2.auto_disconnect().signals_connected(), 0);
	assert_eq!(r3.first.auto_disconnect.signals_connected(), 0);
}

#[test]
fn dropping_a_detached_tracker_disconnects_a_live_receiver() {
	let signal = Signal::<bool>::new();
	let receiver = Arc::new(TrackedReceiver::default());
	let tracker = AutoDisconnect::new();

	signal
		.connect_auto_with(&receiver, &tracker, TrackedReceiver::slot)
		.unwrap();
	assert_eq!(tracker.signals_connected(), 1);
	assert_eq!(receiver.auto_disconnect().signals_connected(), 0);

	drop(tracker);
	assert!(signal.is_empty());
	assert_eq!(signal.emit(true), 0);
	assert!(!receiver.called());
}

#[test]
fn manual_disconnect_unregisters() {
	let signal = Signal::<bool>::new();
	let receiver = Arc::new(TrackedReceiver::default());

	signal.connect_auto(&receiver, TrackedReceiver::slot).unwrap();
	assert_eq!(signal.disconnect(&receiver, TrackedReceiver::slot), Ok(1));
	assert_eq!(receiver.auto_disconnect().signals_connected(), 0);

	let connection = signal.connect_auto(&receiver, TrackedReceiver::slot).unwrap();
	connection.disconnect();
	assert!(signal.is_empty());
	assert_eq!(receiver.auto_disconnect().signals_connected(), 0);

	signal.connect_auto(&receiver, TrackedReceiver::slot).unwrap();
	assert_eq!(signal.disconnect_all(), Ok(1));
	assert_eq!(receiver.auto_disconnect().signals_connected(), 0);
}

#[test]
fn outliving_trackers_and_signals() {
	let receiver = Arc::new(TrackedReceiver::default());
	let connection = {
		let signal = Signal::<bool>::new();
		signal.connect_auto(&receiver, TrackedReceiver::slot).unwrap()
	};
	assert_eq!(receiver.auto_disconnect().signals_connected(), 0);

	// The signal is gone, so this does nothing.
	connection.disconnect();
	drop(receiver);
}

#[test]
fn debug_shows_connections() {
	let tracker = AutoDisconnect::new();
	assert_eq!(
		format!("{tracker:?}"),
		"AutoDisconnect { connections: [] }"
	);
}
