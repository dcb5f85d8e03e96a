//! Shared test infrastructure for push-button-monitor integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::{Cell, RefCell};
use critical_section::Mutex;
use heapless::Vec;
use push_button_monitor::{
    Bias, ButtonIo, ButtonMonitor, Edge, InterruptMask, Millis, MillisDuration, PinLevel,
    TimeSource,
};

pub const CHANNELS: usize = 4;

pub type TestMonitor<'a> = ButtonMonitor<'a, Millis, MockPlatform, MockPlatform, MockTimeSource>;

// ============================================================================
// Shared State
// ============================================================================

/// `Copy` value that callbacks and interrupt handlers can share.
pub struct SharedCell<T: Copy>(Mutex<Cell<T>>);

impl<T: Copy> SharedCell<T> {
    pub const fn new(value: T) -> Self {
        Self(Mutex::new(Cell::new(value)))
    }

    pub fn get(&self) -> T {
        critical_section::with(|cs| self.0.borrow(cs).get())
    }

    pub fn set(&self, value: T) {
        critical_section::with(|cs| self.0.borrow(cs).set(value));
    }

    pub fn replace(&self, value: T) -> T {
        critical_section::with(|cs| self.0.borrow(cs).replace(value))
    }
}

// ============================================================================
// Mock Platform (GPIO + interrupt controller)
// ============================================================================

/// Hardware call recorded by the mock platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoCall {
    Drive(usize, PinLevel),
    ConfigureInput(usize, Bias),
    Read(usize),
    /// Registration, with the global interrupt-enable flag at the time of the call.
    Register {
        channel: usize,
        edge: Edge,
        interrupts_enabled: bool,
    },
    Deregister(usize),
}

/// Mock GPIO bank plus global interrupt mask.
///
/// Implements both `ButtonIo` and `InterruptMask` so that registration can
/// observe the mask state.
pub struct MockPlatform {
    levels: Mutex<Cell<[PinLevel; CHANNELS]>>,
    registered: Mutex<Cell<[bool; CHANNELS]>>,
    interrupts_enabled: SharedCell<bool>,
    calls: Mutex<RefCell<Vec<IoCall, 64>>>,
}

impl MockPlatform {
    /// All lines idle high (active-low rest level), interrupts enabled.
    pub fn new() -> Self {
        Self::with_level(PinLevel::High)
    }

    pub fn with_level(level: PinLevel) -> Self {
        Self {
            levels: Mutex::new(Cell::new([level; CHANNELS])),
            registered: Mutex::new(Cell::new([false; CHANNELS])),
            interrupts_enabled: SharedCell::new(true),
            calls: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    pub fn set_level(&self, channel: usize, level: PinLevel) {
        critical_section::with(|cs| {
            let levels = self.levels.borrow(cs);
            let mut updated = levels.get();
            updated[channel] = level;
            levels.set(updated);
        });
    }

    pub fn is_registered(&self, channel: usize) -> bool {
        critical_section::with(|cs| self.registered.borrow(cs).get()[channel])
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled.get()
    }

    /// Simulates entering an interrupt handler, which masks interrupts.
    pub fn enter_isr(&self) {
        self.interrupts_enabled.set(false);
    }

    /// Simulates returning to thread mode with interrupts enabled.
    pub fn leave_isr(&self) {
        self.interrupts_enabled.set(true);
    }

    pub fn calls(&self) -> Vec<IoCall, 64> {
        critical_section::with(|cs| self.calls.borrow_ref(cs).clone())
    }

    pub fn count(&self, matches: impl Fn(&IoCall) -> bool) -> usize {
        critical_section::with(|cs| {
            self.calls
                .borrow_ref(cs)
                .iter()
                .filter(|call| matches(*call))
                .count()
        })
    }

    pub fn clear_calls(&self) {
        critical_section::with(|cs| self.calls.borrow_ref_mut(cs).clear());
    }

    fn record(&self, call: IoCall) {
        critical_section::with(|cs| {
            let _ = self.calls.borrow_ref_mut(cs).push(call);
        });
    }

    fn set_registered(&self, channel: usize, registered: bool) {
        critical_section::with(|cs| {
            let flags = self.registered.borrow(cs);
            let mut updated = flags.get();
            updated[channel] = registered;
            flags.set(updated);
        });
    }
}

impl ButtonIo for MockPlatform {
    type Channel = usize;

    fn read_level(&self, channel: usize) -> PinLevel {
        self.record(IoCall::Read(channel));
        critical_section::with(|cs| self.levels.borrow(cs).get()[channel])
    }

    fn drive_level(&self, channel: usize, level: PinLevel) {
        self.record(IoCall::Drive(channel, level));
    }

    fn configure_as_input(&self, channel: usize, bias: Bias) {
        self.record(IoCall::ConfigureInput(channel, bias));
    }

    fn register_edge_handler(&self, channel: usize, edge: Edge) {
        self.set_registered(channel, true);
        self.record(IoCall::Register {
            channel,
            edge,
            interrupts_enabled: self.interrupts_enabled.get(),
        });
    }

    fn deregister_handler(&self, channel: usize) {
        self.set_registered(channel, false);
        self.record(IoCall::Deregister(channel));
    }
}

impl InterruptMask for MockPlatform {
    type RestoreState = bool;

    unsafe fn save_and_disable(&self) -> bool {
        self.interrupts_enabled.replace(false)
    }

    unsafe fn save_and_enable(&self) -> Option<bool> {
        Some(self.interrupts_enabled.replace(true))
    }

    unsafe fn restore(&self, state: bool) {
        self.interrupts_enabled.set(state);
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: SharedCell<Millis>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: SharedCell::new(Millis(0)),
        }
    }

    pub fn set_time(&self, millis: u32) {
        self.current_time.set(Millis(millis));
    }

    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time.set(Millis(current.0.wrapping_add(millis)));
    }
}

impl TimeSource<Millis> for MockTimeSource {
    fn now(&self) -> Millis {
        self.current_time.get()
    }
}

// ============================================================================
// Recording Callback
// ============================================================================

/// Records every hold duration passed to a callback.
pub struct Recorder {
    held: Mutex<RefCell<Vec<u32, 32>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            held: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    pub fn record(&self, held: MillisDuration) {
        critical_section::with(|cs| {
            let _ = self.held.borrow_ref_mut(cs).push(held.0);
        });
    }

    pub fn count(&self) -> usize {
        critical_section::with(|cs| self.held.borrow_ref(cs).len())
    }

    pub fn held(&self) -> Vec<u32, 32> {
        critical_section::with(|cs| self.held.borrow_ref(cs).clone())
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Sets the raw level of `channel` at time `at` and runs the monitor's handler,
/// the way the platform's interrupt would.
pub fn inject(
    monitor: &TestMonitor<'_>,
    platform: &MockPlatform,
    timer: &MockTimeSource,
    channel: usize,
    level: PinLevel,
    at: u32,
) {
    platform.set_level(channel, level);
    timer.set_time(at);
    platform.enter_isr();
    monitor.on_transition();
}
