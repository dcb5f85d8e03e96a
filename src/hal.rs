//! Platform abstraction for the input line and the interrupt controller.
//!
//! Implement [`ButtonIo`] for your GPIO/EXTI peripheral and [`InterruptMask`]
//! for your core's global interrupt mask. [`CriticalSectionMask`] covers the
//! latter on any platform that provides a `critical-section` implementation,
//! at the cost of handler nesting.

use crate::types::{Bias, Edge, PinLevel};

/// Trait for abstracting the digital input line and its edge interrupt.
///
/// Methods take `&self` because one GPIO controller is usually shared by
/// several monitors and is also touched from interrupt context. Implementations
/// are expected to use register-level interior mutability. Handle any hardware
/// errors internally - these methods cannot fail.
pub trait ButtonIo {
    /// Identifier of a digital line (pin number, EXTI line, etc.).
    type Channel: Copy;

    /// Reads the current electrical level of the line.
    fn read_level(&self, channel: Self::Channel) -> PinLevel;

    /// Writes the output latch of the line.
    ///
    /// On AVR-style ports this also selects the pull resistor, which is why
    /// the monitor writes the rest level before switching to input.
    fn drive_level(&self, channel: Self::Channel, level: PinLevel);

    /// Switches the line to input mode with the given bias.
    fn configure_as_input(&self, channel: Self::Channel, bias: Bias);

    /// Enables the interrupt for the line.
    ///
    /// After this returns, the platform's interrupt handler for the line must
    /// call [`ButtonMonitor::on_transition`](crate::ButtonMonitor::on_transition)
    /// on the owning monitor for every reported edge.
    fn register_edge_handler(&self, channel: Self::Channel, edge: Edge);

    /// Disables the interrupt for the line. Must be harmless if none is registered.
    fn deregister_handler(&self, channel: Self::Channel);
}

/// Trait for abstracting the global interrupt-enable mask.
pub trait InterruptMask {
    /// Saved mask state, handed back to [`restore`](Self::restore).
    type RestoreState: Copy;

    /// Saves the current mask state and disables interrupts.
    ///
    /// # Safety
    /// Every call must be paired with exactly one later call to
    /// [`restore`](Self::restore) with the returned state, in LIFO order.
    /// Prefer [`InterruptGuard`], which upholds this.
    unsafe fn save_and_disable(&self) -> Self::RestoreState;

    /// Saves the current mask state and enables interrupts.
    ///
    /// Used by the transition handler so other lines can preempt it. Returns
    /// `None` if this mask cannot unmask from handler context; the mask is then
    /// left untouched and there is nothing to restore.
    ///
    /// # Safety
    /// A returned state must be passed to [`restore`](Self::restore) exactly
    /// once, in LIFO order with other saved states.
    unsafe fn save_and_enable(&self) -> Option<Self::RestoreState>;

    /// Restores a previously saved state.
    ///
    /// # Safety
    /// `state` must come from the most recent unmatched save.
    unsafe fn restore(&self, state: Self::RestoreState);
}

/// Scoped interrupt mask change, restored on drop.
///
/// The previous mask state is restored on every exit path, including unwinding
/// out of a user callback.
#[must_use = "the mask is restored as soon as the guard is dropped"]
pub struct InterruptGuard<'m, M: InterruptMask> {
    mask: &'m M,
    state: Option<M::RestoreState>,
}

impl<'m, M: InterruptMask> InterruptGuard<'m, M> {
    /// Disables interrupts until the guard is dropped.
    pub fn disabled(mask: &'m M) -> Self {
        // SAFETY: the matching restore happens in Drop.
        let state = unsafe { mask.save_and_disable() };
        Self {
            mask,
            state: Some(state),
        }
    }

    /// Enables interrupts until the guard is dropped, then returns the mask to
    /// whatever it was before. Does nothing on masks that cannot unmask.
    pub fn enabled(mask: &'m M) -> Self {
        // SAFETY: the matching restore happens in Drop.
        let state = unsafe { mask.save_and_enable() };
        Self { mask, state }
    }
}

impl<M: InterruptMask> Drop for InterruptGuard<'_, M> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            // SAFETY: state was produced by the save in the constructor and
            // guards are dropped in LIFO order.
            unsafe { self.mask.restore(state) }
        }
    }
}

/// [`InterruptMask`] backed by the `critical-section` crate.
///
/// Masking (registration) goes through `critical_section::acquire`/`release`.
/// `critical-section` cannot unmask inside a handler, so
/// [`save_and_enable`](InterruptMask::save_and_enable) leaves the mask alone:
/// handlers and callbacks run with whatever mask state the platform entered
/// them with, and no critical section is ever held around a callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalSectionMask;

impl InterruptMask for CriticalSectionMask {
    type RestoreState = critical_section::RestoreState;

    unsafe fn save_and_disable(&self) -> Self::RestoreState {
        // SAFETY: forwarded contract, caller pairs this with restore.
        unsafe { critical_section::acquire() }
    }

    unsafe fn save_and_enable(&self) -> Option<Self::RestoreState> {
        None
    }

    unsafe fn restore(&self, state: Self::RestoreState) {
        // SAFETY: forwarded contract, state comes from the matching acquire.
        unsafe { critical_section::release(state) }
    }
}
