//! Interrupt-driven push button monitor.
//!
//! Provides [`ButtonMonitor`], which turns the raw, bouncing level changes of a
//! single input line into at most one callback per press/release cycle.

use core::cell::Cell;

use critical_section::Mutex;

use crate::command::MonitorAction;
use crate::hal::{ButtonIo, InterruptGuard, InterruptMask};
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{ButtonConfig, Edge, Level, Polarity, TriggerEdge};

/// User callback invoked from the transition handler.
///
/// Receives how long the button was held. In [`TriggerEdge::OnPress`] mode the
/// hold time is not known yet and the argument is always zero. `Sync` because
/// it is reached from interrupt context through a shared monitor.
pub type ButtonCallback<'a, D> = &'a (dyn Fn(D) + Sync);

/// Debounce state, only touched by the owning monitor's handler.
struct ButtonState<I> {
    previous_level: Cell<Level>,
    asserted_at: Cell<Option<I>>,
    in_callback: Cell<bool>,
}

/// Clears the in-callback flag on every exit path.
struct CallbackScope<'s, I> {
    state: &'s Mutex<ButtonState<I>>,
}

impl<I> Drop for CallbackScope<'_, I> {
    fn drop(&mut self) {
        critical_section::with(|cs| self.state.borrow(cs).in_callback.set(false));
    }
}

/// Monitors one push button through edge interrupts.
///
/// Construction touches no hardware. [`start_monitoring`](Self::start_monitoring)
/// prepares the line and enables its interrupt; from then on the platform's
/// interrupt handler must call [`on_transition`](Self::on_transition) for every
/// edge. Dropping the monitor stops monitoring.
///
/// Monitors of different buttons are independent and may preempt each other,
/// because the handler unmasks interrupts on entry. A monitor never re-enters
/// its own callback: an edge arriving while the callback runs still updates
/// the level and timestamp but is not dispatched.
///
/// The debounce state sits in a `critical_section::Mutex`, so the monitor is
/// `Send + Sync` whenever the platform types are `Sync`. The usual binding is a
/// `static Mutex<Cell<Option<&'static ButtonMonitor<..>>>>` that the interrupt
/// handler reads before calling `on_transition`.
///
/// The callback runs in interrupt context and must be short. Since it can
/// only ever see `&ButtonMonitor`, it cannot start or stop its own monitor.
///
/// # Type Parameters
/// * `'a` - Lifetime of the platform and callback references
/// * `I` - Time instant type
/// * `B` - Input line / edge interrupt implementation
/// * `M` - Global interrupt mask implementation
/// * `T` - Time source implementation
pub struct ButtonMonitor<'a, I, B, M, T>
where
    I: TimeInstant,
    B: ButtonIo,
    M: InterruptMask,
    T: TimeSource<I>,
{
    config: ButtonConfig<B::Channel, I::Duration>,
    callback: ButtonCallback<'a, I::Duration>,
    io: &'a B,
    mask: &'a M,
    time_source: &'a T,
    state: Mutex<ButtonState<I>>,
    monitoring: bool,
}

impl<'a, I, B, M, T> ButtonMonitor<'a, I, B, M, T>
where
    I: TimeInstant,
    B: ButtonIo,
    M: InterruptMask,
    T: TimeSource<I>,
{
    /// Creates an idle monitor. Does not touch the hardware.
    pub const fn new(
        config: ButtonConfig<B::Channel, I::Duration>,
        callback: ButtonCallback<'a, I::Duration>,
        io: &'a B,
        mask: &'a M,
        time_source: &'a T,
    ) -> Self {
        Self {
            config,
            callback,
            io,
            mask,
            time_source,
            state: Mutex::new(ButtonState {
                previous_level: Cell::new(Level::Released),
                asserted_at: Cell::new(None),
                in_callback: Cell::new(false),
            }),
            monitoring: false,
        }
    }

    /// Creates an idle, release-triggered monitor with a 20 ms minimum hold.
    pub fn with_defaults(
        channel: B::Channel,
        callback: ButtonCallback<'a, I::Duration>,
        polarity: Polarity,
        io: &'a B,
        mask: &'a M,
        time_source: &'a T,
    ) -> Self {
        Self::new(
            ButtonConfig::with_defaults(channel, polarity),
            callback,
            io,
            mask,
            time_source,
        )
    }

    /// Handles a monitor action by dispatching to the appropriate method.
    pub fn handle_action(&mut self, action: MonitorAction<I::Duration>) {
        match action {
            MonitorAction::Start => self.start_monitoring(),
            MonitorAction::Stop => self.stop_monitoring(),
            MonitorAction::SetTriggerEdge(edge) => self.set_trigger_edge(edge),
            MonitorAction::SetMinHold(min_hold) => self.set_min_hold(min_hold),
        }
    }

    /// Prepares the line and enables its any-change interrupt.
    ///
    /// Pulls the line to its rest level (internal pull-up for active-low; an
    /// active-high button needs an external pull-down), switches it to input,
    /// samples the initial level and forgets any previous press. The interrupt
    /// is registered with interrupts masked, and the mask is restored to its
    /// prior state afterwards.
    ///
    /// Calling this while already monitoring re-initializes the state and
    /// registers the handler again.
    pub fn start_monitoring(&mut self) {
        let channel = self.config.channel;
        let polarity = self.config.polarity;

        self.io.drive_level(channel, polarity.rest_level());
        self.io.configure_as_input(channel, polarity.bias());
        let initial = polarity.classify(self.io.read_level(channel));
        critical_section::with(|cs| {
            let state = self.state.borrow(cs);
            state.previous_level.set(initial);
            state.asserted_at.set(None);
        });
        self.monitoring = true;

        let _masked = InterruptGuard::disabled(self.mask);
        self.io.register_edge_handler(channel, Edge::AnyChange);

        #[cfg(feature = "defmt")]
        defmt::debug!("button monitor started, initial level {}", initial);
    }

    /// Disables the interrupt. No-op if not monitoring.
    ///
    /// Only future edges are prevented; a handler already running finishes.
    pub fn stop_monitoring(&mut self) {
        if !self.monitoring {
            return;
        }

        self.io.deregister_handler(self.config.channel);
        self.monitoring = false;

        #[cfg(feature = "defmt")]
        defmt::debug!("button monitor stopped");
    }

    /// Transition handler. Call from the line's interrupt handler on every edge.
    ///
    /// Unmasks interrupts for its whole extent so other buttons can preempt
    /// it, and leaves the mask as it found it. Classifies the new level against
    /// the previous one:
    ///
    /// - released -> asserted: records the press time; fires in `OnPress` mode
    /// - asserted -> released: fires in `OnRelease` mode if the button was held
    ///   longer than the minimum hold time
    /// - anything else: no callback
    ///
    /// The stored level is always updated. The callback is skipped if this
    /// monitor is already inside it. The bookkeeping runs in a short critical
    /// section; the callback never does.
    pub fn on_transition(&self) {
        let _unmasked = InterruptGuard::enabled(self.mask);
        let now = self.time_source.now();
        let level = self
            .config
            .polarity
            .classify(self.io.read_level(self.config.channel));
        let trigger = self.config.trigger_edge;
        let min_hold = self.config.min_hold;

        let held = critical_section::with(|cs| {
            let state = self.state.borrow(cs);
            let eligible = match (state.previous_level.get(), level) {
                (Level::Released, Level::Asserted) => {
                    state.asserted_at.set(Some(now));
                    trigger == TriggerEdge::OnPress
                }
                (Level::Asserted, Level::Released) => trigger == TriggerEdge::OnRelease,
                _ => false,
            };
            state.previous_level.set(level);

            if !eligible {
                return None;
            }

            // A release without an observed press has no meaningful hold time.
            let held = now.duration_since(state.asserted_at.get()?);

            if trigger == TriggerEdge::OnRelease && held.as_millis() <= min_hold.as_millis() {
                #[cfg(feature = "defmt")]
                defmt::trace!("release after {=u64} ms ignored", held.as_millis());
                return None;
            }

            if state.in_callback.replace(true) {
                #[cfg(feature = "defmt")]
                defmt::trace!("nested transition not dispatched");
                return None;
            }

            Some(held)
        });

        if let Some(held) = held {
            self.dispatch(held);
        }
    }

    /// Runs the callback. The in-callback flag is already set.
    fn dispatch(&self, held: I::Duration) {
        // Dropped in reverse order: mask first, then the flag.
        let _busy = CallbackScope { state: &self.state };
        let _unmasked = InterruptGuard::enabled(self.mask);
        (self.callback)(held);
    }

    /// Returns true while the edge interrupt is registered.
    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    /// Returns true while the user callback is executing.
    pub fn is_in_callback(&self) -> bool {
        critical_section::with(|cs| self.state.borrow(cs).in_callback.get())
    }

    /// Logical level seen by the most recent transition (or by `start_monitoring`).
    pub fn previous_level(&self) -> Level {
        critical_section::with(|cs| self.state.borrow(cs).previous_level.get())
    }

    /// Returns the minimum hold time for release-triggered callbacks.
    pub fn min_hold(&self) -> I::Duration {
        self.config.min_hold
    }

    /// Sets the minimum hold time for release-triggered callbacks.
    pub fn set_min_hold(&mut self, min_hold: I::Duration) {
        self.config.min_hold = min_hold;
    }

    /// Returns the current callback.
    pub fn callback(&self) -> ButtonCallback<'a, I::Duration> {
        self.callback
    }

    /// Replaces the callback.
    pub fn set_callback(&mut self, callback: ButtonCallback<'a, I::Duration>) {
        self.callback = callback;
    }

    /// Returns which transition fires the callback.
    pub fn trigger_edge(&self) -> TriggerEdge {
        self.config.trigger_edge
    }

    /// Sets which transition fires the callback.
    pub fn set_trigger_edge(&mut self, trigger_edge: TriggerEdge) {
        self.config.trigger_edge = trigger_edge;
    }

    /// Returns the wiring polarity.
    pub fn polarity(&self) -> Polarity {
        self.config.polarity
    }

    /// Returns the monitored channel.
    pub fn channel(&self) -> B::Channel {
        self.config.channel
    }

    /// Returns the full configuration.
    pub fn config(&self) -> &ButtonConfig<B::Channel, I::Duration> {
        &self.config
    }
}

impl<I, B, M, T> Drop for ButtonMonitor<'_, I, B, M, T>
where
    I: TimeInstant,
    B: ButtonIo,
    M: InterruptMask,
    T: TimeSource<I>,
{
    fn drop(&mut self) {
        self.stop_monitoring();
    }
}
