//! Core configuration and level types.

use crate::time::TimeDuration;

/// Default minimum hold time before a release is honored, in milliseconds.
pub const DEFAULT_MIN_HOLD_MILLIS: u64 = 20;

/// Raw electrical level of an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinLevel {
    /// Line reads low (GND).
    Low,
    /// Line reads high (Vcc).
    High,
}

impl PinLevel {
    /// Returns the opposite electrical level.
    #[inline]
    pub fn inverted(self) -> Self {
        match self {
            PinLevel::Low => PinLevel::High,
            PinLevel::High => PinLevel::Low,
        }
    }
}

/// Logical level of a button, independent of wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Button is pressed.
    Asserted,
    /// Button is at rest.
    Released,
}

/// Input biasing applied when monitoring starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bias {
    /// Internal pull-up resistor enabled.
    PullUp,

    /// No internal bias. The circuit must provide an external pull-down.
    Floating,
}

/// Which edges the interrupt subsystem should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low to high only.
    Rising,
    /// High to low only.
    Falling,
    /// Every level change.
    AnyChange,
}

/// How the button is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Pressing connects the line to GND. Uses the internal pull-up.
    ActiveLow,

    /// Pressing connects the line to Vcc. Requires an external pull-down
    /// resistor; this cannot be checked in software.
    ActiveHigh,
}

impl Polarity {
    /// Electrical level read while the button is pressed.
    #[inline]
    pub fn asserted_level(self) -> PinLevel {
        match self {
            Polarity::ActiveLow => PinLevel::Low,
            Polarity::ActiveHigh => PinLevel::High,
        }
    }

    /// Electrical level read while the button is at rest.
    #[inline]
    pub fn rest_level(self) -> PinLevel {
        self.asserted_level().inverted()
    }

    /// Bias that holds the line at its rest level.
    #[inline]
    pub fn bias(self) -> Bias {
        match self {
            Polarity::ActiveLow => Bias::PullUp,
            Polarity::ActiveHigh => Bias::Floating,
        }
    }

    /// Maps a raw reading onto the logical level for this wiring.
    #[inline]
    pub fn classify(self, level: PinLevel) -> Level {
        if level == self.asserted_level() {
            Level::Asserted
        } else {
            Level::Released
        }
    }
}

/// Which transition fires the user callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerEdge {
    /// Fire as soon as the button is pressed. No debouncing, no hold time.
    OnPress,

    /// Fire when the button is released after being held longer than the
    /// minimum hold time. The callback receives the hold duration.
    #[default]
    OnRelease,
}

/// Static configuration of one monitored button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonConfig<Ch, D: TimeDuration> {
    /// Digital line being monitored.
    pub channel: Ch,

    /// Wiring of the button.
    pub polarity: Polarity,

    /// Transition that fires the callback.
    pub trigger_edge: TriggerEdge,

    /// Minimum hold before a release is honored. Ignored for `OnPress`.
    pub min_hold: D,
}

impl<Ch, D: TimeDuration> ButtonConfig<Ch, D> {
    /// Creates a configuration.
    #[inline]
    pub fn new(channel: Ch, polarity: Polarity, trigger_edge: TriggerEdge, min_hold: D) -> Self {
        Self {
            channel,
            polarity,
            trigger_edge,
            min_hold,
        }
    }

    /// Release-triggered configuration with the default 20 ms hold threshold.
    #[inline]
    pub fn with_defaults(channel: Ch, polarity: Polarity) -> Self {
        Self::new(
            channel,
            polarity,
            TriggerEdge::OnRelease,
            D::from_millis(DEFAULT_MIN_HOLD_MILLIS),
        )
    }
}
