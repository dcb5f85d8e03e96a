#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ButtonMonitor`**: Debounces one push button and dispatches its callback from the transition handler
//! - **`ButtonConfig`**: Channel, polarity, trigger edge and minimum hold time of a button
//! - **`Polarity`**: Whether the button pulls the line low (`ActiveLow`) or high (`ActiveHigh`)
//! - **`TriggerEdge`**: Fire the callback on press (`OnPress`) or on release (`OnRelease`)
//! - **`ButtonIo`**: Trait to implement for your GPIO and edge interrupt hardware
//! - **`InterruptMask`**: Trait to implement for your global interrupt mask
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`MonitorAction`**: Commands that can be sent to control monitors
//!
//! Hold durations are reported in the `Duration` type of your `TimeInstant`.
//! [`Millis`] is provided for the common case of a wrapping 32-bit
//! millisecond tick counter.

pub mod command;
pub mod hal;
pub mod monitor;
pub mod time;
pub mod types;

pub use command::{MonitorAction, MonitorCommand};
pub use hal::{ButtonIo, CriticalSectionMask, InterruptGuard, InterruptMask};
pub use monitor::{ButtonCallback, ButtonMonitor};
pub use time::{Millis, MillisDuration, TimeDuration, TimeInstant, TimeSource};
pub use types::{
    Bias, ButtonConfig, DEFAULT_MIN_HOLD_MILLIS, Edge, Level, PinLevel, Polarity, TriggerEdge,
};
