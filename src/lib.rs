//! # LeCroy RS
//!
//! A Rust library for configuring and reading out LeCroy oscilloscopes.
//!
//! Every operation is translated into the scope's remote-control vocabulary: short SCPI
//! commands (`*RST`, `TDIV`, the hardcopy setup) and `VBS` assignments/queries against
//! the automation object tree (`app.Acquisition.C1.VerScale`, `app.Measure.P1...`).
//! The commands travel over anything implementing [`Transport`]; a serial
//! implementation is included.
//!
//! ## Features
//!
//! - **Channel setup**: analog, digital and math channels from sparse maps, with every
//!   channel not listed switched off
//! - **Trigger and timebase**: edge trigger, horizontal scale/delay, memory depth
//! - **Measurements**: slot setup and typed readout of values and statistics
//! - **Signal centering**: move a trace to a given division from a live measurement
//! - **Screen capture**: PNG hardcopy saved to disk
//! - **Readback**: the current analog/digital/math/measurement setup as the same maps
//!
//! ## Examples
//!
//! ### Connecting and setting up channels
//!
//! ```rust,no_run
//! use lecroy_rs::{AnalogChannel, ChannelMap, DigitalChannel, LecroyConnector};
//!
//! let mut scope = LecroyConnector::connect("/dev/ttyUSB0")?;
//!
//! let analog = ChannelMap::from([
//!     (1, AnalogChannel::new("VBUS", 0.5, 0.0, "20MHz", "DC1M")),
//!     (2, AnalogChannel::new("IBUS", 0.5, 1.0, "Full", "DC")),
//! ]);
//! let digital = ChannelMap::from([(0, DigitalChannel::new("vbus_uv"))]);
//!
//! scope.channel_setup(&analog, &digital, &ChannelMap::new())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Trigger and measurement
//!
//! ```rust,no_run
//! use lecroy_rs::{ChannelMap, LecroyConnector, MeasurementSlot, Statistic, TriggerMode, TriggerSetup};
//!
//! let mut scope = LecroyConnector::connect("/dev/ttyUSB0")?;
//!
//! scope.trigger_setup(&TriggerSetup::edge("C1", 0.25).mode(TriggerMode::Single))?;
//! scope.measurement_setup(&ChannelMap::from([(1, MeasurementSlot::new("C1", "max"))]))?;
//!
//! let max = scope.get_value(1, Statistic::Value)?;
//! println!("C1 max: {:?}", max.as_f64());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod channel_config;
pub mod clock;
pub mod commands;
pub mod config;
pub mod connector;
pub mod display;
pub mod lecroy;
pub mod measurement;
pub mod transport;
pub mod trigger_config;

#[cfg(test)]
mod mock;

// Re-export the main types for convenience
pub use channel_config::{
    AnalogChannel, ChannelFamily, ChannelMap, DigitalChannel, MathFunction, MeasurementSlot,
    Source,
};

pub use clock::{Clock, SystemClock};

pub use config::LecroyConfig;

pub use connector::{ConnectorError, LecroyConnector};

pub use display::{BackColor, GridMode, MemoryMode, TraceColor};

pub use lecroy::{Lecroy, LecroyError};

pub use measurement::{MeasurementReading, Statistic};

pub use transport::{SerialTransport, Transport, TransportError};

pub use trigger_config::{TriggerMode, TriggerSetup, TriggerSlope};
