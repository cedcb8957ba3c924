use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Timelike};

use crate::channel_config::{
    AnalogChannel, ChannelFamily, ChannelMap, DigitalChannel, MathFunction, MeasurementSlot,
    Source,
};
use crate::clock::{Clock, SystemClock};
use crate::commands::{self, vbs_bool, vbs_call, vbs_query, vbs_set, vbs_set_str};
use crate::config::LecroyConfig;
use crate::display::{BackColor, GridMode, MemoryMode, TraceColor};
use crate::measurement::{MeasurementReading, Statistic};
use crate::transport::{Transport, TransportError};
use crate::trigger_config::TriggerSetup;

const TRIGGER: &str = "app.Acquisition.Trigger";
const HORIZONTAL: &str = "app.Acquisition.Horizontal";
const DISPLAY: &str = "app.Display";
const DATE_TIME: &str = "app.Utility.DateTimeSetup";

#[derive(Debug, thiserror::Error)]
pub enum LecroyError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reply '{reply}' to '{query}' is not a number")]
    Parse { query: String, reply: String },

    #[error("Reply '{reply}' to '{query}' is not a boolean")]
    InvalidBool { query: String, reply: String },

    #[error("Measurement P{slot} has no data")]
    NoData { slot: u8 },

    #[error("No analog channel is labelled '{name}'")]
    SignalNotFound { name: String },

    #[error("{family} index {index} out of range {min}..={max}")]
    IndexOutOfRange {
        family: ChannelFamily,
        index: u8,
        min: u8,
        max: u8,
    },
}

/// A LeCroy oscilloscope behind a [`Transport`].
///
/// Every method translates into VBS/SCPI commands and blocks on the transport. Nothing
/// is cached: getters query the instrument each time.
pub struct Lecroy<T: Transport> {
    transport: T,
    config: LecroyConfig,
    clock: Box<dyn Clock + Send>,
}

impl<T: Transport> Lecroy<T> {
    pub const UNIT_MS: f64 = 1e-3;
    pub const UNIT_US: f64 = 1e-6;

    /// Measurement used by `update_signal_offset` when the caller has no preference
    pub const DEFAULT_OFFSET_MEASUREMENT: &'static str = "mean";

    pub fn new(transport: T) -> Self {
        Self::with_config(transport, LecroyConfig::default())
    }

    pub fn with_config(transport: T, config: LecroyConfig) -> Self {
        Self {
            transport,
            config,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the wall clock used for date/time defaults and capture file names
    pub fn with_clock(mut self, clock: impl Clock + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &LecroyConfig {
        &self.config
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    fn send(&mut self, command: &str) -> Result<(), LecroyError> {
        log::debug!("-> {}", command);
        self.transport.write(command)?;
        Ok(())
    }

    fn ask(&mut self, command: &str) -> Result<String, LecroyError> {
        log::debug!("-> {}", command);
        let reply = self.transport.query(command)?;
        log::debug!("<- {}", reply);
        Ok(commands::strip_reply(&reply).to_string())
    }

    fn ask_vbs(&mut self, path: &str) -> Result<String, LecroyError> {
        self.ask(&vbs_query(path))
    }

    fn ask_bool(&mut self, path: &str) -> Result<bool, LecroyError> {
        let query = vbs_query(path);
        let reply = self.ask(&query)?;
        commands::parse_bool(&reply).ok_or(LecroyError::InvalidBool { query, reply })
    }

    fn ask_f64(&mut self, path: &str) -> Result<f64, LecroyError> {
        let query = vbs_query(path);
        let reply = self.ask(&query)?;
        reply
            .parse()
            .map_err(|_| LecroyError::Parse { query, reply })
    }

    fn family_range(&self, family: ChannelFamily) -> RangeInclusive<u8> {
        match family {
            ChannelFamily::Analog => 1..=self.config.analog_channels,
            other => other.range(),
        }
    }

    fn check_index(&self, family: ChannelFamily, index: u8) -> Result<(), LecroyError> {
        let range = self.family_range(family);
        if range.contains(&index) {
            Ok(())
        } else {
            Err(LecroyError::IndexOutOfRange {
                family,
                index,
                min: *range.start(),
                max: *range.end(),
            })
        }
    }

    fn check_indices<V>(
        &self,
        family: ChannelFamily,
        map: &ChannelMap<V>,
    ) -> Result<(), LecroyError> {
        map.keys()
            .try_for_each(|&index| self.check_index(family, index))
    }

    /// Query `*IDN?`
    pub fn identify(&mut self) -> Result<String, LecroyError> {
        self.ask(commands::IDENTIFY)
    }

    /// Capture the screen as PNG and save it.
    ///
    /// Without a path the file is `lecroy_<date>_<time>.png` in the configured capture
    /// directory. A path not ending in `.png` gets the suffix appended. Returns the number
    /// of bytes written.
    #[tracing::instrument(skip(self), err)]
    pub fn get_screen_image(
        &mut self,
        path: Option<&Path>,
        backcolor: BackColor,
    ) -> Result<usize, LecroyError> {
        self.send(&commands::screen_dump(backcolor.as_str()))?;
        let raw = self.transport.read_raw()?;
        log::debug!("<- {} bytes of screen image", raw.len());

        let path = match path {
            Some(path) => Self::with_png_suffix(path),
            None => self.config.capture_dir.join(format!(
                "lecroy_{}.png",
                self.clock.now().format("%Y-%m-%d_%H-%M-%S")
            )),
        };

        std::fs::write(&path, &raw)?;
        log::info!("Saved screen image to {}", path.display());
        Ok(raw.len())
    }

    fn with_png_suffix(path: &Path) -> PathBuf {
        if path.to_string_lossy().ends_with(".png") {
            path.to_path_buf()
        } else {
            let mut name = path.as_os_str().to_owned();
            name.push(".png");
            PathBuf::from(name)
        }
    }

    /// Configure an edge trigger.
    pub fn trigger_setup(&mut self, setup: &TriggerSetup) -> Result<(), LecroyError> {
        self.send(&vbs_set_str(&format!("{TRIGGER}.Type"), "Edge"))?;
        self.send(&vbs_set_str(&format!("{TRIGGER}.Source"), &setup.source))?;
        self.send(&vbs_set(&format!("{TRIGGER}.Edge.Level"), setup.level))?;
        self.send(&vbs_set(&format!("{HORIZONTAL}.HorOffset"), setup.horizontal))?;
        self.send(&vbs_set_str(
            &format!("{TRIGGER}.Edge.Slope"),
            setup.slope.as_str(),
        ))?;
        self.send(&vbs_set_str(
            "app.Acquisition.TriggerMode",
            setup.mode.as_str(),
        ))?;
        if setup.source.is_analog() {
            self.send(&vbs_set_str(&format!("{TRIGGER}.Coupling"), "AC"))?;
        }
        Ok(())
    }

    /// Force a trigger event (when the scope is in the ready state)
    pub fn trigger_force(&mut self) -> Result<(), LecroyError> {
        self.send(commands::FORCE_TRIGGER)
    }

    /// Set up analog, digital and math channels.
    ///
    /// Each family is first switched off over its whole index range, then the listed
    /// entries are enabled and configured. Channels missing from a map end up off.
    /// Out-of-range indices are rejected before anything is sent.
    #[tracing::instrument(skip_all, err)]
    pub fn channel_setup(
        &mut self,
        analog: &ChannelMap<AnalogChannel>,
        digital: &ChannelMap<DigitalChannel>,
        math: &ChannelMap<MathFunction>,
    ) -> Result<(), LecroyError> {
        self.check_indices(ChannelFamily::Analog, analog)?;
        self.check_indices(ChannelFamily::Digital, digital)?;
        self.check_indices(ChannelFamily::Math, math)?;

        self.setup_analog(analog)?;
        self.setup_digital(digital)?;
        self.setup_math(math)
    }

    fn setup_analog(&mut self, channels: &ChannelMap<AnalogChannel>) -> Result<(), LecroyError> {
        for index in self.family_range(ChannelFamily::Analog) {
            let ch = commands::analog_channel(index);
            self.send(&vbs_set(&format!("{ch}.View"), vbs_bool(false)))?;
        }

        for (&index, channel) in channels {
            let ch = commands::analog_channel(index);
            self.send(&vbs_set(&format!("{ch}.View"), vbs_bool(true)))?;
            self.send(&vbs_set(&format!("{ch}.ViewLabels"), vbs_bool(true)))?;
            self.send(&vbs_set_str(&format!("{ch}.LabelsText"), &channel.label))?;
            self.send(&vbs_set(&format!("{ch}.VerScale"), channel.ver_scale))?;
            self.send(&vbs_set(&format!("{ch}.VerOffset"), channel.ver_offset))?;
            self.send(&vbs_set_str(
                &format!("{ch}.BandwidthLimit"),
                &channel.bandwidth,
            ))?;
            self.send(&vbs_set_str(&format!("{ch}.Coupling"), &channel.coupling))?;
        }

        self.send(&vbs_set(&format!("{DISPLAY}.TraceIntensity"), 100))
    }

    fn setup_digital(&mut self, channels: &ChannelMap<DigitalChannel>) -> Result<(), LecroyError> {
        for index in ChannelFamily::Digital.range() {
            self.send(&vbs_set(&commands::digital_bit(index), "false"))?;
        }

        for (&index, channel) in channels {
            self.send(&vbs_set(&commands::digital_bit(index), "true"))?;
            self.send(&vbs_set_str(
                &commands::digital_bit_name(index),
                &channel.label,
            ))?;
        }

        let group = commands::DIGITAL_GROUP;
        self.send(&vbs_set(&format!("{group}.View"), "true"))?;
        self.send(&vbs_set(&format!("{group}.VerPosition"), "4.00"))?;
        self.send(&vbs_set(&format!("{group}.GroupHeight"), "1.00"))?;
        self.send(&vbs_set_str(&format!("{group}.Labels"), "CUSTOM"))
    }

    fn setup_math(&mut self, functions: &ChannelMap<MathFunction>) -> Result<(), LecroyError> {
        for index in ChannelFamily::Math.range() {
            let f = commands::math_function(index);
            self.send(&vbs_set(&format!("{f}.View"), vbs_bool(false)))?;
        }

        for (&index, function) in functions {
            let f = commands::math_function(index);
            self.send(&vbs_set(&format!("{f}.View"), vbs_bool(true)))?;
            self.send(&vbs_set_str(&format!("{f}.Operator1"), &function.operator))?;
            self.send(&vbs_set_str(&format!("{f}.Source1"), &function.source))?;
        }
        Ok(())
    }

    /// Switch off all measurement slots, then enable and configure the listed ones.
    pub fn measurement_setup(
        &mut self,
        slots: &ChannelMap<MeasurementSlot>,
    ) -> Result<(), LecroyError> {
        self.check_indices(ChannelFamily::Measurement, slots)?;

        for index in ChannelFamily::Measurement.range() {
            let p = commands::measurement(index);
            self.send(&vbs_set(&format!("{p}.View"), vbs_bool(false)))?;
        }

        for (&index, slot) in slots {
            self.configure_measurement(index, true, &slot.source, &slot.measurement)?;
        }
        Ok(())
    }

    fn configure_measurement(
        &mut self,
        slot: u8,
        view: bool,
        source: &dyn std::fmt::Display,
        measurement: &str,
    ) -> Result<(), LecroyError> {
        let p = commands::measurement(slot);
        self.send(&vbs_set(&format!("{p}.View"), vbs_bool(view)))?;
        self.send(&vbs_set_str(&format!("{p}.Source1"), source))?;
        self.send(&vbs_set_str(&format!("{p}.ParamEngine"), measurement))
    }

    /// Time position (seconds from trigger) at which a `level@x` slot samples.
    pub fn measurement_level_at_x(&mut self, slot: u8, position: f64) -> Result<(), LecroyError> {
        self.check_index(ChannelFamily::Measurement, slot)?;
        let p = commands::measurement(slot);
        self.send(&vbs_set(&format!("{p}.operator.horvalue"), position))
    }

    /// Read back every enabled analog channel.
    pub fn get_analog_channel_setup(&mut self) -> Result<ChannelMap<AnalogChannel>, LecroyError> {
        let mut channels = ChannelMap::new();
        for index in self.family_range(ChannelFamily::Analog) {
            let ch = commands::analog_channel(index);
            if !self.ask_bool(&format!("{ch}.View"))? {
                continue;
            }
            let channel = AnalogChannel {
                label: self.ask_vbs(&format!("{ch}.LabelsText"))?,
                ver_scale: self.ask_f64(&format!("{ch}.VerScale"))?,
                ver_offset: self.ask_f64(&format!("{ch}.VerOffset"))?,
                bandwidth: self.ask_vbs(&format!("{ch}.BandwidthLimit"))?,
                coupling: self.ask_vbs(&format!("{ch}.Coupling"))?,
            };
            channels.insert(index, channel);
        }
        Ok(channels)
    }

    pub fn get_digital_channel_setup(
        &mut self,
    ) -> Result<ChannelMap<DigitalChannel>, LecroyError> {
        let mut channels = ChannelMap::new();
        for index in ChannelFamily::Digital.range() {
            if !self.ask_bool(&commands::digital_bit(index))? {
                continue;
            }
            let label = self.ask_vbs(&commands::digital_bit_name(index))?;
            channels.insert(index, DigitalChannel { label });
        }
        Ok(channels)
    }

    pub fn get_math_setup(&mut self) -> Result<ChannelMap<MathFunction>, LecroyError> {
        let mut functions = ChannelMap::new();
        for index in ChannelFamily::Math.range() {
            let f = commands::math_function(index);
            if !self.ask_bool(&format!("{f}.View"))? {
                continue;
            }
            let operator = self.ask_vbs(&format!("{f}.Operator1"))?;
            let source = Source::from(self.ask_vbs(&format!("{f}.Source1"))?.as_str());
            functions.insert(index, MathFunction { operator, source });
        }
        Ok(functions)
    }

    pub fn get_measurement_setup(&mut self) -> Result<ChannelMap<MeasurementSlot>, LecroyError> {
        let mut slots = ChannelMap::new();
        for index in ChannelFamily::Measurement.range() {
            let p = commands::measurement(index);
            if !self.ask_bool(&format!("{p}.View"))? {
                continue;
            }
            let source = Source::from(self.ask_vbs(&format!("{p}.Source1"))?.as_str());
            let measurement = self.ask_vbs(&format!("{p}.ParamEngine"))?;
            slots.insert(index, MeasurementSlot { source, measurement });
        }
        Ok(slots)
    }

    /// Read one statistic of measurement slot `P<slot>`.
    pub fn get_value(
        &mut self,
        slot: u8,
        statistic: Statistic,
    ) -> Result<MeasurementReading, LecroyError> {
        self.check_index(ChannelFamily::Measurement, slot)?;
        let query = vbs_query(&format!(
            "{}.{}",
            commands::measurement(slot),
            statistic.property()
        ));
        let reply = self.ask(&query)?;
        MeasurementReading::from_reply(statistic, &reply)
            .map_err(|_| LecroyError::Parse { query, reply })
    }

    /// Move the trace labelled `signal` so it sits `division_offset` divisions above center.
    ///
    /// The configured scratch slot is borrowed to measure the signal and put back the way
    /// it was afterwards, also when the measurement fails. Returns the offset written.
    #[tracing::instrument(skip(self, channels), err)]
    pub fn update_signal_offset(
        &mut self,
        channels: &ChannelMap<AnalogChannel>,
        signal: &str,
        division_offset: f64,
        measurement: &str,
    ) -> Result<f64, LecroyError> {
        let (&index, channel) = channels
            .iter()
            .find(|(_, channel)| channel.label == signal)
            .ok_or_else(|| LecroyError::SignalNotFound {
                name: signal.to_string(),
            })?;
        self.check_index(ChannelFamily::Analog, index)?;

        let slot = self.config.scratch_slot;
        let p = commands::measurement(slot);
        let saved_view = self.ask_bool(&format!("{p}.View"))?;
        let saved_source = self.ask_vbs(&format!("{p}.Source1"))?;
        let saved_measurement = self.ask_vbs(&format!("{p}.ParamEngine"))?;

        let offset = self.measure_offset(
            slot,
            index,
            channel.ver_scale,
            division_offset,
            measurement,
        );

        let restored = self
            .send(&vbs_set_str(&format!("{p}.Source1"), &saved_source))
            .and_then(|()| {
                self.send(&vbs_set_str(
                    &format!("{p}.ParamEngine"),
                    &saved_measurement,
                ))
            })
            .and_then(|()| self.send(&vbs_set(&format!("{p}.View"), vbs_bool(saved_view))));

        let offset = offset?;
        restored?;
        Ok(offset)
    }

    fn measure_offset(
        &mut self,
        slot: u8,
        index: u8,
        ver_scale: f64,
        division_offset: f64,
        measurement: &str,
    ) -> Result<f64, LecroyError> {
        self.configure_measurement(slot, true, &Source::Analog(index), measurement)?;

        let measured = match self.get_value(slot, Statistic::Value)? {
            MeasurementReading::Number(value) => value,
            MeasurementReading::NoData(_) | MeasurementReading::Status(_) => {
                return Err(LecroyError::NoData { slot })
            }
        };

        let offset = division_offset * ver_scale - measured;
        log::debug!(
            "C{} measured {} ({}), new offset {}",
            index,
            measured,
            measurement,
            offset
        );
        let ch = commands::analog_channel(index);
        self.send(&vbs_set(&format!("{ch}.VerOffset"), offset))?;
        Ok(offset)
    }

    /// Time per division, in seconds
    pub fn horizontal_scale(&mut self, scale: f64) -> Result<(), LecroyError> {
        self.send(&format!("TDIV {}", commands::format_exp(scale)))
    }

    pub fn set_memory_mode(&mut self, mode: MemoryMode) -> Result<(), LecroyError> {
        self.send(&vbs_set_str(&format!("{HORIZONTAL}.Maximize"), mode.as_str()))
    }

    pub fn set_memory_size(&mut self, samples: u64) -> Result<(), LecroyError> {
        self.send(&vbs_set(&format!("{HORIZONTAL}.MaxSamples"), samples))
    }

    /// Set the scope's clock. Fields left as `None` are taken from the host clock.
    pub fn set_date_and_time(
        &mut self,
        year: Option<i32>,
        month: Option<u32>,
        day: Option<u32>,
        hour: Option<u32>,
        minute: Option<u32>,
        second: Option<u32>,
    ) -> Result<(), LecroyError> {
        let now = self.clock.now();
        let fields = [
            ("Year", i64::from(year.unwrap_or_else(|| now.year()))),
            ("Month", i64::from(month.unwrap_or_else(|| now.month()))),
            ("Day", i64::from(day.unwrap_or_else(|| now.day()))),
            ("Hour", i64::from(hour.unwrap_or_else(|| now.hour()))),
            ("Minute", i64::from(minute.unwrap_or_else(|| now.minute()))),
            ("Second", i64::from(second.unwrap_or_else(|| now.second()))),
        ];

        for (field, value) in fields {
            self.send(&vbs_set(&format!("{DATE_TIME}.{field}"), value))?;
        }
        self.send(&vbs_call(&format!("{DATE_TIME}.Validate")))
    }

    pub fn set_grid(&mut self, mode: GridMode) -> Result<(), LecroyError> {
        self.send(&vbs_set_str(&format!("{DISPLAY}.GridMode"), mode.as_str()))
    }

    /// Trigger delay in seconds, negative moves the trigger point left
    pub fn set_horizontal_delay(&mut self, delay: f64) -> Result<(), LecroyError> {
        self.send(&vbs_set(&format!("{HORIZONTAL}.HorOffset"), delay))
    }

    pub fn reset(&mut self) -> Result<(), LecroyError> {
        self.send(commands::RESET)
    }

    /// Persistence saturation in percent, passed through as given
    pub fn set_intensity(&mut self, percent: u8) -> Result<(), LecroyError> {
        self.send(&vbs_set(
            &format!("{DISPLAY}.PersistenceSaturation"),
            percent,
        ))
    }

    pub fn set_channel_colors(
        &mut self,
        colors: &ChannelMap<TraceColor>,
    ) -> Result<(), LecroyError> {
        self.check_indices(ChannelFamily::Analog, colors)?;
        for (&index, color) in colors {
            self.send(&vbs_set(
                &format!("{DISPLAY}.C{index}Color"),
                color.to_vbs_value(),
            ))?;
        }
        Ok(())
    }
}
