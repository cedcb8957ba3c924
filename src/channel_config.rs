use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Sparse per-index configuration, iterated in ascending index order.
pub type ChannelMap<T> = BTreeMap<u8, T>;

/// A signal source as the scope names it: `C1`, `D3`, `F2`, `P7`, ...
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    Analog(u8),
    Digital(u8),
    Math(u8),
    Measurement(u8),
    /// Anything else the instrument accepts verbatim (`Ext`, `Line`, `Z1`, ...)
    Other(String),
}

impl Source {
    /// Whether the scope treats this as an analog input, i.e. its name starts with `C`
    pub fn is_analog(&self) -> bool {
        match self {
            Source::Analog(_) => true,
            Source::Other(name) => name.starts_with('C'),
            _ => false,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Analog(n) => write!(f, "C{n}"),
            Source::Digital(n) => write!(f, "D{n}"),
            Source::Math(n) => write!(f, "F{n}"),
            Source::Measurement(n) => write!(f, "P{n}"),
            Source::Other(name) => f.write_str(name),
        }
    }
}

impl FromStr for Source {
    type Err = Infallible;

    /// Names are only typed when they render back identically; `C01` or `c4` stay
    /// [`Source::Other`] so the scope receives exactly what was given.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let prefix = chars.next();
        let index = chars.as_str().parse::<u8>().ok();

        let typed = match (prefix, index) {
            (Some('C'), Some(n)) => Some(Source::Analog(n)),
            (Some('D'), Some(n)) => Some(Source::Digital(n)),
            (Some('F'), Some(n)) => Some(Source::Math(n)),
            (Some('P'), Some(n)) => Some(Source::Measurement(n)),
            _ => None,
        };

        Ok(match typed {
            Some(source) if source.to_string() == s => source,
            _ => Source::Other(s.to_string()),
        })
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(source) => source,
            Err(never) => match never {},
        }
    }
}

/// The independently indexed channel families of the scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelFamily {
    Analog,
    Digital,
    Math,
    Measurement,
}

impl ChannelFamily {
    pub const MAX_ANALOG: u8 = 8;

    /// Full index range of the family on an eight-channel scope
    pub const fn range(self) -> RangeInclusive<u8> {
        match self {
            ChannelFamily::Analog => 1..=Self::MAX_ANALOG,
            ChannelFamily::Digital => 0..=15,
            ChannelFamily::Math => 1..=12,
            ChannelFamily::Measurement => 1..=12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelFamily::Analog => "analog",
            ChannelFamily::Digital => "digital",
            ChannelFamily::Math => "math",
            ChannelFamily::Measurement => "measurement",
        }
    }
}

impl fmt::Display for ChannelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Setup of one analog input.
///
/// `ver_offset` is a voltage (center line is 0 V), not a number of divisions.
/// `bandwidth` takes the scope's names (`20MHz`, `200MHz`, `Full`) and `coupling`
/// likewise (`DC50`, `DC1M`, `AC1M`, `Gnd`, or `DC` for current probes).
#[derive(Debug, Clone, PartialEq)]
pub struct AnalogChannel {
    pub label: String,
    pub ver_scale: f64,
    pub ver_offset: f64,
    pub bandwidth: String,
    pub coupling: String,
}

impl AnalogChannel {
    pub fn new(
        label: impl Into<String>,
        ver_scale: f64,
        ver_offset: f64,
        bandwidth: impl Into<String>,
        coupling: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            ver_scale,
            ver_offset,
            bandwidth: bandwidth.into(),
            coupling: coupling.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitalChannel {
    pub label: String,
}

impl DigitalChannel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// A math trace `F<n>` applying `operator` to `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathFunction {
    pub operator: String,
    pub source: Source,
}

impl MathFunction {
    pub fn new(operator: impl Into<String>, source: impl Into<Source>) -> Self {
        Self {
            operator: operator.into(),
            source: source.into(),
        }
    }
}

/// A parameter slot `P<n>` measuring `measurement` (`pkpk`, `max`, `level@x`, ...) on `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementSlot {
    pub source: Source,
    pub measurement: String,
}

impl MeasurementSlot {
    pub fn new(source: impl Into<Source>, measurement: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            measurement: measurement.into(),
        }
    }
}
