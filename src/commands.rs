//! Command-string builders for the scope's two vocabularies.
//!
//! Short SCPI forms (`*RST`, `TDIV 1.000000e-03`) go out verbatim. Everything else
//! addresses the automation object tree through `VBS`:
//!
//! - `VBS app.Acquisition.C1.VerScale=0.5` sets a property,
//! - `VBS? return = app.Acquisition.C1.VerScale` reads it back.

use std::fmt::Display;

pub const RESET: &str = "*RST";
pub const IDENTIFY: &str = "*IDN?";
pub const FORCE_TRIGGER: &str = "FORCE_TRIGGER";
pub const HEADERS_OFF: &str = "CHDR OFF";

const VBS_QUERY_PREFIX: &str = "VBS? return = ";

/// `VBS <path>=<value>`
pub fn vbs_set(path: &str, value: impl Display) -> String {
    format!("VBS {path}={value}")
}

/// `VBS <path>="<value>"`
pub fn vbs_set_str(path: &str, value: impl Display) -> String {
    format!("VBS {path}=\"{value}\"")
}

/// `VBS <path>`, for methods such as `Validate`
pub fn vbs_call(path: &str) -> String {
    format!("VBS {path}")
}

pub fn vbs_query(path: &str) -> String {
    format!("{VBS_QUERY_PREFIX}{path}")
}

/// `True`/`False` as the acquisition and measurement objects expect them.
pub fn vbs_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

pub fn analog_channel(index: u8) -> String {
    format!("app.Acquisition.C{index}")
}

pub fn math_function(index: u8) -> String {
    format!("app.Math.F{index}")
}

pub fn measurement(slot: u8) -> String {
    format!("app.Measure.P{slot}")
}

pub const DIGITAL_GROUP: &str = "app.LogicAnalyzer.Digital1";

pub fn digital_bit(index: u8) -> String {
    format!("{DIGITAL_GROUP}.Digital{index}.Value")
}

pub fn digital_bit_name(index: u8) -> String {
    format!("{DIGITAL_GROUP}.CustomBitName{index}.Value")
}

/// Hardcopy setup followed by `SCDP`, which makes the scope send a PNG of its screen.
pub fn screen_dump(background: &str) -> String {
    format!("{HEADERS_OFF};HCSU BCKG,{background};HCSU DEV,PNG;HCSU PORT,GPIB;SCDP")
}

/// Normalise a reply: trim it and drop the `VBS` echo some firmware puts in front.
///
/// The echo is a separate token, so text that merely starts with `VBS` (a label such
/// as `VBSENSE`) is left alone.
pub fn strip_reply(reply: &str) -> &str {
    let reply = reply.trim();
    match reply.strip_prefix("VBS") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            rest.trim_start()
        }
        _ => reply,
    }
}

/// The one predicate used for every boolean property the scope reports.
///
/// VBScript booleans come back as `-1`/`0`; some objects answer `true`/`false` or
/// `on`/`off`. Anything else is `None`.
pub fn parse_bool(reply: &str) -> Option<bool> {
    match strip_reply(reply).to_ascii_lowercase().as_str() {
        "-1" | "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Format like C's `%e`: six fractional digits, signed exponent of at least two digits.
pub fn format_exp(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{value:.6e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            Err(_) => formatted,
        },
        None => formatted,
    }
}
