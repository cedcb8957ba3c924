/// Background of a screen capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackColor {
    #[default]
    White,
    Black,
}

impl BackColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackColor::White => "WHITE",
            BackColor::Black => "BLACK",
        }
    }
}

/// Number and arrangement of grids on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridMode {
    #[default]
    Single,
    Dual,
    Quad,
    Octal,
    Tandem,
    Quattro,
    Auto,
}

impl GridMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridMode::Single => "Single",
            GridMode::Dual => "Dual",
            GridMode::Quad => "Quad",
            GridMode::Octal => "Octal",
            GridMode::Tandem => "Tandem",
            GridMode::Quattro => "Quattro",
            GridMode::Auto => "Auto",
        }
    }
}

/// How the timebase trades memory depth against sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMode {
    SetMaximumMemory,
    FixedSampleRate,
}

impl MemoryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryMode::SetMaximumMemory => "SetMaximumMemory",
            MemoryMode::FixedSampleRate => "FixedSampleRate",
        }
    }
}

/// An RGB trace color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl TraceColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The value the display object takes: a VBScript color, i.e. `0x00BBGGRR`.
    pub fn to_vbs_value(self) -> u32 {
        u32::from(self.r) | (u32::from(self.g) << 8) | (u32::from(self.b) << 16)
    }
}
