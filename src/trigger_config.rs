use crate::channel_config::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSlope {
    Positive,
    Negative,
    Either,
}

impl TriggerSlope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerSlope::Positive => "Positive",
            TriggerSlope::Negative => "Negative",
            TriggerSlope::Either => "Either",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    Single,
    Normal,
    Auto,
    Stopped,
}

impl TriggerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerMode::Single => "Single",
            TriggerMode::Normal => "Normal",
            TriggerMode::Auto => "Auto",
            TriggerMode::Stopped => "Stopped",
        }
    }
}

/// An edge trigger on `source`.
///
/// `horizontal` is the trigger's time position relative to the screen center, in
/// seconds; negative values move it to the left.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerSetup {
    pub source: Source,
    pub level: f64,
    pub horizontal: f64,
    pub slope: TriggerSlope,
    pub mode: TriggerMode,
}

impl TriggerSetup {
    pub fn new(
        source: impl Into<Source>,
        level: f64,
        horizontal: f64,
        slope: TriggerSlope,
        mode: TriggerMode,
    ) -> Self {
        Self {
            source: source.into(),
            level,
            horizontal,
            slope,
            mode,
        }
    }

    /// Rising edge at `level`, trigger centered, auto mode
    pub fn edge(source: impl Into<Source>, level: f64) -> Self {
        Self::new(source, level, 0.0, TriggerSlope::Positive, TriggerMode::Auto)
    }

    pub fn rising_edge(mut self) -> Self {
        self.slope = TriggerSlope::Positive;
        self
    }

    pub fn falling_edge(mut self) -> Self {
        self.slope = TriggerSlope::Negative;
        self
    }

    pub fn either_edge(mut self) -> Self {
        self.slope = TriggerSlope::Either;
        self
    }

    pub fn at(mut self, horizontal: f64) -> Self {
        self.horizontal = horizontal;
        self
    }

    pub fn mode(mut self, mode: TriggerMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str() {
        assert_eq!(TriggerSlope::Either.as_str(), "Either");
        assert_eq!(TriggerMode::Stopped.as_str(), "Stopped");
    }

    #[test]
    fn test_edge_builder() {
        let setup = TriggerSetup::edge("C4", 0.25)
            .falling_edge()
            .at(-0.6e-3)
            .mode(TriggerMode::Single);

        assert_eq!(setup.source, Source::Analog(4));
        assert_eq!(setup.level, 0.25);
        assert_eq!(setup.horizontal, -0.6e-3);
        assert_eq!(setup.slope, TriggerSlope::Negative);
        assert_eq!(setup.mode, TriggerMode::Single);
    }
}
