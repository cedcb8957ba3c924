use std::num::ParseFloatError;

/// Substring the scope puts in a reply when a parameter has nothing to report.
pub const NO_DATA_SENTINEL: &str = "No Data";

/// Which figure of a measurement slot to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    /// Result of the last acquisition
    Value,
    Mean,
    Max,
    Min,
    /// Number of measurements accumulated
    Num,
    /// Standard deviation
    Sdev,
    /// Whether the last measurement was valid, as text
    Status,
}

impl Statistic {
    pub const ALL: [Statistic; 7] = [
        Statistic::Value,
        Statistic::Mean,
        Statistic::Max,
        Statistic::Min,
        Statistic::Num,
        Statistic::Sdev,
        Statistic::Status,
    ];

    /// Property path below `app.Measure.P<n>`
    pub fn property(&self) -> &'static str {
        match self {
            Statistic::Value => "Out.Result.Value",
            Statistic::Mean => "Statistics(\"mean\").Result.Value",
            Statistic::Max => "Statistics(\"max\").Result.Value",
            Statistic::Min => "Statistics(\"min\").Result.Value",
            Statistic::Num => "Statistics(\"num\").Result.Value",
            Statistic::Sdev => "Statistics(\"sdev\").Result.Value",
            Statistic::Status => "Statistics(\"last\").Result.StatusDescription",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementReading {
    Number(f64),
    Status(String),
    NoData(String),
}

impl MeasurementReading {
    /// Interpret an already normalised reply for `statistic`
    pub fn from_reply(statistic: Statistic, reply: &str) -> Result<Self, ParseFloatError> {
        if statistic == Statistic::Status {
            return Ok(MeasurementReading::Status(reply.to_string()));
        }
        if reply.contains(NO_DATA_SENTINEL) {
            return Ok(MeasurementReading::NoData(reply.to_string()));
        }
        reply.parse().map(MeasurementReading::Number)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MeasurementReading::Number(value) => Some(*value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_paths() {
        assert_eq!(Statistic::Value.property(), "Out.Result.Value");
        assert_eq!(
            Statistic::Sdev.property(),
            "Statistics(\"sdev\").Result.Value"
        );
        assert_eq!(
            Statistic::Status.property(),
            "Statistics(\"last\").Result.StatusDescription"
        );
    }

    #[test]
    fn test_numeric_reply() {
        let reading = MeasurementReading::from_reply(Statistic::Max, "1.25E-3").unwrap();
        assert_eq!(reading.as_f64(), Some(1.25e-3));
    }

    #[test]
    fn test_status_is_never_parsed() {
        let reading = MeasurementReading::from_reply(Statistic::Status, "0.5").unwrap();
        assert_eq!(reading, MeasurementReading::Status("0.5".to_string()));
        assert_eq!(reading.as_f64(), None);
    }

    #[test]
    fn test_no_data_sentinel() {
        let reading = MeasurementReading::from_reply(Statistic::Mean, "No Data Available").unwrap();
        assert_eq!(
            reading,
            MeasurementReading::NoData("No Data Available".to_string())
        );
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(MeasurementReading::from_reply(Statistic::Value, "n/a").is_err());
    }
}
