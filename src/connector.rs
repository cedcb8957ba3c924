use crate::commands;
use crate::config::LecroyConfig;
use crate::lecroy::{Lecroy, LecroyError};
use crate::transport::{SerialTransport, Transport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Scope error: {0}")]
    Scope(#[from] LecroyError),

    #[error("Instrument identifies as '{idn}', which is not a LeCroy oscilloscope")]
    NotALecroy { idn: String },
}

pub struct LecroyConnector;

impl LecroyConnector {
    /// Connect to a scope on a serial port with default settings
    pub fn connect(port: &str) -> Result<Lecroy<SerialTransport>, ConnectorError> {
        Self::connect_with(port, LecroyConfig::default())
    }

    pub fn connect_with(
        port: &str,
        config: LecroyConfig,
    ) -> Result<Lecroy<SerialTransport>, ConnectorError> {
        log::debug!("Connecting to LeCroy scope on port {}", port);
        let transport = SerialTransport::open(port)?;
        Self::attach(transport, config)
    }

    /// Wrap an already open transport, after checking what answers on it.
    ///
    /// Response headers are switched off first so replies carry only their value.
    pub fn attach<T: Transport>(
        transport: T,
        config: LecroyConfig,
    ) -> Result<Lecroy<T>, ConnectorError> {
        let mut transport = transport;
        log::debug!("Turning off response headers");
        transport.write(commands::HEADERS_OFF)?;

        let mut scope = Lecroy::with_config(transport, config);
        let idn = scope.identify()?;
        Self::validate_idn(&idn)?;

        log::info!("Connected to {}", idn);
        Ok(scope)
    }

    fn validate_idn(idn: &str) -> Result<(), ConnectorError> {
        let manufacturer = idn
            .trim_start_matches("*IDN")
            .trim()
            .split(',')
            .next()
            .unwrap_or_default();

        if manufacturer.to_ascii_uppercase().contains("LECROY") {
            Ok(())
        } else {
            Err(ConnectorError::NotALecroy {
                idn: idn.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::FakeScope;

    #[test]
    fn test_validate_idn() {
        assert!(LecroyConnector::validate_idn("LECROY,WR8208HD,LCRY0001,9.6.0").is_ok());
        assert!(LecroyConnector::validate_idn("*IDN LECROY,HDO6104,X,1").is_ok());
        assert!(LecroyConnector::validate_idn("Teledyne LeCroy,MDA810,X,1").is_ok());
        assert!(matches!(
            LecroyConnector::validate_idn("KEYSIGHT,DSOX3034T,X,1,LECROY-compatible"),
            Err(ConnectorError::NotALecroy { .. })
        ));
    }

    #[test]
    fn test_attach_turns_off_headers_and_identifies() {
        let fake = FakeScope::new().with_reply("*IDN?", "LECROY,WAVERUNNER,LCRY1234,9.5.0");
        let scope = LecroyConnector::attach(fake, LecroyConfig::default()).unwrap();

        let fake = scope.into_inner();
        assert_eq!(fake.commands, vec!["CHDR OFF"]);
        assert_eq!(fake.queries, vec!["*IDN?"]);
    }

    #[test]
    fn test_attach_rejects_other_instruments() {
        let fake = FakeScope::new().with_reply("*IDN?", "RIGOL TECHNOLOGIES,DS1054Z,X,1");
        let result = LecroyConnector::attach(fake, LecroyConfig::default());

        assert!(
            matches!(result, Err(ConnectorError::NotALecroy { idn }) if idn.starts_with("RIGOL"))
        );
    }
}
