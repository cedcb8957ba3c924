use serialport::SerialPort;
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

/// The three primitives the scope driver needs from a connection.
///
/// Any VISA-style link (serial, USBTMC, VICP, GPIB) can be plugged in by implementing
/// `write` and `read_raw`. `query` defaults to a write followed by a raw read decoded
/// as UTF-8.
pub trait Transport {
    /// Send one command. The implementation appends its own terminator.
    fn write(&mut self, command: &str) -> Result<(), TransportError>;

    /// Read whatever the instrument sends next, byte for byte.
    fn read_raw(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Send a command and return the textual reply, trimmed.
    fn query(&mut self, command: &str) -> Result<String, TransportError> {
        self.write(command)?;
        let raw = self.read_raw()?;
        Ok(String::from_utf8(raw)?.trim().to_string())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, command: &str) -> Result<(), TransportError> {
        (**self).write(command)
    }

    fn read_raw(&mut self) -> Result<Vec<u8>, TransportError> {
        (**self).read_raw()
    }

    fn query(&mut self, command: &str) -> Result<String, TransportError> {
        (**self).query(command)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "Timeout error: Expected terminator '{expected}' but got '{actual}'. Likely due to a timeout."
    )]
    Timeout { expected: String, actual: String },

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// A line-terminated serial link to the scope's remote-control port.
#[derive(Debug)]
pub struct SerialTransport {
    serial: Box<dyn SerialPort>,
    terminator: u8,
    timeout: Duration,
}

impl SerialTransport {
    pub const DEFAULT_BAUD_RATE: u32 = 9600;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

    // Silence after the last byte that ends a raw (binary) transfer.
    const RAW_IDLE_GAP: Duration = Duration::from_millis(200);

    /// Open `port` with the default baud rate and timeout
    pub fn open(port: &str) -> Result<Self, TransportError> {
        Self::new(port, Self::DEFAULT_BAUD_RATE, Self::DEFAULT_TIMEOUT)
    }

    /// Open `port` with an explicit baud rate and reply timeout
    pub fn new(port: &str, baud_rate: u32, timeout: Duration) -> Result<Self, TransportError> {
        let serial = serialport::new(port, baud_rate)
            .timeout(Duration::from_millis(10))
            .open()?;

        let mut transport = Self {
            serial,
            terminator: b'\n',
            timeout,
        };

        transport.flush()?;
        Ok(transport)
    }

    pub fn with_terminator(mut self, terminator: u8) -> Self {
        self.terminator = terminator;
        self
    }

    /// Flush the serial buffer
    fn flush(&mut self) -> Result<(), TransportError> {
        self.serial.clear(serialport::ClearBuffer::All)?;
        Ok(())
    }

    fn timeout_error(&self, response: &[u8]) -> TransportError {
        let actual_ending = if response.len() >= 2 {
            String::from_utf8_lossy(&response[response.len() - 2..]).to_string()
        } else {
            String::from_utf8_lossy(response).to_string()
        };

        TransportError::Timeout {
            expected: (self.terminator as char).escape_default().to_string(),
            actual: actual_ending,
        }
    }

    /// Read a single reply up to and excluding the terminator
    fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut response = Vec::new();
        let start = Instant::now();

        loop {
            let mut byte = [0u8; 1];
            match self.serial.read_exact(&mut byte) {
                Ok(()) => {
                    if byte[0] == self.terminator {
                        break;
                    }
                    response.push(byte[0]);
                }
                Err(e) if e.kind() == ErrorKind::TimedOut => {
                    if start.elapsed() >= self.timeout {
                        return Err(self.timeout_error(&response));
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(response)
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, command: &str) -> Result<(), TransportError> {
        let mut line = Vec::with_capacity(command.len() + 1);
        line.extend_from_slice(command.as_bytes());
        line.push(self.terminator);
        self.serial.write_all(&line)?;
        Ok(())
    }

    /// Binary payloads may contain the terminator, so a raw read ends on line silence
    fn read_raw(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut payload = Vec::new();
        let mut chunk = [0u8; 4096];
        let start = Instant::now();
        let mut last_byte = start;

        loop {
            match self.serial.read(&mut chunk) {
                Ok(0) => {}
                Ok(n) => {
                    payload.extend_from_slice(&chunk[..n]);
                    last_byte = Instant::now();
                }
                Err(e) if e.kind() == ErrorKind::TimedOut => {}
                Err(e) => return Err(e.into()),
            }

            if payload.is_empty() {
                if start.elapsed() >= self.timeout {
                    return Err(self.timeout_error(&payload));
                }
            } else if last_byte.elapsed() >= Self::RAW_IDLE_GAP {
                break;
            }
        }

        log::trace!("Read {} raw bytes", payload.len());
        Ok(payload)
    }

    fn query(&mut self, command: &str) -> Result<String, TransportError> {
        self.write(command)?;
        let reply = self.read_line()?;
        Ok(String::from_utf8(reply)?.trim().to_string())
    }
}
