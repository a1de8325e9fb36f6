use std::fmt;
use std::path::PathBuf;

use crate::error::{Result, TransportError};

/// Baud rate the RSP-1570/1572 RS-232 port runs at.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

const SOCKET_SCHEME: &str = "socket://";

/// Where the processor is reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A serial device such as `/dev/ttyUSB0`.
    Serial(PathBuf),
    /// A TCP bridge, written `socket://host:port`.
    Tcp { host: String, port: u16 },
}

impl Endpoint {
    /// Parse an endpoint string.
    ///
    /// `socket://host:port` selects TCP; anything else is taken as a serial device path.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(invalid(input, "endpoint must not be empty"));
        }

        let Some(rest) = input.strip_prefix(SOCKET_SCHEME) else {
            return Ok(Self::Serial(PathBuf::from(input)));
        };

        let (host, port) = rest
            .rsplit_once(':')
            .ok_or_else(|| invalid(input, "expected socket://host:port"))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(invalid(input, "host must not be empty"));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| invalid(input, "port must be a number between 0 and 65535"))?;

        Ok(Self::Tcp {
            host: host.to_string(),
            port,
        })
    }

    /// Whether this endpoint is a TCP bridge.
    pub fn is_tcp(&self) -> bool {
        matches!(self, Self::Tcp { .. })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial(path) => write!(f, "{}", path.display()),
            Self::Tcp { host, port } if host.contains(':') => {
                write!(f, "{SOCKET_SCHEME}[{host}]:{port}")
            }
            Self::Tcp { host, port } => write!(f, "{SOCKET_SCHEME}{host}:{port}"),
        }
    }
}

impl std::str::FromStr for Endpoint {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Options for opening a transport.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub endpoint: Endpoint,
    /// Line speed for serial devices. Ignored for TCP.
    pub baud_rate: u32,
}

impl ConnectOptions {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

/// The serial port a processor is most likely attached to on this platform.
///
/// Returns `None` where there is no sensible guess.
pub fn default_serial_port() -> Option<&'static str> {
    serial_port_for_os(std::env::consts::OS)
}

fn serial_port_for_os(os: &str) -> Option<&'static str> {
    match os {
        "windows" => Some("COM3"),
        "linux" => Some("/dev/ttyUSB0"),
        _ => None,
    }
}

fn invalid(endpoint: &str, reason: &str) -> TransportError {
    TransportError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_socket_endpoint() {
        let endpoint = Endpoint::parse("socket://192.168.1.20:50001").unwrap();
        assert_eq!(
            endpoint,
            Endpoint::Tcp {
                host: "192.168.1.20".to_string(),
                port: 50001
            }
        );
        assert!(endpoint.is_tcp());
        assert_eq!(endpoint.to_string(), "socket://192.168.1.20:50001");
    }

    #[test]
    fn parses_bracketed_ipv6_endpoint() {
        let endpoint = Endpoint::parse("socket://[::1]:50001").unwrap();
        assert_eq!(
            endpoint,
            Endpoint::Tcp {
                host: "::1".to_string(),
                port: 50001
            }
        );
        assert_eq!(endpoint.to_string(), "socket://[::1]:50001");
    }

    #[test]
    fn parses_serial_path() {
        let endpoint: Endpoint = "/dev/ttyUSB0".parse().unwrap();
        assert_eq!(endpoint, Endpoint::Serial(PathBuf::from("/dev/ttyUSB0")));
        assert!(!endpoint.is_tcp());
    }

    #[test]
    fn rejects_bad_endpoints() {
        assert!(matches!(
            Endpoint::parse(""),
            Err(TransportError::InvalidEndpoint { .. })
        ));
        assert!(Endpoint::parse("socket://localhost").is_err());
        assert!(Endpoint::parse("socket://:50001").is_err());
        assert!(Endpoint::parse("socket://localhost:port").is_err());
        assert!(Endpoint::parse("socket://localhost:70000").is_err());
    }

    #[test]
    fn platform_serial_port_guess() {
        assert_eq!(serial_port_for_os("linux"), Some("/dev/ttyUSB0"));
        assert_eq!(serial_port_for_os("windows"), Some("COM3"));
        assert_eq!(serial_port_for_os("haiku"), None);
    }

    #[test]
    fn connect_options_default_to_device_baud_rate() {
        let options = ConnectOptions::new(Endpoint::Serial(PathBuf::from("/dev/ttyS0")));
        assert_eq!(options.baud_rate, 115_200);
    }
}
