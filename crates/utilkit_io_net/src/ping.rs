//! TCP connect-and-close reachability check.

use std::fmt;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Default connection timeout in seconds.
pub const N_SECS_PING_TIMEOUT_DEFAULT: u64 = 5;

/// Failed reachability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingError {
    /// OS-level error code; zero when none applies (e.g. resolution failure).
    pub code: i32,
    /// Human-readable failure description.
    pub message: String,
}

impl PingError {
    fn from_io(error: &io::Error) -> Self {
        Self {
            code: error.raw_os_error().unwrap_or(0),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for PingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PingError {}

/// Check whether `host:port` accepts a TCP connection within `timeout`.
///
/// The connection is closed as soon as it is established; no payload is
/// exchanged. A reachable-but-refusing host, a resolution failure and a
/// timeout all surface as [`PingError`].
pub fn ping(host: &str, port: u16, timeout: Duration) -> Result<(), PingError> {
    let mut iter_addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| PingError::from_io(&e))?;
    let Some(addr) = iter_addrs.next() else {
        return Err(PingError {
            code: 0,
            message: format!("No address found for host: {host}"),
        });
    };
    ping_addr(addr, timeout)
}

/// Check whether `addr` accepts a TCP connection within `timeout`.
pub fn ping_addr(addr: SocketAddr, timeout: Duration) -> Result<(), PingError> {
    match TcpStream::connect_timeout(&addr, timeout) {
        Ok(stream) => {
            drop(stream);
            Ok(())
        }
        Err(e) => Err(PingError::from_io(&e)),
    }
}
