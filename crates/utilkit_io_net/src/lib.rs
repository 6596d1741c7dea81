//! `utilkit_io_net` v1:
//! TCP reachability helpers.
//!
//! - `ping` : connect-and-close reachability check

pub mod ping;

pub use ping::{N_SECS_PING_TIMEOUT_DEFAULT, PingError, ping, ping_addr};
