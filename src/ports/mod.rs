//! Port traits isolating the domain from I/O.

pub mod config_port;
pub mod data_port;
pub mod report_port;
