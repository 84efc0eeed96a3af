//! Records and log grammar of the MPMC queue benchmark harness.
//!
//! The harness writes free-text logs; this crate only reads them. Use
//! [`result::parse_output`] for a whole file or [`grammar::LogParser`] to feed
//! lines one at a time.

pub mod result;

pub use result::{LogRecord, OverheadRecord, ParsedLog, ScalabilityRecord, parse_output};
