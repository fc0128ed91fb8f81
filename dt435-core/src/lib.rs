//! # dt435-core
//!
//! Core protocol implementation for Companytec DT435 fuel dispensers.
//!
//! This crate provides the low-level protocol primitives:
//! - Checksum calculation
//! - Frame assembly and disassembly
//! - Command catalog and parameter encoding
//! - Reply field layouts and decoders
//! - Session state

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod layout;
pub mod response;
pub mod session;

pub use command::Command;
pub use error::{Error, Result};
pub use session::{Session, SessionState};
