//! Type definitions for dt435
//!
//! Decoded records returned by the dispenser and the small protocol enums
//! used to build commands.

pub mod calendar;
pub mod error;
pub mod identifier;
pub mod mode;
pub mod reading;
pub mod status;
pub mod supply;
pub mod total;
pub mod visualization;

pub use calendar::CalendarReading;
pub use error::{Error, Result};
pub use identifier::IdentifierRecord;
pub use mode::{OperatingMode, TotalMode};
pub use reading::Reading;
pub use status::{NozzleState, NozzleStatus, StatusVector};
pub use supply::{SupplyIdentified, SupplyRecord};
pub use total::TotalReading;
pub use visualization::VisualizationEntry;
