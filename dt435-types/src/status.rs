//! Nozzle status vector read with `(&S)`

use std::fmt;

/// State of one nozzle position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NozzleState {
    /// `L`
    Available,
    /// `B`
    Blocked,
    /// `C`
    Finished,
    /// `A`
    Refueling,
    /// `E`
    Waiting,
    /// `F`: no nozzle configured at this position
    NotPresent,
    /// `P`
    Ready,
    Unknown,
}

impl NozzleState {
    /// Map a status code character. Unrecognised codes map to `Unknown`.
    pub fn from_code(code: char) -> Self {
        match code {
            'L' => Self::Available,
            'B' => Self::Blocked,
            'C' => Self::Finished,
            'A' => Self::Refueling,
            'E' => Self::Waiting,
            'F' => Self::NotPresent,
            'P' => Self::Ready,
            _ => Self::Unknown,
        }
    }

    /// Human-readable description
    pub fn description(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Blocked => "Blocked",
            Self::Finished => "Finished",
            Self::Refueling => "Refueling",
            Self::Waiting => "Waiting",
            Self::NotPresent => "Not present",
            Self::Ready => "Ready",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for NozzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Status of one nozzle position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NozzleStatus {
    /// 1-based position in the status vector
    pub position: u8,

    /// Nozzle code for this position (2 uppercase hex chars)
    pub nozzle: String,

    /// Raw status code
    pub code: char,

    pub state: NozzleState,
}

impl NozzleStatus {
    pub fn new(position: u8, code: char) -> Self {
        Self {
            position,
            nozzle: format!("{:02X}", position),
            code,
            state: NozzleState::from_code(code),
        }
    }
}

/// Full status vector, one entry per reported position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusVector {
    pub nozzles: Vec<NozzleStatus>,
}

impl StatusVector {
    /// Positions that have a nozzle installed
    pub fn active(&self) -> impl Iterator<Item = &NozzleStatus> {
        self.nozzles
            .iter()
            .filter(|n| n.state != NozzleState::NotPresent)
    }

    /// Look up a position (1-based)
    pub fn get(&self, position: u8) -> Option<&NozzleStatus> {
        self.nozzles.iter().find(|n| n.position == position)
    }

    pub fn len(&self) -> usize {
        self.nozzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nozzles.is_empty()
    }
}
