use serde::{Deserialize, Serialize};
use std::fmt;

/// Port a finding was reported on.
///
/// Port number `0` is the "general" sentinel for host-level findings that are
/// not tied to a specific service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    pub number: u16,
    pub protocol: String,
    #[serde(default)]
    pub result: String,
}

impl Port {
    pub fn new(number: u16, protocol: impl Into<String>) -> Self {
        Self {
            number,
            protocol: protocol.into(),
            result: String::new(),
        }
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = result.into();
        self
    }

    pub fn is_general(&self) -> bool {
        self.number == 0
    }

    /// Port number as displayed (`general` for the sentinel).
    fn number_label(&self) -> String {
        if self.is_general() {
            "general".to_string()
        } else {
            self.number.to_string()
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number_label(), self.protocol)
    }
}
