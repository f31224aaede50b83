//! Tool modes.
//!
//! The active tool decides how a press is interpreted:
//!
//! | Tool | Component body | Resize handle | Output port | Canvas background |
//! |------|----------------|---------------|-------------|-------------------|
//! | **Grab** | focus + drag | focus + drag | start edge | pan |
//! | **Resize** | focus | focus + resize | start edge | — |
//! | **Connect** | focus | focus | start edge | — |

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Grab,
    Resize,
    Connect,
}

impl ToolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grab => "grab",
            Self::Resize => "resize",
            Self::Connect => "connect",
        }
    }

    /// Whether a press on a component body starts a drag.
    pub fn drags_components(self) -> bool {
        self == Self::Grab
    }

    /// Whether a press on a resize handle starts a resize.
    pub fn resizes_components(self) -> bool {
        self == Self::Resize
    }

    /// Whether a press on the canvas background pans.
    pub fn pans(self) -> bool {
        self == Self::Grab
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grab" => Ok(Self::Grab),
            "resize" => Ok(Self::Resize),
            "connect" => Ok(Self::Connect),
            other => Err(format!("unknown tool: {other}")),
        }
    }
}
