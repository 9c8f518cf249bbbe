//! Rendering of the energy sequence for standard output.

use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::series::EnergySeries;

/// How the sequence is written each time it grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Bracketed list of quoted values, one line per emission.
    #[default]
    Text,
    /// One JSON array per line.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Render the full sequence as a single line (no trailing newline).
pub fn render(series: &EnergySeries, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(series.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string(series)?),
    }
}
