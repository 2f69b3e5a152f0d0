//! Renderer module
//!
//! Renders records to different output formats: jsonl, json, raw

use serde_json::Value;

use crate::core::model::Record;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for records
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render records to a string
    pub fn render(&self, records: &[Record]) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(records),
            OutputFormat::Json => self.render_json(records),
            OutputFormat::Raw => self.render_raw(records),
        }
    }

    /// One JSON object per line
    fn render_jsonl(&self, records: &[Record]) -> String {
        records
            .iter()
            .filter_map(|record| {
                if self.config.pretty {
                    serde_json::to_string_pretty(record).ok()
                } else {
                    serde_json::to_string(record).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// A single JSON array
    fn render_json(&self, records: &[Record]) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Values only; strings unquoted, misses print nothing
    fn render_raw(&self, records: &[Record]) -> String {
        records
            .iter()
            .filter_map(|record| record.value.as_ref())
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other if self.config.pretty => {
                    serde_json::to_string_pretty(other).unwrap_or_default()
                }
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
