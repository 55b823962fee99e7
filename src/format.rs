use std::str::FromStr;

use anyhow::{Result, bail};
use serde::Serialize;

/// Output format for structured data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text - human-readable listing
    #[default]
    Text,
    /// JSON - machine-parseable
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => bail!("Invalid format '{}'. Use: text or json", s),
        }
    }
}

impl OutputFormat {
    /// Serialize data to the requested format
    ///
    /// # Errors
    /// Fails for [`Self::Text`] — text output is rendered directly by the
    /// caller, not through serde.
    pub fn serialize<T: Serialize>(self, data: &T) -> Result<String> {
        match self {
            Self::Json => serde_json::to_string_pretty(data)
                .map_err(|e| anyhow::anyhow!("JSON serialization failed: {}", e)),
            Self::Text => bail!("Text format should not use serialize()"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_formats() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("toml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn json_serializes_pretty() {
        let out = OutputFormat::Json.serialize(&vec![1, 2]).unwrap();
        assert!(out.contains('\n'));
    }

    #[test]
    fn text_refuses_serialize() {
        assert!(OutputFormat::Text.serialize(&1).is_err());
    }
}
