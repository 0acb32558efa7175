#[cfg(feature = "cli")]
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output layout for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, colored output for local development.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
}

impl LogFormat {
    pub fn is_pretty(self) -> bool {
        matches!(self, LogFormat::Pretty)
    }

    pub fn is_compact(self) -> bool {
        matches!(self, LogFormat::Compact)
    }
}

#[cfg(test)]
mod tests {
    use super::LogFormat;
    use rstest::rstest;

    #[test]
    fn default_is_pretty() {
        assert!(LogFormat::default().is_pretty());
    }

    #[rstest]
    #[case(LogFormat::Pretty, "\"pretty\"")]
    #[case(LogFormat::Compact, "\"compact\"")]
    fn serializes_lowercase(#[case] format: LogFormat, #[case] json: &str) {
        assert_eq!(serde_json::to_string(&format).unwrap(), json);
        assert_eq!(serde_json::from_str::<LogFormat>(json).unwrap(), format);
    }
}
