use serde::{Deserialize, Serialize};

/// Which preview field a heading fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum SectionName {
    Problem,
    Cause,
    Solution,
    Summary,
}

/// Heading keywords for one section. Matching is case-insensitive and an
/// emoji may sit between `##` and the keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct SectionKeywords {
    pub section: SectionName,
    pub keywords: Vec<String>,
    /// Preview length in characters.
    pub cap: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PitfallConfig {
    /// Replaces the built-in headings when non-empty.
    #[serde(default)]
    pub sections: Vec<SectionKeywords>,
}

impl PitfallConfig {
    pub fn sections(&self) -> &[SectionKeywords] {
        &self.sections
    }

    pub fn uses_builtin_headings(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_custom_sections() {
        let cfg: PitfallConfig = serde_json::from_str(
            r#"{"sections":[{"section":"problem","keywords":["Symptom","症状"],"cap":50}]}"#,
        )
        .unwrap();
        assert!(!cfg.uses_builtin_headings());
        assert_eq!(cfg.sections()[0].section, SectionName::Problem);
        assert_eq!(cfg.sections()[0].keywords, vec!["Symptom", "症状"]);
        assert_eq!(cfg.sections()[0].cap, 50);
    }

    #[test]
    fn empty_object_means_builtin() {
        let cfg: PitfallConfig = serde_json::from_str("{}").unwrap();
        assert!(cfg.uses_builtin_headings());
    }
}
