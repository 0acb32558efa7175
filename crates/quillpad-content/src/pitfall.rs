//! Preview sections pulled out of pitfall write-ups.
//!
//! A pitfall post is free-form Markdown that conventionally carries four `##`
//! headings (problem, cause, solution, avoidance guide). Each heading may be
//! prefixed by an emoji. Heading keywords are data, so new spellings can be
//! added without touching the scanner.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Problem,
    Cause,
    Solution,
    Summary,
}

/// Keywords that identify one section heading, and the preview length cap in characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPattern {
    pub section: Section,
    pub keywords: Vec<String>,
    pub cap: usize,
}

impl SectionPattern {
    pub fn new<I, S>(section: Section, keywords: I, cap: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            section,
            keywords: keywords.into_iter().map(Into::into).collect(),
            cap,
        }
    }

    /// The built-in headings: Chinese template headings plus English equivalents.
    pub fn defaults() -> Vec<SectionPattern> {
        vec![
            SectionPattern::new(Section::Problem, ["问题描述", "problem"], 100),
            SectionPattern::new(Section::Cause, ["原因分析", "cause"], 80),
            SectionPattern::new(Section::Solution, ["解决方案", "solution"], 80),
            SectionPattern::new(Section::Summary, ["避坑指南", "avoidance guide", "summary"], 80),
        ]
    }
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("section '{0:?}' has no keywords")]
    NoKeywords(Section),
    #[error("invalid heading pattern for section '{0:?}': {1}")]
    Regex(Section, #[source] regex::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PitfallSections {
    pub problem: String,
    pub cause: String,
    pub solution: String,
    pub summary: String,
}

impl PitfallSections {
    fn slot(&mut self, section: Section) -> &mut String {
        match section {
            Section::Problem => &mut self.problem,
            Section::Cause => &mut self.cause,
            Section::Solution => &mut self.solution,
            Section::Summary => &mut self.summary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.problem.is_empty()
            && self.cause.is_empty()
            && self.solution.is_empty()
            && self.summary.is_empty()
    }
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    section: Section,
    heading: Regex,
    cap: usize,
}

#[derive(Debug, Clone)]
pub struct PitfallExtractor {
    patterns: Vec<CompiledPattern>,
}

impl PitfallExtractor {
    pub fn new(patterns: Vec<SectionPattern>) -> Result<Self, PatternError> {
        let patterns = patterns
            .into_iter()
            .map(compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns each section's text, trimmed and cut to its cap. Missing headings give `""`.
    pub fn extract(&self, markdown: &str) -> PitfallSections {
        let mut sections = PitfallSections::default();
        for pattern in &self.patterns {
            let slot = sections.slot(pattern.section);
            if !slot.is_empty() {
                continue;
            }
            if let Some(heading) = pattern.heading.find(markdown) {
                let rest = &markdown[heading.end()..];
                let body = match rest.find("##") {
                    Some(next) => &rest[..next],
                    None => rest,
                };
                *slot = truncate_chars(body.trim(), pattern.cap);
            }
        }
        sections
    }
}

impl Default for PitfallExtractor {
    fn default() -> Self {
        let patterns = SectionPattern::defaults()
            .into_iter()
            .map(|p| compile(p).unwrap_or_else(|e| unreachable!("built-in pattern: {e}")))
            .collect();
        Self { patterns }
    }
}

fn compile(pattern: SectionPattern) -> Result<CompiledPattern, PatternError> {
    let keywords: Vec<String> = pattern
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(regex::escape)
        .collect();
    if keywords.is_empty() {
        return Err(PatternError::NoKeywords(pattern.section));
    }

    // `##`, optional emoji glyph(s), then one of the keywords.
    let source = format!(r"##\s*[^\p{{L}}\p{{N}}\s#]*\s*(?:{})", keywords.join("|"));
    let heading = RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|e| PatternError::Regex(pattern.section, e))?;

    Ok(CompiledPattern {
        section: pattern.section,
        heading,
        cap: pattern.cap,
    })
}

fn truncate_chars(text: &str, cap: usize) -> String {
    match text.char_indices().nth(cap) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn extracts_present_sections_and_leaves_others_empty() {
        let md = "## 😱 问题描述\nX happened\n## 🛠️ 解决方案\nDid Y\n";
        let sections = PitfallExtractor::default().extract(md);
        assert_eq!(
            sections,
            PitfallSections {
                problem: "X happened".into(),
                cause: String::new(),
                solution: "Did Y".into(),
                summary: String::new(),
            }
        );
    }

    #[test]
    fn all_four_sections() {
        let md = "intro\n\
                  ## 😱 问题描述\nbuild broke\n\
                  ## 🧐 原因分析\nstale lockfile\n\
                  ## 🛠️ 解决方案\nregenerate it\n\
                  ## 💡 避坑指南\npin versions\n";
        let s = PitfallExtractor::default().extract(md);
        assert_eq!(s.problem, "build broke");
        assert_eq!(s.cause, "stale lockfile");
        assert_eq!(s.solution, "regenerate it");
        assert_eq!(s.summary, "pin versions");
    }

    #[rstest]
    #[case("## Problem\nboom", "boom")]
    #[case("##PROBLEM\nboom", "boom")]
    #[case("## 🔥 problem statement\nboom", "statement\nboom")]
    #[case("no headings at all", "")]
    fn keyword_matching_is_case_insensitive(#[case] md: &str, #[case] problem: &str) {
        assert_eq!(PitfallExtractor::default().extract(md).problem, problem);
    }

    #[test]
    fn sections_are_capped_per_section() {
        let long = "字".repeat(150);
        let md = format!("## 问题描述\n{long}\n## 原因分析\n{long}");
        let s = PitfallExtractor::default().extract(&md);
        assert_eq!(s.problem.chars().count(), 100);
        assert_eq!(s.cause.chars().count(), 80);
    }

    #[test]
    fn section_stops_at_deeper_heading_too() {
        let md = "## 解决方案\nstep one\n### detail\nmore";
        assert_eq!(PitfallExtractor::default().extract(md).solution, "step one");
    }

    #[test]
    fn custom_keywords_extend_the_scanner() {
        let extractor = PitfallExtractor::new(vec![SectionPattern::new(
            Section::Problem,
            ["Symptom"],
            10,
        )])
        .unwrap();
        let s = extractor.extract("## ⚠️ symptom\n0123456789abc");
        assert_eq!(s.problem, "0123456789");
        assert!(s.solution.is_empty());
    }

    #[test]
    fn keywords_are_literal_not_regex() {
        let extractor =
            PitfallExtractor::new(vec![SectionPattern::new(Section::Cause, ["why?"], 80)])
                .unwrap();
        assert_eq!(extractor.extract("## why?\nbecause").cause, "because");
        assert_eq!(extractor.extract("## wh\nnope").cause, "");
    }

    #[test]
    fn empty_keyword_list_is_rejected() {
        let err = PitfallExtractor::new(vec![SectionPattern::new(
            Section::Summary,
            Vec::<String>::new(),
            80,
        )])
        .unwrap_err();
        assert!(matches!(err, PatternError::NoKeywords(Section::Summary)));
    }
}
