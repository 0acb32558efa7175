//! Year → month → items grouping for timeline views.
//!
//! Operates on an already-fetched list; nothing here touches storage.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use quillpad_core::Id;
use serde::Serialize;

/// Raw input row. `created_at` is kept as text so callers can feed in data
/// whose timestamps were never validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub id: Id,
    pub title: String,
    pub created_at: String,
}

impl ArchiveEntry {
    pub fn new(id: Id, title: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            created_at: created_at.into(),
        }
    }

    pub fn from_timestamp(id: Id, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::new(id, title, created_at.to_rfc3339())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveItem {
    pub id: Id,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveMonth {
    /// Calendar month, 1–12.
    pub month: u32,
    /// Zero-padded month, `"01"`–`"12"`.
    pub label: String,
    pub items: Vec<ArchiveItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveYear {
    pub year: i32,
    pub months: Vec<ArchiveMonth>,
}

impl ArchiveYear {
    pub fn total_items(&self) -> usize {
        self.months.iter().map(|m| m.items.len()).sum()
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` (read as UTC) and bare `YYYY-MM-DD`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Groups entries by calendar year then month, newest first at every level.
///
/// Entries whose `created_at` cannot be parsed are dropped.
pub fn build_archive<I>(entries: I) -> Vec<ArchiveYear>
where
    I: IntoIterator<Item = ArchiveEntry>,
{
    let mut grouped: BTreeMap<i32, BTreeMap<u32, Vec<ArchiveItem>>> = BTreeMap::new();

    for entry in entries {
        let Some(created_at) = parse_timestamp(&entry.created_at) else {
            continue;
        };
        grouped
            .entry(created_at.year())
            .or_default()
            .entry(created_at.month())
            .or_default()
            .push(ArchiveItem {
                id: entry.id,
                title: entry.title,
                created_at,
            });
    }

    grouped
        .into_iter()
        .rev()
        .map(|(year, months)| ArchiveYear {
            year,
            months: months
                .into_iter()
                .rev()
                .map(|(month, mut items)| {
                    items.sort_by(|a, b| {
                        b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
                    });
                    ArchiveMonth {
                        month,
                        label: format!("{month:02}"),
                        items,
                    }
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;
    use rstest::rstest;

    fn ids(month: &ArchiveMonth) -> Vec<Id> {
        month.items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn groups_years_and_months_newest_first() {
        let archive = build_archive(vec![
            ArchiveEntry::new(1, "early january", "2024-01-05"),
            ArchiveEntry::new(2, "late january", "2024-01-20"),
            ArchiveEntry::new(3, "new year's eve", "2023-12-31"),
        ]);

        assert_json_snapshot!(archive, @r#"
        [
          {
            "year": 2024,
            "months": [
              {
                "month": 1,
                "label": "01",
                "items": [
                  {
                    "id": 2,
                    "title": "late january",
                    "createdAt": "2024-01-20T00:00:00Z"
                  },
                  {
                    "id": 1,
                    "title": "early january",
                    "createdAt": "2024-01-05T00:00:00Z"
                  }
                ]
              }
            ]
          },
          {
            "year": 2023,
            "months": [
              {
                "month": 12,
                "label": "12",
                "items": [
                  {
                    "id": 3,
                    "title": "new year's eve",
                    "createdAt": "2023-12-31T00:00:00Z"
                  }
                ]
              }
            ]
          }
        ]
        "#);
    }

    #[test]
    fn months_descend_within_a_year() {
        let archive = build_archive(vec![
            ArchiveEntry::new(1, "a", "2024-02-01T08:00:00Z"),
            ArchiveEntry::new(2, "b", "2024-11-30T23:59:59+00:00"),
            ArchiveEntry::new(3, "c", "2024-07-14T12:00:00"),
        ]);

        assert_eq!(archive.len(), 1);
        let months: Vec<u32> = archive[0].months.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![11, 7, 2]);
        assert_eq!(archive[0].total_items(), 3);
    }

    #[test]
    fn unparseable_dates_are_dropped() {
        let archive = build_archive(vec![
            ArchiveEntry::new(1, "ok", "2022-05-05"),
            ArchiveEntry::new(2, "garbage", "yesterday-ish"),
            ArchiveEntry::new(3, "empty", ""),
        ]);

        assert_eq!(archive.len(), 1);
        assert_eq!(ids(&archive[0].months[0]), vec![1]);
    }

    #[test]
    fn offsets_are_normalised_to_utc_before_grouping() {
        // 2024-01-01T01:00:00+02:00 is still 2023-12-31 in UTC.
        let archive = build_archive(vec![ArchiveEntry::new(
            9,
            "midnight",
            "2024-01-01T01:00:00+02:00",
        )]);
        assert_eq!(archive[0].year, 2023);
        assert_eq!(archive[0].months[0].label, "12");
    }

    #[test]
    fn same_instant_falls_back_to_id_order() {
        let at = "2024-03-03T03:03:03Z";
        let archive = build_archive(vec![
            ArchiveEntry::new(4, "x", at),
            ArchiveEntry::new(8, "y", at),
        ]);
        assert_eq!(ids(&archive[0].months[0]), vec![8, 4]);
    }

    #[test]
    fn empty_input_yields_empty_archive() {
        assert!(build_archive(Vec::new()).is_empty());
    }

    #[rstest]
    #[case("2024-01-05", true)]
    #[case("2024-01-05T10:11:12Z", true)]
    #[case("2024-01-05T10:11:12.345", true)]
    #[case("2024-13-05", false)]
    #[case("05/01/2024", false)]
    fn timestamp_formats(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_timestamp(raw).is_some(), ok);
    }

    #[test]
    fn from_timestamp_round_trips() {
        let at = parse_timestamp("2021-06-01T00:00:00Z").unwrap();
        let archive = build_archive(vec![ArchiveEntry::from_timestamp(1, "t", at)]);
        assert_eq!(archive[0].months[0].items[0].created_at, at);
    }
}
