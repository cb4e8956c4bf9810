//! Frequency distribution over the `sports` column

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Source column holding the sport name
pub const SPORTS_COLUMN: &str = "sports";

/// One entry of `sports.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SportRecord {
    pub name: String,
    pub popularity: u64,
}

/// One record per distinct present value, most popular first.
///
/// Distinct raw values are visited in ascending order; each emits its
/// trimmed form as `name`, skipping blanks and `"nan"`. `popularity` counts
/// rows whose raw value equals that trimmed name exactly, so a raw value
/// with surrounding whitespace is reported under the trimmed name with the
/// count of the trimmed spelling. The final sort is stable, keeping
/// alphabetical order among equal counts.
pub fn aggregate_sports(values: &[Option<&str>]) -> Vec<SportRecord> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for value in values.iter().flatten() {
        *counts.entry(*value).or_default() += 1;
    }

    let mut sports: Vec<SportRecord> = counts
        .keys()
        .filter_map(|raw| {
            let name = raw.trim();
            if name.is_empty() || name == "nan" {
                return None;
            }
            Some(SportRecord {
                name: name.to_string(),
                popularity: counts.get(name).copied().unwrap_or(0),
            })
        })
        .collect();

    sports.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    sports
}
