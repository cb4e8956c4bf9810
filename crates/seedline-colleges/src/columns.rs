//! Column resolution for college tables of unknown schema.
//!
//! Each canonical field has a fixed list of candidate column labels tried in
//! priority order (exact, case-sensitive). The first candidate that exists
//! in the table and holds a usable value for the row wins.

use seedline_core::Row;

/// Column holding `"City, ST"` in the NCAA division database.
pub const LOCATION_COLUMN: &str = "Location";

/// Canonical college field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    State,
    City,
    Website,
    Conference,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::State,
        Field::City,
        Field::Website,
        Field::Conference,
    ];

    /// Candidate column labels, highest priority first.
    pub const fn candidates(self) -> &'static [&'static str] {
        match self {
            Field::Name => &[
                "Name",
                "name",
                "school",
                "School",
                "institution",
                "college",
                "INSTNM",
            ],
            Field::State => &["state", "State", "st", "state_abbr", "STABBR"],
            Field::City => &["city", "City", "CITY"],
            Field::Website => &["URL", "url", "website", "Website", "web", "INSTURL"],
            Field::Conference => &["Conference", "conference", "conf"],
        }
    }
}

/// Trimmed value, or `None` when there is nothing usable in it.
///
/// `"nan"` is still rejected here for tables built in memory; the CSV loader
/// already folds it into a missing cell.
pub fn usable(value: &str) -> Option<&str> {
    let v = value.trim();
    (!v.is_empty() && v != "nan").then_some(v)
}

/// First usable value among the field's candidate columns.
pub fn resolve<'a>(row: &Row<'a>, field: Field) -> Option<&'a str> {
    field
        .candidates()
        .iter()
        .find_map(|label| row.get(label).and_then(usable))
}

/// Split a `"City, ST"` location into `(city, state)`.
///
/// Only the first two comma-separated parts are used; either may come back
/// empty. Values without a comma yield `None`.
pub fn split_location(value: &str) -> Option<(&str, &str)> {
    let v = usable(value)?;
    if !v.contains(',') {
        return None;
    }
    let mut parts = v.split(',');
    let city = parts.next().unwrap_or_default().trim();
    let state = parts.next().unwrap_or_default().trim();
    Some((city, state))
}

/// Resolve `(city, state)` for a row.
///
/// The `Location` column is consulted first; whichever half is still empty
/// afterwards falls back to the dedicated city/state columns.
pub fn resolve_place<'a>(row: &Row<'a>) -> (Option<&'a str>, Option<&'a str>) {
    let non_empty = |s: &'a str| (!s.is_empty()).then_some(s);
    let (city, state) = row
        .get(LOCATION_COLUMN)
        .and_then(split_location)
        .map(|(c, s)| (non_empty(c), non_empty(s)))
        .unwrap_or((None, None));

    let state = state.or_else(|| resolve(row, Field::State));
    let city = city.or_else(|| resolve(row, Field::City));
    (city, state)
}

/// Ensure a website carries a scheme.
pub fn normalize_website(value: &str) -> String {
    if value.starts_with("http") {
        value.to_string()
    } else {
        format!("https://{value}")
    }
}
