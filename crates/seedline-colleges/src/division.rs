//! NCAA division filter

use regex::Regex;
use seedline_core::Table;

/// NCAA division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Division {
    One,
    Two,
    Three,
}

impl Division {
    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    pub fn roman(self) -> &'static str {
        match self {
            Self::One => "I",
            Self::Two => "II",
            Self::Three => "III",
        }
    }
}

impl TryFrom<u8> for Division {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(format!("division must be 1, 2 or 3 (got {other})")),
        }
    }
}

impl std::fmt::Display for Division {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Division {}", self.number())
    }
}

/// Decides whether a division cell belongs to one division.
///
/// Accepted spellings for division N (case-insensitive unless noted):
/// contains `Division N`, contains `DN`, equals `N` exactly, equals `I`
/// exactly when N = 1, or contains `Division <roman N>` as a whole word.
#[derive(Debug, Clone)]
pub struct DivisionMatcher {
    division: Division,
    spelled: String,
    short: String,
    exact: String,
    roman: Regex,
}

impl DivisionMatcher {
    pub fn new(division: Division) -> Self {
        let n = division.number();
        let roman = Regex::new(&format!(r"(?i)\bdivision\s+{}\b", division.roman()))
            .expect("static division pattern");
        Self {
            division,
            spelled: format!("division {n}"),
            short: format!("d{n}"),
            exact: n.to_string(),
            roman,
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        let lower = value.to_lowercase();
        lower.contains(&self.spelled)
            || lower.contains(&self.short)
            || value == self.exact
            || (self.division == Division::One && value == "I")
            || self.roman.is_match(value)
    }
}

/// First column whose label mentions "division" or "div" (case-insensitive).
pub fn find_division_column(columns: &[String]) -> Option<usize> {
    columns.iter().position(|c| {
        let lower = c.to_lowercase();
        lower.contains("division") || lower.contains("div")
    })
}

/// What the division filter did to a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Filtered {
        column: String,
        before: usize,
        after: usize,
    },
    /// No division column; nothing was removed
    NoColumn,
}

/// Drop rows that do not belong to `division`. Missing cells never match.
pub fn filter_by_division(table: &mut Table, division: Division) -> FilterOutcome {
    let Some(idx) = find_division_column(table.columns()) else {
        log::warn!("Could not find division column; keeping all rows");
        return FilterOutcome::NoColumn;
    };
    let column = table.columns()[idx].clone();
    let matcher = DivisionMatcher::new(division);
    let before = table.len();

    table.retain(|cells| cells[idx].as_deref().is_some_and(|v| matcher.matches(v)));

    let after = table.len();
    log::info!("Filtered from {before} to {after} {division} schools (column '{column}')");
    FilterOutcome::Filtered {
        column,
        before,
        after,
    }
}
