use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::state::data_model::{self, Row};

pub const DATE_FIELD: &str = "date";

const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    pub field: Option<String>,
    pub order: SortOrder,
}

impl SortState {
    // Active field flips, new field starts ascending, explicit order wins.
    pub fn apply(&mut self, field: &str, explicit: Option<SortOrder>) -> SortSpec {
        let order = match (explicit, self.field.as_deref()) {
            (Some(order), _) => order,
            (None, Some(active)) if active == field => self.order.toggled(),
            (None, _) => SortOrder::Asc,
        };
        self.field = Some(field.to_string());
        self.order = order;
        SortSpec::new(field, order)
    }

    pub fn spec(&self) -> Option<SortSpec> {
        self.field
            .as_ref()
            .map(|field| SortSpec::new(field.clone(), self.order))
    }
}

pub fn default_sort_for(
    version: u64,
    applied_version: Option<u64>,
    default_sort: Option<&SortSpec>,
) -> Option<SortSpec> {
    match default_sort {
        Some(spec) if applied_version != Some(version) => Some(spec.clone()),
        _ => None,
    }
}

pub fn compare_field(field: &str, a: &Row, b: &Row) -> Ordering {
    sort_key(field, a.get(field)).cmp(&sort_key(field, b.get(field)))
}

pub fn sort_rows<R: AsRef<Row>>(rows: &mut Vec<R>, field: &str, order: SortOrder) {
    let mut keyed: Vec<(SortKey, R)> = rows
        .drain(..)
        .map(|row| (sort_key(field, row.as_ref().get(field)), row))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match order {
        SortOrder::Asc => a.cmp(b),
        SortOrder::Desc => a.cmp(b).reverse(),
    });
    rows.extend(keyed.into_iter().map(|(_, row)| row));
}

impl AsRef<Row> for Row {
    fn as_ref(&self) -> &Row {
        self
    }
}

// Ranked in declaration order so mixed columns still get one total order.
#[derive(Clone, Debug)]
enum SortKey {
    Date(i64),
    InvalidDate,
    Number(f64, String),
    Text(String, String),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            Self::Date(_) => 0,
            Self::InvalidDate => 1,
            Self::Number(..) => 2,
            Self::Text(..) => 3,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Number(a, a_text), Self::Number(b, b_text)) => {
                a.total_cmp(b).then_with(|| a_text.cmp(b_text))
            }
            (Self::Text(a_folded, a_raw), Self::Text(b_folded, b_raw)) => {
                a_folded.cmp(b_folded).then_with(|| a_raw.cmp(b_raw))
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

fn sort_key(field: &str, value: Option<&Value>) -> SortKey {
    if field == DATE_FIELD {
        return value
            .and_then(parse_date_millis)
            .map_or(SortKey::InvalidDate, SortKey::Date);
    }

    let text = value.map(data_model::display_value).unwrap_or_default();
    match numeric_token(&text) {
        Some(number) => SortKey::Number(number, text),
        None => SortKey::Text(collation_key(&text), text),
    }
}

/// Accents stripped, then lowercased: `"Éclair"` sorts with `"eclair"`.
pub fn collation_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

// Epoch milliseconds; JSON numbers are taken as-is.
pub fn parse_date_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(text: &str) -> Option<i64> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt.and_utc().timestamp_millis());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([-+]?)(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?|\.\d+)")
            .expect("numeric token pattern is valid")
    })
}

// A sign glued to a preceding letter or digit is a separator, not a sign:
// `"INV-12"` yields `12`. Thousands separators are dropped.
pub fn numeric_token(text: &str) -> Option<f64> {
    let caps = numeric_pattern().captures(text)?;
    let sign = caps.get(1)?;
    let digits = caps.get(2)?.as_str().replace(',', "");

    let glued = text[..sign.start()]
        .chars()
        .next_back()
        .is_some_and(char::is_alphanumeric);
    let negative = sign.as_str() == "-" && !glued;

    let magnitude: f64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
