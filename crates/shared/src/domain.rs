use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseFieldError;

pub const SALARY_MIN: i64 = 0;
pub const SALARY_MAX: i64 = 100_000;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATE_TIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// A single employee record as exchanged with the records backend.
///
/// Fields the backend sends beyond the four known columns are kept in
/// `extra` and written back unchanged on save. Known columns decode
/// leniently so one odd value does not fail the whole list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Employee {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub date_of_birth: String,
    #[serde(deserialize_with = "lenient_salary")]
    pub salary: i64,
    #[serde(deserialize_with = "lenient_text")]
    pub address: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        date_of_birth: impl Into<String>,
        salary: i64,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date_of_birth: date_of_birth.into(),
            salary,
            address: address.into(),
            extra: Map::new(),
        }
    }

    /// Returns a copy of this record with one field replaced from raw input.
    pub fn with_field(&self, field: EmployeeField, raw: &str) -> Self {
        let mut next = self.clone();
        match field {
            EmployeeField::Name => next.name = raw.to_string(),
            EmployeeField::DateOfBirth => next.date_of_birth = raw.to_string(),
            EmployeeField::Salary => next.salary = clamp_salary(parse_salary(raw)),
            EmployeeField::Address => next.address = raw.to_string(),
        }
        next
    }

    pub fn with_normalized_date_of_birth(mut self) -> Self {
        self.date_of_birth = normalize_date_of_birth(&self.date_of_birth);
        self
    }
}

/// Strings stay as-is, numbers and booleans are stringified, anything else is empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    })
}

/// Integers pass through, floats truncate, strings use `parse_salary`, anything else is 0.
fn lenient_salary<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|value| value.trunc() as i64))
            .unwrap_or(0),
        Value::String(text) => parse_salary(&text),
        _ => 0,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EmployeeField {
    Name,
    DateOfBirth,
    Salary,
    Address,
}

impl EmployeeField {
    pub const ALL: [EmployeeField; 4] = [
        EmployeeField::Name,
        EmployeeField::DateOfBirth,
        EmployeeField::Salary,
        EmployeeField::Address,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeField::Name => "Name",
            EmployeeField::DateOfBirth => "DateOfBirth",
            EmployeeField::Salary => "Salary",
            EmployeeField::Address => "Address",
        }
    }
}

impl fmt::Display for EmployeeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeField {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        EmployeeField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseFieldError::new(trimmed))
    }
}

/// Parses the leading integer of `raw`, falling back to 0.
///
/// Trailing garbage after the digits is ignored, so `"42k"` yields 42.
pub fn parse_salary(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|value| sign * value)
        .unwrap_or(0)
}

pub fn clamp_salary(value: i64) -> i64 {
    value.clamp(SALARY_MIN, SALARY_MAX)
}

pub fn salary_in_range(value: i64) -> bool {
    (SALARY_MIN..=SALARY_MAX).contains(&value)
}

/// Normalizes a backend date or timestamp to a `YYYY-MM-DD` calendar date.
///
/// Unparseable input becomes an empty string.
pub fn normalize_date_of_birth(raw: &str) -> String {
    parse_calendar_date(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Read-only table format. Unparseable input is shown as-is.
pub fn display_date(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    parse_calendar_date(raw)
        .map(|date| date.format("%Y/%m/%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|timestamp| timestamp.date())
        })
}

/// Name ordering used when re-sorting the canonical list.
///
/// Names compare case- and accent-insensitively first, so `"Émile"` sorts
/// among the `E`s. Ties break on accents (plain letter first), then on case
/// (lowercase first). Scripts outside Latin compare by code point.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let (a_lower, b_lower) = (a.to_lowercase(), b.to_lowercase());
    a_lower
        .chars()
        .map(fold_accent)
        .cmp(b_lower.chars().map(fold_accent))
        .then_with(|| a_lower.cmp(&b_lower))
        .then_with(|| b.cmp(a))
}

fn fold_accent(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ł' | 'ľ' | 'ĺ' | 'ļ' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' => 't',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

pub fn sort_by_name(employees: &mut [Employee]) {
    employees.sort_by(|a, b| compare_names(&a.name, &b.name));
}
