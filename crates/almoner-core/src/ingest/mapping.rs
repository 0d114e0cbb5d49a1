use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Date,
    Description,
    Amount,
    Category,
    Type,
}

impl CanonicalField {
    pub const ALL: [Self; 5] = [
        Self::Date,
        Self::Description,
        Self::Amount,
        Self::Category,
        Self::Type,
    ];

    pub const REQUIRED: [Self; 3] = [Self::Date, Self::Description, Self::Amount];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Type => "type",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| {
                CoreError::invalid_argument_for_command(
                    &format!(
                        "Unknown field `{}`; expected one of date, description, amount, category, type.",
                        value.trim()
                    ),
                    Some("ingest"),
                )
            })
    }
}

/// Header keywords per field, checked in this order. A field takes the first
/// header, in source order, whose lowercased text contains any keyword.
const AUTO_MAP_RULES: &[(CanonicalField, &[&str])] = &[
    (CanonicalField::Date, &["date"]),
    (CanonicalField::Description, &["desc", "details", "memo"]),
    (CanonicalField::Amount, &["amount", "value", "total"]),
    (CanonicalField::Category, &["category", "group"]),
    (CanonicalField::Type, &["type"]),
];

/// Canonical field to source header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    fields: BTreeMap<CanonicalField, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: CanonicalField, header: &str) {
        self.fields.insert(field, header.trim().to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.fields
            .iter()
            .map(|(field, header)| (*field, header.as_str()))
    }

    pub fn missing_required(&self) -> Vec<CanonicalField> {
        CanonicalField::REQUIRED
            .into_iter()
            .filter(|field| !self.fields.contains_key(field))
            .collect()
    }
}

pub fn auto_map(headers: &[String]) -> ColumnMapping {
    let lowered = headers
        .iter()
        .map(|header| header.to_lowercase())
        .collect::<Vec<String>>();

    let mut mapping = ColumnMapping::new();
    for (field, keywords) in AUTO_MAP_RULES {
        let matched = lowered
            .iter()
            .position(|header| keywords.iter().any(|keyword| header.contains(keyword)));
        if let Some(index) = matched {
            mapping.set(*field, &headers[index]);
        }
    }
    mapping
}

/// Parses a `field=Header` override as given to `--map`.
pub fn parse_override(raw: &str) -> CoreResult<(CanonicalField, String)> {
    let Some((field, header)) = raw.split_once('=') else {
        return Err(CoreError::invalid_argument_for_command(
            &format!("Mapping override `{raw}` must look like field=Header."),
            Some("ingest"),
        ));
    };
    let header = header.trim();
    if header.is_empty() {
        return Err(CoreError::invalid_argument_for_command(
            &format!("Mapping override `{raw}` names no header."),
            Some("ingest"),
        ));
    }
    Ok((field.parse::<CanonicalField>()?, header.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{CanonicalField, auto_map, parse_override};

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn keywords_match_case_insensitively_as_substrings() {
        let mapping = auto_map(&headers(&["Posted Date", "Memo Line", "Gift Value", "Fund Group"]));
        assert_eq!(mapping.get(CanonicalField::Date), Some("Posted Date"));
        assert_eq!(mapping.get(CanonicalField::Description), Some("Memo Line"));
        assert_eq!(mapping.get(CanonicalField::Amount), Some("Gift Value"));
        assert_eq!(mapping.get(CanonicalField::Category), Some("Fund Group"));
        assert_eq!(mapping.get(CanonicalField::Type), None);
        assert!(mapping.missing_required().is_empty());
    }

    #[test]
    fn first_matching_header_wins() {
        let mapping = auto_map(&headers(&["Total", "Amount", "Date Entered", "Date"]));
        assert_eq!(mapping.get(CanonicalField::Amount), Some("Total"));
        assert_eq!(mapping.get(CanonicalField::Date), Some("Date Entered"));
    }

    #[test]
    fn unmatched_required_fields_are_reported() {
        let mapping = auto_map(&headers(&["When", "Payee", "Amount"]));
        assert_eq!(
            mapping.missing_required(),
            vec![CanonicalField::Date, CanonicalField::Description]
        );
    }

    #[test]
    fn overrides_parse_field_and_header() {
        let parsed = parse_override("Amount= Gift (USD) ");
        assert!(parsed.is_ok());
        if let Ok((field, header)) = parsed {
            assert_eq!(field, CanonicalField::Amount);
            assert_eq!(header, "Gift (USD)");
        }
        assert!(parse_override("amount").is_err());
        assert!(parse_override("payee=Payee").is_err());
        assert!(parse_override("date=  ").is_err());
    }
}
