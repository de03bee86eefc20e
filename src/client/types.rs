use std::fmt;
use std::str::FromStr;

/// Meal slot accepted by the Mealie write endpoints.
///
/// Reads are lenient (the server may return arbitrary `entryType` strings,
/// which the renderers bucket as-is), but every write validates against
/// this set before any request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Breakfast,
    Lunch,
    Dinner,
    Side,
    Snack,
}

impl EntryType {
    pub const ALL: [EntryType; 5] = [
        EntryType::Breakfast,
        EntryType::Lunch,
        EntryType::Dinner,
        EntryType::Side,
        EntryType::Snack,
    ];

    /// Lowercase wire form, as Mealie expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Breakfast => "breakfast",
            EntryType::Lunch => "lunch",
            EntryType::Dinner => "dinner",
            EntryType::Side => "side",
            EntryType::Snack => "snack",
        }
    }

    pub fn valid_values() -> String {
        EntryType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(EntryType::Breakfast),
            "lunch" => Ok(EntryType::Lunch),
            "dinner" => Ok(EntryType::Dinner),
            "side" => Ok(EntryType::Side),
            "snack" => Ok(EntryType::Snack),
            other => Err(format!(
                "Invalid entry_type '{}'. Must be one of: {}",
                other,
                EntryType::valid_values()
            )),
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker callers pass to clear an optional field during an update.
pub const CLEAR_MARKER: &str = "__CLEAR__";

/// Three-state update for an optional remote field.
///
/// Update tools take plain optional strings; absence means "leave alone",
/// the [`CLEAR_MARKER`] sentinel means "null it out", anything else is a
/// new value. Distinct from `Option<Option<T>>` on purpose: the tool
/// argument surface stays flat strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Unset,
    Clear,
    Value(String),
}

impl FieldUpdate {
    pub fn from_param(param: Option<String>) -> Self {
        match param {
            None => FieldUpdate::Unset,
            Some(s) if s == CLEAR_MARKER => FieldUpdate::Clear,
            Some(s) => FieldUpdate::Value(s),
        }
    }

    /// Apply to a JSON payload: `Unset` keeps whatever is there, `Clear`
    /// writes an explicit null, `Value` writes the new string.
    pub fn apply(&self, payload: &mut serde_json::Map<String, serde_json::Value>, key: &str) {
        match self {
            FieldUpdate::Unset => {}
            FieldUpdate::Clear => {
                payload.insert(key.to_string(), serde_json::Value::Null);
            }
            FieldUpdate::Value(v) => {
                payload.insert(key.to_string(), serde_json::Value::String(v.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_type_parses_case_insensitively() {
        assert_eq!("DINNER".parse::<EntryType>(), Ok(EntryType::Dinner));
        assert_eq!("Breakfast".parse::<EntryType>(), Ok(EntryType::Breakfast));
    }

    #[test]
    fn entry_type_rejects_unknown_slots() {
        let err = "brunch".parse::<EntryType>().unwrap_err();
        assert!(err.contains("brunch"));
        assert!(err.contains("breakfast"));
    }

    #[test]
    fn field_update_distinguishes_absent_clear_and_value() {
        assert_eq!(FieldUpdate::from_param(None), FieldUpdate::Unset);
        assert_eq!(
            FieldUpdate::from_param(Some(CLEAR_MARKER.to_string())),
            FieldUpdate::Clear
        );
        assert_eq!(
            FieldUpdate::from_param(Some("pasta night".to_string())),
            FieldUpdate::Value("pasta night".to_string())
        );
    }

    #[test]
    fn apply_leaves_unset_fields_alone() {
        let mut payload = serde_json::Map::new();
        payload.insert("title".to_string(), serde_json::json!("old"));

        FieldUpdate::Unset.apply(&mut payload, "title");
        assert_eq!(payload["title"], serde_json::json!("old"));

        FieldUpdate::Clear.apply(&mut payload, "title");
        assert_eq!(payload["title"], serde_json::Value::Null);
    }
}
