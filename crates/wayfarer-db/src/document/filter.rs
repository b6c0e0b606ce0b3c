//! Document filters
//!
//! A `Filter` is a conjunction of conditions over top-level document fields. The same
//! filter is evaluated in SQL by the Postgres store and in memory by the test store, so
//! the two must agree on semantics.

use serde_json::Value;
use uuid::Uuid;
use wayfarer_core::AppError;

/// Maximum number of conditions allowed per filter
const MAX_CONDITIONS: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `field == value`
    Eq(String, Value),
    /// `lower(field) == lower(value)` for string fields
    EqIgnoreCase(String, String),
    /// String `field`, trimmed and with inner whitespace runs joined by `_`, equals value
    EqUnderscored(String, String),
    /// Array `field` contains `value`
    Contains(String, Value),
    /// Array `field` has a string element starting with the prefix
    ElementPrefix(String, String),
    /// Document id differs
    NotId(Uuid),
    /// At least one of the conditions holds
    Any(Vec<Condition>),
}

impl Condition {
    pub fn matches(&self, id: Uuid, body: &Value) -> bool {
        match self {
            Condition::Eq(field, value) => body.get(field) == Some(value),
            Condition::EqIgnoreCase(field, value) => body
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| s.to_lowercase() == value.to_lowercase()),
            Condition::EqUnderscored(field, value) => body
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| underscored(s) == *value),
            Condition::Contains(field, value) => body
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
            Condition::ElementPrefix(field, prefix) => body
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|s| s.starts_with(prefix.as_str()))
                }),
            Condition::NotId(other) => id != *other,
            Condition::Any(conditions) => conditions.iter().any(|c| c.matches(id, body)),
        }
    }

    fn field(&self) -> Option<&str> {
        match self {
            Condition::Eq(field, _)
            | Condition::EqIgnoreCase(field, _)
            | Condition::EqUnderscored(field, _)
            | Condition::Contains(field, _)
            | Condition::ElementPrefix(field, _) => Some(field),
            Condition::NotId(_) | Condition::Any(_) => None,
        }
    }

    fn size(&self) -> usize {
        match self {
            Condition::Any(conditions) => conditions.iter().map(Condition::size).sum(),
            _ => 1,
        }
    }
}

fn underscored(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("_")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(field.to_string(), value.into()));
        self
    }

    pub fn eq_ignore_case(mut self, field: &str, value: impl Into<String>) -> Self {
        self.conditions
            .push(Condition::EqIgnoreCase(field.to_string(), value.into()));
        self
    }

    pub fn eq_underscored(mut self, field: &str, value: impl Into<String>) -> Self {
        self.conditions
            .push(Condition::EqUnderscored(field.to_string(), value.into()));
        self
    }

    pub fn contains(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Contains(field.to_string(), value.into()));
        self
    }

    pub fn element_prefix(mut self, field: &str, prefix: impl Into<String>) -> Self {
        self.conditions
            .push(Condition::ElementPrefix(field.to_string(), prefix.into()));
        self
    }

    pub fn not_id(mut self, id: Uuid) -> Self {
        self.conditions.push(Condition::NotId(id));
        self
    }

    pub fn any(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions.push(Condition::Any(conditions));
        self
    }

    /// Add `field == value` when a value is present.
    pub fn eq_opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, id: Uuid, body: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(id, body))
    }

    /// Validate field names and filter size
    pub fn validate(&self) -> Result<(), AppError> {
        let count: usize = self.conditions.iter().map(Condition::size).sum();
        if count > MAX_CONDITIONS {
            return Err(AppError::InvalidInput(format!(
                "Too many filter conditions: {} (maximum allowed: {})",
                count, MAX_CONDITIONS
            )));
        }

        fn check(condition: &Condition) -> Result<(), AppError> {
            if let Condition::Any(inner) = condition {
                return inner.iter().try_for_each(check);
            }
            match condition.field() {
                Some(field) => validate_field(field),
                None => Ok(()),
            }
        }
        self.conditions.iter().try_for_each(check)
    }
}

/// Field names are plain camelCase identifiers.
pub fn validate_field(field: &str) -> Result<(), AppError> {
    let valid = !field.is_empty()
        && field.len() <= 64
        && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!("Invalid field name: '{}'", field)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Oldest,
    Newest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub order: SortOrder,
    pub limit: Option<u64>,
    pub offset: u64,
}

impl FindOptions {
    pub fn newest_first() -> Self {
        FindOptions {
            order: SortOrder::Newest,
            ..Default::default()
        }
    }

    pub fn page(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_conditions_match() {
        let id = Uuid::new_v4();
        let body = json!({
            "state": "Goa",
            "images": ["Goa/a.jpg", "Goa/b.jpg"],
            "themeIds": ["t1"],
        });

        assert!(Filter::new().eq("state", "Goa").matches(id, &body));
        assert!(!Filter::new().eq("state", "goa").matches(id, &body));
        assert!(Filter::new().eq_ignore_case("state", "GOA").matches(id, &body));
        assert!(Filter::new().contains("themeIds", "t1").matches(id, &body));
        assert!(!Filter::new().eq_underscored("state", "goa").matches(id, &body));
        assert!(!Filter::new().contains("state", "Goa").matches(id, &body));
        assert!(Filter::new().element_prefix("images", "Goa/").matches(id, &body));
        assert!(!Filter::new().element_prefix("images", "Go/").matches(id, &body));
        assert!(!Filter::new().not_id(id).matches(id, &body));
        assert!(Filter::new().matches(id, &body));
    }

    #[test]
    fn test_any_is_a_disjunction() {
        let id = Uuid::new_v4();
        let body = json!({"state": "Kerala", "images": ["Goa/x.jpg"]});

        let probe = Filter::new().any(vec![
            Condition::Eq("state".to_string(), json!("Goa")),
            Condition::ElementPrefix("images".to_string(), "Goa/".to_string()),
        ]);
        assert!(probe.matches(id, &body));
        assert!(!Filter::new().any(vec![]).matches(id, &body));
    }

    #[test]
    fn test_eq_underscored_collapses_whitespace() {
        let id = Uuid::new_v4();
        let body = json!({"state": " Tamil \t Nadu ", "name": "Tamil_Nadu"});

        assert!(Filter::new().eq_underscored("state", "Tamil_Nadu").matches(id, &body));
        assert!(Filter::new().eq_underscored("name", "Tamil_Nadu").matches(id, &body));
        assert!(!Filter::new().eq_underscored("state", "Tamil Nadu").matches(id, &body));
        assert!(!Filter::new().eq_underscored("missing", "Tamil_Nadu").matches(id, &body));
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        assert!(Filter::new().eq("state", "Goa").validate().is_ok());
        assert!(Filter::new().eq("state'; DROP", "x").validate().is_err());
        assert!(Filter::new()
            .any(vec![Condition::Eq("a->b".to_string(), json!(1))])
            .validate()
            .is_err());
    }
}
