use std::collections::HashSet;

use serde_json::Value;

use crate::entities::{Item, NumericValue};
use crate::error::{ValidationIssue, ValidationReason};

/// Tracks names already emitted so duplicates can be reported against the
/// later occurrence.
#[derive(Debug, Default)]
pub struct ItemValidator {
    seen: HashSet<String>,
}

impl ItemValidator {
    /// Checks one item. Accepted names are remembered; a rejected item does
    /// not claim its name.
    pub fn check(&mut self, index: usize, item: &Item) -> Result<(), ValidationIssue> {
        let name = item.name.trim();
        let issue = |reason| ValidationIssue {
            index,
            name: name.to_string(),
            reason,
        };
        if name.is_empty() {
            return Err(issue(ValidationReason::MissingName));
        }
        if item.label.trim().is_empty() {
            return Err(issue(ValidationReason::MissingLabel));
        }
        if let Some(field) = invalid_number_field(item) {
            return Err(issue(ValidationReason::InvalidNumber {
                field: field.to_string(),
            }));
        }
        if let Some(client) = &item.client {
            if let Some((key, _)) = client
                .status
                .iter()
                .find(|(_, value)| matches!(value, Value::Array(_) | Value::Object(_)))
            {
                return Err(issue(ValidationReason::NonScalarStatus { key: key.clone() }));
            }
        }
        if !self.seen.insert(name.to_string()) {
            return Err(issue(ValidationReason::DuplicateName));
        }
        Ok(())
    }
}

fn invalid_number_field(item: &Item) -> Option<&'static str> {
    let usetime = item.client.as_ref().and_then(|client| client.usetime.as_ref());
    [
        ("weight", item.weight.as_ref()),
        ("degrade", item.degrade.as_ref()),
        ("consume", item.consume.as_ref()),
        ("client.usetime", usetime),
    ]
    .into_iter()
    .find(|(_, value)| value.is_some_and(NumericValue::is_invalid))
    .map(|(field, _)| field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ClientData;
    use serde_json::json;

    #[test]
    fn missing_fields_are_reported() {
        let mut validator = ItemValidator::default();
        let err = validator.check(0, &Item::new(" ", "Thing")).expect_err("no name");
        assert_eq!(err.reason, ValidationReason::MissingName);
        let err = validator.check(1, &Item::new("thing", "")).expect_err("no label");
        assert_eq!(err.reason, ValidationReason::MissingLabel);
        assert_eq!(err.index, 1);
        assert_eq!(err.name, "thing");
    }

    #[test]
    fn duplicate_names_flag_the_later_item() {
        let mut validator = ItemValidator::default();
        assert!(validator.check(0, &Item::new("bread", "Bread")).is_ok());
        let err = validator
            .check(3, &Item::new("bread", "Bread Again"))
            .expect_err("duplicate");
        assert_eq!(err.reason, ValidationReason::DuplicateName);
        assert_eq!(err.index, 3);
    }

    #[test]
    fn rejected_item_does_not_claim_name() {
        let mut validator = ItemValidator::default();
        assert!(validator.check(0, &Item::new("bread", "")).is_err());
        assert!(validator.check(1, &Item::new("bread", "Bread")).is_ok());
    }

    #[test]
    fn structured_status_values_are_rejected() {
        let mut item = Item::new("pill", "Pill");
        let mut client = ClientData::default();
        client.status.insert("stress".to_string(), json!(-10));
        client.status.insert("effects".to_string(), json!({ "speed": 2 }));
        item.client = Some(client);
        let err = ItemValidator::default().check(0, &item).expect_err("object status");
        assert_eq!(
            err.reason,
            ValidationReason::NonScalarStatus {
                key: "effects".to_string()
            }
        );
    }

    #[test]
    fn unparseable_numbers_are_reported() {
        let item: Item = serde_json::from_value(json!({
            "name": "bandage",
            "label": "Bandage",
            "client": { "usetime": "2.5s" }
        }))
        .expect("item");
        let err = ItemValidator::default().check(0, &item).expect_err("bad usetime");
        assert_eq!(
            err.reason,
            ValidationReason::InvalidNumber {
                field: "client.usetime".to_string()
            }
        );
    }
}
