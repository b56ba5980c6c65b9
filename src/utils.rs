use std::borrow::Cow;
use std::num::ParseIntError;

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueMap, ValueNumber, ValueString};
use tf_provider::{AttributePath, Diagnostics};

use crate::client::ApiError;
use crate::model::Variables;

pub(crate) trait WithSchema {
    fn schema() -> Schema;
}

/// Read-only string attribute
pub(crate) fn computed_string(description: &str) -> Attribute {
    Attribute {
        attr_type: AttributeType::String,
        description: Description::plain(description),
        constraint: AttributeConstraint::Computed,
        ..Default::default()
    }
}

/// Format an API id the way it is stored in Terraform state
pub fn id_to_string(id: i64) -> String {
    id.to_string()
}

/// Parse an id stored in Terraform state
pub fn parse_id(id: &str) -> Result<i64, ParseIntError> {
    id.trim().parse()
}

/// Convert an id the API returned as a float
///
/// Returns [`None`] if the float is not integral.
pub fn float_to_id(id: f64) -> Option<i64> {
    if id.is_finite() && id.fract() == 0.0 && id.abs() < i64::MAX as f64 {
        Some(id as i64)
    } else {
        None
    }
}

/// Read an id attribute that must be set
pub(crate) fn required_id(
    diags: &mut Diagnostics,
    value: &ValueString,
    attribute: &'static str,
) -> Option<i64> {
    match value {
        Value::Value(id) => match parse_id(id) {
            Ok(id) => Some(id),
            Err(err) => {
                diags.error(
                    format!("Invalid `{attribute}`"),
                    format!("`{id}` is not a valid id: {err}"),
                    AttributePath::new(attribute),
                );
                None
            }
        },
        Value::Null => {
            diags.error_short(format!("`{attribute}` is required"), AttributePath::new(attribute));
            None
        }
        Value::Unknown => {
            diags.error_short(format!("`{attribute}` is not known yet"), AttributePath::new(attribute));
            None
        }
    }
}

/// Read a number attribute that must be set
pub(crate) fn required_number(
    diags: &mut Diagnostics,
    value: &ValueNumber,
    attribute: &'static str,
) -> Option<i64> {
    match value {
        Value::Value(n) => Some(*n),
        Value::Null => {
            diags.error_short(format!("`{attribute}` is required"), AttributePath::new(attribute));
            None
        }
        Value::Unknown => {
            diags.error_short(format!("`{attribute}` is not known yet"), AttributePath::new(attribute));
            None
        }
    }
}

/// Read an id attribute that can be null
///
/// Returns `Some(None)` when the attribute is null.
pub(crate) fn optional_id(
    diags: &mut Diagnostics,
    value: &ValueString,
    attribute: &'static str,
) -> Option<Option<i64>> {
    if value.is_null() {
        Some(None)
    } else {
        required_id(diags, value, attribute).map(Some)
    }
}

/// Check a known id attribute is parseable, ignoring null and unknown values
pub(crate) fn validate_id(diags: &mut Diagnostics, value: &ValueString, attribute: &'static str) {
    if value.is_value() {
        _ = required_id(diags, value, attribute);
    }
}

pub(crate) fn optional_id_to_value<'a>(id: Option<i64>) -> ValueString<'a> {
    match id {
        Some(id) => ValueString::from(id_to_string(id)),
        None => Value::Null,
    }
}

/// String attribute, empty if null or unknown
pub(crate) fn string(value: &ValueString) -> String {
    value.as_deref_option().unwrap_or_default().to_owned()
}

/// Non-empty string attribute
pub(crate) fn optional_string(value: &ValueString) -> Option<String> {
    value
        .as_deref_option()
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

pub(crate) fn flag(value: &ValueBool, default: bool) -> bool {
    value.as_ref_option().copied().unwrap_or(default)
}

/// Collect the known entries of a Terraform map of strings
pub(crate) fn variables(map: &ValueMap<'_, ValueString<'_>>) -> Variables {
    map.iter()
        .flatten()
        .filter_map(|(k, v)| Some((k.to_string(), v.as_deref_option()?.to_owned())))
        .collect()
}

/// Convert a map returned by the API back to a Terraform map
///
/// An empty map stays null if it was null before, to avoid spurious diffs.
pub(crate) fn variables_to_map<'a>(
    prior: &ValueMap<'_, ValueString<'_>>,
    variables: Variables,
) -> ValueMap<'a, ValueString<'a>> {
    if variables.is_empty() && prior.is_null() {
        Value::Null
    } else {
        Value::Value(
            variables
                .into_iter()
                .map(|(k, v)| (Cow::Owned(k), Value::Value(Cow::Owned(v))))
                .collect(),
        )
    }
}

/// Record an API error as a diagnostic
pub(crate) fn report<S: Into<Cow<'static, str>>>(diags: &mut Diagnostics, summary: S, err: &ApiError) {
    diags.root_error(summary, err.to_string());
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn float_ids_format_without_fraction() {
        assert_eq!(float_to_id(42.0).map(id_to_string), Some("42".to_owned()));
        assert_eq!(float_to_id(42.5), None);
        assert_eq!(float_to_id(f64::NAN), None);
        assert_eq!(parse_id(&id_to_string(42)), Ok(42));
    }

    #[test]
    fn required_id_reports_attribute() {
        let mut diags = Diagnostics::default();
        assert_eq!(required_id(&mut diags, &ValueString::from("12"), "site_id"), Some(12));
        assert!(diags.errors.is_empty());

        assert_eq!(required_id(&mut diags, &ValueString::from("twelve"), "site_id"), None);
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].attribute, AttributePath::new("site_id"));

        assert_eq!(required_id(&mut diags, &Value::Null, "site_id"), None);
        assert_eq!(diags.errors.len(), 2);
    }

    #[test]
    fn required_number_rejects_unknown() {
        let mut diags = Diagnostics::default();
        assert_eq!(required_number(&mut diags, &Value::Value(3), "instance_count"), Some(3));
        assert_eq!(required_number(&mut diags, &Value::Unknown, "instance_count"), None);
        assert_eq!(diags.errors[0].attribute, AttributePath::new("instance_count"));
    }

    #[test]
    fn optional_id_accepts_null() {
        let mut diags = Diagnostics::default();
        assert_eq!(optional_id(&mut diags, &Value::Null, "os_template_id"), Some(None));
        assert_eq!(optional_id(&mut diags, &ValueString::from("3"), "os_template_id"), Some(Some(3)));
        assert_eq!(optional_id(&mut diags, &ValueString::from("x"), "os_template_id"), None);
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn validate_id_ignores_unknown() {
        let mut diags = Diagnostics::default();
        validate_id(&mut diags, &Value::Unknown, "fabric_id");
        validate_id(&mut diags, &Value::Null, "fabric_id");
        assert!(diags.errors.is_empty());
        validate_id(&mut diags, &ValueString::from("1.5"), "fabric_id");
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn empty_variables_stay_null() {
        let null: ValueMap<'_, ValueString<'_>> = Value::Null;
        assert!(variables_to_map(&null, Variables::new()).is_null());

        let empty: ValueMap<'_, ValueString<'_>> = Value::Value(BTreeMap::new());
        assert_eq!(variables_to_map(&empty, Variables::new()), Value::Value(BTreeMap::new()));

        let map = variables_to_map(&null, [("a".to_owned(), "b".to_owned())].into());
        assert_eq!(variables(&map), [("a".to_owned(), "b".to_owned())].into());
    }

    #[test]
    fn unknown_entries_are_skipped() {
        let map: ValueMap<'_, ValueString<'_>> = Value::Value(
            [
                (Cow::from("known"), ValueString::from("1")),
                (Cow::from("unknown"), Value::Unknown),
            ]
            .into(),
        );
        assert_eq!(variables(&map), [("known".to_owned(), "1".to_owned())].into());
    }
}
