//! REDCap data dictionary entries

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field types whose choices column holds `code, label | ...` pairs
const CHOICE_TYPES: &[&str] = &["checkbox", "radio", "dropdown"];

/// One row of a REDCap metadata export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMetadata {
    pub field_name: String,
    pub form_name: String,
    pub section_header: String,
    pub field_type: String,
    pub field_label: String,
    #[serde(rename = "select_choices_or_calculations")]
    pub choices: String,
    pub field_note: String,
    #[serde(rename = "text_validation_type_or_show_slider_number")]
    pub validation: String,
    #[serde(rename = "text_validation_min")]
    pub validation_min: String,
    #[serde(rename = "text_validation_max")]
    pub validation_max: String,
    pub identifier: String,
    pub branching_logic: String,
    pub required_field: String,
    pub field_annotation: String,
}

/// A coded answer of a choice field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub code: String,
    pub label: String,
}

/// Compact description of a field with empty attributes dropped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub form: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub section: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub note: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub validation: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub branching: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub identifier: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
}

impl FieldMetadata {
    /// Parsed choices for checkbox/radio/dropdown fields, empty otherwise
    pub fn parsed_choices(&self) -> Vec<Choice> {
        if CHOICE_TYPES.contains(&self.field_type.as_str()) {
            parse_choices(&self.choices)
        } else {
            Vec::new()
        }
    }

    pub fn definition(&self) -> FieldDefinition {
        FieldDefinition {
            form: self.form_name.clone(),
            field_type: self.field_type.clone(),
            label: self.field_label.trim().to_string(),
            section: self.section_header.trim().to_string(),
            note: self.field_note.trim().to_string(),
            validation: self.validation.clone(),
            branching: self.branching_logic.trim().to_string(),
            required: self.required_field == "y",
            identifier: self.identifier == "y",
            choices: self.parsed_choices(),
        }
    }
}

/// Parse `1, Male | 2, Female` into coded choices
///
/// Labels may themselves contain commas; only the first comma of each
/// segment separates code from label. Segments without a comma are skipped.
pub fn parse_choices(raw: &str) -> Vec<Choice> {
    raw.split('|')
        .filter_map(|segment| {
            let (code, label) = segment.split_once(',')?;
            let code = code.trim();
            (!code.is_empty()).then(|| Choice {
                code: code.to_string(),
                label: label.trim().to_string(),
            })
        })
        .collect()
}

/// Data dictionary keyed by field name
pub fn dictionary(fields: &[FieldMetadata]) -> BTreeMap<String, FieldDefinition> {
    fields
        .iter()
        .map(|f| (f.field_name.clone(), f.definition()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(code: &str, label: &str) -> Choice {
        Choice {
            code: code.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn parses_pipe_separated_choices() {
        assert_eq!(
            parse_choices("1, Male | 2, Female"),
            vec![choice("1", "Male"), choice("2", "Female")]
        );
    }

    #[test]
    fn label_keeps_inner_commas() {
        assert_eq!(
            parse_choices("0, No, never|1,Yes"),
            vec![choice("0", "No, never"), choice("1", "Yes")]
        );
    }

    #[test]
    fn skips_malformed_segments() {
        assert_eq!(parse_choices("garbage | 3, Ok | , empty"), vec![choice("3", "Ok")]);
        assert!(parse_choices("").is_empty());
    }

    #[test]
    fn metadata_deserializes_from_export() {
        let json = r#"{
            "field_name": "sex",
            "form_name": "demographics",
            "field_type": "radio",
            "field_label": "Sex ",
            "select_choices_or_calculations": "1, M | 2, F",
            "required_field": "y",
            "matrix_group_name": ""
        }"#;
        let field: FieldMetadata = serde_json::from_str(json).unwrap();
        let def = field.definition();

        assert_eq!(def.label, "Sex");
        assert!(def.required);
        assert_eq!(def.choices, vec![choice("1", "M"), choice("2", "F")]);
    }

    #[test]
    fn calc_fields_have_no_choices() {
        let field = FieldMetadata {
            field_name: "bmi".to_string(),
            field_type: "calc".to_string(),
            choices: "[weight]/([height]*[height])".to_string(),
            ..Default::default()
        };
        assert!(field.parsed_choices().is_empty());
    }

    #[test]
    fn dictionary_drops_empty_attributes() {
        let fields = vec![FieldMetadata {
            field_name: "record_id".to_string(),
            form_name: "demographics".to_string(),
            field_type: "text".to_string(),
            ..Default::default()
        }];
        let dict = dictionary(&fields);
        let json = serde_json::to_value(&dict).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"record_id": {"form": "demographics", "type": "text"}})
        );
    }
}
