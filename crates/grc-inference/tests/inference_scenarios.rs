//! End-to-end inference and validation over realistic record batches.

use grc_core::entities::ApplicationSchema;
use grc_core::enums::{SchemaSource, SemanticType};
use grc_inference::{infer_fields, infer_type, validate};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn risk_records() -> Vec<Value> {
    vec![
        json!({
            "@odata.context": "https://grc.example.com/contentapi/$metadata#Risks",
            "Risk_Id": 1001,
            "Status": "Active",
            "Owner": {"Id": 5, "Name": "A"},
            "DueDate": "2024-01-15",
            "Inherent_Score": "12",
            "Accepted": "false",
            "Retired_Notes": null
        }),
        json!({
            "Risk_Id": 1002,
            "Status": "Closed",
            "Owner": {"Id": 8, "Name": "B"},
            "DueDate": "2024-03-01T00:00:00Z",
            "Inherent_Score": "4",
            "Accepted": "TRUE",
            "Retired_Notes": null
        }),
    ]
}

#[test]
fn sample_record_yields_three_typed_fields() {
    let records = [json!({
        "Status": "Active",
        "Owner": {"Id": 5, "Name": "A"},
        "DueDate": "2024-01-15"
    })];

    let fields = infer_fields(&records);
    assert_eq!(fields.len(), 3);
    assert!(fields.iter().all(|f| f.is_active));
    assert_eq!(
        fields.iter().map(|f| f.field_type).collect::<Vec<_>>(),
        vec![SemanticType::String, SemanticType::Reference, SemanticType::Date]
    );
}

#[test]
fn inferred_schema_validates_cleanly_against_its_own_batch() {
    let records = risk_records();
    let fields = infer_fields(&records);
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Risk_Id", "Status", "Owner", "DueDate", "Inherent_Score", "Accepted"]
    );

    let schema =
        ApplicationSchema::new(75, "Risks", "Risks", fields, SchemaSource::Sample).unwrap();
    let report = validate(&schema, &records);

    assert!(report.data_type_mismatches.is_empty());
    assert!(report.extra_schema_fields.is_empty());
    // dropped as inactive at inference time, still present in the data
    assert_eq!(report.missing_schema_fields, vec!["Retired_Notes"]);
}

#[test]
fn missing_and_extra_are_disjoint() {
    let records = risk_records();
    let schema = ApplicationSchema::new(
        75,
        "Risks",
        "Risks",
        infer_fields(&records[..1]),
        SchemaSource::Sample,
    )
    .unwrap();
    let drifted = vec![json!({"Risk_Id": 1, "Severity": "High"})];

    let report = validate(&schema, &drifted);
    for name in &report.missing_schema_fields {
        assert!(!report.extra_schema_fields.contains(name));
    }
    assert_eq!(report.missing_schema_fields, vec!["Severity"]);
    assert!(report.extra_schema_fields.contains(&"Status".to_string()));
}

#[test]
fn scored_field_with_word_value_is_flagged_once() {
    let schema = ApplicationSchema::new(
        75,
        "Risks",
        "Risks",
        vec![grc_core::entities::FieldDescriptor::new(
            "Score",
            SemanticType::Number,
        )],
        SchemaSource::Metadata,
    )
    .unwrap();
    let records = [json!({"Score": 7}), json!({"Score": "seven"})];

    let report = validate(&schema, &records);
    assert_eq!(report.data_type_mismatches.len(), 1);
    let example = &report.data_type_mismatches[0].examples[0];
    assert_eq!(example.record_index, 1);
    assert_eq!(example.value, "seven");
}

#[test]
fn date_patterns_take_precedence_over_numbers() {
    for date in ["2024-01-15", "01/15/2024", "01-15-2024", "2024-01-15T08:00:00Z"] {
        assert_eq!(infer_type(&json!(date)), SemanticType::Date, "{date}");
    }
    for number in ["2024", "15", "0.5", "-12"] {
        assert_eq!(infer_type(&json!(number)), SemanticType::Number, "{number}");
    }
}

#[test]
fn empty_strings_and_blank_keys_do_not_cause_self_drift() {
    let records = vec![
        json!({"": "untitled", "Score": "", "Title": "Phishing"}),
        json!({"Score": 5, "Title": "Outage"}),
        json!({"Score": 9, "Title": ""}),
    ];

    let fields = infer_fields(&records);
    let summary: Vec<_> = fields.iter().map(|f| (f.name.as_str(), f.field_type)).collect();
    assert_eq!(
        summary,
        vec![("Score", SemanticType::Number), ("Title", SemanticType::String)]
    );

    let schema =
        ApplicationSchema::new(21, "Incidents", "Incidents", fields, SchemaSource::Sample).unwrap();
    let report = validate(&schema, &records);
    assert!(report.missing_schema_fields.is_empty());
    assert!(report.extra_schema_fields.is_empty());
    assert!(report.data_type_mismatches.is_empty());
    assert!(!report.has_drift());
    assert_eq!(report.coverage("Score").unwrap().empty_count, 1);
}
