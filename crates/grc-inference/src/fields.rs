//! Field inference over sampled records.
//!
//! Every non-reserved key of every record is a candidate field. Per-record
//! observations are merged: a field is nullable if it was null or missing in
//! any record, active if any record carried a non-empty value, and its
//! length bound is the longest string seen.

use grc_core::entities::FieldDescriptor;
use grc_core::enums::SemanticType;
use grc_core::is_field_key;
use serde_json::Value;

use crate::type_inference::infer_type;

/// Knobs for [`infer_fields_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceOptions {
    /// Keep fields that never carried a value.
    pub include_inactive: bool,
}

/// Infer fields from sample records, dropping inactive fields.
#[must_use]
pub fn infer_fields(records: &[Value]) -> Vec<FieldDescriptor> {
    infer_fields_with(records, InferenceOptions::default())
}

/// Infer fields from sample records.
///
/// Fields are returned in first-seen order. Records that are not JSON
/// objects are skipped. Keys that are empty or reserved (`@...`) never
/// become fields.
#[must_use]
pub fn infer_fields_with(records: &[Value], options: InferenceOptions) -> Vec<FieldDescriptor> {
    let mut fields: Vec<FieldAccumulator> = Vec::new();
    let mut objects = 0usize;

    for record in records {
        let Some(map) = record.as_object() else {
            tracing::debug!("skipping non-object sample record");
            continue;
        };
        objects += 1;

        for (key, value) in map {
            if !is_field_key(key) {
                continue;
            }
            let position = match fields.iter().position(|f| f.name == *key) {
                Some(position) => position,
                None => {
                    fields.push(FieldAccumulator::new(key));
                    fields.len() - 1
                }
            };
            fields[position].observe(value);
        }
    }

    fields
        .into_iter()
        .map(|acc| acc.finish(objects))
        .filter(|field| options.include_inactive || field.is_active)
        .collect()
}

/// Running per-field state while walking a batch.
#[derive(Debug)]
struct FieldAccumulator {
    name: String,
    /// Type of the first non-null, non-empty value seen.
    field_type: Option<SemanticType>,
    observations: usize,
    saw_null: bool,
    active: bool,
    max_length: Option<usize>,
}

impl FieldAccumulator {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: None,
            observations: 0,
            saw_null: false,
            active: false,
            max_length: None,
        }
    }

    fn observe(&mut self, value: &Value) {
        self.observations += 1;
        let inferred = infer_type(value);

        match value {
            Value::Null => {
                self.saw_null = true;
                return;
            }
            // counted, but carries no type evidence
            Value::String(s) if s.is_empty() => {
                if self.max_length.is_none() {
                    self.max_length = Some(0);
                }
                return;
            }
            Value::String(s) => {
                self.active = true;
                if inferred == SemanticType::String {
                    let length = s.chars().count();
                    self.max_length = Some(self.max_length.map_or(length, |m| m.max(length)));
                }
            }
            _ => self.active = true,
        }

        if self.field_type.is_none() {
            self.field_type = Some(inferred);
        }
    }

    /// `records` is the number of object records in the batch; a field seen
    /// in fewer records was missing somewhere and is therefore nullable.
    fn finish(self, records: usize) -> FieldDescriptor {
        let field_type = self.field_type.unwrap_or(SemanticType::String);
        FieldDescriptor {
            name: self.name,
            field_type,
            nullable: self.saw_null || self.observations < records,
            max_length: self.max_length.filter(|_| field_type == SemanticType::String),
            is_active: self.active,
            field_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn single_record_fields() {
        let records = [json!({
            "Status": "Active",
            "Owner": {"Id": 5, "Name": "A"},
            "DueDate": "2024-01-15"
        })];

        let fields = infer_fields(&records);
        let summary: Vec<_> = fields
            .iter()
            .map(|f| (f.name.as_str(), f.field_type, f.is_active))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Status", SemanticType::String, true),
                ("Owner", SemanticType::Reference, true),
                ("DueDate", SemanticType::Date, true),
            ]
        );
        assert_eq!(fields[0].max_length, Some(6));
        assert!(fields[1].max_length.is_none());
        assert!(fields.iter().all(|f| !f.nullable));
    }

    #[test]
    fn inactive_fields_are_filtered_by_default() {
        let records = [json!({"Title": "Vendor risk", "Notes": null, "Comment": ""})];

        let fields = infer_fields(&records);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "Title");

        let all = infer_fields_with(&records, InferenceOptions { include_inactive: true });
        assert_eq!(all.len(), 3);
        let notes = &all[1];
        assert!(notes.nullable);
        assert!(!notes.is_active);
        assert_eq!(notes.field_type, SemanticType::String);
        let comment = &all[2];
        assert!(!comment.nullable);
        assert!(!comment.is_active);
        assert_eq!(comment.max_length, Some(0));
    }

    #[test]
    fn reserved_and_unnamed_keys_are_skipped() {
        let records = [json!({
            "@odata.context": "https://grc.example.com/$metadata#Risks",
            "": "blank",
            "Id": 17
        })];
        let fields = infer_fields(&records);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "Id");
        assert_eq!(fields[0].field_type, SemanticType::Number);
    }

    #[test]
    fn merges_across_records() {
        let records = [
            json!({"Title": "short", "Score": null, "Closed": false}),
            json!({"Title": "a much longer title", "Score": 4}),
            json!({"Title": "mid title", "Score": 9, "Region": "EMEA"}),
        ];

        let fields = infer_fields(&records);
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Title", "Score", "Closed", "Region"]);

        let title = &fields[0];
        assert_eq!(title.max_length, Some(19));
        assert!(!title.nullable);

        let score = &fields[1];
        assert_eq!(score.field_type, SemanticType::Number);
        assert!(score.nullable);
        assert!(score.is_active);

        // missing from later records
        assert!(fields[2].nullable);
        assert_eq!(fields[2].field_type, SemanticType::Boolean);
        // missing from earlier records
        assert!(fields[3].nullable);
    }

    #[test]
    fn first_non_null_type_wins() {
        let records = [
            json!({"Amount": null}),
            json!({"Amount": "12.50"}),
            json!({"Amount": "n/a"}),
        ];
        let fields = infer_fields(&records);
        assert_eq!(fields[0].field_type, SemanticType::Number);
        assert!(fields[0].max_length.is_none());
    }

    #[test]
    fn leading_empty_string_does_not_fix_the_type() {
        let records = [json!({"Score": ""}), json!({"Score": 5}), json!({"Score": 9})];
        let fields = infer_fields(&records);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type, SemanticType::Number);
        assert!(fields[0].max_length.is_none());
        assert!(!fields[0].nullable);
    }

    #[test]
    fn whitespace_keys_are_skipped() {
        let records = [json!({"  ": 3, "Id": 1})];
        let names: Vec<_> = infer_fields(&records).into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Id"]);
    }

    #[test]
    fn non_object_records_are_ignored() {
        let records = [json!("not a record"), json!({"Name": "x"}), json!([1, 2])];
        let fields = infer_fields(&records);
        assert_eq!(fields.len(), 1);
        assert!(!fields[0].nullable);
    }

    #[test]
    fn empty_batch_has_no_fields() {
        assert!(infer_fields(&[]).is_empty());
    }
}
