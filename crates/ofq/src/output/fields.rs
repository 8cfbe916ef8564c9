//! Known-field output formatting.

use omnifocus_filter_rs::filter::fields::FieldDef;
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output structure for the fields command.
#[derive(Serialize)]
pub struct FieldsListOutput<'a> {
    pub fields: Vec<FieldOutput<'a>>,
}

/// JSON output structure for a single field.
#[derive(Serialize)]
pub struct FieldOutput<'a> {
    pub path: &'a str,
    pub kind: &'a str,
    pub synthetic: bool,
    pub description: &'a str,
}

/// Formats fields as JSON.
pub fn format_fields_json(fields: &[FieldDef]) -> Result<String, serde_json::Error> {
    let output = FieldsListOutput {
        fields: fields
            .iter()
            .map(|f| FieldOutput {
                path: f.path,
                kind: f.kind.as_str(),
                synthetic: f.is_synthetic(),
                description: f.description,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats fields as a table. Synthetic fields are marked with `*`.
pub fn format_fields_table(fields: &[FieldDef], use_colors: bool) -> String {
    let mut output = String::new();

    let header = format!("{:<24} {:<8} {:<2} {}", "Field", "Kind", "", "Description");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for field in fields {
        let marker = if field.is_synthetic() { "*" } else { " " };
        let path = format!("{:<24}", field.path);
        let path = if use_colors {
            path.bold().to_string()
        } else {
            path
        };
        output.push_str(&format!(
            "{} {:<8} {:<2} {}\n",
            path,
            field.kind.as_str(),
            marker,
            field.description
        ));
    }

    output.push_str("\n* expanded per dialect at emission time\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnifocus_filter_rs::filter::fields::{lookup_field, KNOWN_FIELDS};

    #[test]
    fn test_table_marks_synthetic_fields() {
        let table = format_fields_table(KNOWN_FIELDS, false);
        let dropped = table
            .lines()
            .find(|l| l.starts_with("task.dropped "))
            .unwrap();
        assert!(dropped.contains(" * "));

        let name = table.lines().find(|l| l.starts_with("task.name ")).unwrap();
        assert!(!name.contains(" * "));
    }

    #[test]
    fn test_table_has_row_per_field() {
        let table = format_fields_table(KNOWN_FIELDS, false);
        for field in KNOWN_FIELDS {
            assert!(table.contains(field.path), "missing {}", field.path);
        }
    }

    #[test]
    fn test_json_output() {
        let field = *lookup_field("task.dueDate").unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&format_fields_json(&[field]).unwrap()).unwrap();
        assert_eq!(json["fields"][0]["path"], "task.dueDate");
        assert_eq!(json["fields"][0]["kind"], "date");
        assert_eq!(json["fields"][0]["synthetic"], false);
    }
}
