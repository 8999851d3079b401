//! Flat-to-hierarchical result assembly.
//!
//! A JOIN flattens one logical record into several rows (cartesian expansion
//! over its one-to-many children) and mangles related columns into prefixed
//! names (`CLIENTS_NAME`). This module reverses that: rows are grouped by the
//! primary key, prefixed columns are folded back into nested child objects,
//! and children repeated by the expansion are deduplicated.
//!
//! The whole pass is pure and in-memory; degenerate inputs degrade to the
//! flat form instead of erroring.

use crate::case::{pluralize, to_camel_case};
use crate::relation::{Cardinality, Relationship};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Outcome of an assembly attempt. `Flat` means the input should be returned
/// unchanged (no rows, or no relationships to nest by).
#[derive(Debug, PartialEq)]
pub enum Assembled {
    Hierarchical(Vec<Value>),
    Flat,
}

/// Extract the related-table columns of one row into a child object.
///
/// Columns match on the literal `PREFIX_` boundary, case-insensitively, so a
/// table named `ITEM` never captures `ITEM_DETAIL_*` columns. Returns `None`
/// when no column carries the prefix — an outer-join row with no related
/// record, as opposed to a related record whose fields are all null.
pub fn extract_child(row: &Map<String, Value>, prefix: &str) -> Option<Map<String, Value>> {
    let mut child = Map::new();
    for (key, value) in row {
        if let Some(suffix) = strip_prefix_ci(key, prefix) {
            child.insert(to_camel_case(suffix), value.clone());
        }
    }
    if child.is_empty() {
        None
    } else {
        Some(child)
    }
}

fn strip_prefix_ci<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    let head = key.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let suffix = key.get(prefix.len()..)?.strip_prefix('_')?;
    if suffix.is_empty() {
        None
    } else {
        Some(suffix)
    }
}

/// Group rows by the value of `pk_field`, preserving first-occurrence order.
/// Rows missing the key fall into a shared null-keyed group; an empty
/// `pk_field` leaves all rows in one group (grouping is undefined without a
/// declared key).
pub fn group_rows<'a>(rows: &'a [Map<String, Value>], pk_field: &str) -> Vec<Vec<&'a Map<String, Value>>> {
    let mut groups: Vec<Vec<&Map<String, Value>>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let key = if pk_field.is_empty() {
            String::new()
        } else {
            row.get(pk_field).unwrap_or(&Value::Null).to_string()
        };
        match index.get(&key) {
            Some(&i) => groups[i].push(row),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![row]);
            }
        }
    }
    groups
}

/// Reassembles flat JOIN rows into one nested document per primary-key value.
pub struct Assembler {
    pk_field: String,
    fields: Vec<String>,
    relationships: Vec<Relationship>,
}

impl Assembler {
    pub fn new(pk_field: impl Into<String>, fields: Vec<String>, relationships: Vec<Relationship>) -> Self {
        Assembler {
            pk_field: pk_field.into(),
            fields,
            relationships,
        }
    }

    /// Build the hierarchical documents. Each group's first row supplies the
    /// primary fields and many-to-one children; one-to-many children are
    /// collected across the whole group and deduplicated. Absent and null
    /// field values are omitted, as are empty child arrays.
    pub fn assemble(&self, rows: &[Map<String, Value>]) -> Assembled {
        if rows.is_empty() || self.relationships.is_empty() {
            return Assembled::Flat;
        }
        let (to_many, to_one): (Vec<&Relationship>, Vec<&Relationship>) = self
            .relationships
            .iter()
            .partition(|r| r.cardinality == Cardinality::OneToMany);

        let docs = group_rows(rows, &self.pk_field)
            .into_iter()
            .map(|group| {
                let first = group[0];
                let mut doc = Map::new();
                for field in &self.fields {
                    if let Some(v) = first.get(field) {
                        if !v.is_null() {
                            doc.insert(to_camel_case(field), v.clone());
                        }
                    }
                }
                for rel in &to_one {
                    if let Some(child) = extract_child(first, &rel.target_table) {
                        doc.insert(to_camel_case(&rel.target_table), Value::Object(child));
                    }
                }
                for rel in &to_many {
                    let children = collect_children(&group, &rel.target_table);
                    if !children.is_empty() {
                        doc.insert(pluralize(&to_camel_case(&rel.target_table)), Value::Array(children));
                    }
                }
                Value::Object(doc)
            })
            .collect();
        Assembled::Hierarchical(docs)
    }
}

/// Extract one child per row of a group and drop the repeats introduced by the
/// join's cartesian expansion. The dedup key is the first child field whose
/// name ends in "id"; children without such a field are all kept.
fn collect_children(group: &[&Map<String, Value>], prefix: &str) -> Vec<Value> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for row in group {
        let Some(child) = extract_child(row, prefix) else {
            continue;
        };
        let dedup_key = child
            .iter()
            .find(|(name, _)| name.to_lowercase().ends_with("id"))
            .map(|(_, v)| v.to_string());
        if let Some(key) = dedup_key {
            if !seen.insert(key) {
                continue;
            }
        }
        out.push(Value::Object(child));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{parse_relationships, parse_relationships_with, Cardinality, Classifier};
    use serde_json::json;

    fn row(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn extract_child_strips_prefix_and_camel_cases() {
        let r = row(json!({"ID": 1, "CLIENTS_FIRST_NAME": "Ann", "CLIENTS_ID": 7}));
        let child = extract_child(&r, "CLIENTS").unwrap();
        assert_eq!(child.get("firstName"), Some(&json!("Ann")));
        assert_eq!(child.get("id"), Some(&json!(7)));
        assert_eq!(child.len(), 2);
    }

    #[test]
    fn extract_child_is_case_insensitive() {
        let r = row(json!({"clients_Name": "Ann"}));
        let child = extract_child(&r, "CLIENTS").unwrap();
        assert_eq!(child.get("name"), Some(&json!("Ann")));
    }

    #[test]
    fn extract_child_anchors_on_prefix_boundary() {
        let r = row(json!({"ITEM_DETAIL_CODE": "x", "ITEM_NAME": "bolt"}));
        let child = extract_child(&r, "ITEM").unwrap();
        // ITEM must not capture ITEM_DETAIL_* — only the exact ITEM_ prefix
        assert_eq!(child.get("name"), Some(&json!("bolt")));
        assert_eq!(child.get("detailCode"), Some(&json!("x")));
        let detail = extract_child(&r, "ITEM_DETAIL").unwrap();
        assert_eq!(detail.get("code"), Some(&json!("x")));
        assert_eq!(detail.len(), 1);
    }

    #[test]
    fn extract_child_none_when_no_prefixed_column() {
        let r = row(json!({"ID": 1, "DATE": "2024-01-01"}));
        assert!(extract_child(&r, "CLIENTS").is_none());
    }

    #[test]
    fn null_child_fields_are_kept() {
        // all-null related record is still a record; absence of the columns is
        // the no-child signal, not null values
        let r = row(json!({"CLIENTS_NAME": null}));
        let child = extract_child(&r, "CLIENTS").unwrap();
        assert_eq!(child.get("name"), Some(&Value::Null));
    }

    #[test]
    fn group_rows_stable_first_occurrence_order() {
        let rows = vec![
            row(json!({"ID": 2})),
            row(json!({"ID": 1})),
            row(json!({"ID": 2})),
        ];
        let groups = group_rows(&rows, "ID");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0][0].get("ID"), Some(&json!(2)));
        assert_eq!(groups[1][0].get("ID"), Some(&json!(1)));
    }

    #[test]
    fn rows_missing_key_share_a_null_group() {
        let rows = vec![
            row(json!({"ID": 1})),
            row(json!({"OTHER": 1})),
            row(json!({"OTHER": 2})),
        ];
        let groups = group_rows(&rows, "ID");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].len(), 2);
    }

    #[test]
    fn empty_pk_field_groups_everything_together() {
        let rows = vec![row(json!({"ID": 1})), row(json!({"ID": 2}))];
        let groups = group_rows(&rows, "");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    fn orders_assembler() -> Assembler {
        // CLIENTS pinned many-to-one: the heuristic alone would misread the
        // ID_ prefix
        let classifier = Classifier::new().with_override("CLIENTS", Cardinality::ManyToOne);
        Assembler::new(
            "ID",
            vec!["ID".into(), "DATE".into()],
            parse_relationships_with("CLIENTS:ID_CLIENT:ID;ITEMS:ID_ORDER:ID", &classifier),
        )
    }

    #[test]
    fn assemble_nests_object_and_array_children() {
        let rows = vec![
            row(json!({"ID": 1, "DATE": "2024-03-01", "CLIENTS_NAME": "Ann", "ITEMS_NAME": "bolt", "ITEMS_ID": 10})),
            row(json!({"ID": 1, "DATE": "2024-03-01", "CLIENTS_NAME": "Ann", "ITEMS_NAME": "nut", "ITEMS_ID": 11})),
        ];
        let Assembled::Hierarchical(docs) = orders_assembler().assemble(&rows) else {
            panic!("expected hierarchical outcome");
        };
        assert_eq!(docs.len(), 1);
        assert_eq!(
            docs[0],
            json!({
                "id": 1,
                "date": "2024-03-01",
                "clients": {"name": "Ann"},
                "items": [{"name": "bolt", "id": 10}, {"name": "nut", "id": 11}]
            })
        );
    }

    #[test]
    fn assemble_dedups_repeated_children_by_id_field() {
        let rows = vec![
            row(json!({"ID": 1, "DATE": "d", "ITEMS_NAME": "bolt", "ITEMS_ID": 10})),
            row(json!({"ID": 1, "DATE": "d", "ITEMS_NAME": "bolt", "ITEMS_ID": 10})),
        ];
        let Assembled::Hierarchical(docs) = orders_assembler().assemble(&rows) else {
            panic!("expected hierarchical outcome");
        };
        assert_eq!(docs[0]["items"], json!([{"name": "bolt", "id": 10}]));
    }

    #[test]
    fn children_without_id_field_are_all_kept() {
        let rows = vec![
            row(json!({"ID": 1, "ITEMS_NAME": "bolt"})),
            row(json!({"ID": 1, "ITEMS_NAME": "bolt"})),
        ];
        let assembler = Assembler::new("ID", vec!["ID".into()], parse_relationships("ITEMS:ID_ORDER:ID"));
        let Assembled::Hierarchical(docs) = assembler.assemble(&rows) else {
            panic!("expected hierarchical outcome");
        };
        assert_eq!(docs[0]["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn one_document_per_distinct_primary_key() {
        let rows = vec![
            row(json!({"ID": 1, "ITEMS_ID": 10})),
            row(json!({"ID": 2, "ITEMS_ID": 11})),
            row(json!({"ID": 1, "ITEMS_ID": 12})),
        ];
        let assembler = Assembler::new("ID", vec!["ID".into()], parse_relationships("ITEMS:ID_ORDER:ID"));
        let Assembled::Hierarchical(docs) = assembler.assemble(&rows) else {
            panic!("expected hierarchical outcome");
        };
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["id"], json!(1));
        assert_eq!(docs[0]["items"].as_array().unwrap().len(), 2);
        assert_eq!(docs[1]["id"], json!(2));
    }

    #[test]
    fn null_primary_fields_are_omitted() {
        let rows = vec![row(json!({"ID": 1, "DATE": null, "ITEMS_ID": 10}))];
        let assembler = Assembler::new(
            "ID",
            vec!["ID".into(), "DATE".into(), "MISSING".into()],
            parse_relationships("ITEMS:ID_ORDER:ID"),
        );
        let Assembled::Hierarchical(docs) = assembler.assemble(&rows) else {
            panic!("expected hierarchical outcome");
        };
        let doc = docs[0].as_object().unwrap();
        assert!(!doc.contains_key("date"));
        assert!(!doc.contains_key("missing"));
    }

    #[test]
    fn empty_child_arrays_and_objects_are_omitted() {
        let rows = vec![row(json!({"ID": 1}))];
        let Assembled::Hierarchical(docs) = orders_assembler().assemble(&rows) else {
            panic!("expected hierarchical outcome");
        };
        assert_eq!(docs[0], json!({"id": 1}));
    }

    #[test]
    fn no_relationships_degrades_to_flat() {
        let rows = vec![row(json!({"ID": 1}))];
        let assembler = Assembler::new("ID", vec!["ID".into()], Vec::new());
        assert_eq!(assembler.assemble(&rows), Assembled::Flat);
    }

    #[test]
    fn empty_input_degrades_to_flat() {
        assert_eq!(orders_assembler().assemble(&[]), Assembled::Flat);
    }

    #[test]
    fn assembly_is_deterministic() {
        let rows = vec![
            row(json!({"ID": 1, "DATE": "d", "ITEMS_NAME": "bolt", "ITEMS_ID": 10})),
            row(json!({"ID": 2, "DATE": "e", "ITEMS_NAME": "nut", "ITEMS_ID": 11})),
        ];
        let assembler = orders_assembler();
        assert_eq!(assembler.assemble(&rows), assembler.assemble(&rows));
    }
}
