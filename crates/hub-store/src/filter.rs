//! # Query Filters and Updates
//!
//! Declarative match, sort, and mutate descriptions consumed by the
//! document store. Comparisons follow what loosely-typed JSON clients
//! expect: numbers compare across integer and float forms, and `ne`
//! treats a missing field as "not equal".

use std::cmp::Ordering;

use hub_core::{doc_i64, DocId, Document, ID_FIELD};
use serde_json::Value;

/// A single comparison clause against one field
#[derive(Debug, Clone)]
enum Clause {
    /// Field present and equal to the value
    Eq(Value),
    /// Field absent, or present and not equal
    Ne(Value),
    /// Field present, numeric, and at least the bound
    Gte(f64),
    /// Field present and equal to one of the values
    In(Vec<Value>),
}

/// Conjunction of field clauses. An empty filter matches every document.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, Clause)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches documents whose field equals the value
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), Clause::Eq(value.into())));
        self
    }

    /// Matches documents whose field is absent or differs from the value
    pub fn ne(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), Clause::Ne(value.into())));
        self
    }

    /// Matches documents whose field is numeric and at least the bound
    pub fn gte(mut self, field: impl Into<String>, bound: f64) -> Self {
        self.clauses.push((field.into(), Clause::Gte(bound)));
        self
    }

    /// Matches the document with the given `_id`
    pub fn id(self, id: DocId) -> Self {
        self.eq(ID_FIELD, id.to_string())
    }

    /// Matches documents whose `_id` is one of the identifiers
    pub fn id_in(mut self, ids: impl IntoIterator<Item = DocId>) -> Self {
        let values = ids
            .into_iter()
            .map(|id| Value::String(id.to_string()))
            .collect();
        self.clauses.push((ID_FIELD.into(), Clause::In(values)));
        self
    }

    /// Tests a document against every clause
    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses.iter().all(|(field, clause)| {
            let actual = doc.get(field);
            match clause {
                Clause::Eq(expected) => actual.is_some_and(|v| value_eq(v, expected)),
                Clause::Ne(expected) => !actual.is_some_and(|v| value_eq(v, expected)),
                Clause::Gte(bound) => {
                    actual.and_then(Value::as_f64).is_some_and(|n| n >= *bound)
                }
                Clause::In(values) => {
                    actual.is_some_and(|v| values.iter().any(|e| value_eq(v, e)))
                }
            }
        })
    }

    /// Equality clauses collected as a document. Seeds the new document
    /// when an upserting update misses.
    pub fn equality_fields(&self) -> Document {
        let mut doc = Document::new();
        for (field, clause) in &self.clauses {
            if let Clause::Eq(value) = clause {
                doc.insert(field.clone(), value.clone());
            }
        }
        doc
    }
}

/// Value equality with numeric coercion: `3` equals `3.0`
fn value_eq(a: &Value, b: &Value) -> bool {
    if a.is_number() && b.is_number() {
        return a.as_f64() == b.as_f64();
    }
    a == b
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Single-field sort applied to `find_many` results
#[derive(Debug, Clone)]
pub struct Sort {
    field: String,
    order: SortOrder,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Descending,
        }
    }

    /// Comparator over documents. Documents missing the sort field go
    /// last regardless of direction.
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        match (a.get(&self.field), b.get(&self.field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let ord = compare_values(x, y);
                match self.order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            }
        }
    }
}

/// Orders numbers numerically and strings lexicographically.
/// Mixed or non-scalar values compare as equal.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    match (a.as_str(), b.as_str()) {
        (Some(x), Some(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Mutation applied by `update_one`: field sets plus integer deltas.
///
/// Sets apply before increments. An absent counter starts at zero, so
/// incrementing a field the document never had works. The `_id` field
/// is never modified.
#[derive(Debug, Clone, Default)]
pub struct Update {
    set: Document,
    inc: Vec<(String, i64)>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one field to a value
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }

    /// Merges every field of the document into the set clause
    pub fn set_fields(mut self, fields: Document) -> Self {
        self.set.extend(fields);
        self
    }

    /// Adds a signed delta to an integer field
    pub fn inc(mut self, field: impl Into<String>, delta: i64) -> Self {
        self.inc.push((field.into(), delta));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.inc.is_empty()
    }

    /// Applies the mutation in place
    pub fn apply(&self, doc: &mut Document) {
        for (field, value) in &self.set {
            if field == ID_FIELD {
                continue;
            }
            doc.insert(field.clone(), value.clone());
        }
        for (field, delta) in &self.inc {
            let current = doc_i64(doc, field).unwrap_or(0);
            doc.insert(field.clone(), Value::from(current + delta));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(Filter::new().matches(&doc(json!({"anything": 1}))));
        assert!(Filter::new().matches(&Document::new()));
    }

    #[test]
    fn test_eq_requires_presence() {
        let filter = Filter::new().eq("email", "ada@example.com");
        assert!(filter.matches(&doc(json!({"email": "ada@example.com"}))));
        assert!(!filter.matches(&doc(json!({"email": "grace@example.com"}))));
        assert!(!filter.matches(&doc(json!({"name": "ada"}))));
    }

    #[test]
    fn test_eq_coerces_number_forms() {
        let filter = Filter::new().eq("qty", 3);
        assert!(filter.matches(&doc(json!({"qty": 3}))));
        assert!(filter.matches(&doc(json!({"qty": 3.0}))));
        assert!(!filter.matches(&doc(json!({"qty": 4}))));
    }

    #[test]
    fn test_ne_matches_missing_field() {
        let filter = Filter::new().ne("role", "admin");
        assert!(filter.matches(&doc(json!({"role": "buyer"}))));
        assert!(filter.matches(&doc(json!({"email": "ada@example.com"}))));
        assert!(!filter.matches(&doc(json!({"role": "admin"}))));
    }

    #[test]
    fn test_gte_is_strict_about_presence() {
        let filter = Filter::new().gte("product_quantity", 2.0);
        assert!(filter.matches(&doc(json!({"product_quantity": 2}))));
        assert!(filter.matches(&doc(json!({"product_quantity": 5.5}))));
        assert!(!filter.matches(&doc(json!({"product_quantity": 1}))));
        assert!(!filter.matches(&doc(json!({"name": "no stock field"}))));
        assert!(!filter.matches(&doc(json!({"product_quantity": "2"}))));
    }

    #[test]
    fn test_id_in() {
        let keep = DocId::new();
        let other = DocId::new();
        let filter = Filter::new().id_in([keep]);
        assert!(filter.matches(&doc(json!({ID_FIELD: keep.to_string()}))));
        assert!(!filter.matches(&doc(json!({ID_FIELD: other.to_string()}))));
    }

    #[test]
    fn test_equality_fields_skips_non_eq_clauses() {
        let id = DocId::new();
        let filter = Filter::new().id(id).gte("product_quantity", 4.0);
        let seed = filter.equality_fields();
        assert_eq!(seed.get(ID_FIELD), Some(&json!(id.to_string())));
        assert!(!seed.contains_key("product_quantity"));
    }

    #[test]
    fn test_sort_desc_puts_missing_last() {
        let mut docs = vec![
            doc(json!({"currentDate": "2024-01-02"})),
            doc(json!({"other": true})),
            doc(json!({"currentDate": "2024-03-15"})),
        ];
        let sort = Sort::desc("currentDate");
        docs.sort_by(|a, b| sort.compare(a, b));
        assert_eq!(docs[0].get("currentDate"), Some(&json!("2024-03-15")));
        assert_eq!(docs[1].get("currentDate"), Some(&json!("2024-01-02")));
        assert!(!docs[2].contains_key("currentDate"));
    }

    #[test]
    fn test_update_set_then_inc() {
        let mut target = doc(json!({"name": "Lathe", "saleCount": 2}));
        Update::new()
            .set("name", "Mini Lathe")
            .inc("saleCount", 1)
            .inc("product_quantity", -1)
            .apply(&mut target);
        assert_eq!(target.get("name"), Some(&json!("Mini Lathe")));
        assert_eq!(target.get("saleCount"), Some(&json!(3)));
        // absent counter starts at zero
        assert_eq!(target.get("product_quantity"), Some(&json!(-1)));
    }

    #[test]
    fn test_update_never_touches_id() {
        let id = DocId::new();
        let mut target = doc(json!({ID_FIELD: id.to_string()}));
        Update::new().set(ID_FIELD, "overwritten").apply(&mut target);
        assert_eq!(target.get(ID_FIELD), Some(&json!(id.to_string())));
    }
}
