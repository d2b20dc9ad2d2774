//! Equality filters, single-field sort and limit over JSON documents.

use std::cmp::Ordering;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

/// A document query. An empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Vec<(String, Value)>,
    pub sort: Option<Sort>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter.push((field.to_string(), value.into()));
        self
    }

    pub fn sort(mut self, field: &str, direction: Direction) -> Self {
        self.sort = Some(Sort {
            field: field.to_string(),
            direction,
        });
        self
    }

    /// Cap the number of results. A limit of zero means no limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.filter
            .iter()
            .all(|(field, expected)| doc.get(field) == Some(expected))
    }

    /// Filter, sort and truncate a set of documents.
    pub fn apply<I>(&self, docs: I) -> Vec<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut out: Vec<Value> = docs.into_iter().filter(|d| self.matches(d)).collect();

        if let Some(sort) = &self.sort {
            out.sort_by(|a, b| {
                let ord = compare_values(a.get(&sort.field), b.get(&sort.field));
                match sort.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

/// Order two field values. Missing sorts first. Integer strings compare
/// numerically and rank ahead of all other strings, which compare as text.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_present(a, b),
    }
}

fn compare_present(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => match (x.parse::<i64>(), y.parse::<i64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => x.cmp(y),
        },
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(docs: &[Value]) -> Vec<&str> {
        docs.iter().map(|d| d["reviewId"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_numeric_string_ordering() {
        let docs = vec![
            json!({"reviewId": "9"}),
            json!({"reviewId": "10"}),
            json!({"reviewId": "2"}),
        ];
        let asc = Query::new().sort("reviewId", Direction::Asc).apply(docs.clone());
        assert_eq!(ids(&asc), vec!["2", "9", "10"]);

        let desc = Query::new()
            .sort("reviewId", Direction::Desc)
            .limit(1)
            .apply(docs);
        assert_eq!(ids(&desc), vec!["10"]);
    }

    #[test]
    fn test_equality_filter() {
        let docs = vec![
            json!({"reviewId": "1", "rateCode": 2}),
            json!({"reviewId": "2", "rateCode": 5}),
            json!({"reviewId": "3", "rateCode": 2}),
        ];
        let low = Query::new().eq("rateCode", 2).apply(docs);
        assert_eq!(ids(&low), vec!["1", "3"]);
    }

    #[test]
    fn test_missing_field_sorts_first() {
        assert_eq!(
            compare_values(None, Some(&json!("1"))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!("abc")), Some(&json!("abd"))),
            Ordering::Less
        );
    }

    #[test]
    fn test_zero_limit_returns_everything() {
        let docs = vec![
            json!({"reviewId": "1"}),
            json!({"reviewId": "2"}),
            json!({"reviewId": "3"}),
        ];
        let all = Query::new().sort("reviewId", Direction::Asc).limit(0).apply(docs);
        assert_eq!(ids(&all), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_mixed_strings_sort_consistently() {
        let docs = vec![
            json!({"reviewId": "1a"}),
            json!({"reviewId": "10"}),
            json!({"reviewId": "2"}),
            json!({"reviewId": "b"}),
        ];
        let asc = Query::new().sort("reviewId", Direction::Asc).apply(docs);
        assert_eq!(ids(&asc), vec!["2", "10", "1a", "b"]);

        let mut many: Vec<Value> = (0..80)
            .map(|i| {
                let id = if i % 3 == 0 { format!("{}x", i) } else { i.to_string() };
                json!({ "reviewId": id })
            })
            .collect();
        many.reverse();
        let sorted = Query::new().sort("reviewId", Direction::Asc).apply(many);
        for pair in sorted.windows(2) {
            assert_ne!(
                compare_values(pair[0].get("reviewId"), pair[1].get("reviewId")),
                Ordering::Greater
            );
        }
    }
}
