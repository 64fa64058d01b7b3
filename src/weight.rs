//! Edge weighting based on shared neighbours.

use std::collections::HashSet;

use crate::record::AdjacencyRecord;

/// Returns the number of neighbours `u` and `v` have in common.
///
/// Users without an entry in the record have no neighbours, so anything involving them yields 0.
///
/// # Examples
///
/// ```
/// use mutuals::record::AdjacencyRecord;
/// use mutuals::weight::mutual_count;
///
/// let record = AdjacencyRecord::from_json(r#"{"a": ["b", "c"], "b": ["a", "c"]}"#).unwrap();
///
/// assert_eq!(mutual_count(&record, "a", "b"), 1);
/// assert_eq!(mutual_count(&record, "a", "unknown"), 0);
/// ```
pub fn mutual_count(record: &AdjacencyRecord, u: &str, v: &str) -> usize {
    let u: HashSet<&str> = record.neighbours(u).iter().map(String::as_str).collect();
    let v: HashSet<&str> = record.neighbours(v).iter().map(String::as_str).collect();

    u.intersection(&v).count()
}

/// Computes the weight of the edge between `u` and `v` as `1 / (1 + mutuals)`.
///
/// The weight lies in `(0, 1]` and shrinks as the two users share more neighbours, so closer pairs
/// are cheaper to connect.
///
/// # Examples
///
/// ```
/// use mutuals::record::AdjacencyRecord;
/// use mutuals::weight::weight;
///
/// let record = AdjacencyRecord::from_json(r#"{"a": ["b", "c"], "b": ["a", "c"]}"#).unwrap();
///
/// assert_eq!(weight(&record, "a", "b"), 0.5);
/// assert_eq!(weight(&record, "a", "unknown"), 1.0);
/// ```
pub fn weight(record: &AdjacencyRecord, u: &str, v: &str) -> f64 {
    weight_from_mutuals(mutual_count(record, u, v))
}

/// Converts a mutual count into an edge weight.
pub fn weight_from_mutuals(mutuals: usize) -> f64 {
    1.0 / (1.0 + mutuals as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutual_count_ignores_duplicates() {
        let record = record! {
            "a" => ["x", "x", "y"],
            "b" => ["x", "y", "y"],
        };

        assert_eq!(mutual_count(&record, "a", "b"), 2);
    }

    #[test]
    fn symmetric() {
        let record = record! {
            "a" => ["b", "c", "d"],
            "b" => ["a", "c"],
            "c" => ["d"],
            "d" => ["a", "b", "c"],
        };

        for u in ["a", "b", "c", "d", "e"] {
            for v in ["a", "b", "c", "d", "e"] {
                assert_eq!(weight(&record, u, v), weight(&record, v, u));
            }
        }
    }

    #[test]
    fn no_neighbours_weighs_one() {
        let record = record! {
            "a" => ["b"],
            "lonely" => [],
        };

        for other in ["a", "b", "lonely", "unknown"] {
            assert_eq!(weight(&record, "lonely", other), 1.0);
            assert_eq!(weight(&record, "unknown", other), 1.0);
        }
    }

    #[test]
    fn common_neighbours_never_increase_weight() {
        let mut record = record! {
            "a" => ["x"],
            "b" => ["y"],
        };

        let mut previous = weight(&record, "a", "b");
        assert_eq!(previous, 1.0);

        for i in 0..5 {
            let common = format!("common{i}");
            let mut a = record.neighbours("a").to_vec();
            let mut b = record.neighbours("b").to_vec();
            a.push(common.clone());
            b.push(common);
            record.insert("a", a);
            record.insert("b", b);

            let current = weight(&record, "a", "b");
            assert!(current < previous);
            assert_eq!(current, weight_from_mutuals(i + 1));
            previous = current;
        }
    }
}
