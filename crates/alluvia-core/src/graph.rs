use crate::frame::{Field, Frame};
use crate::{Error, Result};
use indexmap::IndexSet;

pub const SOURCE_FIELD: &str = "source";
pub const TARGET_FIELD: &str = "target";
pub const VALUE_FIELD: &str = "value";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNode {
    pub name: String,
}

/// A directed, valued edge. `source`/`target` are indices into
/// [`FlowGraph::nodes`]; links never own node data.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

impl FlowGraph {
    /// A graph with no nodes or no links is the recognized "no data" state,
    /// not an error.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() || self.links.is_empty()
    }
}

/// Builds the deduplicated node set and the per-row link list from the
/// `source`/`target`/`value` columns of a frame.
///
/// Every input row becomes one link: zero values and repeated
/// source/target pairs are kept as-is, and values are rounded to two
/// decimals at construction. Node order is first appearance across the
/// source column followed by the target column.
pub fn build_graph(frame: &Frame) -> Result<FlowGraph> {
    let fields = (
        frame.field(SOURCE_FIELD),
        frame.field(TARGET_FIELD),
        frame.field(VALUE_FIELD),
    );
    let (source_field, target_field, value_field) = match fields {
        (Some(s), Some(t), Some(v)) => (s, t, v),
        (s, t, v) => {
            let fields = [
                (SOURCE_FIELD, s.is_none()),
                (TARGET_FIELD, t.is_none()),
                (VALUE_FIELD, v.is_none()),
            ]
            .iter()
            .filter(|(_, absent)| *absent)
            .map(|(name, _)| name.to_string())
            .collect();
            return Err(Error::MissingFields { fields });
        }
    };

    let sources = string_column(source_field)?;
    let targets = string_column(target_field)?;
    let values = numeric_column(value_field)?;
    if sources.len() != targets.len() || sources.len() != values.len() {
        return Err(Error::RaggedColumns {
            source_len: sources.len(),
            target_len: targets.len(),
            value_len: values.len(),
        });
    }

    let mut names: IndexSet<&str> = IndexSet::with_capacity(sources.len() * 2);
    for name in sources.iter().chain(targets.iter()) {
        names.insert(name);
    }

    let mut graph = FlowGraph {
        nodes: names
            .iter()
            .map(|name| FlowNode {
                name: (*name).to_string(),
            })
            .collect(),
        links: Vec::with_capacity(sources.len()),
    };
    for ((source, target), value) in sources.iter().zip(&targets).zip(&values) {
        // Every endpoint is already in the set, so these are pure lookups.
        let (source, _) = names.insert_full(source.as_str());
        let (target, _) = names.insert_full(target.as_str());
        graph.links.push(FlowLink {
            source,
            target,
            value: round2(*value),
        });
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "flow graph built"
    );
    Ok(graph)
}

fn string_column(field: &Field) -> Result<Vec<String>> {
    field
        .values
        .iter()
        .map(|v| {
            v.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| Error::TypeMismatch {
                    field: field.name.clone(),
                    expected: "string",
                })
        })
        .collect()
}

fn numeric_column(field: &Field) -> Result<Vec<f64>> {
    field
        .values
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| Error::TypeMismatch {
                field: field.name.clone(),
                expected: "number",
            })
        })
        .collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scenario_frame() -> Frame {
        Frame::from_rows([("A", "X", 10.0), ("B", "X", 5.0), ("X", "Y", 15.0)])
    }

    #[test]
    fn builds_deduplicated_nodes_and_per_row_links() {
        let graph = build_graph(&scenario_frame()).unwrap();
        let names: Vec<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "X", "Y"]);
        assert_eq!(graph.links.len(), 3);
        assert_eq!(
            graph.links[2],
            FlowLink {
                source: 2,
                target: 3,
                value: 15.0
            }
        );
    }

    #[test]
    fn rounds_values_to_two_decimals() {
        let graph = build_graph(&Frame::from_rows([("a", "b", 124.729)])).unwrap();
        assert_eq!(graph.links[0].value, 124.73);
    }

    #[test]
    fn keeps_zero_values_and_duplicate_pairs() {
        let graph = build_graph(&Frame::from_rows([
            ("a", "b", 0.0),
            ("a", "b", 3.0),
            ("a", "b", 3.0),
        ]))
        .unwrap();
        assert_eq!(graph.links.len(), 3);
        assert_eq!(graph.links[0].value, 0.0);
        assert_eq!(graph.links[1], graph.links[2]);
    }

    #[test]
    fn missing_fields_are_named_in_the_error() {
        let frame = Frame {
            fields: vec![Field {
                name: SOURCE_FIELD.to_string(),
                values: vec![json!("a")],
            }],
        };
        let err = build_graph(&frame).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("target"), "{message}");
        assert!(message.contains("value"), "{message}");
        assert!(!message.contains("source,"), "{message}");
    }

    #[test]
    fn non_string_endpoint_is_a_type_mismatch() {
        let mut frame = scenario_frame();
        frame.fields[1].values[0] = json!(42);
        let err = build_graph(&frame).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: "string",
                ..
            }
        ));
        assert!(err.to_string().contains("target"));
    }

    #[test]
    fn non_numeric_value_is_a_type_mismatch() {
        let mut frame = scenario_frame();
        frame.fields[2].values[2] = json!("lots");
        let err = build_graph(&frame).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: "number",
                ..
            }
        ));
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let mut frame = scenario_frame();
        frame.fields[0].values.pop();
        let err = build_graph(&frame).unwrap_err();
        assert!(matches!(err, Error::RaggedColumns { source_len: 2, .. }));
        // The message carries all three lengths and `source()` stays empty.
        assert_eq!(
            err.to_string(),
            "Fields source/target/value must be the same length (got 2/3/3)"
        );
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn zero_rows_build_an_empty_graph() {
        let graph = build_graph(&Frame::from_rows::<&str, &str, _>([])).unwrap();
        assert!(graph.is_empty());
    }
}
