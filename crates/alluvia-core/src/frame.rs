use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One named column of a host record set. Cell values keep their JSON shape
/// so type validation can report what the host actually sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

/// A tabular record set as handed over by the dashboard host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Frame {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Convenience constructor for the `source`/`target`/`value` triple the
    /// Sankey panel consumes.
    pub fn from_rows<S, T, I>(rows: I) -> Self
    where
        S: Into<String>,
        T: Into<String>,
        I: IntoIterator<Item = (S, T, f64)>,
    {
        let mut sources = Vec::new();
        let mut targets = Vec::new();
        let mut values = Vec::new();
        for (s, t, v) in rows {
            sources.push(Value::String(s.into()));
            targets.push(Value::String(t.into()));
            values.push(serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number));
        }
        Self {
            fields: vec![
                Field {
                    name: crate::graph::SOURCE_FIELD.to_string(),
                    values: sources,
                },
                Field {
                    name: crate::graph::TARGET_FIELD.to_string(),
                    values: targets,
                },
                Field {
                    name: crate::graph::VALUE_FIELD.to_string(),
                    values,
                },
            ],
        }
    }
}
