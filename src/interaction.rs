//! Timestamped interaction events attached to edges.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::network::EdgeId;

/// A single interaction on an edge: an event with a start timestamp (UNIX
/// seconds) and a duration in seconds.
///
/// Interactions are constructed only through [`crate::Edge::add_interaction`]
/// and are immutable afterwards. The back-reference to the owning edge is
/// set at construction and always valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    start: i64,
    duration: i64,
    #[serde(default)]
    data: Value,
    edge: EdgeId,
}

impl Interaction {
    pub(crate) fn new(edge: EdgeId, start: i64, duration: i64, data: Value) -> Result<Self> {
        if start < 0 || duration < 0 {
            return Err(Error::InvalidArgument {
                reason: "interaction timestamp and duration cannot be negative".into(),
            });
        }
        Ok(Self {
            start,
            duration,
            data,
            edge,
        })
    }

    pub fn start_time(&self) -> i64 {
        self.start
    }

    /// End timestamp, always `start_time() + duration()`.
    pub fn end_time(&self) -> i64 {
        self.start + self.duration
    }

    pub fn duration(&self) -> i64 {
        self.duration
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Handle of the owning edge.
    pub fn edge(&self) -> EdgeId {
        self.edge
    }

    /// Type descriptor of the payload, or an empty string when there is
    /// none. Metadata only — never used for dispatch.
    pub fn data_type(&self) -> &'static str {
        match &self.data {
            Value::Null => "",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn end_time_is_start_plus_duration() {
        let i = Interaction::new(EdgeId(0), 100, 10, json!("msg")).unwrap();
        assert_eq!(i.start_time(), 100);
        assert_eq!(i.duration(), 10);
        assert_eq!(i.end_time(), 110);
    }

    #[test]
    fn negative_bounds_are_rejected() {
        assert!(matches!(
            Interaction::new(EdgeId(0), -1, 0, Value::Null),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            Interaction::new(EdgeId(0), 0, -5, Value::Null),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn data_type_describes_the_payload() {
        let typed = |v: Value| Interaction::new(EdgeId(0), 0, 0, v).unwrap();
        assert_eq!(typed(Value::Null).data_type(), "");
        assert_eq!(typed(json!("hello")).data_type(), "string");
        assert_eq!(typed(json!(3)).data_type(), "number");
        assert_eq!(typed(json!({"kind": "call"})).data_type(), "object");
    }
}
