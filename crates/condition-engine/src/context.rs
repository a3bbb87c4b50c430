//! Variable context for condition evaluation.

use crate::error::{ConditionError, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named values an expression's identifiers resolve against.
///
/// The evaluator only reads from a context, so one context can serve any
/// number of evaluations, including concurrent ones behind a shared
/// reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: HashMap<String, Value>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from several maps; later maps override earlier ones.
    pub fn from_maps<I, M, K, V>(maps: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut ctx = Self::new();
        for map in maps {
            ctx.extend(map);
        }
        ctx
    }

    /// Loads a context from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_document(value)
    }

    /// Loads a context from a YAML mapping.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_document(value)
    }

    fn from_document(document: serde_json::Value) -> Result<Self> {
        match document {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(ConditionError::SerializationError(format!(
                "Context must be an object of name/value pairs, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Sets a value, replacing any previous value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Adds a value to the context.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Gets a value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the values in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Context {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut ctx = Self::new();
        ctx.extend(iter);
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_context() -> Context {
        Context::new()
            .with("active", true)
            .with("kind", "admin")
            .with("organization", "imdario")
            .with("uid", 200)
            .with("karma", 42.314)
    }

    #[test]
    fn test_get_and_set() {
        let mut ctx = create_test_context();
        assert_eq!(ctx.get("kind"), Some(&Value::from("admin")));
        assert_eq!(ctx.get("uid"), Some(&Value::SignedInt(200)));
        assert_eq!(ctx.get("missing"), None);

        ctx.set("kind", "user");
        assert_eq!(ctx.get("kind"), Some(&Value::from("user")));
        assert_eq!(ctx.len(), 5);
    }

    #[test]
    fn test_from_maps_later_overrides_earlier() {
        let defaults = HashMap::from([("kind", Value::from("guest")), ("active", Value::from(false))]);
        let overrides = HashMap::from([("kind", Value::from("admin"))]);

        let ctx = Context::from_maps([defaults, overrides]);
        assert_eq!(ctx.get("kind"), Some(&Value::from("admin")));
        assert_eq!(ctx.get("active"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_from_maps_empty() {
        let ctx = Context::from_maps(Vec::<HashMap<String, Value>>::new());
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_from_json() {
        let ctx = Context::from_json(
            r#"{"active": true, "kind": "admin", "uid": 200, "groups": ["dev"], "manager": null}"#,
        )
        .unwrap();
        assert_eq!(ctx.get("active"), Some(&Value::Bool(true)));
        assert_eq!(ctx.get("uid"), Some(&Value::SignedInt(200)));
        assert_eq!(ctx.get("manager"), Some(&Value::Nil));
        assert_eq!(
            ctx.get("groups"),
            Some(&Value::Opaque(serde_json::json!(["dev"])))
        );
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
active: true
kind: admin
karma: 42.314
"#;
        let ctx = Context::from_yaml(yaml).unwrap();
        assert_eq!(ctx.get("kind"), Some(&Value::from("admin")));
        assert_eq!(ctx.get("karma"), Some(&Value::Float(42.314)));
    }

    #[test]
    fn test_non_object_document_rejected() {
        let err = Context::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, ConditionError::SerializationError(_)));
    }

    #[test]
    fn test_deserialize_transparent() {
        let ctx: Context = serde_json::from_str(r#"{"uid": 7}"#).unwrap();
        assert_eq!(ctx, Context::new().with("uid", 7));
    }
}
