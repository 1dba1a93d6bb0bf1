//! Value tree shared by the tree-shaped formats
//!
//! Each parser's native value (serde_json, serde_yaml, toml, and the INI section model) is
//! mapped explicitly onto [`Node`], and numbers are collected by one pre-order walk over it.
//! Object members keep the order they had in the source document.
//!
//! Whether a string leaf counts as a number is decided by [`Coercion`]: JSON, YAML and TOML
//! use [`Coercion::NativeOnly`], INI uses [`Coercion::Permissive`].

use crate::numeric::parse_float_prefix;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
    Array(Vec<Node>),
    Object(Vec<(String, Node)>),
}

/// How string leaves are treated during collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Only native numbers count.
    NativeOnly,
    /// Strings go through the permissive float parse.
    Permissive,
}

/// Callbacks for a pre-order walk over a [`Node`] tree.
pub trait Visitor {
    fn visit_number(&mut self, _value: f64) {}
    fn visit_string(&mut self, _value: &str) {}
    fn visit_bool(&mut self, _value: bool) {}
    fn visit_null(&mut self) {}
}

impl Node {
    /// Walk the tree in document order, calling the visitor for every leaf.
    pub fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Node::Number(n) => visitor.visit_number(*n),
            Node::String(s) => visitor.visit_string(s),
            Node::Bool(b) => visitor.visit_bool(*b),
            Node::Null => visitor.visit_null(),
            Node::Array(items) => {
                for item in items {
                    item.walk(visitor);
                }
            }
            Node::Object(members) => {
                for (_, value) in members {
                    value.walk(visitor);
                }
            }
        }
    }

    /// Collect every finite number in the tree, in document order.
    pub fn collect_numbers(&self, coercion: Coercion) -> Vec<f64> {
        let mut collector = NumberCollector::new(coercion);
        self.walk(&mut collector);
        collector.numbers
    }
}

/// The numeric collector: keeps finite numbers and, when permissive, coerced strings.
#[derive(Debug)]
pub struct NumberCollector {
    coercion: Coercion,
    pub numbers: Vec<f64>,
}

impl NumberCollector {
    pub fn new(coercion: Coercion) -> Self {
        NumberCollector {
            coercion,
            numbers: Vec::new(),
        }
    }
}

impl Visitor for NumberCollector {
    fn visit_number(&mut self, value: f64) {
        if value.is_finite() {
            self.numbers.push(value);
        }
    }

    fn visit_string(&mut self, value: &str) {
        if self.coercion == Coercion::Permissive {
            if let Some(n) = parse_float_prefix(value) {
                self.numbers.push(n);
            }
        }
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Node::Null, Node::Number),
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::Array(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => {
                Node::Object(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl From<serde_yaml::Value> for Node {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Node::Null, Node::Number),
            Value::String(s) => Node::String(s),
            Value::Sequence(items) => Node::Array(items.into_iter().map(Node::from).collect()),
            Value::Mapping(map) => Node::Object(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(&k), Node::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

/// Mapping keys only label members; a readable rendering is enough.
fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl From<toml::Value> for Node {
    fn from(value: toml::Value) -> Self {
        use toml::Value;
        match value {
            Value::Integer(i) => Node::Number(i as f64),
            Value::Float(f) => Node::Number(f),
            Value::String(s) => Node::String(s),
            Value::Boolean(b) => Node::Bool(b),
            // Dates are not numbers; keep the text so nothing downstream mistakes them.
            Value::Datetime(dt) => Node::String(dt.to_string()),
            Value::Array(items) => Node::Array(items.into_iter().map(Node::from).collect()),
            Value::Table(table) => Node::Object(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Node::from(v)))
                    .collect(),
            ),
        }
    }
}
