use super::localization::LocalizationTable;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

/// Key used when a descriptor has none.
pub const DEFAULT_NAME: &str = "Unknown name";

const BRACKETS: [(&str, &str); 3] = [("<", ">"), ("[", "]"), ("$", "$")];

/// A name as stored in the save: either a structured descriptor or some other plain value.
///
/// Only JSON objects become descriptors; arrays, strings and numbers stay plain.
#[derive(Debug, Clone, PartialEq)]
pub enum NameNode {
    Structured(Box<NameDescriptor>),
    Plain(Value),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NameDescriptor {
    pub key: Option<String>,
    /// Only the string `"yes"` counts as literal.
    pub literal: Option<Value>,
    /// When present, replaces everything else in this descriptor.
    pub value: Option<NameNode>,
    /// Well-formed substitutions only; malformed entries are dropped while decoding.
    pub variables: Vec<Variable>,
}

/// A substitution with a string key and a value to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub key: String,
    pub value: NameNode,
}

impl From<Value> for NameNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => {
                NameNode::Structured(Box::new(NameDescriptor::from_fields(fields)))
            }
            other => NameNode::Plain(other),
        }
    }
}

impl<'de> Deserialize<'de> for NameNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(NameNode::from)
    }
}

impl NameDescriptor {
    pub fn is_literal(&self) -> bool {
        matches!(&self.literal, Some(Value::String(s)) if s == "yes")
    }

    fn from_fields(mut fields: Map<String, Value>) -> Self {
        let key = match fields.remove("key") {
            Some(Value::String(key)) => Some(key),
            _ => None,
        };
        let value = fields
            .remove("value")
            .filter(|v| !v.is_null())
            .map(NameNode::from);
        let variables = match fields.remove("variables") {
            Some(Value::Array(entries)) => entries
                .into_iter()
                .filter_map(Variable::from_entry)
                .collect(),
            _ => Vec::new(),
        };
        Self {
            key,
            literal: fields.remove("literal"),
            value,
            variables,
        }
    }
}

impl Variable {
    /// `None` unless the entry is an object with a string `key` and a non-null `value`.
    fn from_entry(entry: Value) -> Option<Self> {
        let Value::Object(mut fields) = entry else {
            return None;
        };
        let key = match fields.remove("key")? {
            Value::String(key) => key,
            _ => return None,
        };
        let value = fields.remove("value").filter(|v| !v.is_null())?;
        Some(Self {
            key,
            value: NameNode::from(value),
        })
    }
}

/// Parse a JSON-encoded name. Returns `None` if the text is not valid JSON.
pub fn parse_name(text: &str) -> Option<NameNode> {
    serde_json::from_str::<Value>(text).ok().map(NameNode::from)
}

pub fn render(node: &NameNode, table: &LocalizationTable) -> String {
    match node {
        NameNode::Structured(descriptor) => render_descriptor(descriptor, table),
        NameNode::Plain(value) => plain_string(value),
    }
}

pub fn render_descriptor(descriptor: &NameDescriptor, table: &LocalizationTable) -> String {
    if let Some(value) = &descriptor.value {
        return render(value, table);
    }

    let key = descriptor.key.as_deref().unwrap_or(DEFAULT_NAME);
    if descriptor.is_literal() {
        return key.to_string();
    }

    let mut rendered = match table.get(key) {
        Some(template) => template.to_string(),
        None => {
            if key != DEFAULT_NAME {
                warn!("No localization entry for name key {:?}", key);
            }
            key.to_string()
        }
    };

    let substitutions: Vec<(&str, String)> = descriptor
        .variables
        .iter()
        .map(|var| (var.key.as_str(), render(&var.value, table)))
        .collect();

    // every bracket style is tried for every variable, not just the first that matches
    for (var_key, var_value) in &substitutions {
        for (open, close) in BRACKETS {
            rendered = rendered.replace(&format!("{open}{var_key}{close}"), var_value);
        }
    }
    rendered
}

fn plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LocalizationTable {
        [
            ("war_vs", "<attacker> versus [defender]"),
            ("fleet_attack", "<a> attacks [a] near $a$"),
            ("NAME_Sol", "Sol"),
            ("adj_format", "$adjective$ $noun$"),
        ]
        .into_iter()
        .collect()
    }

    fn node(json: &str) -> NameNode {
        parse_name(json).unwrap()
    }

    #[test]
    fn test_literal_skips_lookup() {
        let n = node(r#"{"key": "war_vs", "literal": "yes"}"#);
        assert_eq!(render(&n, &table()), "war_vs");
    }

    #[test]
    fn test_literal_must_be_yes() {
        let n = node(r#"{"key": "NAME_Sol", "literal": "no"}"#);
        assert_eq!(render(&n, &table()), "Sol");
    }

    #[test]
    fn test_value_delegates_completely() {
        let outer = node(r#"{"key": "war_vs", "literal": "yes", "value": {"key": "NAME_Sol"}}"#);
        let inner = node(r#"{"key": "NAME_Sol"}"#);
        assert_eq!(render(&outer, &table()), render(&inner, &table()));
        assert_eq!(render(&outer, &table()), "Sol");
    }

    #[test]
    fn test_all_bracket_styles_substituted() {
        let n = node(
            r#"{"key": "fleet_attack", "variables": [{"key": "a", "value": {"key": "Fleet-1", "literal": "yes"}}]}"#,
        );
        assert_eq!(render(&n, &table()), "Fleet-1 attacks Fleet-1 near Fleet-1");
    }

    #[test]
    fn test_nested_variables_and_malformed_entries() {
        let n = node(
            r#"{"key": "war_vs", "variables": [
                {"key": "attacker", "value": {"key": "NAME_Sol"}},
                {"key": "defender"},
                {"value": {"key": "x"}},
                {"key": "defender", "value": {"key": "adj_format", "variables": [
                    {"key": "adjective", "value": {"key": "Blue", "literal": "yes"}},
                    {"key": "noun", "value": {"key": "Star", "literal": "yes"}}
                ]}}
            ]}"#,
        );
        assert_eq!(render(&n, &table()), "Sol versus Blue Star");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        let n = node(r#"{"key": "totally_unknown_xyz"}"#);
        assert_eq!(render(&n, &table()), "totally_unknown_xyz");
    }

    #[test]
    fn test_missing_key_uses_default() {
        let n = node(r#"{"variables": []}"#);
        assert_eq!(render(&n, &table()), DEFAULT_NAME);
    }

    #[test]
    fn test_plain_values_render_as_is() {
        assert_eq!(render(&node(r#""Earth""#), &table()), "Earth");
        assert_eq!(render(&node("42"), &table()), "42");
        assert!(parse_name("not json {").is_none());
    }

    #[test]
    fn test_arrays_are_not_descriptors() {
        assert_eq!(render(&node("[]"), &table()), "[]");
        assert_eq!(render(&node(r#"["NAME_Sol"]"#), &table()), r#"["NAME_Sol"]"#);
        assert!(matches!(node(r#"["x"]"#), NameNode::Plain(Value::Array(_))));
        let decoded: NameNode = serde_json::from_str("[]").unwrap();
        assert_eq!(decoded, NameNode::Plain(Value::Array(Vec::new())));

        let n = node(r#"{"key": "war_vs", "variables": [
            {"key": "attacker", "value": ["NAME_Sol"]},
            {"key": "defender", "value": {"key": "NAME_Sol"}}
        ]}"#);
        assert_eq!(render(&n, &table()), r#"["NAME_Sol"] versus Sol"#);
    }

    #[test]
    fn test_malformed_variable_entries_are_dropped_individually() {
        let n = node(
            r#"{"key": "k <a>", "variables": [null, {"key": "a", "value": {"key": "X", "literal": "yes"}}]}"#,
        );
        assert_eq!(render(&n, &table()), "k X");

        let n = node(
            r#"{"key": "fleet_attack", "variables": [
                7,
                "a",
                {"key": 3, "value": {"key": "Wrong", "literal": "yes"}},
                {"key": "a", "value": null},
                {"key": "a", "value": {"key": "Fleet-1", "literal": "yes"}}
            ]}"#,
        );
        let NameNode::Structured(descriptor) = &n else {
            panic!("expected a descriptor");
        };
        assert_eq!(descriptor.variables.len(), 1);
        assert_eq!(render(&n, &table()), "Fleet-1 attacks Fleet-1 near Fleet-1");
    }

    #[test]
    fn test_non_array_variables_are_ignored() {
        let n = node(r#"{"key": "NAME_Sol", "variables": {"key": "a"}}"#);
        assert_eq!(render(&n, &table()), "Sol");
    }
}
