//! Reference context for `${...}` placeholder substitution.
//!
//! The context is a flat lookup table built once per conversion:
//!
//! - `metadata.<field>` for every scalar metadata field, nested mappings
//!   flattened with dots (`metadata.annotations.team`)
//! - `resources.<name>` for every declared resource, resolving to the name itself
//! - `resources.<name>.<property>` for every declared property, resolving to the
//!   imported value, else the declared default, else an empty string
//!
//! Placeholder grammar accepted by [`ReferenceContext::substitute`]:
//!
//! - `$$` is an escaped `$`, so `$${X}` renders as `${X}`
//! - `${ref}` is replaced by the value of `ref`; unknown references render empty
//! - `${}` and any other `$` are kept as-is

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use score_spec::{ResourceSpec, WorkloadMetadata};

use crate::error::ContextError;

/// Result of expanding a string, with the references that could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub value: String,
    pub unresolved: Vec<String>,
}

/// Resolved references, keyed by their dotted path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceContext {
    /// `None` marks a declared property with neither a value nor a default.
    entries: BTreeMap<String, Option<String>>,
}

impl ReferenceContext {
    /// Build the context from workload metadata, declared resources and imported values.
    pub fn build(
        metadata: &WorkloadMetadata,
        resources: &BTreeMap<String, ResourceSpec>,
        values: &Map<String, Value>,
    ) -> Result<Self, ContextError> {
        let mut context = Self::default();

        if !metadata.name.is_empty() {
            context.insert("metadata.name".to_string(), Some(metadata.name.clone()))?;
        }
        for (field, value) in &metadata.extra {
            context.flatten_metadata(format!("metadata.{}", field), value)?;
        }

        for (name, resource) in resources {
            context.insert(format!("resources.{}", name), Some(name.clone()))?;

            let imported = values.get(name).and_then(Value::as_object);
            for (property, declaration) in &resource.properties {
                let reference = format!("resources.{}.{}", name, property);
                let source = imported
                    .and_then(|props| props.get(property))
                    .filter(|v| !v.is_null())
                    .or_else(|| declaration.default.as_ref().filter(|v| !v.is_null()));

                let value = match source {
                    Some(v) => Some(render_scalar(&reference, v)?),
                    None => None,
                };
                context.insert(reference, value)?;
            }
        }

        debug!("Built reference context with {} entries", context.entries.len());
        Ok(context)
    }

    fn flatten_metadata(&mut self, reference: String, value: &Value) -> Result<(), ContextError> {
        match value {
            Value::Object(fields) => {
                for (field, nested) in fields {
                    self.flatten_metadata(format!("{}.{}", reference, field), nested)?;
                }
                Ok(())
            }
            Value::Null | Value::Array(_) => {
                debug!("Skipping non-scalar metadata field '{}'", reference);
                Ok(())
            }
            scalar => {
                let rendered = render_scalar(&reference, scalar)?;
                self.insert(reference, Some(rendered))
            }
        }
    }

    fn insert(&mut self, reference: String, value: Option<String>) -> Result<(), ContextError> {
        match self.entries.entry(reference) {
            Entry::Occupied(existing) => {
                Err(ContextError::AmbiguousReference(existing.key().clone()))
            }
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Look up a reference. Declared properties without a value resolve to `""`.
    pub fn get(&self, reference: &str) -> Option<&str> {
        self.entries
            .get(reference)
            .map(|value| value.as_deref().unwrap_or(""))
    }

    /// Whether the reference is known to the context.
    pub fn contains(&self, reference: &str) -> bool {
        self.entries.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all references in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref().unwrap_or("")))
    }

    /// Replace all placeholders in `src`, logging a warning per unresolved reference.
    pub fn substitute(&self, src: &str) -> String {
        let expansion = self.expand(src);
        for reference in &expansion.unresolved {
            warn!("Can not resolve '{}' reference", reference);
        }
        expansion.value
    }

    /// Replace all placeholders in `src` in a single left-to-right pass.
    pub fn expand(&self, src: &str) -> Expansion {
        let mut value = String::with_capacity(src.len());
        let mut unresolved = Vec::new();
        let mut rest = src;

        while let Some(pos) = rest.find('$') {
            value.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if let Some(after) = tail.strip_prefix("$$") {
                value.push('$');
                rest = after;
                continue;
            }

            if let Some((reference, after)) = split_placeholder(tail) {
                if reference.is_empty() {
                    value.push_str("${}");
                } else {
                    match self.entries.get(reference) {
                        Some(Some(resolved)) => value.push_str(resolved),
                        _ => unresolved.push(reference.to_string()),
                    }
                }
                rest = after;
                continue;
            }

            value.push('$');
            rest = &tail[1..];
        }
        value.push_str(rest);

        Expansion { value, unresolved }
    }
}

/// Split `${ref}rest` into `(ref, rest)` when `ref` is made of reference characters.
fn split_placeholder(src: &str) -> Option<(&str, &str)> {
    let body = src.strip_prefix("${")?;
    let end = body.find('}')?;
    let reference = &body[..end];
    if reference.chars().all(is_reference_char) {
        Some((reference, &body[end + 1..]))
    } else {
        None
    }
}

fn is_reference_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '[' | ']' | '"' | '\'' | '#')
}

/// Render a scalar the way `%v` formatting does.
pub fn render_scalar(reference: &str, value: &Value) -> Result<String, ContextError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Ok(u.to_string())
            } else {
                Ok(format_float(n.as_f64().unwrap_or_default()))
            }
        }
        Value::Null => Ok(String::new()),
        Value::Array(_) => Err(ContextError::UnsupportedValue {
            reference: reference.to_string(),
            kind: "sequence",
        }),
        Value::Object(_) => Err(ContextError::UnsupportedValue {
            reference: reference.to_string(),
            kind: "mapping",
        }),
    }
}

/// Digits of precision `%g` uses to pick exponent form when printing the shortest representation.
const SHORTEST_EXPONENT_PRECISION: i32 = 6;

/// Shortest representation in `%g` style: exponent form when the decimal
/// exponent is below -4 or at least 6, with a signed two-digit exponent.
fn format_float(f: f64) -> String {
    let scientific = format!("{:e}", f);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exp) = exponent.parse::<i32>() else {
        return scientific;
    };

    if (-4..SHORTEST_EXPONENT_PRECISION).contains(&exp) {
        return f.to_string();
    }

    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use score_spec::ResourcePropertySpec;
    use serde_json::json;

    fn resources() -> BTreeMap<String, ResourceSpec> {
        let mut resources = BTreeMap::new();
        resources.insert(
            "env".to_string(),
            ResourceSpec::new("environment")
                .with_property("DEBUG", ResourcePropertySpec::with_default(true)),
        );
        resources.insert(
            "db".to_string(),
            ResourceSpec::new("postgres")
                .with_property("host", ResourcePropertySpec::with_default(".").required())
                .with_property("port", ResourcePropertySpec::with_default(5342).required())
                .with_property("name", ResourcePropertySpec::default().required())
                .with_property("password", ResourcePropertySpec::default().secret()),
        );
        resources.insert(
            "dns".to_string(),
            ResourceSpec::new("dns").with_property("domain", ResourcePropertySpec::default()),
        );
        resources
    }

    fn values() -> Map<String, Value> {
        let values = json!({
            "db": {"host": "localhost", "name": "test-db"},
            "dns": {"domain": "test.domain.name"}
        });
        values.as_object().cloned().unwrap()
    }

    fn context() -> ReferenceContext {
        ReferenceContext::build(&WorkloadMetadata::new("test-name"), &resources(), &values())
            .unwrap()
    }

    #[test]
    fn test_build_context() {
        let context = context();
        let entries: Vec<_> = context.iter().collect();

        assert_eq!(
            entries,
            vec![
                ("metadata.name", "test-name"),
                ("resources.db", "db"),
                ("resources.db.host", "localhost"),
                ("resources.db.name", "test-db"),
                ("resources.db.password", ""),
                ("resources.db.port", "5342"),
                ("resources.dns", "dns"),
                ("resources.dns.domain", "test.domain.name"),
                ("resources.env", "env"),
                ("resources.env.DEBUG", "true"),
            ]
        );
    }

    #[test]
    fn test_get() {
        let context = context();

        assert_eq!(context.get("metadata.name"), Some("test-name"));
        assert_eq!(context.get("metadata.name.nil"), None);
        assert_eq!(context.get("metadata.nil"), None);
        assert_eq!(context.get("resources.db"), Some("db"));
        assert_eq!(context.get("resources.db.host"), Some("localhost"));
        assert_eq!(context.get("resources.db.name.nil"), None);
        assert_eq!(context.get("resources.nil"), None);
        assert_eq!(context.get("nil.db.name"), None);
        assert!(context.contains("resources.db.password"));
    }

    #[test]
    fn test_substitute() {
        let context = context();

        assert_eq!(context.substitute(""), "");
        assert_eq!(context.substitute("abc"), "abc");
        assert_eq!(context.substitute("abc $$ abc"), "abc $ abc");
        assert_eq!(context.substitute("$${abc}"), "${abc}");
        assert_eq!(context.substitute("$${metadata.name}"), "${metadata.name}");
        assert_eq!(
            context.substitute("The name is '${metadata.name}'"),
            "The name is 'test-name'"
        );
        assert_eq!(context.substitute("The name is '${metadata.nil}'"), "The name is ''");
        assert_eq!(context.substitute("resources.env.DEBUG"), "resources.env.DEBUG");
        assert_eq!(context.substitute("${resources.db}"), "db");
        assert_eq!(
            context.substitute(
                "postgresql://${resources.db.user}:${resources.db.password}@${resources.db.host}:${resources.db.port}/${resources.db.name}"
            ),
            "postgresql://:@localhost:5342/test-db"
        );
    }

    #[test]
    fn test_substitute_literal_dollars() {
        let context = context();

        assert_eq!(context.substitute("${}"), "${}");
        assert_eq!(context.substitute("cost: 5$"), "cost: 5$");
        assert_eq!(context.substitute("$HOME/bin"), "$HOME/bin");
        assert_eq!(context.substitute("${metadata.name"), "${metadata.name");
        assert_eq!(context.substitute("${not valid}"), "${not valid}");
        assert_eq!(context.substitute("$$$${x}"), "$${x}");
        assert_eq!(context.substitute("$$${metadata.name}"), "$test-name");
    }

    #[test]
    fn test_expand_reports_unresolved() {
        let context = context();

        let expansion = context.expand("${resources.undeclared.prop}/${resources.db.password}");
        assert_eq!(expansion.value, "/");
        assert_eq!(
            expansion.unresolved,
            vec!["resources.undeclared.prop", "resources.db.password"]
        );

        let escaped = context.expand("$${resources.undeclared.prop}");
        assert_eq!(escaped.value, "${resources.undeclared.prop}");
        assert!(escaped.unresolved.is_empty());
    }

    #[test]
    fn test_overlay_precedence() {
        let mut resources = BTreeMap::new();
        resources.insert(
            "db".to_string(),
            ResourceSpec::new("postgres")
                .with_property("both", ResourcePropertySpec::with_default("default"))
                .with_property("default_only", ResourcePropertySpec::with_default("default"))
                .with_property("neither", ResourcePropertySpec::default())
                .with_property("null_value", ResourcePropertySpec::with_default("default")),
        );
        let values = json!({"db": {"both": "overlay", "null_value": null}});

        let context = ReferenceContext::build(
            &WorkloadMetadata::new("app"),
            &resources,
            values.as_object().unwrap(),
        )
        .unwrap();

        assert_eq!(context.substitute("${resources.db.both}"), "overlay");
        assert_eq!(context.substitute("${resources.db.default_only}"), "default");
        assert_eq!(context.substitute("${resources.db.neither}"), "");
        assert_eq!(context.substitute("${resources.db.null_value}"), "default");
    }

    #[test]
    fn test_metadata_flattening() {
        let metadata = WorkloadMetadata::new("app")
            .with_field("annotations", json!({"team": "core", "tier": 2}))
            .with_field("replicas", 3)
            .with_field("tags", json!(["a", "b"]));

        let context = ReferenceContext::build(&metadata, &BTreeMap::new(), &Map::new()).unwrap();

        assert_eq!(context.get("metadata.annotations.team"), Some("core"));
        assert_eq!(context.get("metadata.annotations.tier"), Some("2"));
        assert_eq!(context.get("metadata.replicas"), Some("3"));
        assert_eq!(context.get("metadata.tags"), None);
        assert_eq!(context.get("metadata.annotations"), None);
    }

    #[test]
    fn test_ambiguous_metadata_reference() {
        let metadata = WorkloadMetadata::new("app")
            .with_field("annotations", json!({"team": "core"}))
            .with_field("annotations.team", "other");

        let err = ReferenceContext::build(&metadata, &BTreeMap::new(), &Map::new()).unwrap_err();
        assert_eq!(
            err,
            ContextError::AmbiguousReference("metadata.annotations.team".to_string())
        );
    }

    #[test]
    fn test_ambiguous_resource_reference() {
        let mut resources = BTreeMap::new();
        resources.insert(
            "a".to_string(),
            ResourceSpec::new("thing").with_property("b", ResourcePropertySpec::default()),
        );
        resources.insert("a.b".to_string(), ResourceSpec::new("thing"));

        let err = ReferenceContext::build(&WorkloadMetadata::new("app"), &resources, &Map::new())
            .unwrap_err();
        assert_eq!(err, ContextError::AmbiguousReference("resources.a.b".to_string()));
        assert!(err.to_string().contains("resources.a.b"));
    }

    #[test]
    fn test_non_scalar_default_rejected() {
        let mut resources = BTreeMap::new();
        resources.insert(
            "db".to_string(),
            ResourceSpec::new("postgres")
                .with_property("hosts", ResourcePropertySpec::with_default(json!(["a", "b"]))),
        );

        let err = ReferenceContext::build(&WorkloadMetadata::new("app"), &resources, &Map::new())
            .unwrap_err();
        assert_eq!(
            err,
            ContextError::UnsupportedValue {
                reference: "resources.db.hosts".to_string(),
                kind: "sequence",
            }
        );
    }

    #[test]
    fn test_render_scalar() {
        let render = |v: Value| render_scalar("x", &v).unwrap();

        assert_eq!(render(json!(true)), "true");
        assert_eq!(render(json!(false)), "false");
        assert_eq!(render(json!(5432)), "5432");
        assert_eq!(render(json!(-7)), "-7");
        assert_eq!(render(json!(18446744073709551615u64)), "18446744073709551615");
        assert_eq!(render(json!(1.5)), "1.5");
        assert_eq!(render(json!(5.0)), "5");
        assert_eq!(render(json!(100000.0)), "100000");
        assert_eq!(render(json!(1e6)), "1e+06");
        assert_eq!(render(json!(123456789.0)), "1.23456789e+08");
        assert_eq!(render(json!(1234567.5)), "1.2345675e+06");
        assert_eq!(render(json!(1e20)), "1e+20");
        assert_eq!(render(json!(-2.5e100)), "-2.5e+100");
        assert_eq!(render(json!(0.0001)), "0.0001");
        assert_eq!(render(json!(0.000015)), "1.5e-05");
        assert_eq!(render(json!(0.0)), "0");
        assert_eq!(render(json!("text")), "text");
        assert!(render_scalar("x", &json!({"a": 1})).is_err());
    }
}
