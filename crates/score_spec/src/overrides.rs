//! Overrides applied to a Score document before it is validated.
//!
//! Two kinds are supported:
//! - an overrides document, deep-merged over the source document
//! - property overrides in `path=value` (set) or `path` (remove) form,
//!   where `path` is dot-separated and `\.` escapes a literal dot

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{SpecError, SpecResult};
use crate::reader::kind_of;

/// Deep-merge `overrides` into `base`.
///
/// Mappings merge key by key, anything else is replaced wholesale.
/// Null override values leave the base untouched.
pub fn merge_overrides(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            for (key, value) in override_map {
                let nested = value.is_object() && base_map.get(&key).is_some_and(Value::is_object);
                if nested {
                    if let Some(existing) = base_map.get_mut(&key) {
                        merge_overrides(existing, value);
                    }
                } else if !value.is_null() {
                    base_map.insert(key, value);
                }
            }
        }
        (_, Value::Null) => {}
        (base, value) => *base = value,
    }
}

/// Apply a single `path=value` or `path` property override.
pub fn apply_property(document: &mut Value, property: &str) -> SpecResult<()> {
    match property.split_once('=') {
        Some((path, raw)) => {
            let value = parse_value(raw);
            info!("overriding '{}' = '{}'", path, raw);
            set_property(document, path, value)
        }
        None => {
            info!("removing '{}'", property);
            remove_property(document, property)
        }
    }
}

/// Set the value at a dotted path, creating intermediate mappings.
pub fn set_property(document: &mut Value, path: &str, value: Value) -> SpecResult<()> {
    let segments = parse_path(path)?;
    set_at(document, path, &segments, value)
}

/// Remove the value at a dotted path. Missing paths are ignored.
pub fn remove_property(document: &mut Value, path: &str) -> SpecResult<()> {
    let segments = parse_path(path)?;
    remove_at(document, &segments);
    Ok(())
}

/// Values are parsed as YAML so `-p port=80` yields a number.
fn parse_value(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_path(path: &str) -> SpecResult<Vec<String>> {
    let invalid = |message: &str| SpecError::InvalidPath {
        path: path.to_string(),
        message: message.to_string(),
    };

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => return Err(invalid("dangling escape")),
            },
            '.' => {
                if current.is_empty() {
                    return Err(invalid("empty segment"));
                }
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if current.is_empty() {
        return Err(invalid("empty segment"));
    }
    segments.push(current);

    debug!("Parsed property path '{}' into {:?}", path, segments);
    Ok(segments)
}

fn set_at(target: &mut Value, path: &str, segments: &[String], value: Value) -> SpecResult<()> {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return Ok(());
    };

    match target {
        Value::Object(map) => {
            let child = map
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if child.is_null() && !rest.is_empty() {
                *child = Value::Object(Map::new());
            }
            set_at(child, path, rest, value)
        }
        Value::Array(items) => {
            if head == "-1" && rest.is_empty() {
                items.push(value);
                return Ok(());
            }

            let index = head.parse::<usize>().map_err(|_| SpecError::InvalidPath {
                path: path.to_string(),
                message: format!("'{}' is not a sequence index", head),
            })?;

            if index == items.len() && rest.is_empty() {
                items.push(value);
                Ok(())
            } else if let Some(item) = items.get_mut(index) {
                set_at(item, path, rest, value)
            } else {
                Err(SpecError::InvalidPath {
                    path: path.to_string(),
                    message: format!("index {} out of range (length {})", index, items.len()),
                })
            }
        }
        other => Err(SpecError::InvalidPath {
            path: path.to_string(),
            message: format!("cannot set '{}' on a {}", head, kind_of(other)),
        }),
    }
}

fn remove_at(target: &mut Value, segments: &[String]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    match target {
        Value::Object(map) => {
            if rest.is_empty() {
                map.remove(head);
            } else if let Some(child) = map.get_mut(head) {
                remove_at(child, rest);
            }
        }
        Value::Array(items) => {
            let Ok(index) = head.parse::<usize>() else {
                return;
            };
            if index >= items.len() {
                return;
            }
            if rest.is_empty() {
                items.remove(index);
            } else {
                remove_at(&mut items[index], rest);
            }
        }
        _ => {}
    }
}
