//! Layered merging of YAML configuration values.
//!
//! Global, project and local configs are merged so that a local file only
//! needs to mention the thresholds it changes.
//!
//! # Merge Rules
//!
//! - Mappings merge key by key, recursively
//! - Sequences (e.g. `targets`, `invoker.args`) are replaced as a whole
//! - A `null` in the overlay removes the key, restoring the built-in default
//! - Any other overlay value replaces the base value

use serde_yaml::{Mapping, Value};

/// Merge `overlay` on top of `base`, returning the combined value.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    let (Value::Mapping(base_map), Value::Mapping(overlay_map)) = (base, overlay) else {
        return overlay.clone();
    };

    let mut merged = base_map.clone();
    for (key, value) in overlay_map {
        if value.is_null() {
            merged.remove(key);
            continue;
        }
        let combined = match base_map.get(key) {
            Some(existing) => deep_merge(existing, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), combined);
    }
    Value::Mapping(merged)
}

/// Merge configs in order; the last one has the highest priority.
pub fn merge_configs(configs: &[Value]) -> Value {
    configs
        .iter()
        .fold(Value::Mapping(Mapping::new()), |acc, config| {
            deep_merge(&acc, config)
        })
}
