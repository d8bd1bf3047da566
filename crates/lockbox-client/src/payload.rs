//! Outbound payload assembly: custom-data merge plus field and file layers.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{Map, Value};

use lockbox_core::{AttachedFile, FieldState};

/// Recursively merge `overlay` into `base`.
///
/// Nested objects merge key by key; for every other conflict the
/// overlay (per-request, dynamic) value wins. Keys present on only one
/// side pass through unchanged. Existing keys keep their position.
pub fn deep_merge(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        let merged_value = match (merged.get(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                Value::Object(deep_merge(existing, incoming))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), merged_value);
    }
    merged
}

/// Build the submission body.
///
/// Layering, lowest first: session-static custom data, per-request
/// custom data (deep-merged, dynamic wins), then valid field values
/// keyed by alias, then attachments within the size limit keyed by file
/// name. Field and file keys overwrite same-named custom-data keys.
/// Invalid fields are omitted entirely, never sent as empty values.
pub fn assemble(
    states: &[FieldState],
    static_data: &Map<String, Value>,
    request_data: &Map<String, Value>,
    files: &[AttachedFile],
    file_size_limit: usize,
    fields_ignore: bool,
    file_ignore: bool,
) -> Map<String, Value> {
    let mut payload = deep_merge(static_data, request_data);

    if !fields_ignore {
        for state in states.iter().filter(|state| state.is_valid) {
            if let (Some(alias), Some(value)) = (state.alias.as_ref(), state.content.payload_value())
            {
                payload.insert(alias.clone(), Value::String(value.to_string()));
            }
        }
    }

    if !file_ignore {
        for file in files.iter().filter(|file| file.size <= file_size_limit) {
            payload.insert(file.name.clone(), Value::String(BASE64.encode(&file.bytes)));
        }
    }

    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_core::FieldContent;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn valid_field(alias: &str, data: &str) -> FieldState {
        FieldState {
            is_valid: true,
            alias: Some(alias.to_string()),
            content: FieldContent::info(data),
            ..FieldState::default()
        }
    }

    #[test]
    fn test_deep_merge_recurses_into_objects() {
        let merged = deep_merge(
            &map(json!({"a": {"x": 1}})),
            &map(json!({"a": {"y": 2}})),
        );
        assert_eq!(Value::Object(merged), json!({"a": {"x": 1, "y": 2}}));
    }

    #[test]
    fn test_deep_merge_dynamic_wins_on_scalars() {
        let merged = deep_merge(&map(json!({"a": 1})), &map(json!({"a": 2})));
        assert_eq!(Value::Object(merged), json!({"a": 2}));

        // Object/scalar conflict also resolves to the overlay side.
        let merged = deep_merge(&map(json!({"a": {"x": 1}})), &map(json!({"a": 3})));
        assert_eq!(Value::Object(merged), json!({"a": 3}));
    }

    #[test]
    fn test_deep_merge_passes_disjoint_keys_through() {
        let merged = deep_merge(&map(json!({"a": 1})), &map(json!({"b": 2})));
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_assemble_includes_only_valid_fields() {
        let states = vec![
            valid_field("card_number", "4111111111111111"),
            FieldState {
                is_valid: false,
                alias: Some("cvc".to_string()),
                content: FieldContent::info("1"),
                ..FieldState::default()
            },
        ];

        let payload = assemble(&states, &Map::new(), &Map::new(), &[], 1024, false, false);
        assert_eq!(payload["card_number"], "4111111111111111");
        assert!(!payload.contains_key("cvc"));
    }

    #[test]
    fn test_assemble_field_values_override_custom_data() {
        let states = vec![valid_field("card_number", "4111111111111111")];
        let static_data = map(json!({"card_number": "placeholder", "tenant": "acme"}));

        let payload = assemble(&states, &static_data, &Map::new(), &[], 1024, false, false);
        assert_eq!(payload["card_number"], "4111111111111111");
        assert_eq!(payload["tenant"], "acme");
    }

    #[test]
    fn test_assemble_ignore_flags_drop_layers() {
        let states = vec![valid_field("card_number", "4111111111111111")];
        let files = vec![AttachedFile::new("scan.png", vec![1, 2, 3])];

        let payload = assemble(&states, &Map::new(), &Map::new(), &files, 1024, true, true);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_assemble_files_within_limit_are_encoded() {
        let files = vec![
            AttachedFile::new("small.bin", vec![1, 2, 3]),
            AttachedFile::new("big.bin", vec![0u8; 64]),
        ];

        let payload = assemble(&[], &Map::new(), &Map::new(), &files, 16, false, false);
        assert_eq!(payload["small.bin"], BASE64.encode([1, 2, 3]));
        assert!(!payload.contains_key("big.bin"));
    }

    #[test]
    fn test_assemble_preserves_insertion_order() {
        let static_data = map(json!({"first": 1, "second": 2}));
        let request_data = map(json!({"third": 3, "first": 9}));
        let states = vec![valid_field("fourth", "x")];

        let payload = assemble(&states, &static_data, &request_data, &[], 1024, false, false);
        let keys: Vec<&str> = payload.keys().map(String::as_str).collect();
        assert_eq!(keys, ["first", "second", "third", "fourth"]);
        assert_eq!(payload["first"], 9);
    }
}
