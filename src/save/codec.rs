//! JSON codec for save files, plus the value formatting helpers components
//! use when flattening their fields into strings.
//!
//! All numbers are written with `.` as the decimal separator no matter what
//! the host locale is. Rust's float formatting and parsing never consult the
//! locale, so these helpers are mostly about keeping one canonical spelling
//! (shortest round-trip digits) and a tolerant parser.

use super::types::{CURRENT_SAVE_VERSION, Result, SaveError, SaveFile, SaveNode};

/// Encodes a save file as pretty-printed JSON
///
/// Output is deterministic: component maps are `BTreeMap`s and node order is
/// the order they were captured in. Non-finite transform values are
/// rejected, since JSON would store them as `null` and the file could not
/// be decoded again.
pub fn encode(save_file: &SaveFile) -> Result<Vec<u8>> {
    check_finite(save_file)?;

    let mut bytes =
        serde_json::to_vec_pretty(save_file).map_err(|e| SaveError::Encode(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn check_finite(save_file: &SaveFile) -> Result<()> {
    fn check_node(node: &SaveNode) -> Result<()> {
        let transform = node.transform();
        let values = transform
            .position
            .iter()
            .chain(&transform.rotation)
            .chain(&transform.scale);
        if values.into_iter().any(|v| !v.is_finite()) {
            return Err(SaveError::Encode(format!(
                "object '{}' ({}) has a non-finite transform",
                node.name, node.id
            )));
        }
        node.children.iter().try_for_each(check_node)
    }

    save_file.scene.root_objects.iter().try_for_each(check_node)?;

    for item in &save_file.scene.world_items {
        let values = item.position.to_array().into_iter().chain(item.rotation.to_array());
        if values.into_iter().any(|v| !v.is_finite()) {
            return Err(SaveError::Encode(format!(
                "world item '{}' has a non-finite transform",
                item.item_id
            )));
        }
    }
    Ok(())
}

/// Decodes a save file, rejecting anything that does not match the schema
pub fn decode(bytes: &[u8]) -> Result<SaveFile> {
    let save_file: SaveFile =
        serde_json::from_slice(bytes).map_err(|e| SaveError::Decode(e.to_string()))?;

    if save_file.version > CURRENT_SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            found: save_file.version,
            supported: CURRENT_SAVE_VERSION,
        });
    }

    Ok(save_file)
}

pub fn format_f32(value: f32) -> String {
    value.to_string()
}

/// Parses an invariant-format float
///
/// A `,` decimal separator is accepted too, so values written by a
/// locale-sensitive tool still load.
pub fn parse_f32(text: &str) -> Option<f32> {
    let trimmed = text.trim();
    trimmed
        .parse::<f32>()
        .ok()
        .or_else(|| trimmed.replace(',', ".").parse::<f32>().ok())
        .filter(|v| v.is_finite())
}

pub fn format_i32(value: i32) -> String {
    value.to_string()
}

pub fn parse_i32(text: &str) -> Option<i32> {
    text.trim().parse().ok()
}

/// Booleans are spelled `True` / `False`
pub fn format_bool(value: bool) -> String {
    if value { "True".to_string() } else { "False".to_string() }
}

pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Formats a vector as `x,y,z`
pub fn format_vec3(v: [f32; 3]) -> String {
    format!("{},{},{}", format_f32(v[0]), format_f32(v[1]), format_f32(v[2]))
}

pub fn parse_vec3(text: &str) -> Option<[f32; 3]> {
    let mut parts = text.split(',').map(|p| p.trim().parse::<f32>().ok());
    let x = parts.next()??;
    let y = parts.next()??;
    let z = parts.next()??;

    if parts.next().is_some() || !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return None;
    }
    Some([x, y, z])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::types::{SaveMetadata, SaveNode, SaveType, SceneSave, StateMap};
    use std::collections::BTreeMap;

    fn sample_file() -> SaveFile {
        let mut chest_state = StateMap::new();
        chest_state.insert("isOpen".to_string(), "False".to_string());
        chest_state.insert("currentHealth".to_string(), "50".to_string());

        let mut component_state = BTreeMap::new();
        component_state.insert("TreasureChest".to_string(), chest_state);

        SaveFile {
            version: CURRENT_SAVE_VERSION,
            metadata: SaveMetadata {
                game_version: "0.1.0".to_string(),
                slot_name: "slot_1".to_string(),
                save_type: SaveType::Manual,
            },
            scene: SceneSave {
                root_objects: vec![SaveNode {
                    id: "chest".to_string(),
                    name: "Chest".to_string(),
                    is_active: true,
                    position: [1.5, -0.25, 3.0].into(),
                    rotation: [0.0, 0.7071068, 0.0, 0.7071068].into(),
                    scale: [1.0, 1.0, 1.0].into(),
                    component_state,
                    children: vec![],
                }],
                world_items: vec![],
            },
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let file = sample_file();
        assert_eq!(encode(&file).unwrap(), encode(&file).unwrap());
    }

    #[test]
    fn test_decode_restores_encoded_file() {
        let file = sample_file();
        let decoded = decode(&encode(&file).unwrap()).unwrap();
        assert_eq!(decoded, file);
    }

    #[test]
    fn test_encoded_floats_use_dot_separator() {
        let text = String::from_utf8(encode(&sample_file()).unwrap()).unwrap();
        assert!(text.contains("1.5"));
        assert!(text.contains("-0.25"));
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let result = decode(b"{ not json");
        assert!(matches!(result, Err(SaveError::Decode(_))));
    }

    #[test]
    fn test_decode_wrong_schema_is_decode_error() {
        let result = decode(br#"{ "version": 1, "metadata": 5 }"#);
        assert!(matches!(result, Err(SaveError::Decode(_))));
    }

    #[test]
    fn test_decode_newer_version_is_rejected() {
        let mut file = sample_file();
        file.version = CURRENT_SAVE_VERSION + 1;
        let bytes = serde_json::to_vec(&file).unwrap();

        let result = decode(&bytes);
        assert!(matches!(
            result,
            Err(SaveError::VersionMismatch { found, .. }) if found == CURRENT_SAVE_VERSION + 1
        ));
    }

    #[test]
    fn test_float_helpers_are_locale_invariant() {
        assert_eq!(format_f32(0.5), "0.5");
        assert_eq!(parse_f32("0.5"), Some(0.5));
        // Written under a comma-decimal locale
        assert_eq!(parse_f32("0,5"), Some(0.5));
        assert_eq!(parse_f32("abc"), None);
        assert_eq!(parse_f32("NaN"), None);
    }

    #[test]
    fn test_float_format_round_trips_exactly() {
        for value in [0.1f32, 1.0 / 3.0, 123456.79, -0.000123, f32::MAX] {
            assert_eq!(parse_f32(&format_f32(value)), Some(value));
        }
    }

    #[test]
    fn test_bool_spelling() {
        assert_eq!(format_bool(true), "True");
        assert_eq!(format_bool(false), "False");
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_vec3_helpers() {
        assert_eq!(format_vec3([1.0, 2.5, -3.0]), "1,2.5,-3");
        assert_eq!(parse_vec3("1,2.5,-3"), Some([1.0, 2.5, -3.0]));
        assert_eq!(parse_vec3("1,2"), None);
        assert_eq!(parse_vec3("1,2,3,4"), None);
        assert_eq!(parse_vec3("1,x,3"), None);
    }

    #[test]
    fn test_encode_rejects_non_finite_transform() {
        let mut file = sample_file();
        file.scene.root_objects[0].position = [f32::NAN, 0.0, 0.0].into();
        assert!(matches!(encode(&file), Err(SaveError::Encode(_))));

        let mut file = sample_file();
        file.scene.root_objects[0].scale = [1.0, f32::INFINITY, 1.0].into();
        assert!(matches!(encode(&file), Err(SaveError::Encode(_))));
    }

}
