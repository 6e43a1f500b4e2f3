//! Symbol Resolution
//!
//! Maps interface names to C identifiers and detects when two interfaces of
//! one run would end up with the same identifier.
//!
//! Sanitization is a pure per-name function. It cannot see the whole set, so
//! collision detection is a separate pass run by the emitter before anything
//! is rendered or written.

use std::collections::hash_map::{Entry, HashMap};

use super::layout::MappedInterface;
use crate::error::{Error, Result};

/// Map an interface name to a C identifier.
///
/// Every character outside `[A-Za-z0-9_]` (in practice `.` and `-`) becomes
/// `_`, so `org.example.Sensor-v2` maps to `org_example_Sensor_v2`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Fail on the first pair of interfaces sharing a C identifier.
///
/// Each interface owns two identifiers, its record and its mapping array, so
/// `org.a_mappings` clashes with the mapping array of `org.a`. Interfaces are
/// visited in run order and the error names the earlier one first.
pub fn check_collisions(interfaces: &[MappedInterface]) -> Result<()> {
    let mut seen: HashMap<String, &MappedInterface> = HashMap::new();

    for interface in interfaces {
        for symbol in [interface.symbol.clone(), interface.mappings_symbol()] {
            match seen.entry(symbol) {
                Entry::Occupied(entry) => {
                    let first = *entry.get();
                    return Err(Error::Collision {
                        symbol: entry.key().clone(),
                        first: first.name.clone(),
                        first_path: first.source_path.clone(),
                        second: interface.name.clone(),
                        second_path: interface.source_path.clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(interface);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_sanitize_separators() {
        assert_eq!(sanitize("org.Temperature"), "org_Temperature");
        assert_eq!(
            sanitize("org.astarte-platform.Device-Data"),
            "org_astarte_platform_Device_Data"
        );
        assert_eq!(sanitize("already_safe_42"), "already_safe_42");
    }

    #[test]
    fn test_sanitize_other_characters() {
        assert_eq!(sanitize("a b+c"), "a_b_c");
        assert_eq!(sanitize("é"), "_");
    }

    fn interface(name: &str) -> MappedInterface {
        MappedInterface {
            symbol: sanitize(name),
            name: name.to_string(),
            version_major: 0,
            version_minor: 1,
            type_constant: "ASTARTE_INTERFACE_TYPE_DATASTREAM",
            ownership_constant: "ASTARTE_INTERFACE_OWNERSHIP_DEVICE",
            aggregation_constant: "ASTARTE_INTERFACE_AGGREGATION_INDIVIDUAL",
            mappings: Vec::new(),
            source_path: PathBuf::from(format!("{}.json", name)),
        }
    }

    #[test]
    fn test_collision_detected() {
        let interfaces = [interface("org.a-b"), interface("org.c"), interface("org.a_b")];
        match check_collisions(&interfaces) {
            Err(Error::Collision { symbol, first, first_path, second, second_path }) => {
                assert_eq!(symbol, "org_a_b");
                assert_eq!(first, "org.a-b");
                assert_eq!(first_path, PathBuf::from("org.a-b.json"));
                assert_eq!(second, "org.a_b");
                assert_eq!(second_path, PathBuf::from("org.a_b.json"));
            }
            other => panic!("Expected collision, got {:?}", other),
        }
    }

    #[test]
    fn test_mapping_array_symbol_collides() {
        for interfaces in [
            [interface("org.a"), interface("org.a_mappings")],
            [interface("org.a_mappings"), interface("org.a")],
        ] {
            match check_collisions(&interfaces) {
                Err(Error::Collision { symbol, first, second, .. }) => {
                    assert_eq!(symbol, "org_a_mappings");
                    assert_eq!(first, interfaces[0].name);
                    assert_eq!(second, interfaces[1].name);
                }
                other => panic!("Expected collision, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_distinct_symbols_pass() {
        assert!(check_collisions(&[interface("org.a"), interface("org.b")]).is_ok());
        assert!(check_collisions(&[]).is_ok());
    }
}
