//! Interface Loading
//!
//! Discovers interface files in a directory, parses each one and validates it
//! into an [`InterfaceDocument`]. Files are processed in lexicographic file
//! name order, and the first malformed file aborts the whole load.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::SchemaError;
use crate::interface::{
    Aggregation, InterfaceDocument, InterfaceType, Mapping, MappingType, Ownership, Reliability,
};

type Result<T> = std::result::Result<T, SchemaError>;

/// Configuration for interface loading
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Extension of interface files, without the dot
    pub extension: String,
    /// Fill in the Astarte defaults for optional fields instead of requiring them
    pub apply_defaults: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            extension: "json".to_string(),
            apply_defaults: false,
        }
    }
}

/// Load every interface file found directly inside `schema_dir`
pub fn load_from_directory(
    schema_dir: &Path,
    config: &LoadConfig,
) -> Result<Vec<InterfaceDocument>> {
    discover(schema_dir, config)?
        .iter()
        .map(|path| load_file(path, config))
        .collect()
}

/// List interface files in `schema_dir`, sorted by file name
pub fn discover(schema_dir: &Path, config: &LoadConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(schema_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| SchemaError::Directory {
            path: schema_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().map(|e| e != config.extension.as_str()).unwrap_or(true) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Read and validate a single interface file
pub fn load_file(path: &Path, config: &LoadConfig) -> Result<InterfaceDocument> {
    let content = fs::read_to_string(path).map_err(|source| SchemaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(path, &content, config)?;
    debug!(
        file = %path.display(),
        interface = %document.name,
        mappings = document.mapping_count(),
        "loaded interface"
    );
    Ok(document)
}

/// Validate the JSON text of one interface file
pub fn parse_document(
    path: &Path,
    content: &str,
    config: &LoadConfig,
) -> Result<InterfaceDocument> {
    let json: Value = serde_json::from_str(content).map_err(|source| SchemaError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let root = Fields::new(path, &json, String::new())?;

    let name_key = if root.get("interface_name").is_none() && root.get("name").is_some() {
        "name"
    } else {
        "interface_name"
    };
    let name = root.string(name_key)?;
    if !name_pattern().is_match(name) {
        return Err(root.malformed(
            name_key,
            name,
            "must start with a letter and contain only letters, digits, '.', '-' or '_'",
        ));
    }

    let version_major = root.version("version_major")?;
    let version_minor = root.version("version_minor")?;
    let interface_type = root.tagged("type", InterfaceType::from_tag, None)?;
    let ownership = root.tagged("ownership", Ownership::from_tag, None)?;
    let aggregation = root.tagged(
        "aggregation",
        Aggregation::from_tag,
        config.apply_defaults.then_some(Aggregation::Individual),
    )?;

    let mappings = match root.get("mappings") {
        None => return Err(root.missing("mappings")),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(root.wrong_type("mappings", "an array")),
    };
    if mappings.is_empty() {
        return Err(SchemaError::EmptyMappings {
            path: path.to_path_buf(),
        });
    }
    let mappings = mappings
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let fields = Fields::new(path, item, format!("mappings[{}].", idx))?;
            parse_mapping(&fields, config)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(InterfaceDocument {
        name: name.to_string(),
        version_major,
        version_minor,
        interface_type,
        ownership,
        aggregation,
        mappings,
        source_path: path.to_path_buf(),
    })
}

fn parse_mapping(fields: &Fields<'_>, config: &LoadConfig) -> Result<Mapping> {
    let endpoint = fields.string("endpoint")?;
    if !endpoint_pattern().is_match(endpoint) {
        return Err(fields.malformed(
            "endpoint",
            endpoint,
            "must start with '/' and contain no quotes, backslashes or control characters",
        ));
    }

    let mapping_type = fields.tagged("type", MappingType::from_tag, None)?;

    let reliability = match fields.get("reliability") {
        None if config.apply_defaults => Reliability::Unreliable,
        None => return Err(fields.missing("reliability")),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(Reliability::from_level)
            .ok_or_else(|| fields.unknown("reliability", n.to_string()))?,
        Some(Value::String(s)) => Reliability::from_tag(s)
            .ok_or_else(|| fields.unknown("reliability", format!("{:?}", s)))?,
        Some(_) => return Err(fields.wrong_type("reliability", "an integer or a reliability name")),
    };

    let default = config.apply_defaults.then_some(false);

    Ok(Mapping {
        endpoint: endpoint.to_string(),
        mapping_type,
        reliability,
        explicit_timestamp: fields.boolean("explicit_timestamp", default)?,
        allow_unset: fields.boolean("allow_unset", default)?,
    })
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.\-]*$").expect("valid name regex"))
}

fn endpoint_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"^/[^"\\\x00-\x1F\x7F]*$"#).expect("valid endpoint regex"))
}

// =============================================================================
// Field access
// =============================================================================

/// Typed access to the fields of one JSON object. Every failed access
/// produces a [`SchemaError`] naming the file and the full field path.
struct Fields<'a> {
    path: &'a Path,
    object: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> Fields<'a> {
    fn new(path: &'a Path, value: &'a Value, prefix: String) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(Self { path, object, prefix }),
            _ => Err(SchemaError::NotAnObject {
                path: path.to_path_buf(),
                location: if prefix.is_empty() {
                    "document".to_string()
                } else {
                    prefix.trim_end_matches('.').to_string()
                },
            }),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key)
    }

    fn field(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn string(&self, key: &str) -> Result<&'a str> {
        match self.get(key) {
            None => Err(self.missing(key)),
            Some(Value::String(s)) if !s.is_empty() => Ok(s.as_str()),
            Some(_) => Err(self.wrong_type(key, "a non-empty string")),
        }
    }

    fn boolean(&self, key: &str, default: Option<bool>) -> Result<bool> {
        match (self.get(key), default) {
            (Some(Value::Bool(b)), _) => Ok(*b),
            (Some(_), _) => Err(self.wrong_type(key, "a boolean")),
            (None, Some(b)) => Ok(b),
            (None, None) => Err(self.missing(key)),
        }
    }

    fn version(&self, key: &str) -> Result<u32> {
        let n = match self.get(key) {
            None => return Err(self.missing(key)),
            Some(Value::Number(n)) => n
                .as_u64()
                .ok_or_else(|| self.wrong_type(key, "a non-negative integer"))?,
            Some(_) => return Err(self.wrong_type(key, "a non-negative integer")),
        };
        u32::try_from(n).map_err(|_| self.malformed(key, &n.to_string(), "is out of range"))
    }

    /// Read a string field and resolve it through a closed enumeration
    fn tagged<T>(&self, key: &str, parse: fn(&str) -> Option<T>, default: Option<T>) -> Result<T> {
        match (self.get(key), default) {
            (None, Some(value)) => Ok(value),
            (None, None) => Err(self.missing(key)),
            (Some(Value::String(s)), _) => {
                parse(s).ok_or_else(|| self.unknown(key, format!("{:?}", s)))
            }
            (Some(_), _) => Err(self.wrong_type(key, "a string")),
        }
    }

    fn missing(&self, key: &str) -> SchemaError {
        SchemaError::MissingField {
            path: self.path.to_path_buf(),
            field: self.field(key),
        }
    }

    fn wrong_type(&self, key: &str, expected: &'static str) -> SchemaError {
        SchemaError::WrongType {
            path: self.path.to_path_buf(),
            field: self.field(key),
            expected,
        }
    }

    fn unknown(&self, key: &str, value: String) -> SchemaError {
        SchemaError::UnknownValue {
            path: self.path.to_path_buf(),
            field: self.field(key),
            value,
        }
    }

    fn malformed(&self, key: &str, value: &str, reason: &'static str) -> SchemaError {
        SchemaError::Malformed {
            path: self.path.to_path_buf(),
            field: self.field(key),
            value: value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPERATURE: &str = r#"{
        "interface_name": "org.Temperature",
        "version_major": 0,
        "version_minor": 1,
        "type": "datastream",
        "ownership": "device",
        "aggregation": "individual",
        "mappings": [
            {
                "endpoint": "/temp",
                "type": "double",
                "reliability": 1,
                "explicit_timestamp": true,
                "allow_unset": false
            }
        ]
    }"#;

    fn parse(content: &str) -> Result<InterfaceDocument> {
        parse_document(Path::new("org.Temp.json"), content, &LoadConfig::default())
    }

    fn with(field: &str, value: &str) -> String {
        let mut json: Value = serde_json::from_str(TEMPERATURE).unwrap();
        json[field] = serde_json::from_str(value).unwrap();
        json.to_string()
    }

    fn with_mapping(field: &str, value: Option<&str>) -> String {
        let mut json: Value = serde_json::from_str(TEMPERATURE).unwrap();
        let mapping = json["mappings"][0].as_object_mut().unwrap();
        match value {
            Some(v) => {
                mapping.insert(field.to_string(), serde_json::from_str(v).unwrap());
            }
            None => {
                mapping.remove(field);
            }
        }
        json.to_string()
    }

    #[test]
    fn test_parse_valid_document() {
        let doc = parse(TEMPERATURE).unwrap();
        assert_eq!(doc.name, "org.Temperature");
        assert_eq!((doc.version_major, doc.version_minor), (0, 1));
        assert_eq!(doc.interface_type, InterfaceType::Datastream);
        assert_eq!(doc.ownership, Ownership::Device);
        assert_eq!(doc.aggregation, Aggregation::Individual);
        assert_eq!(
            doc.mappings,
            vec![Mapping {
                endpoint: "/temp".to_string(),
                mapping_type: MappingType::Double,
                reliability: Reliability::Guaranteed,
                explicit_timestamp: true,
                allow_unset: false,
            }]
        );
    }

    #[test]
    fn test_name_alias_and_unknown_fields() {
        let mut json: Value = serde_json::from_str(TEMPERATURE).unwrap();
        let name = json.as_object_mut().unwrap().remove("interface_name").unwrap();
        json["name"] = name;
        json["description"] = Value::String("ignored".to_string());
        let doc = parse(&json.to_string()).unwrap();
        assert_eq!(doc.name, "org.Temperature");
    }

    #[test]
    fn test_reliability_by_name() {
        let doc = parse(&with_mapping("reliability", Some("\"unique\""))).unwrap();
        assert_eq!(doc.mappings[0].reliability, Reliability::Unique);
    }

    #[test]
    fn test_rejects_unknown_enum_values() {
        assert!(matches!(
            parse(&with("type", "\"stream\"")),
            Err(SchemaError::UnknownValue { field, .. }) if field == "type"
        ));
        assert!(matches!(
            parse(&with("ownership", "\"cloud\"")),
            Err(SchemaError::UnknownValue { field, .. }) if field == "ownership"
        ));
        assert!(matches!(
            parse(&with_mapping("reliability", Some("3"))),
            Err(SchemaError::UnknownValue { field, .. }) if field == "mappings[0].reliability"
        ));
        assert!(matches!(
            parse(&with_mapping("type", Some("\"float\""))),
            Err(SchemaError::UnknownValue { field, .. }) if field == "mappings[0].type"
        ));
    }

    #[test]
    fn test_rejects_wrong_types() {
        assert!(matches!(
            parse(&with("version_major", "\"1\"")),
            Err(SchemaError::WrongType { field, .. }) if field == "version_major"
        ));
        assert!(matches!(
            parse(&with("version_minor", "-1")),
            Err(SchemaError::WrongType { .. })
        ));
        assert!(matches!(
            parse(&with_mapping("allow_unset", Some("0"))),
            Err(SchemaError::WrongType { field, .. }) if field == "mappings[0].allow_unset"
        ));
        assert!(matches!(
            parse(&with("mappings", "{}")),
            Err(SchemaError::WrongType { field, .. }) if field == "mappings"
        ));
        assert!(matches!(
            parse(&with("mappings", "[1]")),
            Err(SchemaError::NotAnObject { location, .. }) if location == "mappings[0]"
        ));
        assert!(matches!(parse("[]"), Err(SchemaError::NotAnObject { .. })));
    }

    #[test]
    fn test_rejects_missing_fields_without_defaults() {
        assert!(matches!(
            parse(&with_mapping("explicit_timestamp", None)),
            Err(SchemaError::MissingField { field, .. })
                if field == "mappings[0].explicit_timestamp"
        ));
        let mut json: Value = serde_json::from_str(TEMPERATURE).unwrap();
        json.as_object_mut().unwrap().remove("aggregation");
        assert!(matches!(
            parse(&json.to_string()),
            Err(SchemaError::MissingField { field, .. }) if field == "aggregation"
        ));
    }

    #[test]
    fn test_applies_defaults_when_configured() {
        let mut json: Value = serde_json::from_str(TEMPERATURE).unwrap();
        json.as_object_mut().unwrap().remove("aggregation");
        let mapping = json["mappings"][0].as_object_mut().unwrap();
        mapping.remove("reliability");
        mapping.remove("explicit_timestamp");
        mapping.remove("allow_unset");

        let config = LoadConfig {
            apply_defaults: true,
            ..LoadConfig::default()
        };
        let doc = parse_document(Path::new("x.json"), &json.to_string(), &config).unwrap();
        assert_eq!(doc.aggregation, Aggregation::Individual);
        assert_eq!(doc.mappings[0].reliability, Reliability::Unreliable);
        assert!(!doc.mappings[0].explicit_timestamp);
        assert!(!doc.mappings[0].allow_unset);
    }

    #[test]
    fn test_rejects_empty_mappings() {
        assert!(matches!(
            parse(&with("mappings", "[]")),
            Err(SchemaError::EmptyMappings { .. })
        ));
    }

    #[test]
    fn test_rejects_text_that_breaks_output() {
        assert!(matches!(
            parse(&with("interface_name", "\"org.\\\"bad\"")),
            Err(SchemaError::Malformed { .. })
        ));
        assert!(matches!(
            parse(&with("interface_name", "\"1org.Temp\"")),
            Err(SchemaError::Malformed { .. })
        ));
        assert!(matches!(
            parse(&with_mapping("endpoint", Some("\"temp\""))),
            Err(SchemaError::Malformed { .. })
        ));
        assert!(matches!(
            parse(&with_mapping("endpoint", Some("\"/a\\\\b\""))),
            Err(SchemaError::Malformed { .. })
        ));
        assert!(parse(&with_mapping("endpoint", Some("\"/sensor/%{id}/value\""))).is_ok());
    }

    #[test]
    fn test_error_names_file() {
        let err = parse("{").unwrap_err();
        assert!(err.to_string().contains("org.Temp.json"));
    }
}
