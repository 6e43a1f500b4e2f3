//! Layout Mapping
//!
//! Translates interface documents into the vocabulary of the C interface
//! tables: every enumerated value becomes the name of the matching constant
//! from `astarte_device_sdk/interface.h` and `astarte_device_sdk/mapping.h`.
//!
//! All decisions the renderer needs are made here. The renderer only
//! substitutes the resulting strings into its templates.

use std::path::PathBuf;

use crate::interface::{
    Aggregation, InterfaceDocument, InterfaceType, Mapping, MappingType, Ownership, Reliability,
};

use super::names::sanitize;

/// One `astarte_mapping_t` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedMapping {
    pub endpoint: String,
    pub type_constant: &'static str,
    pub reliability_constant: &'static str,
    pub explicit_timestamp: &'static str,
    pub allow_unset: &'static str,
}

/// One `astarte_interface_t` record plus its mapping array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedInterface {
    /// C identifier of the interface record
    pub symbol: String,
    /// Interface name as written in the document
    pub name: String,
    pub version_major: u32,
    pub version_minor: u32,
    pub type_constant: &'static str,
    pub ownership_constant: &'static str,
    pub aggregation_constant: &'static str,
    /// Mapping records in document order
    pub mappings: Vec<MappedMapping>,
    /// File the interface was loaded from
    pub source_path: PathBuf,
}

impl MappedInterface {
    /// Explicit array length written next to the mapping array
    pub fn mappings_length(&self) -> usize {
        self.mappings.len()
    }

    /// Identifier of the static mapping array
    pub fn mappings_symbol(&self) -> String {
        format!("{}_mappings", self.symbol)
    }
}

/// Map one interface document
pub fn map_interface(document: &InterfaceDocument) -> MappedInterface {
    MappedInterface {
        symbol: sanitize(&document.name),
        name: document.name.clone(),
        version_major: document.version_major,
        version_minor: document.version_minor,
        type_constant: interface_type_constant(document.interface_type),
        ownership_constant: ownership_constant(document.ownership),
        aggregation_constant: aggregation_constant(document.aggregation),
        mappings: document.mappings.iter().map(map_mapping).collect(),
        source_path: document.source_path.clone(),
    }
}

/// Map every document, keeping input order
pub fn map_all(documents: &[InterfaceDocument]) -> Vec<MappedInterface> {
    documents.iter().map(map_interface).collect()
}

fn map_mapping(mapping: &Mapping) -> MappedMapping {
    MappedMapping {
        endpoint: mapping.endpoint.clone(),
        type_constant: mapping_type_constant(mapping.mapping_type),
        reliability_constant: reliability_constant(mapping.reliability),
        explicit_timestamp: bool_literal(mapping.explicit_timestamp),
        allow_unset: bool_literal(mapping.allow_unset),
    }
}

// =============================================================================
// Constant tables
// =============================================================================

pub fn mapping_type_constant(mapping_type: MappingType) -> &'static str {
    match mapping_type {
        MappingType::Double => "ASTARTE_MAPPING_TYPE_DOUBLE",
        MappingType::Integer => "ASTARTE_MAPPING_TYPE_INTEGER",
        MappingType::Boolean => "ASTARTE_MAPPING_TYPE_BOOLEAN",
        MappingType::LongInteger => "ASTARTE_MAPPING_TYPE_LONGINTEGER",
        MappingType::String => "ASTARTE_MAPPING_TYPE_STRING",
        MappingType::BinaryBlob => "ASTARTE_MAPPING_TYPE_BINARYBLOB",
        MappingType::DateTime => "ASTARTE_MAPPING_TYPE_DATETIME",
        MappingType::DoubleArray => "ASTARTE_MAPPING_TYPE_DOUBLEARRAY",
        MappingType::IntegerArray => "ASTARTE_MAPPING_TYPE_INTEGERARRAY",
        MappingType::BooleanArray => "ASTARTE_MAPPING_TYPE_BOOLEANARRAY",
        MappingType::LongIntegerArray => "ASTARTE_MAPPING_TYPE_LONGINTEGERARRAY",
        MappingType::StringArray => "ASTARTE_MAPPING_TYPE_STRINGARRAY",
        MappingType::BinaryBlobArray => "ASTARTE_MAPPING_TYPE_BINARYBLOBARRAY",
        MappingType::DateTimeArray => "ASTARTE_MAPPING_TYPE_DATETIMEARRAY",
    }
}

pub fn reliability_constant(reliability: Reliability) -> &'static str {
    match reliability {
        Reliability::Unreliable => "ASTARTE_MAPPING_RELIABILITY_UNRELIABLE",
        Reliability::Guaranteed => "ASTARTE_MAPPING_RELIABILITY_GUARANTEED",
        Reliability::Unique => "ASTARTE_MAPPING_RELIABILITY_UNIQUE",
    }
}

pub fn interface_type_constant(interface_type: InterfaceType) -> &'static str {
    match interface_type {
        InterfaceType::Datastream => "ASTARTE_INTERFACE_TYPE_DATASTREAM",
        InterfaceType::Properties => "ASTARTE_INTERFACE_TYPE_PROPERTIES",
    }
}

pub fn ownership_constant(ownership: Ownership) -> &'static str {
    match ownership {
        Ownership::Device => "ASTARTE_INTERFACE_OWNERSHIP_DEVICE",
        Ownership::Server => "ASTARTE_INTERFACE_OWNERSHIP_SERVER",
    }
}

pub fn aggregation_constant(aggregation: Aggregation) -> &'static str {
    match aggregation {
        Aggregation::Individual => "ASTARTE_INTERFACE_AGGREGATION_INDIVIDUAL",
        Aggregation::Object => "ASTARTE_INTERFACE_AGGREGATION_OBJECT",
    }
}

pub fn bool_literal(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
