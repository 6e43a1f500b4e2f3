//! Interface document types
//!
//! One [`InterfaceDocument`] is built per schema file by the loader and is
//! immutable afterwards. Every enumerated field is a closed Rust enum, so an
//! unknown raw value can only be rejected at load time, never defaulted.

use std::path::PathBuf;

/// Interface type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceType {
    Datastream,
    Properties,
}

/// Which side is authoritative for writing values on an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    Device,
    Server,
}

/// Whether endpoints are delivered individually or bundled as one object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    Individual,
    Object,
}

/// Delivery-quality level of a datastream endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reliability {
    Unreliable,
    Guaranteed,
    Unique,
}

/// Data type of a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingType {
    Double,
    Integer,
    Boolean,
    LongInteger,
    String,
    BinaryBlob,
    DateTime,
    DoubleArray,
    IntegerArray,
    BooleanArray,
    LongIntegerArray,
    StringArray,
    BinaryBlobArray,
    DateTimeArray,
}

impl InterfaceType {
    /// Parse the document spelling
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "datastream" => Some(InterfaceType::Datastream),
            "properties" => Some(InterfaceType::Properties),
            _ => None,
        }
    }
}

impl Ownership {
    /// Parse the document spelling
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "device" => Some(Ownership::Device),
            "server" => Some(Ownership::Server),
            _ => None,
        }
    }
}

impl Aggregation {
    /// Parse the document spelling
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "individual" => Some(Aggregation::Individual),
            "object" => Some(Aggregation::Object),
            _ => None,
        }
    }
}

impl Reliability {
    /// Map the integer severity 0/1/2. Any other value has no level.
    pub fn from_level(level: u64) -> Option<Self> {
        match level {
            0 => Some(Reliability::Unreliable),
            1 => Some(Reliability::Guaranteed),
            2 => Some(Reliability::Unique),
            _ => None,
        }
    }

    /// Parse the named spelling used by Astarte interface files
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "unreliable" => Some(Reliability::Unreliable),
            "guaranteed" => Some(Reliability::Guaranteed),
            "unique" => Some(Reliability::Unique),
            _ => None,
        }
    }
}

impl MappingType {
    /// All mapping types, scalars first
    pub const ALL: [MappingType; 14] = [
        MappingType::Double,
        MappingType::Integer,
        MappingType::Boolean,
        MappingType::LongInteger,
        MappingType::String,
        MappingType::BinaryBlob,
        MappingType::DateTime,
        MappingType::DoubleArray,
        MappingType::IntegerArray,
        MappingType::BooleanArray,
        MappingType::LongIntegerArray,
        MappingType::StringArray,
        MappingType::BinaryBlobArray,
        MappingType::DateTimeArray,
    ];

    /// Document spelling of the type tag
    pub fn tag(self) -> &'static str {
        match self {
            MappingType::Double => "double",
            MappingType::Integer => "integer",
            MappingType::Boolean => "boolean",
            MappingType::LongInteger => "longinteger",
            MappingType::String => "string",
            MappingType::BinaryBlob => "binaryblob",
            MappingType::DateTime => "datetime",
            MappingType::DoubleArray => "doublearray",
            MappingType::IntegerArray => "integerarray",
            MappingType::BooleanArray => "booleanarray",
            MappingType::LongIntegerArray => "longintegerarray",
            MappingType::StringArray => "stringarray",
            MappingType::BinaryBlobArray => "binaryblobarray",
            MappingType::DateTimeArray => "datetimearray",
        }
    }

    /// Parse the document spelling
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.tag() == tag)
    }
}

/// One endpoint definition inside an interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    /// Path-like endpoint, e.g. `/sensor/%{id}/value`
    pub endpoint: String,
    pub mapping_type: MappingType,
    /// Only meaningful for datastreams, always present
    pub reliability: Reliability,
    pub explicit_timestamp: bool,
    /// Only meaningful for properties, always present
    pub allow_unset: bool,
}

/// A validated interface definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDocument {
    /// Interface name, e.g. `org.example.Sensor`
    pub name: String,
    pub version_major: u32,
    pub version_minor: u32,
    pub interface_type: InterfaceType,
    pub ownership: Ownership,
    pub aggregation: Aggregation,
    /// Mappings in document order, never empty
    pub mappings: Vec<Mapping>,
    /// File the document was loaded from
    pub source_path: PathBuf,
}

impl InterfaceDocument {
    /// Number of mappings
    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }
}
