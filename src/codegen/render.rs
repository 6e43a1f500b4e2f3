//! Artifact Rendering
//!
//! Renders mapped interfaces into the declarations (`.h`) and definitions
//! (`.c`) artifacts. Rendering is a pure function of its inputs: the same
//! interfaces and base name always give byte-identical text.

use std::fmt;

use super::layout::{MappedInterface, MappedMapping};
use super::names::sanitize;
use super::template::{
    HEADER, INTERFACE_DECLARATION, INTERFACE_DEFINITION, MAPPING_DEFINITION, SOURCE,
};

/// Which of the two generated files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Declarations artifact
    Header,
    /// Definitions artifact
    Source,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Header => "h",
            ArtifactKind::Source => "c",
        }
    }

    /// File name for a given base name
    pub fn file_name(self, base_name: &str) -> String {
        format!("{}.{}", base_name, self.extension())
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Header => write!(f, "header"),
            ArtifactKind::Source => write!(f, "source"),
        }
    }
}

/// One rendered file, not yet written anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub contents: String,
}

/// Both rendered files of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    pub header: Artifact,
    pub source: Artifact,
}

impl RenderedArtifacts {
    /// Header first, then source
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        [&self.header, &self.source].into_iter()
    }
}

/// Render both artifacts for `interfaces`, in the given order
pub fn render(interfaces: &[MappedInterface], base_name: &str) -> RenderedArtifacts {
    RenderedArtifacts {
        header: Artifact {
            kind: ArtifactKind::Header,
            file_name: ArtifactKind::Header.file_name(base_name),
            contents: render_header(interfaces, base_name),
        },
        source: Artifact {
            kind: ArtifactKind::Source,
            file_name: ArtifactKind::Source.file_name(base_name),
            contents: render_source(interfaces, base_name),
        },
    }
}

/// Include guard macro for a base name
pub fn include_guard(base_name: &str) -> String {
    format!("{}_H", sanitize(base_name).to_ascii_uppercase())
}

pub fn render_header(interfaces: &[MappedInterface], base_name: &str) -> String {
    let declarations: Vec<String> = interfaces
        .iter()
        .map(|i| INTERFACE_DECLARATION.render(&[("symbol", i.symbol.as_str())]))
        .collect();

    let guard = include_guard(base_name);
    let declarations = declarations.join("\n");

    HEADER.render(&[
        ("output_filename", base_name),
        ("include_guard", guard.as_str()),
        ("interfaces_declarations", declarations.as_str()),
    ])
}

pub fn render_source(interfaces: &[MappedInterface], base_name: &str) -> String {
    let definitions: Vec<String> = interfaces.iter().map(render_interface).collect();
    let definitions = definitions.join("\n");

    SOURCE.render(&[
        ("output_filename", base_name),
        ("interfaces_definitions", definitions.as_str()),
    ])
}

fn render_interface(interface: &MappedInterface) -> String {
    let mappings: String = interface.mappings.iter().map(render_mapping).collect();
    let mappings_symbol = interface.mappings_symbol();
    let mappings_length = interface.mappings_length().to_string();
    let version_major = interface.version_major.to_string();
    let version_minor = interface.version_minor.to_string();

    INTERFACE_DEFINITION.render(&[
        ("mappings_symbol", mappings_symbol.as_str()),
        ("mappings_length", mappings_length.as_str()),
        ("mappings", mappings.as_str()),
        ("symbol", interface.symbol.as_str()),
        ("name", interface.name.as_str()),
        ("version_major", version_major.as_str()),
        ("version_minor", version_minor.as_str()),
        ("type", interface.type_constant),
        ("ownership", interface.ownership_constant),
        ("aggregation", interface.aggregation_constant),
    ])
}

fn render_mapping(mapping: &MappedMapping) -> String {
    MAPPING_DEFINITION.render(&[
        ("endpoint", mapping.endpoint.as_str()),
        ("type", mapping.type_constant),
        ("reliability", mapping.reliability_constant),
        ("explicit_timestamp", mapping.explicit_timestamp),
        ("allow_unset", mapping.allow_unset),
    ])
}
