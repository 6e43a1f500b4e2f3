//! Code Generation
//!
//! Turns validated interface documents into the C interface tables.
//!
//! Pipeline:
//! - names: interface name -> C identifier, plus the cross-set collision check
//! - layout: document fields -> constant names of the C headers
//! - render: mapped interfaces -> `.h` / `.c` text through fixed templates
//!
//! The renderer never looks at documents, only at mapped records.

pub mod layout;
pub mod names;
pub mod render;
pub mod template;

pub use layout::{map_all, map_interface, MappedInterface, MappedMapping};
pub use names::{check_collisions, sanitize};
pub use render::{render, Artifact, ArtifactKind, RenderedArtifacts};

/// Base name of the artifacts when no prefix is given
pub const DEFAULT_BASE_NAME: &str = "generated_interfaces";

/// Artifact base name for an output prefix
pub fn base_name(prefix: &str) -> String {
    format!("{}{}", prefix, DEFAULT_BASE_NAME)
}
