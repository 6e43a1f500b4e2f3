//! Astarte Interface Code Generator
//!
//! Compiles a directory of Astarte interface definitions (`.json`) into a pair
//! of C artifacts holding one constant `astarte_interface_t` table per
//! interface, so the device SDK never parses interface JSON at runtime.
//!
//! ## Features
//!
//! - **Strict Loading**: every recognized field is validated, the first bad file aborts the run
//! - **Deterministic Output**: interfaces are ordered by file name, mappings by document order
//! - **Collision Detection**: two interfaces mapping to one C identifier are rejected
//! - **Check Mode**: verify that checked-in artifacts match what would be generated
//!
//! ## Pipeline
//!
//! ```text
//! interfaces/
//! ├── org.example.Sensor.json      ──┐
//! └── org.example.Settings.json    ──┤ loader ─> layout ─> render ─┬─> generated_interfaces.h
//!                                    │                              └─> generated_interfaces.c
//! ```

pub mod checksum;
pub mod codegen;
pub mod config;
pub mod emit;
pub mod error;
pub mod interface;
pub mod loader;

pub use checksum::Checksum;
pub use config::GeneratorConfig;
pub use emit::{run, EmitReport, GenerateOptions, Mode};
pub use error::{Error, MismatchKind, Result, SchemaError};
pub use interface::{
    Aggregation, InterfaceDocument, InterfaceType, Mapping, MappingType, Ownership, Reliability,
};
pub use loader::LoadConfig;
