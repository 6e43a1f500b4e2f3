//! Artifact Emission
//!
//! Runs one generation: load -> map -> collision check -> render, then either
//! writes both artifacts or compares them against the ones already on disk.
//!
//! Nothing touches the output directory until every interface has loaded and
//! both artifacts are rendered. In write mode both files are staged as
//! temporary files next to their targets and only renamed into place once
//! both were written completely.

use std::fs::{self, File, Permissions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use similar::TextDiff;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::checksum::Checksum;
use crate::codegen::{self, ArtifactKind, RenderedArtifacts};
use crate::config::GeneratorConfig;
use crate::error::{Error, MismatchKind, Result};
use crate::loader::{self, LoadConfig};

/// What to do with the rendered artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create the output directory if needed and overwrite both artifacts
    Write,
    /// Compare against existing artifacts without writing
    Check,
}

/// Inputs of one generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory containing the interface files
    pub schema_dir: PathBuf,
    /// Directory receiving (or holding, in check mode) the artifacts
    pub output_dir: PathBuf,
    /// File name of the artifacts without extension
    pub base_name: String,
    pub mode: Mode,
    pub load: LoadConfig,
}

impl GenerateOptions {
    /// Write mode, output next to the interfaces, default base name
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        let schema_dir = schema_dir.into();
        Self {
            output_dir: schema_dir.clone(),
            schema_dir,
            base_name: codegen::DEFAULT_BASE_NAME.to_string(),
            mode: Mode::Write,
            load: LoadConfig::default(),
        }
    }

    /// Options for `schema_dir` with the output settings of a configuration
    pub fn from_config(schema_dir: impl Into<PathBuf>, config: &GeneratorConfig) -> Self {
        let mut options = Self::new(schema_dir);
        if let Some(dir) = &config.output.dir {
            options.output_dir = dir.clone();
        }
        options.base_name = config.base_name();
        options.load = config.load_config();
        options
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.base_name = codegen::base_name(prefix);
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}

/// One artifact handled by a run
#[derive(Debug, Clone)]
pub struct ArtifactReport {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub checksum: Checksum,
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct EmitReport {
    pub mode: Mode,
    pub base_name: String,
    pub interface_count: usize,
    /// Header first, then source
    pub artifacts: Vec<ArtifactReport>,
}

/// Run one generation. Any error aborts the run without partial output.
pub fn run(options: &GenerateOptions) -> Result<EmitReport> {
    let documents = loader::load_from_directory(&options.schema_dir, &options.load)?;
    let mapped = codegen::map_all(&documents);
    codegen::check_collisions(&mapped)?;

    let rendered = codegen::render(&mapped, &options.base_name);

    match options.mode {
        Mode::Write => write_artifacts(&options.output_dir, &rendered)?,
        Mode::Check => check_artifacts(&options.output_dir, &rendered)?,
    }

    let artifacts: Vec<ArtifactReport> = rendered
        .iter()
        .map(|artifact| ArtifactReport {
            kind: artifact.kind,
            path: options.output_dir.join(&artifact.file_name),
            checksum: Checksum::from_str(&artifact.contents),
        })
        .collect();

    info!(
        mode = ?options.mode,
        interfaces = documents.len(),
        header = artifacts[0].checksum.short(),
        source = artifacts[1].checksum.short(),
        "generation finished"
    );

    Ok(EmitReport {
        mode: options.mode,
        base_name: options.base_name.clone(),
        interface_count: documents.len(),
        artifacts,
    })
}

// =============================================================================
// Write mode
// =============================================================================

/// Write both artifacts into `output_dir`, creating it if needed
pub fn write_artifacts(output_dir: &Path, rendered: &RenderedArtifacts) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|source| Error::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut staged = Vec::with_capacity(2);
    for artifact in rendered.iter() {
        let path = output_dir.join(&artifact.file_name);
        let temp = stage(output_dir, &path, artifact.contents.as_bytes())
            .map_err(|source| Error::Write { path: path.clone(), source })?;
        staged.push((temp, path));
    }

    for (temp, path) in staged {
        temp.persist(&path).map_err(|e| Error::Write {
            path: path.clone(),
            source: e.error,
        })?;
        debug!(path = %path.display(), "wrote artifact");
    }

    Ok(())
}

fn stage(dir: &Path, target: &Path, contents: &[u8]) -> io::Result<NamedTempFile> {
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.as_file().set_permissions(target_permissions(temp.as_file(), target)?)?;
    Ok(temp)
}

/// Keep the permissions of an existing artifact, otherwise use regular file permissions
fn target_permissions(temp: &File, target: &Path) -> io::Result<Permissions> {
    match fs::metadata(target) {
        Ok(meta) => Ok(meta.permissions()),
        Err(_) => default_permissions(temp),
    }
}

#[cfg(unix)]
fn default_permissions(_temp: &File) -> io::Result<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(temp: &File) -> io::Result<Permissions> {
    Ok(temp.metadata()?.permissions())
}

// =============================================================================
// Check mode
// =============================================================================

/// Compare both artifacts with the files in `output_dir`, header first
pub fn check_artifacts(output_dir: &Path, rendered: &RenderedArtifacts) -> Result<()> {
    if !output_dir.is_dir() {
        return Err(Error::CheckMismatch {
            path: output_dir.to_path_buf(),
            kind: MismatchKind::MissingDirectory,
        });
    }

    for artifact in rendered.iter() {
        let path = output_dir.join(&artifact.file_name);
        let existing = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::CheckMismatch {
                    path,
                    kind: MismatchKind::MissingArtifact(artifact.kind),
                });
            }
            Err(e) => {
                return Err(Error::CheckMismatch {
                    path,
                    kind: MismatchKind::Unreadable(artifact.kind, e),
                });
            }
        };

        if existing != artifact.contents.as_bytes() {
            let existing = String::from_utf8_lossy(&existing);
            let diff = unified_diff(&existing, &artifact.contents, &artifact.file_name);
            warn!(path = %path.display(), "{} is not up to date", artifact.kind);
            return Err(Error::CheckMismatch {
                path,
                kind: MismatchKind::Stale {
                    artifact: artifact.kind,
                    diff,
                },
            });
        }

        debug!(path = %path.display(), "artifact up to date");
    }

    Ok(())
}

fn unified_diff(existing: &str, expected: &str, file_name: &str) -> String {
    TextDiff::from_lines(existing, expected)
        .unified_diff()
        .context_radius(3)
        .header(&format!("{} (on disk)", file_name), &format!("{} (generated)", file_name))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::render;
    use tempfile::TempDir;

    fn rendered() -> RenderedArtifacts {
        render(&[], "generated_interfaces")
    }

    #[test]
    fn test_write_then_check() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested/out");

        write_artifacts(&out, &rendered()).unwrap();
        assert!(out.join("generated_interfaces.h").is_file());
        assert!(out.join("generated_interfaces.c").is_file());
        check_artifacts(&out, &rendered()).unwrap();

        // Only the two artifacts remain, no staging files
        assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("generated_interfaces.h"), "stale").unwrap();

        write_artifacts(dir.path(), &rendered()).unwrap();
        let header = fs::read_to_string(dir.path().join("generated_interfaces.h")).unwrap();
        assert_eq!(header, rendered().header.contents);
    }

    #[test]
    fn test_check_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = check_artifacts(&dir.path().join("absent"), &rendered()).unwrap_err();
        assert!(matches!(
            err,
            Error::CheckMismatch { kind: MismatchKind::MissingDirectory, .. }
        ));
    }

    #[test]
    fn test_check_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let err = check_artifacts(dir.path(), &rendered()).unwrap_err();
        assert!(matches!(
            err,
            Error::CheckMismatch { kind: MismatchKind::MissingArtifact(ArtifactKind::Header), .. }
        ));
    }

    #[test]
    fn test_check_reports_stale_source_with_diff() {
        let dir = TempDir::new().unwrap();
        write_artifacts(dir.path(), &rendered()).unwrap();
        let source = dir.path().join("generated_interfaces.c");
        let edited = rendered().source.contents.replace("@warning", "@note");
        fs::write(&source, edited).unwrap();

        let err = check_artifacts(dir.path(), &rendered()).unwrap_err();
        assert!(err.to_string().contains("source is not up to date"));
        let diff = err.diff().unwrap();
        assert!(diff.contains("-"));
        assert!(diff.contains("+ * @warning Do not modify this file manually."));
    }

    #[cfg(unix)]
    #[test]
    fn test_new_artifacts_are_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write_artifacts(dir.path(), &rendered()).unwrap();
        let mode = fs::metadata(dir.path().join("generated_interfaces.h"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
