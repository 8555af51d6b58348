//! Artifact references and the artifact store.
//!
//! Every stage consumes and produces named, versioned dataset artifacts so
//! each derived dataset is traceable to its exact inputs. The store itself is
//! an external collaborator behind [`ArtifactStore`]; the bundled
//! [`LocalArtifactStore`] keeps versioned directories with JSON metadata and
//! is what the CLI uses.

use crate::{DataError, Dataset, Result, write_csv};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

const DATA_FILE: &str = "data.csv";
const METADATA_FILE: &str = "metadata.json";

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("artifact name pattern is valid")
    })
}

/// The version component of an artifact reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactVersion {
    /// The highest published version
    Latest,
    /// A specific version number
    Number(u32),
}

/// A reference to a named, versioned dataset artifact.
///
/// Syntax: `name`, `name:latest`, or `name:v3`. Names start with an
/// alphanumeric character and may contain `.`, `_`, and `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    /// Artifact name
    pub name: String,
    /// Requested version
    pub version: ArtifactVersion,
}

impl ArtifactRef {
    /// Parses a reference string.
    pub fn parse(reference: &str) -> Result<Self> {
        let (name, version) = match reference.split_once(':') {
            None => (reference, ArtifactVersion::Latest),
            Some((name, "latest")) => (name, ArtifactVersion::Latest),
            Some((name, tag)) => {
                let number = tag
                    .strip_prefix('v')
                    .and_then(|n| n.parse::<u32>().ok())
                    .ok_or_else(|| {
                        DataError::invalid_ref(
                            reference,
                            format!("version must be 'latest' or 'v<N>', got '{tag}'"),
                        )
                    })?;
                (name, ArtifactVersion::Number(number))
            }
        };

        if !name_pattern().is_match(name) {
            return Err(DataError::invalid_ref(
                reference,
                "name must match [A-Za-z0-9][A-Za-z0-9._-]*",
            ));
        }

        Ok(Self {
            name: name.to_string(),
            version,
        })
    }
}

impl std::fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.version {
            ArtifactVersion::Latest => write!(f, "{}:latest", self.name),
            ArtifactVersion::Number(n) => write!(f, "{}:v{}", self.name, n),
        }
    }
}

/// Lineage metadata stored next to each published artifact version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Artifact name
    pub name: String,
    /// Version number
    pub version: u32,
    /// Artifact type (e.g. `raw_data`, `clean_sample`, `dataset`)
    pub kind: String,
    /// Human-readable description
    pub description: String,
    /// References of the artifacts this one was derived from
    pub inputs: Vec<String>,
    /// Publication timestamp
    pub created_at: DateTime<Utc>,
    /// Data file name within the version directory
    pub file: String,
}

/// External interface to the artifact store.
pub trait ArtifactStore {
    /// Resolves a reference to a local file path.
    fn fetch(&self, reference: &ArtifactRef) -> Result<PathBuf>;

    /// Publishes a file as a new artifact version and returns its reference.
    fn publish(&self, name: &str, kind: &str, description: &str, file: &Path)
    -> Result<ArtifactRef>;
}

/// Filesystem-backed artifact store.
///
/// Layout: `<root>/<name>/v<N>/data.csv` plus `metadata.json` in each
/// version directory. Versions start at 1 and only ever grow; published
/// artifacts are never rewritten.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    /// Opens (or lazily creates) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Highest published version of an artifact, if any.
    fn latest_version(&self, name: &str) -> Option<u32> {
        let entries = fs::read_dir(self.root.join(name)).ok()?;
        entries
            .filter_map(|entry| {
                entry
                    .ok()?
                    .file_name()
                    .to_str()?
                    .strip_prefix('v')?
                    .parse::<u32>()
                    .ok()
            })
            .max()
    }

    fn version_dir(&self, name: &str, version: u32) -> PathBuf {
        self.root.join(name).join(format!("v{version}"))
    }

    /// Reads the metadata of a specific version.
    pub fn metadata(&self, reference: &ArtifactRef) -> Result<ArtifactMetadata> {
        let version = self.resolve_version(reference)?;
        let path = self.version_dir(&reference.name, version).join(METADATA_FILE);
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn resolve_version(&self, reference: &ArtifactRef) -> Result<u32> {
        match reference.version {
            ArtifactVersion::Number(n) => Ok(n),
            ArtifactVersion::Latest => self
                .latest_version(&reference.name)
                .ok_or_else(|| DataError::ArtifactNotFound(reference.to_string())),
        }
    }

    /// Publishes a dataset directly, recording its input references for
    /// lineage. Writes the CSV into the new version directory; no staging
    /// copy is needed.
    pub fn publish_dataset(
        &self,
        name: &str,
        kind: &str,
        description: &str,
        inputs: &[String],
        dataset: &Dataset,
    ) -> Result<ArtifactRef> {
        let version = self.latest_version(name).map_or(1, |v| v + 1);
        let dir = self.version_dir(name, version);
        fs::create_dir_all(&dir)?;

        write_csv(dataset, &dir.join(DATA_FILE))?;
        self.write_metadata(name, version, kind, description, inputs)?;

        let reference = ArtifactRef {
            name: name.to_string(),
            version: ArtifactVersion::Number(version),
        };
        info!(artifact = %reference, rows = dataset.len(), "published dataset artifact");
        Ok(reference)
    }

    fn write_metadata(
        &self,
        name: &str,
        version: u32,
        kind: &str,
        description: &str,
        inputs: &[String],
    ) -> Result<()> {
        let metadata = ArtifactMetadata {
            name: name.to_string(),
            version,
            kind: kind.to_string(),
            description: description.to_string(),
            inputs: inputs.to_vec(),
            created_at: Utc::now(),
            file: DATA_FILE.to_string(),
        };
        let path = self.version_dir(name, version).join(METADATA_FILE);
        fs::write(path, serde_json::to_string_pretty(&metadata)?)?;
        Ok(())
    }
}

impl ArtifactStore for LocalArtifactStore {
    fn fetch(&self, reference: &ArtifactRef) -> Result<PathBuf> {
        let version = self.resolve_version(reference)?;
        let dir = self.version_dir(&reference.name, version);
        let metadata_path = dir.join(METADATA_FILE);
        if !metadata_path.is_file() {
            return Err(DataError::ArtifactNotFound(reference.to_string()));
        }
        let metadata: ArtifactMetadata =
            serde_json::from_str(&fs::read_to_string(metadata_path)?)?;
        Ok(dir.join(metadata.file))
    }

    fn publish(
        &self,
        name: &str,
        kind: &str,
        description: &str,
        file: &Path,
    ) -> Result<ArtifactRef> {
        if !name_pattern().is_match(name) {
            return Err(DataError::invalid_ref(
                name,
                "name must match [A-Za-z0-9][A-Za-z0-9._-]*",
            ));
        }
        let version = self.latest_version(name).map_or(1, |v| v + 1);
        let dir = self.version_dir(name, version);
        fs::create_dir_all(&dir)?;

        fs::copy(file, dir.join(DATA_FILE))?;
        self.write_metadata(name, version, kind, description, &[])?;

        let reference = ArtifactRef {
            name: name.to_string(),
            version: ArtifactVersion::Number(version),
        };
        info!(artifact = %reference, "published file artifact");
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataValue;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_dataset() -> Dataset {
        let mut dataset =
            Dataset::new(vec!["id".to_string(), "price".to_string()]).unwrap();
        dataset
            .push_row(vec![DataValue::Int(1), DataValue::Int(100)])
            .unwrap();
        dataset
    }

    #[test]
    fn test_parse_reference_forms() {
        assert_eq!(
            ArtifactRef::parse("raw_data").unwrap().version,
            ArtifactVersion::Latest
        );
        assert_eq!(
            ArtifactRef::parse("raw_data:latest").unwrap().version,
            ArtifactVersion::Latest
        );
        assert_eq!(
            ArtifactRef::parse("clean_sample.csv:v3").unwrap().version,
            ArtifactVersion::Number(3)
        );
    }

    #[test]
    fn test_parse_rejects_bad_references() {
        assert!(ArtifactRef::parse("raw data").is_err());
        assert!(ArtifactRef::parse("raw:v").is_err());
        assert!(ArtifactRef::parse("raw:3").is_err());
        assert!(ArtifactRef::parse(":v1").is_err());
    }

    #[test]
    fn test_publish_and_fetch_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(dir.path());

        let reference = store
            .publish_dataset("clean_sample", "clean_data", "cleaned listings", &[], &sample_dataset())
            .unwrap();
        assert_eq!(reference.to_string(), "clean_sample:v1");

        let path = store
            .fetch(&ArtifactRef::parse("clean_sample:latest").unwrap())
            .unwrap();
        let dataset = crate::read_csv(&path).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_versions_increment() {
        let dir = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(dir.path());
        let dataset = sample_dataset();

        let v1 = store
            .publish_dataset("sample", "dataset", "", &[], &dataset)
            .unwrap();
        let v2 = store
            .publish_dataset("sample", "dataset", "", &[], &dataset)
            .unwrap();
        assert_eq!(v1.version, ArtifactVersion::Number(1));
        assert_eq!(v2.version, ArtifactVersion::Number(2));

        // latest resolves to v2
        let metadata = store
            .metadata(&ArtifactRef::parse("sample").unwrap())
            .unwrap();
        assert_eq!(metadata.version, 2);
    }

    #[test]
    fn test_lineage_recorded() {
        let dir = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(dir.path());

        let inputs = vec!["raw_data:v1".to_string()];
        let reference = store
            .publish_dataset("clean_sample", "clean_data", "", &inputs, &sample_dataset())
            .unwrap();

        let metadata = store.metadata(&reference).unwrap();
        assert_eq!(metadata.inputs, inputs);
        assert_eq!(metadata.kind, "clean_data");
    }

    #[test]
    fn test_fetch_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(dir.path());
        let result = store.fetch(&ArtifactRef::parse("nope").unwrap());
        assert!(matches!(result, Err(DataError::ArtifactNotFound(_))));
    }
}
