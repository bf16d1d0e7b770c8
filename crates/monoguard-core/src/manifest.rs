//! Package manifest model.
//!
//! A `Manifest` is a typed view over one package.json. It is re-read fresh
//! every run and only ever mutated by the reconciler, which rewrites the
//! file in full: pretty JSON, two-space indent, trailing newline. External
//! formatting is lost on rewrite. Dependency keys always serialize in
//! strict ascending lexical order (the backing maps are ordered).

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Error;
use monoguard_util::fs::atomic_write;

/// File name of a package manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// One package's manifest: declared metadata plus its dependency map.
#[derive(Debug, Clone)]
pub struct Manifest {
    name: String,
    version: Option<String>,
    dependencies: BTreeMap<String, String>,
    doc: Map<String, Value>,
    path: PathBuf,
}

impl Manifest {
    /// Read and validate a manifest file.
    pub fn read(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::ManifestRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| Error::ManifestParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        let Value::Object(doc) = value else {
            return Err(Error::ManifestInvalid {
                path: path.to_path_buf(),
                message: "manifest must be a JSON object".to_string(),
            });
        };

        let name = doc
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::ManifestInvalid {
                path: path.to_path_buf(),
                message: "missing \"name\" field".to_string(),
            })?
            .to_string();

        let version = doc
            .get("version")
            .and_then(Value::as_str)
            .map(String::from);

        let mut dependencies = BTreeMap::new();
        if let Some(deps) = doc.get("dependencies") {
            let Some(deps) = deps.as_object() else {
                return Err(Error::ManifestInvalid {
                    path: path.to_path_buf(),
                    message: "\"dependencies\" must be an object".to_string(),
                });
            };
            for (dep, range) in deps {
                let Some(range) = range.as_str() else {
                    return Err(Error::ManifestInvalid {
                        path: path.to_path_buf(),
                        message: format!("invalid range for '{dep}': expected string"),
                    });
                };
                dependencies.insert(dep.clone(), range.to_string());
            }
        }

        Ok(Self {
            name,
            version,
            dependencies,
            doc,
            path: path.to_path_buf(),
        })
    }

    /// Declared package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared version, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Path of the manifest file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared dependencies, name → version constraint, in key order.
    #[must_use]
    pub fn dependencies(&self) -> &BTreeMap<String, String> {
        &self.dependencies
    }

    /// Whether the manifest declares a dependency on `name`.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }

    /// Merge one dependency into the map, replacing any existing constraint.
    pub fn insert_dependency(&mut self, name: &str, range: &str) {
        self.dependencies.insert(name.to_string(), range.to_string());
    }

    /// Rewrite the manifest file in full from the current state.
    ///
    /// Unknown fields are preserved; the dependency map is emitted with keys
    /// in strict ascending lexical order and the file ends with a newline.
    pub fn write(&self) -> Result<(), Error> {
        let mut doc = self.doc.clone();

        if !self.dependencies.is_empty() || doc.contains_key("dependencies") {
            let mut deps = Map::new();
            for (dep, range) in &self.dependencies {
                deps.insert(dep.clone(), Value::String(range.clone()));
            }
            doc.insert("dependencies".to_string(), Value::Object(deps));
        }

        let rendered = serde_json::to_string_pretty(&doc).map_err(|e| Error::ManifestParse {
            path: self.path.clone(),
            source: e,
        })?;
        atomic_write(&self.path, format!("{rendered}\n").as_bytes())?;
        Ok(())
    }
}
