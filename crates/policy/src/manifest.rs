use serde::{Deserialize, Serialize};
use std::path::Path;
use tabgate_core::CapabilityName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid manifest: {0}")]
    Invalid(String),
}

/// The part of an extension manifest this crate reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub optional_permissions: Vec<String>,
}

/// Ordered, duplicate-free set of optional capabilities the extension
/// declares. Fixed for the lifetime of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredCapabilities {
    names: Vec<CapabilityName>,
}

impl DeclaredCapabilities {
    pub fn new<I, S>(names: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut declared: Vec<CapabilityName> = Vec::new();
        for name in names {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(ManifestError::Invalid(
                    "optional_permissions contains an empty name".to_string(),
                ));
            }
            let name = CapabilityName::from(name);
            if !declared.contains(&name) {
                declared.push(name);
            }
        }
        Ok(Self { names: declared })
    }

    pub fn from_manifest(manifest: &Manifest) -> Result<Self, ManifestError> {
        Self::new(manifest.optional_permissions.iter().cloned())
    }

    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_json::from_str(content)?;
        Self::from_manifest(&manifest)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_yaml::from_str(content)?;
        Self::from_manifest(&manifest)
    }

    /// Load from a `manifest.json`, or from YAML when the extension is
    /// `.yaml`/`.yml`.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;

        if content.trim().is_empty() {
            return Err(ManifestError::Invalid(format!(
                "Manifest is empty: {}",
                path.display()
            )));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.as_str() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapabilityName> {
        self.names.iter()
    }

    pub fn as_slice(&self) -> &[CapabilityName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
