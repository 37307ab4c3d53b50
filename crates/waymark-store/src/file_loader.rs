//! Loads an adventure definition from a YAML or JSON file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use waymark_adventure::domain::adventure::{Adventure, AdventureDefinition};
use waymark_adventure::domain::loader::AdventureLoader;
use waymark_core::error::DomainError;

/// Serialization format of an adventure file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdventureFormat {
    /// `.json` files.
    Json,
    /// Everything else.
    Yaml,
}

impl AdventureFormat {
    /// Picks the format from the file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parses an adventure from its serialized text.
///
/// Routes whose destination does not exist are logged, not rejected; the
/// engine falls back at runtime if one is taken.
///
/// # Errors
///
/// Returns `DomainError::MalformedAdventure` if the text cannot be parsed or
/// the node invariants are violated.
pub fn parse_adventure(source: &str, format: AdventureFormat) -> Result<Adventure, DomainError> {
    let definition: AdventureDefinition = match format {
        AdventureFormat::Json => serde_json::from_str(source)
            .map_err(|e| DomainError::MalformedAdventure(format!("invalid JSON: {e}")))?,
        AdventureFormat::Yaml => serde_yaml::from_str(source)
            .map_err(|e| DomainError::MalformedAdventure(format!("invalid YAML: {e}")))?,
    };
    let adventure = Adventure::try_from(definition)?;

    for (node, route) in adventure.dangling_routes() {
        warn!(
            adventure_id = adventure.id(),
            node_name = %node.name,
            intent = %route.intent,
            next_node = %route.next_node,
            "route points at a node that does not exist"
        );
    }
    Ok(adventure)
}

/// Re-reads the adventure file on every request, so edits take effect
/// without a restart.
#[derive(Debug, Clone)]
pub struct FileAdventureLoader {
    path: PathBuf,
    format: AdventureFormat,
}

impl FileAdventureLoader {
    /// Creates a loader for `path`; the format follows the extension.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = AdventureFormat::from_path(&path);
        Self { path, format }
    }

    /// Returns the file this loader reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AdventureLoader for FileAdventureLoader {
    async fn load_adventure(&self) -> Result<Arc<Adventure>, DomainError> {
        let source = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::StorageUnavailable(format!(
                "cannot read adventure {}: {e}",
                self.path.display()
            ))
        })?;
        let adventure = parse_adventure(&source, self.format)?;
        debug!(adventure_id = adventure.id(), path = %self.path.display(), "adventure loaded");
        Ok(Arc::new(adventure))
    }
}
