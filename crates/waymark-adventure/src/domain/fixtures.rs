//! Shared test adventure and adventure loader doubles.

use std::sync::Arc;

use async_trait::async_trait;
use waymark_core::error::DomainError;

use super::adventure::{Adventure, AdventureDefinition};
use super::loader::AdventureLoader;

/// Source of the sample adventure shipped with the server.
pub(crate) const LIGHTHOUSE_YAML: &str = include_str!("../../../../adventures/lighthouse.yaml");

/// Parses the sample adventure.
pub(crate) fn lighthouse() -> Adventure {
    let definition: AdventureDefinition = serde_yaml::from_str(LIGHTHOUSE_YAML).unwrap();
    Adventure::try_from(definition).unwrap()
}

/// Serves a pre-built adventure.
#[derive(Debug)]
pub(crate) struct FixtureLoader(pub Arc<Adventure>);

impl FixtureLoader {
    pub(crate) fn lighthouse() -> Self {
        Self(Arc::new(lighthouse()))
    }
}

#[async_trait]
impl AdventureLoader for FixtureLoader {
    async fn load_adventure(&self) -> Result<Arc<Adventure>, DomainError> {
        Ok(Arc::clone(&self.0))
    }
}

/// Always reports the adventure source as unreachable.
#[derive(Debug)]
pub(crate) struct UnreachableLoader;

#[async_trait]
impl AdventureLoader for UnreachableLoader {
    async fn load_adventure(&self) -> Result<Arc<Adventure>, DomainError> {
        Err(DomainError::StorageUnavailable("bucket unreachable".into()))
    }
}
