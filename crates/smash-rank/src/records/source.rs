use super::RecordImportError;
use crate::query::{DataSource, ResolvedQuery};
use crate::ranking::Entity;

/// Fetch collaborator boundary. Implementations own any I/O; the engine never does.
pub trait EntitySource: Send + Sync {
    fn fetch(&self, query: &ResolvedQuery<'_>) -> Result<Vec<Entity>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Import(#[from] RecordImportError),
}

/// Source backed by records that were already loaded into memory.
///
/// Statewide queries with a state keep only entities whose `state` display field matches
/// (entities without one are kept). Tournament queries return every entity.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntitySource {
    entities: Vec<Entity>,
}

impl InMemoryEntitySource {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

impl EntitySource for InMemoryEntitySource {
    fn fetch(&self, query: &ResolvedQuery<'_>) -> Result<Vec<Entity>, SourceError> {
        let entities = match &query.source {
            DataSource::Statewide { state: Some(state) } => self
                .entities
                .iter()
                .filter(|entity| {
                    entity
                        .display_fields
                        .get("state")
                        .map(|value| value.eq_ignore_ascii_case(state))
                        .unwrap_or(true)
                })
                .cloned()
                .collect(),
            _ => self.entities.clone(),
        };
        Ok(entities)
    }
}
