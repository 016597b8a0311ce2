use crate::associations::AuthorSet;
use crate::entities::Author;
use crate::errors::DomainError;
use crate::repositories::AuthorRepository;
use crate::validation::Violations;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Authors linked and unlinked by a change to a book's author set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorDiff {
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
}

impl AuthorDiff {
    pub fn between(before: &AuthorSet, after: &AuthorSet) -> Self {
        Self {
            added: after.keys().filter(|id| !before.contains(*id)).collect(),
            removed: before.keys().filter(|id| !after.contains(*id)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Resolves author names to shared author records and removes authors that
/// no book references anymore.
pub struct AuthorLinker {
    author_repository: Arc<dyn AuthorRepository>,
}

impl AuthorLinker {
    pub fn new(author_repository: Arc<dyn AuthorRepository>) -> Self {
        Self { author_repository }
    }

    /// Maps each name to an existing author (matched case-insensitively) or a
    /// fresh one. Names repeated within `names` yield a single author.
    pub async fn resolve(&self, names: &[String]) -> Result<Vec<Author>, DomainError> {
        let mut violations = Violations::new();
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for name in names {
            match Author::new(name) {
                Ok(author) => {
                    if seen.insert(Author::name_key(&author.name)) {
                        candidates.push(author);
                    }
                }
                Err(DomainError::ValidationError(reason)) => {
                    violations.check(true, format!("Author '{}': {}", name.trim(), reason));
                }
                Err(other) => return Err(other),
            }
        }
        violations.into_result()?;

        let mut resolved = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match self.author_repository.find_by_name(&candidate.name).await? {
                Some(existing) => {
                    debug!(author_id = %existing.id, name = %existing.name, "matched existing author");
                    resolved.push(existing);
                }
                None => resolved.push(candidate),
            }
        }
        Ok(resolved)
    }

    /// Deletes every candidate that is no longer linked to any book. Storage
    /// decides orphan status at delete time, so an author relinked by a
    /// concurrent write is left alone. Returns the ids that were removed.
    pub async fn sweep_orphans<I>(&self, candidates: I) -> Result<Vec<Uuid>, DomainError>
    where
        I: IntoIterator<Item = Uuid> + Send,
    {
        let mut removed = Vec::new();
        for author_id in candidates {
            if self.author_repository.delete_if_orphaned(author_id).await? {
                removed.push(author_id);
            }
        }
        if !removed.is_empty() {
            info!(count = removed.len(), "removed orphaned authors");
        }
        Ok(removed)
    }
}
