//! Mechanism for building a [`Dataset`] from decoded records

use super::{ArticleSet, Dataset};
use crate::{
    format::{FormatError, Record},
    registry::{Category, Country, Key, Keyword, Named, Registry, Table, Tag},
    EntityId,
};

/// Accumulator for the records of a serialized dataset
///
/// Records must be added in file order, since they can only refer to entities
/// that were registered by earlier records.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    /// Entities registered so far
    registry: Registry,

    /// Article sets accumulated so far
    article_sets: Vec<ArticleSet>,
}
//
impl DatasetBuilder {
    /// Set up the accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate a decoded record
    ///
    /// `line` is the record's line number, used for error reporting.
    pub fn add_record(&mut self, line: usize, record: Record) -> Result<(), FormatError> {
        log::trace!("Integrating {record:?} from line {line}");
        match record {
            Record::Country { id, name } => {
                register(&mut self.registry.countries, line, id, Country::new(name));
            }
            Record::Category { id, name } => {
                register(&mut self.registry.categories, line, id, Category::new(name));
            }
            Record::Tag {
                category_id,
                id,
                name,
            } => {
                let category = lookup(&self.registry.categories, line, "category", category_id)?;
                register(&mut self.registry.tags, line, id, Tag::new(name, category));
            }
            Record::Keyword {
                category_id,
                tag_id,
                id,
                name,
            } => {
                let category = lookup(&self.registry.categories, line, "category", category_id)?;
                let tag = lookup(&self.registry.tags, line, "tag", tag_id)?;
                if self.registry.tags.get(tag).category() != category {
                    log::debug!(
                        "Keyword {name:?} on line {line} is filed under category {:?}, but its tag {:?} belongs to {:?}",
                        self.registry.categories.name(category),
                        self.registry.tags.name(tag),
                        self.registry.tag_category_name(tag),
                    );
                }
                register(
                    &mut self.registry.keywords,
                    line,
                    id,
                    Keyword::new(name, category, tag),
                );
            }
            Record::ArticleSet {
                country_id,
                category_ids,
                tag_ids,
                keyword_ids,
                count,
            } => {
                let country = lookup(&self.registry.countries, line, "country", country_id)?;
                let categories =
                    lookup_all(&self.registry.categories, line, "category", &category_ids)?;
                let tags = lookup_all(&self.registry.tags, line, "tag", &tag_ids)?;
                let keywords = lookup_all(&self.registry.keywords, line, "keyword", &keyword_ids)?;
                self.article_sets
                    .push(ArticleSet::new(country, categories, tags, keywords, count));
            }
        }
        Ok(())
    }

    /// Export the final dataset
    pub fn finish(self) -> Dataset {
        let Self {
            registry,
            article_sets,
        } = self;
        log::debug!(
            "Built dataset with {} countries, {} categories, {} tags, {} keywords and {} article sets",
            registry.countries.len(),
            registry.categories.len(),
            registry.tags.len(),
            registry.keywords.len(),
            article_sets.len()
        );
        Dataset {
            registry,
            article_sets: article_sets.into(),
        }
    }
}

/// Register an entity, warning about ids that get reused
fn register<E: Named>(table: &mut Table<E>, line: usize, id: EntityId, entity: E) {
    let (key, replaced) = table.register(id, entity);
    if let Some(replaced) = replaced {
        log::warn!(
            "Line {line} redefines id {id} from {:?} to {:?}, later lines will use the new definition",
            table.name(replaced),
            table.name(key),
        );
    }
}

/// Resolve an entity id that must have been registered already
fn lookup<E: Named>(
    table: &Table<E>,
    line: usize,
    what: &'static str,
    id: EntityId,
) -> Result<Key<E>, FormatError> {
    table
        .resolve(id)
        .ok_or(FormatError::UnknownReference { line, what, id })
}

/// Resolve a list of entity ids that must have been registered already
fn lookup_all<E: Named>(
    table: &Table<E>,
    line: usize,
    what: &'static str,
    ids: &[EntityId],
) -> Result<Box<[Key<E>]>, FormatError> {
    (ids.iter())
        .map(|&id| lookup(table, line, what, id))
        .collect()
}
