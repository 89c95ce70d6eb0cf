//! In-memory article statistics dataset
//!
//! The dataset does not record individual articles. Instead, articles that
//! are about the same country and received identical results from the topic
//! model are grouped into an [`ArticleSet`], along with their count.

pub mod builder;

use self::builder::DatasetBuilder;
use crate::{
    format::{self, FormatError},
    progress::{ProgressConfig, ProgressReport, Work},
    registry::{Category, Country, Key, Keyword, Registry, Tag},
    ArticleCount,
};

/// Immutable snapshot of the article statistics
#[derive(Clone, Debug)]
pub struct Dataset {
    /// Entities that article sets refer to
    registry: Registry,

    /// Article sets, in the order where they were serialized
    article_sets: Box<[ArticleSet]>,
}
//
impl Dataset {
    /// Decode a serialized dataset
    pub fn parse<S: AsRef<str> + Sync>(lines: &[S]) -> Result<Self, FormatError> {
        Self::parse_with_progress(lines, &ProgressReport::hidden())
    }

    /// Decode a serialized dataset, reporting progress as records are resolved
    pub fn parse_with_progress<S: AsRef<str> + Sync>(
        lines: &[S],
        report: &ProgressReport,
    ) -> Result<Self, FormatError> {
        let records = format::parse_records(lines)?;
        log::debug!("Decoded {} records from {} lines", records.len(), lines.len());

        let resolution = report.add(
            "Resolving dataset records",
            ProgressConfig::new(Work::PercentSteps(records.len())),
        );
        let mut builder = DatasetBuilder::new();
        for (line, record) in records {
            builder.add_record(line, record)?;
            resolution.make_progress(1);
        }
        Ok(builder.finish())
    }

    /// Entities that article sets refer to
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Article sets, in the order where they were serialized
    pub fn article_sets(&self) -> &[ArticleSet] {
        &self.article_sets
    }

    /// Total number of articles
    pub fn article_count(&self) -> u64 {
        (self.article_sets.iter())
            .map(|set| set.count().get())
            .sum()
    }
}

/// Group of articles about one country with identical topic model results
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArticleSet {
    /// Country that all of these articles are about
    country: Key<Country>,

    /// Categories in which all of these articles are members
    categories: Box<[Key<Category>]>,

    /// Tags in which all of these articles are members
    tags: Box<[Key<Tag>]>,

    /// Keywords found in all of these articles
    keywords: Box<[Key<Keyword>]>,

    /// Number of articles in this set
    count: ArticleCount,
}
//
impl ArticleSet {
    /// Record a new article set
    pub fn new(
        country: Key<Country>,
        categories: impl Into<Box<[Key<Category>]>>,
        tags: impl Into<Box<[Key<Tag>]>>,
        keywords: impl Into<Box<[Key<Keyword>]>>,
        count: ArticleCount,
    ) -> Self {
        Self {
            country,
            categories: categories.into(),
            tags: tags.into(),
            keywords: keywords.into(),
            count,
        }
    }

    /// Country that all of these articles are about
    pub fn country(&self) -> Key<Country> {
        self.country
    }

    /// Categories in which all of these articles are members
    pub fn categories(&self) -> &[Key<Category>] {
        &self.categories
    }

    /// Tags in which all of these articles are members
    pub fn tags(&self) -> &[Key<Tag>] {
        &self.tags
    }

    /// Keywords found in all of these articles
    pub fn keywords(&self) -> &[Key<Keyword>] {
        &self.keywords
    }

    /// Number of articles in this set
    pub fn count(&self) -> ArticleCount {
        self.count
    }
}
