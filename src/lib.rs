//! Statistics query engine over a corpus of classified news articles
//!
//! Articles are pre-aggregated into [`ArticleSet`](dataset::ArticleSet)s of
//! articles about the same country which received the same topic model
//! results. A [`Dataset`](dataset::Dataset) of such sets is loaded once from
//! a compact line-based format (see [`format`]), then a
//! [`DataAccessor`](accessor::DataAccessor) answers [`Query`](query::Query)s
//! with counted breakdowns along every dimension of the topic model.

pub mod accessor;
pub mod dataset;
pub mod export;
pub mod format;
pub mod progress;
pub mod query;
pub mod registry;
pub mod result;
pub mod selection;

use std::num::NonZeroU64;

/// Integer id under which entities are serialized
pub type EntityId = u32;

/// Number of articles in an article set
///
/// Article sets that would contain no article are simply not serialized.
pub type ArticleCount = NonZeroU64;
