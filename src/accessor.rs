//! Execution of queries against an article statistics dataset

use crate::{
    dataset::{ArticleSet, Dataset},
    query::Query,
    registry::{Category, Country, Key, Keyword, Named, Registry, Table, Tag},
    result::{CountedGroup, QueryResult, Tally},
};
use std::sync::Arc;

/// Strategy for answering article statistics queries
///
/// Implementations are driven from a single thread, typically once or more
/// per redraw of an interactive view.
pub trait DataAccessor {
    /// Compute summary statistics for the articles matching a query
    fn execute_query(&mut self, query: &Query) -> Arc<QueryResult>;
}

/// Data accessor which answers queries from an in-memory [`Dataset`]
///
/// The result of the last query is kept around, so that a view which asks the
/// same question several times per frame only pays for it once.
#[derive(Debug)]
pub struct CompressedDataAccessor {
    /// Dataset being queried
    dataset: Dataset,

    /// Number of articles about each country across the whole dataset
    country_totals: Box<[CountedGroup]>,

    /// Last query that was answered, and its result
    memo: Memo,

    /// Number of results that had to be computed from scratch
    computations: u64,
}
//
impl CompressedDataAccessor {
    /// Prepare to query a dataset
    pub fn new(dataset: Dataset) -> Self {
        let registry = dataset.registry();
        let mut country_totals = Tally::new();
        for set in dataset.article_sets() {
            country_totals.add(registry.countries.name(set.country()), set.count().get());
        }
        let country_totals = country_totals.into_groups();
        Self {
            dataset,
            country_totals,
            memo: Memo::default(),
            computations: 0,
        }
    }

    /// Dataset being queried
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Number of results that had to be computed rather than recalled
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Compute the result of a query from scratch
    fn compute(&self, query: &Query) -> QueryResult {
        let registry = self.dataset.registry();
        let filters = Filters::new(registry, query);

        // Population from which the group is drawn
        let addressable = (self.dataset.article_sets().iter())
            .filter(|set| filters.admits(set))
            .collect::<Vec<_>>();
        let total_count = addressable.iter().map(|set| set.count().get()).sum();

        // Articles from the population which are in the group's category.
        // An empty category name means that no category was requested.
        let category = query.category().filter(|name| !name.is_empty());
        let group_category = category.map(|name| registry.categories.keys_named(name));
        let in_category = (addressable.into_iter()).filter(|set| match &group_category {
            Some(keys) => contains_any(set.categories(), keys),
            None => true,
        });

        // Break down the group along every dimension
        let mut group_count = 0;
        let mut categories = Tally::new();
        let mut countries = Tally::new();
        let mut tags = Tally::new();
        let mut keywords = Tally::new();
        for set in in_category {
            let count = set.count().get();
            group_count += count;
            countries.add(registry.countries.name(set.country()), count);
            tally_names(&mut categories, &registry.categories, set.categories(), count);
            for &tag in set.tags() {
                if category.map_or(true, |c| registry.tag_category_name(tag) == c) {
                    tags.add(registry.tags.name(tag), count);
                }
            }
            for &keyword in set.keywords() {
                if category.map_or(true, |c| registry.keyword_tag_category_name(keyword) == c) {
                    keywords.add(registry.keywords.name(keyword), count);
                }
            }
        }

        QueryResult {
            total_count,
            group_count,
            categories: categories.into_groups(),
            countries: countries.into_groups(),
            country_totals: self.country_totals.clone(),
            tags: tags.into_groups(),
            keywords: keywords.into_groups(),
            has_filters: query.has_filters(),
        }
    }
}
//
impl DataAccessor for CompressedDataAccessor {
    fn execute_query(&mut self, query: &Query) -> Arc<QueryResult> {
        let id = query.id_str();
        if let Some(result) = self.memo.recall(&id) {
            log::trace!("Reusing memoized result for query {id:?}");
            return result;
        }

        let result = Arc::new(self.compute(query));
        self.computations += 1;
        log::debug!(
            "Query {id:?} matched {} articles, {} of which are in the group",
            result.total_count(),
            result.group_count()
        );
        self.memo.store(id, result.clone());
        result
    }
}

/// Single-slot memory of the last query result
#[derive(Debug, Default)]
struct Memo {
    /// Identity string of the last query and its result
    last: Option<(String, Arc<QueryResult>)>,
}
//
impl Memo {
    /// Result of the last query, if it had this identity string
    fn recall(&self, id: &str) -> Option<Arc<QueryResult>> {
        (self.last.as_ref())
            .filter(|(last_id, _result)| last_id == id)
            .map(|(_id, result)| result.clone())
    }

    /// Remember a query result, forgetting any previous one
    fn store(&mut self, id: String, result: Arc<QueryResult>) {
        self.last = Some((id, result));
    }
}

/// Query filters, resolved to registry keys
///
/// A filter on a name that matches no entity admits no article set.
struct Filters {
    country: Option<Vec<Key<Country>>>,
    pre_category: Option<Vec<Key<Category>>>,
    tag: Option<Vec<Key<Tag>>>,
    keyword: Option<Vec<Key<Keyword>>>,
}
//
impl Filters {
    /// Resolve the filters of a query
    fn new(registry: &Registry, query: &Query) -> Self {
        Self {
            country: query.country().map(|name| registry.countries.keys_named(name)),
            pre_category: (query.pre_category()).map(|name| registry.categories.keys_named(name)),
            tag: query.tag().map(|name| registry.tags.keys_named(name)),
            keyword: query.keyword().map(|name| registry.keywords.keys_named(name)),
        }
    }

    /// Truth that an article set satisfies all filters
    fn admits(&self, set: &ArticleSet) -> bool {
        let country_ok = (self.country.as_ref()).map_or(true, |keys| keys.contains(&set.country()));
        country_ok
            && (self.pre_category.as_ref()).map_or(true, |keys| contains_any(set.categories(), keys))
            && (self.tag.as_ref()).map_or(true, |keys| contains_any(set.tags(), keys))
            && (self.keyword.as_ref()).map_or(true, |keys| contains_any(set.keywords(), keys))
    }
}

/// Truth that some key of a set appears in a list of wanted keys
fn contains_any<E>(keys: &[Key<E>], wanted: &[Key<E>]) -> bool {
    keys.iter().any(|key| wanted.contains(key))
}

/// Add articles to the tally of each named entity
fn tally_names<'names, E: Named>(
    tally: &mut Tally<'names>,
    table: &'names Table<E>,
    keys: &[Key<E>],
    count: u64,
) {
    for &key in keys {
        tally.add(table.name(key), count);
    }
}
