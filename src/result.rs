//! Summary statistics produced by executing a [`Query`](crate::query::Query)

use serde::Serialize;
use std::{cmp::Ordering, collections::HashMap, num::NonZeroUsize};

/// Dimension along which articles can be broken down
#[derive(clap::ValueEnum, Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Dimension {
    Categories,
    Countries,
    Tags,
    Keywords,
}
//
impl Dimension {
    /// Every dimension, in display order
    pub const ALL: [Self; 4] = [
        Self::Categories,
        Self::Countries,
        Self::Tags,
        Self::Keywords,
    ];

    /// Human-readable name of the dimension
    pub fn label(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Countries => "countries",
            Self::Tags => "tags",
            Self::Keywords => "keywords",
        }
    }
}

/// Group of articles sharing a common attribute
///
/// Articles may belong to several groups of the same dimension.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct CountedGroup {
    /// Attribute shared by all articles of the group
    name: Box<str>,

    /// Number of articles in the group
    count: u64,
}
//
impl CountedGroup {
    /// Record a group of articles
    pub fn new(name: impl Into<Box<str>>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }

    /// Attribute shared by all articles of the group
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of articles in the group
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Per-name accumulator of article counts
#[derive(Debug, Default)]
pub struct Tally<'names>(HashMap<&'names str, u64>);
//
impl<'names> Tally<'names> {
    /// Set up an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Add articles to a group
    pub fn add(&mut self, name: &'names str, count: u64) {
        *self.0.entry(name).or_default() += count;
    }

    /// Turn the tally into groups sorted by decreasing count
    ///
    /// Groups with equal counts are sorted by name, so the output does not
    /// depend on hashing order.
    pub fn into_groups(self) -> Box<[CountedGroup]> {
        let mut groups = (self.0.into_iter())
            .map(|(name, count)| CountedGroup::new(name, count))
            .collect::<Vec<_>>();
        groups.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        groups.into()
    }
}

/// Summary statistics for the articles matching a query
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueryResult {
    /// Number of articles that satisfy the query's filters
    pub(crate) total_count: u64,

    /// Number of those articles which are in the query's category
    pub(crate) group_count: u64,

    /// Categories of the articles in the group
    pub(crate) categories: Box<[CountedGroup]>,

    /// Countries of the articles in the group
    pub(crate) countries: Box<[CountedGroup]>,

    /// Number of articles about each country in the whole dataset
    pub(crate) country_totals: Box<[CountedGroup]>,

    /// Tags of the articles in the group
    pub(crate) tags: Box<[CountedGroup]>,

    /// Keywords of the articles in the group
    pub(crate) keywords: Box<[CountedGroup]>,

    /// Truth that the query had filters
    pub(crate) has_filters: bool,
}
//
impl QueryResult {
    /// Number of articles that satisfy the query's filters
    ///
    /// This is the population from which the group was drawn.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of articles that satisfy the query's filters and are in the
    /// query's category, if any
    pub fn group_count(&self) -> u64 {
        self.group_count
    }

    /// Categories of the articles in the group
    pub fn categories(&self) -> &[CountedGroup] {
        &self.categories
    }

    /// Countries of the articles in the group
    pub fn countries(&self) -> &[CountedGroup] {
        &self.countries
    }

    /// Number of articles about each country in the whole dataset, regardless
    /// of the query's filters
    pub fn country_totals(&self) -> &[CountedGroup] {
        &self.country_totals
    }

    /// Tags of the articles in the group
    ///
    /// When the query has a category, only tags from that category are listed.
    pub fn tags(&self) -> &[CountedGroup] {
        &self.tags
    }

    /// Keywords of the articles in the group
    ///
    /// When the query has a category, only keywords whose tag belongs to that
    /// category are listed.
    pub fn keywords(&self) -> &[CountedGroup] {
        &self.keywords
    }

    /// Truth that the query which produced this result had filters
    pub fn has_filters(&self) -> bool {
        self.has_filters
    }

    /// Breakdown of the group along some dimension
    pub fn breakdown(&self, dimension: Dimension) -> &[CountedGroup] {
        match dimension {
            Dimension::Categories => self.categories(),
            Dimension::Countries => self.countries(),
            Dimension::Tags => self.tags(),
            Dimension::Keywords => self.keywords(),
        }
    }

    /// Number of articles about a country in the whole dataset
    pub fn country_total(&self, country: &str) -> u64 {
        (self.country_totals.iter())
            .find(|group| &*group.name == country)
            .map_or(0, CountedGroup::count)
    }

    /// Value that a group's count should be divided by to get its share
    pub fn denominator(&self, denominator: Denominator, name: &str) -> u64 {
        match denominator {
            Denominator::PopulationTotal => self.total_count,
            Denominator::GroupCount => self.group_count,
            Denominator::CountryTotal => self.country_total(name),
            Denominator::Constant(value) => value,
        }
    }

    /// Express a breakdown as percentages of some denominator
    ///
    /// Shares are sorted by decreasing percentage then by name, and groups
    /// whose denominator is zero come last. At most `limit` shares are
    /// returned, if specified.
    pub fn shares(
        &self,
        dimension: Dimension,
        denominator: Denominator,
        limit: Option<NonZeroUsize>,
    ) -> Vec<Share> {
        let mut shares = (self.breakdown(dimension).iter())
            .map(|group| {
                let total = self.denominator(denominator, group.name());
                Share::new(group, total)
            })
            .collect::<Vec<_>>();
        shares.sort_by(Share::display_order);
        if let Some(limit) = limit {
            shares.truncate(limit.get());
        }
        shares
    }
}

/// Quantity that a group's article count is compared against
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Denominator {
    /// Articles satisfying the query's filters
    PopulationTotal,

    /// Articles satisfying the filters within the query's category
    GroupCount,

    /// Articles about the group's country in the whole dataset
    ///
    /// Only meaningful for country breakdowns. Names which are not countries
    /// get a denominator of zero.
    CountryTotal,

    /// Fixed value
    Constant(u64),
}

/// Group of articles, expressed as a percentage of some denominator
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Share {
    /// Attribute shared by all articles of the group
    pub name: Box<str>,

    /// Number of articles in the group
    pub count: u64,

    /// Percentage of the denominator, or `None` if the denominator is zero
    pub percent: Option<f64>,
}
//
impl Share {
    /// Compare a group with its denominator
    pub fn new(group: &CountedGroup, denominator: u64) -> Self {
        let percent = (denominator > 0).then(|| group.count as f64 / denominator as f64 * 100.0);
        Self {
            name: group.name.clone(),
            count: group.count,
            percent,
        }
    }

    /// Decreasing percentage, then increasing name
    fn display_order(a: &Self, b: &Self) -> Ordering {
        let by_percent = match (a.percent, b.percent) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_percent.then_with(|| a.name.cmp(&b.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(items: &[(&str, u64)]) -> Box<[CountedGroup]> {
        (items.iter())
            .map(|&(name, count)| CountedGroup::new(name, count))
            .collect()
    }

    fn result() -> QueryResult {
        QueryResult {
            total_count: 8,
            group_count: 4,
            categories: groups(&[("tech", 4)]),
            countries: groups(&[("UK", 3), ("US", 1)]),
            country_totals: groups(&[("US", 10), ("UK", 6)]),
            tags: groups(&[("ai", 2), ("policy", 2)]),
            keywords: groups(&[]),
            has_filters: true,
        }
    }

    #[test]
    fn tally_breaks_ties_by_name() {
        let mut tally = Tally::new();
        tally.add("zeta", 2);
        tally.add("alpha", 1);
        tally.add("beta", 2);
        tally.add("alpha", 1);
        tally.add("omega", 5);
        assert_eq!(
            tally.into_groups(),
            groups(&[("omega", 5), ("alpha", 2), ("beta", 2), ("zeta", 2)])
        );
    }

    #[test]
    fn country_shares_use_country_totals() {
        let shares = result().shares(Dimension::Countries, Denominator::CountryTotal, None);
        assert_eq!(shares.len(), 2);
        assert_eq!(&*shares[0].name, "UK");
        assert_eq!(shares[0].percent, Some(50.0));
        assert_eq!(&*shares[1].name, "US");
        assert_eq!(shares[1].percent, Some(10.0));
    }

    #[test]
    fn zero_denominators_have_no_percentage() {
        let result = result();
        let shares = result.shares(Dimension::Tags, Denominator::CountryTotal, None);
        assert!(shares.iter().all(|share| share.percent.is_none()));
        let shares = result.shares(Dimension::Tags, Denominator::Constant(0), None);
        assert!(shares.iter().all(|share| share.percent.is_none()));
        assert_eq!(result.country_total("France"), 0);
    }

    #[test]
    fn shares_are_ranked_and_truncated() {
        let shares = result().shares(
            Dimension::Tags,
            Denominator::GroupCount,
            NonZeroUsize::new(1),
        );
        assert_eq!(shares.len(), 1);
        assert_eq!(&*shares[0].name, "ai");
        assert_eq!(shares[0].percent, Some(50.0));

        let shares = result().shares(Dimension::Countries, Denominator::Constant(1), None);
        assert_eq!(shares[0].percent, Some(300.0));
        let shares = result().shares(Dimension::Countries, Denominator::PopulationTotal, None);
        assert_eq!(shares[1].percent, Some(12.5));
    }
}
