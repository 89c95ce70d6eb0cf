//! Program configuration

use crate::{Args, DenominatorArg};
use article_stats::{
    query::Query,
    registry::Registry,
    result::{Denominator, Dimension},
    selection::Selection,
};
use std::{num::NonZeroUsize, sync::Arc};

/// Final program configuration
///
/// This is the result of combining digested [`Args`] with dimension-specific
/// defaults. Please refer to [`Args`] to know more about common fields.
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Where the serialized dataset comes from
    pub source: Box<str>,

    /// Query fields, as typed by the user
    pub filters: FilterConfig,

    /// How percentages are computed
    pub denominator: Denominator,

    // Other fields have the same meaning as in Args
    pub dimension: Dimension,
    pub max_outputs: Option<NonZeroUsize>,
    pub csv: bool,
    pub interactive: bool,
}
//
impl Config {
    /// Determine program configuration from CLI arguments
    pub(crate) fn new(args: Args) -> Arc<Self> {
        let Args {
            source,
            category,
            pre_category,
            country,
            tag,
            keyword,
            dimension,
            denominator,
            max_outputs,
            csv,
            interactive,
        } = args;
        let denominator = match denominator {
            Some(DenominatorArg::Population) => Denominator::PopulationTotal,
            Some(DenominatorArg::Group) => Denominator::GroupCount,
            Some(DenominatorArg::Country) => Denominator::CountryTotal,
            Some(DenominatorArg::One) => Denominator::Constant(1),
            None => default_denominator(dimension),
        };
        Arc::new(Self {
            source,
            filters: FilterConfig {
                category,
                pre_category,
                country,
                tag,
                keyword,
            },
            denominator,
            dimension,
            max_outputs,
            csv,
            interactive,
        })
    }
}

/// Denominator used when the user does not pick one
///
/// Countries are compared with how much they are written about overall, other
/// groups with the population that the query's filters select.
pub fn default_denominator(dimension: Dimension) -> Denominator {
    match dimension {
        Dimension::Countries => Denominator::CountryTotal,
        Dimension::Categories | Dimension::Tags | Dimension::Keywords => {
            Denominator::PopulationTotal
        }
    }
}

/// Query fields, as typed by the user
#[allow(missing_docs)]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FilterConfig {
    pub category: Option<Box<str>>,
    pub pre_category: Option<Box<str>>,
    pub country: Option<Box<str>>,
    pub tag: Option<Box<str>>,
    pub keyword: Option<Box<str>>,
}
//
impl FilterConfig {
    /// Build the query, using the dataset's spelling of the requested names
    pub fn to_query(&self, registry: &Registry) -> Query {
        Query::new(
            canonicalize(registry, Dimension::Categories, self.category.as_deref()),
            canonicalize(registry, Dimension::Categories, self.pre_category.as_deref()),
            canonicalize(registry, Dimension::Countries, self.country.as_deref()),
            canonicalize(registry, Dimension::Tags, self.tag.as_deref()),
            canonicalize(registry, Dimension::Keywords, self.keyword.as_deref()),
        )
    }

    /// Set up a selection which matches the filters of [`to_query()`](Self::to_query)
    pub fn to_selection(&self, registry: &Registry) -> Selection {
        let query = self.to_query(registry);
        let mut selection = Selection::new();
        let selected = [
            (Dimension::Categories, query.pre_category()),
            (Dimension::Countries, query.country()),
            (Dimension::Tags, query.tag()),
            (Dimension::Keywords, query.keyword()),
        ];
        for (dimension, value) in selected {
            if let Some(value) = value {
                selection.select(dimension, value);
            }
        }
        selection
    }
}

/// Dataset spelling of a user-provided name, if the dataset knows about it
///
/// Unknown names are kept as-is, and will match no article.
fn canonicalize<'a>(
    registry: &'a Registry,
    dimension: Dimension,
    name: Option<&'a str>,
) -> Option<&'a str> {
    let name = name?;
    let canonical = registry.canonical_name(dimension, name).unwrap_or_else(|| {
        log::warn!("No {} is named {name:?} in the dataset", dimension.label());
        name
    });
    Some(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use article_stats::dataset::Dataset;

    fn registry() -> Registry {
        Dataset::parse(&[
            "n 0 \"United States\"",
            "c 0 \"tech\"",
            "t 0 0 \"AI\"",
            "a 0 0 0 -1 1",
        ])
        .unwrap()
        .registry()
        .clone()
    }

    #[test]
    fn names_are_canonicalized() {
        let filters = FilterConfig {
            category: Some("TECH".into()),
            country: Some("united states".into()),
            tag: Some("ai".into()),
            keyword: Some("unknown".into()),
            ..FilterConfig::default()
        };
        let query = filters.to_query(&registry());
        assert_eq!(query.category(), Some("tech"));
        assert_eq!(query.pre_category(), None);
        assert_eq!(query.country(), Some("United States"));
        assert_eq!(query.tag(), Some("AI"));
        assert_eq!(query.keyword(), Some("unknown"));
    }

    #[test]
    fn selection_matches_query() {
        let filters = FilterConfig {
            category: Some("tech".into()),
            pre_category: Some("Tech".into()),
            tag: Some("ai".into()),
            ..FilterConfig::default()
        };
        let registry = registry();
        let selection = filters.to_selection(&registry);
        assert_eq!(selection.query(Some("tech")), filters.to_query(&registry));
    }

    #[test]
    fn country_breakdowns_default_to_country_totals() {
        assert_eq!(
            default_denominator(Dimension::Countries),
            Denominator::CountryTotal
        );
        assert_eq!(
            default_denominator(Dimension::Tags),
            Denominator::PopulationTotal
        );
    }
}
