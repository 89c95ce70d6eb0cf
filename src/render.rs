//! Text rendering of query results

use article_stats::{
    query::Query,
    result::{Denominator, Dimension, QueryResult, Share},
};
use std::fmt::Write;

/// Render a query result as a text report
///
/// The report starts with the headline group share, followed by the
/// breakdown of the group along `dimension`.
pub fn summary(
    query: &Query,
    result: &QueryResult,
    dimension: Dimension,
    denominator: Denominator,
    shares: &[Share],
) -> String {
    let mut out = String::new();
    let headline = match query.category() {
        Some(category) => format!("Articles in category {category:?}"),
        None => "Articles".to_owned(),
    };
    writeln!(
        out,
        "{headline}: {} of {} ({})",
        result.group_count(),
        result.total_count(),
        percent(share_of(result.group_count(), result.total_count()))
    )
    .expect("writing to a String can't fail");
    writeln!(out, "Filters: {}", describe_filters(query)).expect("writing to a String can't fail");

    writeln!(
        out,
        "Breakdown by {} (percent of {}):",
        dimension.label(),
        describe_denominator(denominator)
    )
    .expect("writing to a String can't fail");
    if shares.is_empty() {
        out.push_str("  (no matching articles)\n");
        return out;
    }
    let name_width = shares.iter().map(|share| share.name.chars().count()).max().unwrap_or(0);
    let count_width = (shares.iter())
        .map(|share| share.count.to_string().len())
        .max()
        .unwrap_or(0);
    for share in shares {
        writeln!(
            out,
            "  {:<name_width$}  {:>count_width$}  {:>7}",
            share.name,
            share.count,
            percent(share.percent)
        )
        .expect("writing to a String can't fail");
    }
    out
}

/// Percentage of a count within a total, if the total isn't zero
fn share_of(count: u64, total: u64) -> Option<f64> {
    (total > 0).then(|| count as f64 / total as f64 * 100.0)
}

/// Display a percentage, if available
fn percent(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.1}%"),
        None => "n/a".to_owned(),
    }
}

/// Display the filters of a query
fn describe_filters(query: &Query) -> String {
    let filters = [
        ("category", query.pre_category()),
        ("country", query.country()),
        ("tag", query.tag()),
        ("keyword", query.keyword()),
    ];
    let active = (filters.into_iter())
        .filter_map(|(what, value)| value.map(|value| format!("{what}={value:?}")))
        .collect::<Vec<_>>();
    if active.is_empty() {
        "none".to_owned()
    } else {
        active.join(", ")
    }
}

/// Display what percentages are relative to
fn describe_denominator(denominator: Denominator) -> String {
    match denominator {
        Denominator::PopulationTotal => "filtered articles".to_owned(),
        Denominator::GroupCount => "articles in the group".to_owned(),
        Denominator::CountryTotal => "all articles about each country".to_owned(),
        Denominator::Constant(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use article_stats::{
        accessor::{CompressedDataAccessor, DataAccessor},
        dataset::Dataset,
    };

    #[test]
    fn summary_lists_breakdown() {
        let dataset = Dataset::parse(&[
            "n 0 \"US\"",
            "n 1 \"UK\"",
            "c 0 \"tech\"",
            "t 0 0 \"ai\"",
            "t 0 1 \"policy\"",
            "a 0 0 0 -1 5",
            "a 1 0 1 -1 3",
        ])
        .unwrap();
        let mut accessor = CompressedDataAccessor::new(dataset);
        let query = Query::default().with_category("tech").with_country("US");
        let result = accessor.execute_query(&query);
        let shares = result.shares(Dimension::Tags, Denominator::PopulationTotal, None);
        let text = summary(
            &query,
            &result,
            Dimension::Tags,
            Denominator::PopulationTotal,
            &shares,
        );
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            [
                "Articles in category \"tech\": 5 of 5 (100.0%)",
                "Filters: country=\"US\"",
                "Breakdown by tags (percent of filtered articles):",
                "  ai  5   100.0%",
            ]
        );
    }

    #[test]
    fn empty_results_are_explicit() {
        let text = summary(
            &Query::default().with_tag("nope"),
            &CompressedDataAccessor::new(Dataset::parse::<&str>(&[]).unwrap())
                .execute_query(&Query::default().with_tag("nope")),
            Dimension::Countries,
            Denominator::CountryTotal,
            &[],
        );
        assert!(text.contains("0 of 0 (n/a)"));
        assert!(text.contains("(no matching articles)"));
    }
}
