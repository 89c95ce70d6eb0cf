use article_stats::{
    accessor::{CompressedDataAccessor, DataAccessor},
    dataset::Dataset,
    format::FormatError,
    query::Query,
    result::{CountedGroup, Dimension},
};
use std::sync::Arc;

const COUNTRIES: [&str; 4] = ["US", "UK", "France", "Kenya"];
const CATEGORIES: [&str; 3] = ["tech", "health", "economy"];

/// Deterministic dataset where every article set has at least one category
fn synthetic_lines() -> Vec<String> {
    let mut lines = Vec::new();
    for (id, name) in COUNTRIES.iter().enumerate() {
        lines.push(format!("n {id} \"{name}\""));
    }
    for (id, name) in CATEGORIES.iter().enumerate() {
        lines.push(format!("c {id} \"{name}\""));
    }
    // Two tags and two keywords per category
    for category in 0..CATEGORIES.len() {
        for local in 0..2 {
            let tag = category * 2 + local;
            lines.push(format!("t {category} {tag} \"tag {tag}\""));
            lines.push(format!("k {category} {tag} {tag} \"keyword {tag}\""));
        }
    }

    let mut state = 12345u32;
    let mut next = move |modulo: u32| {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        (state >> 16) % modulo
    };
    for _ in 0..200 {
        let country = next(COUNTRIES.len() as u32);
        let first = next(CATEGORIES.len() as u32);
        let mut categories = vec![first];
        let second = next(CATEGORIES.len() as u32);
        if second != first {
            categories.push(second);
        }
        let tags = (categories.iter())
            .map(|&category| category * 2 + next(2))
            .collect::<Vec<_>>();
        let keywords = if next(3) == 0 {
            vec![]
        } else {
            tags.clone()
        };
        let join = |ids: &[u32]| {
            if ids.is_empty() {
                "-1".to_owned()
            } else {
                ids.iter().map(u32::to_string).collect::<Vec<_>>().join(";")
            }
        };
        lines.push(format!(
            "a {country} {} {} {} {}",
            join(&categories),
            join(&tags),
            join(&keywords),
            next(20) + 1
        ));
    }
    lines
}

fn synthetic_accessor() -> CompressedDataAccessor {
    CompressedDataAccessor::new(Dataset::parse(&synthetic_lines()).unwrap())
}

/// A representative spread of queries over the synthetic dataset
fn queries() -> Vec<Query> {
    let mut queries = vec![Query::default()];
    for category in CATEGORIES {
        queries.push(Query::default().with_category(category));
        queries.push(Query::default().with_pre_category(category));
        for country in COUNTRIES {
            queries.push(Query::default().with_category(category).with_country(country));
        }
        for tag in 0..6 {
            queries.push(
                Query::default()
                    .with_category(category)
                    .with_tag(format!("tag {tag}")),
            );
            queries.push(
                Query::default()
                    .with_pre_category(category)
                    .with_keyword(format!("keyword {tag}")),
            );
        }
    }
    queries
}

fn total(groups: &[CountedGroup]) -> u64 {
    groups.iter().map(CountedGroup::count).sum()
}

#[test]
fn group_never_exceeds_population() {
    let mut accessor = synthetic_accessor();
    for query in queries() {
        let result = accessor.execute_query(&query);
        assert!(
            result.group_count() <= result.total_count(),
            "{query:?} gave {result:?}"
        );
        assert_eq!(total(result.countries()), result.group_count());
    }
}

#[test]
fn multi_label_categories_cover_the_group() {
    let mut accessor = synthetic_accessor();
    for query in queries().into_iter().filter(|q| q.category().is_none()) {
        let result = accessor.execute_query(&query);
        assert!(total(result.categories()) >= result.group_count());
    }
}

#[test]
fn country_totals_reflect_whole_dataset() {
    let mut accessor = synthetic_accessor();
    let reference = accessor.execute_query(&Query::default());
    assert_eq!(total(reference.country_totals()), reference.total_count());
    for query in queries() {
        let result = accessor.execute_query(&query);
        assert_eq!(result.country_totals(), reference.country_totals());
    }

    // A different dataset has different country totals
    let mut lines = synthetic_lines();
    lines.push("a 0 0 0 0 7".to_owned());
    let mut other = CompressedDataAccessor::new(Dataset::parse(&lines).unwrap());
    let changed = other.execute_query(&Query::default());
    assert_ne!(changed.country_totals(), reference.country_totals());
}

#[test]
fn breakdowns_are_sorted_deterministically() {
    let mut accessor = synthetic_accessor();
    for query in queries() {
        let result = accessor.execute_query(&query);
        for dimension in Dimension::ALL {
            let groups = result.breakdown(dimension);
            for pair in groups.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                assert!(
                    a.count() > b.count() || (a.count() == b.count() && a.name() < b.name()),
                    "{} are out of order: {a:?} before {b:?}",
                    dimension.label()
                );
            }
        }
    }
}

#[test]
fn category_scoped_views_only_show_own_tags() {
    let mut accessor = synthetic_accessor();
    let registry = accessor.dataset().registry().clone();
    for category in CATEGORIES {
        let result = accessor.execute_query(&Query::default().with_category(category));
        for group in result.tags() {
            let key = registry.tags.keys_named(group.name())[0];
            assert_eq!(registry.tag_category_name(key), category);
        }
    }
}

#[test]
fn equal_queries_share_results() {
    let mut accessor = synthetic_accessor();
    let query = Query::new(Some("tech"), None, Some("US"), None, None);
    let first = accessor.execute_query(&query);
    let second = accessor.execute_query(&Query::default().with_category("tech").with_country("US"));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(accessor.computations(), 1);
}

#[test]
fn two_article_sets_end_to_end() {
    let lines = [
        "n 0 \"US\"",
        "n 1 \"UK\"",
        "c 0 \"tech\"",
        "t 0 0 \"ai\"",
        "t 0 1 \"policy\"",
        "k 0 0 0 \"llm\"",
        "a 0 0 0 0 5",
        "a 1 0 1 -1 3",
    ];
    let mut accessor = CompressedDataAccessor::new(Dataset::parse(&lines).unwrap());
    let names = |groups: &[CountedGroup]| {
        (groups.iter())
            .map(|group| (group.name().to_owned(), group.count()))
            .collect::<Vec<_>>()
    };

    let result = accessor.execute_query(&Query::default().with_category("tech"));
    assert_eq!((result.total_count(), result.group_count()), (8, 8));
    assert_eq!(
        names(result.tags()),
        [("ai".to_owned(), 5), ("policy".to_owned(), 3)]
    );
    assert_eq!(
        names(result.countries()),
        [("US".to_owned(), 5), ("UK".to_owned(), 3)]
    );

    let result = accessor.execute_query(&Query::default().with_category("tech").with_tag("ai"));
    assert_eq!(result.group_count(), 5);
    assert_eq!(names(result.keywords()), [("llm".to_owned(), 5)]);

    let mut corrupt = lines.to_vec();
    corrupt.push("x 1 \"bad\"");
    assert_eq!(
        Dataset::parse(&corrupt).unwrap_err(),
        FormatError::UnknownCommand {
            line: 9,
            command: "x".into()
        }
    );
}
