//! Command-line explorer of classified news article statistics
//!
//! The dataset is a compact serialization of article sets, see
//! [`article_stats::format`] for a description of the format.

mod config;
mod interactive;
mod render;
mod source;

use crate::config::Config;
use anyhow::Context;
use article_stats::{
    accessor::{CompressedDataAccessor, DataAccessor},
    dataset::Dataset,
    export,
    progress::ProgressReport,
    result::Dimension,
};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::num::NonZeroUsize;
use tokio::io::{AsyncWriteExt, BufWriter};

/// Summarize how many news articles match some filters
///
/// Articles are grouped by country, topical category, tag and keyword. The
/// filters below select a population of articles, and statistics are then
/// displayed for the group of these articles which belongs to the requested
/// category, broken down along one dimension.
///
/// Names are matched case-insensitively against the dataset.
#[derive(Parser, Debug)]
#[command(version, author)]
struct Args {
    /// Serialized article statistics
    ///
    /// Either a local path or an http(s) URL. Sources whose name ends in ".gz"
    /// are decompressed on the fly.
    source: Box<str>,

    /// Category for which group statistics are computed
    ///
    /// This does not shrink the population: percentages of the population
    /// are still computed against all articles that pass the filters.
    #[arg(short, long)]
    category: Option<Box<str>>,

    /// Only consider articles from this category
    #[arg(short, long)]
    pre_category: Option<Box<str>>,

    /// Only consider articles about this country
    #[arg(short = 'n', long)]
    country: Option<Box<str>>,

    /// Only consider articles with this tag
    #[arg(short, long)]
    tag: Option<Box<str>>,

    /// Only consider articles containing this keyword
    #[arg(short, long)]
    keyword: Option<Box<str>>,

    /// Dimension along which the group is broken down
    #[arg(short, long, value_enum, default_value = "categories")]
    dimension: Dimension,

    /// What percentages are computed against
    ///
    /// By default, country breakdowns are compared with the total number of
    /// articles about each country, and other breakdowns with the number of
    /// articles that pass the filters.
    #[arg(long, value_enum)]
    denominator: Option<DenominatorArg>,

    /// Max number of output groups
    #[arg(short = 'o', long)]
    max_outputs: Option<NonZeroUsize>,

    /// Output the breakdown as a name,percent CSV table
    #[arg(long, default_value_t = false)]
    csv: bool,

    /// Interactively toggle filters and watch statistics update
    #[arg(short, long, default_value_t = false)]
    interactive: bool,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        Args::parse().check()
    }

    /// Check CLI arguments for basic sanity
    fn check(self) -> Result<Self> {
        anyhow::ensure!(
            !(self.csv && self.interactive),
            "CSV output is not available in interactive mode"
        );
        if self.denominator == Some(DenominatorArg::Country) {
            anyhow::ensure!(
                self.dimension == Dimension::Countries,
                "country totals can only be used as a denominator for country breakdowns"
            );
        }
        Ok(self)
    }
}

/// CLI choice of percentage denominator
#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
enum DenominatorArg {
    /// Articles that pass the filters
    Population,

    /// Articles that pass the filters and belong to the requested category
    Group,

    /// All articles about the group's country
    Country,

    /// Raw article counts, displayed as percentages of a single article
    One,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging
    setup_logging().map_err(|e| anyhow::format_err!("{e}"))?;

    // Decode CLI arguments
    let args = Args::parse_and_check()?;
    let config = Config::new(args);

    // Load the dataset
    let report = ProgressReport::new();
    let client = reqwest::Client::new();
    let lines = source::fetch_lines(&config.source, &client, &report).await?;
    let dataset = Dataset::parse_with_progress(&lines, &report)
        .with_context(|| format!("decoding dataset from {}", config.source))?;
    std::mem::drop(lines);
    let mut accessor = CompressedDataAccessor::new(dataset);

    // Let the user explore the dataset if asked to
    if config.interactive {
        return interactive::explore(&config, &mut accessor);
    }

    // Otherwise, answer the query specified on the command line
    let query = config.filters.to_query(accessor.dataset().registry());
    let result = accessor.execute_query(&query);
    let shares = result.shares(config.dimension, config.denominator, config.max_outputs);
    {
        let stdout = tokio::io::stdout();
        let mut stdout = BufWriter::new(stdout);
        if config.csv {
            export::write_csv(&mut stdout, &shares)
                .await
                .context("writing CSV output")?;
        } else {
            let text = render::summary(
                &query,
                &result,
                config.dimension,
                config.denominator,
                &shares,
            );
            stdout.write_all(text.as_bytes()).await?;
        }
        stdout.flush().await?;
    }
    Ok(())
}

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(args: &[&str]) -> Result<Args> {
        Args::try_parse_from(["article-stats", "stats.txt"].iter().chain(args))?.check()
    }

    #[test]
    fn country_denominator_needs_country_breakdown() {
        assert!(check(&["--denominator", "country"]).is_err());
        assert!(check(&["--denominator", "country", "-d", "tags"]).is_err());
        assert!(check(&["--denominator", "country", "-d", "keywords", "-i"]).is_err());
        assert!(check(&["--denominator", "country", "-i"]).is_err());
        assert!(check(&["--denominator", "country", "-d", "countries", "-i"]).is_ok());
        assert!(check(&["--denominator", "country", "-d", "countries"]).is_ok());
    }

    #[test]
    fn csv_output_is_not_interactive() {
        assert!(check(&["--csv", "-i"]).is_err());
        assert!(check(&["--csv"]).is_ok());
        assert!(check(&["-i"]).is_ok());
    }
}
