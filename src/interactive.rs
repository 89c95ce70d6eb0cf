//! Interactive exploration of the dataset from the terminal

use crate::{config::Config, render, Result};
use article_stats::{
    accessor::{CompressedDataAccessor, DataAccessor},
    result::Dimension,
    selection::Selection,
};
use dialoguer::{Confirm, FuzzySelect};

/// Let the user toggle filters and display updated statistics until done
pub fn explore(config: &Config, accessor: &mut CompressedDataAccessor) -> Result<()> {
    let registry = accessor.dataset().registry();
    let group_category = (config.filters.to_query(registry))
        .category()
        .map(Box::<str>::from);
    let mut selection = config.filters.to_selection(registry);
    loop {
        // Display statistics for the current selection
        let query = selection.query(group_category.as_deref());
        let result = accessor.execute_query(&query);
        let shares = result.shares(config.dimension, config.denominator, config.max_outputs);
        println!(
            "\n{}",
            render::summary(&query, &result, config.dimension, config.denominator, &shares)
        );

        // Ask the user what to do next
        let mut actions = vec!["Done".to_owned()];
        actions.extend(Dimension::ALL.iter().map(|&dimension| {
            let current = selection.selected(dimension).unwrap_or("none");
            format!("Filter {} (current: {current})", dimension.label())
        }));
        actions.push("Clear all filters".to_owned());
        let action = FuzzySelect::new()
            .with_prompt("What next?")
            .items(&actions)
            .default(0)
            .interact()?;
        match action {
            0 => return Ok(()),
            index if index <= Dimension::ALL.len() => {
                let dimension = Dimension::ALL[index - 1];
                let names = (result.breakdown(dimension).iter())
                    .map(|group| group.name())
                    .collect::<Vec<_>>();
                if let Some(value) = pick(dimension, &names, selection.selected(dimension))? {
                    selection.hover(dimension, value.as_str());
                    if preview(config, accessor, &selection, group_category.as_deref(), dimension)? {
                        selection.toggle(dimension, &value);
                    }
                    selection.clear_hovering(dimension);
                }
            }
            _ => selection.clear_all(),
        }
        log::debug!("Selection is now {:?}", selection.serialize());
    }
}

/// Show what toggling the hovered value would do, and ask for confirmation
fn preview(
    config: &Config,
    accessor: &mut CompressedDataAccessor,
    selection: &Selection,
    group_category: Option<&str>,
    dimension: Dimension,
) -> Result<bool> {
    let Some(hovering) = selection.hovering(dimension) else {
        return Ok(false);
    };
    log::trace!("Previewing selection {:?}", selection.serialize());
    let mut toggled = selection.clone();
    toggled.toggle(dimension, hovering);
    let query = toggled.query(group_category);
    let result = accessor.execute_query(&query);
    let shares = result.shares(config.dimension, config.denominator, config.max_outputs);
    println!(
        "\n{}",
        render::summary(&query, &result, config.dimension, config.denominator, &shares)
    );
    let verb = if selection.selected(dimension) == Some(hovering) {
        "Clear"
    } else {
        "Apply"
    };
    Ok(Confirm::new()
        .with_prompt(format!("{verb} {} filter \"{hovering}\"?", dimension.label()))
        .default(true)
        .interact()?)
}

/// Ask the user to pick a value along some dimension
///
/// The currently selected value is always offered, so that it can be
/// deselected even when it no longer appears in the breakdown.
fn pick(dimension: Dimension, names: &[&str], selected: Option<&str>) -> Result<Option<String>> {
    let mut choices = names.iter().map(|&name| name.to_owned()).collect::<Vec<_>>();
    if let Some(selected) = selected {
        if !names.contains(&selected) {
            choices.insert(0, selected.to_owned());
        }
    }
    if choices.is_empty() {
        println!("No {} to pick from", dimension.label());
        return Ok(None);
    }
    let index = FuzzySelect::new()
        .with_prompt(format!("Which of the {} should be toggled?", dimension.label()))
        .items(&choices)
        .default(0)
        .max_length(usize::MAX)
        .interact()?;
    Ok(Some(choices.swap_remove(index)))
}
