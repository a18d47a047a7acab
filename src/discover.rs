use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;

use crate::{cli::DiscoverArgs, config::CleaningConfig, io_utils, rules::ColumnRule, table};

const INVALID_SAMPLE_LIMIT: usize = 5;

pub fn execute(args: &DiscoverArgs) -> Result<()> {
    let config = CleaningConfig::load_or_default(args.config.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let raw = io_utils::read_table(&args.input, delimiter, encoding)?;

    let placeholders = config
        .placeholders
        .discover(&raw)
        .with_context(|| format!("Discovering placeholders in {:?}", args.input))?;
    let rows = placeholders
        .columns()
        .map(|(column, found)| vec![column.to_string(), found.iter().join(", ")])
        .collect::<Vec<_>>();
    table::print_table(&["column".to_string(), "placeholders".to_string()], &rows);
    println!();
    println!("Placeholder set: [{}]", placeholders.values().join(", "));

    if let Some(range) = &config.placeholders.range {
        let outside = range
            .count_out_of_range(&raw)
            .with_context(|| format!("Checking range of '{}'", range.column))?;
        println!(
            "{}: {} value(s) outside {}..={}",
            range.column, outside, range.min, range.max
        );
    }
    for binding in config
        .columns
        .iter()
        .filter(|binding| matches!(binding.rule, ColumnRule::Date(_)))
    {
        let invalid = raw
            .column(&binding.column)
            .with_context(|| format!("Checking dates in '{}'", binding.column))?
            .filter(|value| binding.rule.apply(value).is_err())
            .collect::<Vec<_>>();
        if invalid.is_empty() {
            println!("{}: every value matches a date format", binding.column);
        } else {
            println!(
                "{}: {} value(s) match no date format ({})",
                binding.column,
                invalid.len(),
                invalid.iter().unique().take(INVALID_SAMPLE_LIMIT).join(", ")
            );
        }
    }
    info!(
        "Discovered {} placeholder(s) across {} row(s)",
        placeholders.len(),
        raw.len()
    );
    Ok(())
}
