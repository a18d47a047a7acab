use anyhow::{Context, Result, bail};
use log::info;

use crate::{
    cli::CleanArgs,
    config::CleaningConfig,
    io_utils,
    pipeline::clean_table,
    report::CleaningReport,
    table,
};

pub fn execute(args: &CleanArgs) -> Result<()> {
    if args.preview.is_some() && args.output.is_some() {
        bail!("--preview cannot be combined with --output");
    }
    let config = CleaningConfig::load_or_default(args.config.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let output_path = args.output.as_deref();
    let output_delimiter =
        io_utils::resolve_output_delimiter(output_path, args.output_delimiter, delimiter);
    info!(
        "Cleaning '{}' -> {:?} (delimiter '{}', output '{}')",
        args.input.display(),
        output_path
            .filter(|p| !io_utils::is_dash(p))
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".into()),
        crate::printable_delimiter(delimiter),
        crate::printable_delimiter(output_delimiter)
    );

    let raw = io_utils::read_table(&args.input, delimiter, encoding)?;
    let (normalized, report) = clean_table(&config, &raw)
        .with_context(|| format!("Cleaning {:?}", args.input))?;
    report.log();

    if let Some(path) = &args.report {
        report.save_json(path)?;
        info!("Cleaning report written to {path:?}");
    }
    if args.strict && report.total_unresolved() > 0 {
        let columns = report
            .columns
            .iter()
            .filter(|c| c.unresolved > 0)
            .map(|c| format!("{} ({})", c.column, c.unresolved))
            .collect::<Vec<_>>();
        bail!(
            "{} value(s) could not be normalized: {}",
            report.total_unresolved(),
            columns.join(", ")
        );
    }

    if let Some(limit) = args.preview {
        let rows = normalized
            .rendered_rows(&args.null_marker)
            .into_iter()
            .take(limit)
            .collect::<Vec<_>>();
        table::print_table(normalized.headers(), &rows);
        info!("Displayed {} of {} cleaned row(s)", rows.len(), normalized.len());
        return Ok(());
    }

    let mut writer = io_utils::open_csv_writer(output_path, output_delimiter)?;
    io_utils::write_table(&mut writer, &normalized, &args.null_marker)?;
    info!("Wrote {} cleaned row(s)", normalized.len());
    if output_path.is_some_and(|p| !io_utils::is_dash(p)) {
        table::print_table(&CleaningReport::summary_headers(), &report.summary_rows());
    }
    Ok(())
}
