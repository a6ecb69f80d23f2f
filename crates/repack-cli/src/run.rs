//! Wires parsed arguments into a repack run.

use anyhow::Result;
use repack_core::FormatSet;
use repack_core::RunConfig;
use repack_core::paths;

use crate::cli::Cli;
use crate::error::convert_repack_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;

/// Builds the run configuration from parsed arguments.
///
/// Both roots are made absolute. Without an explicit `OUTPUT_DIR` the output
/// root is derived from the input argument.
pub fn build_config(cli: &Cli) -> Result<RunConfig> {
    let formats = FormatSet::parse(&cli.formats).map_err(convert_repack_error)?;
    let input_root = paths::absolutize(&cli.input_dir).map_err(convert_repack_error)?;
    let output_root = match &cli.output_dir {
        Some(dir) => paths::absolutize(dir).map_err(convert_repack_error)?,
        None => paths::default_output_root(&cli.input_dir, &input_root),
    };

    Ok(RunConfig::new(input_root, output_root, formats)
        .with_force(cli.force)
        .with_dry_run(cli.dry_run))
}

pub fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    if cli.dry_run {
        tracing::info!("Running in dry-run mode - no archives will be repacked");
    }

    let config = build_config(cli)?;
    tracing::info!("Using  INPUT_DIR: {}", config.input_root.display());
    tracing::info!("Using OUTPUT_DIR: {}", config.output_root.display());
    tracing::info!("Using FORMATS: {}", config.formats);
    if config.force && config.output_root.exists() {
        tracing::warn!(
            "Force: Overwriting all files in {}",
            config.output_root.display()
        );
    }

    let report = if CliProgress::should_show(cli.verbosity, cli.json) {
        let mut progress = CliProgress::new();
        repack_core::repack_tree_with_progress(&config, &mut progress)
    } else {
        repack_core::repack_tree(&config)
    }
    .map_err(convert_repack_error)?;

    formatter.format_run_result(&report)
}
