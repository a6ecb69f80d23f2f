//! The top-level run loop.

use std::time::Instant;

use crate::Result;
use crate::RunConfig;
use crate::codec::Codec;
use crate::codec::DefaultCodec;
use crate::discovery::CandidateSource;
use crate::discovery::Discovery;
use crate::discovery::WalkdirSource;
use crate::pipeline::RepackPipeline;
use crate::pipeline::Stage;
use crate::report::RunProgress;
use crate::report::RunReport;

/// Feeds discovered archives through the pipeline one at a time.
///
/// The first error stops the run. Archives finalized before it stay in
/// place and the failing archive's extraction directory is left on disk.
#[derive(Debug)]
pub struct Driver<C = DefaultCodec, S = WalkdirSource> {
    config: RunConfig,
    discovery: Discovery<S>,
    pipeline: RepackPipeline<C>,
}

impl Driver<DefaultCodec, WalkdirSource> {
    /// Creates a driver over the real filesystem with the built-in codecs.
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        let discovery = Discovery::new(config.path_policy(), config.formats.clone());
        let pipeline = RepackPipeline::new(&config);
        Self {
            config,
            discovery,
            pipeline,
        }
    }
}

impl<C: Codec> Driver<C, WalkdirSource> {
    /// Creates a driver over the real filesystem using `codec`.
    #[must_use]
    pub fn with_codec(config: RunConfig, codec: C) -> Self {
        let discovery = Discovery::new(config.path_policy(), config.formats.clone());
        let pipeline = RepackPipeline::with_codec(codec, &config);
        Self {
            config,
            discovery,
            pipeline,
        }
    }
}

impl<C: Codec, S: CandidateSource> Driver<C, S> {
    /// Assembles a driver from its parts.
    #[must_use]
    pub fn from_parts(
        config: RunConfig,
        discovery: Discovery<S>,
        pipeline: RepackPipeline<C>,
    ) -> Self {
        Self {
            config,
            discovery,
            pipeline,
        }
    }

    /// Returns the run configuration.
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Validates the configuration, discovers archives and repacks them.
    ///
    /// # Errors
    ///
    /// Returns a configuration error before any filesystem work, a walk
    /// error from discovery, or the first fatal pipeline error.
    pub fn run(&self, progress: &mut dyn RunProgress) -> Result<RunReport> {
        let start = Instant::now();
        let span = tracing::info_span!(
            "repack",
            input = %self.config.input_root.display(),
            output = %self.config.output_root.display(),
        );
        let _guard = span.enter();

        self.config.validate()?;

        let items = self
            .discovery
            .discover()
            .inspect_err(|e| tracing::error!(error = %e, "Discovery failed"))?;
        progress.on_discovered(items.len());

        let mut report = RunReport {
            archives_found: items.len(),
            dry_run: self.config.dry_run,
            discovered: items.iter().map(|item| item.source_path().to_path_buf()).collect(),
            ..RunReport::default()
        };

        if items.is_empty() {
            tracing::info!("No archives found.");
            report.duration = start.elapsed();
            progress.on_complete();
            return Ok(report);
        }

        if self.config.dry_run {
            for item in &items {
                tracing::info!(
                    source = %item.source_path().display(),
                    target = %item.final_archive().display(),
                    "Found archive"
                );
            }
            tracing::info!("No further actions executed due to dry-run.");
            report.duration = start.elapsed();
            progress.on_complete();
            return Ok(report);
        }

        let total = items.len();
        for (index, item) in items.iter().enumerate() {
            progress.on_item_start(item, index + 1, total);
            progress.on_stage(item, Stage::Pending);

            let item_report = self.pipeline.run(item, progress)?;
            report.archives_repacked += 1;
            report.items.push(item_report);

            progress.on_item_complete(item);
        }

        tracing::info!(count = report.archives_repacked, "Repack finished");
        report.duration = start.elapsed();
        progress.on_complete();
        Ok(report)
    }
}
