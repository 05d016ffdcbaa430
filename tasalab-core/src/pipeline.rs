//! The indicator pipeline: raw payload → Output Series.
//!
//! normalize → assemble → indicators → signals → row filter. Each run is
//! self-contained; a `Pipeline` holds only configuration and can be shared
//! across threads.

use crate::assemble::assemble;
use crate::config::RecordFormat;
use crate::domain::{IndicatorRow, OutputSeries, Series};
use crate::engine::IndicatorEngine;
use crate::error::PipelineError;
use crate::filter::filter_complete;
use crate::normalize::{Normalizer, Rejected};
use crate::signals::apply_signals;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Counters describing one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub records_seen: usize,
    pub records_rejected: usize,
    pub duplicates_dropped: usize,
    pub series_len: usize,
    /// Rows removed by the row filter.
    pub rows_dropped: usize,
    pub output_len: usize,
    pub buy_crosses: usize,
    pub sell_crosses: usize,
}

impl PipelineReport {
    /// Nothing survived the filter.
    pub fn insufficient_data(&self) -> bool {
        self.output_len == 0
    }
}

/// Everything a run produces.
#[derive(Debug, Clone, Default)]
pub struct PipelineRun {
    pub output: OutputSeries,
    pub report: PipelineReport,
    pub rejected: Vec<Rejected>,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    normalizer: Normalizer,
    engine: IndicatorEngine,
}

impl Pipeline {
    pub fn new(format: RecordFormat) -> Self {
        Self {
            normalizer: Normalizer::new(format),
            engine: IndicatorEngine::new(),
        }
    }

    /// Run the whole pipeline over a raw payload.
    ///
    /// Fails only if the payload is not an array of records; in that case no
    /// partial output is produced.
    pub fn run(&self, raw: &Value) -> Result<PipelineRun, PipelineError> {
        let normalized = self.normalizer.normalize(raw)?;
        let records_seen = normalized.seen();
        let rejected = normalized.rejected;

        let assembled = assemble(normalized.points);
        let rows = self.indicator_rows(&assembled.series);
        let output = filter_complete(&rows);

        let report = PipelineReport {
            records_seen,
            records_rejected: rejected.len(),
            duplicates_dropped: assembled.duplicates,
            series_len: assembled.series.len(),
            rows_dropped: rows.len() - output.len(),
            output_len: output.len(),
            buy_crosses: output.buy_crosses().count(),
            sell_crosses: output.sell_crosses().count(),
        };

        info!(
            seen = report.records_seen,
            rejected = report.records_rejected,
            duplicates = report.duplicates_dropped,
            series = report.series_len,
            output = report.output_len,
            buys = report.buy_crosses,
            sells = report.sell_crosses,
            "pipeline run complete"
        );

        Ok(PipelineRun {
            output,
            report,
            rejected,
        })
    }

    /// Indicator rows with crossings, before the row filter.
    pub fn indicator_rows(&self, series: &Series) -> Vec<IndicatorRow> {
        apply_signals(self.engine.compute(series))
    }

    /// Indicators, crossings and row filter over an assembled series.
    pub fn analyze(&self, series: &Series) -> OutputSeries {
        filter_complete(&self.indicator_rows(series))
    }
}
