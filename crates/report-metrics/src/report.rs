//! The fixed question battery and its rendered report.

use std::time::{Duration, Instant};

use report_core::error::Result;
use report_core::formatting::{format_seconds, format_truncated};
use report_data::store::Dataset;
use tracing::debug;

use crate::queries;

// ── MetricReport ──────────────────────────────────────────────────────────────

/// One answered question with its compute time.
#[derive(Debug, Clone)]
pub struct MetricReport {
    /// The question text, as printed in the report.
    pub question: &'static str,
    /// The rendered answer.
    pub answer: String,
    /// Wall-clock time spent computing the answer.
    pub elapsed: Duration,
}

impl MetricReport {
    /// Render the two report lines: question plus answer, then the runtime.
    pub fn render(&self) -> String {
        format!(
            "{} {}\nRuntime: {}",
            self.question,
            self.answer,
            format_seconds(self.elapsed.as_secs_f64())
        )
    }
}

// ── Battery ───────────────────────────────────────────────────────────────────

/// Run the seven questions against a loaded dataset, timing each one.
///
/// The queries are mutually independent reads; a failure in any one of them
/// (currently only the zero-denominator cost-per-view case) aborts the whole
/// battery; there is no partial report.
pub fn run_battery(data: &Dataset) -> Result<Vec<MetricReport>> {
    let daily = data.daily_campaign_stats.as_slice();
    let actions = data.daily_action_stats.as_slice();

    let reports = vec![
        timed(
            "1. what was the total spent against people with purple hair?",
            || Ok(queries::total_spend_by_hair_color(daily, "purple").to_string()),
        )?,
        timed("2. how many campaigns spent on more than 4 days?", || {
            Ok(queries::campaigns_spending_on_more_than(daily, 4).to_string())
        })?,
        timed("3. how many times did source H report on clicks?", || {
            Ok(queries::source_action_total(actions, "H", "clicks").to_string())
        })?,
        timed(
            "4. which sources reported more \"junk\" than \"noise\"?",
            || Ok(queries::sources_reporting_more(actions, "junk", "noise").to_string()),
        )?,
        timed(
            "5. what was the total cost per view for all video ads, truncated to two decimal places?",
            || {
                let ratio = queries::cost_per_view(actions, "video")?;
                Ok(format_truncated(ratio, 2))
            },
        )?,
        timed(
            "6. how many source B conversions were there for campaigns targeting NY?",
            || Ok(queries::source_action_count_in_state(actions, "B", "conversions", "NY").to_string()),
        )?,
        timed(
            "7. what combination of state and hair color had the best CPM?",
            || {
                Ok(match queries::best_cpm_segment(daily) {
                    Some(segment) => {
                        format!("state: {}, hair color: {}", segment.state, segment.hair_color)
                    }
                    None => "no campaign activity recorded".to_string(),
                })
            },
        )?,
    ];

    Ok(reports)
}

/// Join the individual metric reports into the final multi-line document.
pub fn render_report(reports: &[MetricReport]) -> String {
    reports
        .iter()
        .map(MetricReport::render)
        .collect::<Vec<_>>()
        .join("\n")
}

fn timed(question: &'static str, compute: impl FnOnce() -> Result<String>) -> Result<MetricReport> {
    let start = Instant::now();
    let answer = compute()?;
    let elapsed = start.elapsed();
    debug!(?elapsed, question, "metric computed");
    Ok(MetricReport {
        question,
        answer,
        elapsed,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
