//! Parameterized read-only aggregations over the denormalized collections.
//!
//! Every query takes slices and shares no state, so the battery can run
//! them in any order once the store has loaded.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use report_core::error::{ReportError, Result};
use report_core::models::{CampaignDaily, CampaignDailyAction};

// ── Spend queries ─────────────────────────────────────────────────────────────

/// Total spend across daily rows targeting the given hair color.
///
/// Each daily row contributes its own spend; a campaign with several rows
/// contributes once per row.
pub fn total_spend_by_hair_color(daily: &[CampaignDaily], hair_color: &str) -> u64 {
    daily
        .iter()
        .filter(|row| row.hair_color == hair_color)
        .map(|row| row.spend)
        .sum()
}

/// Number of campaigns that spent on strictly more than `min_days` distinct
/// dates. Only rows with non-zero spend count toward a campaign's days.
pub fn campaigns_spending_on_more_than(daily: &[CampaignDaily], min_days: usize) -> usize {
    let mut dates_by_campaign: HashMap<&str, HashSet<NaiveDate>> = HashMap::new();
    for row in daily.iter().filter(|row| row.spend > 0) {
        dates_by_campaign
            .entry(row.campaign_id.as_str())
            .or_default()
            .insert(row.date);
    }
    dates_by_campaign
        .values()
        .filter(|dates| dates.len() > min_days)
        .count()
}

// ── Action queries ────────────────────────────────────────────────────────────

/// Total reported value for one (source, action) pair.
pub fn source_action_total(actions: &[CampaignDailyAction], source: &str, action: &str) -> u64 {
    actions
        .iter()
        .filter(|row| row.source == source && row.action == action)
        .map(|row| row.value)
        .sum()
}

/// Number of action rows matching a (source, action, state) triple.
pub fn source_action_count_in_state(
    actions: &[CampaignDailyAction],
    source: &str,
    action: &str,
    state: &str,
) -> usize {
    actions
        .iter()
        .filter(|row| row.action == action && row.state == state && row.source == source)
        .count()
}

/// Sources that reported the `more` action strictly more often than the
/// `than` action. A source with `more` entries and no `than` entries
/// compares against zero.
pub fn sources_reporting_more(actions: &[CampaignDailyAction], more: &str, than: &str) -> usize {
    let more_counts = occurrences_by_source(actions, more);
    let than_counts = occurrences_by_source(actions, than);

    more_counts
        .into_iter()
        .filter(|(source, count)| *count > than_counts.get(source).copied().unwrap_or(0))
        .count()
}

/// Per-source occurrence counts for one action name.
fn occurrences_by_source<'a>(
    actions: &'a [CampaignDailyAction],
    action: &str,
) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for row in actions.iter().filter(|row| row.action == action) {
        *counts.entry(row.source.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Spend per reported view across action rows of one ad type.
///
/// Sums spend (per action row) and view values over rows with
/// `action == "views"`, then divides. Zero total views is a fatal
/// zero-denominator error rather than a silent NaN.
pub fn cost_per_view(actions: &[CampaignDailyAction], ad_type: &str) -> Result<f64> {
    let mut total_spend = 0.0_f64;
    let mut total_views = 0_u64;

    for row in actions
        .iter()
        .filter(|row| row.action == "views" && row.ad_type == ad_type)
    {
        total_spend += row.spend as f64;
        total_views += row.value;
    }

    if total_views == 0 {
        return Err(ReportError::ZeroDenominator {
            metric: "cost per view",
        });
    }
    Ok(total_spend / total_views as f64)
}

// ── CPM ───────────────────────────────────────────────────────────────────────

/// A (state, hair color) audience segment with its computed CPM.
#[derive(Debug, Clone, PartialEq)]
pub struct CpmSegment {
    pub state: String,
    pub hair_color: String,
    pub cpm: f64,
}

/// The (state, hair color) pair with the highest CPM across all daily rows.
///
/// CPM for a group is total spend divided by total impressions per thousand,
/// both summed per daily row. Groups iterate in lexicographic
/// (state, hair color) order and only a strictly greater CPM replaces the
/// current best, so ties resolve to the lexicographically smallest pair.
/// Returns `None` on an empty dataset.
pub fn best_cpm_segment(daily: &[CampaignDaily]) -> Option<CpmSegment> {
    let mut totals: BTreeMap<(&str, &str), (u64, u64)> = BTreeMap::new();
    for row in daily {
        let entry = totals
            .entry((row.state.as_str(), row.hair_color.as_str()))
            .or_insert((0, 0));
        entry.0 += row.spend;
        entry.1 += row.impressions;
    }

    let mut best: Option<CpmSegment> = None;
    for ((state, hair_color), (spend, impressions)) in totals {
        // A zero-impression group divides to infinity and simply wins.
        let cpm = spend as f64 / (impressions as f64 / 1000.0);
        let replace = match &best {
            None => true,
            Some(current) => cpm > current.cpm,
        };
        if replace {
            best = Some(CpmSegment {
                state: state.to_string(),
                hair_color: hair_color.to_string(),
                cpm,
            });
        }
    }
    best
}

// ── Tests ─────────────────────────────────────────────────────────────────────
