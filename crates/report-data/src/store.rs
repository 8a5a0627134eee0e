//! Cached, lazily loaded view over the two source files.
//!
//! A [`Store`] is an explicitly owned instance: the binary constructs one
//! from the configured paths and hands it to the metrics engine. There is no
//! process-wide singleton, so tests can point a store at fixture files.

use std::collections::HashMap;
use std::path::PathBuf;

use report_core::error::{ReportError, Result};
use report_core::models::{Campaign, CampaignDaily, CampaignDailyAction};
use tracing::info;

use crate::reader;

// ── Dataset ───────────────────────────────────────────────────────────────────

/// The three denormalized collections produced by one load.
///
/// All three preserve file order; `daily_action_stats` is the concatenation
/// of every daily row's actions in that same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub campaigns: Vec<Campaign>,
    pub daily_campaign_stats: Vec<CampaignDaily>,
    pub daily_action_stats: Vec<CampaignDailyAction>,
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Owns the two source paths and the cached dataset.
///
/// Loading happens at most once, lazily, on first access; [`Store::reload`]
/// re-reads both files from scratch and replaces the whole cache. The cache
/// replacement is not atomic with respect to concurrent readers, so callers
/// load once before fanning out queries and never reload mid-query.
pub struct Store {
    campaigns_path: PathBuf,
    stats_path: PathBuf,
    cache: Option<Dataset>,
}

impl Store {
    /// Create a store over the given reference and stats files.
    ///
    /// No I/O happens until the first accessor call.
    pub fn new(campaigns_path: impl Into<PathBuf>, stats_path: impl Into<PathBuf>) -> Self {
        Self {
            campaigns_path: campaigns_path.into(),
            stats_path: stats_path.into(),
            cache: None,
        }
    }

    /// Re-read both source files and replace all cached collections.
    ///
    /// The campaign table loads first: the stats join is a hard dependency
    /// on the id lookup. On any failure the previous cache is discarded and
    /// no partial dataset is served.
    pub fn reload(&mut self) -> Result<()> {
        self.cache = None;

        let campaigns = reader::read_campaigns(&self.campaigns_path)?;
        // Insertion in file order makes duplicate ids last-write-wins.
        let lookup: HashMap<String, Campaign> = campaigns
            .iter()
            .map(|c| (c.campaign_id.clone(), c.clone()))
            .collect();

        let (daily, actions) = reader::read_daily_stats(&self.stats_path, &lookup)?;

        info!(
            campaigns = campaigns.len(),
            daily_rows = daily.len(),
            action_rows = actions.len(),
            "source files loaded"
        );

        self.cache = Some(Dataset {
            campaigns,
            daily_campaign_stats: daily,
            daily_action_stats: actions,
        });
        Ok(())
    }

    /// All three collections at once: the load barrier handed to the
    /// metrics engine. Triggers a full load if nothing is cached yet.
    pub fn dataset(&mut self) -> Result<&Dataset> {
        if self.cache.is_none() {
            self.reload()?;
        }
        self.cache
            .as_ref()
            .ok_or_else(|| ReportError::Other(anyhow::anyhow!("store cache empty after reload")))
    }

    /// Campaigns in reference-file order.
    pub fn campaigns(&mut self) -> Result<&[Campaign]> {
        Ok(&self.dataset()?.campaigns)
    }

    /// Daily rows in stats-file order.
    pub fn daily_campaign_stats(&mut self) -> Result<&[CampaignDaily]> {
        Ok(&self.dataset()?.daily_campaign_stats)
    }

    /// Flat action rows, concatenated in stats-file order.
    pub fn daily_action_stats(&mut self) -> Result<&[CampaignDailyAction]> {
        Ok(&self.dataset()?.daily_action_stats)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
