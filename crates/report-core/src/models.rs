use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

// ── Audience ──────────────────────────────────────────────────────────────────

/// The composite audience label from the reference table,
/// `"{state}_{hair_color}_{age_range}"`.
///
/// State codes and hair colors never contain an underscore, and age ranges
/// use a hyphen, so the three-way split is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audience {
    pub state: String,
    pub hair_color: String,
    pub age: String,
}

impl Audience {
    /// Split a composite label into its three parts.
    ///
    /// Labels that do not split into exactly three parts are rejected.
    pub fn parse(label: &str) -> Result<Self> {
        let parts: Vec<&str> = label.split('_').collect();
        match parts.as_slice() {
            [state, hair_color, age] => Ok(Self {
                state: (*state).to_string(),
                hair_color: (*hair_color).to_string(),
                age: (*age).to_string(),
            }),
            _ => Err(ReportError::AudienceFormat(label.to_string())),
        }
    }

    /// Re-join the parts into the on-disk label form.
    pub fn encode(&self) -> String {
        format!("{}_{}_{}", self.state, self.hair_color, self.age)
    }
}

// ── Campaign ──────────────────────────────────────────────────────────────────

/// One row of the campaign reference table.
///
/// Created once at load time and never mutated; two campaigns with identical
/// fields are interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Unique campaign key; stats rows join against it.
    pub campaign_id: String,
    /// 2-letter state code from the audience label.
    pub state: String,
    /// Hair color from the audience label.
    pub hair_color: String,
    /// Age range from the audience label, e.g. `"33-38"`.
    pub age: String,
    /// Impressions served for this campaign.
    pub impressions: u64,
}

impl Campaign {
    /// Build a daily row carrying this campaign's denormalized fields.
    ///
    /// The returned row starts with an empty action list; the loader fills
    /// it in once the embedded payload is parsed.
    pub fn daily_row(&self, ad_type: String, date: NaiveDate, spend: u64) -> CampaignDaily {
        CampaignDaily {
            campaign_id: self.campaign_id.clone(),
            state: self.state.clone(),
            hair_color: self.hair_color.clone(),
            age: self.age.clone(),
            impressions: self.impressions,
            ad_type,
            date,
            spend,
            actions: Vec::new(),
        }
    }
}

// ── CampaignDaily ─────────────────────────────────────────────────────────────

/// One row of the daily stats file, denormalized against its campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDaily {
    pub campaign_id: String,
    pub state: String,
    pub hair_color: String,
    pub age: String,
    pub impressions: u64,
    /// Ad format for this day, e.g. `"photo"` or `"video"`.
    pub ad_type: String,
    /// Calendar date the stats apply to.
    pub date: NaiveDate,
    /// Spend for this day in the smallest currency unit.
    pub spend: u64,
    /// Per-source action entries reported for this day, in payload order.
    pub actions: Vec<CampaignDailyAction>,
}

impl CampaignDaily {
    /// Build the flattened action row for one entry of this day's payload.
    ///
    /// Every field except `source`, `action` and `value` is copied from this
    /// row, which is what keeps the flat action sequence self-contained.
    pub fn action_row(&self, source: String, action: String, value: u64) -> CampaignDailyAction {
        CampaignDailyAction {
            campaign_id: self.campaign_id.clone(),
            state: self.state.clone(),
            hair_color: self.hair_color.clone(),
            age: self.age.clone(),
            impressions: self.impressions,
            ad_type: self.ad_type.clone(),
            date: self.date,
            spend: self.spend,
            source,
            action,
            value,
        }
    }
}

// ── CampaignDailyAction ───────────────────────────────────────────────────────

/// One action entry from a daily row's embedded payload, carrying the full
/// campaign-day context so it can be queried on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignDailyAction {
    pub campaign_id: String,
    pub state: String,
    pub hair_color: String,
    pub age: String,
    pub impressions: u64,
    pub ad_type: String,
    pub date: NaiveDate,
    pub spend: u64,
    /// Reporting source label, e.g. `"A"` or `"H"`.
    pub source: String,
    /// Action-type name, e.g. `"views"` or `"clicks"`.
    pub action: String,
    /// Value the source reported for this action.
    pub value: u64,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
