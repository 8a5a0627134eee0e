//! CSV ingestion for the two campaign source files.
//!
//! The reference table is plain CSV. The daily stats export is CSV whose
//! last column embeds a JSON array quoted RFC-4180 style (the whole field
//! wrapped in double quotes, inner quotes doubled); the `csv` crate's
//! unquoting reproduces the payload as valid JSON text, which is then
//! decoded with `serde_json` and joined against the campaign lookup.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use report_core::error::{ReportError, Result};
use report_core::models::{Audience, Campaign, CampaignDaily, CampaignDailyAction};
use serde_json::Value;
use tracing::debug;

// ── Public API ────────────────────────────────────────────────────────────────

/// Read the campaign reference table.
///
/// Columns: `campaign_id, audience, impressions`; the header row is skipped.
/// Rows come back in file order.
pub fn read_campaigns(path: &Path) -> Result<Vec<Campaign>> {
    let mut reader = open_csv(path)?;
    let mut campaigns = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        campaigns.push(parse_campaign_record(&record)?);
    }

    debug!("Read {} campaigns from {}", campaigns.len(), path.display());
    Ok(campaigns)
}

/// Read the daily stats export and join each row against `campaigns`.
///
/// Columns: `campaign_id, ad_type, date, spend, actions`; the header row is
/// skipped. Returns the daily rows in file order together with the flat
/// action sequence, concatenated in the same order and preserving each
/// row's payload order.
///
/// A row naming a campaign id absent from `campaigns` is a fatal lookup
/// failure: the join has no fallback.
pub fn read_daily_stats(
    path: &Path,
    campaigns: &HashMap<String, Campaign>,
) -> Result<(Vec<CampaignDaily>, Vec<CampaignDailyAction>)> {
    let mut reader = open_csv(path)?;
    let mut daily_rows = Vec::new();
    let mut action_rows = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let day = parse_stats_record(&record, campaigns)?;
        action_rows.extend(day.actions.iter().cloned());
        daily_rows.push(day);
    }

    debug!(
        "Read {} daily rows ({} action rows) from {}",
        daily_rows.len(),
        action_rows.len(),
        path.display()
    );
    Ok((daily_rows, action_rows))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn open_csv(path: &Path) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file)))
}

fn csv_error(path: &Path, source: csv::Error) -> ReportError {
    ReportError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// `campaign_id, audience, impressions` → [`Campaign`].
fn parse_campaign_record(record: &csv::StringRecord) -> Result<Campaign> {
    if record.len() != 3 {
        return Err(ReportError::FieldCount {
            want: 3,
            got: record.len(),
        });
    }

    let audience = Audience::parse(&record[1])?;
    Ok(Campaign {
        campaign_id: record[0].to_string(),
        state: audience.state,
        hair_color: audience.hair_color,
        age: audience.age,
        impressions: parse_u64("impressions", &record[2])?,
    })
}

/// `campaign_id, ad_type, date, spend, actions` → [`CampaignDaily`] with its
/// action rows filled in.
fn parse_stats_record(
    record: &csv::StringRecord,
    campaigns: &HashMap<String, Campaign>,
) -> Result<CampaignDaily> {
    if record.len() != 5 {
        return Err(ReportError::FieldCount {
            want: 5,
            got: record.len(),
        });
    }

    let campaign_id = &record[0];
    let campaign = campaigns
        .get(campaign_id)
        .ok_or_else(|| ReportError::UnknownCampaign(campaign_id.to_string()))?;

    let date = parse_date(&record[2])?;
    let spend = parse_u64("spend", &record[3])?;

    let mut day = campaign.daily_row(record[1].to_string(), date, spend);
    day.actions = parse_actions(&record[4], &day)?;
    Ok(day)
}

/// Decode one row's actions payload into flattened action rows.
fn parse_actions(payload: &str, day: &CampaignDaily) -> Result<Vec<CampaignDailyAction>> {
    let entries: Vec<serde_json::Map<String, Value>> = serde_json::from_str(payload)?;
    entries
        .iter()
        .map(|entry| {
            let (source, action, value) = split_action_object(entry)?;
            Ok(day.action_row(source, action, value))
        })
        .collect()
}

/// Pull `(source, action, value)` out of one payload object.
///
/// Each object must hold exactly two keys: a string `"action"` and one other
/// key naming the source, whose value is the reported integer. Anything else
/// is rejected outright rather than taking an arbitrary first match.
fn split_action_object(entry: &serde_json::Map<String, Value>) -> Result<(String, String, u64)> {
    if entry.len() != 2 {
        return Err(ReportError::ActionShape(format!(
            "expected 2 keys, found {}",
            entry.len()
        )));
    }

    let action = entry
        .get("action")
        .ok_or_else(|| ReportError::ActionShape("missing \"action\" key".to_string()))?
        .as_str()
        .ok_or_else(|| ReportError::ActionShape("\"action\" must be a string".to_string()))?;

    let (source, raw_value) = entry
        .iter()
        .find(|(key, _)| key.as_str() != "action")
        .ok_or_else(|| ReportError::ActionShape("missing source key".to_string()))?;

    let value = raw_value.as_u64().ok_or_else(|| {
        ReportError::ActionShape(format!("source {source:?} must report an integer value"))
    })?;

    Ok((source.clone(), action.to_string(), value))
}

fn parse_u64(field: &'static str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|source| ReportError::IntField {
            field,
            value: raw.to_string(),
            source,
        })
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|source| ReportError::DateParse {
        value: raw.to_string(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn reference_lines() -> Vec<&'static str> {
        vec![
            "campaign_id,audience,impressions",
            "dce13dc8-3da2-4c6f-9e6b-1a2d07ee7f7f,MT_green_33-38,2652",
            "a1ae1c39-491-4974-8bab-b402e581cd9c,SD_blue_27-32,5875",
            "1dd74e30-e65f-4e0b-a5aa-c25da025ec03,MD_pink_48-53,2017",
            "856c435c-2dd1-42dd-ad40-b4d3c24d99d9,RI_green_42-47,1471",
            "b9c9bcb5-505e-4a39-8c17-51a7941b3fea,OK_brown_60-65,7539",
        ]
    }

    fn stats_lines() -> Vec<&'static str> {
        vec![
            "campaign_id,ad_type,date,spend,actions",
            r#"856c435c-2dd1-42dd-ad40-b4d3c24d99d9,photo,2017-06-21,943,"[{""A"": 47, ""action"": ""views""}]""#,
            r#"b9c9bcb5-505e-4a39-8c17-51a7941b3fea,photo,2017-06-19,403,"[{""K"": 70, ""action"": ""conversions""}, {""J"": 83, ""action"": ""views""}]""#,
        ]
    }

    fn lookup(campaigns: &[Campaign]) -> HashMap<String, Campaign> {
        campaigns
            .iter()
            .map(|c| (c.campaign_id.clone(), c.clone()))
            .collect()
    }

    // ── read_campaigns ────────────────────────────────────────────────────────

    #[test]
    fn test_read_campaigns_in_file_order() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "campaigns.csv", &reference_lines());

        let campaigns = read_campaigns(&path).unwrap();
        assert_eq!(campaigns.len(), 5);
        assert_eq!(
            campaigns[0],
            Campaign {
                campaign_id: "dce13dc8-3da2-4c6f-9e6b-1a2d07ee7f7f".to_string(),
                state: "MT".to_string(),
                hair_color: "green".to_string(),
                age: "33-38".to_string(),
                impressions: 2652,
            }
        );
        assert_eq!(campaigns[3].state, "RI");
        assert_eq!(campaigns[4].hair_color, "brown");
    }

    #[test]
    fn test_read_campaigns_missing_file() {
        let err = read_campaigns(Path::new("/tmp/does-not-exist-report-test/c.csv")).unwrap_err();
        assert!(matches!(err, ReportError::FileRead { .. }));
    }

    #[test]
    fn test_read_campaigns_bad_impressions() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "campaigns.csv",
            &["campaign_id,audience,impressions", "id-1,MT_green_33-38,many"],
        );

        let err = read_campaigns(&path).unwrap_err();
        assert!(matches!(
            err,
            ReportError::IntField {
                field: "impressions",
                ..
            }
        ));
    }

    #[test]
    fn test_read_campaigns_bad_audience() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "campaigns.csv",
            &["campaign_id,audience,impressions", "id-1,MT_green,2652"],
        );

        let err = read_campaigns(&path).unwrap_err();
        assert!(matches!(err, ReportError::AudienceFormat(_)));
    }

    #[test]
    fn test_read_campaigns_wrong_field_count() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "campaigns.csv",
            &["campaign_id,audience,impressions", "id-1,MT_green_33-38"],
        );

        let err = read_campaigns(&path).unwrap_err();
        assert!(matches!(err, ReportError::FieldCount { want: 3, got: 2 }));
    }

    // ── read_daily_stats ──────────────────────────────────────────────────────

    #[test]
    fn test_read_daily_stats_sample_scenario() {
        let dir = TempDir::new().unwrap();
        let campaigns_path = write_csv(dir.path(), "campaigns.csv", &reference_lines());
        let stats_path = write_csv(dir.path(), "daily_stats.csv", &stats_lines());

        let campaigns = read_campaigns(&campaigns_path).unwrap();
        let (daily, actions) = read_daily_stats(&stats_path, &lookup(&campaigns)).unwrap();

        assert_eq!(daily.len(), 2);
        let first = &daily[0];
        assert_eq!(first.campaign_id, "856c435c-2dd1-42dd-ad40-b4d3c24d99d9");
        assert_eq!(first.state, "RI");
        assert_eq!(first.hair_color, "green");
        assert_eq!(first.age, "42-47");
        assert_eq!(first.impressions, 1471);
        assert_eq!(first.ad_type, "photo");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2017, 6, 21).unwrap());
        assert_eq!(first.spend, 943);
        assert_eq!(first.actions.len(), 1);
        assert_eq!(first.actions[0].source, "A");
        assert_eq!(first.actions[0].action, "views");
        assert_eq!(first.actions[0].value, 47);

        // Flat sequence: file order, within-row payload order preserved.
        assert_eq!(actions.len(), 3);
        assert_eq!(
            actions
                .iter()
                .map(|a| (a.source.as_str(), a.action.as_str(), a.value))
                .collect::<Vec<_>>(),
            vec![
                ("A", "views", 47),
                ("K", "conversions", 70),
                ("J", "views", 83),
            ]
        );
    }

    #[test]
    fn test_read_daily_stats_unknown_campaign() {
        let dir = TempDir::new().unwrap();
        let stats_path = write_csv(
            dir.path(),
            "daily_stats.csv",
            &[
                "campaign_id,ad_type,date,spend,actions",
                r#"not-in-reference,photo,2017-06-21,943,"[{""A"": 47, ""action"": ""views""}]""#,
            ],
        );

        let err = read_daily_stats(&stats_path, &HashMap::new()).unwrap_err();
        match err {
            ReportError::UnknownCampaign(id) => assert_eq!(id, "not-in-reference"),
            other => panic!("expected UnknownCampaign, got {other:?}"),
        }
    }

    #[test]
    fn test_read_daily_stats_malformed_json_payload() {
        let dir = TempDir::new().unwrap();
        let campaigns_path = write_csv(dir.path(), "campaigns.csv", &reference_lines());
        let stats_path = write_csv(
            dir.path(),
            "daily_stats.csv",
            &[
                "campaign_id,ad_type,date,spend,actions",
                r#"856c435c-2dd1-42dd-ad40-b4d3c24d99d9,photo,2017-06-21,943,"[{""A"": 47""#,
            ],
        );

        let campaigns = read_campaigns(&campaigns_path).unwrap();
        let err = read_daily_stats(&stats_path, &lookup(&campaigns)).unwrap_err();
        assert!(matches!(err, ReportError::ActionJson(_)));
    }

    #[test]
    fn test_read_daily_stats_malformed_date() {
        let dir = TempDir::new().unwrap();
        let campaigns_path = write_csv(dir.path(), "campaigns.csv", &reference_lines());
        let stats_path = write_csv(
            dir.path(),
            "daily_stats.csv",
            &[
                "campaign_id,ad_type,date,spend,actions",
                r#"856c435c-2dd1-42dd-ad40-b4d3c24d99d9,photo,21-06-2017,943,"[{""A"": 47, ""action"": ""views""}]""#,
            ],
        );

        let campaigns = read_campaigns(&campaigns_path).unwrap();
        let err = read_daily_stats(&stats_path, &lookup(&campaigns)).unwrap_err();
        assert!(matches!(err, ReportError::DateParse { .. }));
    }

    // ── split_action_object ───────────────────────────────────────────────────

    fn object(json: &str) -> serde_json::Map<String, Value> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_split_action_object() {
        let (source, action, value) =
            split_action_object(&object(r#"{"A": 47, "action": "views"}"#)).unwrap();
        assert_eq!(source, "A");
        assert_eq!(action, "views");
        assert_eq!(value, 47);
    }

    #[test]
    fn test_split_action_object_key_order_is_irrelevant() {
        let (source, action, value) =
            split_action_object(&object(r#"{"action": "conversions", "K": 70}"#)).unwrap();
        assert_eq!(source, "K");
        assert_eq!(action, "conversions");
        assert_eq!(value, 70);
    }

    #[test]
    fn test_split_action_object_rejects_extra_keys() {
        let err =
            split_action_object(&object(r#"{"A": 47, "B": 3, "action": "views"}"#)).unwrap_err();
        assert!(matches!(err, ReportError::ActionShape(_)));
    }

    #[test]
    fn test_split_action_object_rejects_missing_action() {
        let err = split_action_object(&object(r#"{"A": 47, "B": 3}"#)).unwrap_err();
        assert!(matches!(err, ReportError::ActionShape(_)));
    }

    #[test]
    fn test_split_action_object_rejects_single_key() {
        let err = split_action_object(&object(r#"{"action": "views"}"#)).unwrap_err();
        assert!(matches!(err, ReportError::ActionShape(_)));
    }

    #[test]
    fn test_split_action_object_rejects_non_integer_value() {
        let err = split_action_object(&object(r#"{"A": "lots", "action": "views"}"#)).unwrap_err();
        assert!(matches!(err, ReportError::ActionShape(_)));
    }

    #[test]
    fn test_split_action_object_rejects_non_string_action() {
        let err = split_action_object(&object(r#"{"A": 47, "action": 5}"#)).unwrap_err();
        assert!(matches!(err, ReportError::ActionShape(_)));
    }
}
