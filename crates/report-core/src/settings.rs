use clap::Parser;
use std::path::PathBuf;

/// Campaign performance report over flat-file exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "campaign-report",
    about = "Campaign performance report over flat-file exports",
    version
)]
pub struct Settings {
    /// Directory holding the two source files
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Campaign reference file name inside the data directory
    #[arg(long, default_value = "campaigns.csv")]
    pub campaigns_file: String,

    /// Daily stats file name inside the data directory
    #[arg(long, default_value = "daily_stats.csv")]
    pub stats_file: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,
}

impl Settings {
    /// Full path of the campaign reference file.
    pub fn campaigns_path(&self) -> PathBuf {
        self.data_dir.join(&self.campaigns_file)
    }

    /// Full path of the daily stats file.
    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join(&self.stats_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::parse_from(["campaign-report"]);
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.campaigns_file, "campaigns.csv");
        assert_eq!(settings.stats_file, "daily_stats.csv");
        assert_eq!(settings.log_level, "INFO");
    }

    #[test]
    fn test_paths_join_data_dir() {
        let settings = Settings::parse_from(["campaign-report", "--data-dir", "/srv/exports"]);
        assert_eq!(
            settings.campaigns_path(),
            PathBuf::from("/srv/exports/campaigns.csv")
        );
        assert_eq!(
            settings.stats_path(),
            PathBuf::from("/srv/exports/daily_stats.csv")
        );
    }

    #[test]
    fn test_file_name_overrides() {
        let settings = Settings::parse_from([
            "campaign-report",
            "--campaigns-file",
            "source1.csv",
            "--stats-file",
            "source2.csv",
        ]);
        assert_eq!(settings.campaigns_path(), PathBuf::from("data/source1.csv"));
        assert_eq!(settings.stats_path(), PathBuf::from("data/source2.csv"));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(Settings::try_parse_from(["campaign-report", "--log-level", "TRACE"]).is_err());
    }
}
