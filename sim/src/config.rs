//! Simulation configuration, loaded from TOML.

use anyhow::Context;
use rebase_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of the two-domain scenario.
///
/// Rates are per-second and scaled by `SCALE` (1e18). Times are seconds since
/// the start of the run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Base rate of the home domain at start.
    #[serde(default = "default_home_base_rate")]
    pub home_base_rate: u64,

    /// Base rate of the away domain. Usually lower than the home rate.
    #[serde(default = "default_away_base_rate")]
    pub away_base_rate: u64,

    /// Home base rate after the scheduled cut. Must be below `home_base_rate`.
    #[serde(default = "default_home_rate_after_cut")]
    pub home_rate_after_cut: u64,

    #[serde(default = "default_rate_cut_at_secs")]
    pub rate_cut_at_secs: u64,

    /// Early holder's deposit, made at time zero.
    #[serde(default = "default_early_deposit")]
    pub early_deposit: u64,

    /// Late holder's deposit, made right after the rate cut.
    #[serde(default = "default_late_deposit")]
    pub late_deposit: u64,

    /// When the early holder bridges to the away domain.
    #[serde(default = "default_bridge_at_secs")]
    pub bridge_at_secs: u64,

    /// Share of the early holder's balance to bridge; 100 bridges everything.
    #[serde(default = "default_bridge_percent")]
    pub bridge_percent: u8,

    /// Time the message spends in the transport.
    #[serde(default = "default_transit_secs")]
    pub transit_secs: u64,

    /// How long to let balances accrue after delivery before reporting.
    #[serde(default = "default_accrue_secs")]
    pub accrue_secs: u64,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_home_base_rate() -> u64 {
    50_000_000_000
}

fn default_away_base_rate() -> u64 {
    40_000_000_000
}

fn default_home_rate_after_cut() -> u64 {
    30_000_000_000
}

fn default_rate_cut_at_secs() -> u64 {
    600
}

fn default_early_deposit() -> u64 {
    100_000
}

fn default_late_deposit() -> u64 {
    50_000
}

fn default_bridge_at_secs() -> u64 {
    3_600
}

fn default_bridge_percent() -> u8 {
    100
}

fn default_transit_secs() -> u64 {
    400
}

fn default_accrue_secs() -> u64 {
    86_400
}

fn default_log_level() -> String {
    "info".into()
}

impl SimConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in config {}", path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("parsing TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("serializing config")
    }

    /// Reject schedules the scenario cannot run.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.home_rate_after_cut < self.home_base_rate,
            "home_rate_after_cut ({}) must be below home_base_rate ({})",
            self.home_rate_after_cut,
            self.home_base_rate
        );
        anyhow::ensure!(
            self.rate_cut_at_secs <= self.bridge_at_secs,
            "rate cut must happen before the bridge transfer"
        );
        anyhow::ensure!(
            (1..=100).contains(&self.bridge_percent),
            "bridge_percent must be between 1 and 100"
        );
        anyhow::ensure!(self.early_deposit > 0, "early_deposit must be positive");
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            home_base_rate: default_home_base_rate(),
            away_base_rate: default_away_base_rate(),
            home_rate_after_cut: default_home_rate_after_cut(),
            rate_cut_at_secs: default_rate_cut_at_secs(),
            early_deposit: default_early_deposit(),
            late_deposit: default_late_deposit(),
            bridge_at_secs: default_bridge_at_secs(),
            bridge_percent: default_bridge_percent(),
            transit_secs: default_transit_secs(),
            accrue_secs: default_accrue_secs(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
