use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use floating_maze_core::{WaterTuning, DEFAULT_MOVE_RANGE};
use serde::Deserialize;

/// Session settings read from an optional TOML file.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    /// Maze width in cells; must be odd.
    pub(crate) width: u32,
    /// Maze height in cells; must be odd.
    pub(crate) height: u32,
    /// Dead-end difficulty level.
    pub(crate) difficulty: u32,
    /// Seed of the first round; entropy when absent.
    pub(crate) seed: Option<u64>,
    /// Base player hop budget.
    pub(crate) move_range: u32,
    /// Number of rounds to play.
    pub(crate) rounds: u32,
    /// Simulated milliseconds per tick.
    pub(crate) tick_ms: u64,
    /// Tick limit per round.
    pub(crate) max_ticks: u32,
    /// Ticks between autopilot moves.
    pub(crate) autopilot_interval: u32,
    /// Water hazard tuning.
    pub(crate) water: WaterConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 55,
            height: 41,
            difficulty: 32,
            seed: None,
            move_range: DEFAULT_MOVE_RANGE,
            rounds: 1,
            tick_ms: 50,
            max_ticks: 20_000,
            autopilot_interval: 8,
            water: WaterConfig::default(),
        }
    }
}

/// Water section of the session file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WaterConfig {
    /// Seconds the water stays dormant after a round starts.
    pub(crate) delay_secs: f64,
    /// Base spread rate sideways and upward, in cells per second.
    pub(crate) normal_rate: f64,
    /// Base spread rate downward, in cells per second.
    pub(crate) downward_rate: f64,
}

impl Default for WaterConfig {
    fn default() -> Self {
        let tuning = WaterTuning::default();
        Self {
            delay_secs: tuning.delay.as_secs_f64(),
            normal_rate: tuning.normal_rate,
            downward_rate: tuning.downward_rate,
        }
    }
}

impl WaterConfig {
    /// Converts the file representation into simulator tuning.
    pub(crate) fn tuning(&self) -> Result<WaterTuning> {
        let delay = Duration::try_from_secs_f64(self.delay_secs)
            .with_context(|| format!("invalid water delay {}", self.delay_secs))?;
        Ok(WaterTuning {
            delay,
            normal_rate: self.normal_rate,
            downward_rate: self.downward_rate,
        })
    }
}

impl SessionConfig {
    /// Reads the session file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse session config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid session config toml")
    }
}
