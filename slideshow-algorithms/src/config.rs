use crate::{candidates::PairingStrategy, engine::SolveBudget, selector::CoverMode};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{from_value, Map, Value};
use std::time::Duration;

/// Solver settings, read from a JSON object. Missing keys take their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Hyperparameters {
    pub pairing: PairingStrategy,
    pub cover: CoverMode,
    pub time_limit_ms: Option<u64>,
    pub node_limit: Option<u64>,
    pub improve_passes: usize,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            pairing: PairingStrategy::GreedyMaxUnion,
            cover: CoverMode::Exact,
            time_limit_ms: Some(10_000),
            node_limit: Some(1_000_000),
            improve_passes: 0,
        }
    }
}

impl TryFrom<Map<String, Value>> for Hyperparameters {
    type Error = serde_json::Error;

    fn try_from(v: Map<String, Value>) -> Result<Self, Self::Error> {
        from_value(Value::Object(v))
    }
}

impl Hyperparameters {
    pub fn from_map(hyperparameters: &Option<Map<String, Value>>) -> Result<Self> {
        match hyperparameters {
            Some(map) => Self::try_from(map.clone())
                .map_err(|e| anyhow!("Invalid hyperparameters: {}", e)),
            None => Ok(Self::default()),
        }
    }

    pub fn budget(&self) -> SolveBudget {
        SolveBudget {
            time_limit: self.time_limit_ms.map(Duration::from_millis),
            node_limit: self.node_limit,
        }
    }
}
