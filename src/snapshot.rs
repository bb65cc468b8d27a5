use crate::error::ReactorResult;
use crate::tank::{CoolantContents, TankStack};
use serde::{Deserialize, Serialize};

/// Flat set of persisted reactor fields. The host owns the encoding; JSON helpers
/// are provided for hosts and tests that have no format of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactorSnapshot {
    pub volume: u32,
    pub fuel_assemblies: u32,
    pub surface_area: u32,
    pub coolant: CoolantContents,
    pub fuel_amount: u64,
    pub heated_coolant: Option<TankStack>,
    pub waste_amount: u64,
    pub damage: f64,
    pub active: bool,
    pub force_disabled: bool,
    pub rate_limit: f64,
    pub burn_remaining: f64,
    pub partial_waste: f64,
    /// Stored heat; absent in older saves, in which case the reactor keeps ambient heat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat: Option<f64>,
}

impl ReactorSnapshot {
    pub fn to_json(&self) -> ReactorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> ReactorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
