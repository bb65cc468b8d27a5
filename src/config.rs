use crate::constants::*;
use crate::error::{ReactorError, ReactorResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunables for a fission reactor. Every field falls back to its default when
/// absent from JSON, so partial config files are fine.
///
/// The host may mutate the config between ticks; the simulation reads it live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorConfig {
    /// Heat capacity contributed by each cell of the structure
    pub casing_heat_capacity: f64,
    /// Surface area per assembly needed for full boil efficiency
    pub surface_area_target: f64,
    pub burn_per_assembly: f64,
    pub max_fuel_per_assembly: u64,
    pub cooled_coolant_per_volume: u64,
    pub heated_coolant_per_volume: u64,
    pub energy_per_fuel_unit: f64,
    pub min_damage_temperature_k: f64,
    pub max_damage_temperature_k: f64,
    /// Scaled by damage/100 for the per-tick meltdown trial
    pub meltdown_chance: f64,
    pub meltdowns_enabled: bool,
    pub meltdown_radiation_multiplier: f64,
    pub post_meltdown_damage: f64,
    pub default_burn_rate: f64,
    pub radiation_enabled: bool,
    pub ambient_temperature_k: f64,
    pub air_inverse_coefficient: f64,
    pub inverse_insulation_coefficient: f64,
    pub inverse_conduction_coefficient: f64,
    pub base_boil_temperature_k: f64,
    /// Mean number of ticks between entity exposure scans
    pub radiation_sample_ticks: u32,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            casing_heat_capacity: CASING_HEAT_CAPACITY,
            surface_area_target: SURFACE_AREA_TARGET,
            burn_per_assembly: BURN_PER_ASSEMBLY,
            max_fuel_per_assembly: FUEL_PER_ASSEMBLY,
            cooled_coolant_per_volume: COOLANT_PER_VOLUME,
            heated_coolant_per_volume: HEATED_COOLANT_PER_VOLUME,
            energy_per_fuel_unit: ENERGY_PER_FUEL_UNIT,
            min_damage_temperature_k: MIN_DAMAGE_TEMPERATURE_K,
            max_damage_temperature_k: MAX_DAMAGE_TEMPERATURE_K,
            meltdown_chance: MELTDOWN_CHANCE,
            meltdowns_enabled: true,
            meltdown_radiation_multiplier: MELTDOWN_RADIATION_MULTIPLIER,
            post_meltdown_damage: POST_MELTDOWN_DAMAGE,
            default_burn_rate: DEFAULT_BURN_RATE,
            radiation_enabled: true,
            ambient_temperature_k: AMBIENT_TEMPERATURE_K,
            air_inverse_coefficient: AIR_INVERSE_COEFFICIENT,
            inverse_insulation_coefficient: INVERSE_INSULATION_COEFFICIENT,
            inverse_conduction_coefficient: INVERSE_CONDUCTION_COEFFICIENT,
            base_boil_temperature_k: BASE_BOIL_TEMPERATURE_K,
            radiation_sample_ticks: TICKS_PER_SECOND,
        }
    }
}

impl ReactorConfig {
    /// Config with meltdowns switched off; damage latches a force-disable instead
    pub fn without_meltdowns() -> Self {
        Self {
            meltdowns_enabled: false,
            ..Default::default()
        }
    }

    pub fn with_meltdown_chance(mut self, meltdown_chance: f64) -> Self {
        self.meltdown_chance = meltdown_chance;
        self
    }

    pub fn with_radiation(mut self, enabled: bool) -> Self {
        self.radiation_enabled = enabled;
        self
    }

    pub fn with_burn_per_assembly(mut self, burn_per_assembly: f64) -> Self {
        self.burn_per_assembly = burn_per_assembly;
        self
    }

    pub fn with_ambient_temperature(mut self, kelvin: f64) -> Self {
        self.ambient_temperature_k = kelvin;
        self
    }

    /// Load from a JSON file and validate.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ReactorResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> ReactorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Denominator of the environment loss formula
    pub fn inverse_environment_coefficient(&self) -> f64 {
        self.air_inverse_coefficient
            + self.inverse_insulation_coefficient
            + self.inverse_conduction_coefficient
    }

    pub fn validate(&self) -> ReactorResult<()> {
        let positive = [
            ("casing_heat_capacity", self.casing_heat_capacity),
            ("surface_area_target", self.surface_area_target),
            ("energy_per_fuel_unit", self.energy_per_fuel_unit),
            ("min_damage_temperature_k", self.min_damage_temperature_k),
            ("inverse_environment_coefficient", self.inverse_environment_coefficient()),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ReactorError::ConfigError(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.burn_per_assembly.is_finite() && self.burn_per_assembly >= 0.0) {
            return Err(ReactorError::ConfigError(format!(
                "burn_per_assembly must not be negative, got {}",
                self.burn_per_assembly
            )));
        }
        if self.max_damage_temperature_k < self.min_damage_temperature_k {
            return Err(ReactorError::ConfigError(format!(
                "max_damage_temperature_k ({}) is below min_damage_temperature_k ({})",
                self.max_damage_temperature_k, self.min_damage_temperature_k
            )));
        }
        if !(0.0..=1.0).contains(&self.meltdown_chance) {
            return Err(ReactorError::ConfigError(format!(
                "meltdown_chance must be within [0, 1], got {}",
                self.meltdown_chance
            )));
        }
        if !(0.0..=MAX_DAMAGE).contains(&self.post_meltdown_damage) {
            return Err(ReactorError::ConfigError(format!(
                "post_meltdown_damage must be within [0, {MAX_DAMAGE}], got {}",
                self.post_meltdown_damage
            )));
        }
        if self.radiation_sample_ticks == 0 {
            return Err(ReactorError::ConfigError(
                "radiation_sample_ticks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
