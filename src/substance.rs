// src/substance.rs - Substance identities and their reactor-relevant traits

use crate::error::ReactorError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubstanceId {
    Water,
    Steam,
    Sodium,
    SuperheatedSodium,
    FissileFuel,
    NuclearWaste,
}

impl SubstanceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubstanceId::Water => "water",
            SubstanceId::Steam => "steam",
            SubstanceId::Sodium => "sodium",
            SubstanceId::SuperheatedSodium => "superheated_sodium",
            SubstanceId::FissileFuel => "fissile_fuel",
            SubstanceId::NuclearWaste => "nuclear_waste",
        }
    }
}

impl FromStr for SubstanceId {
    type Err = ReactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "water" => Ok(SubstanceId::Water),
            "steam" => Ok(SubstanceId::Steam),
            "sodium" => Ok(SubstanceId::Sodium),
            "superheated_sodium" => Ok(SubstanceId::SuperheatedSodium),
            "fissile_fuel" => Ok(SubstanceId::FissileFuel),
            "nuclear_waste" => Ok(SubstanceId::NuclearWaste),
            _ => Err(ReactorError::UnknownSubstance(s.to_string())),
        }
    }
}

/// Whether a substance is stored as a fluid or as a chemical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstancePhase {
    Fluid,
    Chemical,
}

/// Boiling behaviour of a cooled coolant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoolantTraits {
    pub conductivity: f64,
    pub thermal_enthalpy: f64,
    /// What one unit turns into once boiled
    pub heated: SubstanceId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubstanceProfile {
    pub id: SubstanceId,
    pub phase: SubstancePhase,
    pub radioactivity: Option<f64>,
    pub coolant: Option<CoolantTraits>,
    /// Set on heated coolants: the cooled substance they boiled from
    pub heated_from: Option<SubstanceId>,
}

impl SubstanceProfile {
    pub fn is_radioactive(&self) -> bool {
        self.radioactivity.is_some_and(|r| r > 0.0)
    }

    pub fn is_coolant(&self) -> bool {
        self.coolant.is_some()
    }

    pub fn is_heated_coolant(&self) -> bool {
        self.heated_from.is_some()
    }
}

pub static SUBSTANCE_PROFILES: Lazy<HashMap<SubstanceId, SubstanceProfile>> = Lazy::new(|| {
    use SubstanceId::*;
    let mut m = HashMap::new();

    m.insert(Water, SubstanceProfile {
        id: Water,
        phase: SubstancePhase::Fluid,
        radioactivity: None,
        coolant: Some(CoolantTraits {
            conductivity: 0.5,
            thermal_enthalpy: 10.0,
            heated: Steam,
        }),
        heated_from: None,
    });

    m.insert(Steam, SubstanceProfile {
        id: Steam,
        phase: SubstancePhase::Chemical,
        radioactivity: None,
        coolant: None,
        heated_from: Some(Water),
    });

    m.insert(Sodium, SubstanceProfile {
        id: Sodium,
        phase: SubstancePhase::Chemical,
        radioactivity: None,
        coolant: Some(CoolantTraits {
            conductivity: 1.0,
            thermal_enthalpy: 5.0,
            heated: SuperheatedSodium,
        }),
        heated_from: None,
    });

    m.insert(SuperheatedSodium, SubstanceProfile {
        id: SuperheatedSodium,
        phase: SubstancePhase::Chemical,
        radioactivity: None,
        coolant: None,
        heated_from: Some(Sodium),
    });

    m.insert(FissileFuel, SubstanceProfile {
        id: FissileFuel,
        phase: SubstancePhase::Chemical,
        radioactivity: Some(0.025),
        coolant: None,
        heated_from: None,
    });

    m.insert(NuclearWaste, SubstanceProfile {
        id: NuclearWaste,
        phase: SubstancePhase::Chemical,
        radioactivity: Some(0.01),
        coolant: None,
        heated_from: None,
    });

    m
});

pub fn get_profile(id: SubstanceId) -> Option<&'static SubstanceProfile> {
    SUBSTANCE_PROFILES.get(&id)
}

/// Per-reactor view of substance traits. Starts from the default table and lets a
/// host override individual entries (e.g. a modded coolant conductivity).
#[derive(Debug, Clone)]
pub struct SubstanceRegistry {
    profiles: HashMap<SubstanceId, SubstanceProfile>,
}

impl Default for SubstanceRegistry {
    fn default() -> Self {
        Self {
            profiles: SUBSTANCE_PROFILES.clone(),
        }
    }
}

impl SubstanceRegistry {
    /// Registry with no traits at all; every lookup misses
    pub fn empty() -> Self {
        Self {
            profiles: HashMap::new(),
        }
    }

    pub fn register(&mut self, profile: SubstanceProfile) -> Option<SubstanceProfile> {
        self.profiles.insert(profile.id, profile)
    }

    pub fn get(&self, id: SubstanceId) -> Option<&SubstanceProfile> {
        self.profiles.get(&id)
    }

    pub fn radioactivity(&self, id: SubstanceId) -> Option<f64> {
        self.get(id).and_then(|p| p.radioactivity).filter(|r| *r > 0.0)
    }

    pub fn coolant(&self, id: SubstanceId) -> Option<&CoolantTraits> {
        self.get(id).and_then(|p| p.coolant.as_ref())
    }

    pub fn phase(&self, id: SubstanceId) -> Option<SubstancePhase> {
        self.get(id).map(|p| p.phase)
    }
}
