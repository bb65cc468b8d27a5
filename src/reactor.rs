//! Fission reactor state.
//!
//! A `FissionReactor` exists only while its structure is formed. Per-tick
//! mutation happens in the ops under `sim::sim_op`; this module owns the
//! state, the derived quantities and the operator command surface.

use crate::config::ReactorConfig;
use crate::constants::MAX_DAMAGE;
use crate::error::{CommandError, ReactorError, ReactorResult};
use crate::heat_node::{HeatNode, HeatStore};
use crate::host::{Bounds, Position, StructureInfo};
use crate::math_utils::round_to;
use crate::snapshot::ReactorSnapshot;
use crate::substance::{SubstanceId, SubstanceRegistry};
use crate::tank::{Automation, CoolantTank, Tank, TankDirection};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Where the reactor sits in the damage state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DamageState {
    #[default]
    Safe,
    /// Fully damaged and still hot enough to keep rolling for a meltdown
    Dangerous,
    /// Safety lockout latched; cannot be activated until damage and temperature are safe
    ForceDisabled,
}

#[derive(Debug, Clone)]
pub struct FissionReactor {
    pub(crate) config: ReactorConfig,
    pub(crate) registry: SubstanceRegistry,
    pub(crate) structure: StructureInfo,
    pub(crate) heat: HeatNode,
    pub(crate) fuel_tank: Tank,
    pub(crate) coolant_tank: CoolantTank,
    pub(crate) heated_coolant_tank: Tank,
    pub(crate) waste_tank: Tank,
    pub(crate) damage: f64,
    pub(crate) active: bool,
    pub(crate) force_disabled: bool,
    pub(crate) rate_limit: f64,
    pub(crate) burn_remaining: f64,
    pub(crate) partial_waste: f64,
    pub(crate) last_burn_rate: f64,
    pub(crate) last_boil_rate: u64,
    pub(crate) last_environment_loss: f64,
}

impl FissionReactor {
    /// Form a reactor over a freshly detected structure with default substance traits
    pub fn form(structure: StructureInfo, config: ReactorConfig) -> Self {
        Self::form_with_registry(structure, config, SubstanceRegistry::default())
    }

    pub fn form_with_registry(
        structure: StructureInfo,
        config: ReactorConfig,
        registry: SubstanceRegistry,
    ) -> Self {
        let heated_coolants: Vec<SubstanceId> = registry_ids(&registry)
            .filter(|id| registry.get(*id).is_some_and(|p| p.is_heated_coolant()))
            .collect();

        let heat = HeatNode::new(
            config.casing_heat_capacity * structure.volume as f64,
            config.ambient_temperature_k,
            config.inverse_environment_coefficient(),
        );
        let fuel_capacity = fuel_capacity(&config, &structure);

        let mut reactor = Self {
            fuel_tank: Tank::new(fuel_capacity, TankDirection::Input, vec![SubstanceId::FissileFuel]),
            coolant_tank: CoolantTank::new(config.cooled_coolant_per_volume * structure.volume as u64),
            heated_coolant_tank: Tank::new(
                config.heated_coolant_per_volume * structure.volume as u64,
                TankDirection::Output,
                heated_coolants,
            ),
            waste_tank: Tank::new(fuel_capacity, TankDirection::Output, vec![SubstanceId::NuclearWaste]),
            heat,
            damage: 0.0,
            active: false,
            force_disabled: false,
            rate_limit: 0.0,
            burn_remaining: 0.0,
            partial_waste: 0.0,
            last_burn_rate: 0.0,
            last_boil_rate: 0,
            last_environment_loss: 0.0,
            structure,
            registry,
            config,
        };
        reactor.rate_limit = reactor.config.default_burn_rate.clamp(0.0, reactor.max_burn_rate());

        info!(
            "Fission reactor formed: volume={} assemblies={} surface_area={}",
            structure.volume, structure.fuel_assemblies, structure.surface_area
        );
        reactor
    }

    /// Apply a new structure reading. Capacities follow the new dimensions; contents
    /// that no longer fit are lost. The ambient baseline is kept from first formation.
    pub fn reform(&mut self, structure: StructureInfo) {
        self.structure = structure;
        let volume = structure.volume as u64;
        let fuel_capacity = fuel_capacity(&self.config, &structure);

        self.heat
            .set_heat_capacity(self.config.casing_heat_capacity * structure.volume as f64, true);
        let lost = [
            ("fuel", self.fuel_tank.set_capacity(fuel_capacity)),
            ("waste", self.waste_tank.set_capacity(fuel_capacity)),
            ("coolant", self.coolant_tank.set_capacity(self.config.cooled_coolant_per_volume * volume)),
            (
                "heated coolant",
                self.heated_coolant_tank
                    .set_capacity(self.config.heated_coolant_per_volume * volume),
            ),
        ];
        for (tank, amount) in lost {
            if amount > 0 {
                warn!("Reformed reactor lost {} units of {}", amount, tank);
            }
        }
        self.rate_limit = self.rate_limit.clamp(0.0, self.max_burn_rate());
        info!(
            "Fission reactor reformed: volume={} assemblies={} surface_area={}",
            structure.volume, structure.fuel_assemblies, structure.surface_area
        );
    }

    // --- derived quantities ---

    pub fn temperature(&self) -> f64 {
        self.heat.temperature()
    }

    pub fn heat(&self) -> f64 {
        self.heat.heat()
    }

    pub fn heat_capacity(&self) -> f64 {
        self.heat.heat_capacity()
    }

    pub fn ambient_temperature(&self) -> f64 {
        self.heat.ambient_temperature()
    }

    pub fn heat_node(&self) -> &HeatNode {
        &self.heat
    }

    /// Heat exchanged with the host (heat pipes, external heaters). Negative
    /// values remove heat.
    pub fn handle_heat(&mut self, delta: f64) {
        if delta.is_finite() {
            self.heat.handle_heat(delta);
        }
    }

    pub fn max_burn_rate(&self) -> f64 {
        self.structure.fuel_assemblies as f64 * self.config.burn_per_assembly
    }

    /// Fraction of ideal heat-to-coolant transfer the assembly surface allows
    pub fn boil_efficiency(&self) -> f64 {
        if self.structure.fuel_assemblies == 0 {
            return 0.0;
        }
        let per_assembly =
            self.structure.surface_area as f64 / self.structure.fuel_assemblies as f64;
        (per_assembly / self.config.surface_area_target).min(1.0)
    }

    pub fn damage(&self) -> f64 {
        self.damage
    }

    /// Damage as a whole percentage of the maximum
    pub fn damage_percent(&self) -> u64 {
        (self.damage / MAX_DAMAGE * 100.0).round() as u64
    }

    pub fn damage_state(&self) -> DamageState {
        if self.force_disabled {
            DamageState::ForceDisabled
        } else if self.damage >= MAX_DAMAGE
            && self.temperature() >= self.config.min_damage_temperature_k
        {
            DamageState::Dangerous
        } else {
            DamageState::Safe
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_burning(&self) -> bool {
        self.last_burn_rate > 0.0
    }

    pub fn is_force_disabled(&self) -> bool {
        self.force_disabled
    }

    pub fn rate_limit(&self) -> f64 {
        self.rate_limit
    }

    pub fn last_burn_rate(&self) -> f64 {
        self.last_burn_rate
    }

    pub fn last_boil_rate(&self) -> u64 {
        self.last_boil_rate
    }

    pub fn environment_loss(&self) -> f64 {
        self.last_environment_loss
    }

    pub fn burn_remaining(&self) -> f64 {
        self.burn_remaining
    }

    pub fn partial_waste(&self) -> f64 {
        self.partial_waste
    }

    pub fn fuel_tank(&self) -> &Tank {
        &self.fuel_tank
    }

    pub fn coolant_tank(&self) -> &CoolantTank {
        &self.coolant_tank
    }

    pub fn heated_coolant_tank(&self) -> &Tank {
        &self.heated_coolant_tank
    }

    pub fn waste_tank(&self) -> &Tank {
        &self.waste_tank
    }

    pub fn structure(&self) -> &StructureInfo {
        &self.structure
    }

    pub fn center(&self) -> Position {
        self.structure.bounds.center()
    }

    /// Region scanned for entities while burning
    pub fn hot_zone(&self) -> Bounds {
        self.structure.bounds.interior()
    }

    pub fn registry(&self) -> &SubstanceRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ReactorConfig {
        &self.config
    }

    /// Live configuration; changes are read by the next tick
    pub fn config_mut(&mut self) -> &mut ReactorConfig {
        &mut self.config
    }

    /// Radioactivity of the waste tank plus carried partial waste. Read-only.
    pub fn waste_radioactivity(&self) -> f64 {
        match self.waste_tank.stack() {
            None => {
                self.partial_waste
                    * self.registry.radioactivity(SubstanceId::NuclearWaste).unwrap_or(0.0)
            }
            Some(stack) => match self.registry.radioactivity(stack.substance) {
                Some(radioactivity) => (stack.amount as f64 + self.partial_waste) * radioactivity,
                None => 0.0,
            },
        }
    }

    // --- operator commands ---

    /// Turn the reactor on or off. Turning on is refused while force disabled.
    pub fn set_active(&mut self, active: bool) -> Result<(), CommandError> {
        if active && self.force_disabled {
            return Err(CommandError::ForceDisabled);
        }
        if active != self.active {
            info!("Fission reactor {}", if active { "activated" } else { "deactivated" });
        }
        self.active = active;
        Ok(())
    }

    pub fn activate(&mut self) -> Result<(), CommandError> {
        if self.active {
            return Err(CommandError::AlreadyActive);
        }
        self.set_active(true)
    }

    pub fn scram(&mut self) -> Result<(), CommandError> {
        if !self.active {
            return Err(CommandError::NotActive);
        }
        info!("Fission reactor scrammed at {:.1}K", self.temperature());
        self.set_active(false)
    }

    /// Set the burn-rate ceiling, clamped to `[0, max_burn_rate]`. Returns the
    /// value now in effect; NaN leaves the current limit untouched.
    pub fn set_rate_limit(&mut self, rate: f64) -> f64 {
        if rate.is_nan() {
            debug!("Ignoring NaN rate limit");
            return self.rate_limit;
        }
        self.rate_limit = rate.clamp(0.0, self.max_burn_rate());
        self.rate_limit
    }

    /// Strict variant of [`set_rate_limit`](Self::set_rate_limit): the rate is rounded
    /// to two decimals and refused when outside `[0, max_burn_rate]`.
    pub fn set_burn_rate(&mut self, rate: f64) -> Result<(), CommandError> {
        if !rate.is_finite() {
            return Err(CommandError::InvalidBurnRate);
        }
        let rate = round_to(rate, 2);
        let max = self.max_burn_rate();
        if rate < 0.0 || rate > max {
            return Err(CommandError::BurnRateOutOfRange { requested: rate, max });
        }
        self.rate_limit = rate;
        Ok(())
    }

    // --- host-side transfers ---

    pub fn insert_fuel(&mut self, amount: u64) -> u64 {
        self.fuel_tank
            .insert(SubstanceId::FissileFuel, amount, Automation::External)
    }

    pub fn insert_coolant(&mut self, substance: SubstanceId, amount: u64) -> u64 {
        self.coolant_tank.insert(substance, amount, &self.registry)
    }

    pub fn extract_waste(&mut self, amount: u64) -> u64 {
        self.waste_tank.extract(amount, Automation::External)
    }

    pub fn extract_heated_coolant(&mut self, amount: u64) -> u64 {
        self.heated_coolant_tank.extract(amount, Automation::External)
    }

    // --- persistence ---

    pub fn snapshot(&self) -> ReactorSnapshot {
        ReactorSnapshot {
            volume: self.structure.volume,
            fuel_assemblies: self.structure.fuel_assemblies,
            surface_area: self.structure.surface_area,
            coolant: self.coolant_tank.contents(),
            fuel_amount: self.fuel_tank.stored(),
            heated_coolant: self.heated_coolant_tank.stack(),
            waste_amount: self.waste_tank.stored(),
            damage: self.damage,
            active: self.active,
            force_disabled: self.force_disabled,
            rate_limit: self.rate_limit,
            burn_remaining: self.burn_remaining,
            partial_waste: self.partial_waste,
            heat: Some(self.heat.heat()),
        }
    }

    /// Load persisted fields into a reactor formed over a matching structure.
    pub fn restore(&mut self, snapshot: &ReactorSnapshot) -> ReactorResult<()> {
        if snapshot.volume != self.structure.volume
            || snapshot.fuel_assemblies != self.structure.fuel_assemblies
        {
            return Err(ReactorError::SnapshotMismatch(format!(
                "snapshot is for volume={} assemblies={}, structure has volume={} assemblies={}",
                snapshot.volume,
                snapshot.fuel_assemblies,
                self.structure.volume,
                self.structure.fuel_assemblies
            )));
        }
        if !snapshot.coolant.fits(&self.registry) {
            return Err(ReactorError::SnapshotMismatch(format!(
                "{:?} is not a coolant the registry stores that way",
                snapshot.coolant
            )));
        }
        if let Some(heated) = snapshot.heated_coolant {
            if !self.heated_coolant_tank.accepts(heated.substance) {
                return Err(ReactorError::SnapshotMismatch(format!(
                    "{} is not a heated coolant",
                    heated.substance.as_str()
                )));
            }
        }

        self.structure.surface_area = snapshot.surface_area;
        self.coolant_tank.set_contents(snapshot.coolant);
        self.fuel_tank
            .set_stack(SubstanceId::FissileFuel, snapshot.fuel_amount);
        self.waste_tank
            .set_stack(SubstanceId::NuclearWaste, snapshot.waste_amount);
        match snapshot.heated_coolant {
            Some(stack) => {
                self.heated_coolant_tank.set_stack(stack.substance, stack.amount);
            }
            None => self.heated_coolant_tank.set_empty(),
        }
        self.damage = snapshot.damage.clamp(0.0, MAX_DAMAGE);
        self.force_disabled = snapshot.force_disabled;
        self.active = snapshot.active && !snapshot.force_disabled;
        self.rate_limit = snapshot.rate_limit.clamp(0.0, self.max_burn_rate());
        self.burn_remaining = snapshot.burn_remaining.clamp(0.0, 1.0 - f64::EPSILON);
        self.partial_waste = snapshot.partial_waste.clamp(0.0, 1.0 - f64::EPSILON);
        if let Some(heat) = snapshot.heat {
            self.heat.set_heat(heat);
        }
        Ok(())
    }
}

fn fuel_capacity(config: &ReactorConfig, structure: &StructureInfo) -> u64 {
    structure.fuel_assemblies as u64 * config.max_fuel_per_assembly
}

fn registry_ids(registry: &SubstanceRegistry) -> impl Iterator<Item = SubstanceId> + '_ {
    use SubstanceId::*;
    [Water, Steam, Sodium, SuperheatedSodium, FissileFuel, NuclearWaste]
        .into_iter()
        .filter(move |id| registry.get(*id).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tank::{CoolantContents, TankStack};
    use SubstanceId::*;
    use approx::assert_abs_diff_eq;

    fn structure(volume: u32, assemblies: u32, surface_area: u32) -> StructureInfo {
        StructureInfo {
            volume,
            fuel_assemblies: assemblies,
            surface_area,
            bounds: Bounds::new([0, 0, 0], [4, 4, 4]),
        }
    }

    fn reactor() -> FissionReactor {
        FissionReactor::form(structure(100, 10, 40), ReactorConfig::default())
    }

    #[test]
    fn test_formation_derives_capacities() {
        let reactor = reactor();
        assert_eq!(reactor.fuel_tank().capacity(), 80_000);
        assert_eq!(reactor.waste_tank().capacity(), 80_000);
        assert_eq!(reactor.coolant_tank().capacity(), 10_000_000);
        assert_eq!(reactor.heated_coolant_tank().capacity(), 100_000_000);
        assert_abs_diff_eq!(reactor.heat_capacity(), 100_000.0);
        assert_abs_diff_eq!(reactor.temperature(), 300.0);
        assert_abs_diff_eq!(reactor.rate_limit(), 0.1);
        assert!(!reactor.is_active());
    }

    #[test]
    fn test_boil_efficiency_is_capped() {
        assert_abs_diff_eq!(reactor().boil_efficiency(), 1.0);
        let half = FissionReactor::form(structure(100, 10, 20), ReactorConfig::default());
        assert_abs_diff_eq!(half.boil_efficiency(), 0.5);
    }

    #[test]
    fn test_zero_assemblies_is_degenerate_not_a_fault() {
        let reactor = FissionReactor::form(structure(27, 0, 0), ReactorConfig::default());
        assert_eq!(reactor.boil_efficiency(), 0.0);
        assert_eq!(reactor.max_burn_rate(), 0.0);
        assert_eq!(reactor.rate_limit(), 0.0);
        assert_eq!(reactor.fuel_tank().capacity(), 0);
    }

    #[test]
    fn test_activation_commands() {
        let mut reactor = reactor();
        assert_eq!(reactor.scram(), Err(CommandError::NotActive));
        assert!(reactor.activate().is_ok());
        assert_eq!(reactor.activate(), Err(CommandError::AlreadyActive));
        assert!(reactor.scram().is_ok());

        reactor.force_disabled = true;
        assert_eq!(reactor.set_active(true), Err(CommandError::ForceDisabled));
        assert!(!reactor.is_active());
        // turning off is always allowed
        assert!(reactor.set_active(false).is_ok());
    }

    #[test]
    fn test_rate_limit_clamps_and_is_idempotent() {
        let mut reactor = reactor();
        assert_abs_diff_eq!(reactor.set_rate_limit(50.0), 10.0);
        assert_abs_diff_eq!(reactor.set_rate_limit(-1.0), 0.0);
        reactor.set_rate_limit(3.5);

        let before = reactor.snapshot();
        reactor.set_rate_limit(reactor.rate_limit());
        assert_eq!(before, reactor.snapshot());

        assert_abs_diff_eq!(reactor.set_rate_limit(f64::NAN), 3.5);
    }

    #[test]
    fn test_burn_rate_command_rejects_out_of_range() {
        let mut reactor = reactor();
        assert_eq!(
            reactor.set_burn_rate(10.5),
            Err(CommandError::BurnRateOutOfRange { requested: 10.5, max: 10.0 })
        );
        assert_eq!(reactor.set_burn_rate(f64::INFINITY), Err(CommandError::InvalidBurnRate));
        assert!(reactor.set_burn_rate(2.346).is_ok());
        assert_abs_diff_eq!(reactor.rate_limit(), 2.35, epsilon = 1e-9);
    }

    #[test]
    fn test_reform_truncates_and_rescales() {
        let mut reactor = reactor();
        reactor.insert_fuel(60_000);
        reactor.set_rate_limit(10.0);
        reactor.reform(structure(50, 5, 20));

        assert_eq!(reactor.fuel_tank().capacity(), 40_000);
        assert_eq!(reactor.fuel_tank().stored(), 40_000);
        assert_abs_diff_eq!(reactor.rate_limit(), 5.0);
        // shrinking at ambient stays at ambient
        assert_abs_diff_eq!(reactor.temperature(), 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_waste_radioactivity_counts_partial_waste() {
        let mut reactor = reactor();
        reactor.partial_waste = 0.5;
        assert_abs_diff_eq!(reactor.waste_radioactivity(), 0.005);

        reactor
            .waste_tank
            .insert(SubstanceId::NuclearWaste, 100, Automation::Internal);
        assert_abs_diff_eq!(reactor.waste_radioactivity(), 100.5 * 0.01);
        // non-destructive
        assert_eq!(reactor.waste_tank().stored(), 100);
    }

    #[test]
    fn test_snapshot_restore_rejects_other_structure() {
        let snapshot = reactor().snapshot();
        let mut other = FissionReactor::form(structure(27, 1, 4), ReactorConfig::default());
        assert!(matches!(
            other.restore(&snapshot),
            Err(ReactorError::SnapshotMismatch(_))
        ));
    }

    #[test]
    fn test_restore_rejects_coolant_in_the_wrong_variant() {
        let mut reactor = reactor();
        let base = reactor.snapshot();
        for coolant in [
            CoolantContents::Fluid(TankStack::new(Sodium, 100)),
            CoolantContents::Chemical(TankStack::new(Water, 100)),
            CoolantContents::Chemical(TankStack::new(FissileFuel, 100)),
            CoolantContents::Chemical(TankStack::new(Steam, 100)),
        ] {
            let mut snapshot = base.clone();
            snapshot.coolant = coolant;
            assert!(
                matches!(reactor.restore(&snapshot), Err(ReactorError::SnapshotMismatch(_))),
                "{:?} restored",
                coolant
            );
        }
        assert!(reactor.coolant_tank().is_empty());

        let mut snapshot = base;
        snapshot.coolant = CoolantContents::Chemical(TankStack::new(Sodium, 100));
        reactor.restore(&snapshot).unwrap();
        assert_eq!(reactor.coolant_tank().substance(), Some(Sodium));
    }

    #[test]
    fn test_restore_never_leaves_force_disabled_reactor_active() {
        let mut snapshot = reactor().snapshot();
        snapshot.active = true;
        snapshot.force_disabled = true;
        let mut reactor = reactor();
        reactor.restore(&snapshot).unwrap();
        assert!(!reactor.is_active());
        assert_eq!(reactor.damage_state(), DamageState::ForceDisabled);
    }
}
