//! Catastrophic failure: the reactor dumps its radioactive inventory as a
//! single dose at the structure centre and resets to a damaged baseline.

use crate::heat_node::HeatStore;
use crate::host::Position;
use crate::reactor::FissionReactor;
use crate::sim::TickContext;
use crate::substance::SubstanceId;
use crate::tank::TankStack;
use log::{error, info};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeltdownReport {
    pub center: Position,
    /// Dose emitted at the centre (0 when radiation is disabled)
    pub dose: f64,
    /// Heat above ambient discarded by the reset
    pub released_heat: f64,
}

/// Empty every tank that can hold radioactive inventory and sum what it held.
///
/// Tanks are emptied whether or not their contents are radioactive; only
/// radioactive substances count toward the total.
fn dump_inventory(reactor: &mut FissionReactor) -> f64 {
    let mut dumped: Vec<TankStack> = Vec::with_capacity(4);
    dumped.extend(reactor.fuel_tank.take_all());
    dumped.extend(reactor.waste_tank.take_all());
    if reactor.coolant_tank.is_chemical() {
        dumped.extend(reactor.coolant_tank.take_all().stack());
    }
    dumped.extend(reactor.heated_coolant_tank.take_all());

    let mut radioactivity: f64 = dumped
        .iter()
        .filter_map(|stack| {
            reactor
                .registry
                .radioactivity(stack.substance)
                .map(|r| stack.amount as f64 * r)
        })
        .sum();
    radioactivity += reactor.partial_waste
        * reactor
            .registry
            .radioactivity(SubstanceId::NuclearWaste)
            .unwrap_or(0.0);
    radioactivity
}

/// Run the meltdown transition. Never fails; a missing radiation sink only skips
/// the dose.
pub fn trigger_meltdown(reactor: &mut FissionReactor, ctx: &mut TickContext<'_>) -> MeltdownReport {
    let center = reactor.center();
    let released_heat = (reactor.heat() - reactor.heat.ambient_heat()).max(0.0);
    let radioactivity = dump_inventory(reactor);
    let dose = if reactor.config.radiation_enabled {
        radioactivity * reactor.config.meltdown_radiation_multiplier
    } else {
        0.0
    };

    error!(
        "Fission reactor meltdown at ({:.1}, {:.1}, {:.1}): dose {:.3}",
        center.x, center.y, center.z, dose
    );
    if dose > 0.0 {
        match ctx.radiation.as_deref_mut() {
            Some(sink) => sink.radiate(center, dose),
            None => info!("No radiation sink attached, meltdown dose not delivered"),
        }
    }

    reactor.active = false;
    reactor.damage = reactor.config.post_meltdown_damage;
    reactor.burn_remaining = 0.0;
    reactor.partial_waste = 0.0;
    let ambient_heat = reactor.heat.ambient_heat();
    reactor.heat.set_heat(ambient_heat);

    if let Some(cache) = ctx.cache.as_deref_mut() {
        cache.sync(&reactor.snapshot());
    }

    MeltdownReport {
        center,
        dose,
        released_heat,
    }
}

#[cfg(test)]
mod tests {
    use super::trigger_meltdown;
    use crate::config::ReactorConfig;
    use crate::heat_node::HeatStore;
    use crate::host::{Bounds, StructureInfo};
    use crate::random::ScriptedRolls;
    use crate::reactor::FissionReactor;
    use crate::sim::TickContext;
    use crate::substance::SubstanceId;
    use crate::tank::Automation;
    use crate::test_support::{RecordingCache, RecordingSink};
    use approx::assert_abs_diff_eq;

    fn loaded_reactor(coolant: SubstanceId) -> FissionReactor {
        let mut reactor = FissionReactor::form(
            StructureInfo {
                volume: 27,
                fuel_assemblies: 1,
                surface_area: 4,
                bounds: Bounds::new([0, 0, 0], [2, 2, 2]),
            },
            ReactorConfig::default(),
        );
        reactor.insert_fuel(1_000);
        reactor
            .waste_tank
            .insert(SubstanceId::NuclearWaste, 200, Automation::Internal);
        reactor.partial_waste = 0.5;
        reactor.insert_coolant(coolant, 500);
        reactor.set_active(true).unwrap();
        reactor.heat.handle_heat(50_000_000.0);
        reactor.damage = 100.0;
        reactor
    }

    #[test]
    fn chemical_coolant_is_dumped_and_dose_is_summed() {
        let mut reactor = loaded_reactor(SubstanceId::Sodium);
        let mut sink = RecordingSink::default();
        let mut cache = RecordingCache::default();
        let mut rolls = ScriptedRolls::always(0.0);
        let mut ctx = TickContext::new(&mut rolls)
            .with_radiation(&mut sink)
            .with_cache(&mut cache);

        let report = trigger_meltdown(&mut reactor, &mut ctx);

        // (1000 × 0.025 + 200.5 × 0.01) × 50
        assert_abs_diff_eq!(report.dose, (25.0 + 2.005) * 50.0, epsilon = 1e-9);
        assert_eq!(sink.location_doses.len(), 1);
        assert!(reactor.fuel_tank().is_empty());
        assert!(reactor.waste_tank().is_empty());
        assert!(reactor.coolant_tank().is_empty());
        assert!(reactor.heated_coolant_tank().is_empty());
        assert!(!reactor.is_active());
        assert_abs_diff_eq!(reactor.damage(), 75.0);
        assert_eq!(reactor.partial_waste(), 0.0);
        assert_abs_diff_eq!(reactor.heat(), reactor.heat_node().ambient_heat());
        assert_eq!(cache.synced.len(), 1);
        assert_eq!(cache.synced[0].damage, 75.0);
    }

    #[test]
    fn fluid_coolant_survives() {
        let mut reactor = loaded_reactor(SubstanceId::Water);
        let mut rolls = ScriptedRolls::always(0.0);
        let mut ctx = TickContext::new(&mut rolls);
        trigger_meltdown(&mut reactor, &mut ctx);
        assert_eq!(reactor.coolant_tank().stored(), 500);
    }

    #[test]
    fn disabled_radiation_emits_nothing() {
        let mut reactor = loaded_reactor(SubstanceId::Water);
        reactor.config_mut().radiation_enabled = false;
        let mut sink = RecordingSink::default();
        let mut rolls = ScriptedRolls::always(0.0);
        let mut ctx = TickContext::new(&mut rolls).with_radiation(&mut sink);
        let report = trigger_meltdown(&mut reactor, &mut ctx);
        assert_eq!(report.dose, 0.0);
        assert!(sink.location_doses.is_empty());
        assert!(reactor.fuel_tank().is_empty());
    }
}
