//! Redstone-style logic port: turns reactor status into a single on/off
//! signal, or lets a signal switch the reactor.

use crate::constants::MAX_DAMAGE;
use crate::error::CommandError;
use crate::reactor::FissionReactor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogicMode {
    #[default]
    Disabled,
    /// Input: the signal sets the active flag
    Activation,
    /// At or above the minimum damage temperature
    Temperature,
    /// Waste tank has no room left
    ExcessWaste,
    Damaged,
    /// Fuel tank is empty
    Depleted,
}

impl LogicMode {
    pub fn is_output(&self) -> bool {
        !matches!(self, LogicMode::Disabled | LogicMode::Activation)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicAdapter {
    pub mode: LogicMode,
    #[serde(skip)]
    last_signal: bool,
}

impl LogicAdapter {
    pub fn new(mode: LogicMode) -> Self {
        Self {
            mode,
            last_signal: false,
        }
    }

    /// Output signal for the current reactor state. Input modes never emit.
    pub fn check(&self, reactor: &FissionReactor) -> bool {
        match self.mode {
            LogicMode::Disabled | LogicMode::Activation => false,
            LogicMode::Temperature => {
                reactor.temperature() >= reactor.config().min_damage_temperature_k
            }
            LogicMode::ExcessWaste => reactor.waste_tank().needed() == 0,
            LogicMode::Damaged => reactor.damage() >= MAX_DAMAGE,
            LogicMode::Depleted => reactor.fuel_tank().is_empty(),
        }
    }

    /// Feed an incoming signal. In activation mode the reactor follows the signal
    /// on each edge; a rising edge while force disabled is refused.
    pub fn apply_signal(
        &mut self,
        reactor: &mut FissionReactor,
        powered: bool,
    ) -> Result<(), CommandError> {
        if self.mode != LogicMode::Activation || powered == self.last_signal {
            return Ok(());
        }
        self.last_signal = powered;
        if powered == reactor.is_active() {
            return Ok(());
        }
        reactor.set_active(powered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReactorConfig;
    use crate::heat_node::HeatStore;
    use crate::host::{Bounds, StructureInfo};
    use crate::substance::SubstanceId;
    use crate::tank::Automation;

    fn reactor() -> FissionReactor {
        FissionReactor::form(
            StructureInfo {
                volume: 27,
                fuel_assemblies: 1,
                surface_area: 4,
                bounds: Bounds::default(),
            },
            ReactorConfig::default(),
        )
    }

    #[test]
    fn test_output_modes() {
        let mut reactor = reactor();
        assert!(LogicAdapter::new(LogicMode::Depleted).check(&reactor));
        assert!(!LogicAdapter::new(LogicMode::Temperature).check(&reactor));
        assert!(!LogicAdapter::new(LogicMode::Disabled).check(&reactor));

        reactor.insert_fuel(1);
        reactor.heat.set_heat(1_200.0 * reactor.heat_capacity());
        reactor
            .waste_tank
            .insert(SubstanceId::NuclearWaste, 8_000, Automation::Internal);
        reactor.damage = 100.0;

        for mode in [LogicMode::Temperature, LogicMode::ExcessWaste, LogicMode::Damaged] {
            assert!(LogicAdapter::new(mode).check(&reactor), "{:?}", mode);
        }
        assert!(!LogicAdapter::new(LogicMode::Depleted).check(&reactor));
    }

    #[test]
    fn test_activation_follows_signal_edges() {
        let mut reactor = reactor();
        let mut adapter = LogicAdapter::new(LogicMode::Activation);

        adapter.apply_signal(&mut reactor, true).unwrap();
        assert!(reactor.is_active());
        // holding the signal does nothing after a manual scram
        reactor.scram().unwrap();
        adapter.apply_signal(&mut reactor, true).unwrap();
        assert!(!reactor.is_active());

        adapter.apply_signal(&mut reactor, false).unwrap();
        reactor.force_disabled = true;
        assert_eq!(
            adapter.apply_signal(&mut reactor, true),
            Err(CommandError::ForceDisabled)
        );
        assert!(!reactor.is_active());
    }

    #[test]
    fn test_output_modes_ignore_signals() {
        let mut reactor = reactor();
        let mut adapter = LogicAdapter::new(LogicMode::Damaged);
        adapter.apply_signal(&mut reactor, true).unwrap();
        assert!(!reactor.is_active());
        assert!(adapter.mode.is_output());
    }
}
