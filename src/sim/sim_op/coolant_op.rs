use crate::heat_node::HeatStore;
use crate::math_utils::clamp_to_amount;
use crate::reactor::FissionReactor;
use crate::sim::TickContext;
use crate::sim::sim_op::{ReactorOp, ReactorOpHandle};
use crate::substance::CoolantTraits;
use crate::tank::{Automation, CoolantContents};
use log::debug;

/// Moves heat out of the reactor into the coolant, producing heated coolant
pub struct CoolantOp;

impl CoolantOp {
    pub fn new() -> CoolantOp {
        CoolantOp
    }

    pub fn handle() -> ReactorOpHandle {
        ReactorOpHandle::new(Box::new(CoolantOp::new()))
    }

    /// Heat above the boil baseline the casing can hand to coolant this tick.
    /// Zero at or below the baseline.
    pub fn heat_available(reactor: &FissionReactor) -> f64 {
        let excess = (reactor.temperature() - reactor.config.base_boil_temperature_k).max(0.0);
        reactor.boil_efficiency() * excess * reactor.heat_capacity()
    }

    /// Units of coolant the current heat can boil this tick, before the tank bound.
    /// Fluids and chemicals share the baseline and differ only in their traits.
    pub fn boil_potential(reactor: &FissionReactor, traits: &CoolantTraits) -> f64 {
        Self::heat_available(reactor) * traits.conductivity / traits.thermal_enthalpy
    }
}

impl ReactorOp for CoolantOp {
    fn name(&self) -> &str {
        "Coolant"
    }

    fn update(&mut self, reactor: &mut FissionReactor, ctx: &mut TickContext<'_>) {
        let stack = match reactor.coolant_tank.contents() {
            CoolantContents::Empty => {
                reactor.last_boil_rate = 0;
                return;
            }
            CoolantContents::Fluid(stack) | CoolantContents::Chemical(stack) => stack,
        };

        let Some(traits) = reactor.registry.coolant(stack.substance).copied() else {
            reactor.last_boil_rate = 0;
            return;
        };
        let heated = traits.heated;

        let boiled = clamp_to_amount(Self::boil_potential(reactor, &traits), stack.amount);
        if boiled == 0 {
            reactor.last_boil_rate = 0;
            return;
        }

        reactor.coolant_tank.shrink(boiled);
        let stored = reactor
            .heated_coolant_tank
            .insert(heated, boiled, Automation::Internal);
        if stored < boiled {
            debug!(
                "Heated coolant tank full, discarding {} units of {}",
                boiled - stored,
                heated.as_str()
            );
        }
        reactor
            .heat
            .handle_heat(-(boiled as f64) * traits.thermal_enthalpy);

        reactor.last_boil_rate = boiled;
        ctx.report.boiled = boiled;
    }
}
