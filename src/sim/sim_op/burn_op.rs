use crate::heat_node::HeatStore;
use crate::math_utils::split_whole;
use crate::reactor::FissionReactor;
use crate::sim::TickContext;
use crate::sim::sim_op::{ReactorOp, ReactorOpHandle};
use crate::substance::SubstanceId;
use crate::tank::Automation;
use log::warn;

/// Consumes fuel, turns it into heat and waste
pub struct BurnOp;

impl BurnOp {
    pub fn new() -> BurnOp {
        BurnOp
    }

    pub fn handle() -> ReactorOpHandle {
        ReactorOpHandle::new(Box::new(BurnOp::new()))
    }

    pub fn burn_fuel(reactor: &mut FissionReactor, ctx: &mut TickContext<'_>) {
        let stored_fuel = reactor.fuel_tank.stored() as f64 + reactor.burn_remaining;
        let to_burn = reactor
            .rate_limit
            .min(stored_fuel)
            .min(reactor.max_burn_rate())
            .max(0.0);

        // fuel units are whole; the fraction rides along to the next tick
        let (whole_fuel, burn_remaining) = split_whole(stored_fuel - to_burn);
        reactor.fuel_tank.set_amount(whole_fuel);
        reactor.burn_remaining = burn_remaining;

        reactor
            .heat
            .handle_heat(to_burn * reactor.config.energy_per_fuel_unit);

        let (new_waste, partial_waste) = split_whole(reactor.partial_waste + to_burn);
        reactor.partial_waste = partial_waste;
        if new_waste > 0 {
            let stored =
                reactor
                    .waste_tank
                    .insert(SubstanceId::NuclearWaste, new_waste, Automation::Internal);
            let overflow = new_waste - stored;
            if overflow > 0 {
                Self::release_overflow(reactor, ctx, overflow);
            }
        }

        reactor.last_burn_rate = to_burn;
        ctx.report.burned = to_burn;
    }

    /// Waste that found no room is released at the structure centre
    fn release_overflow(reactor: &FissionReactor, ctx: &mut TickContext<'_>, overflow: u64) {
        ctx.report.waste_overflow = overflow;
        let radioactivity = reactor
            .registry
            .radioactivity(SubstanceId::NuclearWaste)
            .unwrap_or(0.0);
        warn!("Waste tank full, releasing {} units of waste", overflow);
        if !reactor.config.radiation_enabled || radioactivity <= 0.0 {
            return;
        }
        if let Some(sink) = ctx.radiation.as_deref_mut() {
            sink.radiate(reactor.center(), overflow as f64 * radioactivity);
        }
    }
}

impl ReactorOp for BurnOp {
    fn name(&self) -> &str {
        "Burn"
    }

    fn update(&mut self, reactor: &mut FissionReactor, ctx: &mut TickContext<'_>) {
        if !reactor.active {
            reactor.last_burn_rate = 0.0;
            return;
        }
        Self::burn_fuel(reactor, ctx);
    }
}
