use crate::reactor::FissionReactor;
use crate::sim::TickContext;
use crate::sim::sim_op::{ReactorOp, ReactorOpHandle};

/// Passive heat exchange between the casing and the surroundings
pub struct EnvironmentLossOp;

impl EnvironmentLossOp {
    pub fn new() -> EnvironmentLossOp {
        EnvironmentLossOp
    }

    pub fn handle() -> ReactorOpHandle {
        ReactorOpHandle::new(Box::new(EnvironmentLossOp::new()))
    }
}

impl ReactorOp for EnvironmentLossOp {
    fn name(&self) -> &str {
        "EnvironmentLoss"
    }

    fn update(&mut self, reactor: &mut FissionReactor, ctx: &mut TickContext<'_>) {
        // coefficients are live config
        let inverse = reactor.config.inverse_environment_coefficient();
        reactor.heat.set_inverse_conduction(inverse);
        let loss = reactor.heat.simulate_environment_loss();
        reactor.last_environment_loss = loss;
        ctx.report.environment_loss = loss;
    }
}
