mod burn_op;
mod coolant_op;
mod damage_op;
mod environment_loss_op;
mod output_op;
mod radiation_op;
mod sync_op;

pub use burn_op::BurnOp;
pub use coolant_op::CoolantOp;
pub use damage_op::DamageOp;
pub use environment_loss_op::EnvironmentLossOp;
pub use output_op::{OutputOp, distribute};
pub use radiation_op::RadiationOp;
pub use sync_op::SyncOp;

use crate::reactor::FissionReactor;
use crate::sim::TickContext;

pub trait ReactorOp {
    /// The name of this operator (for identification and timing)
    fn name(&self) -> &str;

    /// Called when the reactor forms or reforms
    fn on_form(&mut self, _reactor: &FissionReactor) {
        // Default implementation does nothing
    }

    /// Called once per tick, in pipeline order
    fn update(&mut self, reactor: &mut FissionReactor, ctx: &mut TickContext<'_>);

    /// Called when the structure dissolves
    fn on_dissolve(&mut self, _reactor: &FissionReactor) {
        // Default implementation does nothing
    }
}

pub struct ReactorOpHandle {
    pub op: Box<dyn ReactorOp>,
}

impl ReactorOpHandle {
    /// Create a new ReactorOpHandle with the given operation
    pub fn new(op: Box<dyn ReactorOp>) -> Self {
        ReactorOpHandle { op }
    }
}

/// The fixed per-tick order: burn, boil, lose heat to the environment, accumulate
/// damage (possibly melting down), expose nearby entities, drain ports, sync.
pub fn standard_pipeline() -> Vec<ReactorOpHandle> {
    vec![
        BurnOp::handle(),
        CoolantOp::handle(),
        EnvironmentLossOp::handle(),
        DamageOp::handle(),
        RadiationOp::handle(),
        OutputOp::handle(),
        SyncOp::handle(),
    ]
}
