use crate::host::{OutputEndpoint, OutputMode};
use crate::reactor::FissionReactor;
use crate::sim::TickContext;
use crate::sim::sim_op::{ReactorOp, ReactorOpHandle};
use crate::substance::SubstanceId;
use crate::tank::Automation;
use log::trace;

/// Split `amount` evenly across the endpoints, dropping each one once it takes
/// less than its share. Leftover units from the division go to the first
/// endpoints in order. Stops when nothing is left or every endpoint has
/// refused. Returns the total accepted.
pub fn distribute(
    substance: SubstanceId,
    amount: u64,
    mut endpoints: Vec<&mut dyn OutputEndpoint>,
) -> u64 {
    let mut remaining = amount;
    while remaining > 0 && !endpoints.is_empty() {
        let count = endpoints.len();
        let share = remaining / count as u64;
        let mut extra = remaining % count as u64;
        let mut moved = 0;

        endpoints.retain_mut(|endpoint| {
            let mut offer = share;
            if extra > 0 {
                offer += 1;
                extra -= 1;
            }
            if offer == 0 {
                return true;
            }
            let accepted = endpoint.accept(substance, offer).min(offer);
            moved += accepted;
            accepted == offer
        });

        // endpoints passed over with a zero offer get their turn once the
        // refusing ones are dropped
        if moved == 0 && endpoints.len() == count {
            break;
        }
        remaining -= moved;
    }
    amount - remaining
}

/// Pushes waste and heated coolant out through the host's output ports
pub struct OutputOp;

impl OutputOp {
    pub fn new() -> OutputOp {
        OutputOp
    }

    pub fn handle() -> ReactorOpHandle {
        ReactorOpHandle::new(Box::new(OutputOp::new()))
    }
}

impl ReactorOp for OutputOp {
    fn name(&self) -> &str {
        "Output"
    }

    fn update(&mut self, reactor: &mut FissionReactor, ctx: &mut TickContext<'_>) {
        let Some(router) = ctx.outputs.as_deref_mut() else {
            return;
        };

        for mode in [OutputMode::Waste, OutputMode::HeatedCoolant] {
            let tank = match mode {
                OutputMode::Waste => &mut reactor.waste_tank,
                OutputMode::HeatedCoolant => &mut reactor.heated_coolant_tank,
            };
            let Some(stack) = tank.stack() else {
                continue;
            };
            let sent = distribute(stack.substance, stack.amount, router.endpoints(mode));
            if sent == 0 {
                continue;
            }
            tank.extract(sent, Automation::Internal);
            trace!("Output {} units of {}", sent, stack.substance.as_str());
            match mode {
                OutputMode::Waste => ctx.report.waste_output = sent,
                OutputMode::HeatedCoolant => ctx.report.heated_coolant_output = sent,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputOp, distribute};
    use crate::config::ReactorConfig;
    use crate::host::{Bounds, OutputEndpoint, StructureInfo};
    use crate::random::ScriptedRolls;
    use crate::reactor::FissionReactor;
    use crate::sim::TickContext;
    use crate::sim::sim_op::ReactorOp;
    use crate::substance::SubstanceId;
    use crate::tank::Automation;
    use crate::test_support::{BoundedEndpoint, RecordingRouter};

    #[test]
    fn even_split_with_remainder_first() {
        let mut a = BoundedEndpoint::new(u64::MAX);
        let mut b = BoundedEndpoint::new(u64::MAX);
        let mut c = BoundedEndpoint::new(u64::MAX);
        let endpoints: Vec<&mut dyn OutputEndpoint> = vec![&mut a, &mut b, &mut c];

        assert_eq!(distribute(SubstanceId::Steam, 100, endpoints), 100);
        assert_eq!((a.received, b.received, c.received), (34, 33, 33));
    }

    #[test]
    fn saturated_endpoints_pass_their_share_on() {
        let mut small = BoundedEndpoint::new(10);
        let mut big = BoundedEndpoint::new(1_000);
        let endpoints: Vec<&mut dyn OutputEndpoint> = vec![&mut small, &mut big];

        assert_eq!(distribute(SubstanceId::Steam, 100, endpoints), 100);
        assert_eq!(small.received, 10);
        assert_eq!(big.received, 90);
    }

    #[test]
    fn single_unit_reaches_an_open_endpoint_behind_a_full_one() {
        let mut full = BoundedEndpoint::new(0);
        let mut open = BoundedEndpoint::new(1_000);
        let endpoints: Vec<&mut dyn OutputEndpoint> = vec![&mut full, &mut open];

        assert_eq!(distribute(SubstanceId::NuclearWaste, 1, endpoints), 1);
        assert_eq!(full.received, 0);
        assert_eq!(open.received, 1);
    }

    #[test]
    fn fewer_units_than_endpoints_go_one_each_in_order() {
        let mut a = BoundedEndpoint::new(u64::MAX);
        let mut b = BoundedEndpoint::new(u64::MAX);
        let mut c = BoundedEndpoint::new(u64::MAX);
        let endpoints: Vec<&mut dyn OutputEndpoint> = vec![&mut a, &mut b, &mut c];

        assert_eq!(distribute(SubstanceId::Steam, 2, endpoints), 2);
        assert_eq!((a.received, b.received, c.received), (1, 1, 0));
    }

    #[test]
    fn leftovers_skip_every_full_endpoint() {
        let mut a = BoundedEndpoint::new(0);
        let mut b = BoundedEndpoint::new(0);
        let mut c = BoundedEndpoint::new(5);
        let endpoints: Vec<&mut dyn OutputEndpoint> = vec![&mut a, &mut b, &mut c];

        assert_eq!(distribute(SubstanceId::Steam, 2, endpoints), 2);
        assert_eq!(c.received, 2);
    }

    #[test]
    fn stops_when_nothing_accepts() {
        let mut full = BoundedEndpoint::new(0);
        let endpoints: Vec<&mut dyn OutputEndpoint> = vec![&mut full];
        assert_eq!(distribute(SubstanceId::NuclearWaste, 50, endpoints), 0);
    }

    #[test]
    fn op_drains_tanks_into_router() {
        let mut reactor = FissionReactor::form(
            StructureInfo {
                volume: 27,
                fuel_assemblies: 1,
                surface_area: 4,
                bounds: Bounds::default(),
            },
            ReactorConfig::default(),
        );
        reactor
            .waste_tank
            .insert(SubstanceId::NuclearWaste, 40, Automation::Internal);
        reactor
            .heated_coolant_tank
            .insert(SubstanceId::Steam, 500, Automation::Internal);

        let mut router = RecordingRouter::new(25, 1_000);
        let mut rolls = ScriptedRolls::always(0.5);
        let mut ctx = TickContext::new(&mut rolls).with_outputs(&mut router);
        OutputOp::new().update(&mut reactor, &mut ctx);
        let report = ctx.finish();

        assert_eq!(report.waste_output, 25);
        assert_eq!(report.heated_coolant_output, 500);
        assert_eq!(reactor.waste_tank().stored(), 15);
        assert!(reactor.heated_coolant_tank().is_empty());
    }
}
