use crate::constants::WASTE_EXPOSURE_SECONDS;
use crate::random::{RandomSource, RngSource};
use crate::reactor::FissionReactor;
use crate::sim::TickContext;
use crate::sim::sim_op::{ReactorOp, ReactorOpHandle};
use log::trace;
use rand::rngs::StdRng;

/// Exposes entities inside the structure while it burns, roughly once per
/// `radiation_sample_ticks` ticks
pub struct RadiationOp {
    rng: RngSource<StdRng>,
}

impl RadiationOp {
    pub fn new() -> RadiationOp {
        RadiationOp {
            rng: RngSource::from_os(),
        }
    }

    pub fn seeded(seed: u64) -> RadiationOp {
        RadiationOp {
            rng: RngSource::seeded(seed),
        }
    }

    pub fn handle() -> ReactorOpHandle {
        ReactorOpHandle::new(Box::new(RadiationOp::new()))
    }

    pub fn exposure_dose(reactor: &FissionReactor) -> f64 {
        reactor.last_burn_rate + reactor.waste_radioactivity() / WASTE_EXPOSURE_SECONDS
    }
}

impl ReactorOp for RadiationOp {
    fn name(&self) -> &str {
        "Radiation"
    }

    fn update(&mut self, reactor: &mut FissionReactor, ctx: &mut TickContext<'_>) {
        if !reactor.is_burning() || !reactor.config.radiation_enabled {
            return;
        }
        let Some(sink) = ctx.radiation.as_deref_mut() else {
            return;
        };
        let sample_ticks = reactor.config.radiation_sample_ticks.max(1) as f64;
        let draw = match ctx.sampler.as_deref_mut() {
            Some(sampler) => sampler.next_unit(),
            None => self.rng.next_unit(),
        };
        if draw >= 1.0 / sample_ticks {
            return;
        }

        let dose = Self::exposure_dose(reactor);
        let entities = sink.entities_within(&reactor.hot_zone());
        for entity in &entities {
            sink.radiate_entity(*entity, dose);
        }
        trace!("Exposed {} entities to {:.4}", entities.len(), dose);
        ctx.report.exposed_entities = entities;
    }
}
