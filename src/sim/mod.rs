pub mod meltdown;
pub mod sim_op;
pub mod simulation;

pub use meltdown::MeltdownReport;
pub use simulation::{OpTiming, ReactorSimulation};

use crate::host::{CacheListener, EntityId, OutputRouter, RadiationSink};
use crate::random::RandomSource;
use crate::reactor::DamageState;

/// What one tick did, for hosts that display or log reactor activity
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    pub tick: u64,
    pub burned: f64,
    pub boiled: u64,
    pub environment_loss: f64,
    pub damage_state: DamageState,
    pub meltdown: Option<MeltdownReport>,
    /// The safety lockout latched during this tick
    pub force_disabled: bool,
    pub exposed_entities: Vec<EntityId>,
    pub waste_overflow: u64,
    pub waste_output: u64,
    pub heated_coolant_output: u64,
    /// Persisted state changed and the cache listener was notified
    pub dirty: bool,
}

/// Everything a tick borrows from the host.
///
/// Only the random source is required; hosts without radiation, output ports or a
/// cache leave those unset and the matching behaviour is skipped.
///
/// `random` feeds the meltdown trial and nothing else. Radiation sampling draws
/// from `sampler` when one is set, otherwise from the op's own generator.
pub struct TickContext<'a> {
    pub random: &'a mut dyn RandomSource,
    pub sampler: Option<&'a mut dyn RandomSource>,
    pub radiation: Option<&'a mut dyn RadiationSink>,
    pub outputs: Option<&'a mut dyn OutputRouter>,
    pub cache: Option<&'a mut dyn CacheListener>,
    pub report: TickReport,
}

impl<'a> TickContext<'a> {
    pub fn new(random: &'a mut dyn RandomSource) -> Self {
        Self {
            random,
            sampler: None,
            radiation: None,
            outputs: None,
            cache: None,
            report: TickReport::default(),
        }
    }

    pub fn with_sampler(mut self, sampler: &'a mut dyn RandomSource) -> Self {
        self.sampler = Some(sampler);
        self
    }

    pub fn with_radiation(mut self, sink: &'a mut dyn RadiationSink) -> Self {
        self.radiation = Some(sink);
        self
    }

    pub fn with_outputs(mut self, router: &'a mut dyn OutputRouter) -> Self {
        self.outputs = Some(router);
        self
    }

    pub fn with_cache(mut self, cache: &'a mut dyn CacheListener) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Consume the context and hand back what the tick recorded
    pub fn finish(self) -> TickReport {
        self.report
    }
}
