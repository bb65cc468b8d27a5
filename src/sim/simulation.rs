use crate::config::ReactorConfig;
use crate::error::{ReactorError, ReactorResult};
use crate::host::StructureInfo;
use crate::reactor::FissionReactor;
use crate::sim::sim_op::{ReactorOp, ReactorOpHandle, standard_pipeline};
use crate::sim::{TickContext, TickReport};
use crate::snapshot::ReactorSnapshot;
use log::{debug, info, trace};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct OpTiming {
    pub op_name: String,
    pub total_update_time: Duration,
    pub update_call_count: u32,
}

impl OpTiming {
    pub fn new(op_name: String) -> Self {
        Self {
            op_name,
            total_update_time: Duration::ZERO,
            update_call_count: 0,
        }
    }

    pub fn avg_update_time(&self) -> Duration {
        if self.update_call_count > 0 {
            self.total_update_time / self.update_call_count
        } else {
            Duration::ZERO
        }
    }
}

/// Owns the single authoritative reactor and drives it one tick at a time.
///
/// The reactor exists only between `form` and `dissolve`; ticking an unformed
/// simulation does nothing.
pub struct ReactorSimulation {
    reactor: Option<FissionReactor>,
    ops: Vec<Box<dyn ReactorOp>>,
    pub op_timings: Vec<OpTiming>,
    tick: u64,
}

impl Default for ReactorSimulation {
    fn default() -> Self {
        Self::new()
    }
}

impl ReactorSimulation {
    /// Simulation with the standard burn → boil → loss → damage → radiation →
    /// output → sync pipeline
    pub fn new() -> Self {
        Self::with_ops(standard_pipeline())
    }

    pub fn with_ops(handles: Vec<ReactorOpHandle>) -> Self {
        let ops: Vec<Box<dyn ReactorOp>> = handles.into_iter().map(|handle| handle.op).collect();
        let op_timings = ops
            .iter()
            .map(|op| OpTiming::new(op.name().to_string()))
            .collect();
        Self {
            reactor: None,
            ops,
            op_timings,
            tick: 0,
        }
    }

    pub fn form(&mut self, structure: StructureInfo, config: ReactorConfig) -> &mut FissionReactor {
        self.form_reactor(FissionReactor::form(structure, config))
    }

    /// Install an already built reactor (for example one restored from a snapshot)
    pub fn form_reactor(&mut self, reactor: FissionReactor) -> &mut FissionReactor {
        for op in &mut self.ops {
            op.on_form(&reactor);
        }
        self.reactor.insert(reactor)
    }

    /// Apply a new structure reading; returns false when nothing is formed
    pub fn reform(&mut self, structure: StructureInfo) -> bool {
        let Some(reactor) = self.reactor.as_mut() else {
            return false;
        };
        reactor.reform(structure);
        for op in &mut self.ops {
            op.on_form(reactor);
        }
        true
    }

    /// Load host-cached state into the formed reactor
    pub fn restore(&mut self, snapshot: &ReactorSnapshot) -> ReactorResult<()> {
        let reactor = self.reactor.as_mut().ok_or(ReactorError::NotFormed)?;
        reactor.restore(snapshot)?;
        for op in &mut self.ops {
            op.on_form(reactor);
        }
        Ok(())
    }

    /// Discard the reactor, handing back its final persisted state
    pub fn dissolve(&mut self) -> Option<ReactorSnapshot> {
        let reactor = self.reactor.take()?;
        for op in &mut self.ops {
            op.on_dissolve(&reactor);
        }
        info!("Fission reactor dissolved");
        Some(reactor.snapshot())
    }

    pub fn is_formed(&self) -> bool {
        self.reactor.is_some()
    }

    pub fn reactor(&self) -> Option<&FissionReactor> {
        self.reactor.as_ref()
    }

    pub fn reactor_mut(&mut self) -> Option<&mut FissionReactor> {
        self.reactor.as_mut()
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Run every op once, in order, against the formed reactor
    pub fn tick(&mut self, mut ctx: TickContext<'_>) -> TickReport {
        let Some(reactor) = self.reactor.as_mut() else {
            debug!("Tick skipped, no reactor formed");
            return ctx.finish();
        };
        self.tick += 1;
        ctx.report.tick = self.tick;

        for (i, op) in self.ops.iter_mut().enumerate() {
            let start = Instant::now();
            op.update(reactor, &mut ctx);
            let elapsed = start.elapsed();
            trace!("{} took {:?}", op.name(), elapsed);
            self.op_timings[i].total_update_time += elapsed;
            self.op_timings[i].update_call_count += 1;
        }
        debug!(
            "tick {}: {:.1}K damage {:.2} burned {:.3} boiled {}",
            self.tick,
            reactor.temperature(),
            reactor.damage(),
            ctx.report.burned,
            ctx.report.boiled
        );
        ctx.finish()
    }

    pub fn log_timing_report(&self) {
        let total: Duration = self.op_timings.iter().map(|t| t.total_update_time).sum();
        info!("=== REACTOR TIMING REPORT === ticks: {}", self.tick);
        for timing in &self.op_timings {
            let share = if total.as_nanos() > 0 {
                timing.total_update_time.as_nanos() as f64 / total.as_nanos() as f64 * 100.0
            } else {
                0.0
            };
            info!(
                "  {:<16} | Total: {:>10.3}ms | Avg/tick: {:>8.3}µs | Share: {:>5.1}%",
                timing.op_name,
                timing.total_update_time.as_secs_f64() * 1_000.0,
                timing.avg_update_time().as_secs_f64() * 1_000_000.0,
                share
            );
        }
        info!("  Total: {:.3}ms", total.as_secs_f64() * 1_000.0);
    }
}
