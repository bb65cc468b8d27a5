use crate::reactor::FissionReactor;
use crate::sim::TickContext;
use crate::sim::sim_op::{ReactorOp, ReactorOpHandle};
use crate::snapshot::ReactorSnapshot;
use log::trace;

/// End-of-tick bookkeeping: compares persisted fields against the previous tick,
/// flags the report dirty and pushes changes to the cache listener
pub struct SyncOp {
    last: Option<ReactorSnapshot>,
}

impl SyncOp {
    pub fn new() -> SyncOp {
        SyncOp { last: None }
    }

    pub fn handle() -> ReactorOpHandle {
        ReactorOpHandle::new(Box::new(SyncOp::new()))
    }
}

impl ReactorOp for SyncOp {
    fn name(&self) -> &str {
        "Sync"
    }

    fn on_form(&mut self, reactor: &FissionReactor) {
        self.last = Some(reactor.snapshot());
    }

    fn update(&mut self, reactor: &mut FissionReactor, ctx: &mut TickContext<'_>) {
        let current = reactor.snapshot();
        let dirty = self.last.as_ref() != Some(&current);
        if dirty {
            trace!("Reactor state changed, syncing cache");
            if let Some(cache) = ctx.cache.as_deref_mut() {
                cache.sync(&current);
            }
            self.last = Some(current);
        }
        ctx.report.dirty = dirty;
    }

    fn on_dissolve(&mut self, _reactor: &FissionReactor) {
        self.last = None;
    }
}
