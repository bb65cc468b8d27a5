#![allow(dead_code)]

use fission_core::host::{Bounds, StructureInfo};
use fission_core::reactor::FissionReactor;
use fission_core::sim::TickContext;
use fission_core::sim::sim_op::ReactorOp;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A cube of `side` blocks with the given assembly layout
pub fn structure(side: u32, fuel_assemblies: u32, surface_area: u32) -> StructureInfo {
    let max = side as i32 - 1;
    StructureInfo {
        volume: side * side * side,
        fuel_assemblies,
        surface_area,
        bounds: Bounds::new([0, 0, 0], [max, max, max]),
    }
}

/// Pins the reactor temperature, standing in for a host that keeps the core at
/// a fixed operating point
pub struct HoldTemperatureOp {
    pub kelvin: f64,
}

impl ReactorOp for HoldTemperatureOp {
    fn name(&self) -> &str {
        "HoldTemperature"
    }

    fn update(&mut self, reactor: &mut FissionReactor, _ctx: &mut TickContext<'_>) {
        let target = self.kelvin * reactor.heat_capacity();
        reactor.handle_heat(target - reactor.heat());
    }
}
