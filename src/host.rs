//! Interfaces to the host the reactor is embedded in.
//!
//! The reactor only ever produces into these; it never asks the host to
//! change its own state.

use crate::snapshot::ReactorSnapshot;
use crate::substance::SubstanceId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned block bounds, both corners inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Bounds {
    pub min: [i32; 3],
    pub max: [i32; 3],
}

impl Bounds {
    pub fn new(min: [i32; 3], max: [i32; 3]) -> Self {
        Self { min, max }
    }

    /// Geometric centre of the bounded blocks
    pub fn center(&self) -> Position {
        let mid = |i: usize| (self.min[i] as f64 + self.max[i] as f64 + 1.0) / 2.0;
        Position::new(mid(0), mid(1), mid(2))
    }

    /// Bounds shrunk by one block on every side (the space inside the casing)
    pub fn interior(&self) -> Bounds {
        let mut inner = *self;
        for i in 0..3 {
            if self.max[i] - self.min[i] >= 2 {
                inner.min[i] += 1;
                inner.max[i] -= 1;
            }
        }
        inner
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..3).all(|i| {
            let v = [pos.x, pos.y, pos.z][i];
            v >= self.min[i] as f64 && v < self.max[i] as f64 + 1.0
        })
    }
}

/// What the structure provider reports when a reactor forms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureInfo {
    /// Number of cells in the structure
    pub volume: u32,
    pub fuel_assemblies: u32,
    pub surface_area: u32,
    pub bounds: Bounds,
}

pub type EntityId = u64;

/// Receiver for radiation the reactor releases
pub trait RadiationSink {
    /// Release a dose into the environment at a location
    fn radiate(&mut self, location: Position, dose: f64);

    /// Deliver a dose directly to an entity
    fn radiate_entity(&mut self, entity: EntityId, dose: f64);

    /// Entities currently inside `zone`
    fn entities_within(&self, zone: &Bounds) -> Vec<EntityId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputMode {
    Waste,
    HeatedCoolant,
}

/// Something attached to an output port
pub trait OutputEndpoint {
    /// Offer `amount` of a substance; returns how much was accepted
    fn accept(&mut self, substance: SubstanceId, amount: u64) -> u64;
}

/// Supplies the active endpoints for each output mode, fresh every tick
pub trait OutputRouter {
    fn endpoints(&mut self, mode: OutputMode) -> Vec<&mut dyn OutputEndpoint>;
}

/// Host-side cache of persisted reactor state (kept across dissolve/reform)
pub trait CacheListener {
    fn sync(&mut self, snapshot: &ReactorSnapshot);
}
