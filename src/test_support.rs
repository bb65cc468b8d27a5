//! In-memory host doubles. Used by the tests and the demo drill; also handy
//! for hosts wiring up the reactor for the first time.

use crate::host::{
    Bounds, CacheListener, EntityId, OutputEndpoint, OutputMode, OutputRouter, Position,
    RadiationSink,
};
use crate::snapshot::ReactorSnapshot;
use crate::substance::SubstanceId;

/// Records every dose and answers entity scans from a fixed population
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub entities: Vec<(EntityId, Position)>,
    pub location_doses: Vec<(Position, f64)>,
    pub entity_doses: Vec<(EntityId, f64)>,
}

impl RecordingSink {
    pub fn with_entities(entities: Vec<(EntityId, Position)>) -> Self {
        Self {
            entities,
            ..Self::default()
        }
    }

    pub fn total_location_dose(&self) -> f64 {
        self.location_doses.iter().map(|(_, dose)| dose).sum()
    }

    pub fn total_entity_dose(&self, entity: EntityId) -> f64 {
        self.entity_doses
            .iter()
            .filter(|(id, _)| *id == entity)
            .map(|(_, dose)| dose)
            .sum()
    }
}

impl RadiationSink for RecordingSink {
    fn radiate(&mut self, location: Position, dose: f64) {
        self.location_doses.push((location, dose));
    }

    fn radiate_entity(&mut self, entity: EntityId, dose: f64) {
        self.entity_doses.push((entity, dose));
    }

    fn entities_within(&self, zone: &Bounds) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, pos)| zone.contains(*pos))
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Keeps every snapshot pushed to it
#[derive(Debug, Clone, Default)]
pub struct RecordingCache {
    pub synced: Vec<ReactorSnapshot>,
}

impl RecordingCache {
    pub fn latest(&self) -> Option<&ReactorSnapshot> {
        self.synced.last()
    }
}

impl CacheListener for RecordingCache {
    fn sync(&mut self, snapshot: &ReactorSnapshot) {
        self.synced.push(snapshot.clone());
    }
}

/// Endpoint with a fixed amount of room
#[derive(Debug, Clone, Default)]
pub struct BoundedEndpoint {
    pub room: u64,
    pub received: u64,
    pub substance: Option<SubstanceId>,
}

impl BoundedEndpoint {
    pub fn new(room: u64) -> Self {
        Self {
            room,
            ..Self::default()
        }
    }
}

impl OutputEndpoint for BoundedEndpoint {
    fn accept(&mut self, substance: SubstanceId, amount: u64) -> u64 {
        if self.substance.is_some_and(|s| s != substance) {
            return 0;
        }
        let taken = amount.min(self.room);
        if taken > 0 {
            self.room -= taken;
            self.received += taken;
            self.substance = Some(substance);
        }
        taken
    }
}

/// One bank of endpoints per output mode
#[derive(Debug, Clone, Default)]
pub struct RecordingRouter {
    pub waste: Vec<BoundedEndpoint>,
    pub heated_coolant: Vec<BoundedEndpoint>,
}

impl RecordingRouter {
    /// A single endpoint per mode with the given room
    pub fn new(waste_room: u64, heated_coolant_room: u64) -> Self {
        Self {
            waste: vec![BoundedEndpoint::new(waste_room)],
            heated_coolant: vec![BoundedEndpoint::new(heated_coolant_room)],
        }
    }
}

impl OutputRouter for RecordingRouter {
    fn endpoints(&mut self, mode: OutputMode) -> Vec<&mut dyn OutputEndpoint> {
        let bank = match mode {
            OutputMode::Waste => &mut self.waste,
            OutputMode::HeatedCoolant => &mut self.heated_coolant,
        };
        bank.iter_mut()
            .map(|endpoint| endpoint as &mut dyn OutputEndpoint)
            .collect()
    }
}
