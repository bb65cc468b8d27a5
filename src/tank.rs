//! Integral resource containers for the reactor.
//!
//! All transfers return the amount actually moved; nothing is ever silently
//! dropped inside a tank. Direction decides what outside automation may do:
//! input tanks only take from outside, output tanks only give. The reactor
//! itself (`Automation::Internal`) may do both.

use crate::math_utils::fraction_of;
use crate::substance::{SubstanceId, SubstancePhase, SubstanceRegistry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankDirection {
    Input,
    Output,
}

/// Who is asking for a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Automation {
    External,
    Internal,
}

impl TankDirection {
    fn allows_insert(self, automation: Automation) -> bool {
        automation == Automation::Internal || self == TankDirection::Input
    }

    fn allows_extract(self, automation: Automation) -> bool {
        automation == Automation::Internal || self == TankDirection::Output
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankStack {
    pub substance: SubstanceId,
    pub amount: u64,
}

impl TankStack {
    pub fn new(substance: SubstanceId, amount: u64) -> Self {
        Self { substance, amount }
    }
}

/// Single-substance tank
#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    stack: Option<TankStack>,
    capacity: u64,
    direction: TankDirection,
    accepts: Vec<SubstanceId>,
}

impl Tank {
    pub fn new(capacity: u64, direction: TankDirection, accepts: Vec<SubstanceId>) -> Self {
        Self {
            stack: None,
            capacity,
            direction,
            accepts,
        }
    }

    pub fn stored(&self) -> u64 {
        self.stack.map_or(0, |s| s.amount)
    }

    pub fn substance(&self) -> Option<SubstanceId> {
        self.stack.map(|s| s.substance)
    }

    pub fn stack(&self) -> Option<TankStack> {
        self.stack
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn needed(&self) -> u64 {
        self.capacity.saturating_sub(self.stored())
    }

    pub fn filled_percentage(&self) -> f64 {
        fraction_of(self.stored(), self.capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_none()
    }

    pub fn direction(&self) -> TankDirection {
        self.direction
    }

    pub fn accepts(&self, substance: SubstanceId) -> bool {
        self.accepts.contains(&substance)
    }

    /// Insert up to `amount`; returns the amount taken
    pub fn insert(&mut self, substance: SubstanceId, amount: u64, automation: Automation) -> u64 {
        if amount == 0 || !self.direction.allows_insert(automation) || !self.accepts(substance) {
            return 0;
        }
        if self.substance().is_some_and(|s| s != substance) {
            return 0;
        }
        let taken = amount.min(self.needed());
        if taken > 0 {
            self.stack = Some(TankStack::new(substance, self.stored() + taken));
        }
        taken
    }

    /// Extract up to `amount`; returns the amount removed
    pub fn extract(&mut self, amount: u64, automation: Automation) -> u64 {
        if !self.direction.allows_extract(automation) {
            return 0;
        }
        let Some(stack) = self.stack else {
            return 0;
        };
        let removed = amount.min(stack.amount);
        self.set_stack(stack.substance, stack.amount - removed);
        removed
    }

    /// Overwrite the contents. Amounts past capacity are cut; the return value is
    /// how much was cut.
    pub fn set_stack(&mut self, substance: SubstanceId, amount: u64) -> u64 {
        let kept = amount.min(self.capacity);
        self.stack = (kept > 0).then(|| TankStack::new(substance, kept));
        amount - kept
    }

    /// Set the stored amount, keeping the current substance. No-op on an empty tank.
    pub fn set_amount(&mut self, amount: u64) -> u64 {
        match self.stack {
            Some(stack) => self.set_stack(stack.substance, amount),
            None => 0,
        }
    }

    /// Empty the tank, returning what it held
    pub fn take_all(&mut self) -> Option<TankStack> {
        self.stack.take()
    }

    pub fn set_empty(&mut self) {
        self.stack = None;
    }

    /// Change capacity, truncating contents that no longer fit. Returns the amount lost.
    pub fn set_capacity(&mut self, capacity: u64) -> u64 {
        self.capacity = capacity;
        let stored = self.stored();
        if stored > capacity {
            self.set_amount(stored);
            stored - capacity
        } else {
            0
        }
    }
}

/// Contents of the coolant tank. Exactly one variant is active; a non-empty tank
/// keeps its variant and substance until drained back to `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CoolantContents {
    #[default]
    Empty,
    Fluid(TankStack),
    Chemical(TankStack),
}

impl CoolantContents {
    pub fn stack(&self) -> Option<TankStack> {
        match self {
            CoolantContents::Empty => None,
            CoolantContents::Fluid(stack) | CoolantContents::Chemical(stack) => Some(*stack),
        }
    }

    /// Whether the registry would have put this substance in this variant.
    /// `Empty` always fits.
    pub fn fits(&self, registry: &SubstanceRegistry) -> bool {
        let Some(stack) = self.stack() else {
            return true;
        };
        if registry.coolant(stack.substance).is_none() {
            return false;
        }
        matches!(
            (self, registry.phase(stack.substance)),
            (CoolantContents::Fluid(_), Some(SubstancePhase::Fluid))
                | (CoolantContents::Chemical(_), Some(SubstancePhase::Chemical))
        )
    }

    fn with_amount(self, amount: u64) -> Self {
        match self {
            _ if amount == 0 => CoolantContents::Empty,
            CoolantContents::Empty => CoolantContents::Empty,
            CoolantContents::Fluid(s) => CoolantContents::Fluid(TankStack::new(s.substance, amount)),
            CoolantContents::Chemical(s) => {
                CoolantContents::Chemical(TankStack::new(s.substance, amount))
            }
        }
    }
}

/// Input tank holding either a fluid or a chemical coolant
#[derive(Debug, Clone, PartialEq)]
pub struct CoolantTank {
    contents: CoolantContents,
    capacity: u64,
}

impl CoolantTank {
    pub fn new(capacity: u64) -> Self {
        Self {
            contents: CoolantContents::Empty,
            capacity,
        }
    }

    pub fn contents(&self) -> CoolantContents {
        self.contents
    }

    pub fn stored(&self) -> u64 {
        self.contents.stack().map_or(0, |s| s.amount)
    }

    pub fn substance(&self) -> Option<SubstanceId> {
        self.contents.stack().map(|s| s.substance)
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn needed(&self) -> u64 {
        self.capacity.saturating_sub(self.stored())
    }

    pub fn filled_percentage(&self) -> f64 {
        fraction_of(self.stored(), self.capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.contents == CoolantContents::Empty
    }

    pub fn is_chemical(&self) -> bool {
        matches!(self.contents, CoolantContents::Chemical(_))
    }

    /// Insert a coolant. The registry decides whether the substance cools and which
    /// variant it lands in. Returns the amount taken.
    pub fn insert(
        &mut self,
        substance: SubstanceId,
        amount: u64,
        registry: &SubstanceRegistry,
    ) -> u64 {
        if amount == 0 || registry.coolant(substance).is_none() {
            return 0;
        }
        if self.substance().is_some_and(|s| s != substance) {
            return 0;
        }
        let taken = amount.min(self.needed());
        if taken == 0 {
            return 0;
        }
        let stack = TankStack::new(substance, self.stored() + taken);
        self.contents = match registry.phase(substance) {
            Some(SubstancePhase::Fluid) => CoolantContents::Fluid(stack),
            Some(SubstancePhase::Chemical) => CoolantContents::Chemical(stack),
            None => return 0,
        };
        taken
    }

    /// Remove up to `amount` (reactor-internal); returns the amount removed
    pub fn shrink(&mut self, amount: u64) -> u64 {
        let stored = self.stored();
        let removed = amount.min(stored);
        self.contents = self.contents.with_amount(stored - removed);
        removed
    }

    pub fn take_all(&mut self) -> CoolantContents {
        std::mem::take(&mut self.contents)
    }

    /// Restore persisted contents; amounts past capacity are cut and the cut returned
    pub fn set_contents(&mut self, contents: CoolantContents) -> u64 {
        let amount = contents.stack().map_or(0, |s| s.amount);
        let kept = amount.min(self.capacity);
        self.contents = contents.with_amount(kept);
        amount - kept
    }

    pub fn set_capacity(&mut self, capacity: u64) -> u64 {
        self.capacity = capacity;
        let stored = self.stored();
        if stored > capacity {
            self.contents = self.contents.with_amount(capacity);
            stored - capacity
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fuel_tank() -> Tank {
        Tank::new(100, TankDirection::Input, vec![SubstanceId::FissileFuel])
    }

    fn waste_tank() -> Tank {
        Tank::new(100, TankDirection::Output, vec![SubstanceId::NuclearWaste])
    }

    #[test]
    fn test_insert_reports_partial_fill() {
        let mut tank = fuel_tank();
        assert_eq!(tank.insert(SubstanceId::FissileFuel, 70, Automation::External), 70);
        assert_eq!(tank.insert(SubstanceId::FissileFuel, 70, Automation::External), 30);
        assert_eq!(tank.stored(), 100);
        assert_eq!(tank.needed(), 0);
        assert_eq!(tank.filled_percentage(), 1.0);
    }

    #[test]
    fn test_direction_is_enforced_for_external_callers() {
        let mut fuel = fuel_tank();
        fuel.insert(SubstanceId::FissileFuel, 50, Automation::External);
        assert_eq!(fuel.extract(10, Automation::External), 0);
        assert_eq!(fuel.extract(10, Automation::Internal), 10);

        let mut waste = waste_tank();
        assert_eq!(waste.insert(SubstanceId::NuclearWaste, 10, Automation::External), 0);
        assert_eq!(waste.insert(SubstanceId::NuclearWaste, 10, Automation::Internal), 10);
        assert_eq!(waste.extract(4, Automation::External), 4);
        assert_eq!(waste.stored(), 6);
    }

    #[test]
    fn test_filter_rejects_wrong_substance() {
        let mut tank = fuel_tank();
        assert_eq!(tank.insert(SubstanceId::Water, 10, Automation::External), 0);
        assert!(tank.is_empty());
    }

    #[test]
    fn test_extract_to_zero_empties() {
        let mut tank = fuel_tank();
        tank.insert(SubstanceId::FissileFuel, 5, Automation::Internal);
        assert_eq!(tank.extract(50, Automation::Internal), 5);
        assert!(tank.is_empty());
        assert_eq!(tank.substance(), None);
    }

    #[test]
    fn test_capacity_shrink_truncates() {
        let mut tank = fuel_tank();
        tank.insert(SubstanceId::FissileFuel, 80, Automation::Internal);
        assert_eq!(tank.set_capacity(50), 30);
        assert_eq!(tank.stored(), 50);
        assert_eq!(tank.set_capacity(0), 50);
        assert!(tank.is_empty());
    }

    #[test]
    fn test_coolant_variant_follows_substance_phase() {
        let registry = SubstanceRegistry::default();
        let mut tank = CoolantTank::new(1_000);
        assert_eq!(tank.insert(SubstanceId::Water, 400, &registry), 400);
        assert!(matches!(tank.contents(), CoolantContents::Fluid(_)));

        let mut tank = CoolantTank::new(1_000);
        assert_eq!(tank.insert(SubstanceId::Sodium, 400, &registry), 400);
        assert!(tank.is_chemical());
    }

    #[test]
    fn test_coolant_variant_is_exclusive_until_drained() {
        let registry = SubstanceRegistry::default();
        let mut tank = CoolantTank::new(1_000);
        tank.insert(SubstanceId::Water, 10, &registry);
        assert_eq!(tank.insert(SubstanceId::Sodium, 10, &registry), 0);

        assert_eq!(tank.shrink(25), 10);
        assert!(tank.is_empty());
        assert_eq!(tank.insert(SubstanceId::Sodium, 10, &registry), 10);
        assert!(tank.is_chemical());
    }

    #[test]
    fn test_coolant_rejects_non_coolants() {
        let registry = SubstanceRegistry::default();
        let mut tank = CoolantTank::new(1_000);
        assert_eq!(tank.insert(SubstanceId::Steam, 10, &registry), 0);
        assert_eq!(tank.insert(SubstanceId::FissileFuel, 10, &registry), 0);
        assert!(tank.is_empty());
    }
}
