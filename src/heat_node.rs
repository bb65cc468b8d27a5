use crate::temp_utils::{heat_at_kelvin, kelvin_from_heat};
use serde::{Deserialize, Serialize};

/// Trait for objects that store heat energy and derive a temperature from it.
/// Temperature is always `heat / heat_capacity`.
pub trait HeatStore {
    /// Stored heat energy in Joules
    fn heat(&self) -> f64;

    /// Heat capacity in J/K
    fn heat_capacity(&self) -> f64;

    /// Baseline temperature the store relaxes toward
    fn ambient_temperature(&self) -> f64;

    /// Add (positive) or remove (negative) heat. No lower bound is enforced;
    /// callers clamp where their domain needs it.
    fn handle_heat(&mut self, delta: f64);

    /// Overwrite the stored heat
    fn set_heat(&mut self, heat: f64);

    /// Current temperature in Kelvin
    fn temperature(&self) -> f64 {
        kelvin_from_heat(self.heat(), self.heat_capacity(), self.ambient_temperature())
    }

    /// Heat this store holds when sitting exactly at ambient
    fn ambient_heat(&self) -> f64 {
        heat_at_kelvin(self.ambient_temperature(), self.heat_capacity())
    }
}

/// Single heat capacitor for a whole reactor structure
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HeatNode {
    heat: f64,
    heat_capacity: f64,
    ambient_temperature: f64,
    inverse_conduction: f64,
}

impl HeatNode {
    /// Create a node sitting at ambient temperature.
    ///
    /// `inverse_conduction` is the sum of the air, insulation and conduction
    /// inverse coefficients used for environment loss.
    pub fn new(heat_capacity: f64, ambient_temperature: f64, inverse_conduction: f64) -> Self {
        let heat_capacity = heat_capacity.max(0.0);
        Self {
            heat: heat_at_kelvin(ambient_temperature, heat_capacity),
            heat_capacity,
            ambient_temperature,
            inverse_conduction,
        }
    }

    /// Change the heat capacity.
    ///
    /// With `rescale` the capacity delta enters (or leaves) at ambient temperature:
    /// `heat += (new - old) × ambient`. The existing heat is not scaled to keep the
    /// temperature constant; a caller wanting that sets the heat explicitly.
    pub fn set_heat_capacity(&mut self, capacity: f64, rescale: bool) {
        let capacity = capacity.max(0.0);
        if rescale {
            self.heat += (capacity - self.heat_capacity) * self.ambient_temperature;
        }
        self.heat_capacity = capacity;
    }

    pub fn set_inverse_conduction(&mut self, inverse_conduction: f64) {
        self.inverse_conduction = inverse_conduction;
    }

    /// Move heat toward ambient through the casing and return the temperature
    /// delta lost this tick (never negative; gains from a cold reactor report 0).
    pub fn simulate_environment_loss(&mut self) -> f64 {
        if self.inverse_conduction <= 0.0 {
            return 0.0;
        }
        let loss = (self.temperature() - self.ambient_temperature) / self.inverse_conduction;
        self.handle_heat(-loss * self.heat_capacity);
        loss.max(0.0)
    }
}

impl HeatStore for HeatNode {
    fn heat(&self) -> f64 {
        self.heat
    }

    fn heat_capacity(&self) -> f64 {
        self.heat_capacity
    }

    fn ambient_temperature(&self) -> f64 {
        self.ambient_temperature
    }

    fn handle_heat(&mut self, delta: f64) {
        self.heat += delta;
    }

    fn set_heat(&mut self, heat: f64) {
        self.heat = heat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn node(capacity: f64) -> HeatNode {
        HeatNode::new(capacity, 300.0, 20_010.0)
    }

    #[test]
    fn test_starts_at_ambient() {
        let node = node(1_000.0);
        assert_abs_diff_eq!(node.temperature(), 300.0);
        assert_abs_diff_eq!(node.heat(), 300_000.0);
    }

    #[test]
    fn test_handle_heat_changes_temperature() {
        let mut node = node(1_000.0);
        node.handle_heat(1_000_000.0);
        assert_abs_diff_eq!(node.temperature(), 1_300.0);
        node.handle_heat(-2_000_000.0);
        // callers clamp, the node itself does not
        assert_abs_diff_eq!(node.temperature(), -700.0);
    }

    #[test]
    fn test_environment_loss_formula() {
        let mut node = node(1_000.0);
        node.set_heat(1_000.0 * 2_301.0);
        let loss = node.simulate_environment_loss();
        let expected = (2_301.0 - 300.0) / 20_010.0;
        assert_abs_diff_eq!(loss, expected, epsilon = 1e-12);
        assert_abs_diff_eq!(node.temperature(), 2_301.0 - expected, epsilon = 1e-9);
    }

    #[test]
    fn test_cold_node_reports_no_loss_but_warms() {
        let mut node = node(1_000.0);
        node.set_heat(1_000.0 * 100.0);
        assert_eq!(node.simulate_environment_loss(), 0.0);
        assert!(node.temperature() > 100.0);
    }

    #[test]
    fn test_set_capacity_rescale_adds_ambient_heat() {
        let mut node = node(1_000.0);
        node.handle_heat(500_000.0);
        node.set_heat_capacity(2_000.0, true);
        assert_abs_diff_eq!(node.heat(), 300_000.0 + 500_000.0 + 300_000.0);

        let before = node.heat();
        node.set_heat_capacity(4_000.0, false);
        assert_abs_diff_eq!(node.heat(), before);
    }

    #[test]
    fn test_zero_capacity_reads_ambient() {
        let node = node(0.0);
        assert_eq!(node.temperature(), 300.0);
    }
}
