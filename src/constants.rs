// Reactor-wide constants. Tunables that a host may change live in `config::ReactorConfig`;
// everything here is fixed by the damage/heat model itself.

pub const MAX_DAMAGE: f64 = 100.0;

// Temperature thresholds (K) for structural damage
pub const MIN_DAMAGE_TEMPERATURE_K: f64 = 1_200.0;
pub const MAX_DAMAGE_TEMPERATURE_K: f64 = 1_800.0;

// Heat model
pub const AMBIENT_TEMPERATURE_K: f64 = 300.0;
pub const TO_KELVIN: f64 = 273.15;
pub const BASE_BOIL_TEMPERATURE_K: f64 = 100.0 + TO_KELVIN;
pub const AIR_INVERSE_COEFFICIENT: f64 = 10_000.0;
pub const INVERSE_INSULATION_COEFFICIENT: f64 = 10_000.0;
pub const INVERSE_CONDUCTION_COEFFICIENT: f64 = 10.0;
pub const CASING_HEAT_CAPACITY: f64 = 1_000.0;

// Per-structure capacities
pub const FUEL_PER_ASSEMBLY: u64 = 8_000;
pub const COOLANT_PER_VOLUME: u64 = 100_000;
pub const HEATED_COOLANT_PER_VOLUME: u64 = 1_000_000;
pub const BURN_PER_ASSEMBLY: f64 = 1.0;
pub const ENERGY_PER_FUEL_UNIT: f64 = 1_000_000.0;
pub const SURFACE_AREA_TARGET: f64 = 4.0;
pub const DEFAULT_BURN_RATE: f64 = 0.1;

// Meltdown
pub const MELTDOWN_CHANCE: f64 = 0.001;
pub const MELTDOWN_RADIATION_MULTIPLIER: f64 = 50.0;
pub const POST_MELTDOWN_DAMAGE: f64 = 0.75 * MAX_DAMAGE;

// Radiation exposure
pub const TICKS_PER_SECOND: u32 = 20;
/// Waste radioactivity is spread over roughly an hour of exposure
pub const WASTE_EXPOSURE_SECONDS: f64 = 3_600.0;
