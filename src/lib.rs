pub mod config;
pub mod constants;
pub mod error;
pub mod heat_node;
pub mod host;
pub mod logic_adapter;
pub mod math_utils;
pub mod random;
pub mod reactor;
pub mod sim;
pub mod snapshot;
pub mod substance;
pub mod tank;
pub mod temp_utils;
pub mod test_support;

pub use config::ReactorConfig;
pub use error::{CommandError, ReactorError, ReactorResult};
pub use reactor::{DamageState, FissionReactor};
pub use sim::{ReactorSimulation, TickContext, TickReport};
