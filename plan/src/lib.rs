// Goal list for one panorama and the unit boundary between the sequencer
// (radians) and the PTU (gearing-scaled radians or actuator steps).

mod error;
pub mod plan;
pub mod units;

pub use error::ConfigError;
pub use plan::{PlanConfig, Position, PositionPlan, MAX_GENERATED_POSITIONS};
pub use units::{AngleConversion, AxisScale, UnitsConfig};
