pub mod commands;
pub mod logging;
pub mod plan;
pub mod report;

pub use commands::{CrisisSelection, RunOptions};
pub use logging::init_logging;
pub use plan::{ClientProfile, PlanFile};
pub use report::{OutputFormat, Report};
