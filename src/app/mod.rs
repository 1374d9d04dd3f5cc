// Application layer: orchestration over the board port (resolve, transitions, timers).

pub mod automator;
pub mod timers;

pub use automator::BoardAutomator;
pub use timers::{TimedJob, TimerPlan};
