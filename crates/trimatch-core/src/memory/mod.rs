mod planner;
mod recall;

pub use planner::{OpponentPlanner, PickSource, PlannedPick};
pub use recall::OpponentMemory;
