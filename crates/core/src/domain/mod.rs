pub mod milestones;
pub mod model;
