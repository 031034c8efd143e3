//! AI systems.

pub mod fsm;
pub mod stuck;

pub use fsm::{ai_fsm, find_nearest_visible_hostile, follow_step, FollowStep};
pub use stuck::{ai_stuck_recovery, first_visible_waypoint, update_stuck_timer};
