//! AI components.

pub mod fsm;


pub use fsm::{AIConfig, AIState, EnemyBrain, PatrolRoute};
