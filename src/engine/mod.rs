pub mod scheduler;
pub mod state;

pub use state::SubtaskStateEngine;
