//! State module for tracking fetch task progress
//!
//! - `TaskState`: where a single URL's fetch task is in its retry loop

mod task_state;

pub use task_state::TaskState;
