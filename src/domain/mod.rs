pub mod format;
pub mod lifecycle;
pub mod task;
pub mod timestamp;

pub use format::{
    format_clock, format_time_range, format_timestamp, format_timestamp_input,
    parse_timestamp_input,
};
pub use lifecycle::{evaluate, LifecycleInputs, SubtaskState};
pub use task::{
    is_blank, NewSubtask, Subtask, SubtaskId, SubtaskPatch, Task, TaskId, TaskPatch,
};
