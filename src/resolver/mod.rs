pub mod field;
pub mod lesson;
pub mod pipeline;

pub use field::{resolve_field, resolve_step};
pub use lesson::{merge_step, resolve, select_bundle};
pub use pipeline::{effective_step, step_at, LessonPipeline};
