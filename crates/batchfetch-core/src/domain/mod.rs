//! Domain model: identifiers, task record, lifecycle states, errors.

pub mod errors;
pub mod ids;
pub mod state;
pub mod task;

pub use errors::{DownloadError, EngineError, StoreError};
pub use ids::{ParseTaskIdError, TaskId};
pub use state::TaskStatus;
pub use task::{FileOutcome, FileResult, Task};
