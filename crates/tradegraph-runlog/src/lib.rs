pub mod error;
pub mod record;
pub mod writer;

pub use error::RunLogError;
pub use record::{DebateLog, RunRecord};
pub use writer::{load, RunLogWriter, SubjectLog};
