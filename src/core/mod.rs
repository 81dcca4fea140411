pub mod comparator;
pub mod fixtures;
pub mod harness;
pub mod scenario;
pub mod trace;

pub use crate::core::comparator::Comparator;
pub use crate::core::trace::{TraceEvent, TraceLog};
pub use crate::domain::model::{
    BackendResult, CharacterCount, IntOp, IntPredicate, IntStage, Outcome, Person, RangePipeline,
    ScenarioReport, TimingSample,
};
pub use crate::domain::ports::{Storage, StreamBackend};
pub use crate::utils::error::Result;
