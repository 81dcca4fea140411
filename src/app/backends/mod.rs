pub mod eager;
pub mod parallel;
pub mod sequential;

pub use eager::EagerBackend;
pub use parallel::ParallelBackend;
pub use sequential::SequentialBackend;

use crate::core::StreamBackend;
use crate::utils::error::{HarnessError, Result};

pub const BACKEND_NAMES: [&str; 3] = [
    SequentialBackend::NAME,
    EagerBackend::NAME,
    ParallelBackend::NAME,
];

pub fn backend_by_name(name: &str) -> Result<Box<dyn StreamBackend>> {
    match name {
        SequentialBackend::NAME => Ok(Box::new(SequentialBackend::new())),
        EagerBackend::NAME => Ok(Box::new(EagerBackend::new())),
        ParallelBackend::NAME => Ok(Box::new(ParallelBackend::new())),
        other => Err(HarnessError::UnknownBackend {
            name: other.to_string(),
        }),
    }
}

pub fn all_backends() -> Vec<Box<dyn StreamBackend>> {
    vec![
        Box::new(SequentialBackend::new()),
        Box::new(EagerBackend::new()),
        Box::new(ParallelBackend::new()),
    ]
}
