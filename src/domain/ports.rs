use crate::core::comparator::Comparator;
use crate::core::trace::TraceLog;
use crate::domain::model::{CharacterCount, Person, RangePipeline};
use crate::utils::error::Result;

/// One implementation of every pipeline the harness compares.
///
/// Implementations must be pure apart from the trace side effect: calling an
/// operation twice with the same input gives the same result.
pub trait StreamBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Keep prices above `threshold`, scale by `factor`, sum from `0.0`.
    fn sum_filtered_scaled(&self, prices: &[i32], threshold: i32, factor: f64) -> f64;

    /// Stable sort; elements comparing equal keep their input order.
    fn sorted_by(&self, people: &[Person], comparator: &Comparator<Person>) -> Vec<Person>;

    /// Smallest element, first one on ties. `None` for empty input.
    fn min_by(&self, people: &[Person], comparator: &Comparator<Person>) -> Option<Person>;

    fn group_and_count(&self, symbols: &[String]) -> CharacterCount;

    fn descending(&self, names: &[String]) -> Vec<String>;

    /// First name of `length` characters, upper-cased. Each length check and
    /// upper-casing call is recorded in `trace`.
    fn find_first_of_length(
        &self,
        names: &[String],
        length: usize,
        trace: &TraceLog,
    ) -> Option<String>;

    fn range_transform(&self, pipeline: &RangePipeline) -> i32;
}

/// Where rendered reports are written.
pub trait Storage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}
