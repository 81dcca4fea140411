use crate::core::{CharacterCount, Comparator, Person, RangePipeline, StreamBackend, TraceLog};

/// Lazy `Iterator` adapters: each element passes through every stage before
/// the next element is pulled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialBackend;

impl SequentialBackend {
    pub const NAME: &'static str = "sequential";

    pub fn new() -> Self {
        Self
    }
}

impl StreamBackend for SequentialBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn sum_filtered_scaled(&self, prices: &[i32], threshold: i32, factor: f64) -> f64 {
        prices
            .iter()
            .filter(|&&price| price > threshold)
            .map(|&price| f64::from(price) * factor)
            .fold(0.0, |sum, value| sum + value)
    }

    fn sorted_by(&self, people: &[Person], comparator: &Comparator<Person>) -> Vec<Person> {
        let mut sorted = people.to_vec();
        sorted.sort_by(|left, right| comparator.compare(left, right));
        sorted
    }

    fn min_by(&self, people: &[Person], comparator: &Comparator<Person>) -> Option<Person> {
        people
            .iter()
            .min_by(|left, right| comparator.compare(left, right))
            .cloned()
    }

    fn group_and_count(&self, symbols: &[String]) -> CharacterCount {
        symbols
            .iter()
            .fold(CharacterCount::new(), |mut counts, symbol| {
                counts.increment(symbol);
                counts
            })
    }

    fn descending(&self, names: &[String]) -> Vec<String> {
        names.iter().rev().cloned().collect()
    }

    fn find_first_of_length(
        &self,
        names: &[String],
        length: usize,
        trace: &TraceLog,
    ) -> Option<String> {
        names
            .iter()
            .filter(|name| trace.length(name) == length)
            .map(|name| trace.to_upper(name))
            .next()
    }

    fn range_transform(&self, pipeline: &RangePipeline) -> i32 {
        (0..pipeline.upper)
            .filter_map(|value| pipeline.apply(value))
            .fold(0i32, |sum, value| sum.wrapping_add(value))
    }
}
