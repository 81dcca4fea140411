use crate::core::{CharacterCount, Comparator, Person, RangePipeline, StreamBackend, TraceLog};
use rayon::prelude::*;

/// Data-parallel pipelines on rayon's global pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelBackend;

impl ParallelBackend {
    pub const NAME: &'static str = "parallel";

    pub fn new() -> Self {
        Self
    }
}

impl StreamBackend for ParallelBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn sum_filtered_scaled(&self, prices: &[i32], threshold: i32, factor: f64) -> f64 {
        prices
            .par_iter()
            .filter(|&&price| price > threshold)
            .map(|&price| f64::from(price) * factor)
            .reduce(|| 0.0, |sum, value| sum + value)
    }

    fn sorted_by(&self, people: &[Person], comparator: &Comparator<Person>) -> Vec<Person> {
        let mut sorted = people.to_vec();
        sorted.par_sort_by(|left, right| comparator.compare(left, right));
        sorted
    }

    fn min_by(&self, people: &[Person], comparator: &Comparator<Person>) -> Option<Person> {
        // 以 (index, person) 歸約，平手時取 index 較小者，結果與切分方式無關
        people
            .par_iter()
            .enumerate()
            .reduce_with(|left, right| {
                match comparator.compare(left.1, right.1) {
                    std::cmp::Ordering::Greater => right,
                    std::cmp::Ordering::Less => left,
                    std::cmp::Ordering::Equal => {
                        if left.0 <= right.0 {
                            left
                        } else {
                            right
                        }
                    }
                }
            })
            .map(|(_, person)| person.clone())
    }

    fn group_and_count(&self, symbols: &[String]) -> CharacterCount {
        symbols
            .par_iter()
            .fold(CharacterCount::new, |mut counts, symbol| {
                counts.increment(symbol);
                counts
            })
            .reduce(CharacterCount::new, CharacterCount::merge)
    }

    fn descending(&self, names: &[String]) -> Vec<String> {
        names.par_iter().rev().cloned().collect()
    }

    fn find_first_of_length(
        &self,
        names: &[String],
        length: usize,
        trace: &TraceLog,
    ) -> Option<String> {
        names
            .par_iter()
            .filter(|name| trace.length(name) == length)
            .map(|name| trace.to_upper(name))
            .find_first(|_| true)
    }

    fn range_transform(&self, pipeline: &RangePipeline) -> i32 {
        (0..pipeline.upper)
            .into_par_iter()
            .filter_map(|value| pipeline.apply(value))
            .reduce(|| 0i32, |sum, value| sum.wrapping_add(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures;
    use crate::core::TraceEvent;

    #[test]
    fn test_find_first_keeps_input_order() {
        let backend = ParallelBackend::new();
        let trace = TraceLog::new();

        let found = backend.find_first_of_length(&fixtures::names(), 3, &trace);

        assert_eq!(found.as_deref(), Some("KIM"));
        assert!(trace
            .events()
            .contains(&TraceEvent::ToUpper("Kim".to_string())));
    }

    #[test]
    fn test_min_by_prefers_first_on_ties() {
        let backend = ParallelBackend::new();
        let by_age = fixtures::age_diff_comparator();
        let people = vec![
            Person::new("Sara", 21),
            Person::new("Jane", 21),
            Person::new("Greg", 35),
        ];
        assert_eq!(backend.min_by(&people, &by_age).unwrap().name, "Sara");
    }

    #[test]
    fn test_range_transform_wraps_like_sequential() {
        let backend = ParallelBackend::new();
        let pipeline = fixtures::timed_range_pipeline(100_000);
        let expected = (0..100_000)
            .filter(|v| v % 2 == 0)
            .map(|v| v + 1)
            .fold(0i32, |acc: i32, v| acc.wrapping_add(v));
        assert_eq!(backend.range_transform(&pipeline), expected);
    }
}
