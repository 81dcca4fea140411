use crate::core::{CharacterCount, Comparator, Person, RangePipeline, StreamBackend, TraceLog};
use std::collections::VecDeque;

/// 每個階段先把整批資料處理完，才交給下一個階段。
/// Range pipelines run the same way, one bounded chunk at a time.
#[derive(Debug, Clone, Copy)]
pub struct EagerBackend {
    chunk_size: usize,
}

impl EagerBackend {
    pub const NAME: &'static str = "eager";
    pub const DEFAULT_CHUNK_SIZE: usize = 1 << 16;

    pub fn new() -> Self {
        Self::with_chunk_size(Self::DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    fn run_stages(pipeline: &RangePipeline, chunk: Vec<i32>) -> Vec<i32> {
        pipeline.stages.iter().fold(chunk, |batch, stage| {
            batch
                .into_iter()
                .filter_map(|value| stage.apply(value))
                .collect()
        })
    }
}

impl Default for EagerBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamBackend for EagerBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn sum_filtered_scaled(&self, prices: &[i32], threshold: i32, factor: f64) -> f64 {
        let kept: Vec<i32> = prices
            .iter()
            .copied()
            .filter(|&price| price > threshold)
            .collect();
        let scaled: Vec<f64> = kept.iter().map(|&price| f64::from(price) * factor).collect();

        let mut sum = 0.0;
        for value in scaled {
            sum += value;
        }
        sum
    }

    fn sorted_by(&self, people: &[Person], comparator: &Comparator<Person>) -> Vec<Person> {
        let mut sorted = people.to_vec();
        sorted.sort_by(|left, right| comparator.compare(left, right));
        sorted
    }

    fn min_by(&self, people: &[Person], comparator: &Comparator<Person>) -> Option<Person> {
        // stable sort 後的第一個元素就是最早出現的最小值
        self.sorted_by(people, comparator).into_iter().next()
    }

    fn group_and_count(&self, symbols: &[String]) -> CharacterCount {
        let mut sorted: Vec<&str> = symbols.iter().map(String::as_str).collect();
        sorted.sort_unstable();

        let mut runs: Vec<(String, u64)> = Vec::new();
        for symbol in sorted {
            match runs.last_mut() {
                Some((last, count)) if last.as_str() == symbol => *count += 1,
                _ => runs.push((symbol.to_string(), 1)),
            }
        }
        runs.into_iter().collect()
    }

    fn descending(&self, names: &[String]) -> Vec<String> {
        let mut queue: VecDeque<String> = names.iter().cloned().collect();
        let mut reversed = Vec::with_capacity(queue.len());
        while let Some(name) = queue.pop_back() {
            reversed.push(name);
        }
        reversed
    }

    fn find_first_of_length(
        &self,
        names: &[String],
        length: usize,
        trace: &TraceLog,
    ) -> Option<String> {
        let matching: Vec<&String> = names
            .iter()
            .filter(|name| trace.length(name) == length)
            .collect();
        let upper: Vec<String> = matching.iter().map(|name| trace.to_upper(name)).collect();
        upper.into_iter().next()
    }

    fn range_transform(&self, pipeline: &RangePipeline) -> i32 {
        let step = i32::try_from(self.chunk_size).unwrap_or(i32::MAX);
        let mut sum = 0i32;
        let mut start = 0i32;
        while start < pipeline.upper {
            let end = start.saturating_add(step).min(pipeline.upper);
            let batch = Self::run_stages(pipeline, (start..end).collect());
            sum = batch.into_iter().fold(sum, |acc, value| acc.wrapping_add(value));
            start = end;
        }
        sum
    }
}
