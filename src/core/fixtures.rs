//! Built-in scenario inputs. TOML `[fixtures]` can override any of them.

use crate::core::comparator::Comparator;
use crate::domain::model::{IntOp, IntPredicate, Person, RangePipeline};

pub const PRICE_THRESHOLD: i32 = 20;
pub const PRICE_FACTOR: f64 = 0.9;
pub const EXPECTED_PRICE_SUM: f64 = 67.5;
pub const NAME_LENGTH: usize = 3;
pub const SYMBOL_SOURCE: &str = "abcdbcdcdd";

pub fn prices() -> Vec<i32> {
    vec![30, 17, 20, 15, 18, 45, 12]
}

pub fn people() -> Vec<Person> {
    vec![
        Person::new("John", 20),
        Person::new("Sara", 21),
        Person::new("Jane", 21),
        Person::new("Greg", 35),
    ]
}

pub fn names() -> Vec<String> {
    [
        "Brad", "Kate", "Kim", "Jack", "Joe", "Mike", "Susan", "George", "Robert", "Julia",
        "Parker", "Benson",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

pub fn short_names() -> Vec<String> {
    names().into_iter().take(4).collect()
}

/// 把字串拆成單一字元的字串
pub fn split_symbols(source: &str) -> Vec<String> {
    source.chars().map(String::from).collect()
}

pub fn symbols() -> Vec<String> {
    split_symbols(SYMBOL_SOURCE)
}

pub fn age_diff_comparator() -> Comparator<Person> {
    Comparator::new("age_diff", Person::age_diff)
}

/// even -> +1 -> sum
pub fn timed_range_pipeline(upper: i32) -> RangePipeline {
    RangePipeline::new(upper)
        .filter(IntPredicate::DivisibleBy(2))
        .map(IntOp::Add(1))
}

/// even -> +1 -> divisible by 3 -> sum
pub fn timed_range_filtered_pipeline(upper: i32) -> RangePipeline {
    timed_range_pipeline(upper).filter(IntPredicate::DivisibleBy(3))
}

/// Owned inputs for one harness run.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixtures {
    pub prices: Vec<i32>,
    pub price_threshold: i32,
    pub price_factor: f64,
    /// `None` 時只比較各 backend 之間是否一致
    pub expected_price_sum: Option<f64>,
    pub people: Vec<Person>,
    pub symbols: Vec<String>,
    pub names: Vec<String>,
    pub reverse_names: Vec<String>,
    pub name_length: usize,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            prices: prices(),
            price_threshold: PRICE_THRESHOLD,
            price_factor: PRICE_FACTOR,
            expected_price_sum: Some(EXPECTED_PRICE_SUM),
            people: people(),
            symbols: symbols(),
            names: names(),
            reverse_names: short_names(),
            name_length: NAME_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_symbols() {
        let symbols = symbols();
        assert_eq!(symbols.len(), SYMBOL_SOURCE.len());
        assert_eq!(symbols[0], "a");
        assert_eq!(symbols[9], "d");
    }

    #[test]
    fn test_short_names() {
        assert_eq!(short_names(), vec!["Brad", "Kate", "Kim", "Jack"]);
    }
}
