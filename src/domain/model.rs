use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub age: i32,
}

impl Person {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    /// 年齡差，作為排序用的衍生鍵
    ///
    /// Saturates at the `i32` bounds, so the sign always matches the real
    /// difference and the comparator stays a total order for any age.
    pub fn age_diff(&self, other: &Person) -> i32 {
        self.age.saturating_sub(other.age)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.age)
    }
}

/// Single-character symbol -> number of occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCount(BTreeMap<String, u64>);

impl CharacterCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, symbol: &str) {
        self.add(symbol, 1);
    }

    pub fn add(&mut self, symbol: &str, count: u64) {
        *self.0.entry(symbol.to_string()).or_insert(0) += count;
    }

    pub fn merge(mut self, other: CharacterCount) -> Self {
        for (symbol, count) in other.0 {
            self.add(&symbol, count);
        }
        self
    }

    pub fn get(&self, symbol: &str) -> Option<u64> {
        self.0.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(symbol, count)| (symbol.as_str(), *count))
    }
}

impl FromIterator<(String, u64)> for CharacterCount {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = CharacterCount::new();
        for (symbol, count) in iter {
            counts.add(&symbol, count);
        }
        counts
    }
}

impl fmt::Display for CharacterCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .iter()
            .map(|(symbol, count)| format!("{}:{}", symbol, count))
            .collect();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntPredicate {
    DivisibleBy(i32),
}

impl IntPredicate {
    pub fn test(&self, value: i32) -> bool {
        match *self {
            IntPredicate::DivisibleBy(divisor) => value % divisor == 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntOp {
    Add(i32),
}

impl IntOp {
    pub fn apply(&self, value: i32) -> i32 {
        match *self {
            IntOp::Add(delta) => value.wrapping_add(delta),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntStage {
    Filter(IntPredicate),
    Map(IntOp),
}

impl IntStage {
    /// `None` 表示元素被過濾掉
    pub fn apply(&self, value: i32) -> Option<i32> {
        match self {
            IntStage::Filter(predicate) => predicate.test(value).then_some(value),
            IntStage::Map(op) => Some(op.apply(value)),
        }
    }
}

/// Integer pipeline over `0..upper`, reduced by wrapping `i32` addition from 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangePipeline {
    pub upper: i32,
    pub stages: Vec<IntStage>,
}

impl RangePipeline {
    pub fn new(upper: i32) -> Self {
        Self {
            upper,
            stages: Vec::new(),
        }
    }

    pub fn filter(mut self, predicate: IntPredicate) -> Self {
        self.stages.push(IntStage::Filter(predicate));
        self
    }

    pub fn map(mut self, op: IntOp) -> Self {
        self.stages.push(IntStage::Map(op));
        self
    }

    /// Runs one element through every stage.
    pub fn apply(&self, value: i32) -> Option<i32> {
        self.stages
            .iter()
            .try_fold(value, |current, stage| stage.apply(current))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSample {
    pub backend: String,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
    pub value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Agreed,
    Timed,
    Mismatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendResult {
    pub backend: String,
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub outcome: Outcome,
    pub results: Vec<BackendResult>,
    pub detail: Option<String>,
    pub trace: Vec<String>,
    pub timings: Vec<TimingSample>,
}

impl ScenarioReport {
    pub fn is_success(&self) -> bool {
        self.outcome != Outcome::Mismatch
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
