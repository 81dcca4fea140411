use crate::core::comparator::Comparator;
use crate::core::fixtures::{self, Fixtures};
use crate::core::scenario::Scenario;
use crate::core::trace::TraceLog;
use crate::core::{
    BackendResult, CharacterCount, Outcome, Person, ScenarioReport, StreamBackend, TimingSample,
};
use crate::utils::error::{HarnessError, Result};
use crate::utils::monitor::SystemMonitor;
use std::time::Instant;

/// Text form of a pipeline result, used in reports and mismatch errors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for f64 {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl Render for Person {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl Render for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl Render for CharacterCount {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl<T: Render> Render for Vec<T> {
    fn render(&self) -> String {
        let items: Vec<String> = self.iter().map(Render::render).collect();
        format!("[{}]", items.join(", "))
    }
}

impl<T: Render> Render for Option<T> {
    fn render(&self) -> String {
        match self {
            Some(value) => value.render(),
            None => "<absent>".to_string(),
        }
    }
}

struct Disagreement {
    backend: String,
    expected: String,
    actual: String,
}

/// Runs each scenario through every backend and checks that they agree.
pub struct ComparisonHarness {
    backends: Vec<Box<dyn StreamBackend>>,
    timed_backends: Option<Vec<String>>,
    fixtures: Fixtures,
    timing_upper: i32,
    monitor: SystemMonitor,
}

impl ComparisonHarness {
    pub fn new(backends: Vec<Box<dyn StreamBackend>>) -> Self {
        Self::new_with_monitoring(backends, false)
    }

    pub fn new_with_monitoring(backends: Vec<Box<dyn StreamBackend>>, monitor_enabled: bool) -> Self {
        Self {
            backends,
            timed_backends: None,
            fixtures: Fixtures::default(),
            timing_upper: i32::MAX,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn with_fixtures(mut self, fixtures: Fixtures) -> Self {
        self.fixtures = fixtures;
        self
    }

    pub fn with_timing_upper(mut self, upper: i32) -> Self {
        self.timing_upper = upper;
        self
    }

    /// Restrict timing scenarios to the named backends. Unset means all.
    pub fn with_timed_backends(mut self, names: Vec<String>) -> Self {
        self.timed_backends = Some(names);
        self
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|backend| backend.name()).collect()
    }

    /// Runs one scenario. A disagreement is reported as `Outcome::Mismatch`
    /// instead of an error so later scenarios still run.
    pub fn run(&mut self, scenario: Scenario) -> Result<ScenarioReport> {
        let (report, _) = self.execute(scenario)?;
        Ok(report)
    }

    /// Like [`run`](Self::run), but a disagreement becomes `HarnessError::Mismatch`.
    pub fn verify(&mut self, scenario: Scenario) -> Result<ScenarioReport> {
        match self.execute(scenario)? {
            (_, Some(diff)) => Err(HarnessError::Mismatch {
                scenario: scenario.name().to_string(),
                backend: diff.backend,
                expected: diff.expected,
                actual: diff.actual,
            }),
            (report, None) => Ok(report),
        }
    }

    pub fn run_all(&mut self, scenarios: &[Scenario]) -> Result<Vec<ScenarioReport>> {
        tracing::info!(
            "Running {} scenarios on backends: {}",
            scenarios.len(),
            self.backend_names().join(", ")
        );

        let mut reports = Vec::with_capacity(scenarios.len());
        for &scenario in scenarios {
            let report = self.run(scenario)?;
            match report.outcome {
                Outcome::Agreed => tracing::info!("✅ {}", scenario),
                Outcome::Timed => tracing::info!("⏱️ {}", scenario),
                Outcome::Mismatch => tracing::error!(
                    "❌ {}: {}",
                    scenario,
                    report.detail.as_deref().unwrap_or("backends disagree")
                ),
            }
            reports.push(report);
        }
        Ok(reports)
    }

    fn execute(&mut self, scenario: Scenario) -> Result<(ScenarioReport, Option<Disagreement>)> {
        if self.backends.is_empty() {
            return Err(HarnessError::MissingConfigError {
                field: "backends".to_string(),
            });
        }
        tracing::debug!("Starting scenario {}", scenario);

        let fx = self.fixtures.clone();
        let by_age = fixtures::age_diff_comparator();

        let result = match scenario {
            Scenario::SumFilteredScaled => self.agree(scenario, fx.expected_price_sum, |backend| {
                backend.sum_filtered_scaled(&fx.prices, fx.price_threshold, fx.price_factor)
            }),
            Scenario::SortAscending => {
                let expected = stable_sorted(&fx.people, &by_age);
                self.agree(scenario, Some(expected), |backend| {
                    backend.sorted_by(&fx.people, &by_age)
                })
            }
            Scenario::SortDescending => {
                let desc = by_age.reversed();
                let expected = stable_sorted(&fx.people, &desc);
                self.agree(scenario, Some(expected), |backend| {
                    backend.sorted_by(&fx.people, &desc)
                })
            }
            Scenario::MinByAge => {
                let expected = fx
                    .people
                    .iter()
                    .min_by(|left, right| by_age.compare(left, right))
                    .cloned();
                self.agree(scenario, Some(expected), |backend| {
                    backend.min_by(&fx.people, &by_age)
                })
            }
            Scenario::MinOfEmpty => self.agree(scenario, Some(None), |backend| {
                backend.min_by(&[], &by_age)
            }),
            Scenario::GroupAndCount => {
                let expected =
                    fx.symbols
                        .iter()
                        .fold(CharacterCount::new(), |mut counts, symbol| {
                            counts.increment(symbol);
                            counts
                        });
                self.agree(scenario, Some(expected), |backend| {
                    backend.group_and_count(&fx.symbols)
                })
            }
            Scenario::Descending => {
                let expected: Vec<String> = fx.reverse_names.iter().rev().cloned().collect();
                self.agree(scenario, Some(expected), |backend| {
                    backend.descending(&fx.reverse_names)
                })
            }
            Scenario::LazyFindFirst => self.lazy_find_first(scenario, &fx),
            Scenario::TimedRange => {
                let pipeline = fixtures::timed_range_pipeline(self.timing_upper);
                (self.timed(scenario, |backend| backend.range_transform(&pipeline)), None)
            }
            Scenario::TimedRangeFiltered => {
                let pipeline = fixtures::timed_range_filtered_pipeline(self.timing_upper);
                (self.timed(scenario, |backend| backend.range_transform(&pipeline)), None)
            }
        };

        Ok(result)
    }

    /// 有期望值時每個 backend 都要等於它，否則以第一個 backend 的結果當作基準
    fn agree<R, F>(
        &self,
        scenario: Scenario,
        expected: Option<R>,
        mut op: F,
    ) -> (ScenarioReport, Option<Disagreement>)
    where
        R: PartialEq + Render,
        F: FnMut(&dyn StreamBackend) -> R,
    {
        let outputs: Vec<(String, R)> = self
            .backends
            .iter()
            .map(|backend| (backend.name().to_string(), op(backend.as_ref())))
            .collect();

        let disagreement = find_disagreement(&outputs, expected.as_ref());
        let results = outputs
            .iter()
            .map(|(backend, value)| BackendResult {
                backend: backend.clone(),
                result: value.render(),
            })
            .collect();

        let (outcome, detail) = match &disagreement {
            Some(diff) => (
                Outcome::Mismatch,
                Some(format!(
                    "{}: expected {}, got {}",
                    diff.backend, diff.expected, diff.actual
                )),
            ),
            None => (Outcome::Agreed, None),
        };

        let report = ScenarioReport {
            scenario: scenario.name().to_string(),
            outcome,
            results,
            detail,
            trace: Vec::new(),
            timings: Vec::new(),
        };
        (report, disagreement)
    }

    fn lazy_find_first(
        &self,
        scenario: Scenario,
        fx: &Fixtures,
    ) -> (ScenarioReport, Option<Disagreement>) {
        // 直接用 std iterator 算期望值，不經過 trace
        let expected = fx
            .names
            .iter()
            .find(|name| name.chars().count() == fx.name_length)
            .map(|name| name.to_uppercase());

        let mut trace_lines = Vec::new();
        let (mut report, disagreement) = self.agree(scenario, Some(expected), |backend| {
            let trace = TraceLog::new();
            let found = backend.find_first_of_length(&fx.names, fx.name_length, &trace);
            trace_lines.extend(
                trace
                    .lines()
                    .into_iter()
                    .map(|line| format!("[{}] {}", backend.name(), line)),
            );
            found
        });
        report.trace = trace_lines;
        (report, disagreement)
    }

    fn timed<F>(&mut self, scenario: Scenario, mut op: F) -> ScenarioReport
    where
        F: FnMut(&dyn StreamBackend) -> i32,
    {
        let mut timings = Vec::new();
        for backend in &self.backends {
            let selected = self
                .timed_backends
                .as_ref()
                .map_or(true, |names| names.iter().any(|name| name == backend.name()));
            if !selected {
                continue;
            }

            self.monitor
                .log_stats(&format!("{} / {} start", scenario, backend.name()));
            let start = Instant::now();
            let value = op(backend.as_ref());
            let elapsed = start.elapsed();
            self.monitor
                .log_stats(&format!("{} / {} end", scenario, backend.name()));

            tracing::info!(
                "⏱️ {} on {}: {} ms (value {})",
                scenario,
                backend.name(),
                elapsed.as_millis(),
                value
            );
            timings.push(TimingSample {
                backend: backend.name().to_string(),
                elapsed,
                value,
            });
        }

        let detail = timings
            .iter()
            .map(|sample| format!("{}: {} ms", sample.backend, sample.elapsed.as_millis()))
            .collect::<Vec<_>>()
            .join(", ");

        ScenarioReport {
            scenario: scenario.name().to_string(),
            outcome: Outcome::Timed,
            results: Vec::new(),
            detail: Some(detail),
            trace: Vec::new(),
            timings,
        }
    }
}

fn find_disagreement<R>(outputs: &[(String, R)], expected: Option<&R>) -> Option<Disagreement>
where
    R: PartialEq + Render,
{
    let (_, reference) = outputs.first()?;
    let reference = expected.unwrap_or(reference);

    outputs
        .iter()
        .find(|(_, value)| value != reference)
        .map(|(backend, value)| Disagreement {
            backend: backend.clone(),
            expected: reference.render(),
            actual: value.render(),
        })
}

/// Reference order: std's `sort_by` is stable, so ties keep input order.
fn stable_sorted(people: &[Person], comparator: &Comparator<Person>) -> Vec<Person> {
    let mut sorted = people.to_vec();
    sorted.sort_by(|left, right| comparator.compare(left, right));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::backends::{all_backends, SequentialBackend};
    use crate::core::RangePipeline;

    /// How a test backend gets sorting wrong.
    #[derive(Clone, Copy)]
    enum SortFault {
        /// Sorted output handed back reversed.
        ReversedOutput,
        /// Input reversed before a stable sort: still ordered, ties swapped.
        ReversedInput,
        /// Single backend that also miscounts and finds the wrong name.
        Everything,
    }

    struct BrokenSortBackend(SortFault);

    impl StreamBackend for BrokenSortBackend {
        fn name(&self) -> &str {
            "broken"
        }

        fn sum_filtered_scaled(&self, prices: &[i32], threshold: i32, factor: f64) -> f64 {
            SequentialBackend.sum_filtered_scaled(prices, threshold, factor)
        }

        fn sorted_by(&self, people: &[Person], comparator: &Comparator<Person>) -> Vec<Person> {
            match self.0 {
                SortFault::ReversedOutput => {
                    let mut sorted = SequentialBackend.sorted_by(people, comparator);
                    sorted.reverse();
                    sorted
                }
                SortFault::ReversedInput | SortFault::Everything => {
                    let reversed: Vec<Person> = people.iter().rev().cloned().collect();
                    SequentialBackend.sorted_by(&reversed, comparator)
                }
            }
        }

        fn min_by(&self, people: &[Person], comparator: &Comparator<Person>) -> Option<Person> {
            SequentialBackend.min_by(people, comparator)
        }

        fn group_and_count(&self, symbols: &[String]) -> CharacterCount {
            let mut counts = SequentialBackend.group_and_count(symbols);
            if let SortFault::Everything = self.0 {
                counts.increment("z");
            }
            counts
        }

        fn descending(&self, names: &[String]) -> Vec<String> {
            SequentialBackend.descending(names)
        }

        fn find_first_of_length(
            &self,
            names: &[String],
            length: usize,
            trace: &TraceLog,
        ) -> Option<String> {
            match self.0 {
                SortFault::Everything => names
                    .iter()
                    .rev()
                    .find(|name| trace.length(name) == length)
                    .map(|name| trace.to_upper(name)),
                _ => SequentialBackend.find_first_of_length(names, length, trace),
            }
        }

        fn range_transform(&self, pipeline: &RangePipeline) -> i32 {
            SequentialBackend.range_transform(pipeline)
        }
    }

    #[test]
    fn test_all_non_timing_scenarios_agree() {
        let mut harness = ComparisonHarness::new(all_backends());
        for scenario in Scenario::ALL.iter().filter(|s| !s.is_timing()) {
            let report = harness.verify(*scenario).unwrap();
            assert_eq!(report.outcome, Outcome::Agreed, "{}", scenario);
            assert_eq!(report.results.len(), 3);
        }
    }

    #[test]
    fn test_mismatch_is_reported_not_raised_by_run() {
        let backends: Vec<Box<dyn StreamBackend>> =
            vec![
            Box::new(SequentialBackend),
            Box::new(BrokenSortBackend(SortFault::ReversedOutput)),
        ];
        let mut harness = ComparisonHarness::new(backends);

        let report = harness.run(Scenario::SortAscending).unwrap();
        assert_eq!(report.outcome, Outcome::Mismatch);
        assert!(report.detail.unwrap().starts_with("broken"));

        let err = harness.verify(Scenario::SortAscending).unwrap_err();
        assert!(matches!(err, HarnessError::Mismatch { ref backend, .. } if backend == "broken"));

        // 其他場景不受影響
        assert!(harness.verify(Scenario::GroupAndCount).is_ok());
    }

    #[test]
    fn test_unstable_sort_fails_even_when_it_is_the_only_backend() {
        let mut harness =
            ComparisonHarness::new(vec![Box::new(BrokenSortBackend(SortFault::ReversedInput))]);

        // [John - 20, Jane - 21, Sara - 21, Greg - 35]: ordered by age, but Jane jumped Sara
        let err = harness.verify(Scenario::SortAscending).unwrap_err();
        match err {
            HarnessError::Mismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, "[John - 20, Sara - 21, Jane - 21, Greg - 35]");
                assert_eq!(actual, "[John - 20, Jane - 21, Sara - 21, Greg - 35]");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let report = harness.run(Scenario::SortDescending).unwrap();
        assert_eq!(report.outcome, Outcome::Mismatch);
    }

    #[test]
    fn test_single_backend_is_checked_against_documented_results() {
        let mut harness =
            ComparisonHarness::new(vec![Box::new(BrokenSortBackend(SortFault::Everything))]);

        let err = harness.verify(Scenario::GroupAndCount).unwrap_err();
        assert!(matches!(err, HarnessError::Mismatch { ref expected, .. } if expected == "{a:1, b:2, c:3, d:4}"));

        let err = harness.verify(Scenario::LazyFindFirst).unwrap_err();
        assert!(matches!(err, HarnessError::Mismatch { ref expected, ref actual, .. }
            if expected == "KIM" && actual != "KIM"));

        assert!(harness.verify(Scenario::MinByAge).is_ok());
    }

    #[test]
    fn test_timed_scenario_respects_backend_selection() {
        let mut harness = ComparisonHarness::new(all_backends())
            .with_timing_upper(1_000)
            .with_timed_backends(vec!["sequential".to_string(), "parallel".to_string()]);

        let report = harness.run(Scenario::TimedRange).unwrap();
        assert_eq!(report.outcome, Outcome::Timed);
        let timed: Vec<&str> = report.timings.iter().map(|t| t.backend.as_str()).collect();
        assert_eq!(timed, vec!["sequential", "parallel"]);
        assert_eq!(report.timings[0].value, report.timings[1].value);
    }

    #[test]
    fn test_no_backends_is_a_config_error() {
        let mut harness = ComparisonHarness::new(Vec::new());
        assert!(matches!(
            harness.run(Scenario::SumFilteredScaled),
            Err(HarnessError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_lazy_find_first_collects_trace_per_backend() {
        let mut harness = ComparisonHarness::new(vec![Box::new(SequentialBackend)]);
        let report = harness.run(Scenario::LazyFindFirst).unwrap();
        assert_eq!(
            report.trace,
            vec![
                "[sequential] length(): Brad",
                "[sequential] length(): Kate",
                "[sequential] length(): Kim",
                "[sequential] toUpper(): Kim",
            ]
        );
        assert_eq!(report.results[0].result, "KIM");
    }
}
