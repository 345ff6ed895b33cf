// src/telemetry.rs
//! Prometheus recorder for the case metrics emitted by `summary::Suite`.
//!
//! The binary installs it once per process and can dump the exposition
//! text after the verdict with `--metrics-out`.

use std::fs;
use std::path::Path;

use anyhow::Context;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

pub struct Telemetry {
    handle: PrometheusHandle,
}

impl Telemetry {
    /// Install the recorder globally. Fails if another recorder is already set.
    pub fn install() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("install prometheus recorder")?;
        Ok(Self { handle })
    }

    /// Recorder that is not installed anywhere; pair with `metrics::with_local_recorder`.
    pub fn local() -> (PrometheusRecorder, Self) {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        (recorder, Self { handle })
    }

    /// Prometheus exposition text for everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        fs::write(path, self.render())
            .with_context(|| format!("write metrics to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{Suite, TestCaseOutcome};
    use std::time::Duration;

    fn record_two_cases(t: &PrometheusRecorder) {
        metrics::with_local_recorder(t, || {
            let mut s = Suite::new("fetch");
            s.begin("#python").unwrap();
            s.finish(TestCaseOutcome::completed(
                "#python",
                true,
                5,
                Duration::from_millis(20),
            ))
            .unwrap();
            s.begin("#ai").unwrap();
            s.finish(TestCaseOutcome::completed("#ai", false, 0, Duration::ZERO))
                .unwrap();
        });
    }

    #[test]
    fn suite_cases_show_up_in_exposition() {
        let (recorder, telemetry) = Telemetry::local();
        record_two_cases(&recorder);

        let text = telemetry.render();
        let cases: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("harness_cases_total{"))
            .collect();
        assert_eq!(cases.len(), 2);
        assert!(cases
            .iter()
            .any(|l| l.contains("status=\"passed\"") && l.ends_with(" 1")));
        assert!(cases
            .iter()
            .any(|l| l.contains("status=\"failed\"") && l.ends_with(" 1")));
        assert!(text
            .lines()
            .any(|l| l.starts_with("harness_items_observed_total{") && l.ends_with(" 5")));
        assert!(text.contains("harness_case_seconds"));
    }

    #[test]
    fn write_to_dumps_rendered_text() {
        let (recorder, telemetry) = Telemetry::local();
        record_two_cases(&recorder);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.prom");
        telemetry.write_to(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("harness_cases_total{"));

        let missing = dir.path().join("no/such/dir/metrics.prom");
        assert!(telemetry.write_to(&missing).is_err());
    }
}
