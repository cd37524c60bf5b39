use std::future::Future;
use std::sync::Arc;

use regex::bytes::Regex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::state::Substep;
use crate::error::{Result, WorkshopError};
use crate::probe::EndpointProbe;
use crate::provider::{ClickTracker, StatusProvider};

/// The author tag the live-update exercise asks the user to produce
pub const EXPECTED_AUTHOR: &str = r#"content="workshop""#;

const AUTHOR_PATTERN: &str = r#"content=".*""#;

/// Statuses that count as healthy for both runtime and update
const HEALTHY: [&str; 2] = ["ok", "not_applicable"];

/// Outcome of asking whether a button was clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickStatus {
    Clicked,
    NotClicked,
    /// The tracker could not answer, e.g. the button is not registered yet
    Unavailable(String),
}

impl ClickStatus {
    pub fn is_clicked(&self) -> bool {
        matches!(self, ClickStatus::Clicked)
    }
}

/// Run one collaborator query, failing it if the tick is cancelled first.
async fn guarded<T>(cancel: &CancellationToken, query: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(WorkshopError::Cancelled),
        result = query => result,
    }
}

/// Turns collaborator answers into substeps
pub struct Evaluator {
    status: Arc<dyn StatusProvider>,
    clicks: Arc<dyn ClickTracker>,
    probe: Arc<dyn EndpointProbe>,
    author_pattern: Regex,
}

impl Evaluator {
    pub fn new(
        status: Arc<dyn StatusProvider>,
        clicks: Arc<dyn ClickTracker>,
        probe: Arc<dyn EndpointProbe>,
    ) -> Result<Self> {
        Ok(Self {
            status,
            clicks,
            probe,
            author_pattern: Regex::new(AUTHOR_PATTERN)?,
        })
    }

    pub async fn resource_ready(&self, name: &str, cancel: &CancellationToken) -> Substep {
        let substep = Substep::new(
            format!("resource {name}"),
            format!("tilt get uiresource -o json {}", shell_escape::escape(name.into())),
        );

        let status = match guarded(cancel, self.status.resource_status(name)).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Status query for {} failed: {}", name, e);
                return substep.failed(format!("{name} threw an error: {e}"));
            }
        };
        debug!(
            "Resource {}: runtime={} update={}",
            name, status.runtime_status, status.update_status
        );

        if !HEALTHY.contains(&status.runtime_status.as_str()) {
            return substep.failed(format!(
                "RuntimeStatus: {:?} (should be \"ok\" or \"not_applicable\")",
                status.runtime_status
            ));
        }
        if !HEALTHY.contains(&status.update_status.as_str()) {
            return substep.failed(format!(
                "UpdateStatus: {:?} (should be \"ok\" or \"not_applicable\")",
                status.update_status
            ));
        }

        substep.passed()
    }

    pub async fn endpoint_ready(&self, cancel: &CancellationToken) -> Substep {
        let substep = Substep::new("muxer ready", format!("curl {}", self.probe.url()));

        match guarded(cancel, self.probe.probe()).await {
            Ok(()) => substep.passed(),
            Err(e) => {
                debug!("Probe of {} failed: {}", self.probe.url(), e);
                substep.failed(format!("Error: {e}"))
            }
        }
    }

    pub async fn author_set(&self, cancel: &CancellationToken) -> Substep {
        let substep = Substep::new(
            r#"author set to "workshop""#,
            format!("curl {} | grep author", self.probe.url()),
        );

        let body = match guarded(cancel, self.probe.fetch_body()).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => return substep.failed(format!("Error reading http: {e}")),
            Err(e) => return substep.failed(format!("Error: {e}")),
        };

        let observed = self
            .author_pattern
            .find(&body)
            .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
            .unwrap_or_default();

        if observed == EXPECTED_AUTHOR {
            substep.passed()
        } else {
            debug!("Author tag is {:?}", observed);
            substep.mismatch(observed, EXPECTED_AUTHOR)
        }
    }

    pub async fn click_status(&self, button_id: &str, cancel: &CancellationToken) -> ClickStatus {
        match guarded(cancel, self.clicks.has_been_clicked(button_id)).await {
            Ok(true) => ClickStatus::Clicked,
            Ok(false) => ClickStatus::NotClicked,
            Err(e) => {
                debug!("Click lookup for {} unavailable: {}", button_id, e);
                ClickStatus::Unavailable(e.to_string())
            }
        }
    }

    /// Substep satisfied once `button_id` has been clicked. Lookup failures
    /// read as "not clicked yet".
    pub async fn clicked(&self, desc: &str, button_id: &str, cancel: &CancellationToken) -> Substep {
        let substep = Substep::new(desc, "");
        if self.click_status(button_id, cancel).await.is_clicked() {
            substep.passed()
        } else {
            substep
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{DEFAULT_TIMEOUT, HttpProbe, StaticProbe};
    use crate::provider::{LocalClicks, ResourceStatus, StaticStatus};
    use async_trait::async_trait;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct BrokenClicks;

    #[async_trait]
    impl ClickTracker for BrokenClicks {
        async fn has_been_clicked(&self, button_id: &str) -> Result<bool> {
            Err(WorkshopError::Command(format!("uibuttons.tilt.dev {button_id:?} not found")))
        }
    }

    fn evaluator(status: Arc<StaticStatus>, probe: StaticProbe) -> Evaluator {
        Evaluator::new(status, Arc::new(LocalClicks::new()), Arc::new(probe)).unwrap()
    }

    #[tokio::test]
    async fn healthy_when_both_statuses_acceptable() {
        let status = Arc::new(StaticStatus::default());
        status.set("muxer", ResourceStatus::new("ok", "not_applicable"));
        let eval = evaluator(status, StaticProbe::serving(""));

        let substep = eval.resource_ready("muxer", &CancellationToken::new()).await;
        assert!(substep.done);
        assert!(substep.output.is_empty());
        assert_eq!(substep.desc, "resource muxer");
        assert_eq!(substep.instruction, "tilt get uiresource -o json muxer");
    }

    #[tokio::test]
    async fn runtime_error_fails_health() {
        let status = Arc::new(StaticStatus::default());
        status.set("red", ResourceStatus::new("error", "ok"));
        let eval = evaluator(status, StaticProbe::serving(""));

        let substep = eval.resource_ready("red", &CancellationToken::new()).await;
        assert!(!substep.done);
        assert!(substep.output.contains("RuntimeStatus"));
        assert!(substep.output.contains(r#""error""#));
    }

    #[tokio::test]
    async fn update_status_is_checked_independently() {
        let status = Arc::new(StaticStatus::default());
        status.set("glitch", ResourceStatus::new("not_applicable", "in_progress"));
        let eval = evaluator(status, StaticProbe::serving(""));

        let substep = eval.resource_ready("glitch", &CancellationToken::new()).await;
        assert!(!substep.done);
        assert!(substep.output.starts_with("UpdateStatus"));
    }

    #[tokio::test]
    async fn query_error_names_the_resource() {
        let status = Arc::new(StaticStatus::default());
        status.fail("storage", "connection refused");
        let eval = evaluator(status, StaticProbe::serving(""));

        let substep = eval.resource_ready("storage", &CancellationToken::new()).await;
        assert!(!substep.done);
        assert_eq!(substep.output, "storage threw an error: Command failed: connection refused");
    }

    #[tokio::test]
    async fn endpoint_ready_reports_raw_error() {
        let cancel = CancellationToken::new();
        let up = evaluator(Arc::default(), StaticProbe::serving("<html>"));
        assert!(up.endpoint_ready(&cancel).await.done);

        let down = evaluator(Arc::default(), StaticProbe::unreachable("connection refused"));
        let substep = down.endpoint_ready(&cancel).await;
        assert!(!substep.done);
        assert!(substep.output.starts_with("Error: "));
        assert!(substep.output.contains("connection refused"));
        assert_eq!(substep.instruction, "curl http://localhost:8080");
    }

    #[tokio::test]
    async fn author_matches_expected_tag() {
        let page = r#"<head><meta name="author" content="workshop"></head>"#;
        let eval = evaluator(Arc::default(), StaticProbe::serving(page));

        let substep = eval.author_set(&CancellationToken::new()).await;
        assert!(substep.done);
        assert!(substep.expected.is_empty());
    }

    #[tokio::test]
    async fn author_mismatch_shows_observed_and_expected() {
        let page = "<head>\n<meta name=\"author\" content=\"other\">\n</head>";
        let eval = evaluator(Arc::default(), StaticProbe::serving(page));

        let substep = eval.author_set(&CancellationToken::new()).await;
        assert!(!substep.done);
        assert_eq!(substep.output, r#"content="other""#);
        assert_eq!(substep.expected, r#"content="workshop""#);
    }

    #[tokio::test]
    async fn missing_author_tag_is_empty_observation() {
        let eval = evaluator(Arc::default(), StaticProbe::serving("<html></html>"));

        let substep = eval.author_set(&CancellationToken::new()).await;
        assert!(!substep.done);
        assert_eq!(substep.output, "");
        assert_eq!(substep.expected, EXPECTED_AUTHOR);
    }

    #[tokio::test]
    async fn probe_failure_skips_pattern_match() {
        let eval = evaluator(Arc::default(), StaticProbe::unreachable("timed out"));

        let substep = eval.author_set(&CancellationToken::new()).await;
        assert!(!substep.done);
        assert!(substep.output.starts_with("Error: "));
        assert!(substep.expected.is_empty());
    }

    #[tokio::test]
    async fn author_check_reads_the_page_it_requested() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"<meta content="workshop">"#))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let probe = HttpProbe::new(&server.uri(), DEFAULT_TIMEOUT).unwrap();
        let eval = Evaluator::new(
            Arc::new(StaticStatus::default()),
            Arc::new(LocalClicks::new()),
            Arc::new(probe),
        )
        .unwrap();

        let substep = eval.author_set(&CancellationToken::new()).await;
        assert!(substep.done, "output: {:?}", substep.output);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn author_check_labels_unreachable_page() {
        let probe = HttpProbe::new("http://127.0.0.1:1", DEFAULT_TIMEOUT).unwrap();
        let eval = Evaluator::new(
            Arc::new(StaticStatus::default()),
            Arc::new(LocalClicks::new()),
            Arc::new(probe),
        )
        .unwrap();

        let substep = eval.author_set(&CancellationToken::new()).await;
        assert!(!substep.done);
        assert!(substep.output.starts_with("Error: "));
        assert!(!substep.output.starts_with("Error reading http"));
    }

    #[tokio::test]
    async fn click_lookup_is_tri_state() {
        let clicks = Arc::new(LocalClicks::new());
        let eval = Evaluator::new(
            Arc::new(StaticStatus::default()),
            clicks.clone(),
            Arc::new(StaticProbe::serving("")),
        )
        .unwrap();
        let cancel = CancellationToken::new();

        assert_eq!(eval.click_status("a", &cancel).await, ClickStatus::NotClicked);
        clicks.click("a");
        assert_eq!(eval.click_status("a", &cancel).await, ClickStatus::Clicked);

        let broken = Evaluator::new(
            Arc::new(StaticStatus::default()),
            Arc::new(BrokenClicks),
            Arc::new(StaticProbe::serving("")),
        )
        .unwrap();
        let status = broken.click_status("a", &cancel).await;
        assert!(matches!(status, ClickStatus::Unavailable(ref reason) if reason.contains("not found")));

        let substep = broken.clicked("Click Next", "a", &cancel).await;
        assert!(!substep.done);
        assert!(substep.output.is_empty());
    }

    #[tokio::test]
    async fn cancelled_tick_fails_each_query() {
        let eval = evaluator(Arc::default(), StaticProbe::serving(""));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let substep = eval.resource_ready("frontend", &cancel).await;
        assert!(!substep.done);
        assert!(substep.output.contains("operation cancelled"));

        let substep = eval.endpoint_ready(&cancel).await;
        assert_eq!(substep.output, "Error: operation cancelled");
    }
}
