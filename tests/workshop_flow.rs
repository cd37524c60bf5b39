//! Walks the whole workshop against a mocked muxer, the way a user would.

use std::sync::Arc;

use tilt_workshop::probe::HttpProbe;
use tilt_workshop::provider::{LocalClicks, ResourceStatus, StaticStatus};
use tilt_workshop::workshop::{
    DONE_ADVANCE, INIT_ADVANCE, Machine, READY_ADVANCE, State, StateName, UPDATE_ADVANCE,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORIGINAL_PAGE: &str = r#"<html><head>
<meta name="author" content="Tilt Team">
</head></html>"#;

const EDITED_PAGE: &str = r#"<html><head>
<meta name="author" content="workshop">
</head></html>"#;

async fn serve(server: &MockServer, page: &str) {
    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_journey_from_welcome_to_delete() {
    let server = MockServer::start().await;
    serve(&server, ORIGINAL_PAGE).await;

    let status = Arc::new(StaticStatus::default());
    let clicks = Arc::new(LocalClicks::new());
    let probe = HttpProbe::new(&server.uri(), std::time::Duration::from_secs(1)).unwrap();
    let machine = Machine::new(status.clone(), clicks.clone(), Arc::new(probe)).unwrap();
    let cancel = CancellationToken::new();

    // Welcome: nothing happens until Next is clicked
    let mut st = machine.advance(&State::default(), &cancel).await;
    assert_eq!(st.state_name, StateName::Init);
    clicks.click(INIT_ADVANCE);
    st = machine.advance(&st, &cancel).await;
    assert_eq!(st.state_name, StateName::WaitForReady);

    // Provisioning: a resource still building holds the user back
    status.set("storage", ResourceStatus::new("pending", "in_progress"));
    clicks.click(READY_ADVANCE);
    st = machine.advance(&st, &cancel).await;
    assert_eq!(st.state_name, StateName::WaitForReady);
    assert!(st.workshop_started.is_set());
    let storage = st.substeps.iter().find(|s| s.desc == "resource storage").unwrap();
    assert!(storage.output.starts_with("RuntimeStatus"));

    status.clear("storage");
    st = machine.advance(&st, &cancel).await;
    assert_eq!(st.state_name, StateName::WaitForUpdate);

    // Live update: the page still has the old author
    clicks.click(UPDATE_ADVANCE);
    st = machine.advance(&st, &cancel).await;
    assert_eq!(st.state_name, StateName::WaitForUpdate);
    assert_eq!(st.substeps.len(), 2);
    assert_eq!(st.substeps[0].output, r#"content="Tilt Team""#);
    assert_eq!(st.substeps[0].expected, r#"content="workshop""#);

    serve(&server, EDITED_PAGE).await;
    st = machine.advance(&st, &cancel).await;
    assert_eq!(st.state_name, StateName::Done);

    // Congratulations, then teardown
    st = machine.advance(&st, &cancel).await;
    assert_eq!(st.state_name, StateName::Done);
    assert_eq!(st.step_num, 3);
    clicks.click(DONE_ADVANCE);
    st = machine.advance(&st, &cancel).await;
    assert_eq!(st.state_name, StateName::Delete);

    st = machine.advance(&st, &cancel).await;
    assert_eq!(st.state_name, StateName::Delete);
    assert!(st.workshop_done.is_set());
    assert!(st.workshop_started.is_set());
}

#[tokio::test]
async fn muxer_down_stalls_with_reason() {
    let status = Arc::new(StaticStatus::default());
    let clicks = Arc::new(LocalClicks::new());
    clicks.click(READY_ADVANCE);
    let probe = HttpProbe::new("http://127.0.0.1:1", std::time::Duration::from_secs(1)).unwrap();
    let machine = Machine::new(status, clicks, Arc::new(probe)).unwrap();

    let prior = State {
        state_name: StateName::WaitForReady,
        ..State::default()
    };
    let st = machine.advance(&prior, &CancellationToken::new()).await;

    assert_eq!(st.state_name, StateName::WaitForReady);
    let muxer = st.substeps.iter().find(|s| s.desc == "muxer ready").unwrap();
    assert!(!muxer.done);
    assert!(muxer.output.starts_with("Error: "));
    assert_eq!(st.pending_substeps(), 1);
}
