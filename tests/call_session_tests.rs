// End-to-end call session tests
//
// Import → select → dial → hang up → stored record → dashboard, using the
// simulated voice transport.

use anyhow::Result;
use call_desk::dashboard::summarize_now;
use call_desk::import::parse_phone_list;
use call_desk::session::{CallController, CallState};
use call_desk::store::ResponseStore;
use call_desk::voice::{SimulatedTransport, VoiceMessage};
use std::path::Path;
use std::sync::Arc;

const UPLOAD: &str = "id,number,name,notes\n1,555-0100,Alice,\n2,555-0200,,";

fn script() -> Vec<String> {
    vec!["Hello, is this Alice?".to_string(), "Yes, speaking.".to_string()]
}

fn new_controller(path: &Path, transport: Arc<SimulatedTransport>) -> Result<CallController> {
    let store = ResponseStore::load(path)?;
    Ok(CallController::new(store, transport))
}

#[tokio::test]
async fn test_upload_call_dashboard() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("responses.json");
    let transport = Arc::new(SimulatedTransport::new(script()));
    let mut controller = new_controller(&path, transport)?;

    let targets = parse_phone_list(UPLOAD);
    assert_eq!(targets.len(), 2);
    controller.load_targets(targets)?;

    controller.select(0)?;
    assert_eq!(controller.state(), CallState::Selected);

    assert_eq!(controller.start_call().await?, CallState::Connected);
    let record = controller.end_call().await?;

    assert_eq!(record.id, "1");
    assert_eq!(record.phone_number, "555-0100");
    assert_eq!(
        record.transcript,
        "assistant: Hello, is this Alice?\nuser: Yes, speaking."
    );
    assert_eq!(controller.state(), CallState::Selected);

    let summary = summarize_now(controller.store().records());
    assert_eq!(summary.total_calls, 1);
    assert_eq!(summary.calls_today, 1);

    // Survives a restart
    let reloaded = ResponseStore::load(&path)?;
    assert_eq!(reloaded.get("1").map(|r| r.phone_number.as_str()), Some("555-0100"));

    Ok(())
}

#[tokio::test]
async fn test_repeat_call_overwrites_record() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let transport = Arc::new(SimulatedTransport::new(script()));
    let mut controller = new_controller(&dir.path().join("responses.json"), transport.clone())?;
    controller.load_targets(parse_phone_list(UPLOAD))?;

    controller.select(1)?;
    controller.set_notes("first attempt");
    controller.start_call().await?;
    controller.end_call().await?;
    assert_eq!(controller.notes(), "first attempt");

    controller.set_notes("second attempt");
    controller.start_call().await?;
    transport.push_message(VoiceMessage::user("Call me later")).await;
    let record = controller.end_call().await?;

    assert_eq!(controller.store().len(), 1);
    let stored = controller.store().get("2").unwrap();
    assert_eq!(stored, &record);
    assert_eq!(stored.notes.as_deref(), Some("second attempt"));
    assert!(stored.transcript.ends_with("user: Call me later"));

    Ok(())
}

#[tokio::test]
async fn test_stored_notes_prefill_selection() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("responses.json");

    {
        let transport = Arc::new(SimulatedTransport::new(script()));
        let mut controller = new_controller(&path, transport)?;
        controller.load_targets(parse_phone_list(UPLOAD))?;
        controller.select(0)?;
        controller.set_notes("wants a callback");
        controller.save_notes()?;
    }

    let transport = Arc::new(SimulatedTransport::new(script()));
    let mut controller = new_controller(&path, transport)?;
    controller.load_targets(parse_phone_list(UPLOAD))?;
    controller.select(0)?;
    assert_eq!(controller.notes(), "wants a callback");

    let snapshot = controller.snapshot().await;
    assert!(snapshot.has_previous_call);
    assert_eq!(snapshot.target_count, 2);

    Ok(())
}

#[tokio::test]
async fn test_reimport_keeps_old_records() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let transport = Arc::new(SimulatedTransport::new(script()));
    let mut controller = new_controller(&dir.path().join("responses.json"), transport)?;

    controller.load_targets(parse_phone_list(UPLOAD))?;
    controller.select(0)?;
    controller.start_call().await?;
    controller.end_call().await?;

    controller.load_targets(parse_phone_list("id,number\n9,555-0900"))?;
    assert_eq!(controller.state(), CallState::NoSelection);
    assert_eq!(controller.targets().len(), 1);
    assert!(controller.store().get("1").is_some());

    Ok(())
}

#[tokio::test]
async fn test_failed_connect_writes_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("responses.json");
    let transport = Arc::new(SimulatedTransport::new(script()).failing("line busy"));
    let mut controller = new_controller(&path, transport)?;
    controller.load_targets(parse_phone_list(UPLOAD))?;

    controller.select(0)?;
    assert!(controller.start_call().await.is_err());
    assert_eq!(controller.state(), CallState::Selected);
    assert!(controller.store().is_empty());
    assert!(!path.exists(), "Nothing should be persisted");

    Ok(())
}

#[tokio::test]
async fn test_failed_store_write_records_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("responses.json");
    let transport = Arc::new(SimulatedTransport::new(script()));
    let mut controller = new_controller(&path, transport)?;
    controller.load_targets(parse_phone_list(UPLOAD))?;

    std::fs::create_dir(&path)?;

    controller.select(0)?;
    controller.start_call().await?;
    assert!(controller.end_call().await.is_err());

    assert_eq!(controller.state(), CallState::Selected);
    assert!(controller.store().is_empty());
    assert_eq!(summarize_now(controller.store().records()).total_calls, 0);

    Ok(())
}
