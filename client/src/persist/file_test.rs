use super::*;

fn temp_vault() -> (tempfile::TempDir, FileVault) {
    let dir = tempfile::tempdir().unwrap();
    let vault = FileVault::new(dir.path().join("session.json"));
    (dir, vault)
}

// =============================================================================
// record round trip
// =============================================================================

#[test]
fn missing_file_loads_none() {
    let (_dir, vault) = temp_vault();
    assert!(vault.load().is_none());
}

#[test]
fn save_then_load_round_trips() {
    let (_dir, vault) = temp_vault();
    vault.save(r#"{"id":"u1"}"#).unwrap();
    assert_eq!(vault.load().as_deref(), Some(r#"{"id":"u1"}"#));
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let vault = FileVault::new(dir.path().join("nested/deeper/session.json"));
    vault.save("record").unwrap();
    assert_eq!(vault.load().as_deref(), Some("record"));
}

#[test]
fn clear_removes_file() {
    let (_dir, vault) = temp_vault();
    vault.save("x").unwrap();
    vault.clear().unwrap();
    assert!(vault.load().is_none());
    assert!(!vault.path().exists());
}

#[test]
fn clear_when_missing_is_ok() {
    let (_dir, vault) = temp_vault();
    vault.clear().unwrap();
}

#[test]
fn save_overwrites_previous_record() {
    let (_dir, vault) = temp_vault();
    vault.save("first").unwrap();
    vault.save("second").unwrap();
    assert_eq!(vault.load().as_deref(), Some("second"));
}

// =============================================================================
// sibling handles
// =============================================================================

#[test]
fn sibling_handle_reads_same_path() {
    let (_dir, vault) = temp_vault();
    let sibling = vault.handle();
    vault.save("shared").unwrap();
    assert_eq!(sibling.load().as_deref(), Some("shared"));
}

#[tokio::test]
async fn sibling_handle_receives_change_events() {
    let (_dir, vault) = temp_vault();
    let sibling = vault.handle();
    let mut events = sibling.subscribe();

    vault.save("fresh").unwrap();

    let event = events.recv().await.unwrap();
    assert_eq!(event.writer, vault.handle_id());
    assert_eq!(event.value.as_deref(), Some("fresh"));
}
