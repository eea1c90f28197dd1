use super::*;

#[tokio::test]
async fn ensure_session_registers_key_as_live() {
    let fake = FakeSessionRegistry::new();
    let key: SessionKey = "agent:main:subagent:demo-developer-medior-cordelia".into();
    fake.ensure_session(&key, "model-medium", "Demo", 1_000).await.unwrap();
    assert!(fake.list_live_session_keys().await.unwrap().contains(&key));
}

#[tokio::test]
async fn delete_session_removes_it_from_live_set() {
    let fake = FakeSessionRegistry::new();
    let key: SessionKey = "agent:main:subagent:demo-developer-medior-cordelia".into();
    fake.add_live_key(key.clone());
    fake.delete_session(&key).await.unwrap();
    assert!(!fake.list_live_session_keys().await.unwrap().contains(&key));
}

#[tokio::test]
async fn set_unknown_reports_no_information() {
    let fake = FakeSessionRegistry::new();
    fake.set_unknown();
    assert!(fake.list_live_session_keys().await.is_none());
}

#[tokio::test]
async fn calls_are_recorded_in_order() {
    let fake = FakeSessionRegistry::new();
    let key: SessionKey = "agent:main:subagent:demo-developer-medior-cordelia".into();
    fake.ensure_session(&key, "model-medium", "Demo", 1_000).await.unwrap();
    fake.send_to_session(&key, "go", SendOptions::default()).await.unwrap();
    assert_eq!(fake.calls().len(), 2);
}
