use super::*;

#[test]
fn test_is_song_play_exact_match() {
    let event = LogEvent {
        page: Some("NextSong".to_string()),
        ..Default::default()
    };
    assert!(event.is_song_play());
}

#[test]
fn test_is_song_play_rejects_other_pages() {
    for page in ["PageView", "Home", "nextsong", "NextSong "] {
        let event = LogEvent {
            page: Some(page.to_string()),
            ..Default::default()
        };
        assert!(!event.is_song_play(), "{page:?} should not be a play");
    }
}

#[test]
fn test_is_song_play_null_page() {
    assert!(!LogEvent::default().is_song_play());
}

#[test]
fn test_log_event_deserializes_camel_case() {
    let json = r#"{"page":"NextSong","userId":"7","firstName":"Ada","ts":1542837407796,"sessionId":99,"userAgent":"UA"}"#;
    let event: LogEvent = serde_json::from_str(json).unwrap();
    assert_eq!(event.user_id.as_deref(), Some("7"));
    assert_eq!(event.first_name.as_deref(), Some("Ada"));
    assert_eq!(event.ts, Some(1542837407796));
    assert_eq!(event.session_id, Some(99));
    assert_eq!(event.user_agent.as_deref(), Some("UA"));
    assert_eq!(event.last_name, None);
}

#[test]
fn test_field_lists_match_serde_names() {
    let record = serde_json::to_value(SongRecord::default()).unwrap();
    let names: Vec<&str> = SongRecord::FIELDS.iter().map(|f| f.name).collect();
    let keys: Vec<&str> = record.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(names.len(), keys.len());
    assert!(names.iter().all(|n| keys.contains(n)));

    let event = serde_json::to_value(LogEvent::default()).unwrap();
    let names: Vec<&str> = LogEvent::FIELDS.iter().map(|f| f.name).collect();
    let keys: Vec<&str> = event.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(names.len(), keys.len());
    assert!(names.iter().all(|n| keys.contains(n)));
}
