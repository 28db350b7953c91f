// Tests for configuration loading.

use call_captions::Config;
use std::time::Duration;

#[test]
fn test_load_config_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("call-captions.toml");
    std::fs::write(
        &path,
        r#"
[session]
language = "hi-IN"
caption_timeout_ms = 1500

[summarizer]
endpoint = "http://localhost:9000/summarize"
"#,
    )
    .unwrap();

    let cfg = Config::load(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.session.language, "hi-IN");
    assert_eq!(cfg.session.caption_timeout_ms, 1500);
    assert_eq!(cfg.summarizer.endpoint, "http://localhost:9000/summarize");

    let session = cfg.session_config();
    assert_eq!(session.language, "hi-IN");
    assert_eq!(session.caption_timeout, Duration::from_millis(1500));
}

#[test]
fn test_missing_config_is_an_error() {
    assert!(Config::load("/nonexistent/call-captions").is_err());
}
