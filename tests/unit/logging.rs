use super::*;

#[test]
fn explicit_log_dir_wins() {
    let dir = log_dir_from(|var| (var == "KEYHIT_LOG_DIR").then(|| "/var/log/keyhit".to_string()));
    assert_eq!(dir, Some(PathBuf::from("/var/log/keyhit")));
}

#[cfg(all(unix, not(target_os = "macos")))]
#[test]
fn xdg_state_home_is_preferred_over_home() {
    let dir = log_dir_from(|var| match var {
        "XDG_STATE_HOME" => Some("/state".to_string()),
        "HOME" => Some("/home/me".to_string()),
        _ => None,
    });
    assert_eq!(dir, Some(PathBuf::from("/state/keyhit/logs")));

    let dir = log_dir_from(|var| (var == "HOME").then(|| "/home/me".to_string()));
    assert_eq!(dir, Some(PathBuf::from("/home/me/.local/state/keyhit/logs")));
}

#[test]
fn ensure_log_dir_creates_the_preferred_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let wanted = tmp.path().join("nested").join("logs");
    let dir = ensure_log_dir(Some(wanted.clone())).unwrap();
    assert_eq!(dir, wanted);
    assert!(dir.is_dir());
}

#[test]
fn ensure_log_dir_falls_back_to_temp() {
    let dir = ensure_log_dir(None).unwrap();
    assert!(dir.starts_with(std::env::temp_dir()));
    assert!(dir.is_dir());
}
