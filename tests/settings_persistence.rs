use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};
use tempfile::tempdir;

use typewriter::app::App;
use typewriter::config::{ConfigStore, FileConfigStore, Settings, SettingsOverrides};
use typewriter::feedback::SilentFeedback;
use typewriter::texts::TextSource;
use typewriter::timer::ManualClock;

fn app_on(path: &std::path::Path, overrides: &SettingsOverrides) -> App<ManualClock> {
    App::with_parts(
        ManualClock::default(),
        StdRng::seed_from_u64(1),
        Box::new(FileConfigStore::with_path(path)),
        overrides,
        TextSource::default(),
        Box::new(SilentFeedback),
        None,
    )
}

fn ctrl(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::CONTROL)
}

#[test]
fn toggles_survive_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut app = app_on(&path, &SettingsOverrides::default());
    app.on_key(ctrl(KeyCode::Char('a')));
    app.on_key(ctrl(KeyCode::Up));
    app.on_key(ctrl(KeyCode::Up));
    drop(app);

    let app = app_on(&path, &SettingsOverrides::default());
    assert!(!app.settings().auto_advance);
    assert_eq!(app.settings().advance_delay_ms, 2000);
    assert!(!app.engine.settings().auto_advance);
}

#[test]
fn command_line_overrides_stay_out_of_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let overrides = SettingsOverrides {
        advance_delay_ms: Some(4000),
        show_stats: Some(false),
        ..SettingsOverrides::default()
    };

    let mut app = app_on(&path, &overrides);
    assert_eq!(app.settings().advance_delay_ms, 4000);
    app.on_key(ctrl(KeyCode::Char('s')));

    let saved = FileConfigStore::with_path(&path).load();
    assert_eq!(
        saved,
        Settings {
            sound_enabled: false,
            ..Settings::default()
        }
    );
}

#[test]
fn hand_edited_file_is_clamped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "advance_delay_ms": 10 }"#).unwrap();

    let app = app_on(&path, &SettingsOverrides::default());

    assert_eq!(app.settings().advance_delay_ms, 1000);
    assert!(app.settings().auto_advance);
}
