use rosu::{
    config::{Config, ConfigError},
    hit_objects::Combo,
    rgb::Rgb,
};
use testdir::testdir;

const CONFIG: &str = "
[Gameplay]
HitSoundVolume = 0.4
TrackInput = 0

[Colours]
Combo1 = 255,0,0
Combo2 = 0, 255, 0
";

#[test]
fn test_config_parsing() {
    let config = Config::parse(CONFIG.as_bytes()).unwrap();

    assert_eq!(config.hit_sound_volume, 0.4);
    assert!(!config.track_input);
    assert_eq!(
        config.combo_colours,
        vec![Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)]
    );
}

#[test]
fn test_missing_sections_use_defaults() {
    let config = Config::parse(b"[Something]\nKey = 1\n").unwrap();

    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_values() {
    let err = Config::parse(b"[Gameplay]\nTrackInput = maybe\n").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "TrackInput"));

    let err = Config::parse(b"[Colours]\nCombo1 = 255,0\n").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "Combo1"));
}

#[test]
fn test_volume_is_clamped() {
    let config = Config::parse(b"[Gameplay]\nHitSoundVolume = 3\n").unwrap();

    assert_eq!(config.hit_sound_volume, 1.0);
}

#[test]
fn test_combo_colour_wraps() {
    let config = Config::parse(CONFIG.as_bytes()).unwrap();

    let combo = Combo {
        number: 2,
        colour_index: 3,
        len: 1,
    };

    assert_eq!(config.combo_colour(&combo), Rgb::new(0, 255, 0));
}

#[test]
fn test_config_from_path() {
    let tmp_dir = testdir!();
    let path = tmp_dir.join("rosu.ini");

    std::fs::write(&path, CONFIG).unwrap();

    let config = Config::from_path(&path).unwrap();
    assert_eq!(config.hit_sound_volume, 0.4);

    assert!(Config::from_path(tmp_dir.join("missing.ini")).is_err());
}
