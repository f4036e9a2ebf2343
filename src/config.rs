use std::{io, path::Path};

use ini::Ini;
use thiserror::Error;

use crate::{hit_objects::Combo, rgb::Rgb};

const MAX_COMBO_COLOURS: usize = 8;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("parsing .ini file: `{0}`")]
    ParseError(#[from] ini::Error),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

impl ConfigError {
    fn invalid(key: &str, value: &str) -> Self {
        Self::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Multiplier on top of the map hit sound volume
    pub hit_sound_volume: f32,
    /// Record every cursor movement, needed for slider ticks
    pub track_input: bool,
    pub combo_colours: Vec<Rgb>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hit_sound_volume: 1.0,
            track_input: true,
            combo_colours: vec![
                Rgb::new(255, 192, 0),
                Rgb::new(0, 202, 0),
                Rgb::new(18, 124, 255),
                Rgb::new(242, 24, 57),
            ],
        }
    }
}

impl Config {
    pub fn parse(bytes: &[u8]) -> Result<Self, ConfigError> {
        let ini = Ini::read_from(&mut io::Cursor::new(bytes))?;
        Self::from_ini(&ini)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path.as_ref())?;

        tracing::info!("Loaded config from {}", path.as_ref().display());

        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = ini.get_from(Some("Gameplay"), "HitSoundVolume") {
            let volume: f32 = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("HitSoundVolume", value))?;

            config.hit_sound_volume = volume.clamp(0.0, 1.0);
        }

        if let Some(value) = ini.get_from(Some("Gameplay"), "TrackInput") {
            config.track_input = match value.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => return Err(ConfigError::invalid("TrackInput", value)),
            };
        }

        let mut colours = Vec::new();

        for i in 1..=MAX_COMBO_COLOURS {
            let key = format!("Combo{i}");

            if let Some(value) = ini.get_from(Some("Colours"), key.as_str()) {
                let colour = Rgb::parse(value).ok_or_else(|| ConfigError::invalid(&key, value))?;
                colours.push(colour);
            }
        }

        if !colours.is_empty() {
            config.combo_colours = colours;
        }

        Ok(config)
    }

    pub fn combo_colour(&self, combo: &Combo) -> Rgb {
        if self.combo_colours.is_empty() {
            return Rgb::new(255, 255, 255);
        }

        self.combo_colours[combo.colour_index % self.combo_colours.len()]
    }
}
