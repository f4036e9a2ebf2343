pub mod config;
pub mod events;
pub mod hit_objects;
pub mod history;
pub mod map_state;
pub mod math;
pub mod osu_input;
pub mod processor;
pub mod rgb;
pub mod scoring;
pub mod timeline;
