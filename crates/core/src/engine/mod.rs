//! Seams over the external rendering engine and its preset playlist.
//!
//! The actor only ever talks to these traits. The plug-in crate implements
//! them over the projectM C API; [`headless`] implements them in memory so the
//! lifecycle can be driven without a GL context.

use std::path::{Path, PathBuf};

use crate::Result;

pub mod headless;

pub use headless::{EngineCall, HeadlessBackend, HeadlessEngine, HeadlessPlaylist, Journal};

/// Channel layout of the PCM data handed to [`Engine::add_pcm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Mono,
    /// Interleaved `L R L R ...`.
    Stereo,
}

impl Channels {
    pub fn count(self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

/// One rendering engine instance.
pub trait Engine {
    fn set_aspect_correction(&mut self, enabled: bool);
    fn set_window_size(&mut self, width: u32, height: u32);
    fn set_mesh_size(&mut self, width: u32, height: u32);
    fn set_fps(&mut self, fps: u32);
    fn set_preset_duration(&mut self, seconds: f64);
    fn set_soft_cut_duration(&mut self, seconds: f64);
    fn set_hard_cut_duration(&mut self, seconds: f64);
    fn set_hard_cut_sensitivity(&mut self, sensitivity: f32);
    /// Replaces the directories searched for preset textures.
    fn set_texture_search_paths(&mut self, paths: &[PathBuf]) -> Result<()>;

    fn preset_locked(&self) -> bool;
    fn set_preset_locked(&mut self, locked: bool);
    fn beat_sensitivity(&self) -> f32;
    fn set_beat_sensitivity(&mut self, sensitivity: f32);

    /// Queues PCM data; `samples.len()` must be a multiple of the channel count.
    fn add_pcm(&mut self, samples: &[f32], channels: Channels);
    fn render_frame(&mut self);
}

/// The preset playlist bound to an [`Engine`].
pub trait Playlist {
    /// Adds presets found under `path` and returns how many were added.
    fn add_path(&mut self, path: &Path, recursive: bool, allow_duplicates: bool) -> Result<u32>;
    fn set_shuffle(&mut self, shuffle: bool);
    fn play_next(&mut self, hard_cut: bool);
    fn play_previous(&mut self, hard_cut: bool);
    /// Steps back through the history of played presets.
    fn play_last(&mut self, hard_cut: bool);
}

/// Creates engines and playlists. Both are destroyed when dropped, so a
/// playlist must be dropped before the engine it was created from.
pub trait Backend {
    type Engine: Engine;
    type Playlist: Playlist;

    fn create_engine(&mut self) -> Option<Self::Engine>;
    fn create_playlist(&mut self, engine: &mut Self::Engine) -> Option<Self::Playlist>;
}
