//! In-memory engine and playlist that journal every call, for tests and the
//! simulator.

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{Backend, Channels, Engine, Playlist};
use crate::{ActorError, Result};

const MIN_BEAT_SENSITIVITY: f32 = 0.0;
const MAX_BEAT_SENSITIVITY: f32 = 5.0;
const PRESET_EXTENSIONS: [&str; 2] = ["milk", "prjm"];
const SHUFFLE_SEED: u64 = 0x2545_f491_4f6c_dd1d;

/// A single call made against the headless engine or playlist.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    CreateEngine,
    DestroyEngine,
    CreatePlaylist,
    DestroyPlaylist,
    SetAspectCorrection(bool),
    SetWindowSize(u32, u32),
    SetMeshSize(u32, u32),
    SetFps(u32),
    SetPresetDuration(f64),
    SetSoftCutDuration(f64),
    SetHardCutDuration(f64),
    SetHardCutSensitivity(f32),
    SetTextureSearchPaths(Vec<PathBuf>),
    SetPresetLocked(bool),
    SetBeatSensitivity(f32),
    AddPcm { frames: usize, channels: Channels },
    RenderFrame,
    AddPath {
        path: PathBuf,
        recursive: bool,
        allow_duplicates: bool,
    },
    SetShuffle(bool),
    PlayNext { hard_cut: bool },
    PlayPrevious { hard_cut: bool },
    PlayLast { hard_cut: bool },
}

/// Shared, append-only log of [`EngineCall`]s.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    calls: Rc<RefCell<Vec<EngineCall>>>,
}

impl Journal {
    pub fn record(&self, call: EngineCall) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(*call)).count()
    }

    pub fn contains(&self, call: &EngineCall) -> bool {
        self.calls.borrow().iter().any(|recorded| recorded == call)
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

/// In-memory [`Backend`]. Creation and path failures can be injected to
/// exercise the actor's error paths.
#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    journal: Journal,
    fail_engine: bool,
    fail_playlist: bool,
    fail_paths: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_engine_creation(mut self) -> Self {
        self.fail_engine = true;
        self
    }

    pub fn failing_playlist_creation(mut self) -> Self {
        self.fail_playlist = true;
        self
    }

    /// Texture and preset paths are rejected as [`ActorError::InvalidPath`].
    pub fn failing_paths(mut self) -> Self {
        self.fail_paths = true;
        self
    }

    /// The journal shared with every engine and playlist this backend creates.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

impl Backend for HeadlessBackend {
    type Engine = HeadlessEngine;
    type Playlist = HeadlessPlaylist;

    fn create_engine(&mut self) -> Option<HeadlessEngine> {
        self.journal.record(EngineCall::CreateEngine);
        if self.fail_engine {
            return None;
        }
        Some(HeadlessEngine::new(self.journal.clone(), self.fail_paths))
    }

    fn create_playlist(&mut self, _engine: &mut HeadlessEngine) -> Option<HeadlessPlaylist> {
        self.journal.record(EngineCall::CreatePlaylist);
        if self.fail_playlist {
            return None;
        }
        Some(HeadlessPlaylist::new(self.journal.clone(), self.fail_paths))
    }
}

/// Engine stand-in that keeps the state a real engine would expose.
#[derive(Debug)]
pub struct HeadlessEngine {
    journal: Journal,
    window_size: (u32, u32),
    mesh_size: (u32, u32),
    fps: u32,
    texture_paths: Vec<PathBuf>,
    preset_locked: bool,
    beat_sensitivity: f32,
    pcm_frames: usize,
    frames_rendered: u64,
    fail_paths: bool,
}

impl HeadlessEngine {
    fn new(journal: Journal, fail_paths: bool) -> Self {
        Self {
            journal,
            window_size: (0, 0),
            mesh_size: (0, 0),
            fps: 0,
            texture_paths: Vec::new(),
            preset_locked: false,
            beat_sensitivity: 1.0,
            pcm_frames: 0,
            frames_rendered: 0,
            fail_paths,
        }
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    pub fn mesh_size(&self) -> (u32, u32) {
        self.mesh_size
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn texture_paths(&self) -> &[PathBuf] {
        &self.texture_paths
    }

    /// Total PCM frames (samples per channel) received so far.
    pub fn pcm_frames(&self) -> usize {
        self.pcm_frames
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl Engine for HeadlessEngine {
    fn set_aspect_correction(&mut self, enabled: bool) {
        self.journal.record(EngineCall::SetAspectCorrection(enabled));
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        self.journal.record(EngineCall::SetWindowSize(width, height));
        self.window_size = (width, height);
    }

    fn set_mesh_size(&mut self, width: u32, height: u32) {
        self.journal.record(EngineCall::SetMeshSize(width, height));
        self.mesh_size = (width, height);
    }

    fn set_fps(&mut self, fps: u32) {
        self.journal.record(EngineCall::SetFps(fps));
        self.fps = fps;
    }

    fn set_preset_duration(&mut self, seconds: f64) {
        self.journal.record(EngineCall::SetPresetDuration(seconds));
    }

    fn set_soft_cut_duration(&mut self, seconds: f64) {
        self.journal.record(EngineCall::SetSoftCutDuration(seconds));
    }

    fn set_hard_cut_duration(&mut self, seconds: f64) {
        self.journal.record(EngineCall::SetHardCutDuration(seconds));
    }

    fn set_hard_cut_sensitivity(&mut self, sensitivity: f32) {
        self.journal.record(EngineCall::SetHardCutSensitivity(sensitivity));
    }

    fn set_texture_search_paths(&mut self, paths: &[PathBuf]) -> Result<()> {
        self.journal
            .record(EngineCall::SetTextureSearchPaths(paths.to_vec()));
        if self.fail_paths {
            let path = paths.first().cloned().unwrap_or_default();
            return Err(ActorError::InvalidPath(path));
        }
        self.texture_paths = paths.to_vec();
        Ok(())
    }

    fn preset_locked(&self) -> bool {
        self.preset_locked
    }

    fn set_preset_locked(&mut self, locked: bool) {
        self.journal.record(EngineCall::SetPresetLocked(locked));
        self.preset_locked = locked;
    }

    fn beat_sensitivity(&self) -> f32 {
        self.beat_sensitivity
    }

    fn set_beat_sensitivity(&mut self, sensitivity: f32) {
        self.journal.record(EngineCall::SetBeatSensitivity(sensitivity));
        self.beat_sensitivity = sensitivity.clamp(MIN_BEAT_SENSITIVITY, MAX_BEAT_SENSITIVITY);
    }

    fn add_pcm(&mut self, samples: &[f32], channels: Channels) {
        let frames = samples.len() / channels.count();
        self.journal.record(EngineCall::AddPcm { frames, channels });
        self.pcm_frames += frames;
    }

    fn render_frame(&mut self) {
        self.journal.record(EngineCall::RenderFrame);
        self.frames_rendered += 1;
    }
}

impl Drop for HeadlessEngine {
    fn drop(&mut self) {
        self.journal.record(EngineCall::DestroyEngine);
    }
}

/// Playlist stand-in over the preset files found on disk.
#[derive(Debug)]
pub struct HeadlessPlaylist {
    journal: Journal,
    items: Vec<PathBuf>,
    current: Option<usize>,
    history: Vec<usize>,
    shuffle: bool,
    rng: StdRng,
    fail_paths: bool,
}

impl HeadlessPlaylist {
    fn new(journal: Journal, fail_paths: bool) -> Self {
        Self {
            journal,
            items: Vec::new(),
            current: None,
            history: Vec::new(),
            shuffle: false,
            rng: StdRng::seed_from_u64(SHUFFLE_SEED),
            fail_paths,
        }
    }

    pub fn items(&self) -> &[PathBuf] {
        &self.items
    }

    pub fn current(&self) -> Option<&Path> {
        self.current.map(|index| self.items[index].as_path())
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    fn jump_to(&mut self, index: usize) {
        if let Some(previous) = self.current {
            self.history.push(previous);
        }
        self.current = Some(index);
    }

    fn step(&mut self, forward: bool) {
        let len = self.items.len();
        if len == 0 {
            return;
        }

        let index = if self.shuffle {
            self.rng.gen_range(0..len)
        } else {
            match (self.current, forward) {
                (None, _) => 0,
                (Some(current), true) => (current + 1) % len,
                (Some(current), false) => (current + len - 1) % len,
            }
        };
        self.jump_to(index);
    }
}

impl Playlist for HeadlessPlaylist {
    fn add_path(&mut self, path: &Path, recursive: bool, allow_duplicates: bool) -> Result<u32> {
        self.journal.record(EngineCall::AddPath {
            path: path.to_path_buf(),
            recursive,
            allow_duplicates,
        });
        if self.fail_paths {
            return Err(ActorError::InvalidPath(path.to_path_buf()));
        }

        let mut found = Vec::new();
        collect_presets(path, recursive, &mut found);
        found.sort();

        let mut added = 0;
        for preset in found {
            if !allow_duplicates && self.items.contains(&preset) {
                continue;
            }
            self.items.push(preset);
            added += 1;
        }
        Ok(added)
    }

    fn set_shuffle(&mut self, shuffle: bool) {
        self.journal.record(EngineCall::SetShuffle(shuffle));
        self.shuffle = shuffle;
    }

    fn play_next(&mut self, hard_cut: bool) {
        self.journal.record(EngineCall::PlayNext { hard_cut });
        self.step(true);
    }

    fn play_previous(&mut self, hard_cut: bool) {
        self.journal.record(EngineCall::PlayPrevious { hard_cut });
        self.step(false);
    }

    fn play_last(&mut self, hard_cut: bool) {
        self.journal.record(EngineCall::PlayLast { hard_cut });
        if let Some(index) = self.history.pop() {
            self.current = Some(index);
        }
    }
}

impl Drop for HeadlessPlaylist {
    fn drop(&mut self) {
        self.journal.record(EngineCall::DestroyPlaylist);
    }
}

// Unreadable directories contribute nothing, the same as an empty one.
fn collect_presets(dir: &Path, recursive: bool, found: &mut Vec<PathBuf>) {
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if recursive {
                    collect_presets(&path, recursive, found);
                }
            } else if is_preset(&path) {
                found.push(path);
            }
        }
    }
}

fn is_preset(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            PRESET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}
