//! [`Backend`] over the projectM C API.

use std::{
    ffi::{c_char, c_uint, CString},
    path::{Path, PathBuf},
    ptr::NonNull,
};

use projectm_actor_core::{ActorError, Backend, Channels, Engine, Playlist, Result};

use crate::ffi::projectm as sys;

/// Creates real projectM instances. Needs a current GL context.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectmBackend;

impl Backend for ProjectmBackend {
    type Engine = ProjectmEngine;
    type Playlist = ProjectmPlaylist;

    fn create_engine(&mut self) -> Option<ProjectmEngine> {
        // SAFETY: no preconditions besides a current GL context, which the
        // host provides before calling `init`.
        let handle = unsafe { sys::projectm_create() };
        NonNull::new(handle).map(|handle| ProjectmEngine { handle })
    }

    fn create_playlist(&mut self, engine: &mut ProjectmEngine) -> Option<ProjectmPlaylist> {
        // SAFETY: `engine` holds a live instance and outlives the playlist.
        let handle = unsafe { sys::projectm_playlist_create(engine.raw()) };
        NonNull::new(handle).map(|handle| ProjectmPlaylist { handle })
    }
}

/// Owned `projectm_handle`, destroyed on drop.
#[derive(Debug)]
pub struct ProjectmEngine {
    handle: NonNull<sys::projectm>,
}

impl ProjectmEngine {
    fn raw(&self) -> sys::projectm_handle {
        self.handle.as_ptr()
    }
}

// SAFETY for every call below: `self.handle` is a live instance created by
// `projectm_create` and only destroyed in `Drop`.
impl Engine for ProjectmEngine {
    fn set_aspect_correction(&mut self, enabled: bool) {
        unsafe { sys::projectm_set_aspect_correction(self.raw(), enabled) }
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        unsafe { sys::projectm_set_window_size(self.raw(), width as usize, height as usize) }
    }

    fn set_mesh_size(&mut self, width: u32, height: u32) {
        unsafe { sys::projectm_set_mesh_size(self.raw(), width as usize, height as usize) }
    }

    fn set_fps(&mut self, fps: u32) {
        let fps = i32::try_from(fps).unwrap_or(i32::MAX);
        unsafe { sys::projectm_set_fps(self.raw(), fps) }
    }

    fn set_preset_duration(&mut self, seconds: f64) {
        unsafe { sys::projectm_set_preset_duration(self.raw(), seconds) }
    }

    fn set_soft_cut_duration(&mut self, seconds: f64) {
        unsafe { sys::projectm_set_soft_cut_duration(self.raw(), seconds) }
    }

    fn set_hard_cut_duration(&mut self, seconds: f64) {
        unsafe { sys::projectm_set_hard_cut_duration(self.raw(), seconds) }
    }

    fn set_hard_cut_sensitivity(&mut self, sensitivity: f32) {
        unsafe { sys::projectm_set_hard_cut_sensitivity(self.raw(), sensitivity) }
    }

    fn set_texture_search_paths(&mut self, paths: &[PathBuf]) -> Result<()> {
        let owned = paths
            .iter()
            .map(|path| path_to_cstring(path))
            .collect::<Result<Vec<_>>>()?;
        let mut pointers: Vec<*const c_char> = owned.iter().map(|path| path.as_ptr()).collect();

        // projectM copies the strings; `owned` only has to live for the call.
        unsafe {
            sys::projectm_set_texture_search_paths(
                self.raw(),
                pointers.as_mut_ptr(),
                pointers.len(),
            )
        }
        Ok(())
    }

    fn preset_locked(&self) -> bool {
        unsafe { sys::projectm_get_preset_locked(self.raw()) }
    }

    fn set_preset_locked(&mut self, locked: bool) {
        unsafe { sys::projectm_set_preset_locked(self.raw(), locked) }
    }

    fn beat_sensitivity(&self) -> f32 {
        unsafe { sys::projectm_get_beat_sensitivity(self.raw()) }
    }

    fn set_beat_sensitivity(&mut self, sensitivity: f32) {
        unsafe { sys::projectm_set_beat_sensitivity(self.raw(), sensitivity) }
    }

    fn add_pcm(&mut self, samples: &[f32], channels: Channels) {
        let layout = match channels {
            Channels::Mono => sys::PROJECTM_MONO,
            Channels::Stereo => sys::PROJECTM_STEREO,
        };
        let frames = c_uint::try_from(samples.len() / channels.count()).unwrap_or(c_uint::MAX);

        // `samples` holds at least `frames * channels` values.
        unsafe { sys::projectm_pcm_add_float(self.raw(), samples.as_ptr(), frames, layout) }
    }

    fn render_frame(&mut self) {
        unsafe { sys::projectm_opengl_render_frame(self.raw()) }
    }
}

impl Drop for ProjectmEngine {
    fn drop(&mut self) {
        // SAFETY: the handle is never used after this point.
        unsafe { sys::projectm_destroy(self.raw()) }
    }
}

/// Owned `projectm_playlist_handle`, destroyed on drop. Must be dropped before
/// the engine it was created from.
#[derive(Debug)]
pub struct ProjectmPlaylist {
    handle: NonNull<sys::projectm_playlist>,
}

impl ProjectmPlaylist {
    fn raw(&self) -> sys::projectm_playlist_handle {
        self.handle.as_ptr()
    }
}

// SAFETY for every call below: `self.handle` is a live playlist whose engine
// is still alive (the actor drops the playlist first).
impl Playlist for ProjectmPlaylist {
    fn add_path(&mut self, path: &Path, recursive: bool, allow_duplicates: bool) -> Result<u32> {
        let path = path_to_cstring(path)?;
        let added = unsafe {
            sys::projectm_playlist_add_path(self.raw(), path.as_ptr(), recursive, allow_duplicates)
        };
        Ok(added)
    }

    fn set_shuffle(&mut self, shuffle: bool) {
        unsafe { sys::projectm_playlist_set_shuffle(self.raw(), shuffle) }
    }

    fn play_next(&mut self, hard_cut: bool) {
        unsafe { sys::projectm_playlist_play_next(self.raw(), hard_cut) };
    }

    fn play_previous(&mut self, hard_cut: bool) {
        unsafe { sys::projectm_playlist_play_previous(self.raw(), hard_cut) };
    }

    fn play_last(&mut self, hard_cut: bool) {
        unsafe { sys::projectm_playlist_play_last(self.raw(), hard_cut) };
    }
}

impl Drop for ProjectmPlaylist {
    fn drop(&mut self) {
        // SAFETY: the handle is never used after this point.
        unsafe { sys::projectm_playlist_destroy(self.raw()) }
    }
}

fn path_to_cstring(path: &Path) -> Result<CString> {
    path.to_str()
        .and_then(|text| CString::new(text).ok())
        .ok_or_else(|| ActorError::InvalidPath(path.to_path_buf()))
}
