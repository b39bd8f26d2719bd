//! projectM 4 core and playlist C API, as far as the actor uses it.

#![allow(non_camel_case_types, dead_code)]

use std::ffi::{c_char, c_int, c_uint};

#[repr(C)]
pub struct projectm {
    _private: [u8; 0],
}

#[repr(C)]
pub struct projectm_playlist {
    _private: [u8; 0],
}

pub type projectm_handle = *mut projectm;
pub type projectm_playlist_handle = *mut projectm_playlist;

pub type projectm_channels = c_int;
pub const PROJECTM_MONO: projectm_channels = 1;
pub const PROJECTM_STEREO: projectm_channels = 2;

#[cfg_attr(feature = "link", link(name = "projectM-4"))]
extern "C" {
    pub fn projectm_create() -> projectm_handle;
    pub fn projectm_destroy(instance: projectm_handle);

    pub fn projectm_set_aspect_correction(instance: projectm_handle, enabled: bool);
    pub fn projectm_set_window_size(instance: projectm_handle, width: usize, height: usize);
    pub fn projectm_set_mesh_size(instance: projectm_handle, width: usize, height: usize);
    pub fn projectm_set_fps(instance: projectm_handle, fps: i32);
    pub fn projectm_set_preset_duration(instance: projectm_handle, seconds: f64);
    pub fn projectm_set_soft_cut_duration(instance: projectm_handle, seconds: f64);
    pub fn projectm_set_hard_cut_duration(instance: projectm_handle, seconds: f64);
    pub fn projectm_set_hard_cut_sensitivity(instance: projectm_handle, sensitivity: f32);
    pub fn projectm_set_texture_search_paths(
        instance: projectm_handle,
        texture_search_paths: *mut *const c_char,
        count: usize,
    );

    pub fn projectm_get_preset_locked(instance: projectm_handle) -> bool;
    pub fn projectm_set_preset_locked(instance: projectm_handle, lock: bool);
    pub fn projectm_get_beat_sensitivity(instance: projectm_handle) -> f32;
    pub fn projectm_set_beat_sensitivity(instance: projectm_handle, sensitivity: f32);

    /// `count` is the number of samples per channel.
    pub fn projectm_pcm_add_float(
        instance: projectm_handle,
        samples: *const f32,
        count: c_uint,
        channels: projectm_channels,
    );
    pub fn projectm_opengl_render_frame(instance: projectm_handle);
}

#[cfg_attr(feature = "link", link(name = "projectM-4-playlist"))]
extern "C" {
    pub fn projectm_playlist_create(instance: projectm_handle) -> projectm_playlist_handle;
    pub fn projectm_playlist_destroy(instance: projectm_playlist_handle);

    pub fn projectm_playlist_add_path(
        instance: projectm_playlist_handle,
        path: *const c_char,
        recurse_subdirs: bool,
        allow_duplicates: bool,
    ) -> u32;
    pub fn projectm_playlist_set_shuffle(instance: projectm_playlist_handle, shuffle: bool);
    pub fn projectm_playlist_play_next(instance: projectm_playlist_handle, hard_cut: bool) -> u32;
    pub fn projectm_playlist_play_previous(
        instance: projectm_playlist_handle,
        hard_cut: bool,
    ) -> u32;
    pub fn projectm_playlist_play_last(instance: projectm_playlist_handle, hard_cut: bool) -> u32;
}
