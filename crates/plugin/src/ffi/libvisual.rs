//! The slice of the libvisual 0.4 C API this plug-in touches.
//!
//! Structures the host allocates are declared only up to the last field that
//! is read. Structures the plug-in allocates itself (`VisEvent`, `VisBuffer`,
//! `VisPluginInfo`, `VisActorPlugin`) carry their full layout, padded where
//! the trailing members are never used.

#![allow(non_camel_case_types, dead_code)]

use std::ffi::{c_char, c_int, c_void, CStr};

/// Value of `VISUAL_PLUGIN_API_VERSION` in the 0.4 headers.
pub const VISUAL_PLUGIN_API_VERSION: c_int = 3000;

pub const VISUAL_AUDIO_CHANNEL_LEFT: &CStr = c"front left 1";
pub const VISUAL_AUDIO_CHANNEL_RIGHT: &CStr = c"front right 1";

pub type VisEventType = c_int;
pub const VISUAL_EVENT_KEYDOWN: VisEventType = 2;
pub const VISUAL_EVENT_KEYUP: VisEventType = 3;
pub const VISUAL_EVENT_RESIZE: VisEventType = 8;

pub type VisVideoDepth = c_int;
pub const VISUAL_VIDEO_DEPTH_GL: VisVideoDepth = 16;

pub type VisGLAttribute = c_int;
pub const VISUAL_GL_ATTRIBUTE_DOUBLEBUFFER: VisGLAttribute = 4;
pub const VISUAL_GL_ATTRIBUTE_RED_SIZE: VisGLAttribute = 7;
pub const VISUAL_GL_ATTRIBUTE_GREEN_SIZE: VisGLAttribute = 8;
pub const VISUAL_GL_ATTRIBUTE_BLUE_SIZE: VisGLAttribute = 9;
pub const VISUAL_GL_ATTRIBUTE_ALPHA_SIZE: VisGLAttribute = 10;
pub const VISUAL_GL_ATTRIBUTE_DEPTH_SIZE: VisGLAttribute = 11;
pub const VISUAL_GL_ATTRIBUTE_LAST: usize = 17;

pub type VisObjectDtorFunc = Option<unsafe extern "C" fn(object: *mut VisObject) -> c_int>;

#[repr(C)]
pub struct VisObject {
    pub allocated: c_int,
    pub refcount: c_int,
    pub dtor: VisObjectDtorFunc,
    pub private: *mut c_void,
}

/// Opaque; every plug-in object starts with a [`VisObject`].
#[repr(C)]
pub struct VisPluginData {
    _private: [u8; 0],
}

#[repr(C)]
pub struct VisEventQueue {
    _private: [u8; 0],
}

#[repr(C)]
pub struct VisAudio {
    _private: [u8; 0],
}

#[repr(C)]
pub struct VisPalette {
    _private: [u8; 0],
}

/// Leading fields of `struct _VisVideo`.
#[repr(C)]
pub struct VisVideo {
    pub object: VisObject,
    pub depth: VisVideoDepth,
    pub width: c_int,
    pub height: c_int,
    pub bpp: c_int,
    pub pitch: c_int,
    pub buffer: *mut VisBuffer,
    pub pixel_rows: *mut *mut c_void,
    pub pal: *mut VisPalette,
    /// Set only when this video is a sub-region of another one.
    pub parent: *mut VisVideo,
}

pub type VisBufferDestroyerFunc = Option<unsafe extern "C" fn(buffer: *mut VisBuffer)>;

#[repr(C)]
pub struct VisBuffer {
    pub object: VisObject,
    pub allocated: c_int,
    pub destroyer: VisBufferDestroyerFunc,
    pub data: *mut c_void,
    pub datasize: usize,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct VisKeySym {
    pub sym: c_int,
    pub modifiers: c_int,
}

#[repr(C)]
pub struct VisEventKeyboard {
    pub object: VisObject,
    pub kind: VisEventType,
    pub keysym: VisKeySym,
}

#[repr(C)]
pub struct VisEventResize {
    pub object: VisObject,
    pub kind: VisEventType,
    pub video: *mut VisVideo,
    pub width: c_int,
    pub height: c_int,
}

#[repr(C)]
pub union VisEventData {
    pub keyboard: std::mem::ManuallyDrop<VisEventKeyboard>,
    pub resize: std::mem::ManuallyDrop<VisEventResize>,
    _reserved: [u64; 16],
}

#[repr(C)]
pub struct VisEvent {
    pub object: VisObject,
    pub kind: VisEventType,
    pub event: VisEventData,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct VisGLAttributeEntry {
    pub attribute: VisGLAttribute,
    pub value: c_int,
    pub mutated: c_int,
}

#[repr(C)]
pub struct VisVideoAttributeOptions {
    pub depth: VisVideoDepth,
    pub gl_attributes: [VisGLAttributeEntry; VISUAL_GL_ATTRIBUTE_LAST],
}

pub type VisPluginInitFunc = Option<unsafe extern "C" fn(plugin: *mut VisPluginData) -> c_int>;
pub type VisPluginCleanupFunc = Option<unsafe extern "C" fn(plugin: *mut VisPluginData) -> c_int>;
pub type VisPluginEventsFunc =
    Option<unsafe extern "C" fn(plugin: *mut VisPluginData, events: *mut VisEventQueue) -> c_int>;
pub type VisPluginActorRequisitionFunc = Option<
    unsafe extern "C" fn(plugin: *mut VisPluginData, width: *mut c_int, height: *mut c_int) -> c_int,
>;
pub type VisPluginActorPaletteFunc =
    Option<unsafe extern "C" fn(plugin: *mut VisPluginData) -> *mut VisPalette>;
pub type VisPluginActorRenderFunc = Option<
    unsafe extern "C" fn(
        plugin: *mut VisPluginData,
        video: *mut VisVideo,
        audio: *mut VisAudio,
    ) -> c_int,
>;

#[repr(C)]
pub struct VisActorPlugin {
    pub object: VisObject,
    pub requisition: VisPluginActorRequisitionFunc,
    pub palette: VisPluginActorPaletteFunc,
    pub render: VisPluginActorRenderFunc,
    pub vidoptions: VisVideoAttributeOptions,
    /// `VisSongInfo`, filled in by the host.
    pub songinfo: [u64; 64],
}

#[repr(C)]
pub struct VisPluginInfo {
    pub object: VisObject,
    pub struct_size: u32,
    pub api_version: u32,
    pub kind: *mut c_char,
    pub plugname: *mut c_char,
    pub name: *mut c_char,
    pub author: *mut c_char,
    pub version: *mut c_char,
    pub about: *mut c_char,
    pub help: *mut c_char,
    pub license: *mut c_char,
    pub init: VisPluginInitFunc,
    pub cleanup: VisPluginCleanupFunc,
    pub events: VisPluginEventsFunc,
    pub flags: c_int,
    pub plugin: *mut VisObject,
}

#[cfg_attr(feature = "link", link(name = "visual-0.4"))]
extern "C" {
    pub fn visual_object_get_private(object: *mut VisObject) -> *mut c_void;
    pub fn visual_object_set_private(object: *mut VisObject, private: *mut c_void) -> c_int;

    pub fn visual_video_set_dimension(video: *mut VisVideo, width: c_int, height: c_int) -> c_int;

    pub fn visual_event_queue_poll(queue: *mut VisEventQueue, event: *mut VisEvent) -> c_int;

    pub fn visual_buffer_set_data_pair(
        buffer: *mut VisBuffer,
        data: *mut c_void,
        datasize: usize,
    ) -> c_int;
    pub fn visual_audio_get_sample(
        audio: *mut VisAudio,
        buffer: *mut VisBuffer,
        channelid: *mut c_char,
    ) -> c_int;
}
