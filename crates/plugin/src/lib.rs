//! libvisual actor plug-in that drives projectM.
//!
//! The host discovers the plug-in through [`get_plugin_info`] and then calls
//! the `lv_projectm_*` callbacks serially from one thread. All behaviour lives
//! in `projectm-actor-core`; this crate only adapts raw pointers.
//!
//! Enable the `link` feature to link libprojectM-4 and libvisual-0.4 at build
//! time. Without it the symbols are resolved from the host process when the
//! module is loaded.

mod backend;
mod callbacks;
mod ffi;
mod host;

use std::{
    cell::UnsafeCell,
    ffi::{c_char, c_int, CString},
    mem,
    sync::OnceLock,
};

use projectm_actor_core::{
    info::{GlAttribute, VideoDepth},
    PluginInfo,
};

use crate::ffi::libvisual as lv;

pub use backend::{ProjectmBackend, ProjectmEngine, ProjectmPlaylist};
pub use callbacks::{
    lv_projectm_cleanup, lv_projectm_dimension, lv_projectm_events, lv_projectm_init,
    lv_projectm_palette, lv_projectm_render, lv_projectm_requisition,
};

/// Checked by the libvisual loader before `get_plugin_info` is called.
#[no_mangle]
#[allow(non_upper_case_globals)]
pub static __lv_plugin_libvisual_api_version: c_int = lv::VISUAL_PLUGIN_API_VERSION;

struct Registration {
    info: UnsafeCell<lv::VisPluginInfo>,
    actor: UnsafeCell<lv::VisActorPlugin>,
    _strings: Vec<CString>,
}

// SAFETY: built once and afterwards only touched by the host, which drives
// the plug-in from a single thread.
unsafe impl Send for Registration {}
unsafe impl Sync for Registration {}

static REGISTRATION: OnceLock<Box<Registration>> = OnceLock::new();

impl Registration {
    fn new(meta: &PluginInfo) -> Box<Self> {
        let strings: Vec<CString> = [
            meta.plugin_type,
            meta.plugname,
            meta.name,
            meta.author,
            meta.version,
            meta.about,
            meta.help,
        ]
        .into_iter()
        .map(|text| CString::new(text).unwrap_or_default())
        .collect();
        let text = |index: usize| strings[index].as_ptr() as *mut c_char;

        // SAFETY: both are plain C structs for which all-zero means "unset".
        let mut actor: lv::VisActorPlugin = unsafe { mem::zeroed() };
        let mut info: lv::VisPluginInfo = unsafe { mem::zeroed() };

        actor.requisition = Some(lv_projectm_requisition);
        actor.palette = Some(lv_projectm_palette);
        actor.render = Some(lv_projectm_render);
        actor.vidoptions.depth = match meta.depth {
            VideoDepth::Gl => lv::VISUAL_VIDEO_DEPTH_GL,
        };
        for &(attribute, value) in meta.gl_attributes {
            let attribute = gl_attribute(attribute);
            let entry = &mut actor.vidoptions.gl_attributes[attribute as usize];
            entry.attribute = attribute;
            entry.value = value;
        }

        info.kind = text(0);
        info.plugname = text(1);
        info.name = text(2);
        info.author = text(3);
        info.version = text(4);
        info.about = text(5);
        info.help = text(6);
        info.init = Some(lv_projectm_init);
        info.cleanup = Some(lv_projectm_cleanup);
        info.events = Some(lv_projectm_events);

        let registration = Box::new(Self {
            info: UnsafeCell::new(info),
            actor: UnsafeCell::new(actor),
            _strings: strings,
        });
        // SAFETY: the box is never moved out of, so the actor's address is stable.
        unsafe { (*registration.info.get()).plugin = registration.actor.get().cast() };
        registration
    }
}

fn gl_attribute(attribute: GlAttribute) -> lv::VisGLAttribute {
    match attribute {
        GlAttribute::DoubleBuffer => lv::VISUAL_GL_ATTRIBUTE_DOUBLEBUFFER,
        GlAttribute::RedSize => lv::VISUAL_GL_ATTRIBUTE_RED_SIZE,
        GlAttribute::GreenSize => lv::VISUAL_GL_ATTRIBUTE_GREEN_SIZE,
        GlAttribute::BlueSize => lv::VISUAL_GL_ATTRIBUTE_BLUE_SIZE,
        GlAttribute::AlphaSize => lv::VISUAL_GL_ATTRIBUTE_ALPHA_SIZE,
        GlAttribute::DepthSize => lv::VISUAL_GL_ATTRIBUTE_DEPTH_SIZE,
    }
}

/// Entry point of the libvisual plug-in registry: one actor plug-in.
///
/// # Safety
///
/// `count` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn get_plugin_info(count: *mut c_int) -> *const lv::VisPluginInfo {
    let registration = REGISTRATION.get_or_init(|| Registration::new(&PluginInfo::projectm()));
    if let Some(count) = count.as_mut() {
        *count = 1;
    }
    registration.info.get()
}
