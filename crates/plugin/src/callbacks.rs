//! The callbacks libvisual invokes. Each one recovers the actor stored in the
//! plug-in's private slot, forwards to it and turns the outcome into a status
//! code. Panics never cross the FFI boundary.

use std::{
    ffi::c_int,
    panic::{self, AssertUnwindSafe},
    ptr,
};

use projectm_actor_core::{
    requisition, status_code, ActorError, ConfigLocator, ProjectmActor, Result, STATUS_FAILURE,
};
use tracing_subscriber::EnvFilter;

use crate::{
    backend::ProjectmBackend,
    ffi::libvisual as lv,
    host::{poll_event, HostAudio, HostVideo},
};

type Actor = ProjectmActor<ProjectmBackend>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

fn guarded(callback: &'static str, body: impl FnOnce() -> Result<()>) -> c_int {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => {
            if let Err(err) = &result {
                tracing::error!(callback, error = %err, "callback failed");
            }
            status_code(&result)
        }
        Err(_) => {
            tracing::error!(callback, "callback panicked");
            STATUS_FAILURE
        }
    }
}

/// # Safety
///
/// `plugin` must be null or the plug-in object handed to a callback.
unsafe fn private_slot(plugin: *mut lv::VisPluginData) -> *mut Actor {
    if plugin.is_null() {
        return ptr::null_mut();
    }
    lv::visual_object_get_private(plugin.cast()).cast()
}

/// # Safety
///
/// As for [`private_slot`]; the returned borrow must not outlive the callback.
unsafe fn actor<'a>(plugin: *mut lv::VisPluginData) -> Result<&'a mut Actor> {
    private_slot(plugin)
        .as_mut()
        .ok_or(ActorError::NotInitialized)
}

/// Reads the settings, creates the engine and playlist, and stores the actor
/// in the plug-in's private slot. Nothing is stored when creation fails, and
/// a slot that already holds an actor is left untouched.
///
/// # Safety
///
/// Called by libvisual with its plug-in object.
#[no_mangle]
pub unsafe extern "C" fn lv_projectm_init(plugin: *mut lv::VisPluginData) -> c_int {
    init_tracing();

    guarded("init", || {
        if plugin.is_null() {
            return Err(ActorError::msg("host passed a null plug-in object"));
        }
        if !unsafe { private_slot(plugin) }.is_null() {
            return Err(ActorError::AlreadyInitialized);
        }

        let config = ConfigLocator::from_env().load();
        let mut actor = Box::new(Actor::new(ProjectmBackend, config));
        actor.init()?;

        unsafe { lv::visual_object_set_private(plugin.cast(), Box::into_raw(actor).cast()) };
        Ok(())
    })
}

/// # Safety
///
/// Called by libvisual with its plug-in object.
#[no_mangle]
pub unsafe extern "C" fn lv_projectm_cleanup(plugin: *mut lv::VisPluginData) -> c_int {
    guarded("cleanup", || {
        let slot = unsafe { private_slot(plugin) };
        if slot.is_null() {
            return Err(ActorError::NotInitialized);
        }

        unsafe { lv::visual_object_set_private(plugin.cast(), ptr::null_mut()) };
        let mut actor = unsafe { Box::from_raw(slot) };
        actor.cleanup()
    })
}

/// Raises the requested size to the actor's minimum.
///
/// # Safety
///
/// `width` and `height` must be null or valid for reads and writes.
#[no_mangle]
pub unsafe extern "C" fn lv_projectm_requisition(
    _plugin: *mut lv::VisPluginData,
    width: *mut c_int,
    height: *mut c_int,
) -> c_int {
    guarded("requisition", || {
        let (Some(width), Some(height)) = (unsafe { width.as_mut() }, unsafe { height.as_mut() })
        else {
            return Err(ActorError::msg("host passed a null size"));
        };

        (*width, *height) = requisition(*width, *height);
        Ok(())
    })
}

/// # Safety
///
/// Called by libvisual with its plug-in object and a live video.
#[no_mangle]
pub unsafe extern "C" fn lv_projectm_dimension(
    plugin: *mut lv::VisPluginData,
    video: *mut lv::VisVideo,
    width: c_int,
    height: c_int,
) -> c_int {
    guarded("dimension", || {
        let actor = unsafe { actor(plugin) }?;
        let mut video = unsafe { HostVideo::from_raw(video) }
            .ok_or_else(|| ActorError::msg("host passed a null video"))?;
        actor.dimension(&mut video, width, height)
    })
}

/// Drains the host's event queue.
///
/// # Safety
///
/// Called by libvisual with its plug-in object and event queue.
#[no_mangle]
pub unsafe extern "C" fn lv_projectm_events(
    plugin: *mut lv::VisPluginData,
    events: *mut lv::VisEventQueue,
) -> c_int {
    guarded("events", || {
        let actor = unsafe { actor(plugin) }?;
        if events.is_null() {
            return Ok(());
        }

        while let Some(polled) = unsafe { poll_event(events) } {
            actor.handle_event_with(polled.event, || unsafe {
                HostVideo::from_raw(polled.video)
            })?;
        }
        Ok(())
    })
}

/// projectM renders through GL, so there is never a palette.
///
/// # Safety
///
/// Called by libvisual; the argument is not used.
#[no_mangle]
pub unsafe extern "C" fn lv_projectm_palette(
    _plugin: *mut lv::VisPluginData,
) -> *mut lv::VisPalette {
    ptr::null_mut()
}

/// Feeds the current audio to projectM and renders one frame.
///
/// # Safety
///
/// Called by libvisual with its plug-in object, a live video and audio.
#[no_mangle]
pub unsafe extern "C" fn lv_projectm_render(
    plugin: *mut lv::VisPluginData,
    video: *mut lv::VisVideo,
    audio: *mut lv::VisAudio,
) -> c_int {
    guarded("render", || {
        let actor = unsafe { actor(plugin) }?;
        let mut video = unsafe { HostVideo::from_raw(video) }
            .ok_or_else(|| ActorError::msg("host passed a null video"))?;
        let mut audio = unsafe { HostAudio::from_raw(audio) }
            .ok_or_else(|| ActorError::msg("host passed a null audio"))?;
        actor.render(&mut video, &mut audio)
    })
}
