//! Adapters from libvisual objects to the core traits.

use std::{
    ffi::c_char,
    mem,
    ptr::{self, NonNull},
};

use projectm_actor_core::{AudioSource, Channel, Event, Key, VideoSurface};

use crate::ffi::libvisual as lv;

/// Borrowed `VisVideo` owned by the host.
pub struct HostVideo {
    video: NonNull<lv::VisVideo>,
}

impl HostVideo {
    /// # Safety
    ///
    /// `video` must be null or point to a live `VisVideo` for as long as the
    /// returned value is used.
    pub unsafe fn from_raw(video: *mut lv::VisVideo) -> Option<Self> {
        NonNull::new(video).map(|video| Self { video })
    }

    fn video(&self) -> &lv::VisVideo {
        // SAFETY: guaranteed by `from_raw`.
        unsafe { self.video.as_ref() }
    }
}

impl VideoSurface for HostVideo {
    fn size(&self) -> (i32, i32) {
        let video = self.video();
        (video.width, video.height)
    }

    fn parent_size(&self) -> Option<(i32, i32)> {
        // SAFETY: a non-null parent outlives its sub-region.
        let parent = unsafe { self.video().parent.as_ref() }?;
        Some((parent.width, parent.height))
    }

    fn set_dimension(&mut self, width: i32, height: i32) {
        // SAFETY: guaranteed by `from_raw`.
        unsafe { lv::visual_video_set_dimension(self.video.as_ptr(), width, height) };
    }
}

/// Borrowed `VisAudio` owned by the host.
pub struct HostAudio {
    audio: NonNull<lv::VisAudio>,
}

impl HostAudio {
    /// # Safety
    ///
    /// `audio` must be null or point to a live `VisAudio` for as long as the
    /// returned value is used.
    pub unsafe fn from_raw(audio: *mut lv::VisAudio) -> Option<Self> {
        NonNull::new(audio).map(|audio| Self { audio })
    }
}

impl AudioSource for HostAudio {
    fn read_channel(&mut self, channel: Channel, out: &mut [f32]) {
        let id = match channel {
            Channel::Left => lv::VISUAL_AUDIO_CHANNEL_LEFT,
            Channel::Right => lv::VISUAL_AUDIO_CHANNEL_RIGHT,
        };

        // SAFETY: an all-zero VisBuffer is a valid unallocated buffer; it only
        // borrows `out` for the duration of the two calls.
        unsafe {
            let mut buffer: lv::VisBuffer = mem::zeroed();
            lv::visual_buffer_set_data_pair(
                &mut buffer,
                out.as_mut_ptr().cast(),
                mem::size_of_val(out),
            );
            lv::visual_audio_get_sample(self.audio.as_ptr(), &mut buffer, id.as_ptr() as *mut c_char);
        }
    }
}

/// Event polled from the host. `video` is only set for resize events.
pub struct PolledEvent {
    pub event: Event,
    pub video: *mut lv::VisVideo,
}

/// Polls the next event from `queue`.
///
/// # Safety
///
/// `queue` must point to the live event queue handed to the `events` callback.
pub unsafe fn poll_event(queue: *mut lv::VisEventQueue) -> Option<PolledEvent> {
    let mut raw: lv::VisEvent = mem::zeroed();
    if lv::visual_event_queue_poll(queue, &mut raw) == 0 {
        return None;
    }

    let mut video = ptr::null_mut();
    let event = match raw.kind {
        lv::VISUAL_EVENT_KEYDOWN => Event::KeyDown(key(raw.event.keyboard.keysym.sym)),
        lv::VISUAL_EVENT_KEYUP => Event::KeyUp(key(raw.event.keyboard.keysym.sym)),
        lv::VISUAL_EVENT_RESIZE => {
            video = raw.event.resize.video;
            Event::Resize {
                width: raw.event.resize.width,
                height: raw.event.resize.height,
            }
        }
        _ => Event::Other,
    };
    Some(PolledEvent { event, video })
}

fn key(sym: i32) -> Key {
    u32::try_from(sym).map(Key::from_code).unwrap_or(Key::Other(0))
}
