//! The actor lifecycle: everything the host callbacks forward to.
//!
//! [`ProjectmActor`] owns one engine and the playlist created from it. The
//! playlist is always created after the engine and destroyed before it; if
//! either creation fails the actor stays uninitialized and nothing leaks.

use crate::{
    audio::{AudioSource, PcmBuffer},
    engine::{Backend, Channels, Engine, Playlist},
    input::{Action, Event, BEAT_SENSITIVITY_STEP},
    video::{Palette, VideoSurface},
    ActorConfig, ActorError, Result,
};

/// Smallest width or height the actor accepts from the host.
pub const MIN_DIMENSION: i32 = 8;

/// Size negotiation: any requested extent below [`MIN_DIMENSION`] is raised to it.
pub fn requisition(width: i32, height: i32) -> (i32, i32) {
    (width.max(MIN_DIMENSION), height.max(MIN_DIMENSION))
}

struct Session<B: Backend> {
    // Declared first so it drops before the engine it was created from.
    playlist: B::Playlist,
    engine: B::Engine,
    /// Shuffle mode to restore after a sequential next/previous.
    shuffle: bool,
}

pub struct ProjectmActor<B: Backend> {
    backend: B,
    config: ActorConfig,
    session: Option<Session<B>>,
    pcm: PcmBuffer,
}

impl<B: Backend> ProjectmActor<B> {
    pub fn new(backend: B, config: ActorConfig) -> Self {
        Self {
            backend,
            config,
            session: None,
            pcm: PcmBuffer::new(),
        }
    }

    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    pub fn engine(&self) -> Option<&B::Engine> {
        self.session.as_ref().map(|session| &session.engine)
    }

    pub fn playlist(&self) -> Option<&B::Playlist> {
        self.session.as_ref().map(|session| &session.playlist)
    }

    /// Creates and configures the engine, then its playlist.
    ///
    /// Fails with [`ActorError::EngineCreation`] before any playlist is
    /// requested, or with [`ActorError::PlaylistCreation`] after the engine
    /// has been destroyed again.
    pub fn init(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(ActorError::AlreadyInitialized);
        }

        let mut engine = self
            .backend
            .create_engine()
            .ok_or(ActorError::EngineCreation)?;
        configure_engine(&mut engine, &self.config);

        let Some(mut playlist) = self.backend.create_playlist(&mut engine) else {
            drop(engine);
            return Err(ActorError::PlaylistCreation);
        };

        let mut shuffle = false;
        if let Some(path) = &self.config.preset_path {
            match playlist.add_path(path, true, false) {
                Ok(added) => tracing::info!(path = %path.display(), added, "added presets"),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "cannot add presets")
                }
            }
            playlist.set_shuffle(true);
            playlist.play_next(true);
            shuffle = true;
        }

        self.session = Some(Session {
            playlist,
            engine,
            shuffle,
        });
        tracing::debug!("projectM actor initialized");
        Ok(())
    }

    /// Destroys the playlist, then the engine.
    pub fn cleanup(&mut self) -> Result<()> {
        let Session {
            playlist, engine, ..
        } = self.session.take().ok_or(ActorError::NotInitialized)?;

        drop(playlist);
        drop(engine);
        tracing::debug!("projectM actor cleaned up");
        Ok(())
    }

    pub fn requisition(&self, width: i32, height: i32) -> (i32, i32) {
        requisition(width, height)
    }

    /// Resizes the host video and the engine's window.
    pub fn dimension<V: VideoSurface + ?Sized>(
        &mut self,
        video: &mut V,
        width: i32,
        height: i32,
    ) -> Result<()> {
        video.set_dimension(width, height);
        let session = self.session.as_mut().ok_or(ActorError::NotInitialized)?;
        session.engine.set_window_size(extent(width), extent(height));
        Ok(())
    }

    /// Handles one polled event. Resize events apply to `video`.
    pub fn handle_event<V: VideoSurface + ?Sized>(
        &mut self,
        video: &mut V,
        event: Event,
    ) -> Result<()> {
        self.handle_event_with(event, move || Some(video))
    }

    /// Handles one polled event, asking `resize_target` for the video only
    /// when the event is a resize. A resize without a video is ignored.
    pub fn handle_event_with<S, F>(&mut self, event: Event, resize_target: F) -> Result<()>
    where
        S: VideoSurface,
        F: FnOnce() -> Option<S>,
    {
        match event {
            Event::KeyDown(key) => match Action::for_key(key) {
                Some(action) => self.apply(action),
                None => Ok(()),
            },
            Event::Resize { width, height } => match resize_target() {
                Some(mut video) => self.dimension(&mut video, width, height),
                None => {
                    tracing::warn!(width, height, "resize event without a video");
                    Ok(())
                }
            },
            Event::KeyUp(_) | Event::Other => Ok(()),
        }
    }

    /// Drains `events` in order, stopping at the first failure.
    pub fn events<V, I>(&mut self, video: &mut V, events: I) -> Result<()>
    where
        V: VideoSurface + ?Sized,
        I: IntoIterator<Item = Event>,
    {
        for event in events {
            self.handle_event(video, event)?;
        }
        Ok(())
    }

    /// Runs a key action against the engine or playlist. Preset switches
    /// triggered by keys always blend (no hard cut).
    pub fn apply(&mut self, action: Action) -> Result<()> {
        let session = self.session.as_mut().ok_or(ActorError::NotInitialized)?;
        let Session {
            playlist,
            engine,
            shuffle,
        } = session;

        match action {
            Action::ToggleLock => {
                let locked = !engine.preset_locked();
                engine.set_preset_locked(locked);
            }
            Action::NextPreset => {
                playlist.set_shuffle(false);
                playlist.play_next(false);
                playlist.set_shuffle(*shuffle);
            }
            Action::PreviousPreset => {
                playlist.set_shuffle(false);
                playlist.play_previous(false);
                playlist.set_shuffle(*shuffle);
            }
            Action::RandomPreset => playlist.play_next(false),
            Action::LastPreset => playlist.play_last(false),
            Action::BeatSensitivityUp => {
                engine.set_beat_sensitivity(engine.beat_sensitivity() + BEAT_SENSITIVITY_STEP);
            }
            Action::BeatSensitivityDown => {
                engine.set_beat_sensitivity(engine.beat_sensitivity() - BEAT_SENSITIVITY_STEP);
            }
        }

        tracing::debug!(?action, "applied key action");
        Ok(())
    }

    /// GL rendering has no palette.
    pub fn palette(&self) -> Option<&Palette> {
        None
    }

    /// Feeds one frame of audio and renders it at the video's size.
    pub fn render<V, A>(&mut self, video: &mut V, audio: &mut A) -> Result<()>
    where
        V: VideoSurface + ?Sized,
        A: AudioSource + ?Sized,
    {
        let (width, height) = video.render_size();
        let session = self.session.as_mut().ok_or(ActorError::NotInitialized)?;

        session.engine.set_window_size(extent(width), extent(height));
        let pcm = self.pcm.capture(audio);
        session.engine.add_pcm(pcm, Channels::Stereo);
        session.engine.render_frame();
        Ok(())
    }
}

fn configure_engine<E: Engine>(engine: &mut E, config: &ActorConfig) {
    engine.set_aspect_correction(config.aspect_correction);
    engine.set_window_size(config.window_width, config.window_height);
    engine.set_mesh_size(config.mesh_width, config.mesh_height);
    engine.set_preset_duration(config.preset_duration);
    engine.set_hard_cut_duration(config.hard_cut_duration);
    engine.set_soft_cut_duration(config.transition_duration);
    engine.set_hard_cut_sensitivity(config.hard_cut_sensitivity as f32);
    engine.set_fps(config.fps);

    if let Some(path) = &config.texture_path {
        if let Err(err) = engine.set_texture_search_paths(std::slice::from_ref(path)) {
            tracing::warn!(path = %path.display(), error = %err, "cannot set texture path");
        }
    }
}

fn extent(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        audio::{SliceSource, PCM_FRAMES},
        engine::{EngineCall, HeadlessBackend},
        error::{status_code, STATUS_FAILURE},
        input::Key,
        video::MemoryVideo,
    };

    fn actor(config: ActorConfig) -> ProjectmActor<HeadlessBackend> {
        ProjectmActor::new(HeadlessBackend::new(), config)
    }

    fn initialized(config: ActorConfig) -> ProjectmActor<HeadlessBackend> {
        let mut actor = actor(config);
        actor.init().unwrap();
        actor
    }

    fn with_presets() -> ActorConfig {
        ActorConfig {
            preset_path: Some(PathBuf::from("/usr/share/projectM/presets")),
            ..ActorConfig::default()
        }
    }

    #[test]
    fn init_applies_configuration() {
        let config = ActorConfig {
            texture_path: Some(PathBuf::from("/srv/textures")),
            ..ActorConfig::default()
        };
        let actor = initialized(config);
        let journal = actor.backend().journal();

        assert!(journal.contains(&EngineCall::SetAspectCorrection(true)));
        assert!(journal.contains(&EngineCall::SetWindowSize(512, 512)));
        assert!(journal.contains(&EngineCall::SetMeshSize(48, 32)));
        assert!(journal.contains(&EngineCall::SetPresetDuration(30.0)));
        assert!(journal.contains(&EngineCall::SetHardCutDuration(10.0)));
        assert!(journal.contains(&EngineCall::SetSoftCutDuration(3.0)));
        assert!(journal.contains(&EngineCall::SetHardCutSensitivity(10.0)));
        assert!(journal.contains(&EngineCall::SetTextureSearchPaths(vec![
            PathBuf::from("/srv/textures")
        ])));

        let engine = actor.engine().unwrap();
        assert_eq!(engine.mesh_size(), (48, 32));
        assert_eq!(engine.texture_paths(), actor.config().texture_path.as_slice());
        assert!(!actor.playlist().unwrap().shuffle());
    }

    #[test]
    fn path_errors_do_not_fail_init() {
        let config = ActorConfig {
            texture_path: Some(PathBuf::from("/srv/textures")),
            ..with_presets()
        };
        let mut actor = ProjectmActor::new(HeadlessBackend::new().failing_paths(), config);

        assert!(actor.init().is_ok());
        assert!(actor.is_initialized());
        let journal = actor.backend().journal();
        assert!(journal.contains(&EngineCall::SetShuffle(true)));
        assert!(journal.contains(&EngineCall::PlayNext { hard_cut: true }));
        assert!(actor.engine().unwrap().texture_paths().is_empty());
        assert!(actor.playlist().unwrap().shuffle());
    }

    #[test]
    fn fps_from_config_file_reaches_the_engine() {
        let actor = initialized(ActorConfig::parse("FPS = 30\n"));

        assert!(actor.backend().journal().contains(&EngineCall::SetFps(30)));
        assert_eq!(actor.engine().unwrap().fps(), 30);
    }

    #[test]
    fn engine_failure_never_requests_a_playlist() {
        let mut actor = ProjectmActor::new(
            HeadlessBackend::new().failing_engine_creation(),
            ActorConfig::default(),
        );

        let result = actor.init();

        assert!(matches!(result, Err(ActorError::EngineCreation)));
        assert_eq!(status_code(&result), STATUS_FAILURE);
        assert_eq!(
            actor
                .backend()
                .journal()
                .count(|call| *call == EngineCall::CreatePlaylist),
            0
        );
        assert!(!actor.is_initialized());
    }

    #[test]
    fn playlist_failure_destroys_the_engine_once() {
        let mut actor = ProjectmActor::new(
            HeadlessBackend::new().failing_playlist_creation(),
            with_presets(),
        );

        let result = actor.init();

        assert!(matches!(result, Err(ActorError::PlaylistCreation)));
        assert!(status_code(&result) < 0);
        let journal = actor.backend().journal();
        assert_eq!(journal.count(|call| *call == EngineCall::DestroyEngine), 1);
        assert_eq!(journal.calls().last(), Some(&EngineCall::DestroyEngine));
        assert!(!actor.is_initialized());
    }

    #[test]
    fn requisition_never_goes_below_minimum() {
        for value in [i32::MIN, -1, 0, 1, 7, 8, 9, 640, i32::MAX] {
            let (width, height) = requisition(value, value);
            assert!(width >= MIN_DIMENSION && height >= MIN_DIMENSION);
            if value >= MIN_DIMENSION {
                assert_eq!((width, height), (value, value));
            }
        }
        assert_eq!(actor(ActorConfig::default()).requisition(3, 480), (8, 480));
    }

    #[test]
    fn preset_path_is_added_and_started_with_a_hard_cut() {
        let actor = initialized(with_presets());
        let calls = actor.backend().journal().calls();
        let start = calls
            .iter()
            .position(|call| matches!(call, EngineCall::AddPath { .. }))
            .expect("preset path should be added");

        assert_eq!(
            &calls[start..],
            &[
                EngineCall::AddPath {
                    path: PathBuf::from("/usr/share/projectM/presets"),
                    recursive: true,
                    allow_duplicates: false,
                },
                EngineCall::SetShuffle(true),
                EngineCall::PlayNext { hard_cut: true },
            ]
        );
    }

    #[test]
    fn without_preset_path_the_playlist_is_left_alone() {
        let actor = initialized(ActorConfig::default());
        let journal = actor.backend().journal();

        assert!(journal.contains(&EngineCall::CreatePlaylist));
        assert_eq!(
            journal.count(|call| matches!(call, EngineCall::AddPath { .. })),
            0
        );
    }

    #[test]
    fn cleanup_destroys_playlist_before_engine() {
        let mut actor = initialized(ActorConfig::default());
        let journal = actor.backend().journal().clone();
        journal.clear();

        actor.cleanup().unwrap();

        assert_eq!(
            journal.calls(),
            vec![EngineCall::DestroyPlaylist, EngineCall::DestroyEngine]
        );
        assert!(matches!(actor.cleanup(), Err(ActorError::NotInitialized)));
    }

    #[test]
    fn second_init_is_rejected() {
        let mut actor = initialized(ActorConfig::default());
        assert!(matches!(actor.init(), Err(ActorError::AlreadyInitialized)));
        assert_eq!(
            actor
                .backend()
                .journal()
                .count(|call| *call == EngineCall::CreateEngine),
            1
        );
    }

    #[test]
    fn sequential_keys_restore_shuffle() {
        let mut actor = initialized(with_presets());
        let mut video = MemoryVideo::new(512, 512);
        let journal = actor.backend().journal().clone();
        journal.clear();

        actor
            .events(&mut video, [Event::KeyDown(Key::N), Event::KeyDown(Key::P)])
            .unwrap();

        assert_eq!(
            journal.calls(),
            vec![
                EngineCall::SetShuffle(false),
                EngineCall::PlayNext { hard_cut: false },
                EngineCall::SetShuffle(true),
                EngineCall::SetShuffle(false),
                EngineCall::PlayPrevious { hard_cut: false },
                EngineCall::SetShuffle(true),
            ]
        );
    }

    #[test]
    fn random_and_last_keys_switch_softly() {
        let mut actor = initialized(with_presets());
        let mut video = MemoryVideo::new(512, 512);
        let journal = actor.backend().journal().clone();
        journal.clear();

        actor
            .events(
                &mut video,
                [Event::KeyDown(Key::R), Event::KeyDown(Key::Backspace)],
            )
            .unwrap();

        assert_eq!(
            journal.calls(),
            vec![
                EngineCall::PlayNext { hard_cut: false },
                EngineCall::PlayLast { hard_cut: false },
            ]
        );
    }

    #[test]
    fn space_toggles_the_preset_lock() {
        let mut actor = initialized(ActorConfig::default());
        let mut video = MemoryVideo::new(512, 512);

        actor.handle_event(&mut video, Event::KeyDown(Key::Space)).unwrap();
        assert!(actor.engine().unwrap().preset_locked());

        actor.handle_event(&mut video, Event::KeyDown(Key::Space)).unwrap();
        assert!(!actor.engine().unwrap().preset_locked());
    }

    #[test]
    fn arrow_keys_step_beat_sensitivity() {
        let mut actor = initialized(ActorConfig::default());
        let mut video = MemoryVideo::new(512, 512);
        let start = actor.engine().unwrap().beat_sensitivity();

        actor
            .events(
                &mut video,
                [
                    Event::KeyDown(Key::Up),
                    Event::KeyDown(Key::Up),
                    Event::KeyDown(Key::Down),
                ],
            )
            .unwrap();

        let delta = actor.engine().unwrap().beat_sensitivity() - start;
        assert!((delta - BEAT_SENSITIVITY_STEP).abs() < 1e-5);
    }

    #[test]
    fn key_up_and_unbound_keys_are_ignored() {
        let mut actor = initialized(ActorConfig::default());
        let mut video = MemoryVideo::new(512, 512);
        let journal = actor.backend().journal().clone();
        journal.clear();

        actor
            .events(
                &mut video,
                [
                    Event::KeyUp(Key::N),
                    Event::KeyDown(Key::Other(97)),
                    Event::Other,
                ],
            )
            .unwrap();

        assert!(journal.calls().is_empty());
    }

    #[test]
    fn resize_events_update_video_and_engine() {
        let mut actor = initialized(ActorConfig::default());
        let mut video = MemoryVideo::new(512, 512);

        actor
            .handle_event(
                &mut video,
                Event::Resize {
                    width: 1280,
                    height: 720,
                },
            )
            .unwrap();

        assert_eq!((video.width, video.height), (1280, 720));
        assert_eq!(actor.engine().unwrap().window_size(), (1280, 720));
    }

    #[test]
    fn resize_target_is_only_requested_for_resizes() {
        let mut actor = initialized(ActorConfig::default());
        let journal = actor.backend().journal().clone();
        journal.clear();

        actor
            .handle_event_with(Event::KeyDown(Key::Space), || -> Option<MemoryVideo> {
                panic!("key events have no resize target")
            })
            .unwrap();
        actor
            .handle_event_with(
                Event::Resize {
                    width: 800,
                    height: 600,
                },
                || None::<MemoryVideo>,
            )
            .unwrap();

        assert_eq!(journal.calls(), vec![EngineCall::SetPresetLocked(true)]);
    }

    #[test]
    fn render_feeds_interleaved_stereo_then_draws() {
        let mut actor = initialized(ActorConfig::default());
        let mut video = MemoryVideo::new(640, 480);
        let journal = actor.backend().journal().clone();
        journal.clear();

        let left = vec![0.5; PCM_FRAMES];
        let right = vec![-0.5; PCM_FRAMES];
        actor
            .render(&mut video, &mut SliceSource::new(&left, &right))
            .unwrap();

        assert_eq!(
            journal.calls(),
            vec![
                EngineCall::SetWindowSize(640, 480),
                EngineCall::AddPcm {
                    frames: PCM_FRAMES,
                    channels: Channels::Stereo,
                },
                EngineCall::RenderFrame,
            ]
        );
        assert_eq!(actor.engine().unwrap().frames_rendered(), 1);
    }

    #[test]
    fn render_follows_the_parent_video() {
        let mut actor = initialized(ActorConfig::default());
        let mut video = MemoryVideo::new(320, 200).with_parent(1024, 768);

        actor
            .render(&mut video, &mut SliceSource::new(&[], &[]))
            .unwrap();

        assert_eq!(actor.engine().unwrap().window_size(), (1024, 768));
    }

    #[test]
    fn callbacks_before_init_report_not_initialized() {
        let mut actor = actor(ActorConfig::default());
        let mut video = MemoryVideo::new(10, 10);

        assert!(matches!(
            actor.render(&mut video, &mut SliceSource::new(&[], &[])),
            Err(ActorError::NotInitialized)
        ));
        assert!(matches!(
            actor.apply(Action::ToggleLock),
            Err(ActorError::NotInitialized)
        ));
        assert!(actor.palette().is_none());
    }
}
