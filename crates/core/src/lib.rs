//! Core library for the projectM libvisual actor.
//!
//! Everything the host callbacks do is implemented here against the
//! [`engine`] traits: reading the settings file, creating and tearing down the
//! engine and its playlist, mapping key presses to playlist/engine calls and
//! handing PCM data over. The plug-in crate only adapts raw host and engine
//! pointers to these types.

pub mod actor;
pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod info;
pub mod input;
pub mod video;

pub use actor::{requisition, ProjectmActor, MIN_DIMENSION};
pub use audio::{AudioSource, Channel, PcmBuffer, SliceSource, PCM_FRAMES};
pub use config::{ActorConfig, ConfigFile, ConfigLocator, ConfigSource};
pub use engine::{Backend, Channels, Engine, HeadlessBackend, Playlist};
pub use error::{status_code, ActorError, Result, STATUS_FAILURE, STATUS_OK};
pub use info::PluginInfo;
pub use input::{Action, Event, Key};
pub use video::{MemoryVideo, Palette, VideoSurface};
