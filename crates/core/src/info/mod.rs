//! Registration metadata handed to the host when it enumerates plug-ins.

/// libvisual's type string for actor plug-ins.
pub const ACTOR_PLUGIN_TYPE: &str = "Libvisual:core:actor";

/// Video depths an actor can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoDepth {
    Gl,
}

/// GL context attributes requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlAttribute {
    DoubleBuffer,
    RedSize,
    GreenSize,
    BlueSize,
    AlphaSize,
    DepthSize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub plugin_type: &'static str,
    pub plugname: &'static str,
    pub name: &'static str,
    pub author: &'static str,
    pub version: &'static str,
    pub about: &'static str,
    pub help: &'static str,
    pub depth: VideoDepth,
    pub gl_attributes: &'static [(GlAttribute, i32)],
}

const GL_ATTRIBUTES: [(GlAttribute, i32); 6] = [
    (GlAttribute::AlphaSize, 8),
    (GlAttribute::DepthSize, 16),
    (GlAttribute::DoubleBuffer, 1),
    (GlAttribute::RedSize, 8),
    (GlAttribute::GreenSize, 8),
    (GlAttribute::BlueSize, 8),
];

impl PluginInfo {
    pub fn projectm() -> Self {
        Self {
            plugin_type: ACTOR_PLUGIN_TYPE,
            plugname: "projectM",
            name: "libvisual projectM",
            author: "The projectM Development Team",
            version: env!("CARGO_PKG_VERSION"),
            about: "projectM",
            help: "",
            depth: VideoDepth::Gl,
            gl_attributes: &GL_ATTRIBUTES,
        }
    }
}
