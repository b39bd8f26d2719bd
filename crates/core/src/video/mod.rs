//! Host video surfaces and the size the engine renders at.

/// Host video target the actor renders into.
pub trait VideoSurface {
    fn size(&self) -> (i32, i32);
    /// Size of the enclosing video when this one is a sub-region of it.
    fn parent_size(&self) -> Option<(i32, i32)>;
    fn set_dimension(&mut self, width: i32, height: i32);

    /// The size the engine should render at: the parent's when there is one.
    fn render_size(&self) -> (i32, i32) {
        self.parent_size().unwrap_or_else(|| self.size())
    }
}

impl<V: VideoSurface + ?Sized> VideoSurface for &mut V {
    fn size(&self) -> (i32, i32) {
        (**self).size()
    }

    fn parent_size(&self) -> Option<(i32, i32)> {
        (**self).parent_size()
    }

    fn set_dimension(&mut self, width: i32, height: i32) {
        (**self).set_dimension(width, height);
    }
}

/// Indexed colour palette for 8-bit video modes.
///
/// The actor renders through GL and never provides one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    pub colors: Vec<[u8; 3]>,
}

/// In-memory [`VideoSurface`] for the simulator and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryVideo {
    pub width: i32,
    pub height: i32,
    pub parent: Option<(i32, i32)>,
}

impl MemoryVideo {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            parent: None,
        }
    }

    pub fn with_parent(mut self, width: i32, height: i32) -> Self {
        self.parent = Some((width, height));
        self
    }
}

impl VideoSurface for MemoryVideo {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn parent_size(&self) -> Option<(i32, i32)> {
        self.parent
    }

    fn set_dimension(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }
}
