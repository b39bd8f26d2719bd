//! PCM hand-off from the host's per-channel buffers to the engine's
//! interleaved stereo input.

/// Samples per channel pulled from the host on every rendered frame.
pub const PCM_FRAMES: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

/// Anything that can provide the most recent samples of one channel.
pub trait AudioSource {
    /// Fills `out` with samples of `channel`. Slots the source cannot provide
    /// must be left at zero.
    fn read_channel(&mut self, channel: Channel, out: &mut [f32]);
}

/// Fixed-size staging area for one frame worth of stereo PCM.
#[derive(Debug, Clone)]
pub struct PcmBuffer {
    left: Vec<f32>,
    right: Vec<f32>,
    interleaved: Vec<f32>,
}

impl Default for PcmBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PcmBuffer {
    pub fn new() -> Self {
        Self {
            left: vec![0.0; PCM_FRAMES],
            right: vec![0.0; PCM_FRAMES],
            interleaved: vec![0.0; PCM_FRAMES * 2],
        }
    }

    /// Pulls both channels from `source` and returns them interleaved as
    /// `L0 R0 L1 R1 ...`.
    pub fn capture<A: AudioSource + ?Sized>(&mut self, source: &mut A) -> &[f32] {
        self.left.fill(0.0);
        self.right.fill(0.0);
        source.read_channel(Channel::Left, &mut self.left);
        source.read_channel(Channel::Right, &mut self.right);

        for (frame, (left, right)) in self
            .interleaved
            .chunks_exact_mut(2)
            .zip(self.left.iter().zip(&self.right))
        {
            frame[0] = *left;
            frame[1] = *right;
        }

        &self.interleaved
    }

    pub fn left(&self) -> &[f32] {
        &self.left
    }

    pub fn right(&self) -> &[f32] {
        &self.right
    }
}

/// [`AudioSource`] over two in-memory channel slices. Short slices are
/// zero-padded, long ones truncated.
#[derive(Debug, Clone, Copy)]
pub struct SliceSource<'a> {
    left: &'a [f32],
    right: &'a [f32],
}

impl<'a> SliceSource<'a> {
    pub fn new(left: &'a [f32], right: &'a [f32]) -> Self {
        Self { left, right }
    }
}

impl AudioSource for SliceSource<'_> {
    fn read_channel(&mut self, channel: Channel, out: &mut [f32]) {
        let samples = match channel {
            Channel::Left => self.left,
            Channel::Right => self.right,
        };
        let len = samples.len().min(out.len());
        out[..len].copy_from_slice(&samples[..len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaves_left_and_right() {
        let left: Vec<f32> = (0..PCM_FRAMES).map(|i| i as f32).collect();
        let right: Vec<f32> = (0..PCM_FRAMES).map(|i| -(i as f32)).collect();
        let mut buffer = PcmBuffer::new();

        let pcm = buffer.capture(&mut SliceSource::new(&left, &right));

        assert_eq!(pcm.len(), PCM_FRAMES * 2);
        assert_eq!(&pcm[..6], &[0.0, -0.0, 1.0, -1.0, 2.0, -2.0]);
        assert_eq!(pcm[pcm.len() - 2], (PCM_FRAMES - 1) as f32);
    }

    #[test]
    fn short_sources_are_zero_padded() {
        let mut buffer = PcmBuffer::new();
        buffer.capture(&mut SliceSource::new(&[1.0; PCM_FRAMES], &[1.0; PCM_FRAMES]));

        let pcm = buffer.capture(&mut SliceSource::new(&[0.5, 0.25], &[]));

        assert_eq!(&pcm[..4], &[0.5, 0.0, 0.25, 0.0]);
        assert!(pcm[4..].iter().all(|sample| *sample == 0.0));
        assert_eq!(buffer.left()[1], 0.25);
        assert!(buffer.right().iter().all(|sample| *sample == 0.0));
    }
}
