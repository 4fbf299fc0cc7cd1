//! Planar stereo sample storage.

/// Left and right channels held as separate buffers of equal length.
///
/// Planar layout matches what the engine processes in place; use
/// [`planes_mut`](Self::planes_mut) to get the channel slice array.
///
/// # Example
///
/// ```rust
/// use xtc_io::StereoSamples;
///
/// let mut samples = StereoSamples::from_interleaved(&[0.5, -0.5, 0.25, -0.25], 2);
/// for plane in samples.planes_mut().iter_mut() {
///     for s in plane.iter_mut() {
///         *s *= 2.0;
///     }
/// }
/// assert_eq!(samples.left, vec![1.0, 0.5]);
/// assert_eq!(samples.peak(), 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Creates stereo samples from left and right channels.
    ///
    /// The longer channel is truncated to the length of the shorter one.
    pub fn new(mut left: Vec<f32>, mut right: Vec<f32>) -> Self {
        let len = left.len().min(right.len());
        left.truncate(len);
        right.truncate(len);
        Self { left, right }
    }

    /// `len` samples of silence on both channels.
    pub fn silence(len: usize) -> Self {
        Self {
            left: vec![0.0; len],
            right: vec![0.0; len],
        }
    }

    /// Duplicates a mono signal to both channels.
    pub fn from_mono(mono: Vec<f32>) -> Self {
        Self {
            left: mono.clone(),
            right: mono,
        }
    }

    /// De-interleaves frames of `channels` samples.
    ///
    /// One channel is duplicated; for more than two only the first two are
    /// kept. A trailing partial frame is dropped.
    pub fn from_interleaved(interleaved: &[f32], channels: usize) -> Self {
        match channels {
            0 => Self::default(),
            1 => Self::from_mono(interleaved.to_vec()),
            _ => {
                let frames = interleaved.len() / channels;
                let mut left = Vec::with_capacity(frames);
                let mut right = Vec::with_capacity(frames);
                for frame in interleaved.chunks_exact(channels) {
                    left.push(frame[0]);
                    right.push(frame[1]);
                }
                Self { left, right }
            }
        }
    }

    /// Interleaves to L, R, L, R, ...
    pub fn to_interleaved(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(self.right.iter())
            .flat_map(|(&l, &r)| [l, r])
            .collect()
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Mutable channel slices in the order the engine expects.
    pub fn planes_mut(&mut self) -> [&mut [f32]; 2] {
        [&mut self.left, &mut self.right]
    }

    /// Largest absolute sample on either channel.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(self.right.iter())
            .fold(0.0_f32, |m, s| m.max(s.abs()))
    }

    /// RMS level over both channels.
    pub fn rms(&self) -> f32 {
        let count = self.left.len() + self.right.len();
        if count == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .left
            .iter()
            .chain(self.right.iter())
            .map(|&s| f64::from(s) * f64::from(s))
            .sum();
        (sum / count as f64).sqrt() as f32
    }
}
