//! The crosstalk block processor.
//!
//! Per block (or per sub-block when the host block exceeds the prepared
//! maximum):
//!
//! 1. Output channels beyond the input channel count are zeroed.
//! 2. Settings are refreshed from the parameter store.
//! 3. The input is copied into three working buffers.
//! 4. Copy 1 runs through the band path and then the feedback loop.
//! 5. Copies 2 and 3 run through the high-pass and low-pass shelves.
//! 6. Output = band/feedback + low shelf + high shelf.
//!
//! All working memory is allocated in [`Crosstalk::prepare`]; nothing on the
//! processing path allocates, locks or logs.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use xtc_core::{
    FilterCoefficients, ParamDescriptor, ParameterInfo, make_high_pass, make_low_pass,
    ms_to_samples,
};

use crate::band_path::BandPath;
use crate::cascade::FilterRole;
use crate::error::EngineError;
use crate::feedback::FeedbackPath;
use crate::params::{ChainSettings, CrosstalkParams, DELAY, DESCRIPTORS};
use crate::shelf::ShelfPath;

/// High-pass corner of the band path and the high shelf, in Hz.
pub const HIGH_PASS_CORNER_HZ: f32 = 250.0;

/// Low-pass corner of the band path and the low shelf, in Hz.
pub const LOW_PASS_CORNER_HZ: f32 = 5000.0;

/// Channel counts of the input and output buses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusLayout {
    /// Input channel count.
    pub input_channels: usize,
    /// Output channel count.
    pub output_channels: usize,
}

impl BusLayout {
    /// One channel in, one out.
    pub const fn mono() -> Self {
        Self {
            input_channels: 1,
            output_channels: 1,
        }
    }

    /// Two channels in, two out.
    pub const fn stereo() -> Self {
        Self {
            input_channels: 2,
            output_channels: 2,
        }
    }

    /// Whether this layout gets the full two-channel effect.
    pub const fn is_stereo(&self) -> bool {
        self.input_channels == 2 && self.output_channels == 2
    }
}

impl Default for BusLayout {
    fn default() -> Self {
        Self::stereo()
    }
}

/// Configuration fixed by the last successful `prepare`.
#[derive(Debug, Clone)]
struct Prepared {
    sample_rate: f32,
    max_block_size: usize,
    high_pass: Arc<FilterCoefficients>,
    low_pass: Arc<FilterCoefficients>,
}

/// Stereo working copy of the input.
#[derive(Debug, Clone, Default)]
struct WorkBuffer {
    left: Vec<f32>,
    right: Vec<f32>,
}

impl WorkBuffer {
    fn allocate(&mut self, len: usize) {
        self.left = vec![0.0; len];
        self.right = vec![0.0; len];
    }

    fn load(&mut self, left: &[f32], right: &[f32]) -> (&mut [f32], &mut [f32]) {
        let l = &mut self.left[..left.len()];
        let r = &mut self.right[..right.len()];
        l.copy_from_slice(left);
        r.copy_from_slice(right);
        (l, r)
    }
}

/// Crosstalk effect engine.
///
/// Owns every per-channel chain, the parameter store handle and the working
/// buffers. Multiple engines are fully independent: cloning an engine gives
/// the clone its own parameter store, starting from the current values.
/// Use [`with_params`](Self::with_params) to make engines share a store.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Attenuation | −4.0–−2.0 dB | −3.0 |
/// | 1 | Delay | 0.06–0.1 ms | 0.06 |
/// | 2 | Filter Type | 0–2 (12/24/36 dB/Oct) | 0 |
///
/// # Example
///
/// ```rust
/// use xtc_effects::Crosstalk;
///
/// let mut engine = Crosstalk::new();
/// engine.prepare(44100.0, 512).unwrap();
///
/// let mut left = vec![0.0_f32; 512];
/// let mut right = vec![0.0_f32; 512];
/// engine.process_block(&mut [&mut left[..], &mut right[..]]);
/// assert!(left.iter().all(|&s| s == 0.0));
/// ```
#[derive(Debug)]
pub struct Crosstalk {
    params: CrosstalkParams,
    settings: ChainSettings,
    layout: BusLayout,
    prepared: Option<Prepared>,

    band: BandPath,
    feedback: FeedbackPath,
    high_shelf: ShelfPath,
    low_shelf: ShelfPath,

    band_buffer: WorkBuffer,
    high_buffer: WorkBuffer,
    low_buffer: WorkBuffer,
}

impl Crosstalk {
    /// Creates an unprepared engine with its own default parameter store.
    pub fn new() -> Self {
        Self::with_params(CrosstalkParams::new())
    }

    /// Creates an unprepared engine reading from an existing store.
    pub fn with_params(params: CrosstalkParams) -> Self {
        Self {
            params,
            settings: ChainSettings::default(),
            layout: BusLayout::stereo(),
            prepared: None,
            band: BandPath::new(),
            feedback: FeedbackPath::new(),
            high_shelf: ShelfPath::new(FilterRole::HighPass),
            low_shelf: ShelfPath::new(FilterRole::LowPass),
            band_buffer: WorkBuffer::default(),
            high_buffer: WorkBuffer::default(),
            low_buffer: WorkBuffer::default(),
        }
    }

    /// Designs filters and allocates all state for `sample_rate` and blocks of
    /// up to `max_block_size` samples. Filter and delay history start silent.
    ///
    /// On error the engine is left unprepared and passes audio through until
    /// a later `prepare` succeeds.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) -> Result<(), EngineError> {
        self.prepared = None;

        let designed = Self::design(sample_rate, max_block_size);
        let (high_pass, low_pass) = match designed {
            Ok(pair) => pair,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    sample_rate,
                    max_block_size,
                    error = %err,
                    "crosstalk prepare refused"
                );
                return Err(err);
            }
        };

        self.band_buffer.allocate(max_block_size);
        self.high_buffer.allocate(max_block_size);
        self.low_buffer.allocate(max_block_size);

        let max_delay = libm::ceilf(ms_to_samples(DESCRIPTORS[DELAY].max, sample_rate)) as usize;
        self.feedback.allocate(max_delay);

        self.prepared = Some(Prepared {
            sample_rate,
            max_block_size,
            high_pass,
            low_pass,
        });
        self.update_all();

        // Start silent at the stored order, without an order fade.
        self.band.reset();
        self.high_shelf.reset();
        self.low_shelf.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, max_block_size, max_delay, "crosstalk prepared");

        Ok(())
    }

    fn design(
        sample_rate: f32,
        max_block_size: usize,
    ) -> Result<(Arc<FilterCoefficients>, Arc<FilterCoefficients>), EngineError> {
        if max_block_size == 0 {
            return Err(EngineError::InvalidBlockSize);
        }
        let high_pass = make_high_pass(sample_rate, HIGH_PASS_CORNER_HZ)?;
        let low_pass = make_low_pass(sample_rate, LOW_PASS_CORNER_HZ)?;
        Ok((high_pass, low_pass))
    }

    /// Resets all filter and delay history to silence.
    ///
    /// The engine stays prepared. Safe to call repeatedly.
    pub fn release(&mut self) {
        self.band.reset();
        self.feedback.reset();
        self.high_shelf.reset();
        self.low_shelf.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!("crosstalk released");
    }

    /// Refreshes every component from the parameter store.
    ///
    /// Installs the coefficients designed at `prepare`, the cascade order
    /// and the feedback gain and delay. Repeating the call with unchanged
    /// parameters leaves everything bit-identical. Does nothing but record
    /// the snapshot while unprepared.
    pub fn update_all(&mut self) {
        self.settings = self.params.settings();
        let Some(prepared) = &self.prepared else {
            return;
        };
        let order = self.settings.filter_order;

        self.band.set_coefficients(&prepared.high_pass, &prepared.low_pass);
        self.band.set_order(order);

        self.high_shelf.set_coefficients(&prepared.high_pass);
        self.high_shelf.set_order(order);
        self.low_shelf.set_coefficients(&prepared.low_pass);
        self.low_shelf.set_order(order);

        self.feedback.configure(
            self.settings.attenuation_db,
            self.settings.delay_ms,
            prepared.sample_rate,
        );
    }

    /// Processes planar channels in place.
    ///
    /// Channels past the layout's input count are zeroed. Audio passes
    /// through unchanged while unprepared, for a non-stereo layout, with
    /// fewer than two channels or when the two channels differ in length.
    /// Blocks longer than the prepared maximum are split and the settings are
    /// refreshed for each piece.
    pub fn process_block(&mut self, channels: &mut [&mut [f32]]) {
        let input_channels = self.layout.input_channels.min(channels.len());
        for channel in channels.iter_mut().skip(input_channels) {
            channel.fill(0.0);
        }

        let Some(max_block_size) = self.prepared.as_ref().map(|p| p.max_block_size) else {
            return;
        };
        if !self.layout.is_stereo() || channels.len() < 2 {
            return;
        }

        let (first, rest) = channels.split_at_mut(1);
        let left = &mut *first[0];
        let right = &mut *rest[0];
        if left.len() != right.len() {
            return;
        }
        let len = left.len();

        let mut start = 0;
        while start < len {
            let end = (start + max_block_size).min(len);
            self.update_all();
            self.process_sub_block(&mut left[start..end], &mut right[start..end]);
            start = end;
        }
    }

    fn process_sub_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        let (band_l, band_r) = self.band_buffer.load(left, right);
        let (high_l, high_r) = self.high_buffer.load(left, right);
        let (low_l, low_r) = self.low_buffer.load(left, right);

        self.band.process(band_l, band_r);
        self.feedback.process(band_l, band_r);

        self.high_shelf.process(high_l, high_r);
        self.low_shelf.process(low_l, low_r);

        for (i, out) in left.iter_mut().enumerate() {
            *out = band_l[i] + low_l[i] + high_l[i];
        }
        for (i, out) in right.iter_mut().enumerate() {
            *out = band_r[i] + low_r[i] + high_r[i];
        }
    }

    /// Whether `layout` can be processed: mono or stereo output with the
    /// input matching the output.
    pub fn is_layout_supported(layout: &BusLayout) -> bool {
        matches!(layout.output_channels, 1 | 2) && layout.input_channels == layout.output_channels
    }

    /// Switches to `layout`, refusing unsupported ones.
    pub fn set_layout(&mut self, layout: BusLayout) -> Result<(), EngineError> {
        if !Self::is_layout_supported(&layout) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                input = layout.input_channels,
                output = layout.output_channels,
                "unsupported bus layout"
            );
            return Err(EngineError::UnsupportedLayout {
                input: layout.input_channels,
                output: layout.output_channels,
            });
        }
        self.layout = layout;

        #[cfg(feature = "tracing")]
        tracing::debug!(channels = layout.output_channels, "bus layout set");

        Ok(())
    }

    /// Current bus layout.
    pub fn layout(&self) -> BusLayout {
        self.layout
    }

    /// The engine produces no tail after input stops.
    pub fn tail_length_seconds(&self) -> f64 {
        0.0
    }

    /// The engine adds no latency.
    pub fn latency_samples(&self) -> usize {
        0
    }

    /// Whether the last `prepare` succeeded.
    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    /// Sample rate of the last successful `prepare`.
    pub fn sample_rate(&self) -> Option<f32> {
        self.prepared.as_ref().map(|p| p.sample_rate)
    }

    /// Maximum block size of the last successful `prepare`.
    pub fn max_block_size(&self) -> Option<usize> {
        self.prepared.as_ref().map(|p| p.max_block_size)
    }

    /// Handle to the parameter store. Clones share values with the engine.
    pub fn params(&self) -> &CrosstalkParams {
        &self.params
    }

    /// Settings applied by the last refresh.
    pub fn settings(&self) -> ChainSettings {
        self.settings
    }

    /// The band path.
    pub fn band_path(&self) -> &BandPath {
        &self.band
    }

    /// The feedback path.
    pub fn feedback_path(&self) -> &FeedbackPath {
        &self.feedback
    }

    /// The high-pass shelf.
    pub fn high_shelf(&self) -> &ShelfPath {
        &self.high_shelf
    }

    /// The low-pass shelf.
    pub fn low_shelf(&self) -> &ShelfPath {
        &self.low_shelf
    }
}

impl Clone for Crosstalk {
    fn clone(&self) -> Self {
        Self {
            params: self.params.detached(),
            settings: self.settings,
            layout: self.layout,
            prepared: self.prepared.clone(),
            band: self.band.clone(),
            feedback: self.feedback.clone(),
            high_shelf: self.high_shelf.clone(),
            low_shelf: self.low_shelf.clone(),
            band_buffer: self.band_buffer.clone(),
            high_buffer: self.high_buffer.clone(),
            low_buffer: self.low_buffer.clone(),
        }
    }
}

impl Default for Crosstalk {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterInfo for Crosstalk {
    fn param_count(&self) -> usize {
        self.params.param_count()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.params.descriptor(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        self.params.get_value(index).unwrap_or(0.0)
    }

    fn set_param(&mut self, index: usize, value: f32) {
        self.params.set_value(index, value);
    }
}
