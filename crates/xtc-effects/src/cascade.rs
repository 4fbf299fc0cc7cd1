//! Cascaded filter section: up to three identical biquad stages in series.
//!
//! A [`CascadedFilter`] always owns three [`Biquad`] stages and an enabled
//! count. Once settled, only the first `enabled_stages()` run; the rest keep
//! their history exactly as it was when they were disabled. Each stage contributes
//! 12 dB/octave, so the [`FilterOrder`] selects a 12, 24 or 36 dB/octave slope.
//!
//! Order changes take effect at the start of the next processed block and
//! are crossfaded over [`ORDER_FADE_SAMPLES`]: the output moves linearly from
//! the tap after the old last stage to the tap after the new one. Stages
//! being retired keep running until their fade completes. A stage that
//! becomes enabled is seeded from the stage feeding it, so a DC signal
//! carries on without any step at all.

use alloc::sync::Arc;

use xtc_core::{Biquad, FilterCoefficients, Processor};

/// Number of stages every cascade owns.
pub const MAX_STAGES: usize = 3;

/// Length of the crossfade between stage counts after an order change.
pub const ORDER_FADE_SAMPLES: usize = 256;

/// Cascade steepness: the number of enabled stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterOrder {
    /// One stage, 12 dB/octave.
    #[default]
    First,
    /// Two stages, 24 dB/octave.
    Second,
    /// Three stages, 36 dB/octave.
    Third,
}

impl FilterOrder {
    /// All orders, in parameter index order.
    pub const ALL: [FilterOrder; 3] = [Self::First, Self::Second, Self::Third];

    /// Order for a parameter index. Indices past the end clamp to [`Third`](Self::Third).
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::First,
            1 => Self::Second,
            _ => Self::Third,
        }
    }

    /// Order for a continuous parameter value, rounded to the nearest index.
    ///
    /// NaN and negative values map to [`First`](Self::First).
    pub fn from_value(value: f32) -> Self {
        let rounded = libm::roundf(value);
        if rounded >= 1.0 {
            Self::from_index(rounded as usize)
        } else {
            Self::First
        }
    }

    /// Parameter index (0, 1 or 2).
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
        }
    }

    /// Number of enabled stages (1, 2 or 3).
    pub const fn stages(self) -> usize {
        self.index() + 1
    }

    /// Roll-off slope in dB per octave (12, 24 or 36).
    pub const fn slope_db_per_octave(self) -> u32 {
        12 * self.stages() as u32
    }

    /// Display label, e.g. `"24 dB/Oct"`.
    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "12 dB/Oct",
            Self::Second => "24 dB/Oct",
            Self::Third => "36 dB/Oct",
        }
    }
}

/// What a cascade is designed to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterRole {
    /// Removes content below the high-pass corner.
    HighPass,
    /// Removes content above the low-pass corner.
    LowPass,
}

/// Three biquad stages of one role with a selectable number enabled.
///
/// # Example
///
/// ```rust
/// use xtc_core::{Processor, make_low_pass};
/// use xtc_effects::{CascadedFilter, FilterOrder, FilterRole};
///
/// let mut cascade = CascadedFilter::new(FilterRole::LowPass);
/// cascade.set_all_coefficients(&make_low_pass(44100.0, 5000.0).unwrap());
/// cascade.set_order(FilterOrder::Third);
///
/// let mut block = [1.0_f32; 256];
/// cascade.process_block_inplace(&mut block);
/// assert_eq!(cascade.enabled_stages(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct CascadedFilter {
    role: FilterRole,
    stages: [Biquad; MAX_STAGES],
    /// Stage count requested by `set_order`.
    enabled: usize,
    /// Stage count the output is currently taken from.
    audible: usize,
    fade: Option<OrderFade>,
}

#[derive(Debug, Clone, Copy)]
struct OrderFade {
    to: usize,
    pos: usize,
}

impl CascadedFilter {
    /// Creates a cascade with passthrough coefficients and one stage enabled.
    pub fn new(role: FilterRole) -> Self {
        Self {
            role,
            stages: [Biquad::new(), Biquad::new(), Biquad::new()],
            enabled: FilterOrder::First.stages(),
            audible: FilterOrder::First.stages(),
            fade: None,
        }
    }

    /// The role this cascade was created for.
    pub fn role(&self) -> FilterRole {
        self.role
    }

    /// Enables stages `[0, order.stages())` and disables the rest.
    ///
    /// Nothing is touched until the next processed sample, which starts a
    /// crossfade to the new stage count. Setting the current order again is
    /// a no-op.
    pub fn set_order(&mut self, order: FilterOrder) {
        self.enabled = order.stages();
    }

    /// Current order.
    pub fn order(&self) -> FilterOrder {
        FilterOrder::from_index(self.enabled - 1)
    }

    /// Number of stages that run when processing.
    pub fn enabled_stages(&self) -> usize {
        self.enabled
    }

    /// Whether stage `index` is part of the requested order.
    ///
    /// A stage past the requested order still runs while the crossfade that
    /// retires it is in progress.
    pub fn is_stage_enabled(&self, index: usize) -> bool {
        index < self.enabled
    }

    /// Whether the output is still moving towards the requested order.
    pub fn is_fading(&self) -> bool {
        self.fade.is_some() || self.enabled != self.audible
    }

    /// Installs coefficients on one stage, enabled or not. History is kept.
    ///
    /// Out-of-range indices are ignored.
    pub fn set_coefficients(&mut self, index: usize, coefficients: Arc<FilterCoefficients>) {
        if let Some(stage) = self.stages.get_mut(index) {
            stage.set_coefficients(coefficients);
        }
    }

    /// Installs the same shared coefficients on every stage.
    pub fn set_all_coefficients(&mut self, coefficients: &Arc<FilterCoefficients>) {
        for stage in &mut self.stages {
            stage.set_coefficients(Arc::clone(coefficients));
        }
    }

    /// Read access to one stage.
    pub fn stage(&self, index: usize) -> Option<&Biquad> {
        self.stages.get(index)
    }

    /// Starts a crossfade if the requested order differs from the audible one.
    fn begin_fade(&mut self) {
        if self.fade.is_some() || self.enabled == self.audible {
            return;
        }
        for index in self.audible..self.enabled {
            let [_, _, y1, y2] = self.stages[index - 1].history();
            self.stages[index].seed(y1, y2);
        }
        self.fade = Some(OrderFade {
            to: self.enabled,
            pos: 0,
        });
    }

    /// Runs one sample through the stages both taps need and mixes the taps.
    fn fade_sample(&mut self, input: f32) -> f32 {
        let Some(mut fade) = self.fade else {
            return input;
        };
        let from = self.audible;

        let mut x = input;
        let mut from_out = input;
        let mut to_out = input;
        for (i, stage) in self.stages[..from.max(fade.to)].iter_mut().enumerate() {
            x = stage.process(x);
            if i + 1 == from {
                from_out = x;
            }
            if i + 1 == fade.to {
                to_out = x;
            }
        }

        fade.pos += 1;
        let t = fade.pos as f32 / ORDER_FADE_SAMPLES as f32;
        if fade.pos >= ORDER_FADE_SAMPLES {
            self.audible = fade.to;
            self.fade = None;
        } else {
            self.fade = Some(fade);
        }
        from_out + (to_out - from_out) * t
    }
}

impl Processor for CascadedFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.begin_fade();
        if self.fade.is_some() {
            return self.fade_sample(input);
        }
        self.stages[..self.audible]
            .iter_mut()
            .fold(input, |x, stage| stage.process(x))
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        let mut done = 0;
        while done < buffer.len() {
            self.begin_fade();
            let rest = &mut buffer[done..];
            match self.fade {
                Some(fade) => {
                    let n = (ORDER_FADE_SAMPLES - fade.pos).min(rest.len());
                    for sample in &mut rest[..n] {
                        *sample = self.fade_sample(*sample);
                    }
                    done += n;
                }
                None => {
                    for stage in &mut self.stages[..self.audible] {
                        stage.process_block_inplace(rest);
                    }
                    done = buffer.len();
                }
            }
        }
    }

    /// Clears every stage, including disabled ones, and lands on the
    /// requested order without a fade.
    fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.clear();
        }
        self.audible = self.enabled;
        self.fade = None;
    }
}
