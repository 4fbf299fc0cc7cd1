//! Parameter store and per-block settings snapshot.
//!
//! [`CrosstalkParams`] is a cloneable handle to three atomics holding the f32
//! bit patterns of the user parameters. Any thread may write; the audio thread
//! takes a [`ChainSettings`] snapshot once per block without locking.
//!
//! ## Parameter Indices (`ParameterInfo`)
//!
//! | Index | Name | Range | Default |
//! |-------|------|-------|---------|
//! | 0 | Attenuation | −4.0–−2.0 dB | −3.0 |
//! | 1 | Delay | 0.06–0.1 ms | 0.06 |
//! | 2 | Filter Type | 12 / 24 / 36 dB/Oct | 12 dB/Oct |

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU32, Ordering};

use xtc_core::{ParamDescriptor, ParamId};

use crate::cascade::FilterOrder;

/// Index of the attenuation parameter.
pub const ATTENUATION: usize = 0;
/// Index of the delay parameter.
pub const DELAY: usize = 1;
/// Index of the filter type parameter.
pub const FILTER_TYPE: usize = 2;
/// Number of parameters.
pub const PARAM_COUNT: usize = 3;

/// Choice labels of the filter type parameter.
pub const FILTER_TYPE_LABELS: [&str; 3] = [
    FilterOrder::First.label(),
    FilterOrder::Second.label(),
    FilterOrder::Third.label(),
];

/// Descriptors for all parameters, in index order.
pub static DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor::gain_db("Attenuation", "Atten", -4.0, -2.0, -3.0)
        .with_step(0.01)
        .with_id(ParamId(100), "xtc_attenuation"),
    ParamDescriptor::time_ms("Delay", "Delay", 0.06, 0.1, 0.06)
        .with_step(0.001)
        .with_id(ParamId(101), "xtc_delay"),
    ParamDescriptor::choice("Filter Type", "Slope", &FILTER_TYPE_LABELS, 0)
        .with_id(ParamId(102), "xtc_filter_type"),
];

/// The three user parameters as seen by one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSettings {
    /// Feedback attenuation in dB, −4.0 to −2.0.
    pub attenuation_db: f32,
    /// Feedback delay in milliseconds, 0.06 to 0.1.
    pub delay_ms: f32,
    /// Cascade order of every filter section.
    pub filter_order: FilterOrder,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            attenuation_db: DESCRIPTORS[ATTENUATION].default,
            delay_ms: DESCRIPTORS[DELAY].default,
            filter_order: FilterOrder::from_value(DESCRIPTORS[FILTER_TYPE].default),
        }
    }
}

#[derive(Debug)]
struct ParamValues {
    values: [AtomicU32; PARAM_COUNT],
}

/// Lock-free parameter store shared between the audio thread and writers.
///
/// Clones share the same values.
///
/// # Example
///
/// ```rust
/// use xtc_effects::{CrosstalkParams, FilterOrder, params};
///
/// let store = CrosstalkParams::new();
/// let ui = store.clone();
/// ui.set_value(params::ATTENUATION, -10.0);
/// ui.set_value(params::FILTER_TYPE, 1.8);
///
/// let settings = store.settings();
/// assert_eq!(settings.attenuation_db, -4.0);
/// assert_eq!(settings.filter_order, FilterOrder::Third);
/// ```
#[derive(Debug, Clone)]
pub struct CrosstalkParams {
    inner: Arc<ParamValues>,
}

impl CrosstalkParams {
    /// Creates a store holding the default value of every parameter.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ParamValues {
                values: DESCRIPTORS.map(|d| AtomicU32::new(d.default.to_bits())),
            }),
        }
    }

    /// Creates a separate store starting from this store's current values.
    ///
    /// Writes to either store are not seen by the other.
    pub fn detached(&self) -> Self {
        Self {
            inner: Arc::new(ParamValues {
                values: core::array::from_fn(|index| {
                    AtomicU32::new(self.inner.values[index].load(Ordering::Acquire))
                }),
            }),
        }
    }

    /// Number of parameters.
    pub fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    /// Descriptor by index.
    pub fn descriptor(&self, index: usize) -> Option<&'static ParamDescriptor> {
        DESCRIPTORS.get(index)
    }

    /// All descriptors.
    pub fn descriptors(&self) -> &'static [ParamDescriptor] {
        &DESCRIPTORS
    }

    /// Reads the current value of a parameter (lock-free).
    pub fn get_value(&self, index: usize) -> Option<f32> {
        self.inner
            .values
            .get(index)
            .map(|v| f32::from_bits(v.load(Ordering::Acquire)))
    }

    /// Writes a parameter value (lock-free). Clamps to the descriptor range;
    /// the filter type is rounded to the nearest choice.
    ///
    /// Out-of-range indices are ignored.
    pub fn set_value(&self, index: usize, value: f32) {
        if let Some((atomic, desc)) = self.inner.values.get(index).zip(DESCRIPTORS.get(index)) {
            let mut clamped = desc.clamp(value);
            if index == FILTER_TYPE {
                clamped = libm::roundf(clamped);
            }
            atomic.store(clamped.to_bits(), Ordering::Release);
        }
    }

    /// Writes all three parameters from a settings value.
    pub fn set_settings(&self, settings: &ChainSettings) {
        self.set_value(ATTENUATION, settings.attenuation_db);
        self.set_value(DELAY, settings.delay_ms);
        self.set_value(FILTER_TYPE, settings.filter_order.index() as f32);
    }

    /// Restores every parameter to its default.
    pub fn reset_to_defaults(&self) {
        for (index, desc) in DESCRIPTORS.iter().enumerate() {
            self.set_value(index, desc.default);
        }
    }

    /// Snapshot of the current values for one block.
    pub fn settings(&self) -> ChainSettings {
        let load = |index: usize| f32::from_bits(self.inner.values[index].load(Ordering::Acquire));
        ChainSettings {
            attenuation_db: load(ATTENUATION),
            delay_ms: load(DELAY),
            filter_order: FilterOrder::from_value(load(FILTER_TYPE)),
        }
    }
}

impl Default for CrosstalkParams {
    fn default() -> Self {
        Self::new()
    }
}
