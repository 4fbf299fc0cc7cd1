//! Parameter introspection for discoverable effect parameters.
//!
//! This module provides the [`ParameterInfo`] trait and supporting types that
//! let a host, the command-line front end or a test enumerate an effect's
//! parameters, read their ranges and set them by index, name or stable ID.
//!
//! # Design
//!
//! Access is index-based. Each parameter is described by a [`ParamDescriptor`]
//! carrying display metadata, its valid range and a stable [`ParamId`]. Stepped
//! choice parameters additionally carry `value_labels`, one per step.
//!
//! # Example
//!
//! ```rust
//! use xtc_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct Trim {
//!     gain_db: f32,
//! }
//!
//! impl ParameterInfo for Trim {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::gain_db("Trim", "Trim", -12.0, 12.0, 0.0)
//!                 .with_id(ParamId(10), "trim_gain")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.gain_db,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 {
//!             self.gain_db = value.clamp(-12.0, 12.0);
//!         }
//!     }
//! }
//!
//! let trim = Trim { gain_db: 0.0 };
//! assert_eq!(trim.find_param_by_name("trim"), Some(0));
//! ```

use alloc::format;
use alloc::string::String;

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// Use [`union`](Self::union) to combine.
///
/// # Example
///
/// ```rust
/// use xtc_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::AUTOMATABLE));
/// assert!(flags.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter (default for all params).
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete steps (choice or integer values).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Trait for effects that expose introspectable parameters.
///
/// Parameters are accessed by zero-based index, stable for the lifetime of
/// the effect. Out-of-range indices are ignored by setters and read as `0.0`.
pub trait ParameterInfo {
    /// Returns the number of parameters this effect exposes.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at the given index.
    ///
    /// Returns `None` if `index >= param_count()`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current value of the parameter at the given index.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the value of the parameter at the given index.
    ///
    /// Implementations clamp the value to the descriptor's range.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches against [`ParamDescriptor::name`], [`ParamDescriptor::short_name`]
    /// and [`ParamDescriptor::string_id`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
                    || desc.string_id.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Returns the stable [`ParamId`] for the parameter at the given index.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Finds a parameter index by its stable [`ParamId`].
    ///
    /// Scans all parameters (O(n)); suitable for setup paths, not audio.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }
}

/// Describes a single parameter's metadata for display and validation.
///
/// # Example
///
/// ```rust
/// use xtc_core::{ParamDescriptor, ParamId};
///
/// let delay = ParamDescriptor::time_ms("Delay", "Delay", 0.06, 0.1, 0.06)
///     .with_step(0.001)
///     .with_id(ParamId(101), "xtc_delay");
///
/// assert_eq!(delay.clamp(1.0), 0.1);
/// assert_eq!(delay.format_value(0.08), "0.080 ms");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display.
    pub name: &'static str,

    /// Short name for narrow displays, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Value the parameter takes before anyone sets it.
    pub default: f32,

    /// Value granularity. `1.0` for choice parameters.
    pub step: f32,

    /// Stable numeric ID.
    pub id: ParamId,

    /// Human-readable stable ID for serialization and lookup.
    ///
    /// Convention: `"effect_param"` (e.g., `"xtc_delay"`).
    pub string_id: &'static str,

    /// Capability flags.
    pub flags: ParamFlags,

    /// Display labels for stepped choice parameters, indexed by value.
    ///
    /// Empty for continuous parameters.
    pub value_labels: &'static [&'static str],
}

impl ParamDescriptor {
    /// Gain parameter with custom name and range (decibels).
    pub const fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 0.5,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
            value_labels: &[],
        }
    }

    /// Time parameter with custom name and range (milliseconds).
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Milliseconds,
            min,
            max,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
            value_labels: &[],
        }
    }

    /// Stepped choice parameter ranging over `0..labels.len()`.
    ///
    /// `labels` must not be empty.
    pub const fn choice(
        name: &'static str,
        short_name: &'static str,
        labels: &'static [&'static str],
        default: usize,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 0.0,
            max: (labels.len() - 1) as f32,
            default: default as f32,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            value_labels: labels,
        }
    }

    /// Sets the stable parameter ID and string ID.
    ///
    /// Builder pattern; call after a factory method.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the step size.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// NaN maps to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Label of a choice value, rounding to the nearest step.
    ///
    /// Returns `None` for continuous parameters.
    pub fn value_label(&self, value: f32) -> Option<&'static str> {
        if self.value_labels.is_empty() {
            return None;
        }
        let index = libm::roundf(self.clamp(value)) as usize;
        self.value_labels.get(index).copied()
    }

    /// Formats a value for display with its unit.
    ///
    /// Choice parameters show their label. Continuous parameters use as many
    /// decimals as the step size needs.
    pub fn format_value(&self, value: f32) -> String {
        if let Some(label) = self.value_label(value) {
            return String::from(label);
        }
        let decimals = if self.step >= 1.0 {
            0
        } else if self.step >= 0.1 {
            1
        } else if self.step >= 0.01 {
            2
        } else {
            3
        };
        format!("{value:.decimals$}{}", self.unit.suffix())
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB).
    Decibels,

    /// Milliseconds (ms).
    Milliseconds,

    /// No unit; dimensionless or choice parameters.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// ```rust
    /// use xtc_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::None => "",
        }
    }
}
