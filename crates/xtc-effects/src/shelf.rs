//! Shelf paths: a single-role cascade per channel on the raw input.

use alloc::sync::Arc;

use xtc_core::{FilterCoefficients, Processor};

use crate::cascade::{CascadedFilter, FilterOrder, FilterRole};

/// A stereo pair of cascades sharing one role, order and coefficient set.
///
/// The engine runs one high-pass and one low-pass shelf in parallel with the
/// band path, each on its own copy of the input.
#[derive(Debug, Clone)]
pub struct ShelfPath {
    channels: [CascadedFilter; 2],
}

impl ShelfPath {
    /// Creates a shelf path of the given role with passthrough coefficients.
    pub fn new(role: FilterRole) -> Self {
        Self {
            channels: [CascadedFilter::new(role), CascadedFilter::new(role)],
        }
    }

    /// The role both channels were created for.
    pub fn role(&self) -> FilterRole {
        self.channels[0].role()
    }

    /// Installs shared coefficients on every stage of both channels.
    pub fn set_coefficients(&mut self, coefficients: &Arc<FilterCoefficients>) {
        for cascade in &mut self.channels {
            cascade.set_all_coefficients(coefficients);
        }
    }

    /// Sets the order of both channels.
    pub fn set_order(&mut self, order: FilterOrder) {
        for cascade in &mut self.channels {
            cascade.set_order(order);
        }
    }

    /// Filters `left` and `right` in place.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        let [l, r] = &mut self.channels;
        l.process_block_inplace(left);
        r.process_block_inplace(right);
    }

    /// Clears all filter history.
    pub fn reset(&mut self) {
        for cascade in &mut self.channels {
            cascade.reset();
        }
    }

    /// Channel 0 (left) or 1 (right).
    pub fn channel(&self, index: usize) -> Option<&CascadedFilter> {
        self.channels.get(index)
    }
}
