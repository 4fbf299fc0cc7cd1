//! Band path: high-pass cascade into low-pass cascade, per channel.

use alloc::sync::Arc;

use xtc_core::{Chain, FilterCoefficients, Processor, ProcessorExt};

use crate::cascade::{CascadedFilter, FilterOrder, FilterRole};

/// One channel of the band path. `first()` is the high-pass cascade,
/// `second()` the low-pass cascade.
pub type BandChain = Chain<CascadedFilter, CascadedFilter>;

/// Band-limits both channels to the region between the high-pass and
/// low-pass corners.
///
/// Both cascades of both channels always run at the same [`FilterOrder`].
#[derive(Debug, Clone)]
pub struct BandPath {
    channels: [BandChain; 2],
}

impl BandPath {
    /// Creates a band path with passthrough coefficients.
    pub fn new() -> Self {
        Self {
            channels: [Self::band_chain(), Self::band_chain()],
        }
    }

    fn band_chain() -> BandChain {
        CascadedFilter::new(FilterRole::HighPass).chain(CascadedFilter::new(FilterRole::LowPass))
    }

    /// Installs shared coefficients on every stage of both channels.
    pub fn set_coefficients(
        &mut self,
        high_pass: &Arc<FilterCoefficients>,
        low_pass: &Arc<FilterCoefficients>,
    ) {
        for chain in &mut self.channels {
            chain.first_mut().set_all_coefficients(high_pass);
            chain.second_mut().set_all_coefficients(low_pass);
        }
    }

    /// Sets the order of all four cascades.
    pub fn set_order(&mut self, order: FilterOrder) {
        for chain in &mut self.channels {
            chain.first_mut().set_order(order);
            chain.second_mut().set_order(order);
        }
    }

    /// Band-limits `left` and `right` in place.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        let [l, r] = &mut self.channels;
        l.process_block_inplace(left);
        r.process_block_inplace(right);
    }

    /// Clears all filter history.
    pub fn reset(&mut self) {
        for chain in &mut self.channels {
            chain.reset();
        }
    }

    /// Channel 0 (left) or 1 (right).
    pub fn channel(&self, index: usize) -> Option<&BandChain> {
        self.channels.get(index)
    }
}

impl Default for BandPath {
    fn default() -> Self {
        Self::new()
    }
}
