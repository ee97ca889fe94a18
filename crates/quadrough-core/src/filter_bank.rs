//! Pre/post tone filter bank.
//!
//! Two identical five-stage chains surround the distortion. Each chain holds
//! a safety low-pass, a safety high-pass, a low shelf, a high shelf and a
//! bell, one [`Biquad`] per stage per channel.
//!
//! The shaping stages tilt the spectrum into the distortion and back out of
//! it: the pre chain boosts both shelves by `+tone` and cuts the bell by
//! `-tone`, the post chain does the exact opposite. The harmonics the
//! nonlinearity generates keep the tilt while the fundamental balance is
//! restored.
//!
//! ```text
//! pre:  LP(22k) → HP(18) → HighShelf(2773) → LowShelf(144) → Bell(755)
//! post: HighShelf(2773) → LowShelf(144) → Bell(755) → LP(22k) → HP(18)
//! ```
//!
//! Retuning only rewrites coefficients. Delay lines survive every retune and
//! are cleared only by [`FilterBank::reset`].

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::biquad::{
    Biquad, high_shelf_coefficients, highpass_coefficients, low_shelf_coefficients,
    lowpass_coefficients, peaking_coefficients,
};
use crate::math::db_to_linear;

/// Safety low-pass corner.
pub const SAFETY_LOWPASS_HZ: f32 = 22_000.0;
/// Safety high-pass corner.
pub const SAFETY_HIGHPASS_HZ: f32 = 18.0;
/// Q of both safety filters.
pub const SAFETY_Q: f32 = 0.1;
/// Low shelf corner.
pub const LOW_SHELF_HZ: f32 = 144.0;
/// High shelf corner.
pub const HIGH_SHELF_HZ: f32 = 2_773.0;
/// Q of both shelves.
pub const SHELF_Q: f32 = 0.5;
/// Bell center.
pub const BELL_HZ: f32 = 755.0;
/// Bell Q.
pub const BELL_Q: f32 = 1.0;

/// Sample rate assumed before [`FilterBank::prepare`] is called.
pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

/// One stage of a filter chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    /// Fixed 22 kHz low-pass.
    SafetyLowPass,
    /// Fixed 18 Hz high-pass.
    SafetyHighPass,
    /// 144 Hz low shelf.
    LowShelf,
    /// 2773 Hz high shelf.
    HighShelf,
    /// 755 Hz bell.
    Bell,
}

impl FilterStage {
    const COUNT: usize = 5;

    /// Stage order of the pre-distortion chain.
    pub const PRE_ORDER: [FilterStage; 5] = [
        FilterStage::SafetyLowPass,
        FilterStage::SafetyHighPass,
        FilterStage::HighShelf,
        FilterStage::LowShelf,
        FilterStage::Bell,
    ];

    /// Stage order of the post-distortion chain.
    pub const POST_ORDER: [FilterStage; 5] = [
        FilterStage::HighShelf,
        FilterStage::LowShelf,
        FilterStage::Bell,
        FilterStage::SafetyLowPass,
        FilterStage::SafetyHighPass,
    ];

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Which side of the distortion a chain sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainPosition {
    /// Before the distortion.
    Pre,
    /// After the distortion.
    Post,
}

impl ChainPosition {
    /// Stage order for this position.
    pub const fn order(self) -> &'static [FilterStage; 5] {
        match self {
            ChainPosition::Pre => &FilterStage::PRE_ORDER,
            ChainPosition::Post => &FilterStage::POST_ORDER,
        }
    }

    /// Linear gains `(shelves, bell)` for a tone setting.
    pub fn tone_gains(self, tone_db: f32) -> (f32, f32) {
        let boost = db_to_linear(tone_db);
        let cut = db_to_linear(-tone_db);
        match self {
            ChainPosition::Pre => (boost, cut),
            ChainPosition::Post => (cut, boost),
        }
    }
}

/// Five biquads for one channel, indexed by [`FilterStage`].
type StageSet = [Biquad; FilterStage::COUNT];

/// One five-stage chain, replicated per channel.
#[derive(Debug, Clone)]
pub struct FilterChain {
    position: ChainPosition,
    channels: Vec<StageSet>,
}

impl FilterChain {
    /// Creates a chain with no channels; call [`prepare`](Self::prepare).
    pub fn new(position: ChainPosition) -> Self {
        Self {
            position,
            channels: Vec::new(),
        }
    }

    /// Position of this chain.
    pub fn position(&self) -> ChainPosition {
        self.position
    }

    /// Number of channels with allocated filter state.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Allocates cleared filter state for `num_channels` channels.
    pub fn prepare(&mut self, num_channels: usize) {
        self.channels.clear();
        self.channels
            .resize_with(num_channels, || core::array::from_fn(|_| Biquad::new()));
    }

    /// Recomputes every stage's coefficients. Delay lines are untouched.
    pub fn retune(&mut self, sample_rate: f32, tone_db: f32) {
        let (shelf_gain, bell_gain) = self.position.tone_gains(tone_db);
        let lowpass = lowpass_coefficients(SAFETY_LOWPASS_HZ, SAFETY_Q, sample_rate);
        let highpass = highpass_coefficients(SAFETY_HIGHPASS_HZ, SAFETY_Q, sample_rate);
        let low_shelf = low_shelf_coefficients(LOW_SHELF_HZ, SHELF_Q, shelf_gain, sample_rate);
        let high_shelf = high_shelf_coefficients(HIGH_SHELF_HZ, SHELF_Q, shelf_gain, sample_rate);
        let bell = peaking_coefficients(BELL_HZ, BELL_Q, bell_gain, sample_rate);

        for stages in &mut self.channels {
            stages[FilterStage::SafetyLowPass.slot()].apply(lowpass);
            stages[FilterStage::SafetyHighPass.slot()].apply(highpass);
            stages[FilterStage::LowShelf.slot()].apply(low_shelf);
            stages[FilterStage::HighShelf.slot()].apply(high_shelf);
            stages[FilterStage::Bell.slot()].apply(bell);
        }
    }

    /// Runs every stage, in chain order, over each channel in place.
    ///
    /// Channels beyond the prepared count pass through untouched.
    pub fn process(&mut self, channels: &mut [&mut [f32]]) {
        debug_assert!(
            channels.len() <= self.channels.len(),
            "block has {} channels, chain prepared for {}",
            channels.len(),
            self.channels.len()
        );
        let order = self.position.order();
        for (stages, channel) in self.channels.iter_mut().zip(channels.iter_mut()) {
            for stage in order {
                stages[stage.slot()].process_slice(channel);
            }
        }
    }

    /// Clears every delay line.
    pub fn reset(&mut self) {
        for stages in &mut self.channels {
            for biquad in stages.iter_mut() {
                biquad.clear();
            }
        }
    }

    /// Delay-line contents of one stage of one channel.
    pub fn stage_history(&self, channel: usize, stage: FilterStage) -> Option<[f32; 4]> {
        self.channels
            .get(channel)
            .map(|stages| stages[stage.slot()].history())
    }
}

/// Pre- and post-distortion chains sharing one sample rate.
///
/// # Example
///
/// ```rust
/// use quadrough_core::FilterBank;
///
/// let mut bank = FilterBank::new();
/// bank.prepare(48000.0, 2);
/// bank.retune(48000.0, 6.0);
///
/// let mut left = [0.0f32; 64];
/// let mut right = [0.0f32; 64];
/// left[0] = 1.0;
/// bank.process_pre(&mut [&mut left[..], &mut right[..]]);
/// assert!(left.iter().all(|s| s.is_finite()));
/// ```
#[derive(Debug, Clone)]
pub struct FilterBank {
    sample_rate: f32,
    pre: FilterChain,
    post: FilterChain,
}

impl Default for FilterBank {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterBank {
    /// Creates an unprepared bank.
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            pre: FilterChain::new(ChainPosition::Pre),
            post: FilterChain::new(ChainPosition::Post),
        }
    }

    /// Allocates state for `num_channels`, clears it and tunes for a flat tone.
    pub fn prepare(&mut self, sample_rate: f32, num_channels: usize) {
        self.sample_rate = sample_rate;
        self.pre.prepare(num_channels);
        self.post.prepare(num_channels);
        self.retune(sample_rate, 0.0);
    }

    /// Recomputes all ten stages' coefficients for a sample rate and tone.
    pub fn retune(&mut self, sample_rate: f32, tone_db: f32) {
        self.sample_rate = sample_rate;
        self.pre.retune(sample_rate, tone_db);
        self.post.retune(sample_rate, tone_db);
    }

    /// Clears all delay lines and restores flat-tone coefficients.
    pub fn reset(&mut self) {
        self.pre.reset();
        self.post.reset();
        self.retune(self.sample_rate, 0.0);
    }

    /// Runs the pre-distortion chain.
    pub fn process_pre(&mut self, channels: &mut [&mut [f32]]) {
        self.pre.process(channels);
    }

    /// Runs the post-distortion chain.
    pub fn process_post(&mut self, channels: &mut [&mut [f32]]) {
        self.post.process(channels);
    }

    /// Sample rate of the last retune.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Number of channels the bank is prepared for.
    pub fn num_channels(&self) -> usize {
        self.pre.num_channels()
    }

    /// The pre-distortion chain.
    pub fn pre(&self) -> &FilterChain {
        &self.pre
    }

    /// The post-distortion chain.
    pub fn post(&self) -> &FilterChain {
        &self.post
    }
}
