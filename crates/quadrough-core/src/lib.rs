//! QuadRough Core - real-time four-mode distortion chain
//!
//! This crate holds everything that runs on the audio thread: gain staging,
//! the pre/post tone filter bank, four interchangeable waveshapers, mid/side
//! routing and the output ceiling. Nothing in the block path allocates,
//! locks or returns an error.
//!
//! # Signal Flow
//!
//! ```text
//! in ─► input gain ─► pre filters ─► distortion ─► post filters ─► output gain / ceiling ─► out
//!                     (tilt +tone)   joint or M/S   (tilt -tone)
//! ```
//!
//! # Core Abstractions
//!
//! ## Processing
//!
//! - [`BlockPipeline`] - Owns all state and runs the stages in order
//! - [`Effect`] - Host seam: `prepare`, `process`, `reset`
//! - [`ProcessStage`] - The fixed stage sequence
//!
//! ## Stages
//!
//! - [`FilterBank`] - Two five-stage IIR chains around the distortion
//! - [`DistortionEngine`] - CLASSIC, PRISTINE, HARD and MAD transfer functions
//! - [`ChannelRouter`] - Joint or mid/side dispatch with preallocated scratch
//! - [`OutputStage`] - Output gain with the replacing ceiling
//!
//! ## Parameters
//!
//! - [`ParameterSnapshot`] - Control values for one block
//! - [`SharedParameters`] - Lock-free store written by control threads
//! - [`ParamId`] / [`ParamDescriptor`] - Control ids, ranges and defaults
//!
//! # no_std Support
//!
//! The crate builds without `std` (it needs `alloc` for per-channel state):
//!
//! ```toml
//! [dependencies]
//! quadrough-core = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature to log `prepare`/`reset` events.
//!
//! # Example
//!
//! ```rust
//! use quadrough_core::{BlockPipeline, ParamId, SharedParameters};
//!
//! let shared = SharedParameters::new();
//! shared.set(ParamId::Drive, 18.0);
//! shared.set(ParamId::MidSide, 1.0);
//!
//! let mut pipeline = BlockPipeline::new(48000.0, 128, 2);
//! let mut left = vec![0.5f32; 128];
//! let mut right = vec![0.1f32; 128];
//!
//! // once per audio callback
//! let params = shared.snapshot();
//! pipeline.process(&mut [&mut left[..], &mut right[..]], &params);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod distortion;
pub mod effect;
pub mod filter_bank;
pub mod math;
pub mod output;
pub mod params;
pub mod pipeline;
pub mod router;
pub mod shared;

// Re-export main types at crate root
pub use biquad::{
    Biquad, Coefficients, high_shelf_coefficients, highpass_coefficients, low_shelf_coefficients,
    lowpass_coefficients, peaking_coefficients,
};
pub use distortion::{DistortionEngine, DistortionMode, drive_gain};
pub use effect::Effect;
pub use filter_bank::{ChainPosition, FilterBank, FilterChain, FilterStage};
pub use math::{db_to_linear, linear_to_db, wet_dry_mix};
pub use output::{OutputStage, ceiling};
pub use params::{ParamDescriptor, ParamId, ParamUnit, ParamValue, ParameterSnapshot};
pub use pipeline::{BlockPipeline, MAX_CHANNELS, ProcessStage};
pub use router::{ChannelRouter, Routing};
pub use shared::SharedParameters;
