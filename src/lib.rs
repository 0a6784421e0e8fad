//! spoofcheck: batch audio anti-spoofing.
//!
//! Uploaded clips are normalized to mono at the model rate, scored by a
//! two-class (genuine / spoof) classifier, and the batch's Equal Error Rate is
//! computed over the collected confidences.
//!
//! * [`audio`]: format check, decoding, downmix, resampling.
//! * [`model`]: classifier capability, ONNX adapter, softmax scoring.
//! * [`metrics`]: per-batch score collection and EER.
//! * [`pipeline`]: model context and batch orchestration.
//! * [`server`]: axum HTTP front end.
//! * [`client`]: reqwest client for a running server.
//! * [`config`]: TOML settings and platform paths.
//! * [`cli`]: clap argument definitions for the binary.

pub mod audio;
pub mod cli;
pub mod client;
pub mod config;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod server;
