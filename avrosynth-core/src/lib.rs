//! # avrosynth core
//!
//! Value model and wire primitives shared by the avrosynth crates.
//!
//! This crate provides:
//! - [`Value`], the dynamically typed datum produced by the synthesizer
//! - [`EncoderBuffer`] / [`DecoderBuffer`] for the Avro binary primitives
//! - Error types for encoding/decoding operations

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod value;

pub use decoder::DecoderBuffer;
pub use encoder::EncoderBuffer;
pub use error::{Error, Result};
pub use value::Value;
