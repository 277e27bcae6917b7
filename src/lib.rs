//! Core library for the sats-reshape command line application.
//!
//! The library turns wide survey exports into a long table keyed by
//! respondent and destination. The mapping sheet is parsed in
//! [`sats::mapping`], destination codes are discovered in
//! [`sats::destinations`], templated aliases are expanded in
//! [`sats::expand`] and merged in [`sats::assemble`], and rows are unwound in
//! [`sats::reshape`]. Spreadsheet adapters live under [`sats::io`] and the
//! end-to-end orchestration under [`sats::pipeline`].

pub mod sats;

pub use sats::{
    Result, ToolError, assemble, destinations, error, expand, io, mapping, model, pipeline,
    reshape,
};
