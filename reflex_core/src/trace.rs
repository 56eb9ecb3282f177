// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the sample → commit loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies.
//! - `trace-rich` (implies `trace`) — gates [`LayerChange`] events and the
//!   corresponding `TraceSink` method.

use crate::layer::Transition;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which property of a layer changed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerField {
    /// Local or world transform (including hidden state).
    Transform,
    /// Opacity value.
    Opacity,
    /// Bounds.
    Geometry,
    /// Paint or replicator parameters.
    Content,
    /// Topology (parent/child relationships).
    Topology,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Which engine inputs changed since the previous commit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ParamChanges {
    /// Bounds were set (or an explicit re-layout was requested).
    pub bounds: bool,
    /// Offset was set.
    pub offset: bool,
    /// Angle was set.
    pub angle: bool,
    /// Scatter was set.
    pub scatter: bool,
}

impl ParamChanges {
    /// Returns `true` if no input changed.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.bounds || self.offset || self.angle || self.scatter)
    }

    /// Packs the flags into the low four bits (bounds, offset, angle, scatter).
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        (self.bounds as u8)
            | (self.offset as u8) << 1
            | (self.angle as u8) << 2
            | (self.scatter as u8) << 3
    }

    /// Inverse of [`bits`](Self::bits); higher bits are ignored.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            bounds: bits & 1 != 0,
            offset: bits & 2 != 0,
            angle: bits & 4 != 0,
            scatter: bits & 8 != 0,
        }
    }
}

/// Emitted each time the engine commits a batch to a presenter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CommitEvent {
    /// Monotonic commit counter, starting at 0.
    pub sequence: u64,
    /// Stored (wrapped) offset.
    pub offset: f64,
    /// Stored angle in radians.
    pub angle: f64,
    /// Stored scatter.
    pub scatter: f64,
    /// Diagonal extent of the current bounds.
    pub diagonal: f64,
    /// Whether the bounds were degenerate (mask hidden, transforms skipped).
    pub degenerate: bool,
    /// Inputs that changed since the previous commit.
    pub changed: ParamChanges,
    /// Number of layers whose world transform was recomputed.
    pub transforms: u32,
    /// How the batch was applied.
    pub transition: Transition,
}

/// Emitted by the host when a sensor sample is forwarded to the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleEvent {
    /// Sampler sequence number.
    pub sequence: u64,
    /// Device pitch in radians.
    pub pitch: f64,
    /// Device roll in radians.
    pub roll: f64,
    /// Raw offset forwarded to the engine (before wrapping).
    pub offset: f64,
}

/// A per-commit layer change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerChange {
    /// Index of the layer that changed.
    pub layer_index: u32,
    /// Which field changed.
    pub field: LayerField,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine and its host.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called when the engine commits a batch.
    fn on_commit(&mut self, e: &CommitEvent) {
        _ = e;
    }

    /// Called when a sensor sample is forwarded.
    fn on_sample(&mut self, e: &SampleEvent) {
        _ = e;
    }

    /// Called with per-commit layer changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_layer_changes(&mut self, sequence: u64, changes: &[LayerChange]) {
        _ = (sequence, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` before dispatching.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Returns whether events are being delivered anywhere.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits a [`CommitEvent`].
    #[inline]
    pub fn commit(&mut self, e: &CommitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_commit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SampleEvent`].
    #[inline]
    pub fn sample(&mut self, e: &SampleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_sample(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits layer changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn layer_changes(&mut self, sequence: u64, changes: &[LayerChange]) {
        if let Some(s) = &mut self.sink {
            s.on_layer_changes(sequence, changes);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
