// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as tagged little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Layer-change records are variable length: a count followed by one
//! `(layer_index, field)` pair per change.

use reflex_core::layer::Transition;
use reflex_core::trace::{
    CommitEvent, LayerChange, LayerField, ParamChanges, SampleEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_COMMIT: u8 = 1;
const TAG_SAMPLE: u8 = 2;
const TAG_LAYER_CHANGES: u8 = 3;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_transition(&mut self, t: Transition) {
        self.write_u8(match t {
            Transition::Implicit => 0,
            Transition::Immediate => 1,
        });
    }

    fn write_field(&mut self, f: LayerField) {
        self.write_u8(match f {
            LayerField::Transform => 0,
            LayerField::Opacity => 1,
            LayerField::Geometry => 2,
            LayerField::Content => 3,
            LayerField::Topology => 4,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_commit(&mut self, e: &CommitEvent) {
        self.write_u8(TAG_COMMIT);
        self.write_u64(e.sequence);
        self.write_f64(e.offset);
        self.write_f64(e.angle);
        self.write_f64(e.scatter);
        self.write_f64(e.diagonal);
        self.write_u8(u8::from(e.degenerate));
        self.write_u8(e.changed.bits());
        self.write_u32(e.transforms);
        self.write_transition(e.transition);
    }

    fn on_sample(&mut self, e: &SampleEvent) {
        self.write_u8(TAG_SAMPLE);
        self.write_u64(e.sequence);
        self.write_f64(e.pitch);
        self.write_f64(e.roll);
        self.write_f64(e.offset);
    }

    fn on_layer_changes(&mut self, sequence: u64, changes: &[LayerChange]) {
        self.write_u8(TAG_LAYER_CHANGES);
        self.write_u64(sequence);
        let kept = &changes[..changes.len().min(u32::MAX as usize)];
        #[expect(
            clippy::cast_possible_truncation,
            reason = "layer change count capped at u32::MAX for recording"
        )]
        self.write_u32(kept.len() as u32);
        for change in kept {
            self.write_u32(change.layer_index);
            self.write_field(change.field);
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`CommitEvent`].
    Commit(CommitEvent),
    /// A [`SampleEvent`].
    Sample(SampleEvent),
    /// Per-layer changes for one commit.
    LayerChanges {
        /// Commit sequence number.
        sequence: u64,
        /// The changes, in recorded order.
        changes: Vec<LayerChange>,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        if self.remaining() < N {
            return None;
        }
        let v = self.data[self.pos..self.pos + N].try_into().ok()?;
        self.pos += N;
        Some(v)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.read_array::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_array().map(f64::from_le_bytes)
    }

    fn read_transition(&mut self) -> Option<Transition> {
        Some(match self.read_u8()? {
            0 => Transition::Implicit,
            _ => Transition::Immediate,
        })
    }

    fn read_field(&mut self) -> Option<LayerField> {
        Some(match self.read_u8()? {
            0 => LayerField::Transform,
            1 => LayerField::Opacity,
            2 => LayerField::Geometry,
            3 => LayerField::Content,
            _ => LayerField::Topology,
        })
    }

    fn decode_commit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Commit(CommitEvent {
            sequence: self.read_u64()?,
            offset: self.read_f64()?,
            angle: self.read_f64()?,
            scatter: self.read_f64()?,
            diagonal: self.read_f64()?,
            degenerate: self.read_u8()? != 0,
            changed: ParamChanges::from_bits(self.read_u8()?),
            transforms: self.read_u32()?,
            transition: self.read_transition()?,
        }))
    }

    fn decode_sample(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Sample(SampleEvent {
            sequence: self.read_u64()?,
            pitch: self.read_f64()?,
            roll: self.read_f64()?,
            offset: self.read_f64()?,
        }))
    }

    fn decode_layer_changes(&mut self) -> Option<RecordedEvent> {
        let sequence = self.read_u64()?;
        let count = self.read_u32()? as usize;
        // Each change is 5 bytes; reject counts the buffer cannot hold.
        if count > self.remaining() / 5 {
            return None;
        }
        let mut changes = Vec::with_capacity(count);
        for _ in 0..count {
            changes.push(LayerChange {
                layer_index: self.read_u32()?,
                field: self.read_field()?,
            });
        }
        Some(RecordedEvent::LayerChanges { sequence, changes })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_COMMIT => self.decode_commit(),
            TAG_SAMPLE => self.decode_sample(),
            TAG_LAYER_CHANGES => self.decode_layer_changes(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
