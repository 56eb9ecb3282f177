// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use reflex_core::layer::Transition;
use reflex_core::trace::{
    CommitEvent, LayerChange, LayerField, ParamChanges, SampleEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Formats changed inputs as `bounds+offset`, or `-` if none changed.
pub(crate) fn changed_names(changed: ParamChanges) -> String {
    let names: Vec<&str> = [
        (changed.bounds, "bounds"),
        (changed.offset, "offset"),
        (changed.angle, "angle"),
        (changed.scatter, "scatter"),
    ]
    .into_iter()
    .filter_map(|(set, name)| set.then_some(name))
    .collect();
    if names.is_empty() {
        "-".to_owned()
    } else {
        names.join("+")
    }
}

pub(crate) fn transition_name(t: Transition) -> &'static str {
    match t {
        Transition::Implicit => "implicit",
        Transition::Immediate => "immediate",
    }
}

fn field_name(field: LayerField) -> &'static str {
    match field {
        LayerField::Transform => "transform",
        LayerField::Opacity => "opacity",
        LayerField::Geometry => "geometry",
        LayerField::Content => "content",
        LayerField::Topology => "topology",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_commit(&mut self, e: &CommitEvent) {
        let state = if e.degenerate { " DEGENERATE" } else { "" };
        let _ = writeln!(
            self.writer,
            "[commit] seq={} offset={:.4} angle={:.4} scatter={:.2} diag={:.1} \
             changed={} transforms={} {}{state}",
            e.sequence,
            e.offset,
            e.angle,
            e.scatter,
            e.diagonal,
            changed_names(e.changed),
            e.transforms,
            transition_name(e.transition),
        );
    }

    fn on_sample(&mut self, e: &SampleEvent) {
        let _ = writeln!(
            self.writer,
            "[sample] seq={} pitch={:.4} roll={:.4} offset={:.4}",
            e.sequence, e.pitch, e.roll, e.offset,
        );
    }

    fn on_layer_changes(&mut self, sequence: u64, changes: &[LayerChange]) {
        let detail: Vec<String> = changes
            .iter()
            .map(|c| format!("#{}:{}", c.layer_index, field_name(c.field)))
            .collect();
        let _ = writeln!(
            self.writer,
            "[layers] seq={sequence} changes={} {}",
            changes.len(),
            detail.join(" "),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_print_commit() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_commit(&CommitEvent {
            sequence: 4,
            offset: 0.25,
            angle: 0.0,
            scatter: 1.0,
            diagonal: 141.421,
            degenerate: false,
            changed: ParamChanges {
                offset: true,
                angle: true,
                ..ParamChanges::default()
            },
            transforms: 3,
            transition: Transition::Immediate,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.starts_with("[commit] seq=4"), "got: {output}");
        assert!(output.contains("offset=0.2500"), "got: {output}");
        assert!(output.contains("changed=offset+angle"), "got: {output}");
        assert!(output.contains("immediate"), "got: {output}");
        assert!(!output.contains("DEGENERATE"), "got: {output}");
    }

    #[test]
    fn pretty_print_sample_and_layers() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_sample(&SampleEvent {
            sequence: 9,
            pitch: 0.1,
            roll: -0.3,
            offset: -0.2,
        });
        sink.on_layer_changes(
            2,
            &[LayerChange {
                layer_index: 2,
                field: LayerField::Transform,
            }],
        );
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "[sample] seq=9 pitch=0.1000 roll=-0.3000 offset=-0.2000"
        );
        assert_eq!(lines[1], "[layers] seq=2 changes=1 #2:transform");
    }

    #[test]
    fn unchanged_inputs_print_dash() {
        assert_eq!(changed_names(ParamChanges::default()), "-");
        assert_eq!(changed_names(ParamChanges::from_bits(0b1001)), "bounds+scatter");
    }
}
