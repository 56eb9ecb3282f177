// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Recordings carry sequence numbers rather than wall-clock time. Events are
//! placed on a logical timeline where sequence `n` sits at `n × period`,
//! which matches the sampler's fixed period when the host commits once per
//! sample.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};
use std::time::Duration;

use serde_json::{Value, json};

use crate::pretty::{changed_names, transition_name};
use crate::recorder::{RecordedEvent, decode};

const TID_ENGINE: u32 = 0;
const TID_SENSOR: u32 = 1;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Commits become instant events plus `offset`/`angle` counter tracks;
/// samples become instant events plus a `tilt` counter track.
pub fn export(bytes: &[u8], period: Duration, writer: &mut dyn Write) -> io::Result<()> {
    let period_us = period.as_secs_f64() * 1e6;
    let ts = |sequence: u64| sequence as f64 * period_us;
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Commit(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Commit",
                    "cat": "Engine",
                    "ts": ts(e.sequence),
                    "pid": 0,
                    "tid": TID_ENGINE,
                    "s": "t",
                    "args": {
                        "sequence": e.sequence,
                        "changed": changed_names(e.changed),
                        "diagonal": e.diagonal,
                        "scatter": e.scatter,
                        "degenerate": e.degenerate,
                        "transforms": e.transforms,
                        "transition": transition_name(e.transition),
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "sweep",
                    "ts": ts(e.sequence),
                    "pid": 0,
                    "tid": TID_ENGINE,
                    "args": {
                        "offset": e.offset,
                        "angle": e.angle,
                    }
                }));
            }
            RecordedEvent::Sample(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Sample",
                    "cat": "Sensor",
                    "ts": ts(e.sequence),
                    "pid": 0,
                    "tid": TID_SENSOR,
                    "s": "t",
                    "args": {
                        "sequence": e.sequence,
                        "offset": e.offset,
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "tilt",
                    "ts": ts(e.sequence),
                    "pid": 0,
                    "tid": TID_SENSOR,
                    "args": {
                        "pitch": e.pitch,
                        "roll": e.roll,
                    }
                }));
            }
            RecordedEvent::LayerChanges { sequence, changes } => {
                let layers: Vec<Value> = changes
                    .iter()
                    .map(|c| json!([c.layer_index, format!("{:?}", c.field)]))
                    .collect();
                events.push(json!({
                    "ph": "i",
                    "name": "LayerChanges",
                    "cat": "Rich",
                    "ts": ts(sequence),
                    "pid": 0,
                    "tid": TID_ENGINE,
                    "s": "t",
                    "args": {
                        "sequence": sequence,
                        "count": changes.len(),
                        "layers": layers,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use reflex_core::layer::Transition;
    use reflex_core::trace::{
        CommitEvent, LayerChange, LayerField, ParamChanges, SampleEvent, TraceSink,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_sample(&SampleEvent {
            sequence: 3,
            pitch: 0.5,
            roll: 0.25,
            offset: 0.75,
        });
        rec.on_commit(&CommitEvent {
            sequence: 3,
            offset: 0.75,
            angle: 0.0,
            scatter: 1.0,
            diagonal: 50.0,
            degenerate: false,
            changed: ParamChanges {
                offset: true,
                ..ParamChanges::default()
            },
            transforms: 2,
            transition: Transition::Immediate,
        });
        rec.on_layer_changes(
            3,
            &[LayerChange {
                layer_index: 2,
                field: LayerField::Transform,
            }],
        );

        let mut out = Vec::new();
        export(rec.as_bytes(), Duration::from_millis(20), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 5);

        assert_eq!(parsed[0]["name"], "Sample");
        assert_eq!(parsed[0]["tid"], TID_SENSOR);
        let ts = parsed[0]["ts"].as_f64().unwrap();
        assert!((ts - 60_000.0).abs() < 1e-6, "ts = {ts}");
        assert_eq!(parsed[1]["ph"], "C");
        assert_eq!(parsed[1]["args"]["pitch"], 0.5);

        assert_eq!(parsed[2]["name"], "Commit");
        assert_eq!(parsed[2]["args"]["changed"], "offset");
        assert_eq!(parsed[2]["args"]["transition"], "immediate");
        assert_eq!(parsed[3]["args"]["offset"], 0.75);

        assert_eq!(parsed[4]["name"], "LayerChanges");
        assert_eq!(parsed[4]["args"]["count"], 1);
        assert_eq!(parsed[4]["args"]["layers"][0][1], "Transform");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Duration::from_millis(20), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
