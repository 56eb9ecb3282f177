// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives a gloss sweep over a label-sized region and draws it in the
//! terminal.
//!
//! Three phases run back to back:
//!
//! 1. a synthetic wobbling device feeds the engine through a
//!    [`SensorAdapter`] at the default 20 ms period;
//! 2. a manual slider sweep steps offset and angle directly, as a host
//!    without motion hardware would;
//! 3. the content collapses to zero width and back, showing the hidden
//!    degenerate state and the re-applied parameters.
//!
//! Every event goes to a [`PrettyPrintSink`] and a [`RecorderSink`]; the
//! recording is exported as a Chrome trace at the end.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{self, BufWriter};
use std::thread;

use kurbo::{Point, Size};
use reflex_core::backend::Presenter;
use reflex_core::layer::{FrameChanges, LayerId, LayerStore, Transition};
use reflex_core::mask::{ContentMask, HostContent, MaskSampler};
use reflex_core::paint::Color;
use reflex_core::reflex::ReflexEngine;
use reflex_core::trace::{CommitEvent, LayerChange, SampleEvent, TraceSink, Tracer};
use reflex_debug::pretty::PrettyPrintSink;
use reflex_debug::recorder::RecorderSink;
use reflex_sensor::{Attitude, AttitudeSource, SamplerConfig, SensorAdapter};

const COLUMNS: u32 = 48;
const CONTENT: Size = Size::new(48.0, 12.0);
const SENSOR_FRAMES: u32 = 40;
const SLIDER_STEPS: u32 = 8;
const SHADES: &[u8] = b" .:-=+*#%@";

/// A device rocking gently in the user's hand.
struct Wobble {
    t: f64,
}

impl AttitudeSource for Wobble {
    fn is_available(&self) -> bool {
        true
    }

    fn sample(&mut self) -> Option<Attitude> {
        self.t += 0.05;
        Some(Attitude::new(
            0.6 * (self.t * 1.3).sin(),
            0.4 * (self.t * 0.7).cos(),
            0.0,
        ))
    }
}

/// Prints one shaded row through the middle of the masked label per batch.
struct TerminalPresenter {
    root: LayerId,
    label: ContentMask,
    batches: u32,
}

impl Presenter for TerminalPresenter {
    fn apply(&mut self, store: &LayerStore, changes: &FrameChanges) {
        self.batches += 1;
        if changes.is_empty() {
            return;
        }
        debug_assert_eq!(
            changes.transition,
            Transition::Immediate,
            "gloss batches must not animate"
        );
        let sampler = MaskSampler::new(store, self.root);
        println!("|{}|", self.row(&sampler));
    }
}

impl TerminalPresenter {
    fn row(&self, sampler: &MaskSampler) -> String {
        let y = CONTENT.height / 2.0;
        let max = (SHADES.len() - 1) as f32;
        (0..COLUMNS)
            .map(|x| {
                let p = Point::new(f64::from(x) + 0.5, y);
                let alpha = self.label.visible_at(sampler, p).a / self.label.opacity;
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "alpha is in [0, 1], so the index is within SHADES"
                )]
                let shade = (alpha.clamp(0.0, 1.0) * max).round() as usize;
                char::from(SHADES[shade])
            })
            .collect()
    }
}

/// Forwards every event to both the pretty printer and the recorder.
struct DemoSink {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for DemoSink {
    fn on_commit(&mut self, e: &CommitEvent) {
        self.pretty.on_commit(e);
        self.recorder.on_commit(e);
    }

    fn on_sample(&mut self, e: &SampleEvent) {
        self.pretty.on_sample(e);
        self.recorder.on_sample(e);
    }

    fn on_layer_changes(&mut self, sequence: u64, changes: &[LayerChange]) {
        self.pretty.on_layer_changes(sequence, changes);
        self.recorder.on_layer_changes(sequence, changes);
    }
}

fn main() -> io::Result<()> {
    let mut sink = DemoSink {
        pretty: PrettyPrintSink::new(Box::new(io::stderr())),
        recorder: RecorderSink::new(),
    };

    let mut engine = ReflexEngine::new(CONTENT);
    let mut presenter = TerminalPresenter {
        root: engine.mask_layer(),
        label: ContentMask::new(HostContent::Fill {
            size: CONTENT,
            color: Color::WHITE,
        }),
        batches: 0,
    };

    reflex_debug::tree::dump(engine.store(), engine.mask_layer(), &mut io::stdout())?;
    engine.commit(&mut presenter, &mut Tracer::new(&mut sink));

    // -- 1. sensor-driven ---------------------------------------------------
    let config = SamplerConfig::default();
    let mut sensor = SensorAdapter::start(Wobble { t: 0.0 }, config)?;
    for _ in 0..SENSOR_FRAMES {
        thread::sleep(config.period);
        if sensor
            .pump_traced(&mut engine, &mut Tracer::new(&mut sink))
            .is_some()
        {
            engine.commit(&mut presenter, &mut Tracer::new(&mut sink));
        }
    }
    sensor.stop();
    println!("sensor: {} samples dropped", sensor.dropped());

    // -- 2. manual slider ---------------------------------------------------
    for step in 0..=SLIDER_STEPS {
        let v = f64::from(step) / f64::from(SLIDER_STEPS);
        engine.set_offset(v);
        engine.set_angle(v * PI / 4.0);
        engine.commit(&mut presenter, &mut Tracer::new(&mut sink));
    }

    // -- 3. degenerate bounds -----------------------------------------------
    engine.set_bounds(0.0, CONTENT.height);
    engine.commit(&mut presenter, &mut Tracer::new(&mut sink));
    engine.set_bounds(CONTENT.width, CONTENT.height);
    engine.commit(&mut presenter, &mut Tracer::new(&mut sink));
    reflex_debug::tree::dump(engine.store(), engine.mask_layer(), &mut io::stdout())?;

    // -- export Chrome trace ------------------------------------------------
    let path = "gloss_trace.json";
    let mut writer = BufWriter::new(File::create(path)?);
    reflex_debug::chrome::export(sink.recorder.as_bytes(), config.period, &mut writer)?;

    println!("Wrote {path} ({} batches presented)", presenter.batches);
    Ok(())
}
