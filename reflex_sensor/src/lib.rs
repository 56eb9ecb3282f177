// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-period device attitude sampling for reflex gloss engines.
//!
//! Motion hardware is polled on a dedicated background thread. Readings are
//! marshalled to the presentation thread over a channel; the engine itself
//! is only ever touched there:
//!
//! ```text
//!   sampling thread                      presentation thread
//!   ───────────────                      ───────────────────
//!   AttitudeSource::sample()
//!       │ every period
//!       ▼
//!   AttitudeSample ──── mpsc ────► SensorAdapter::poll() ──► newest sample
//!                                         │   (bounded, drop-oldest)
//!                                         ▼
//!                               ReflexEngine::set_offset(pitch + roll)
//! ```
//!
//! If the source reports itself unavailable, [`SensorAdapter::start`] returns
//! an idle adapter: no thread is spawned and no samples are ever produced, so
//! the engine simply keeps whatever offset the host set.

mod backlog;

use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use reflex_core::reflex::ReflexEngine;
use reflex_core::trace::{SampleEvent, Tracer};

use crate::backlog::Backlog;

/// Device orientation, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Attitude {
    /// Rotation about the device's lateral axis.
    pub pitch: f64,
    /// Rotation about the device's longitudinal axis.
    pub roll: f64,
    /// Rotation about the vertical axis. Not used for the sweep.
    pub yaw: f64,
}

impl Attitude {
    /// Creates an attitude from its three angles.
    #[must_use]
    pub const fn new(pitch: f64, roll: f64, yaw: f64) -> Self {
        Self { pitch, roll, yaw }
    }

    /// Returns the raw sweep offset for this attitude: `pitch + roll`.
    ///
    /// The engine wraps it into `[0, 1)`.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.pitch + self.roll
    }
}

/// A source of device attitude readings.
///
/// Implementations wrap platform motion APIs. `sample` is called from the
/// sampling thread only.
pub trait AttitudeSource: Send {
    /// Returns whether motion hardware is present and usable.
    fn is_available(&self) -> bool;

    /// Returns the current reading, or `None` if none is ready yet.
    fn sample(&mut self) -> Option<Attitude>;
}

impl<S: AttitudeSource + ?Sized> AttitudeSource for Box<S> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn sample(&mut self) -> Option<Attitude> {
        (**self).sample()
    }
}

/// Sampler parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Time between readings.
    pub period: Duration,
    /// Samples held on the presentation side before the oldest is dropped.
    pub queue_capacity: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(20),
            queue_capacity: 4,
        }
    }
}

/// One reading, tagged with its position in the sample stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttitudeSample {
    /// Monotonic counter, starting at 0 for the first delivered reading.
    pub sequence: u64,
    /// The reading.
    pub attitude: Attitude,
}

/// Owns the sampling thread and the presentation-side sample backlog.
///
/// Dropping the adapter stops and joins the thread.
pub struct SensorAdapter {
    receiver: Option<Receiver<AttitudeSample>>,
    worker: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    backlog: Backlog,
}

impl fmt::Debug for SensorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorAdapter")
            .field("running", &self.is_running())
            .field("backlog", &self.backlog.len())
            .field("dropped", &self.backlog.evicted())
            .finish_non_exhaustive()
    }
}

impl SensorAdapter {
    /// Starts sampling `source` every `config.period`.
    ///
    /// Returns an idle adapter if the source is unavailable.
    ///
    /// # Errors
    ///
    /// Returns the error from spawning the sampling thread.
    pub fn start<S>(source: S, config: SamplerConfig) -> io::Result<Self>
    where
        S: AttitudeSource + 'static,
    {
        let mut adapter = Self {
            receiver: None,
            worker: None,
            stop: Arc::new(AtomicBool::new(false)),
            backlog: Backlog::new(config.queue_capacity),
        };
        if !source.is_available() {
            return Ok(adapter);
        }

        let (tx, rx) = mpsc::channel();
        let stop = Arc::clone(&adapter.stop);
        let worker = thread::Builder::new()
            .name("reflex-sensor".into())
            .spawn(move || run_sampler(source, config.period, &tx, &stop))?;
        adapter.receiver = Some(rx);
        adapter.worker = Some(worker);
        Ok(adapter)
    }

    /// Creates an adapter that never produces samples.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            receiver: None,
            worker: None,
            stop: Arc::new(AtomicBool::new(true)),
            backlog: Backlog::new(1),
        }
    }

    /// Returns `true` while a sampling thread is attached.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Returns how many samples were discarded because the backlog was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.backlog.evicted()
    }

    /// Removes every pending sample, oldest first.
    ///
    /// At most `queue_capacity` samples are returned; older ones have been
    /// dropped.
    pub fn drain(&mut self) -> impl Iterator<Item = AttitudeSample> + '_ {
        self.receive();
        self.backlog.take_all()
    }

    /// Returns the newest pending sample, discarding older ones.
    pub fn poll(&mut self) -> Option<AttitudeSample> {
        self.drain().last()
    }

    /// Forwards the newest pending sample to `engine`.
    ///
    /// Returns the sample that was applied, if any.
    pub fn pump(&mut self, engine: &mut ReflexEngine) -> Option<AttitudeSample> {
        self.pump_traced(engine, &mut Tracer::none())
    }

    /// Like [`pump`](Self::pump), also emitting a [`SampleEvent`].
    pub fn pump_traced(
        &mut self,
        engine: &mut ReflexEngine,
        tracer: &mut Tracer<'_>,
    ) -> Option<AttitudeSample> {
        let sample = self.poll()?;
        let offset = sample.attitude.offset();
        tracer.sample(&SampleEvent {
            sequence: sample.sequence,
            pitch: sample.attitude.pitch,
            roll: sample.attitude.roll,
            offset,
        });
        engine.set_offset(offset);
        Some(sample)
    }

    /// Stops the sampling thread and waits for it to exit.
    ///
    /// Samples already queued are discarded. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            worker.thread().unpark();
            // A panicking source only ends its own thread.
            let _ = worker.join();
        }
        self.receiver = None;
        self.backlog.clear();
    }

    fn receive(&mut self) {
        if let Some(rx) = &self.receiver {
            self.backlog.extend(rx.try_iter());
        }
    }
}

impl Drop for SensorAdapter {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_sampler<S: AttitudeSource>(
    mut source: S,
    period: Duration,
    tx: &Sender<AttitudeSample>,
    stop: &AtomicBool,
) {
    let mut sequence = 0;
    while !stop.load(Ordering::Acquire) {
        if let Some(attitude) = source.sample() {
            if tx.send(AttitudeSample { sequence, attitude }).is_err() {
                return;
            }
            sequence += 1;
        }
        // Woken early by `stop`.
        thread::park_timeout(period);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    use kurbo::Size;

    use super::*;

    /// Replays a fixed list of readings, then reports nothing.
    struct Scripted {
        readings: Vec<Attitude>,
        calls: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn new(readings: Vec<Attitude>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Self {
                readings,
                calls: Arc::clone(&calls),
            };
            (source, calls)
        }
    }

    impl AttitudeSource for Scripted {
        fn is_available(&self) -> bool {
            true
        }

        fn sample(&mut self) -> Option<Attitude> {
            let n = self.calls.fetch_add(1, Ordering::AcqRel);
            self.readings.get(n).copied()
        }
    }

    struct Unavailable;

    impl AttitudeSource for Unavailable {
        fn is_available(&self) -> bool {
            false
        }

        fn sample(&mut self) -> Option<Attitude> {
            panic!("unavailable source must not be sampled");
        }
    }

    fn fast() -> SamplerConfig {
        SamplerConfig {
            period: Duration::from_millis(1),
            ..SamplerConfig::default()
        }
    }

    /// Blocks until the scripted source has been asked for more readings
    /// than it holds, so every reading has been sent.
    fn wait_exhausted(calls: &AtomicUsize, len: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while calls.load(Ordering::Acquire) <= len {
            assert!(Instant::now() < deadline, "sampler did not run");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn attitude_offset_is_pitch_plus_roll() {
        let a = Attitude::new(0.3, 0.2, 9.0);
        assert!((a.offset() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn default_config_matches_sensor_rate() {
        let config = SamplerConfig::default();
        assert_eq!(config.period, Duration::from_millis(20));
        assert_eq!(config.queue_capacity, 4);
    }

    #[test]
    fn unavailable_source_leaves_adapter_idle() {
        let mut adapter = SensorAdapter::start(Unavailable, fast()).unwrap();
        assert!(!adapter.is_running());
        assert_eq!(adapter.poll(), None);

        let mut engine = ReflexEngine::new(Size::new(100.0, 100.0));
        engine.set_offset(0.6);
        assert_eq!(adapter.pump(&mut engine), None);
        assert!((engine.offset() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn samples_arrive_in_order() {
        let readings = vec![
            Attitude::new(0.1, 0.0, 0.0),
            Attitude::new(0.2, 0.0, 0.0),
            Attitude::new(0.3, 0.0, 0.0),
        ];
        let (source, calls) = Scripted::new(readings.clone());
        let mut adapter = SensorAdapter::start(source, fast()).unwrap();
        assert!(adapter.is_running());
        wait_exhausted(&calls, readings.len());

        let got: Vec<_> = adapter.drain().collect();
        assert_eq!(got.len(), 3);
        for (k, sample) in got.iter().enumerate() {
            assert_eq!(sample.sequence, k as u64);
            assert_eq!(sample.attitude, readings[k]);
        }
        assert_eq!(adapter.dropped(), 0);
    }

    #[test]
    fn full_backlog_drops_oldest_and_poll_returns_newest() {
        let readings: Vec<_> = (0..5)
            .map(|k| Attitude::new(f64::from(k) * 0.1, 0.0, 0.0))
            .collect();
        let (source, calls) = Scripted::new(readings);
        let config = SamplerConfig {
            queue_capacity: 2,
            ..fast()
        };
        let mut adapter = SensorAdapter::start(source, config).unwrap();
        wait_exhausted(&calls, 5);

        let newest = adapter.poll().unwrap();
        assert_eq!(newest.sequence, 4);
        assert_eq!(adapter.dropped(), 3);
        assert_eq!(adapter.poll(), None);
    }

    #[test]
    fn pump_forwards_wrapped_offset() {
        let (source, calls) = Scripted::new(vec![Attitude::new(0.5, 0.75, 0.0)]);
        let mut adapter = SensorAdapter::start(source, fast()).unwrap();
        wait_exhausted(&calls, 1);

        let mut engine = ReflexEngine::new(Size::new(100.0, 100.0));
        let applied = adapter.pump(&mut engine).unwrap();
        assert_eq!(applied.sequence, 0);
        assert!((engine.offset() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn pump_traced_reports_sample() {
        use reflex_core::trace::TraceSink;

        #[derive(Default)]
        struct Sink(Vec<SampleEvent>);
        impl TraceSink for Sink {
            fn on_sample(&mut self, e: &SampleEvent) {
                self.0.push(*e);
            }
        }

        let (source, calls) = Scripted::new(vec![Attitude::new(0.25, -0.5, 0.0)]);
        let mut adapter = SensorAdapter::start(source, fast()).unwrap();
        wait_exhausted(&calls, 1);

        let mut engine = ReflexEngine::new(Size::new(10.0, 10.0));
        let mut sink = Sink::default();
        let _ = adapter.pump_traced(&mut engine, &mut Tracer::new(&mut sink));
        assert_eq!(sink.0.len(), 1);
        assert!((sink.0[0].offset + 0.25).abs() < 1e-12);
        assert!((engine.offset() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn stop_joins_and_silences() {
        let readings = vec![Attitude::new(0.1, 0.1, 0.0); 1000];
        let (source, _calls) = Scripted::new(readings);
        let mut adapter = SensorAdapter::start(source, fast()).unwrap();
        adapter.stop();
        assert!(!adapter.is_running());
        thread::sleep(Duration::from_millis(5));
        assert_eq!(adapter.poll(), None);
        adapter.stop();
    }

    #[test]
    fn idle_adapter_is_inert() {
        let mut adapter = SensorAdapter::idle();
        assert!(!adapter.is_running());
        assert_eq!(adapter.drain().count(), 0);
    }
}
