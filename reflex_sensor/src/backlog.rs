// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation-side sample backlog.

use std::collections::VecDeque;
use std::collections::vec_deque::Drain;
use std::num::NonZeroUsize;

use crate::AttitudeSample;

/// The samples received since the presentation thread last looked.
///
/// Holds at most `window` samples. Admitting one more evicts the oldest, so a
/// stalled host catches up on the freshest readings and the eviction count
/// records how far it fell behind.
#[derive(Debug)]
pub(crate) struct Backlog {
    window: NonZeroUsize,
    samples: VecDeque<AttitudeSample>,
    evicted: u64,
}

impl Backlog {
    /// A window of zero is widened to one.
    pub(crate) fn new(window: usize) -> Self {
        let window = NonZeroUsize::new(window).unwrap_or(NonZeroUsize::MIN);
        Self {
            window,
            samples: VecDeque::with_capacity(window.get()),
            evicted: 0,
        }
    }

    pub(crate) fn admit(&mut self, sample: AttitudeSample) {
        if self.samples.len() == self.window.get() {
            let _ = self.samples.pop_front();
            self.evicted += 1;
        }
        self.samples.push_back(sample);
    }

    /// Hands over every held sample, oldest first.
    pub(crate) fn take_all(&mut self) -> Drain<'_, AttitudeSample> {
        self.samples.drain(..)
    }

    pub(crate) fn clear(&mut self) {
        self.samples.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.samples.len()
    }

    pub(crate) fn evicted(&self) -> u64 {
        self.evicted
    }
}

impl Extend<AttitudeSample> for Backlog {
    fn extend<I: IntoIterator<Item = AttitudeSample>>(&mut self, samples: I) {
        for sample in samples {
            self.admit(sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Attitude;

    fn sample(sequence: u64) -> AttitudeSample {
        AttitudeSample {
            sequence,
            attitude: Attitude::new(0.0, 0.0, 0.0),
        }
    }

    fn sequences(backlog: &mut Backlog) -> Vec<u64> {
        backlog.take_all().map(|s| s.sequence).collect()
    }

    #[test]
    fn zero_window_keeps_the_newest_sample() {
        let mut backlog = Backlog::new(0);
        backlog.extend([sample(10), sample(11)]);

        assert_eq!(backlog.len(), 1);
        assert_eq!(sequences(&mut backlog), [11]);
        assert_eq!(backlog.evicted(), 1);
    }

    #[test]
    fn overflow_evicts_oldest_and_counts() {
        let mut backlog = Backlog::new(3);
        backlog.extend((0..5).map(sample));

        assert_eq!(sequences(&mut backlog), [2, 3, 4]);
        assert_eq!(backlog.len(), 0);
        assert_eq!(backlog.evicted(), 2);

        backlog.admit(sample(5));
        backlog.clear();
        assert!(sequences(&mut backlog).is_empty());
        assert_eq!(backlog.evicted(), 2, "clearing is not eviction");
    }
}
