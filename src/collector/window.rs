//! Fixed-capacity FIFO of the most recent feature vectors.

use std::collections::VecDeque;

use super::features::FeatureVector;

/// Number of samples the model scores at once.
pub const WINDOW_SIZE: usize = 10;

/// Sliding window over the last [`WINDOW_SIZE`] normalized samples.
///
/// Only the collector worker ever pushes, so no synchronization is needed.
/// Cleared only on session restart, never on a failed tick.
#[derive(Debug)]
pub struct SlidingWindow {
    buffer: VecDeque<FeatureVector>,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(WINDOW_SIZE),
        }
    }

    /// Append a vector, evicting the oldest when at capacity.
    pub fn push(&mut self, vector: FeatureVector) {
        if self.buffer.len() == WINDOW_SIZE {
            self.buffer.pop_front();
        }
        self.buffer.push_back(vector);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == WINDOW_SIZE
    }

    /// Defensive copy, oldest first, so inference can run without borrowing
    /// the window across the model call.
    pub fn snapshot(&self) -> Vec<FeatureVector> {
        self.buffer.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: f32) -> FeatureVector {
        FeatureVector {
            rsrp: n,
            rsrq: n,
            sinr: n,
        }
    }

    #[test]
    fn length_tracks_pushes_up_to_capacity() {
        let mut w = SlidingWindow::new();
        for i in 0..25 {
            assert_eq!(w.len(), (i).min(WINDOW_SIZE));
            w.push(v(i as f32));
        }
        assert!(w.is_full());
        assert_eq!(w.snapshot().len(), WINDOW_SIZE);
    }

    #[test]
    fn snapshot_holds_most_recent_in_push_order() {
        let mut w = SlidingWindow::new();
        for i in 0..15 {
            w.push(v(i as f32));
        }
        let snap = w.snapshot();
        let expected: Vec<f32> = (5..15).map(|i| i as f32).collect();
        let got: Vec<f32> = snap.iter().map(|f| f.rsrp).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn not_full_before_capacity() {
        let mut w = SlidingWindow::new();
        for i in 0..WINDOW_SIZE - 1 {
            w.push(v(i as f32));
            assert!(!w.is_full());
        }
        w.push(v(0.0));
        assert!(w.is_full());
    }

    #[test]
    fn clear_resets() {
        let mut w = SlidingWindow::new();
        for _ in 0..WINDOW_SIZE {
            w.push(v(0.5));
        }
        w.clear();
        assert!(w.is_empty());
        assert!(!w.is_full());
    }
}
