use std::cell::Cell;

use foundation::time::Time;

/// One step of the host loop.
///
/// Camera flights, surface polling, and deferred completions all advance in
/// whole frames, so a run is reproducible from `(index, dt_s)` alone.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    /// Seconds per frame.
    pub dt_s: f64,
    /// Start of the frame.
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }

    /// Index of the frame `frames` steps after this one.
    pub fn after(self, frames: u64) -> u64 {
        self.index + frames
    }
}

/// Shared view of the host's current frame.
///
/// The host advances it; services that schedule work "n frames from now"
/// read it.
#[derive(Debug)]
pub struct FrameClock {
    current: Cell<Frame>,
}

impl FrameClock {
    pub fn new(dt_s: f64) -> Self {
        Self {
            current: Cell::new(Frame::new(0, dt_s)),
        }
    }

    pub fn current(&self) -> Frame {
        self.current.get()
    }

    /// Moves to the next frame and returns it.
    pub fn advance(&self) -> Frame {
        let next = self.current.get().next();
        self.current.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::{Frame, FrameClock};
    use foundation::time::Time;

    #[test]
    fn time_is_derived_from_index() {
        assert_eq!(Frame::new(4, 0.5).time, Time(2.0));
        assert_eq!(Frame::new(4, 0.5).next().time, Time(2.5));
        assert_eq!(Frame::new(4, 0.5).after(3), 7);
    }

    #[test]
    fn clock_advances_one_frame_at_a_time() {
        let clock = FrameClock::new(0.25);
        assert_eq!(clock.current().index, 0);
        let f = clock.advance();
        assert_eq!(f.index, 1);
        assert_eq!(clock.current(), f);
        assert_eq!(clock.advance().time, Time(0.5));
    }
}
