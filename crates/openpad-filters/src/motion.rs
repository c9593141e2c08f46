//! Mouse motion merge buffer and smoothing filter.
//!
//! Raw relative-motion samples arriving between two ticks are merged into
//! the current slot of a circular buffer. Each tick, the smoothed motion is
//! a weighted trailing-window sum over the most recent slots: the current
//! slot has weight 1 and every step into the past multiplies the weight by
//! the filter factor, with the total divided by the sum of weights used.
//! The write index then advances, the new current slot is cleared, and the
//! change flag rolls into the changed flag so one decay tick still runs
//! after motion stops.

use openpad_device_types::{MOUSE_BUTTON_COUNT, MouseAxis};

/// Capacity of the circular merge buffer, in ticks.
pub const MOTION_BUFFER_LEN: usize = 64;

/// Per-device mouse motion state.
///
/// Holds the merged sample history, the smoothed output of the last
/// [`MotionFilter::smooth`] call, the sub-unit residue carried between
/// ticks, and the per-button postpone counters used by the dispatcher's
/// wheel-event compensation.
#[derive(Debug, Clone)]
pub struct MotionFilter {
    merge_x: [f64; MOTION_BUFFER_LEN],
    merge_y: [f64; MOTION_BUFFER_LEN],
    index: usize,
    x: f64,
    y: f64,
    residue_x: f64,
    residue_y: f64,
    change: bool,
    changed: bool,
    postpone: [u8; MOUSE_BUTTON_COUNT],
}

impl MotionFilter {
    /// Create an empty motion filter.
    pub fn new() -> Self {
        Self {
            merge_x: [0.0; MOTION_BUFFER_LEN],
            merge_y: [0.0; MOTION_BUFFER_LEN],
            index: 0,
            x: 0.0,
            y: 0.0,
            residue_x: 0.0,
            residue_y: 0.0,
            change: false,
            changed: false,
            postpone: [0; MOUSE_BUTTON_COUNT],
        }
    }

    /// Merge a raw relative-motion sample into the current slot.
    #[inline]
    pub fn accumulate(&mut self, xrel: f64, yrel: f64) {
        self.merge_x[self.index] += xrel;
        self.merge_y[self.index] += yrel;
        self.change = true;
    }

    /// Whether a sample arrived since the last [`MotionFilter::advance`].
    #[inline]
    pub fn change(&self) -> bool {
        self.change
    }

    /// Whether a sample arrived during the previous tick.
    #[inline]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Whether this tick needs motion processing at all.
    #[inline]
    pub fn active(&self) -> bool {
        self.change || self.changed
    }

    /// Carry the previous tick's residue into the current slot.
    ///
    /// If no new sample arrived this tick the residue is consumed: it is
    /// added once and then reset, so a stale residue is not replayed
    /// forever.
    pub fn carry_residue(&mut self) {
        self.merge_x[self.index] += self.residue_x;
        self.merge_y[self.index] += self.residue_y;
        if !self.change {
            self.residue_x = 0.0;
            self.residue_y = 0.0;
        }
    }

    /// Store the residue for one motion component.
    #[inline]
    pub fn set_residue(&mut self, which: MouseAxis, value: f64) {
        match which {
            MouseAxis::X => self.residue_x = value,
            MouseAxis::Y => self.residue_y = value,
        }
    }

    /// The stored residue for one motion component.
    #[inline]
    pub fn residue(&self, which: MouseAxis) -> f64 {
        match which {
            MouseAxis::X => self.residue_x,
            MouseAxis::Y => self.residue_y,
        }
    }

    /// Compute the smoothed motion over the trailing window.
    ///
    /// `buffer_size` is the number of history slots considered (clamped to
    /// `1..=MOTION_BUFFER_LEN`); `filter` is the per-step weight decay. The
    /// result is stored and returned by [`MotionFilter::smoothed`].
    pub fn smooth(&mut self, buffer_size: usize, filter: f64) {
        let span = buffer_size.clamp(1, MOTION_BUFFER_LEN);

        self.x = Self::weighted_sum(&self.merge_x, self.index, span, filter);
        self.y = Self::weighted_sum(&self.merge_y, self.index, span, filter);
    }

    fn weighted_sum(merge: &[f64; MOTION_BUFFER_LEN], index: usize, span: usize, filter: f64) -> f64 {
        let mut weight = 1.0;
        let mut divider = 0.0;
        let mut sum = 0.0;
        for j in 0..span {
            let k = (index + MOTION_BUFFER_LEN - j) % MOTION_BUFFER_LEN;
            sum += merge[k] * weight;
            divider += weight;
            weight *= filter;
        }
        sum / divider
    }

    /// The smoothed motion from the last [`MotionFilter::smooth`] call.
    #[inline]
    pub fn smoothed(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Roll the buffer to the next tick: advance the write index, clear the
    /// new current slot, and shift the change flag into changed.
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % MOTION_BUFFER_LEN;
        self.merge_x[self.index] = 0.0;
        self.merge_y[self.index] = 0.0;
        self.changed = self.change;
        self.change = false;
    }

    /// Drop the decay carry for this tick.
    ///
    /// Used while a dead-zone calibration mode is active on this device, so
    /// the default no-motion path runs instead of one extra decay tick.
    #[inline]
    pub fn suppress_decay(&mut self) {
        self.changed = false;
    }

    /// The postpone counter for a mouse button id.
    #[inline]
    pub fn postpone_count(&self, button: u8) -> u8 {
        self.postpone.get(usize::from(button)).copied().unwrap_or(0)
    }

    /// Increment the postpone counter for a mouse button id.
    #[inline]
    pub fn postpone_increment(&mut self, button: u8) {
        if let Some(count) = self.postpone.get_mut(usize::from(button)) {
            *count = count.saturating_add(1);
        }
    }

    /// Reset the postpone counter for a mouse button id.
    #[inline]
    pub fn postpone_reset(&mut self, button: u8) {
        if let Some(count) = self.postpone.get_mut(usize::from(button)) {
            *count = 0;
        }
    }
}

impl Default for MotionFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_accumulate_merges_samples() {
        let mut filter = MotionFilter::new();
        filter.accumulate(3.0, -2.0);
        filter.accumulate(1.0, -1.0);
        filter.smooth(1, 1.0);
        assert_eq!(filter.smoothed(), (4.0, -3.0));
        assert!(filter.change());
    }

    #[test]
    fn test_smooth_single_slot_is_identity() {
        let mut filter = MotionFilter::new();
        filter.accumulate(7.0, 9.0);
        filter.smooth(1, 0.5);
        assert_eq!(filter.smoothed(), (7.0, 9.0));
    }

    #[test]
    fn test_smooth_constant_input_converges() {
        // A device sending the same motion every tick converges to exactly
        // that motion once the window is full, whatever the decay factor.
        let mut filter = MotionFilter::new();
        for _ in 0..MOTION_BUFFER_LEN {
            filter.accumulate(5.0, -7.0);
            filter.smooth(16, 0.5);
            filter.advance();
        }
        filter.accumulate(5.0, -7.0);
        filter.smooth(16, 0.5);
        let (x, y) = filter.smoothed();
        assert_relative_eq!(x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(y, -7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_smooth_weights_decay() {
        // One old sample of 8 followed by a fresh sample of 0: with decay
        // 0.5 over two slots the result is (0*1 + 8*0.5) / 1.5.
        let mut filter = MotionFilter::new();
        filter.accumulate(8.0, 0.0);
        filter.advance();
        filter.smooth(2, 0.5);
        let (x, _) = filter.smoothed();
        assert_relative_eq!(x, 8.0 * 0.5 / 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_advance_rolls_change_flag() {
        let mut filter = MotionFilter::new();
        filter.accumulate(1.0, 0.0);
        assert!(filter.change());
        assert!(!filter.changed());

        filter.advance();
        assert!(!filter.change());
        assert!(filter.changed());
        assert!(filter.active());

        filter.advance();
        assert!(!filter.active());
    }

    #[test]
    fn test_advance_clears_new_slot() {
        let mut filter = MotionFilter::new();
        for _ in 0..MOTION_BUFFER_LEN + 3 {
            filter.accumulate(1.0, 1.0);
            filter.advance();
        }
        // The slot we landed on wrapped around and must have been cleared.
        filter.smooth(1, 1.0);
        assert_eq!(filter.smoothed(), (0.0, 0.0));
    }

    #[test]
    fn test_residue_carried_once_without_new_sample() {
        let mut filter = MotionFilter::new();
        filter.set_residue(MouseAxis::X, 0.25);
        filter.set_residue(MouseAxis::Y, -0.5);

        // No new sample this tick: the residue lands in the slot and is
        // consumed.
        filter.carry_residue();
        filter.smooth(1, 1.0);
        assert_eq!(filter.smoothed(), (0.25, -0.5));
        assert_eq!(filter.residue(MouseAxis::X), 0.0);
        assert_eq!(filter.residue(MouseAxis::Y), 0.0);
    }

    #[test]
    fn test_residue_kept_when_sample_arrived() {
        let mut filter = MotionFilter::new();
        filter.set_residue(MouseAxis::X, 0.25);
        filter.accumulate(2.0, 0.0);
        filter.carry_residue();
        assert_eq!(filter.residue(MouseAxis::X), 0.25);
        filter.smooth(1, 1.0);
        assert_eq!(filter.smoothed(), (2.25, 0.0));
    }

    #[test]
    fn test_suppress_decay() {
        let mut filter = MotionFilter::new();
        filter.accumulate(1.0, 0.0);
        filter.advance();
        assert!(filter.changed());
        filter.suppress_decay();
        assert!(!filter.changed());
        assert!(!filter.active());
    }

    #[test]
    fn test_postpone_counters() {
        let mut filter = MotionFilter::new();
        assert_eq!(filter.postpone_count(3), 0);
        filter.postpone_increment(3);
        filter.postpone_increment(3);
        assert_eq!(filter.postpone_count(3), 2);
        filter.postpone_reset(3);
        assert_eq!(filter.postpone_count(3), 0);

        // Out-of-range ids are ignored, not a panic.
        filter.postpone_increment(200);
        assert_eq!(filter.postpone_count(200), 0);
    }
}
