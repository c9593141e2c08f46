//! Rumble feedback aggregation.
//!
//! Rumble notifications can arrive faster than the hardware poll interval,
//! so per-device magnitudes are accumulated between ticks and averaged when
//! the tick fires. A device that goes silent receives exactly one stop
//! command, on the falling edge, rather than a continuous stream of
//! zero-magnitude commands.

use openpad_device_types::{DeviceId, MAX_DEVICES};

use crate::ports::ControllerAdapter;

#[derive(Debug, Clone, Copy, Default)]
struct RumbleSlot {
    count: u8,
    weak: u64,
    strong: u64,
    /// Both magnitudes were zero in the last notification while the device
    /// was still rumbling.
    falling: bool,
    off: bool,
}

/// Per-device rumble accumulators.
#[derive(Debug, Clone)]
pub struct RumbleAggregator {
    slots: [RumbleSlot; MAX_DEVICES],
}

impl RumbleAggregator {
    /// Create an aggregator with every device silent.
    pub fn new() -> Self {
        Self { slots: [RumbleSlot::default(); MAX_DEVICES] }
    }

    /// Accumulate one rumble notification.
    pub fn accumulate(&mut self, device: DeviceId, weak: u16, strong: u16) {
        let slot = &mut self.slots[device.index()];
        slot.weak += u64::from(weak);
        slot.strong += u64::from(strong);
        slot.count = slot.count.saturating_add(1);
        slot.falling = weak == 0 && strong == 0 && !slot.off;
    }

    /// Flush the tick's accumulated magnitudes to the hardware.
    ///
    /// Devices with no samples this tick are skipped entirely. A command is
    /// issued while the device rumbles, plus one final stop command when
    /// the mean falls to zero; accumulators reset either way.
    pub fn process(&mut self, adapter: &mut dyn ControllerAdapter) {
        for index in 0..MAX_DEVICES {
            let Some(device) = DeviceId::new(index) else { continue };
            let slot = &mut self.slots[index];
            if slot.count == 0 {
                continue;
            }

            let weak = (slot.weak / u64::from(slot.count)) as u16;
            let strong = (slot.strong / u64::from(slot.count)) as u16;

            slot.off = weak == 0 && strong == 0;
            if !slot.off || slot.falling {
                adapter.set_rumble(device, weak, strong);
                slot.falling = false;
            }

            slot.count = 0;
            slot.weak = 0;
            slot.strong = 0;
        }
    }
}

impl Default for RumbleAggregator {
    fn default() -> Self {
        Self::new()
    }
}
