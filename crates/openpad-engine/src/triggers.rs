//! Configuration-switch trigger state machine.
//!
//! Each controller carries a current, next, and previous configuration.
//! Button-down events matching a trigger arm a pending switch with a tick
//! delay; button-up events on switch-back triggers cancel a pending switch
//! or revert to the previous configuration. At most one switch is pending
//! per controller; arming again pre-empts the previous pending target.

use openpad_device_types::{
    ConfigId, ControllerId, DeviceClass, DeviceId, MAX_CONFIGURATIONS, MAX_CONTROLLERS,
};
use serde::{Deserialize, Serialize};

/// A button that switches a controller to a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEntry {
    /// Device class of the trigger button.
    pub class: DeviceClass,
    /// Device the trigger button lives on.
    pub device: DeviceId,
    /// Button id.
    pub button: u16,
    /// Whether releasing the button returns to the previous configuration.
    pub switch_back: bool,
    /// Delay before the switch commits, in milliseconds.
    pub delay_ms: u32,
}

/// A switch committed by [`ConfigSwitcher::advance_controller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedSwitch {
    /// Configuration that was active before the commit.
    pub from: ConfigId,
    /// Configuration that is active after the commit.
    pub to: ConfigId,
}

/// Per-controller configuration state and trigger definitions.
#[derive(Debug, Clone)]
pub struct ConfigSwitcher {
    triggers: Vec<Option<TriggerEntry>>,
    current: Vec<ConfigId>,
    next: Vec<Option<ConfigId>>,
    previous: Vec<Option<ConfigId>>,
    delay: Vec<u32>,
}

fn trigger_slot(controller: ControllerId, config: ConfigId) -> usize {
    controller.index() * MAX_CONFIGURATIONS + config.index()
}

impl ConfigSwitcher {
    /// Create a switcher with every controller on configuration 0 and no
    /// triggers defined.
    pub fn new() -> Self {
        let first = ConfigId::all().next().unwrap_or_default();
        Self {
            triggers: vec![None; MAX_CONTROLLERS * MAX_CONFIGURATIONS],
            current: vec![first; MAX_CONTROLLERS],
            next: vec![None; MAX_CONTROLLERS],
            previous: vec![None; MAX_CONTROLLERS],
            delay: vec![0; MAX_CONTROLLERS],
        }
    }

    /// Forget pending and previous configurations on every controller.
    pub fn init(&mut self) {
        for index in 0..MAX_CONTROLLERS {
            self.next[index] = None;
            self.previous[index] = None;
            self.delay[index] = 0;
        }
    }

    /// Define the trigger that switches a controller to a configuration.
    pub fn set_trigger(&mut self, controller: ControllerId, config: ConfigId, entry: TriggerEntry) {
        self.triggers[trigger_slot(controller, config)] = Some(entry);
    }

    /// The trigger for a configuration slot, if defined.
    pub fn trigger(&self, controller: ControllerId, config: ConfigId) -> Option<&TriggerEntry> {
        self.triggers[trigger_slot(controller, config)].as_ref()
    }

    /// The active configuration of a controller.
    #[inline]
    pub fn current(&self, controller: ControllerId) -> ConfigId {
        self.current[controller.index()]
    }

    /// The pending switch target of a controller, if any.
    #[inline]
    pub fn pending(&self, controller: ControllerId) -> Option<ConfigId> {
        self.next[controller.index()]
    }

    /// The previously active configuration of a controller, if any.
    #[inline]
    pub fn previous(&self, controller: ControllerId) -> Option<ConfigId> {
        self.previous[controller.index()]
    }

    /// Check a button event against the trigger definitions.
    ///
    /// On a press, the candidate configurations whose trigger matches the
    /// button are scanned in slot order against the effective current
    /// configuration (the pending target when a switch is already armed).
    /// The first match is kept, upgraded once to the first candidate
    /// greater than the effective current; when no candidate is greater
    /// the first match stands. On a release of a switch-back trigger, a
    /// pending switch to that configuration is cancelled, otherwise the
    /// previous configuration is restored with no delay. At most one
    /// controller arms per event.
    pub fn lookup(
        &mut self,
        class: DeviceClass,
        device: DeviceId,
        button: u16,
        released: bool,
        tick_period_ms: u32,
    ) {
        for controller in ControllerId::all() {
            let index = controller.index();
            let mut selected: Option<ConfigId> = None;
            let effective = self.next[index].unwrap_or(self.current[index]);

            for config in ConfigId::all() {
                let Some(trigger) = self.triggers[trigger_slot(controller, config)] else {
                    continue;
                };
                if trigger.class != class || trigger.device != device || trigger.button != button {
                    continue;
                }
                if !released {
                    if effective == config {
                        continue;
                    }
                    if selected.is_none() {
                        selected = Some(config);
                    }
                    if selected.is_some_and(|selected| selected < effective) && config > effective {
                        selected = Some(config);
                    }
                } else if trigger.switch_back {
                    if self.next[index] == Some(config) {
                        // Cancel the armed switch.
                        selected = Some(self.current[index]);
                    } else {
                        // Switch back to the previous configuration.
                        selected = self.previous[index];
                    }
                    break;
                }
            }

            if let Some(selected) = selected {
                self.next[index] = Some(selected);
                self.delay[index] = if released {
                    0
                } else {
                    self.trigger(controller, selected)
                        .map_or(0, |trigger| trigger.delay_ms / tick_period_ms.max(1))
                };
                break;
            }
        }
    }

    /// Advance one controller's pending switch by one tick.
    ///
    /// Returns the committed switch once the delay elapses and the target
    /// differs from the current configuration. Committing onto the current
    /// configuration clears the pending state with no other effect.
    pub fn advance_controller(&mut self, controller: ControllerId) -> Option<CommittedSwitch> {
        let index = controller.index();
        let next = self.next[index]?;
        if self.delay[index] > 0 {
            self.delay[index] -= 1;
            return None;
        }
        self.next[index] = None;
        if next != self.current[index] {
            let from = self.current[index];
            self.previous[index] = Some(from);
            self.current[index] = next;
            return Some(CommittedSwitch { from, to: next });
        }
        None
    }
}

impl Default for ConfigSwitcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ControllerId {
        ControllerId::new(0).expect("controller id")
    }

    fn config(index: usize) -> ConfigId {
        ConfigId::new(index).expect("config id")
    }

    fn entry(button: u16, switch_back: bool, delay_ms: u32) -> TriggerEntry {
        TriggerEntry {
            class: DeviceClass::Keyboard,
            device: DeviceId::new(0).expect("device id"),
            button,
            switch_back,
            delay_ms,
        }
    }

    fn press(switcher: &mut ConfigSwitcher, button: u16) {
        let device = DeviceId::new(0).expect("device id");
        switcher.lookup(DeviceClass::Keyboard, device, button, false, 4);
    }

    fn release(switcher: &mut ConfigSwitcher, button: u16) {
        let device = DeviceId::new(0).expect("device id");
        switcher.lookup(DeviceClass::Keyboard, device, button, true, 4);
    }

    #[test]
    fn test_press_arms_pending_switch() {
        let mut switcher = ConfigSwitcher::new();
        switcher.set_trigger(controller(), config(1), entry(10, false, 40));

        press(&mut switcher, 10);
        assert_eq!(switcher.pending(controller()), Some(config(1)));
        assert_eq!(switcher.current(controller()), config(0));

        // 40ms over 4ms ticks: ten ticks of delay, committing on the 11th.
        for _ in 0..10 {
            assert_eq!(switcher.advance_controller(controller()), None);
        }
        let committed = switcher.advance_controller(controller()).expect("commit");
        assert_eq!(committed, CommittedSwitch { from: config(0), to: config(1) });
        assert_eq!(switcher.current(controller()), config(1));
        assert_eq!(switcher.previous(controller()), Some(config(0)));
        assert_eq!(switcher.pending(controller()), None);
    }

    #[test]
    fn test_commit_onto_current_is_noop() {
        let mut switcher = ConfigSwitcher::new();
        switcher.set_trigger(controller(), config(1), entry(10, true, 0));

        // Release with no previous configuration: nothing arms.
        release(&mut switcher, 10);
        assert_eq!(switcher.pending(controller()), None);

        press(&mut switcher, 10);
        // Cancel before the commit: pending target becomes the current
        // configuration, and the commit must be a silent clear.
        release(&mut switcher, 10);
        assert_eq!(switcher.pending(controller()), Some(config(0)));
        assert_eq!(switcher.advance_controller(controller()), None);
        assert_eq!(switcher.current(controller()), config(0));
        assert_eq!(switcher.pending(controller()), None);
        assert_eq!(switcher.previous(controller()), None);
    }

    #[test]
    fn test_switch_back_reverts_after_commit() {
        let mut switcher = ConfigSwitcher::new();
        switcher.set_trigger(controller(), config(1), entry(10, true, 0));

        press(&mut switcher, 10);
        switcher.advance_controller(controller()).expect("commit");
        assert_eq!(switcher.current(controller()), config(1));

        release(&mut switcher, 10);
        assert_eq!(switcher.pending(controller()), Some(config(0)));
        let committed = switcher.advance_controller(controller()).expect("revert");
        assert_eq!(committed, CommittedSwitch { from: config(1), to: config(0) });
    }

    #[test]
    fn test_tie_break_prefers_greater_configuration() {
        let mut switcher = ConfigSwitcher::new();
        // Same button on slots 0 and 2; start from configuration 1.
        switcher.set_trigger(controller(), config(0), entry(10, false, 0));
        switcher.set_trigger(controller(), config(2), entry(10, false, 0));
        switcher.set_trigger(controller(), config(1), entry(11, false, 0));

        press(&mut switcher, 11);
        switcher.advance_controller(controller()).expect("reach config 1");
        assert_eq!(switcher.current(controller()), config(1));

        // The scan finds 0 first but upgrades to 2, the first slot greater
        // than the current configuration.
        press(&mut switcher, 10);
        assert_eq!(switcher.pending(controller()), Some(config(2)));
    }

    #[test]
    fn test_tie_break_falls_back_to_first_match() {
        let mut switcher = ConfigSwitcher::new();
        switcher.set_trigger(controller(), config(0), entry(10, false, 0));
        switcher.set_trigger(controller(), config(1), entry(10, false, 0));
        switcher.set_trigger(controller(), config(2), entry(11, false, 0));

        press(&mut switcher, 11);
        switcher.advance_controller(controller()).expect("reach config 2");

        // No candidate is greater than 2: the first match (0) stands even
        // though 1 is closer.
        press(&mut switcher, 10);
        assert_eq!(switcher.pending(controller()), Some(config(0)));
    }

    #[test]
    fn test_rearming_preempts_pending_switch() {
        let mut switcher = ConfigSwitcher::new();
        switcher.set_trigger(controller(), config(1), entry(10, false, 400));
        switcher.set_trigger(controller(), config(2), entry(11, false, 0));

        press(&mut switcher, 10);
        assert_eq!(switcher.pending(controller()), Some(config(1)));

        // A second trigger before the delay elapses overwrites the target.
        press(&mut switcher, 11);
        assert_eq!(switcher.pending(controller()), Some(config(2)));
        switcher.advance_controller(controller()).expect("commit");
        assert_eq!(switcher.current(controller()), config(2));
    }

    #[test]
    fn test_pressing_current_configuration_is_ignored() {
        let mut switcher = ConfigSwitcher::new();
        switcher.set_trigger(controller(), config(0), entry(10, false, 0));

        press(&mut switcher, 10);
        assert_eq!(switcher.pending(controller()), None);
    }

    #[test]
    fn test_only_first_matching_controller_arms() {
        let mut switcher = ConfigSwitcher::new();
        let second = ControllerId::new(1).expect("controller id");
        switcher.set_trigger(controller(), config(1), entry(10, false, 0));
        switcher.set_trigger(second, config(1), entry(10, false, 0));

        press(&mut switcher, 10);
        assert_eq!(switcher.pending(controller()), Some(config(1)));
        assert_eq!(switcher.pending(second), None);
    }

    #[test]
    fn test_init_clears_pending_state() {
        let mut switcher = ConfigSwitcher::new();
        switcher.set_trigger(controller(), config(1), entry(10, false, 40));
        press(&mut switcher, 10);
        switcher.init();
        assert_eq!(switcher.pending(controller()), None);
        assert_eq!(switcher.advance_controller(controller()), None);
    }
}
