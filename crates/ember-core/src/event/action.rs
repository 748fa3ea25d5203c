// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Symbolic input actions.
//!
//! The input mapper turns raw device events into `trigger`/`untrigger` calls
//! on an [`ActionBus`]; scripts consume the resulting [`ActionEvent`]s.

use super::EventBus;
use std::collections::HashMap;

/// One firing of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEvent {
    /// Symbolic action name, e.g. `camera.yaw`.
    pub name: String,
    /// Free-form payload; `"1"` for held keys, a delta for mouse axes.
    pub payload: String,
    /// Whether the action keeps firing every tick until untriggered.
    pub continuous: bool,
}

/// Bookkeeping for an active action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionState {
    /// Payload of the last trigger.
    pub payload: String,
    /// Whether the action re-fires on every tick.
    pub continuous: bool,
    fresh: bool,
}

/// Tracks which actions are active and queues their firings.
///
/// Life cycle of one tick: the input mapper issues `trigger`/`untrigger`
/// calls, then calls [`ActionBus::pump`] which re-fires held continuous
/// actions. Once per frame [`ActionBus::update`] settles the bus.
#[derive(Debug, Default)]
pub struct ActionBus {
    bus: EventBus<ActionEvent>,
    active: HashMap<String, ActionState>,
}

impl ActionBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `name` active and queues one event for it.
    ///
    /// ## Arguments
    /// * `name` - The action to fire.
    /// * `payload` - Data carried with the event.
    /// * `continuous` - If true, the action re-fires every tick until [`ActionBus::untrigger`].
    pub fn trigger(&mut self, name: &str, payload: &str, continuous: bool) {
        log::trace!("Action '{name}' triggered (payload '{payload}', continuous {continuous}).");
        self.active.insert(
            name.to_string(),
            ActionState {
                payload: payload.to_string(),
                continuous,
                fresh: true,
            },
        );
        self.bus.publish(ActionEvent {
            name: name.to_string(),
            payload: payload.to_string(),
            continuous,
        });
    }

    /// Deactivates `name`. Returns whether it was active.
    pub fn untrigger(&mut self, name: &str) -> bool {
        let was_active = self.active.remove(name).is_some();
        if was_active {
            log::trace!("Action '{name}' untriggered.");
        }
        was_active
    }

    /// Re-fires every held continuous action that was not triggered during
    /// the current tick, then starts a new tick. Returns the number of events
    /// queued.
    pub fn pump(&mut self) -> usize {
        let mut fired = 0;
        for (name, state) in self.active.iter_mut() {
            if state.continuous && !state.fresh {
                self.bus.publish(ActionEvent {
                    name: name.clone(),
                    payload: state.payload.clone(),
                    continuous: true,
                });
                fired += 1;
            }
            state.fresh = false;
        }
        fired
    }

    /// Per-frame settle pass.
    ///
    /// One-shot actions leave the active set and events nobody consumed are
    /// discarded. Returns the number of discarded events.
    pub fn update(&mut self) -> usize {
        self.active.retain(|_, state| state.continuous);
        let stray = self.bus.drain();
        for event in &stray {
            log::debug!(
                "Discarding unconsumed action '{}' (payload '{}').",
                event.name,
                event.payload
            );
        }
        stray.len()
    }

    /// Takes the oldest queued action event.
    pub fn poll(&self) -> Option<ActionEvent> {
        self.bus.poll()
    }

    /// Returns true if `name` is currently active.
    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains_key(name)
    }

    /// Payload of the last trigger of an active action.
    pub fn payload(&self, name: &str) -> Option<&str> {
        self.active.get(name).map(|s| s.payload.as_str())
    }

    /// State of an active action.
    pub fn state(&self, name: &str) -> Option<&ActionState> {
        self.active.get(name)
    }

    /// Number of queued, unconsumed events.
    pub fn pending(&self) -> usize {
        self.bus.len()
    }

    /// Sender for queuing events from outside the owner.
    pub fn sender(&self) -> flume::Sender<ActionEvent> {
        self.bus.sender()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_named(bus: &ActionBus, name: &str) -> Vec<ActionEvent> {
        std::iter::from_fn(|| bus.poll())
            .filter(|e| e.name == name)
            .collect()
    }

    #[test]
    fn one_shot_trigger_fires_once() {
        let mut bus = ActionBus::new();
        bus.trigger("camera.yaw", "-4", false);
        assert!(bus.is_active("camera.yaw"));
        assert_eq!(bus.payload("camera.yaw"), Some("-4"));

        assert_eq!(bus.pump(), 0);
        assert_eq!(bus.pump(), 0);
        let events = drain_named(&bus, "camera.yaw");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload, "-4");
        assert!(!events[0].continuous);

        bus.update();
        assert!(!bus.is_active("camera.yaw"));
    }

    #[test]
    fn continuous_trigger_fires_once_per_tick() {
        let mut bus = ActionBus::new();

        // Tick 1: key pressed.
        bus.trigger("move.forward", "1", true);
        bus.pump();
        // Ticks 2 and 3: key still held.
        bus.pump();
        bus.pump();
        // Tick 4: key released before the pump.
        assert!(bus.untrigger("move.forward"));
        bus.pump();

        let events = drain_named(&bus, "move.forward");
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.payload == "1" && e.continuous));
        assert!(!bus.is_active("move.forward"));
    }

    #[test]
    fn continuous_action_survives_frame_update() {
        let mut bus = ActionBus::new();
        bus.trigger("move.left", "1", true);
        bus.trigger("action.trigger", "", false);
        bus.pump();

        let stray = bus.update();
        assert_eq!(stray, 2);
        assert!(bus.is_active("move.left"));
        assert!(!bus.is_active("action.trigger"));
        assert_eq!(bus.pending(), 0);

        assert_eq!(bus.pump(), 1);
    }

    #[test]
    fn untrigger_inactive_action_reports_false() {
        let mut bus = ActionBus::new();
        assert!(!bus.untrigger("nothing"));
    }

    #[test]
    fn external_sender_queues_onto_bus() {
        let bus = ActionBus::new();
        bus.sender()
            .send(ActionEvent {
                name: "ui.click".to_string(),
                payload: String::new(),
                continuous: false,
            })
            .unwrap();
        assert_eq!(bus.poll().map(|e| e.name), Some("ui.click".to_string()));
    }
}
