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

//! Translation of raw platform events into action bus calls.

use ember_core::platform::{Platform, PlatformEvent};
use ember_core::renderer::RenderBackend;
use ember_core::{ActionBus, Config};

/// Number of tracked mouse buttons. Button numbers at or above it are ignored.
pub const MOUSE_BUTTONS: usize = 8;

const DEFAULT_MOUSE_X: &str = "camera.yaw";
const DEFAULT_MOUSE_Y: &str = "camera.pitch";
const DEFAULT_ACTION: &str = "action.trigger";

/// Snapshot of the mouse, overwritten by every event cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseState {
    /// Absolute x position.
    pub x: f32,
    /// Absolute y position.
    pub y: f32,
    /// Horizontal motion seen in the current cycle.
    pub dx: f32,
    /// Vertical motion seen in the current cycle.
    pub dy: f32,
    /// Held state per button number.
    pub buttons: [bool; MOUSE_BUTTONS],
}

/// Maps device events to actions through the `input.*` config keys.
///
/// | Key | Default |
/// |---|---|
/// | `input.mouse.x` | `camera.yaw` |
/// | `input.mouse.y` | `camera.pitch` |
/// | `input.keyboard.<key>` | `action.trigger` |
/// | `input.mouse.button<n>` | `action.trigger` |
#[derive(Debug, Default)]
pub struct InputMapper {
    mouse: MouseState,
}

impl InputMapper {
    /// Creates a mapper with no buttons held.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current mouse snapshot.
    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    /// Drains `platform` and dispatches every event, then re-triggers the
    /// actions of held mouse buttons and pumps the bus. Runs once per tick.
    ///
    /// ## Returns
    /// `true` if a quit request was seen.
    pub fn handle_events(
        &mut self,
        platform: &mut dyn Platform,
        renderer: &mut dyn RenderBackend,
        config: &Config,
        actions: &mut ActionBus,
    ) -> bool {
        let mut quit = false;
        self.mouse.dx = 0.0;
        self.mouse.dy = 0.0;

        while let Some(event) = platform.poll_event() {
            match event {
                PlatformEvent::Resized { width, height } => {
                    log::debug!("Surface resized to {width}x{height}.");
                    renderer.resize(width, height);
                }
                PlatformEvent::MouseMotion { x, y, dx, dy } => {
                    self.mouse.x = x;
                    self.mouse.y = y;
                    self.mouse.dx = dx;
                    self.mouse.dy = dy;
                    if dx != 0.0 {
                        let action = config.get_string("input.mouse.x", DEFAULT_MOUSE_X);
                        actions.trigger(&action, &dx.to_string(), false);
                    }
                    if dy != 0.0 {
                        let action = config.get_string("input.mouse.y", DEFAULT_MOUSE_Y);
                        actions.trigger(&action, &dy.to_string(), false);
                    }
                }
                PlatformEvent::KeyDown { key } => {
                    let action = key_action(config, &key);
                    actions.trigger(&action, "1", true);
                }
                PlatformEvent::KeyUp { key } => {
                    let action = key_action(config, &key);
                    actions.untrigger(&action);
                }
                PlatformEvent::MouseButtonDown { button } => self.set_button(button, true),
                PlatformEvent::MouseButtonUp { button } => self.set_button(button, false),
                PlatformEvent::Quit => quit = true,
            }
        }

        for (button, _) in self.mouse.buttons.iter().enumerate().filter(|(_, held)| **held) {
            let action = config.get_string(&format!("input.mouse.button{button}"), DEFAULT_ACTION);
            actions.trigger(&action, "", false);
        }

        actions.pump();
        quit
    }

    fn set_button(&mut self, button: u8, held: bool) {
        match self.mouse.buttons.get_mut(usize::from(button)) {
            Some(state) => *state = held,
            None => log::trace!("Ignoring mouse button {button}."),
        }
    }
}

fn key_action(config: &Config, key: &str) -> String {
    config.get_string(&format!("input.keyboard.{key}"), DEFAULT_ACTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::math::Mat4;
    use ember_core::Camera;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct QueuePlatform {
        events: VecDeque<PlatformEvent>,
    }

    impl Platform for QueuePlatform {
        fn init(&mut self) -> anyhow::Result<()> {
            Ok(())
        }

        fn poll_event(&mut self) -> Option<PlatformEvent> {
            self.events.pop_front()
        }
    }

    #[derive(Default)]
    struct SizeRecorder {
        size: Option<(u32, u32)>,
    }

    impl RenderBackend for SizeRecorder {
        fn init(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
        fn resize(&mut self, width: u32, height: u32) {
            self.size = Some((width, height));
        }
        fn update(&mut self, _camera: &Camera) {}
        fn projection(&self) -> Mat4 {
            Mat4::IDENTITY
        }
        fn view(&self) -> Mat4 {
            Mat4::IDENTITY
        }
        fn swap(&mut self) {}
    }

    struct Harness {
        mapper: InputMapper,
        platform: QueuePlatform,
        renderer: SizeRecorder,
        config: Config,
        actions: ActionBus,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                mapper: InputMapper::new(),
                platform: QueuePlatform::default(),
                renderer: SizeRecorder::default(),
                config: Config::new(),
                actions: ActionBus::new(),
            }
        }

        fn tick(&mut self, events: Vec<PlatformEvent>) -> bool {
            self.platform.events.extend(events);
            self.mapper.handle_events(
                &mut self.platform,
                &mut self.renderer,
                &self.config,
                &mut self.actions,
            )
        }

        fn drain(&mut self) -> Vec<(String, String)> {
            std::iter::from_fn(|| self.actions.poll())
                .map(|e| (e.name, e.payload))
                .collect()
        }
    }

    fn fired(name: &str, payload: &str) -> (String, String) {
        (name.to_string(), payload.to_string())
    }

    #[test]
    fn held_key_fires_once_per_tick() {
        let mut h = Harness::new();
        h.config.set_string("input.keyboard.w", "move.forward");

        h.tick(vec![PlatformEvent::KeyDown { key: "w".into() }]);
        h.tick(vec![]);
        h.tick(vec![]);

        let events = h.drain();
        assert_eq!(events.len(), 3);
        assert!(events
            .iter()
            .all(|(name, payload)| name == "move.forward" && payload == "1"));

        h.tick(vec![PlatformEvent::KeyUp { key: "w".into() }]);
        assert!(!h.actions.is_active("move.forward"));
        assert!(h.drain().is_empty());
    }

    #[test]
    fn unbound_key_uses_default_action() {
        let mut h = Harness::new();
        h.tick(vec![PlatformEvent::KeyDown { key: "q".into() }]);
        assert_eq!(h.drain(), vec![fired("action.trigger", "1")]);
    }

    #[test]
    fn mouse_motion_triggers_axes_once() {
        let mut h = Harness::new();
        h.tick(vec![PlatformEvent::MouseMotion {
            x: 10.0,
            y: 20.0,
            dx: 2.5,
            dy: 0.0,
        }]);
        assert_eq!(h.drain(), vec![fired("camera.yaw", "2.5")]);
        assert_eq!(h.mapper.mouse().x, 10.0);
        assert_eq!(h.mapper.mouse().dx, 2.5);

        h.tick(vec![]);
        assert!(h.drain().is_empty());
        assert_eq!(h.mapper.mouse().dx, 0.0);
    }

    #[test]
    fn mouse_deviation_is_that_of_the_last_motion() {
        let mut h = Harness::new();
        h.tick(vec![
            PlatformEvent::MouseMotion {
                x: 10.0,
                y: 20.0,
                dx: 2.5,
                dy: 1.0,
            },
            PlatformEvent::MouseMotion {
                x: 11.0,
                y: 18.0,
                dx: 1.0,
                dy: -2.0,
            },
        ]);
        assert_eq!(h.mapper.mouse().dx, 1.0);
        assert_eq!(h.mapper.mouse().dy, -2.0);
        assert_eq!(h.mapper.mouse().x, 11.0);
    }

    #[test]
    fn held_button_retriggers_every_tick() {
        let mut h = Harness::new();
        h.config.set_string("input.mouse.button1", "fire");

        h.tick(vec![PlatformEvent::MouseButtonDown { button: 1 }]);
        h.tick(vec![]);
        assert_eq!(h.drain().len(), 2);

        h.tick(vec![PlatformEvent::MouseButtonUp { button: 1 }]);
        assert!(h.drain().is_empty());
        assert!(!h.mapper.mouse().buttons[1]);
    }

    #[test]
    fn resize_and_quit_are_forwarded() {
        let mut h = Harness::new();
        let quit = h.tick(vec![
            PlatformEvent::Resized {
                width: 640,
                height: 480,
            },
            PlatformEvent::Quit,
        ]);
        assert!(quit);
        assert_eq!(h.renderer.size, Some((640, 480)));
    }

    #[test]
    fn out_of_range_button_is_ignored() {
        let mut h = Harness::new();
        h.tick(vec![PlatformEvent::MouseButtonDown { button: 200 }]);
        assert!(h.drain().is_empty());
    }
}
