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

//! Translation from `winit` window events to the engine's [`PlatformEvent`]s.

use ember_core::platform::PlatformEvent;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Stateful `winit` translator.
///
/// `winit` reports absolute cursor positions; the translator remembers the
/// previous one to produce relative motion.
#[derive(Debug, Default)]
pub struct InputTranslator {
    last_cursor: Option<(f32, f32)>,
}

impl InputTranslator {
    /// Creates a translator with no cursor history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates one window event.
    ///
    /// ## Returns
    /// `Some(PlatformEvent)` for events the engine reacts to, `None` otherwise.
    /// Key repeats are dropped; held keys are handled by the action bus.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<PlatformEvent> {
        match event {
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                let PhysicalKey::Code(keycode) = key_event.physical_key else {
                    return None;
                };
                let key = map_keycode_to_string(keycode);
                match key_event.state {
                    ElementState::Pressed if !key_event.repeat => {
                        Some(PlatformEvent::KeyDown { key })
                    }
                    ElementState::Released => Some(PlatformEvent::KeyUp { key }),
                    _ => None,
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                let (dx, dy) = match self.last_cursor {
                    Some((lx, ly)) => (x - lx, y - ly),
                    None => (0.0, 0.0),
                };
                self.last_cursor = Some((x, y));
                Some(PlatformEvent::MouseMotion { x, y, dx, dy })
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_cursor = None;
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_mouse_button(*button);
                match state {
                    ElementState::Pressed => Some(PlatformEvent::MouseButtonDown { button }),
                    ElementState::Released => Some(PlatformEvent::MouseButtonUp { button }),
                }
            }
            WindowEvent::Resized(size) => Some(PlatformEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::CloseRequested => Some(PlatformEvent::Quit),
            _ => None,
        }
    }
}

/// Maps a physical key code to the symbol used in `input.keyboard.<key>`
/// bindings: letters and digits become the lowercase character, every other
/// key its lowercase code name (`space`, `escape`, `arrowup`, ...).
pub fn map_keycode_to_string(keycode: KeyCode) -> String {
    let name = format!("{keycode:?}").to_ascii_lowercase();
    match name.strip_prefix("key").or_else(|| name.strip_prefix("digit")) {
        Some(rest) if rest.len() == 1 => rest.to_string(),
        _ => name,
    }
}

/// Maps a `winit` mouse button to a 1-based button index.
pub fn map_mouse_button(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Middle => 2,
        MouseButton::Right => 3,
        MouseButton::Back => 4,
        MouseButton::Forward => 5,
        MouseButton::Other(id) => u8::try_from(id).unwrap_or(u8::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::{PhysicalPosition, PhysicalSize};
    use winit::event::DeviceId;

    fn cursor(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: DeviceId::dummy(),
            position: PhysicalPosition::new(x, y),
        }
    }

    #[test]
    fn test_map_keycode() {
        assert_eq!(map_keycode_to_string(KeyCode::KeyA), "a");
        assert_eq!(map_keycode_to_string(KeyCode::KeyW), "w");
        assert_eq!(map_keycode_to_string(KeyCode::Digit1), "1");
        assert_eq!(map_keycode_to_string(KeyCode::Space), "space");
        assert_eq!(map_keycode_to_string(KeyCode::Escape), "escape");
        assert_eq!(map_keycode_to_string(KeyCode::Numpad1), "numpad1");
    }

    #[test]
    fn test_map_mouse_button() {
        assert_eq!(map_mouse_button(MouseButton::Left), 1);
        assert_eq!(map_mouse_button(MouseButton::Middle), 2);
        assert_eq!(map_mouse_button(MouseButton::Right), 3);
        assert_eq!(map_mouse_button(MouseButton::Other(8)), 8);
        assert_eq!(map_mouse_button(MouseButton::Other(900)), u8::MAX);
    }

    #[test]
    fn test_cursor_motion_produces_deltas() {
        let mut translator = InputTranslator::new();
        assert_eq!(
            translator.translate(&cursor(100.0, 50.0)),
            Some(PlatformEvent::MouseMotion {
                x: 100.0,
                y: 50.0,
                dx: 0.0,
                dy: 0.0
            })
        );
        assert_eq!(
            translator.translate(&cursor(104.0, 47.0)),
            Some(PlatformEvent::MouseMotion {
                x: 104.0,
                y: 47.0,
                dx: 4.0,
                dy: -3.0
            })
        );
    }

    #[test]
    fn test_translate_mouse_buttons() {
        let mut translator = InputTranslator::new();
        let pressed = WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state: ElementState::Pressed,
            button: MouseButton::Left,
        };
        let released = WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state: ElementState::Released,
            button: MouseButton::Right,
        };
        assert_eq!(
            translator.translate(&pressed),
            Some(PlatformEvent::MouseButtonDown { button: 1 })
        );
        assert_eq!(
            translator.translate(&released),
            Some(PlatformEvent::MouseButtonUp { button: 3 })
        );
    }

    #[test]
    fn test_translate_window_events() {
        let mut translator = InputTranslator::new();
        assert_eq!(
            translator.translate(&WindowEvent::Resized(PhysicalSize::new(640, 480))),
            Some(PlatformEvent::Resized {
                width: 640,
                height: 480
            })
        );
        assert_eq!(
            translator.translate(&WindowEvent::CloseRequested),
            Some(PlatformEvent::Quit)
        );
        assert_eq!(translator.translate(&WindowEvent::Focused(true)), None);
    }
}
