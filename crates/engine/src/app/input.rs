use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Confirm,
    Cancel,
}

const ACTION_COUNT: usize = 6;

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Confirm => 4,
            InputAction::Cancel => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

const BUTTON_COUNT: usize = 3;

impl PointerButton {
    const fn index(self) -> usize {
        match self {
            PointerButton::Left => 0,
            PointerButton::Middle => 1,
            PointerButton::Right => 2,
        }
    }
}

/// A press or release, recorded only when the held state actually changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key {
        action: InputAction,
        pressed: bool,
    },
    Pointer {
        button: PointerButton,
        pressed: bool,
        position_px: Option<Vec2>,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

/// Everything a frame needs from the input devices: the transitions since
/// the previous frame plus the current held state, cursor and wheel.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    events: Vec<InputEvent>,
    actions: ActionStates,
    buttons: [bool; BUTTON_COUNT],
    cursor_position_px: Option<Vec2>,
    wheel_steps: i32,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn is_button_down(&self, button: PointerButton) -> bool {
        self.buttons[button.index()]
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.events.iter().any(|event| match event {
            InputEvent::Key {
                action: key_action,
                pressed,
            } => *pressed && *key_action == action,
            InputEvent::Pointer { .. } => false,
        })
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    pub fn wheel_steps(&self) -> i32 {
        self.wheel_steps
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Held movement keys as a vector with components in `{-1, 0, 1}`;
    /// `y` grows downward.
    pub fn key_direction(&self) -> Vec2 {
        let axis = |negative: InputAction, positive: InputAction| {
            let mut value = 0.0;
            if self.is_down(negative) {
                value -= 1.0;
            }
            if self.is_down(positive) {
                value += 1.0;
            }
            value
        };
        Vec2::new(
            axis(InputAction::MoveLeft, InputAction::MoveRight),
            axis(InputAction::MoveUp, InputAction::MoveDown),
        )
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<Vec2>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }

    pub fn with_wheel_steps(mut self, wheel_steps: i32) -> Self {
        self.wheel_steps = wheel_steps;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }
}

/// Folds raw window events into one [`InputSnapshot`] per frame.
#[derive(Debug, Default)]
pub struct InputCollector {
    pending_events: Vec<InputEvent>,
    action_states: ActionStates,
    buttons: [bool; BUTTON_COUNT],
    cursor_position_px: Option<Vec2>,
    pending_wheel_steps: i32,
    window_width: u32,
    window_height: u32,
}

impl InputCollector {
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            window_width,
            window_height,
            ..Self::default()
        }
    }

    pub fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.apply_key(key_event.physical_key, is_pressed);
    }

    pub fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        let Some(button) = pointer_button(button) else {
            return;
        };
        let is_pressed = state == ElementState::Pressed;
        let slot = &mut self.buttons[button.index()];
        if *slot == is_pressed {
            return;
        }
        *slot = is_pressed;
        self.pending_events.push(InputEvent::Pointer {
            button,
            pressed: is_pressed,
            position_px: self.cursor_position_px,
        });
    }

    pub fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let steps = wheel_steps_from_scroll_delta(delta);
        self.pending_wheel_steps = self.pending_wheel_steps.saturating_add(steps);
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    pub fn set_cursor_position_px(&mut self, x: f32, y: f32) {
        self.cursor_position_px = Some(Vec2 { x, y });
    }

    pub fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
    }

    /// Drains queued transitions and the wheel; held state carries over.
    pub fn snapshot_for_frame(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            events: std::mem::take(&mut self.pending_events),
            actions: self.action_states,
            buttons: self.buttons,
            cursor_position_px: self.cursor_position_px,
            wheel_steps: self.pending_wheel_steps,
            window_width: self.window_width,
            window_height: self.window_height,
        };
        self.pending_wheel_steps = 0;
        snapshot
    }

    fn apply_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        let Some(action) = action_for_key(key) else {
            return;
        };
        // Auto-repeat arrives as repeated presses; only transitions count.
        if self.action_states.is_down(action) == is_pressed {
            return;
        }
        self.action_states.set(action, is_pressed);
        self.pending_events.push(InputEvent::Key {
            action,
            pressed: is_pressed,
        });
    }
}

fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(InputAction::MoveUp),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(InputAction::MoveDown),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(InputAction::MoveLeft),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(InputAction::MoveRight),
        KeyCode::Enter | KeyCode::Space => Some(InputAction::Confirm),
        KeyCode::Escape => Some(InputAction::Cancel),
        _ => None,
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Left),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Right => Some(PointerButton::Right),
        _ => None,
    }
}

fn wheel_steps_from_scroll_delta(delta: MouseScrollDelta) -> i32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y.round() as i32,
        MouseScrollDelta::PixelDelta(position) => {
            if position.y > 0.0 {
                1
            } else if position.y < 0.0 {
                -1
            } else {
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_set_direction() {
        let mut input = InputCollector::default();

        input.apply_key(PhysicalKey::Code(KeyCode::KeyW), true);
        input.apply_key(PhysicalKey::Code(KeyCode::ArrowLeft), true);

        let snapshot = input.snapshot_for_frame();
        assert!(snapshot.is_down(InputAction::MoveUp));
        assert!(snapshot.is_down(InputAction::MoveLeft));
        assert_eq!(snapshot.key_direction(), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::MoveLeft, true)
            .with_action_down(InputAction::MoveRight, true)
            .with_action_down(InputAction::MoveDown, true);

        assert_eq!(snapshot.key_direction(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn held_key_survives_snapshots_but_event_is_drained() {
        let mut input = InputCollector::default();
        input.apply_key(PhysicalKey::Code(KeyCode::KeyD), true);

        let first = input.snapshot_for_frame();
        let second = input.snapshot_for_frame();

        assert_eq!(
            first.events(),
            &[InputEvent::Key {
                action: InputAction::MoveRight,
                pressed: true
            }]
        );
        assert!(first.was_pressed(InputAction::MoveRight));
        assert!(second.events().is_empty());
        assert!(second.is_down(InputAction::MoveRight));
    }

    #[test]
    fn key_repeat_does_not_queue_duplicate_presses() {
        let mut input = InputCollector::default();
        for _ in 0..3 {
            input.apply_key(PhysicalKey::Code(KeyCode::Escape), true);
        }
        input.apply_key(PhysicalKey::Code(KeyCode::Escape), false);

        let snapshot = input.snapshot_for_frame();
        assert_eq!(snapshot.events().len(), 2);
        assert!(snapshot.was_pressed(InputAction::Cancel));
        assert!(!snapshot.is_down(InputAction::Cancel));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let mut input = InputCollector::default();
        input.apply_key(PhysicalKey::Code(KeyCode::F7), true);

        assert!(input.snapshot_for_frame().events().is_empty());
    }

    #[test]
    fn mouse_button_transitions_carry_cursor_position() {
        let mut input = InputCollector::new(640, 480);
        input.set_cursor_position_px(12.0, 34.0);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
        input.handle_mouse_input(MouseButton::Left, ElementState::Pressed);

        let snapshot = input.snapshot_for_frame();
        assert_eq!(
            snapshot.events(),
            &[InputEvent::Pointer {
                button: PointerButton::Left,
                pressed: true,
                position_px: Some(Vec2::new(12.0, 34.0)),
            }]
        );
        assert!(snapshot.is_button_down(PointerButton::Left));
        assert!(!snapshot.is_button_down(PointerButton::Right));
    }

    #[test]
    fn wheel_steps_sum_until_drained() {
        let mut input = InputCollector::new(1280, 720);
        input.handle_mouse_wheel(MouseScrollDelta::LineDelta(0.0, 1.0));
        input.handle_mouse_wheel(MouseScrollDelta::LineDelta(0.0, -3.0));

        let first = input.snapshot_for_frame();
        let second = input.snapshot_for_frame();

        assert_eq!(first.wheel_steps(), -2);
        assert_eq!(second.wheel_steps(), 0);
    }

    #[test]
    fn pixel_scroll_counts_as_one_step() {
        let positive = wheel_steps_from_scroll_delta(MouseScrollDelta::PixelDelta(
            winit::dpi::PhysicalPosition::new(0.0, 3.0),
        ));
        let negative = wheel_steps_from_scroll_delta(MouseScrollDelta::PixelDelta(
            winit::dpi::PhysicalPosition::new(0.0, -5.0),
        ));
        let none = wheel_steps_from_scroll_delta(MouseScrollDelta::PixelDelta(
            winit::dpi::PhysicalPosition::new(0.0, 0.0),
        ));

        assert_eq!(positive, 1);
        assert_eq!(negative, -1);
        assert_eq!(none, 0);
    }

    #[test]
    fn snapshot_reports_cursor_and_window() {
        let mut input = InputCollector::new(1280, 720);
        input.set_cursor_position_px(100.0, 200.0);
        let snapshot = input.snapshot_for_frame();

        assert_eq!(snapshot.window_size(), (1280, 720));
        let cursor = snapshot.cursor_position_px().expect("cursor");
        assert!((cursor.x - 100.0).abs() < 0.0001);
        assert!((cursor.y - 200.0).abs() < 0.0001);

        input.clear_cursor_position();
        input.set_window_size(800, 600);
        let snapshot = input.snapshot_for_frame();
        assert!(snapshot.cursor_position_px().is_none());
        assert_eq!(snapshot.window_size(), (800, 600));
    }
}
