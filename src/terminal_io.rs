use std::collections::HashMap;
use std::io;
use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, error};

use crate::constants::HOLD_FRAMES;

/// Everything the simulation needs to know about the player's hands for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub quit: bool,
    pub move_up_held: bool,   // Level-triggered
    pub move_down_held: bool, // Level-triggered
    pub shoot_pressed: bool,  // Edge-triggered
    pub restart_pressed: bool, // Edge-triggered
    pub resize: Option<(u16, u16)>,
}

pub trait InputProvider {
    fn poll(&mut self, frame: u64) -> io::Result<FrameInput>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Folds raw key events into a `FrameInput`.
///
/// Movement keys stay held until a release event arrives. Terminals that never
/// report releases get a lapse instead: the key counts as held for
/// `HOLD_FRAMES` frames after the last press or auto-repeat.
#[derive(Debug, Default)]
pub struct KeyTracker {
    up_until: u64,
    down_until: u64,
    releases_reported: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        KeyTracker::default()
    }

    pub fn begin_frame(&self, frame: u64) -> FrameInput {
        FrameInput {
            move_up_held: frame < self.up_until,
            move_down_held: frame < self.down_until,
            ..Default::default()
        }
    }

    pub fn apply(&mut self, event: &Event, frame: u64, input: &mut FrameInput) {
        match event {
            Event::Key(key_event) => self.apply_key(key_event, frame, input),
            Event::Resize(width, height) => input.resize = Some((*width, *height)),
            _ => {}
        }
    }

    fn apply_key(&mut self, key_event: &KeyEvent, frame: u64, input: &mut FrameInput) {
        let pressed = matches!(key_event.kind, KeyEventKind::Press);
        let held = matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat);

        if key_event.kind == KeyEventKind::Release {
            self.releases_reported = true;
        }

        let direction = match key_event.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
            _ => None,
        };
        if let Some(direction) = direction {
            let until = if !held {
                0
            } else if self.releases_reported {
                u64::MAX
            } else {
                frame + HOLD_FRAMES
            };
            match direction {
                Direction::Up => self.up_until = until,
                Direction::Down => self.down_until = until,
            }
            input.move_up_held = frame < self.up_until;
            input.move_down_held = frame < self.down_until;
            return;
        }

        if !pressed {
            return;
        }
        match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => input.quit = true,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => input.quit = true,
            KeyCode::Char(' ') => input.shoot_pressed = true,
            KeyCode::Char('r') | KeyCode::Char('R') => input.restart_pressed = true,
            _ => {}
        }
    }
}

// --- Live terminal input ---
pub struct TerminalInput {
    tracker: KeyTracker,
}

impl TerminalInput {
    pub fn new() -> Self {
        TerminalInput { tracker: KeyTracker::new() }
    }
}

impl InputProvider for TerminalInput {
    /// Drains every pending event without blocking the frame.
    fn poll(&mut self, frame: u64) -> io::Result<FrameInput> {
        let mut input = self.tracker.begin_frame(frame);
        while event::poll(Duration::ZERO).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
            let current_event = event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?;
            self.tracker.apply(&current_event, frame, &mut input);
        }
        Ok(input)
    }
}

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    events: HashMap<u64, Vec<Event>>,
    tracker: KeyTracker,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Vec<Event>>) -> Self {
        SimulatedInput { events, tracker: KeyTracker::new() }
    }

    /// Scripted session used by `--debug`: climb, fire a few volleys, dive, quit.
    pub fn demo_script(quit_frame: u64) -> Self {
        let mut events: HashMap<u64, Vec<Event>> = HashMap::new();
        for frame in (0..quit_frame).step_by(20) {
            events.entry(frame).or_default().push(Event::Key(KeyCode::Char(' ').into()));
        }
        for frame in (5..60).step_by(4) {
            events.entry(frame).or_default().push(Event::Key(KeyCode::Up.into()));
        }
        for frame in (90..180).step_by(4) {
            events.entry(frame).or_default().push(Event::Key(KeyCode::Down.into()));
        }
        events.entry(quit_frame).or_default().push(Event::Key(KeyCode::Char('q').into()));
        SimulatedInput::new(events)
    }
}

impl InputProvider for SimulatedInput {
    fn poll(&mut self, frame: u64) -> io::Result<FrameInput> {
        let mut input = self.tracker.begin_frame(frame);
        if let Some(events) = self.events.remove(&frame) {
            for current_event in &events {
                debug!("Simulated event on frame {}: {:?}", frame, current_event);
                self.tracker.apply(current_event, frame, &mut input);
            }
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent { code, modifiers: KeyModifiers::NONE, kind, state: KeyEventState::NONE })
    }

    fn press(code: KeyCode) -> Event {
        key(code, KeyEventKind::Press)
    }

    #[test]
    fn test_shoot_fires_on_press_only() {
        let mut tracker = KeyTracker::new();
        let mut input = tracker.begin_frame(0);
        tracker.apply(&press(KeyCode::Char(' ')), 0, &mut input);
        assert!(input.shoot_pressed);

        let mut input = tracker.begin_frame(1);
        tracker.apply(&key(KeyCode::Char(' '), KeyEventKind::Repeat), 1, &mut input);
        assert!(!input.shoot_pressed);

        let input = tracker.begin_frame(2);
        assert!(!input.shoot_pressed);
    }

    #[test]
    fn test_movement_lapses_without_release_events() {
        let mut tracker = KeyTracker::new();
        let mut input = tracker.begin_frame(10);
        tracker.apply(&press(KeyCode::Up), 10, &mut input);
        assert!(input.move_up_held);
        assert!(tracker.begin_frame(10 + HOLD_FRAMES - 1).move_up_held);
        assert!(!tracker.begin_frame(10 + HOLD_FRAMES).move_up_held);

        let mut input = tracker.begin_frame(12);
        tracker.apply(&key(KeyCode::Up, KeyEventKind::Repeat), 12, &mut input);
        assert!(tracker.begin_frame(12 + HOLD_FRAMES - 1).move_up_held);
    }

    #[test]
    fn test_movement_held_until_release_when_reported() {
        let mut tracker = KeyTracker::new();
        let mut input = tracker.begin_frame(0);
        tracker.apply(&key(KeyCode::Char('x'), KeyEventKind::Release), 0, &mut input);
        tracker.apply(&press(KeyCode::Down), 0, &mut input);
        assert!(input.move_down_held);
        assert!(tracker.begin_frame(10_000).move_down_held);

        let mut input = tracker.begin_frame(10_001);
        tracker.apply(&key(KeyCode::Down, KeyEventKind::Release), 10_001, &mut input);
        assert!(!input.move_down_held);
        assert!(!tracker.begin_frame(10_002).move_down_held);
    }

    #[test]
    fn test_quit_and_restart_keys() {
        let mut tracker = KeyTracker::new();
        let mut input = tracker.begin_frame(0);
        tracker.apply(&press(KeyCode::Char('r')), 0, &mut input);
        assert!(input.restart_pressed);
        assert!(!input.quit);

        let mut input = tracker.begin_frame(1);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        tracker.apply(&ctrl_c, 1, &mut input);
        assert!(input.quit);

        let mut input = tracker.begin_frame(2);
        tracker.apply(&press(KeyCode::Char('c')), 2, &mut input);
        assert!(!input.quit);
    }

    #[test]
    fn test_resize_is_forwarded() {
        let mut tracker = KeyTracker::new();
        let mut input = tracker.begin_frame(0);
        tracker.apply(&Event::Resize(120, 40), 0, &mut input);
        assert_eq!(input.resize, Some((120, 40)));
    }

    #[test]
    fn test_simulated_input_replays_script() {
        let mut events = HashMap::new();
        events.insert(3, vec![press(KeyCode::Char(' ')), press(KeyCode::Up)]);
        events.insert(5, vec![press(KeyCode::Char('q'))]);
        let mut sim = SimulatedInput::new(events);

        assert_eq!(sim.poll(0).unwrap(), FrameInput::default());
        let input = sim.poll(3).unwrap();
        assert!(input.shoot_pressed && input.move_up_held);
        let input = sim.poll(4).unwrap();
        assert!(!input.shoot_pressed && input.move_up_held);
        assert!(sim.poll(5).unwrap().quit);
        // Events are consumed once.
        assert!(!sim.poll(5).unwrap().quit);
    }

    #[test]
    fn test_demo_script_ends_with_quit() {
        let mut sim = SimulatedInput::demo_script(300);
        let quit_frame = (0..=300).find(|&frame| sim.poll(frame).unwrap().quit);
        assert_eq!(quit_frame, Some(300));
    }
}
