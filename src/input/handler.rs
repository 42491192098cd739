use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Game(Command),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Game(Command::Move(Direction::Up)),
            KeyCode::Down => KeyAction::Game(Command::Move(Direction::Down)),
            KeyCode::Left => KeyAction::Game(Command::Move(Direction::Left)),
            KeyCode::Right => KeyAction::Game(Command::Move(Direction::Right)),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::Game(Command::Move(Direction::Up))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::Game(Command::Move(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::Game(Command::Move(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::Game(Command::Move(Direction::Right))
            }

            // Controls
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                KeyAction::Game(Command::TogglePause)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Game(Command::Restart),
            KeyCode::Char('+') | KeyCode::Char('=') => KeyAction::Game(Command::SpeedUp),
            KeyCode::Char('-') | KeyCode::Char('_') => KeyAction::Game(Command::SlowDown),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        let cases = [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Right, Direction::Right),
        ];
        for (code, dir) in cases {
            assert_eq!(
                handler.handle_key_event(press(code)),
                KeyAction::Game(Command::Move(dir))
            );
        }
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w'))),
            KeyAction::Game(Command::Move(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('a'))),
            KeyAction::Game(Command::Move(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('s'))),
            KeyAction::Game(Command::Move(Direction::Down))
        );

        let d_upper = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(d_upper),
            KeyAction::Game(Command::Move(Direction::Right))
        );
    }

    #[test]
    fn test_control_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char(' '))),
            KeyAction::Game(Command::TogglePause)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('r'))),
            KeyAction::Game(Command::Restart)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('+'))),
            KeyAction::Game(Command::SpeedUp)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('-'))),
            KeyAction::Game(Command::SlowDown)
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('x'))), KeyAction::None);
    }
}
