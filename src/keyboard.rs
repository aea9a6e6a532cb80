// Keyboard source: reads terminal keys and publishes them on the keyboard topic
// Controls: W/S drive, A/D steer, SPACE stop, Q/ESC/Ctrl-C quit
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{topic_key_expr, NodeParams, KEYBOARD_POLL_MS};
use crate::error::Result;

/// What to do with one terminal key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Publish(String),
    Quit,
    Skip,
}

/// Map a terminal key event to the payload sent on the keyboard topic.
///
/// Characters go out as-is. A few named keys go out as lowercase names so the
/// node can see (and ignore) them. Releases and everything else are skipped.
pub fn key_action(key: &KeyEvent) -> KeyAction {
    let pressed = key.kind == KeyEventKind::Press || key.kind == KeyEventKind::Repeat;
    if !pressed {
        return KeyAction::Skip;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char(c) => KeyAction::Publish(c.to_string()),
        KeyCode::Up => KeyAction::Publish("up".to_string()),
        KeyCode::Down => KeyAction::Publish("down".to_string()),
        KeyCode::Left => KeyAction::Publish("left".to_string()),
        KeyCode::Right => KeyAction::Publish("right".to_string()),
        KeyCode::Enter => KeyAction::Publish("enter".to_string()),
        KeyCode::Tab => KeyAction::Publish("tab".to_string()),
        KeyCode::Backspace => KeyAction::Publish("backspace".to_string()),
        _ => KeyAction::Skip,
    }
}

pub async fn run(params: NodeParams) -> Result<()> {
    let key_topic = topic_key_expr("keyboard_topic", &params.keyboard_topic)?;

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(key_topic.clone()).await?;

    info!("Publishing keys to: {}", key_topic);
    info!("Controls: W/S=drive, A/D=steer, SPACE=stop, Q=quit");

    enable_raw_mode()?;
    let result = run_keyboard(&publisher).await;
    disable_raw_mode()?;

    result?;
    session.close().await?;
    Ok(())
}

async fn run_keyboard(publisher: &zenoh::pubsub::Publisher<'_>) -> Result<()> {
    loop {
        // Poll so the task never blocks the runtime for long
        if !event::poll(Duration::from_millis(KEYBOARD_POLL_MS))? {
            tokio::task::yield_now().await;
            continue;
        }

        if let Event::Key(key) = event::read()? {
            match key_action(&key) {
                KeyAction::Publish(payload) => {
                    debug!("Key {:?}", payload);
                    publisher.put(payload).await?;
                }
                KeyAction::Quit => break,
                KeyAction::Skip => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        key(code, KeyEventKind::Press)
    }

    #[test]
    fn test_drive_keys_published() {
        for c in ['w', 's', 'a', 'd', ' '] {
            assert_eq!(
                key_action(&press(KeyCode::Char(c))),
                KeyAction::Publish(c.to_string())
            );
        }
    }

    #[test]
    fn test_named_keys_published_by_name() {
        assert_eq!(
            key_action(&press(KeyCode::Up)),
            KeyAction::Publish("up".to_string())
        );
        assert_eq!(
            key_action(&press(KeyCode::Enter)),
            KeyAction::Publish("enter".to_string())
        );
        assert_eq!(key_action(&press(KeyCode::F(5))), KeyAction::Skip);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(key_action(&press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(key_action(&press(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..press(KeyCode::Char('c'))
        };
        assert_eq!(key_action(&ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_release_and_repeat() {
        assert_eq!(
            key_action(&key(KeyCode::Char('w'), KeyEventKind::Release)),
            KeyAction::Skip
        );
        assert_eq!(
            key_action(&key(KeyCode::Char('w'), KeyEventKind::Repeat)),
            KeyAction::Publish("w".to_string())
        );
    }
}
