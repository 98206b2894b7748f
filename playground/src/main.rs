use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use std::{env as std_env, error::Error, io};

use env::Env;
use games::crossterm::event::{self, Event, KeyCode, KeyEventKind};
use games::crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use games::crossterm::{execute, terminal::Clear, terminal::ClearType};
use games::maze::autopilot::Autopilot;
use games::maze::game::{GameState, HeldKeys};
use games::maze::map::Action;
use games::maze::view::{render_hud, render_maze, INSTRUCTIONS};
use games::ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use games::GameConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// One-shot commands, as opposed to the movement keys that count while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Move(Action),
    ToggleLight,
    Reset,
    ToggleAutopilot,
    Quit,
}

fn keycode_to_command(key: KeyCode) -> Option<Command> {
    use Command::*;
    use KeyCode::*;

    match key {
        Up => Some(Move(Action::Up)),
        Down => Some(Move(Action::Down)),
        Left => Some(Move(Action::Left)),
        Right => Some(Move(Action::Right)),
        Char('l') | Char('L') => Some(ToggleLight),
        Char('r') | Char('R') => Some(Reset),
        Char('p') | Char('P') => Some(ToggleAutopilot),
        Char('q') | Char('Q') | Esc => Some(Quit),
        _ => None,
    }
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    let path = std_env::var("MAZE_LOG").unwrap_or_else(|_| "maze.log".to_string());
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config() -> Result<GameConfig, Box<dyn Error>> {
    let mut config = match std_env::args().nth(1) {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Ok(seed) = std_env::var("MAZE_SEED") {
        config = config.with_seed(seed.parse()?);
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;
    let config = load_config()?;
    let mut game = GameState::new(config)?;
    info!(
        seed = game.seed(),
        config = %game.config().to_json()?,
        "starting playground"
    );

    enable_raw_mode()?;
    with_cleanup(
        || {
            let mut stdout = io::stdout();
            let backend = CrosstermBackend::new(&mut stdout);
            let mut terminal = Terminal::new(backend)?;
            execute!(io::stdout(), Clear(ClearType::All))?;
            run(&mut terminal, &mut game)
        },
        restore_terminal,
    )
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), Clear(ClearType::All))
}

/// Runs `body`, then `cleanup` whether or not `body` failed. An error from
/// `body` wins over one from `cleanup`.
fn with_cleanup<T>(
    body: impl FnOnce() -> Result<T, Box<dyn Error>>,
    cleanup: impl FnOnce() -> io::Result<()>,
) -> Result<T, Box<dyn Error>> {
    let result = body();
    let restored = cleanup();
    let value = result?;
    restored?;
    Ok(value)
}

fn run<B: games::ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    game: &mut GameState,
) -> Result<(), Box<dyn Error>> {
    let tick = Duration::from_secs_f32(game.config().tick_interval());
    let autopilot = Autopilot::new();
    let mut autopiloting = false;
    let mut last_tick = Instant::now();

    loop {
        let view: &GameState = game;
        terminal.draw(|f| {
            let layout = Layout::default()
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(0),
                    Constraint::Length(1),
                ])
                .split(f.area());
            f.render_widget(Paragraph::new(render_hud(view)), layout[0]);
            let title = if autopiloting { "Maze (autopilot)" } else { "Maze" };
            let para = Paragraph::new(render_maze(view))
                .block(Block::default().borders(Borders::ALL).title(title));
            f.render_widget(para, layout[1]);
            f.render_widget(Paragraph::new(Line::from(INSTRUCTIONS)), layout[2]);
        })?;

        // terminals report presses, not held state: a key counts as held for
        // the tick in which it was pressed or auto-repeated
        let mut keys = HeldKeys::NONE;
        let deadline = last_tick + tick;
        while let Some(timeout) = deadline.checked_duration_since(Instant::now()) {
            if !event::poll(timeout)? {
                break;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match keycode_to_command(key.code) {
                Some(Command::Move(action)) => keys.hold(action),
                Some(Command::ToggleLight) if key.kind == KeyEventKind::Press => {
                    game.toggle_light()
                }
                Some(Command::Reset) if key.kind == KeyEventKind::Press => game.reset(),
                Some(Command::ToggleAutopilot) if key.kind == KeyEventKind::Press => {
                    autopiloting = !autopiloting;
                    info!(autopiloting, "autopilot toggled");
                }
                Some(Command::Quit) => return Ok(()),
                _ => {}
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f32();
        last_tick = now;

        if autopiloting {
            keys = autopilot.keys(game);
        }
        game.step(keys, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_move_and_letters_command() {
        assert_eq!(
            keycode_to_command(KeyCode::Up),
            Some(Command::Move(Action::Up))
        );
        assert_eq!(
            keycode_to_command(KeyCode::Char('l')),
            Some(Command::ToggleLight)
        );
        assert_eq!(keycode_to_command(KeyCode::Char('R')), Some(Command::Reset));
        assert_eq!(keycode_to_command(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(keycode_to_command(KeyCode::Char('x')), None);
    }

    #[test]
    fn terminal_is_restored_when_setup_fails() {
        let mut restored = false;
        let result: Result<(), _> = with_cleanup(
            || Err(io::Error::other("no tty").into()),
            || {
                restored = true;
                Ok(())
            },
        );
        assert!(restored);
        assert_eq!(result.unwrap_err().to_string(), "no tty");
    }

    #[test]
    fn body_error_wins_over_cleanup_error() {
        let result: Result<u8, _> = with_cleanup(
            || Err("draw failed".into()),
            || Err(io::Error::other("restore failed")),
        );
        assert_eq!(result.unwrap_err().to_string(), "draw failed");

        let ok = with_cleanup(|| Ok(7), || Ok(()));
        assert_eq!(ok.unwrap(), 7);
    }
}
