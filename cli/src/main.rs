mod store;

use std::{
    fmt, fs,
    io::{stdout, Stdout},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::MoveTo,
    event::{read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::{Color, Print, Stylize},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    Command,
};
use env_logger::Env;
use log::info;
use twenty48_engine::{Config, Direction, GameState, Grid, Session, SessionView};

use store::FileSink;

/// Play the sliding-tile merge puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with engine settings; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Side length of the grid
    #[arg(long)]
    size: Option<usize>,

    /// Tile value that wins the game
    #[arg(long)]
    win_tile: Option<u32>,

    /// Maximum number of moves that can be undone
    #[arg(long)]
    undo_limit: Option<usize>,

    /// Seed for tile spawning, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// File holding the best score
    #[arg(long, value_name = "FILE", default_value = ".twenty48-best")]
    best_file: PathBuf,
}

impl Args {
    fn engine_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
            }
            None => Config::default(),
        };
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(win_tile) = self.win_tile {
            config.win_tile = win_tile;
        }
        if self.undo_limit.is_some() {
            config.history_limit = self.undo_limit;
        }
        config.validate()?;
        Ok(config)
    }
}

enum Action {
    Move(Direction),
    Undo,
    NewGame,
    KeepPlaying,
    Quit,
}

impl From<Direction> for Action {
    fn from(d: Direction) -> Self {
        Action::Move(d)
    }
}

fn action_for(k: KeyEvent) -> Option<Action> {
    let action = match (k.code, k.modifiers) {
        (KeyCode::Char('z'), m) if m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Action::Undo
        }
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Left | KeyCode::Char('a'), KeyModifiers::NONE) => Direction::Left.into(),
        (KeyCode::Right | KeyCode::Char('d'), KeyModifiers::NONE) => Direction::Right.into(),
        (KeyCode::Up | KeyCode::Char('w'), KeyModifiers::NONE) => Direction::Up.into(),
        (KeyCode::Down | KeyCode::Char('s'), KeyModifiers::NONE) => Direction::Down.into(),
        (KeyCode::Char('u'), KeyModifiers::NONE) => Action::Undo,
        (KeyCode::Char('n'), KeyModifiers::NONE) => Action::NewGame,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::KeepPlaying,
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        _ => return None,
    };
    Some(action)
}

struct GridCommand<'a>(&'a Grid);

impl<'a> Command for GridCommand<'a> {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        for row in self.0.rows() {
            print_row(f, row)?;
            write!(f, "|\r\n")?;
        }
        Ok(())
    }
}

fn styled(v: u32) -> impl fmt::Display {
    format!("{: ^6}", v).with(match v {
        2 => Color::White,
        4 => Color::Rgb {
            r: 255,
            g: 215,
            b: 0,
        }, // orange
        8 => Color::DarkYellow,
        16 => Color::Magenta,
        32 => Color::Green,
        64 => Color::Blue,
        128..=1024 => Color::Cyan,
        _ => Color::Red,
    })
}

fn print_row(f: &mut impl fmt::Write, row: &[u32]) -> fmt::Result {
    for tile in row.iter() {
        match tile {
            0 => write!(f, "|{: ^6}", " ")?,
            v => write!(f, "|{}", styled(*v))?,
        }
    }
    Ok(())
}

fn status(view: &SessionView, win_tile: u32) -> String {
    let message = match view.state {
        GameState::Playing => "arrows/wasd move, u undo, n new game, q quit",
        GameState::Won => "You win! k keeps playing, n starts over",
        GameState::GameOver => "Game over! u undoes, n starts over",
    };
    format!(
        "score {}  best {}  tile {}/{}  undo {}\r\n{}\r\n",
        view.score,
        view.best_score,
        view.grid.max_tile(),
        win_tile,
        view.history_len,
        message
    )
}

fn draw(out: &mut Stdout, view: &SessionView, win_tile: u32) -> Result<()> {
    execute!(
        out,
        Clear(ClearType::All),
        MoveTo(0, 0),
        GridCommand(&view.grid),
        Print("\r\n"),
        Print(status(view, win_tile)),
    )?;
    Ok(())
}

fn play(game: &mut Session) -> Result<()> {
    let mut out = stdout();
    let win_tile = game.config().win_tile;
    let mut view = game.view();

    'gameloop: loop {
        draw(&mut out, &view, win_tile)?;

        let action = match read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press => match action_for(k) {
                Some(a) => a,
                None => continue 'gameloop,
            },
            _ => continue 'gameloop,
        };

        match action {
            Action::Move(dir) => {
                if game.make_move(dir).moved {
                    view = game.view();
                }
            }
            Action::Undo => view = game.undo(),
            Action::NewGame => view = game.new_game(),
            Action::KeepPlaying => {
                if game.continue_game().is_ok() {
                    view = game.view();
                }
            }
            Action::Quit => break 'gameloop,
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = args.engine_config()?;
    let game = match args.seed {
        Some(seed) => Session::with_seed(config, seed)?,
        None => Session::from_entropy(config)?,
    };
    let mut game = game.with_sink(FileSink::new(args.best_file.clone()));
    info!("best score so far {}", game.best_score());

    enable_raw_mode()?;
    let res = play(&mut game);
    disable_raw_mode()?;
    res?;

    println!("final score {}, best {}", game.score(), game.best_score());
    Ok(())
}
