pub mod ui;

use std::{
    io::{self, stdin},
    path::PathBuf,
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{bail, Context};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use tracing::info;

use swat::{
    app_dirs::AppDirs,
    audio::{AudioCue, SilentCue, TerminalBell},
    clock::{Clock, MonotonicClock},
    config::{ConfigStore, FileConfigStore, GameConfig, PlayArea},
    feed::{spawn_pose_source, CommandPoseSource, FilePoseSource, PointerPoseSource},
    game::Game,
    logging,
    pose::{FeedStatus, PoseSlot},
    runtime::{
        run_until_stopped, CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner,
        Ticker,
    },
    sprite::TargetSprite,
    surface::{NullSurface, Overlay},
};

use crate::ui::{playfield::cell_to_play, screen::current_screen};

/// reach out and swat the targets popping up around you
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A reaction game: targets pop up around the edges of the play area and you swat them with your hands. Hands come from an external pose estimator, a recorded pose file, or the mouse."
)]
pub struct Cli {
    /// length of a session in seconds
    #[clap(short = 'd', long)]
    duration_secs: Option<f64>,

    /// how long a target stays up before moving, in milliseconds
    #[clap(long)]
    visible_ms: Option<u64>,

    /// how close a hand must get to the target's center, in play-area pixels
    #[clap(long)]
    touch_margin: Option<f64>,

    /// seed for target placement, for repeatable sessions
    #[clap(long)]
    seed: Option<u64>,

    /// pose estimator command printing PoseNet JSON lines on stdout; split on
    /// whitespace with no shell quoting, so wrap paths containing spaces in a script
    #[clap(long, conflicts_with = "pose_file")]
    pose_cmd: Option<String>,

    /// recorded PoseNet JSON lines to replay instead of a live estimator
    #[clap(long)]
    pose_file: Option<PathBuf>,

    /// delay between replayed pose lines, in milliseconds
    #[clap(long, default_value_t = 33)]
    pose_interval_ms: u64,

    /// run without a terminal UI and print the final score
    #[clap(long)]
    headless: bool,

    /// no bell on hits
    #[clap(long)]
    mute: bool,

    /// config file to use instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// save the effective config and exit
    #[clap(long)]
    write_config: bool,
}

impl Cli {
    /// Command-line flags win over the config file
    fn apply(&self, config: &mut GameConfig) {
        if let Some(secs) = self.duration_secs {
            config.session_ms = (secs * 1000.0).round() as u64;
        }
        if let Some(ms) = self.visible_ms {
            config.target.visible_ms = ms;
        }
        if let Some(margin) = self.touch_margin {
            config.target.touch_margin = margin;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

pub struct App {
    pub game: Game<StdRng>,
    pub overlay: Overlay,
    pub sprite: TargetSprite,
    pub play_area: PlayArea,
    /// Set when the mouse drives the hands
    pub pointer: Option<PointerPoseSource>,
    /// Playfield area from the last draw
    pub field: Rect,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: &GameConfig,
        slot: PoseSlot,
        pointer: Option<PointerPoseSource>,
        sprite: TargetSprite,
        start_ms: u64,
    ) -> Self {
        let mut game = Game::new(config, slot, rng_for(config), start_ms);
        game.mark_sprite_ready();
        Self {
            game,
            overlay: Overlay::default(),
            sprite,
            play_area: config.play_area,
            pointer,
            field: Rect::default(),
            should_quit: false,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        let ctrl_c =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        if key.code == KeyCode::Esc || ctrl_c {
            self.should_quit = true;
            return;
        }
        let mut screen = current_screen(self.game.state());
        screen.on_key(key, self);
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        let Some(pointer) = &self.pointer else {
            return;
        };
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                match cell_to_play(mouse.column, mouse.row, self.field, self.play_area) {
                    Some(at) => pointer.move_to(at),
                    None => pointer.lift(),
                }
            }
            _ => {}
        }
    }
}

fn rng_for(config: &GameConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn start_feed(cli: &Cli, config: &GameConfig, slot: &PoseSlot) -> Option<JoinHandle<()>> {
    if let Some(cmd) = &cli.pose_cmd {
        info!(command = %cmd, "using pose estimator command");
        let source = CommandPoseSource::new(cmd.clone(), config.pose_model);
        Some(spawn_pose_source(source, slot))
    } else if let Some(path) = &cli.pose_file {
        info!(path = %path.display(), "replaying pose file");
        let source = FilePoseSource::new(path, Duration::from_millis(cli.pose_interval_ms));
        Some(spawn_pose_source(source, slot))
    } else {
        None
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.headless || cli.write_config {
        logging::init_stderr();
    } else if let Some(path) = AppDirs::log_path() {
        logging::init_file(&path)?;
    }

    let store = cli.config_store();
    let mut config = store.load();
    cli.apply(&mut config);
    config
        .validate()
        .with_context(|| format!("invalid config ({})", store.path().display()))?;

    if cli.write_config {
        store.save(&config)?;
        println!("wrote {}", store.path().display());
        return Ok(());
    }

    let sprite = TargetSprite::load(config.target.sprite_path.as_deref())?;

    if cli.headless {
        return run_headless(&cli, &config);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let slot = PoseSlot::new();
    let pointer = if start_feed(&cli, &config, &slot).is_some() {
        None
    } else {
        info!("no pose feed given, the mouse drives the hands");
        Some(PointerPoseSource::new(&slot, config.play_area.width))
    };

    let clock = MonotonicClock::new();
    let mut app = App::new(&config, slot, pointer, sprite, clock.now_ms());
    let mut cue: Box<dyn AudioCue> = if cli.mute {
        Box::new(SilentCue)
    } else {
        Box::new(TerminalBell)
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(config.tick_ms)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner, &clock, cue.as_mut());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result?;
    info!(
        score = app.game.score(),
        hits = app.game.hits(),
        "quit"
    );
    Ok(())
}

fn start_tui<B, E, T>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    clock: &impl Clock,
    cue: &mut dyn AudioCue,
) -> anyhow::Result<()>
where
    B: Backend,
    E: GameEventSource,
    T: Ticker,
{
    let tick_ms = runner.interval().as_millis() as u64;
    let mut last_step: Option<u64> = None;

    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            GameEvent::Key(key) => app.on_key(key),
            GameEvent::Mouse(mouse) => app.on_mouse(mouse),
            GameEvent::Resize | GameEvent::Tick => {}
        }
        if app.should_quit {
            break;
        }

        // a steady stream of mouse events would otherwise starve the ticks
        let now = clock.now_ms();
        if last_step.map_or(true, |t| now.saturating_sub(t) >= tick_ms) {
            last_step = Some(now);
            app.game.step(now, &mut app.overlay, &mut *cue);
        }

        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn run_headless(cli: &Cli, config: &GameConfig) -> anyhow::Result<()> {
    let slot = PoseSlot::new();
    if start_feed(cli, config, &slot).is_none() {
        bail!("--headless needs a pose feed: pass --pose-cmd or --pose-file");
    }

    let ticker = FixedTicker::new(Duration::from_millis(config.tick_ms));
    // the session clock starts only once the estimator has produced a pose
    while !slot.is_ready() {
        match slot.status() {
            FeedStatus::Unavailable(reason) => bail!("pose feed unavailable: {reason}"),
            FeedStatus::Ended => bail!("pose feed ended before producing a pose"),
            FeedStatus::Connecting | FeedStatus::Live => {}
        }
        thread::sleep(ticker.interval());
    }

    let clock = MonotonicClock::new();
    let mut game = Game::new(config, slot, rng_for(config), clock.now_ms());
    game.mark_sprite_ready();

    // stdout carries the report, so no bell here
    let steps = run_until_stopped(&mut game, &clock, &ticker, &mut NullSurface, &mut SilentCue);
    info!(steps, "headless session finished");

    println!("score: {}", game.score());
    println!("hits: {}", game.hits());
    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    let screen = current_screen(app.game.state());
    screen.render(app, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crossterm::event::MouseButton;
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;
    use swat::clock::ManualClock;
    use swat::game::LoopState;
    use swat::runtime::TestEventSource;

    pub fn test_app(session_ms: u64) -> (App, PoseSlot) {
        let config = GameConfig {
            session_ms,
            seed: Some(5),
            ..GameConfig::default()
        };
        let slot = PoseSlot::new();
        let app = App::new(&config, slot.clone(), None, TargetSprite::default(), 0);
        (app, slot)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn mouse_at(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["swat"]);

        assert_eq!(cli.duration_secs, None);
        assert_eq!(cli.visible_ms, None);
        assert_eq!(cli.touch_margin, None);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.pose_cmd, None);
        assert_eq!(cli.pose_file, None);
        assert_eq!(cli.pose_interval_ms, 33);
        assert!(!cli.headless);
        assert!(!cli.mute);
        assert!(!cli.write_config);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "swat",
            "-d",
            "1.5",
            "--visible-ms",
            "800",
            "--touch-margin",
            "40",
            "--seed",
            "9",
        ]);
        let mut config = GameConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.session_ms, 1_500);
        assert_eq!(config.target.visible_ms, 800);
        assert_eq!(config.target.touch_margin, 40.0);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_cli_keeps_file_values_without_flags() {
        let cli = Cli::parse_from(["swat"]);
        let mut config = GameConfig {
            session_ms: 5_000,
            seed: Some(3),
            ..GameConfig::default()
        };
        cli.apply(&mut config);
        assert_eq!(config.session_ms, 5_000);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_cli_negative_duration_fails_validation() {
        let cli = Cli::parse_from(["swat", "--duration-secs=-2"]);
        let mut config = GameConfig::default();
        cli.apply(&mut config);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_pose_sources_conflict() {
        let res = Cli::try_parse_from(["swat", "--pose-cmd", "est", "--pose-file", "p.jsonl"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_cli_pose_cmd_help_mentions_whitespace_split() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("whitespace"), "{help}");
        assert!(help.contains("quoting"), "{help}");
    }

    #[test]
    fn test_cli_config_store_override() {
        let cli = Cli::parse_from(["swat", "--config", "/tmp/swat-test.json"]);
        assert_eq!(
            cli.config_store().path(),
            std::path::Path::new("/tmp/swat-test.json")
        );
    }

    #[test]
    fn test_app_escape_and_ctrl_c_quit() {
        let (mut app, _slot) = test_app(1_000);
        app.on_key(key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(!app.should_quit, "q only quits from the results screen");

        app.on_key(key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.should_quit);

        let (mut app, _slot) = test_app(1_000);
        app.on_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_app_mouse_drives_pointer_hand() {
        let (mut app, slot) = test_app(10_000);
        app.pointer = Some(PointerPoseSource::new(&slot, app.play_area.width));
        app.field = Rect::new(0, 0, 102, 77);

        app.on_mouse(mouse_at(50, 40));
        let snap = slot.latest().unwrap();
        assert!(!snap.is_empty());

        app.game.step(10, &mut app.overlay, &mut SilentCue);
        let right = app.game.last_hands().right.unwrap();
        let expected = cell_to_play(50, 40, app.field, app.play_area).unwrap();
        assert!((right.x - expected.x).abs() < 1e-6);
        assert!((right.y - expected.y).abs() < 1e-6);

        // leaving the playfield lifts the hand
        app.on_mouse(mouse_at(0, 0));
        assert!(slot.latest().unwrap().is_empty());
    }

    #[test]
    fn test_app_mouse_ignored_without_pointer() {
        let (mut app, slot) = test_app(10_000);
        app.field = Rect::new(0, 0, 102, 77);
        app.on_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            ..mouse_at(50, 40)
        });
        assert!(slot.latest().is_none());
    }

    #[test]
    fn test_start_tui_runs_until_escape() {
        let (mut app, slot) = test_app(60_000);
        slot.mark_ready();
        let clock = ManualClock::new(0);

        let (tx, rx) = mpsc::channel();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );
        tx.send(GameEvent::Resize).unwrap();
        tx.send(GameEvent::Key(key(KeyCode::Esc, KeyModifiers::NONE)))
            .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        start_tui(&mut terminal, &mut app, &runner, &clock, &mut SilentCue).unwrap();

        assert!(app.should_quit);
        assert_eq!(app.game.state(), LoopState::Running);
        assert!(app.field.width > 0, "playfield laid out on draw");
    }

    #[test]
    fn test_start_tui_shows_results_when_time_runs_out() {
        let (mut app, slot) = test_app(1_000);
        slot.mark_ready();
        let clock = ManualClock::new(2_000);

        let (tx, rx) = mpsc::channel();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );
        tx.send(GameEvent::Tick).unwrap();
        tx.send(GameEvent::Key(key(KeyCode::Char('q'), KeyModifiers::NONE)))
            .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        start_tui(&mut terminal, &mut app, &runner, &clock, &mut SilentCue).unwrap();

        assert_eq!(app.game.state(), LoopState::Stopped);
        assert!(app.should_quit);
        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("time's up"));
    }
}
