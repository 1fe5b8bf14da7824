use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;

use swat::game::LoopState;

use crate::{ui::split, App};

/// A UI Screen boundary: responsible for rendering and optional key handling
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
    /// Optional per-screen key handling. Returns true if the key was handled.
    fn on_key(&mut self, _key: KeyEvent, _app: &mut App) -> bool {
        false
    }
}

/// Live playfield; remembers where it was laid out so mouse cells can be mapped
pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        let area = f.area();
        let (_, field, _) = split(area);
        app.field = field;
        f.render_widget(&*app, area);
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }

    fn on_key(&mut self, key: KeyEvent, app: &mut App) -> bool {
        // q only quits from here; mid-game it may be a stray key
        if key.code == KeyCode::Char('q') {
            app.should_quit = true;
            return true;
        }
        false
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: LoopState) -> Box<dyn Screen> {
    match state {
        LoopState::AwaitingResources | LoopState::Running => Box::new(PlayingScreen),
        LoopState::Stopped => Box::new(ResultsScreen),
    }
}
