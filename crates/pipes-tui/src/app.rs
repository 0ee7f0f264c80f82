use crate::actuator::{Actuator, Cue};
use crate::celebration::Celebration;
use crate::settings::{
    GenerationTuning, Settings, MAX_HEIGHT, MAX_LOCKS, MAX_SOURCES, MAX_TUNNELS, MAX_WIDTH,
    MIN_SIDE,
};
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use pipes_core::{Position, Puzzle, PuzzleResult, RotateResult};
use std::time::{Duration, Instant};

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Normal gameplay
    Playing,
    /// Puzzle solved, celebration running
    Won,
    /// Settings menu over the board
    Menu,
}

/// Rows of the settings menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Width,
    Height,
    Sources,
    Locks,
    Tunnels,
    SourceColors,
    Seed,
    Start,
    Retry,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 10] = [
        MenuItem::Width,
        MenuItem::Height,
        MenuItem::Sources,
        MenuItem::Locks,
        MenuItem::Tunnels,
        MenuItem::SourceColors,
        MenuItem::Seed,
        MenuItem::Start,
        MenuItem::Retry,
        MenuItem::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Width => "Width",
            MenuItem::Height => "Height",
            MenuItem::Sources => "Sources",
            MenuItem::Locks => "Locks",
            MenuItem::Tunnels => "Tunnels",
            MenuItem::SourceColors => "Source colors",
            MenuItem::Seed => "Seed",
            MenuItem::Start => "New puzzle",
            MenuItem::Retry => "Retry puzzle",
            MenuItem::Quit => "Quit",
        }
    }
}

/// The main application state
pub struct App {
    /// Current puzzle
    pub puzzle: Puzzle,
    /// Selected tile
    pub cursor: Position,
    /// Persisted settings store
    pub settings: Settings,
    /// Command line generation knobs
    pub tuning: GenerationTuning,
    /// Color theme
    pub theme: Theme,
    /// Rotation transitions in flight
    pub actuator: Actuator,
    /// Current screen state
    pub screen_state: ScreenState,
    /// Selected menu row
    pub menu_selection: usize,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Win particles
    pub celebration: Celebration,
    /// Render should start the celebration on the next frame
    pub celebrate: bool,
    start_time: Instant,
    /// Frozen play time once solved
    finished: Option<Duration>,
    /// Hints used on this puzzle
    pub hints_used: usize,
    /// Accepted rotations on this puzzle
    pub moves: usize,
}

impl App {
    /// Start the first puzzle from the stored settings
    pub fn new(settings: Settings, tuning: GenerationTuning, theme: Theme) -> PuzzleResult<Self> {
        let mut settings = settings;
        let puzzle = Puzzle::generate(&settings.to_config(&tuning))?;
        persist(&settings);

        let mut app = Self {
            cursor: center(&puzzle),
            puzzle,
            settings,
            tuning,
            theme,
            actuator: Actuator::new(),
            screen_state: ScreenState::Playing,
            menu_selection: 0,
            message: None,
            message_timer: 0,
            celebration: Celebration::new(),
            celebrate: false,
            start_time: Instant::now(),
            finished: None,
            hints_used: 0,
            moves: 0,
        };
        app.apply_cues();
        Ok(app)
    }

    /// Generate a fresh puzzle from the current settings.
    /// A stored one-shot seed is used and cleared.
    pub fn new_puzzle(&mut self) {
        let config = self.settings.to_config(&self.tuning);
        match Puzzle::generate(&config) {
            Ok(puzzle) => {
                persist(&self.settings);
                self.cursor = center(&puzzle);
                self.puzzle = puzzle;
                self.screen_state = ScreenState::Playing;
                self.start_time = Instant::now();
                self.finished = None;
                self.hints_used = 0;
                self.moves = 0;
                self.celebration.stop();
                self.celebrate = false;
                self.apply_cues();
                let seed = self.puzzle.seed();
                self.show_message(&format!("Puzzle #{}", seed));
            }
            Err(e) => {
                log::error!("could not start puzzle: {}", e);
                self.show_message(&e.to_string());
            }
        }
    }

    /// Replay the current puzzle from its seed
    pub fn retry(&mut self) {
        self.settings.seed = Some(self.puzzle.seed());
        self.new_puzzle();
    }

    /// Tick rate based on screen state
    pub fn get_tick_rate(&self) -> Duration {
        if self.celebration.is_active() {
            Duration::from_millis(33)
        } else {
            Duration::from_millis(100)
        }
    }

    /// Update transitions, timers and animations (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        let cues = self.actuator.tick(&mut self.puzzle);
        self.handle_cues(cues);

        if self.celebration.is_active() {
            self.celebration.update();
        }
    }

    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Play time, frozen once the puzzle is solved
    pub fn elapsed(&self) -> Duration {
        self.finished.unwrap_or_else(|| self.start_time.elapsed())
    }

    /// Format the elapsed time as M:SS
    pub fn elapsed_string(&self) -> String {
        let secs = self.elapsed().as_secs();
        format!("{}:{:02}", secs / 60, secs % 60)
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Menu => self.handle_menu_key(key),
            ScreenState::Won => self.handle_won_key(key),
            ScreenState::Playing => self.handle_game_key(key),
        }
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => self.move_cursor(0, 1),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => self.move_cursor(0, -1),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => self.move_cursor(-1, 0),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => self.move_cursor(1, 0),
            KeyCode::Char('z') | KeyCode::Char(',') | KeyCode::Char('[') => {
                self.rotate_left();
            }
            KeyCode::Char('x')
            | KeyCode::Char('.')
            | KeyCode::Char(']')
            | KeyCode::Char(' ')
            | KeyCode::Enter => {
                self.rotate_right();
            }
            KeyCode::Char('?') => self.hint(),
            KeyCode::Char('r') => self.retry(),
            KeyCode::Char('n') => self.new_puzzle(),
            KeyCode::Esc | KeyCode::Char('m') => self.open_menu(),
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_won_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('n') | KeyCode::Enter => self.new_puzzle(),
            KeyCode::Char('r') => self.retry(),
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Esc | KeyCode::Char('m') => self.open_menu(),
            // Keep playing with the solved board
            _ => {
                self.screen_state = ScreenState::Playing;
                return self.handle_game_key(key);
            }
        }
        AppAction::Continue
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> AppAction {
        let item = MenuItem::ALL[self.menu_selection];
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_selection =
                    (self.menu_selection + MenuItem::ALL.len() - 1) % MenuItem::ALL.len();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_selection = (self.menu_selection + 1) % MenuItem::ALL.len();
            }
            KeyCode::Left | KeyCode::Char('h') => self.adjust(item, -1),
            KeyCode::Right | KeyCode::Char('l') => self.adjust(item, 1),
            KeyCode::Enter | KeyCode::Char(' ') => match item {
                MenuItem::Start => self.new_puzzle(),
                MenuItem::Retry => self.retry(),
                MenuItem::Quit => return AppAction::Quit,
                MenuItem::SourceColors => self.adjust(item, 1),
                _ => {}
            },
            KeyCode::Char(c) if item == MenuItem::Seed && c.is_ascii_digit() => {
                self.type_seed_digit(c)
            }
            KeyCode::Backspace if item == MenuItem::Seed => self.erase_seed_digit(),
            KeyCode::Delete if item == MenuItem::Seed => self.set_seed(None),
            KeyCode::Esc | KeyCode::Char('m') => self.close_menu(),
            KeyCode::Char('q') => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    /// Append a digit to the stored seed, ignoring digits that would overflow
    fn type_seed_digit(&mut self, c: char) {
        let Some(digit) = c.to_digit(10) else {
            return;
        };
        let seed = match self.settings.seed {
            Some(seed) => seed.checked_mul(10).and_then(|s| s.checked_add(digit as u64)),
            None => Some(digit as u64),
        };
        if seed.is_some() {
            self.set_seed(seed);
        }
    }

    /// Drop the last digit; erasing the only digit removes the seed
    fn erase_seed_digit(&mut self) {
        let seed = self.settings.seed.filter(|&s| s >= 10).map(|s| s / 10);
        self.set_seed(seed);
    }

    fn set_seed(&mut self, seed: Option<u64>) {
        self.settings.seed = seed;
        persist(&self.settings);
    }

    fn open_menu(&mut self) {
        self.menu_selection = 0;
        self.screen_state = ScreenState::Menu;
    }

    fn close_menu(&mut self) {
        self.screen_state = if self.puzzle.is_won() {
            ScreenState::Won
        } else {
            ScreenState::Playing
        };
    }

    /// Change a setting by one step, like dragging a slider; persisted at once
    fn adjust(&mut self, item: MenuItem, delta: i32) {
        fn step(value: usize, delta: i32, min: usize, max: usize) -> usize {
            (value as i64 + delta as i64).clamp(min as i64, max as i64) as usize
        }
        let s = &mut self.settings;
        match item {
            MenuItem::Width => s.width = step(s.width, delta, MIN_SIDE, MAX_WIDTH),
            MenuItem::Height => s.height = step(s.height, delta, MIN_SIDE, MAX_HEIGHT),
            MenuItem::Sources => s.sources = step(s.sources, delta, 1, MAX_SOURCES),
            MenuItem::Locks => s.locks = step(s.locks, delta, 0, MAX_LOCKS),
            MenuItem::Tunnels => s.tunnels = step(s.tunnels, delta, 0, MAX_TUNNELS),
            MenuItem::SourceColors => s.source_colors = !s.source_colors,
            MenuItem::Seed | MenuItem::Start | MenuItem::Retry | MenuItem::Quit => return,
        }
        persist(&self.settings);
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let width = self.puzzle.width() as i32;
        let height = self.puzzle.height() as i32;
        let x = (self.cursor.x as i32 + dx).rem_euclid(width);
        let y = (self.cursor.y as i32 + dy).rem_euclid(height);
        self.cursor = Position::new(x as usize, y as usize);
    }

    pub fn rotate_left(&mut self) -> RotateResult {
        let result = self.puzzle.rotate_left(self.cursor);
        self.after_rotation(result);
        result
    }

    pub fn rotate_right(&mut self) -> RotateResult {
        let result = self.puzzle.rotate_right(self.cursor);
        self.after_rotation(result);
        result
    }

    fn after_rotation(&mut self, result: RotateResult) {
        if result == RotateResult::Accepted {
            self.moves += 1;
        }
        self.apply_cues();
    }

    pub fn hint(&mut self) {
        match self.puzzle.hint() {
            Some(pos) => {
                self.hints_used += 1;
                self.cursor = pos;
                self.show_message("Hint: tile fixed and locked");
            }
            None => self.show_message("No hint available"),
        }
        self.apply_cues();
    }

    fn apply_cues(&mut self) {
        let cues = self.actuator.consume(&mut self.puzzle);
        self.handle_cues(cues);
    }

    fn handle_cues(&mut self, cues: Vec<Cue>) {
        for cue in cues {
            match cue {
                Cue::Won => {
                    self.finished = Some(self.start_time.elapsed());
                    if self.screen_state == ScreenState::Playing {
                        self.screen_state = ScreenState::Won;
                    }
                    self.celebrate = true;
                    log::info!(
                        "solved puzzle {} in {} with {} moves",
                        self.puzzle.seed(),
                        self.elapsed_string(),
                        self.moves
                    );
                }
                Cue::Rejected(_) => self.show_message("That tile is locked"),
                Cue::Generated => {}
            }
        }
        // A rotation after the win un-solves the board and restarts the clock
        if self.finished.is_some() && !self.puzzle.is_won() {
            if let Some(frozen) = self.finished.take() {
                self.start_time = Instant::now().checked_sub(frozen).unwrap_or_else(Instant::now);
            }
            if self.screen_state == ScreenState::Won {
                self.screen_state = ScreenState::Playing;
            }
        }
    }
}

fn center(puzzle: &Puzzle) -> Position {
    Position::new(puzzle.width() / 2, puzzle.height() / 2)
}

fn persist(settings: &Settings) {
    if let Err(e) = settings.save() {
        log::warn!("{}", e);
    }
}
