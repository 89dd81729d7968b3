mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use display::Viewport;
use side_shooter::error::Result;
use side_shooter::{Command, FrameScheduler, GameConfig, GameState, InputSnapshot, Key, Phase};

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// Remembers when each key was last pressed or repeated.
///
/// Terminals with keyboard enhancement (Ghostty, kitty, etc.) send proper
/// release events, which remove the key at once.  Classic terminals only
/// send repeated presses while a key is down, so a key also expires once no
/// press has arrived within the hold window.  The window is a little longer
/// than the OS key-repeat interval, so a key stays live while it repeats.
struct KeyTracker {
    last_seen: HashMap<KeyCode, f64>,
    hold_ms: f64,
}

impl KeyTracker {
    fn new(hold_ms: u64) -> Self {
        Self {
            last_seen: HashMap::new(),
            hold_ms: hold_ms as f64,
        }
    }

    fn press(&mut self, code: KeyCode, now_ms: f64) {
        self.last_seen.insert(code, now_ms);
    }

    fn release(&mut self, code: &KeyCode) {
        self.last_seen.remove(code);
    }

    fn is_held(&self, code: &KeyCode, now_ms: f64) -> bool {
        self.last_seen
            .get(code)
            .is_some_and(|&last| now_ms - last <= self.hold_ms)
    }

    fn any_held(&self, codes: &[KeyCode], now_ms: f64) -> bool {
        codes.iter().any(|c| self.is_held(c, now_ms))
    }

    /// Copy the live key state into the simulation's input snapshot.
    fn write_snapshot(&self, input: &mut InputSnapshot, now_ms: f64) {
        let bindings: [(Key, &[KeyCode]); 5] = [
            (Key::Left, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
            (Key::Right, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
            (Key::Up, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]),
            (Key::Down, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]),
            (Key::Shoot, &[KeyCode::Char(' ')]),
        ];
        for (key, codes) in bindings {
            input.set_key(key, self.any_held(codes, now_ms));
        }
    }
}

// ── UI commands ───────────────────────────────────────────────────────────────

/// The "confirm" action (Enter, or a click on a menu screen) for each phase.
fn confirm_command(phase: Phase) -> Option<Command> {
    match phase {
        Phase::Title => Some(Command::Start),
        Phase::Instructions => Some(Command::Begin),
        Phase::StageClear => Some(Command::Advance),
        Phase::GameClear | Phase::GameOver => Some(Command::Restart),
        Phase::Playing | Phase::Boss => None,
    }
}

/// A left click confirms on menu screens and fires in play.  Clicks on the
/// paused playfield do nothing.
fn click_command(phase: Phase, paused: bool) -> Option<Command> {
    match confirm_command(phase) {
        Some(cmd) => Some(cmd),
        None if paused => None,
        None => Some(Command::Fire),
    }
}

enum Action {
    Quit,
    TogglePause,
    Command(Command),
    None,
}

fn key_action(code: &KeyCode, modifiers: KeyModifiers, phase: Phase) -> Action {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('p') | KeyCode::Char('P') if phase.is_active_play() => Action::TogglePause,
        KeyCode::Enter => confirm_command(phase).map_or(Action::None, Action::Command),
        // Space doubles as confirm on menu screens; in play it is the fire key.
        KeyCode::Char(' ') if !phase.is_active_play() => {
            confirm_command(phase).map_or(Action::None, Action::Command)
        }
        KeyCode::Char('t') | KeyCode::Char('T') => Action::Command(Command::ReturnToTitle),
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Command(Command::Restart),
        _ => Action::None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Every iteration is one frame: drain input into the snapshot, apply UI
/// commands, let the scheduler run the simulation, then draw.
fn game_loop<W: Write>(
    out: &mut W,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut rng = thread_rng();
    let mut state = GameState::new(config);
    let mut scheduler = FrameScheduler::new();
    let mut input = InputSnapshot::new();
    let mut keys = KeyTracker::new(config.frontend.key_hold_ms);

    let (width, height) = terminal::size()?;
    let mut view = Viewport::new(&state, width, height);

    let frame = Duration::from_millis(config.frontend.frame_ms);
    let clock = Instant::now();

    loop {
        let frame_start = Instant::now();
        let now_ms = clock.elapsed().as_secs_f64() * 1000.0;

        // Input first, so this frame's step sees it.
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        keys.press(code, now_ms);
                        match key_action(&code, modifiers, state.phase) {
                            Action::Quit => return Ok(()),
                            Action::TogglePause => scheduler.toggle_pause(),
                            Action::Command(cmd) => {
                                state.apply_command(cmd, now_ms);
                            }
                            Action::None => {}
                        }
                    }
                    KeyEventKind::Repeat => keys.press(code, now_ms),
                    KeyEventKind::Release => keys.release(&code),
                },
                Event::Mouse(MouseEvent {
                    kind, column, row, ..
                }) => {
                    let pos = view.to_canvas(column, row);
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            if let Some(cmd) = click_command(state.phase, scheduler.is_paused()) {
                                if cmd == Command::Fire {
                                    input.pointer_down(pos, now_ms);
                                }
                                state.apply_command(cmd, now_ms);
                            }
                        }
                        MouseEventKind::Drag(MouseButton::Left) => input.pointer_moved(pos),
                        MouseEventKind::Up(MouseButton::Left) => input.pointer_up(),
                        _ => {}
                    }
                }
                Event::Resize(w, h) => {
                    log::debug!("terminal resized to {}x{}", w, h);
                    view = Viewport::new(&state, w, h);
                }
                _ => {}
            }
        }

        keys.write_snapshot(&mut input, now_ms);
        scheduler.frame(&mut state, &input, now_ms, &mut rng);

        display::render(out, &state, &view, scheduler.is_paused())?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Logs go to a file: stderr would scribble over the alternate screen.
fn init_logging(config: &GameConfig) -> Result<()> {
    let file = File::create(&config.frontend.log_file)?;
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let config = GameConfig::load_or_default()?;
    init_logging(&config)?;
    log::info!(
        "starting side_shooter, canvas {}x{}",
        config.canvas.width,
        config.canvas.height
    );

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Ask for release events so held movement keys end promptly.  Terminals
    // without the kitty protocol refuse, and KeyTracker's hold window covers them.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread; the frame loop only drains
    // the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped, program exiting
            }
        }
    });

    let result = game_loop(&mut out, &config, &rx);

    // Restore the terminal even when the loop failed.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    match &result {
        Ok(()) => log::info!("exited normally"),
        Err(e) => log::error!("exited with error: {}", e),
    }
    result
}
