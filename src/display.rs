//! Rendering layer: all terminal output lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into terminal commands, scaling canvas units to terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;
use side_shooter::collision;
use side_shooter::entities::{Entity, EntityKind};
use side_shooter::phase::FINAL_STAGE;
use side_shooter::spawner::BOSS_ARRIVAL_MS;
use side_shooter::{GameState, Phase};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_STAR: Color = Color::DarkGrey;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_TIMER: Color = Color::Cyan;
const C_BOSS_BAR: Color = Color::Magenta;
const C_PLAYER: Color = Color::White;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_EXPLOSION: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

const STAR_COUNT: u32 = 40;

/// Per-stage look for enemies and the boss.
fn stage_style(stage: u32) -> (&'static str, char, Color) {
    match stage {
        1 => ("<o=", '▓', Color::Green),
        2 => ("<@=", '▒', Color::Yellow),
        _ => ("<#=", '█', Color::Red),
    }
}

// ── Canvas ↔ terminal mapping ─────────────────────────────────────────────────

/// Maps canvas units onto the play area inside the border
/// (columns 1..width-1, rows 2..height-2).
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    canvas: Vec2,
}

impl Viewport {
    pub fn new(state: &GameState, width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            canvas: Vec2::new(state.canvas.width, state.canvas.height),
        }
    }

    fn play_cols(&self) -> f32 {
        self.width.saturating_sub(2).max(1) as f32
    }

    fn play_rows(&self) -> f32 {
        self.height.saturating_sub(4).max(1) as f32
    }

    /// Cell for a canvas point, or `None` if it falls outside the play area.
    fn to_cell(&self, p: Vec2) -> Option<(u16, u16)> {
        let col = (p.x / self.canvas.x * self.play_cols()).floor();
        let row = (p.y / self.canvas.y * self.play_rows()).floor();
        if col < 0.0 || row < 0.0 || col >= self.play_cols() || row >= self.play_rows() {
            return None;
        }
        Some((col as u16 + 1, row as u16 + 2))
    }

    /// Canvas point at the centre of a terminal cell (for mouse input).
    pub fn to_canvas(&self, col: u16, row: u16) -> Vec2 {
        let cx = (col.saturating_sub(1) as f32 + 0.5) / self.play_cols();
        let cy = (row.saturating_sub(2) as f32 + 0.5) / self.play_rows();
        Vec2::new(
            (cx * self.canvas.x).clamp(0.0, self.canvas.x),
            (cy * self.canvas.y).clamp(0.0, self.canvas.y),
        )
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
    paused: bool,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match state.phase {
        Phase::Title => draw_title(out, view)?,
        Phase::Instructions => draw_instructions(out, view)?,
        Phase::Playing | Phase::Boss => draw_playfield(out, state, view)?,
        Phase::StageClear => {
            draw_playfield(out, state, view)?;
            let title = format!("STAGE {} CLEAR", state.stage);
            let score = format!("Score: {}", state.score);
            draw_panel(
                out,
                view,
                &[(title.as_str(), Color::Green), (score.as_str(), Color::Yellow)],
                stage_clear_hint(state.stage),
            )?;
        }
        Phase::GameClear => {
            let score = format!("Final Score: {}", state.score);
            draw_panel(
                out,
                view,
                &[
                    ("CONGRATULATIONS!", Color::Yellow),
                    ("All stages cleared", Color::Green),
                    (score.as_str(), Color::Yellow),
                ],
                "R - Back to Title   Q - Quit",
            )?;
        }
        Phase::GameOver => {
            draw_playfield(out, state, view)?;
            let score = format!("Final Score: {}", state.score);
            draw_panel(
                out,
                view,
                &[("GAME  OVER", Color::Red), (score.as_str(), Color::Yellow)],
                "R - Back to Title   Q - Quit",
            )?;
        }
    }

    if paused {
        draw_panel(out, view, &[("PAUSED", Color::White)], "P - Resume")?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Menus ─────────────────────────────────────────────────────────────────────

fn draw_title<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    draw_panel(
        out,
        view,
        &[
            ("★  SIDE  SHOOTER  ★", Color::Cyan),
            ("", Color::White),
            ("Three stages. Three bosses.", Color::White),
        ],
        "ENTER - Start   Q - Quit",
    )
}

fn draw_instructions<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    draw_panel(
        out,
        view,
        &[
            ("HOW TO PLAY", Color::Cyan),
            ("", Color::White),
            ("Arrows / WASD : Move", Color::White),
            ("Space         : Shoot", Color::White),
            ("Mouse drag    : Move toward pointer", Color::White),
            ("Click         : Shoot (hold to auto-fire)", Color::White),
            ("P             : Pause", Color::White),
            ("", Color::White),
            ("Survive 30 seconds, then defeat the boss.", Color::Yellow),
        ],
        "ENTER - Begin",
    )
}

/// After the last stage, Advance leads to the ending instead of a new stage.
fn stage_clear_hint(stage: u32) -> &'static str {
    if stage >= FINAL_STAGE {
        "ENTER - Finish   T - Title"
    } else {
        "ENTER - Next Stage   T - Title"
    }
}

/// Centred box of text lines with a hint line underneath.
fn draw_panel<W: Write>(
    out: &mut W,
    view: &Viewport,
    lines: &[(&str, Color)],
    hint: &str,
) -> std::io::Result<()> {
    let cx = view.width / 2;
    let total_rows = lines.len() as u16 + 2;
    let start_row = (view.height / 2).saturating_sub(total_rows / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let hint_row = start_row + lines.len() as u16 + 1;
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, hint_row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Playfield ─────────────────────────────────────────────────────────────────

fn draw_playfield<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    draw_border(out, view)?;
    draw_stars(out, state, view)?;
    for entity in state.world.active().filter(|e| e.visible) {
        draw_entity(out, entity, state.stage, view)?;
    }
    draw_hud(out, state, view)?;
    draw_controls_hint(out, view)?;
    Ok(())
}

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 - top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 - bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

/// Scrolling background: fixed pseudo-random stars shifted by the scroll offset.
fn draw_stars<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_STAR))?;
    let (cw, ch) = (state.canvas.width, state.canvas.height);
    for i in 0..STAR_COUNT {
        let base_x = (i.wrapping_mul(2_654_435_761) % 10_000) as f32 / 10_000.0 * cw;
        let y = (i.wrapping_mul(40_503) % 10_000) as f32 / 10_000.0 * ch;
        let x = (base_x - state.scroll_offset).rem_euclid(cw);
        if let Some((col, row)) = view.to_cell(Vec2::new(x, y)) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print(if i % 3 == 0 { "+" } else { "." }))?;
        }
    }
    Ok(())
}

fn draw_entity<W: Write>(
    out: &mut W,
    entity: &Entity,
    stage: u32,
    view: &Viewport,
) -> std::io::Result<()> {
    match &entity.kind {
        EntityKind::Player(_) => draw_sprite(out, view, entity.center(), "=|>", C_PLAYER),
        EntityKind::PlayerBullet { .. } => draw_sprite(out, view, entity.center(), "-", C_BULLET_PLAYER),
        EntityKind::EnemyBullet { .. } => draw_sprite(out, view, entity.center(), "◀◀", C_BULLET_ENEMY),
        EntityKind::Enemy { stage, .. } => {
            let (glyph, _, color) = stage_style(*stage);
            draw_sprite(out, view, entity.center(), glyph, color)
        }
        EntityKind::Boss(_) => {
            // The boss is drawn over its full hitbox so what you see is what hits.
            let (_, fill, color) = stage_style(stage);
            let b = collision::bounds(entity);
            draw_block(out, view, Vec2::new(b.left, b.top), Vec2::new(b.right, b.bottom), fill, color)
        }
        EntityKind::Explosion { large, .. } => {
            let glyph = if *large { "\\*|*/" } else { "*" };
            draw_sprite(out, view, entity.center(), glyph, C_EXPLOSION)
        }
    }
}

/// Text sprite centred on a canvas point.
fn draw_sprite<W: Write>(
    out: &mut W,
    view: &Viewport,
    center: Vec2,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    let Some((col, row)) = view.to_cell(center) else {
        return Ok(());
    };
    let half = glyph.chars().count() as u16 / 2;
    let col = col.saturating_sub(half).max(1);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// Filled rectangle between two canvas corners, clipped to the play area.
fn draw_block<W: Write>(
    out: &mut W,
    view: &Viewport,
    top_left: Vec2,
    bottom_right: Vec2,
    fill: char,
    color: Color,
) -> std::io::Result<()> {
    let clip = |p: Vec2| p.clamp(Vec2::ZERO, view.canvas - Vec2::splat(0.001));
    let corners = (
        view.to_cell(clip(top_left)),
        view.to_cell(clip(bottom_right)),
    );
    let (Some((c0, r0)), Some((c1, r1))) = corners else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(color))?;
    let line: String = std::iter::repeat(fill).take((c1 - c0 + 1) as usize).collect();
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    // Score and stage - left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>7}  Stage {}", state.score, state.stage)))?;

    // Timer or boss HP - centre
    let centre = if state.phase == Phase::Boss && state.max_boss_hp > 0 {
        let filled = (state.boss_hp.min(state.max_boss_hp) * 20 / state.max_boss_hp) as usize;
        out.queue(style::SetForegroundColor(C_BOSS_BAR))?;
        format!("BOSS [{}{}]", "█".repeat(filled), "·".repeat(20 - filled))
    } else {
        let left_ms = (BOSS_ARRIVAL_MS - state.stage_timer_ms).max(0.0);
        out.queue(style::SetForegroundColor(C_HUD_TIMER))?;
        format!("Boss in {:>2}s", (left_ms / 1000.0).ceil() as u32)
    };
    let cx = (view.width / 2).saturating_sub(centre.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(cx, 0))?;
    out.queue(Print(&centre))?;

    // Lives - right
    let lives_str = format!("Lives:{}", "♥".repeat(state.lives as usize));
    let rx = view
        .width
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Arrows/WASD : Move   SPACE : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}
