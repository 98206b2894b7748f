// terminal rendering of a GameState
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use super::game::{CollectionEffect, GameState};
use super::light::{cell_center, darkness, distance, LightMap};
use super::map::{Position, TileType};

const WALL: (u8, u8, u8) = (70, 70, 110);
const FLOOR: (u8, u8, u8) = (30, 30, 45);
const PLAYER: (u8, u8, u8) = (0, 230, 90);
const ITEM: (u8, u8, u8) = (255, 220, 0);
const EXIT: (u8, u8, u8) = (230, 60, 60);
const EFFECT: (u8, u8, u8) = (255, 255, 0);

pub const INSTRUCTIONS: &str =
    "Arrow keys to move, L to toggle light, R to reset, P autopilot, Q to quit";

fn scale((r, g, b): (u8, u8, u8), factor: f32) -> (u8, u8, u8) {
    let f = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
    (f(r), f(g), f(b))
}

fn blend(base: (u8, u8, u8), over: (u8, u8, u8), alpha: u8) -> (u8, u8, u8) {
    let a = alpha as f32 / 255.0;
    let mix = |b: u8, o: u8| (b as f32 * (1.0 - a) + o as f32 * a).round() as u8;
    (mix(base.0, over.0), mix(base.1, over.1), mix(base.2, over.2))
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Tints cells inside the expanding pickup ring.
fn effect_tint(effect: Option<&CollectionEffect>, pos: Position, cell_size: f32) -> Option<u8> {
    let effect = effect?;
    let d = distance(cell_center(pos, cell_size), cell_center(effect.at, cell_size));
    (d <= effect.radius().max(cell_size / 2.0)).then_some(effect.alpha())
}

/// Draws the maze two terminal columns per cell, darkened by the light map.
pub fn render_maze(game: &GameState) -> Text<'static> {
    render_maze_lit(game, &game.light_map())
}

fn render_maze_lit(game: &GameState, light: &LightMap) -> Text<'static> {
    let maze = game.maze();
    let player = game.player();
    let exit = maze.exit();
    let cell_size = game.config().cell_size;

    let mut lines = Vec::with_capacity(maze.height);
    for (y, row) in maze.grid.iter().enumerate() {
        let mut spans = Vec::with_capacity(row.len());
        for (x, &tile) in row.iter().enumerate() {
            let pos = Position::new(x, y);
            let brightness = 1.0 - darkness(light.level(pos)) as f32 / 255.0;

            let mut bg = match tile {
                TileType::Wall => WALL,
                TileType::Open => FLOOR,
            };
            if let Some(alpha) = effect_tint(game.effect(), pos, cell_size) {
                bg = blend(bg, EFFECT, alpha);
            }

            let (glyph, fg) = if pos == player {
                ("@@", Some(PLAYER))
            } else if game.items().contains(&pos) {
                ("**", Some(ITEM))
            } else if pos == exit {
                ("EE", Some(EXIT))
            } else {
                ("  ", None)
            };

            let mut style = Style::default().bg(rgb(scale(bg, brightness)));
            if let Some(fg) = fg {
                style = style
                    .fg(rgb(scale(fg, brightness.max(0.35))))
                    .add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(glyph, style));
        }
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}

/// Score, light state and the per-maze counters on one line.
pub fn render_hud(game: &GameState) -> Line<'static> {
    let light = if game.light_on() { "ON" } else { "OFF" };
    Line::from(vec![
        Span::styled(
            format!(" Score: {} ", game.score()),
            Style::default().fg(Color::White).bg(Color::Blue),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" Light: {light} "),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
        Span::raw(format!(
            "  Items left: {}  Moves: {}  Escapes: {}  Time: {:.1}s",
            game.items().len(),
            game.moves(),
            game.escapes(),
            game.elapsed()
        )),
    ])
}
