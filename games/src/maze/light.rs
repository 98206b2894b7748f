//! Distance-based lighting.
//!
//! All distances are in pixel space: a cell's center is
//! `cell * cell_size + cell_size / 2`. Everything here is a pure function of
//! positions and radii.

use super::map::Position;

/// Share of the player's light that an uncollected item gives off.
pub const ITEM_GLOW: f32 = 0.6;
/// Share of the player's light that the exit gives off.
pub const EXIT_GLOW: f32 = 0.4;
// overlay opacity of an unlit cell
pub const MAX_DARKNESS: u8 = 200;

pub fn cell_center(pos: Position, cell_size: f32) -> (f32, f32) {
    (
        pos.x as f32 * cell_size + cell_size / 2.0,
        pos.y as f32 * cell_size + cell_size / 2.0,
    )
}

pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// Whether a cell is lit. The radius itself is inclusive.
pub fn visible(cell_center: (f32, f32), player_center: (f32, f32), radius: f32) -> bool {
    distance(cell_center, player_center) <= radius
}

/// Light intensity at `distance`: 1 at the source, falling linearly to 0 at
/// `radius` and staying 0 past it.
pub fn alpha(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 || distance > radius {
        return 0.0;
    }
    (1.0 - distance / radius).clamp(0.0, 1.0)
}

pub fn darkness(intensity: f32) -> u8 {
    (MAX_DARKNESS as f32 * (1.0 - intensity.clamp(0.0, 1.0))).round() as u8
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSource {
    pub at: Position,
    pub radius: f32,
    pub strength: f32,
}

/// Per-cell light intensity for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct LightMap {
    width: usize,
    height: usize,
    levels: Vec<f32>,
}

impl LightMap {
    pub fn full(width: usize, height: usize) -> Self {
        LightMap {
            width,
            height,
            levels: vec![1.0; width * height],
        }
    }

    /// Combines `sources` by taking the brightest contribution per cell.
    pub fn compute(width: usize, height: usize, cell_size: f32, sources: &[LightSource]) -> Self {
        let mut levels = vec![0.0_f32; width * height];
        for source in sources {
            let origin = cell_center(source.at, cell_size);
            for y in 0..height {
                for x in 0..width {
                    let d = distance(cell_center(Position::new(x, y), cell_size), origin);
                    let lit = alpha(d, source.radius) * source.strength;
                    let level = &mut levels[y * width + x];
                    *level = level.max(lit);
                }
            }
        }
        LightMap {
            width,
            height,
            levels,
        }
    }

    /// The player's light plus the dimmer glows of the items and the exit.
    pub fn around(
        width: usize,
        height: usize,
        cell_size: f32,
        radius: f32,
        player: Position,
        items: &[Position],
        exit: Position,
    ) -> Self {
        let mut sources = Vec::with_capacity(items.len() + 2);
        sources.push(LightSource {
            at: player,
            radius,
            strength: 1.0,
        });
        sources.extend(items.iter().map(|&at| LightSource {
            at,
            radius: radius / 2.0,
            strength: ITEM_GLOW,
        }));
        sources.push(LightSource {
            at: exit,
            radius: radius / 3.0,
            strength: EXIT_GLOW,
        });
        Self::compute(width, height, cell_size, &sources)
    }

    pub fn level(&self, pos: Position) -> f32 {
        if pos.x >= self.width || pos.y >= self.height {
            return 0.0;
        }
        self.levels[pos.y * self.width + pos.x]
    }
}
