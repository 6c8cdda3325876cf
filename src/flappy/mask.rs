//! Pixel-mask collision.
//!
//! Sprites are reduced to opaque/transparent bitmaps. Two sprites collide only
//! when an opaque pixel of one lands on an opaque pixel of the other; touching
//! bounding boxes are not enough.

use super::agent::Agent;
use super::obstacle::ObstaclePair;
use crate::core::config::SimConfig;
use crate::core::constants::{PIPE_BODY_INSET, PIPE_LIP_HEIGHT};

/// Opaque-pixel bitmap, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Build a mask by evaluating `opaque(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, opaque: impl Fn(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(opaque(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Fully opaque rectangle.
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build from ASCII rows where `#` marks an opaque pixel.
    ///
    /// Rows shorter than the longest row are padded with transparent pixels.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let height = rows.len() as u32;
        Self::from_fn(width, height, |x, y| {
            rows[y as usize].chars().nth(x as usize) == Some('#')
        })
    }

    /// Ellipse inscribed in the bounding box, sampled at pixel centers.
    pub fn ellipse(width: u32, height: u32) -> Self {
        let rx = width as f64 / 2.0;
        let ry = height as f64 / 2.0;
        Self::from_fn(width, height, |x, y| {
            let nx = (x as f64 + 0.5 - rx) / rx;
            let ny = (y as f64 + 0.5 - ry) / ry;
            nx * nx + ny * ny <= 1.0
        })
    }

    /// Bottom pipe: a full-width lip on top of an inset body.
    pub fn pipe(width: u32, height: u32) -> Self {
        let inset = PIPE_BODY_INSET.min(width / 2);
        Self::from_fn(width, height, |x, y| {
            y < PIPE_LIP_HEIGHT || (x >= inset && x < width - inset)
        })
    }

    pub fn flipped_vertically(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.get(x as i64, (self.height - 1 - y) as i64)
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opaque test; out-of-bounds pixels are transparent.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.bits[(y as u64 * self.width as u64 + x as u64) as usize]
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// First pixel (in `self` coordinates) where both masks are opaque, with
    /// `other`'s origin placed at `offset` relative to `self`'s origin.
    pub fn overlap(&self, other: &Mask, offset: (i64, i64)) -> Option<(i64, i64)> {
        let (dx, dy) = offset;
        let x_start = dx.max(0);
        let x_end = (dx + other.width as i64).min(self.width as i64);
        let y_start = dy.max(0);
        let y_end = (dy + other.height as i64).min(self.height as i64);

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    /// True when the two sprites' bounding boxes intersect at `offset`.
    pub fn bounds_overlap(&self, other: &Mask, offset: (i64, i64)) -> bool {
        let (dx, dy) = offset;
        dx < self.width as i64
            && dx + other.width as i64 > 0
            && dy < self.height as i64
            && dy + other.height as i64 > 0
    }
}

/// Collision masks for every sprite in the game.
#[derive(Debug, Clone)]
pub struct Sprites {
    pub bird: Mask,
    pub pipe_top: Mask,
    pub pipe_bottom: Mask,
}

impl Sprites {
    pub fn new(config: &SimConfig) -> Self {
        let pipe_bottom = Mask::pipe(config.obstacles.pipe_width, config.obstacles.pipe_height);
        Self {
            bird: Mask::ellipse(config.bird_width, config.bird_height),
            pipe_top: pipe_bottom.flipped_vertically(),
            pipe_bottom,
        }
    }
}

impl Default for Sprites {
    fn default() -> Self {
        Self::new(&SimConfig::default())
    }
}

/// Pixel-exact collision between an agent and either pipe of a pair.
pub fn overlaps(agent: &Agent, obstacle: &ObstaclePair, sprites: &Sprites) -> bool {
    let agent_row = agent.y.round();
    let dx = (obstacle.x - agent.x).round() as i64;
    let top_offset = (dx, (obstacle.top - agent_row).round() as i64);
    let bottom_offset = (dx, (obstacle.bottom - agent_row).round() as i64);

    sprites
        .bird
        .overlap(&sprites.pipe_top, top_offset)
        .or_else(|| sprites.bird.overlap(&sprites.pipe_bottom, bottom_offset))
        .is_some()
}
