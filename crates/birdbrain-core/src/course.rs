use crate::config::SimConfig;
use rand::Rng;

/// A vertical barrier pair with a passable gap spanning
/// `[gap_top, gap_top + gap_height)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    pub x: f64,
    pub gap_top: f64,
}

/// The scrolling obstacle field: `wall_count` walls ordered by increasing
/// x, replaced wholesale at each epoch boundary and recycled one at a time
/// as the population advances.
#[derive(Clone, Debug)]
pub struct Course {
    pub walls: Vec<Wall>,
}

impl Course {
    /// Startup/epoch generation: first wall at `wall_start_x`, each
    /// subsequent wall one `wall_spacing` further, gap heights uniform in
    /// `[min_wall_height, gap_top_max)`.
    pub fn generate<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Self {
        let mut walls = Vec::with_capacity(config.wall_count);
        let mut x = config.wall_start_x;
        for _ in 0..config.wall_count {
            walls.push(Wall {
                x,
                gap_top: rng.random_range(config.min_wall_height..config.gap_top_max()),
            });
            x += config.wall_spacing;
        }
        Self { walls }
    }

    /// The next unpassed wall for a bird at `x`: the first wall whose right
    /// edge is still ahead of the bird. Past the last wall (only reachable
    /// transiently, before recycling catches up) the last wall is returned.
    pub fn next_wall(&self, x: f64, wall_width: f64) -> &Wall {
        self.walls
            .iter()
            .find(|wall| wall.x + wall_width >= x)
            .unwrap_or_else(|| self.walls.last().expect("course is never empty"))
    }

    /// Whether a square bird at (x, y) overlaps any wall's solid region,
    /// above or below the gap.
    pub fn collides(&self, x: f64, y: f64, config: &SimConfig) -> bool {
        let size = config.bird_size;
        self.walls.iter().any(|wall| {
            x + size >= wall.x
                && x <= wall.x + config.wall_width
                && (y <= wall.gap_top || y + size >= wall.gap_top + config.gap_height)
        })
    }

    /// Drop the leading wall once it has scrolled half a canvas behind the
    /// reference bird and append a fresh one behind the last, keeping the
    /// field length constant. Returns true if a wall was recycled.
    pub fn recycle<R: Rng + ?Sized>(
        &mut self,
        reference_x: f64,
        config: &SimConfig,
        rng: &mut R,
    ) -> bool {
        let threshold = -(config.canvas_width / 2.0 + config.wall_width / 2.0);
        let mut recycled = false;
        while self.walls[0].x - reference_x < threshold {
            self.walls.remove(0);
            let last = *self.walls.last().expect("wall_count >= 1");
            self.walls.push(Wall {
                x: last.x + config.wall_spacing,
                gap_top: rng.random_range(config.min_wall_height..config.gap_top_max()),
            });
            recycled = true;
        }
        recycled
    }
}
