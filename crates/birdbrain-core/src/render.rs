use crate::world::World;

/// What a rect is painted as. The renderer decides the actual colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    Wall,
    Bird,
    Ground,
}

/// A filled rectangle in screen coordinates (camera already applied).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub paint: Paint,
}

/// One tick's worth of draw commands for a fixed-size surface. Pure
/// read-only view of the world; building a frame never feeds back into
/// simulation state.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub rects: Vec<Rect>,
}

/// Camera-relative frame anchored on the leading bird: walls first (solid
/// part above the gap, then below), then live birds, then the ground.
/// The leader sits at `camera_x`; everything else is offset by its world
/// distance from the leader.
pub fn build_frame(world: &World) -> Frame {
    let config = world.config();
    let leader_x = world.leader_x();
    let to_screen = |world_x: f64| world_x - leader_x + config.camera_x;

    let mut rects = Vec::new();
    for wall in &world.course().walls {
        let x = to_screen(wall.x);
        rects.push(Rect {
            x,
            y: 0.0,
            w: config.wall_width,
            h: wall.gap_top,
            paint: Paint::Wall,
        });
        let gap_bottom = wall.gap_top + config.gap_height;
        rects.push(Rect {
            x,
            y: gap_bottom,
            w: config.wall_width,
            h: config.ground_y - gap_bottom,
            paint: Paint::Wall,
        });
    }

    for bird in world.birds.iter().filter(|b| !b.dead) {
        rects.push(Rect {
            x: to_screen(bird.x),
            y: bird.y,
            w: config.bird_size,
            h: config.bird_size,
            paint: Paint::Bird,
        });
    }

    rects.push(Rect {
        x: 0.0,
        y: config.ground_y,
        w: config.canvas_width,
        h: config.canvas_height - config.ground_y,
        paint: Paint::Ground,
    });

    Frame {
        width: config.canvas_width,
        height: config.canvas_height,
        rects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::course::Wall;

    fn test_world() -> World {
        World::new(SimConfig {
            population_size: 3,
            keep_count: 1,
            clones_per_survivor: 1,
            layer_sizes: vec![1, 1],
            ..SimConfig::default()
        })
    }

    #[test]
    fn frame_matches_canvas_dimensions() {
        let world = test_world();
        let frame = build_frame(&world);
        assert_eq!(frame.width, world.config().canvas_width);
        assert_eq!(frame.height, world.config().canvas_height);
    }

    #[test]
    fn leading_bird_is_pinned_at_camera_x() {
        let mut world = test_world();
        world.birds[0].x = 250.0;
        world.birds[1].x = 100.0;
        let frame = build_frame(&world);

        let birds: Vec<&Rect> = frame
            .rects
            .iter()
            .filter(|r| r.paint == Paint::Bird)
            .collect();
        assert_eq!(birds.len(), 3);
        let camera_x = world.config().camera_x;
        assert!(birds.iter().any(|r| r.x == camera_x));
        // A bird 150 units behind the leader draws 150 units left of it.
        assert!(birds.iter().any(|r| r.x == camera_x - 150.0));
    }

    #[test]
    fn dead_birds_are_not_drawn() {
        let mut world = test_world();
        world.birds[1].dead = true;
        let frame = build_frame(&world);
        let bird_count = frame
            .rects
            .iter()
            .filter(|r| r.paint == Paint::Bird)
            .count();
        assert_eq!(bird_count, 2);
    }

    #[test]
    fn each_wall_leaves_its_gap_open() {
        let mut world = test_world();
        world.course.walls = vec![Wall {
            x: 500.0,
            gap_top: 300.0,
        }];
        let frame = build_frame(&world);
        let config = world.config();

        let walls: Vec<&Rect> = frame
            .rects
            .iter()
            .filter(|r| r.paint == Paint::Wall)
            .collect();
        assert_eq!(walls.len(), 2);

        let screen_x = 500.0 - world.leader_x() + config.camera_x;
        let top = walls.iter().find(|r| r.y == 0.0).unwrap();
        assert_eq!((top.x, top.h), (screen_x, 300.0));

        let bottom = walls.iter().find(|r| r.y > 0.0).unwrap();
        assert_eq!(bottom.y, 300.0 + config.gap_height);
        assert_eq!(bottom.y + bottom.h, config.ground_y);
        // Nothing drawn inside the gap band.
        assert_eq!(top.y + top.h, 300.0);
    }

    #[test]
    fn ground_spans_the_bottom_and_draws_last() {
        let world = test_world();
        let frame = build_frame(&world);
        let ground = frame.rects.last().unwrap();
        assert_eq!(ground.paint, Paint::Ground);
        assert_eq!(ground.y, world.config().ground_y);
        assert_eq!(ground.w, world.config().canvas_width);
        assert_eq!(
            ground.y + ground.h,
            world.config().canvas_height
        );
    }
}
