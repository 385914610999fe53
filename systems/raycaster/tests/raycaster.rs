use std::f64::consts::{FRAC_PI_2, PI};

use depthcrawl_core::{Canvas, CellStyle, Map, Player, STAIRS_GLYPH};
use depthcrawl_system_effects::{EffectsContext, VisualConfig};
use depthcrawl_system_raycaster::{wall_shade, HitSide, Raycaster, CEILING_GLYPH};
use depthcrawl_system_watchers::WatcherManager;

struct GridCanvas {
    width: u32,
    height: u32,
    cells: Vec<Option<(char, CellStyle)>>,
}

impl GridCanvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    fn glyph(&self, x: u32, y: u32) -> Option<char> {
        self.cells[(y * self.width + x) as usize].map(|(glyph, _)| glyph)
    }
}

impl Canvas for GridCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_cell(&mut self, x: u32, y: u32, glyph: char, style: CellStyle) {
        if x < self.width && y < self.height {
            self.cells[(y * self.width + x) as usize] = Some((glyph, style));
        }
    }
}

fn arena() -> Map {
    Map::parse(&[
        "################",
        "#..............#",
        "#..............#",
        "#..###.........#",
        "#..#...........#",
        "#..#...........#",
        "#..............#",
        "#.......####...#",
        "#.......#......#",
        "#.......#......#",
        "#..............#",
        "#.........##...#",
        "#..........#...#",
        "#..............#",
        "#..............#",
        "################",
    ])
    .expect("valid arena")
}

fn stairs_room() -> Map {
    Map::parse(&["#####", "#...#", "#..>#", "#...#", "#####"]).expect("valid room")
}

#[test]
fn cast_ray_hits_wall_within_range() {
    let raycaster = Raycaster::new(120, 40);
    let player = Player::new(8.5, 8.5, 0.0);
    let distance = raycaster.cast_ray(&player, &arena(), 0.0);
    assert!(distance > 0.0);
    assert!(distance <= raycaster.max_dist());
}

#[test]
fn cast_ray_measures_distance_to_wall_face() {
    let raycaster = Raycaster::new(120, 40);
    let player = Player::new(1.5, 2.5, 0.0);
    let hit = raycaster.cast_ray_with_stairs(&player, &arena(), 0.0);
    assert!((hit.wall_dist - 13.5).abs() < 1e-9, "{hit:?}");
    assert_eq!(hit.side, HitSide::Vertical);

    let north = raycaster.cast_ray_with_stairs(&player, &arena(), -FRAC_PI_2);
    assert!((north.wall_dist - 1.5).abs() < 1e-9, "{north:?}");
    assert_eq!(north.side, HitSide::Horizontal);
}

#[test]
fn stairs_before_wall_are_tracked() {
    let raycaster = Raycaster::new(120, 40);
    let player = Player::new(1.5, 2.5, 0.0);
    let hit = raycaster.cast_ray_with_stairs(&player, &stairs_room(), 0.0);

    assert!(hit.wall_dist > 0.0);
    assert!(hit.stairs_dist > 0.0);
    assert!(hit.stairs_dist < hit.wall_dist, "{hit:?}");
    assert!((hit.stairs_dist - 1.5).abs() < 1e-9);
    assert!((hit.wall_dist - 2.5).abs() < 1e-9);
}

#[test]
fn stairs_behind_the_ray_are_ignored() {
    let raycaster = Raycaster::new(120, 40);
    let player = Player::new(2.5, 2.5, PI);
    let hit = raycaster.cast_ray_with_stairs(&player, &stairs_room(), PI);
    assert!(hit.stairs_dist.is_infinite());
}

#[test]
fn rays_stop_at_render_distance() {
    let corridor = Map::parse(&[
        "##############################",
        "#............................#",
        "##############################",
    ])
    .expect("valid corridor");
    let raycaster = Raycaster::new(120, 40).with_max_dist(6.0);
    let player = Player::new(1.5, 1.5, 0.0);
    assert_eq!(raycaster.cast_ray(&player, &corridor, 0.0), 6.0);
}

#[test]
fn fish_eye_correction_equalizes_symmetric_rays() {
    let room = Map::parse(&[
        "#####################",
        "#...................#",
        "#...................#",
        "#...................#",
        "#...................#",
        "#...................#",
        "#...................#",
        "#####################",
    ])
    .expect("valid room");
    let raycaster = Raycaster::new(120, 40);
    let player = Player::new(10.5, 1.5, FRAC_PI_2);
    let half = raycaster.fov() / 2.0;

    let left = raycaster.cast_ray(&player, &room, player.angle() - half) * (-half).cos();
    let right = raycaster.cast_ray(&player, &room, player.angle() + half) * half.cos();
    let centre = raycaster.cast_ray(&player, &room, player.angle());

    assert!((left - right).abs() < 1e-9, "left {left} right {right}");
    assert!((left - centre).abs() < 1e-9, "left {left} centre {centre}");
    assert!((centre - 5.5).abs() < 1e-9);
}

#[test]
fn render_fills_every_cell() {
    let raycaster = Raycaster::new(48, 20);
    let mut canvas = GridCanvas::new(48, 20);
    let player = Player::new(8.5, 8.5, 0.0);
    raycaster.render(
        &mut canvas,
        &player,
        &arena(),
        &EffectsContext::new(1, 0.0, 0),
        &VisualConfig::default(),
        None,
    );

    assert!(canvas.cells.iter().all(Option::is_some));
}

#[test]
fn render_draws_ceiling_wall_and_floor_bands() {
    let raycaster = Raycaster::new(40, 20);
    let mut canvas = GridCanvas::new(40, 20);
    // The centre column looks straight east at the wall 3.5 cells away.
    let player = Player::new(11.5, 2.5, 0.0);
    raycaster.render(
        &mut canvas,
        &player,
        &arena(),
        &EffectsContext::new(1, 0.0, 0),
        &VisualConfig::default(),
        None,
    );

    // Wall height 20 / 3.5 truncates to 5 rows starting at row 7.
    let column = 20;
    assert_eq!(canvas.glyph(column, 0), Some(CEILING_GLYPH));
    assert_eq!(canvas.glyph(column, 6), Some(CEILING_GLYPH));
    assert_eq!(canvas.glyph(column, 7), Some('▓'));
    assert_eq!(canvas.glyph(column, 11), Some('▓'));
    assert_eq!(canvas.glyph(column, 12), Some('.'));
    assert_eq!(canvas.glyph(column, 19), Some(';'));
    assert_eq!(wall_shade(3.5, raycaster.max_dist()), '▓');
}

#[test]
fn columns_past_a_right_angle_draw_full_height_walls() {
    let raycaster = Raycaster::new(10, 8).with_fov(4.0);
    let mut canvas = GridCanvas::new(10, 8);
    let room = Map::parse(&["#######", "#.....#", "#.....#", "#.....#", "#######"])
        .expect("valid room");
    let player = Player::new(3.5, 2.5, 0.0);
    raycaster.render(
        &mut canvas,
        &player,
        &room,
        &EffectsContext::new(1, 0.0, 0),
        &VisualConfig::default(),
        None,
    );

    // Column 0 is 2 radians off centre, so its corrected distance is negative.
    assert!((-2.0f64).cos() < 0.0);
    for row in 0..8 {
        assert_eq!(canvas.glyph(0, row), Some('█'), "row {row}");
    }
}

#[test]
fn render_overlays_stairs_in_front_of_wall() {
    let raycaster = Raycaster::new(30, 20);
    let mut canvas = GridCanvas::new(30, 20);
    let player = Player::new(1.5, 2.5, 0.0);
    raycaster.render(
        &mut canvas,
        &player,
        &stairs_room(),
        &EffectsContext::new(1, 0.0, 0),
        &VisualConfig::default(),
        None,
    );

    // Stairs 1.5 away: sprite height min(9, 20 / 3) = 6 rows centred on row 10.
    for row in 7..13 {
        assert_eq!(canvas.glyph(15, row), Some(STAIRS_GLYPH), "row {row}");
    }
    assert_ne!(canvas.glyph(15, 6), Some(STAIRS_GLYPH));
    assert_ne!(canvas.glyph(15, 13), Some(STAIRS_GLYPH));
}

#[test]
fn render_draws_visible_watchers_last() {
    let manager = (0..256u64)
        .map(|seed| WatcherManager::new(40, seed, std::f64::consts::FRAC_PI_3))
        .find(|manager| manager.visible_count() > 0)
        .expect("a seed with a visible watcher");
    let raycaster = Raycaster::new(60, 30);
    let mut canvas = GridCanvas::new(60, 30);
    let player = Player::new(8.5, 8.5, 0.0);
    raycaster.render(
        &mut canvas,
        &player,
        &arena(),
        &EffectsContext::new(40, 0.0, 0),
        &VisualConfig::default(),
        Some(&manager),
    );

    let sprites = manager.sprites(60, 30);
    assert!(!sprites.is_empty());
    for sprite in &sprites {
        for row in sprite.start_y()..sprite.end_y() {
            let drawn = canvas.glyph(sprite.column(), row).expect("cell written");
            let covering = sprites.iter().any(|other| {
                other.column() == sprite.column()
                    && (other.start_y()..other.end_y()).contains(&row)
                    && other.glyph() == drawn
            });
            assert!(covering, "column {} row {row} shows {drawn:?}", sprite.column());
        }
    }
}
