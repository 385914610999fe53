use std::f64::consts::FRAC_PI_2;

use depthcrawl_core::{Canvas, CellStyle, Player};
use depthcrawl_system_session::{Action, Session, SessionConfig, NEAR_STAIRS_HINT};
use depthcrawl_world::ReachabilityField;

#[derive(Clone, Debug, PartialEq)]
struct Frame {
    width: u32,
    height: u32,
    cells: Vec<Option<(char, CellStyle)>>,
}

impl Frame {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }
}

impl Canvas for Frame {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_cell(&mut self, x: u32, y: u32, glyph: char, style: CellStyle) {
        if x < self.width && y < self.height {
            self.cells[(y * self.width + x) as usize] = Some((glyph, style));
        }
    }
}

fn config(seed: u64) -> SessionConfig {
    SessionConfig {
        map_width: 24,
        map_height: 24,
        seed,
        screen_width: 60,
        screen_height: 20,
        show_watchers: true,
    }
}

fn script() -> Vec<Action> {
    vec![
        Action::MoveForward,
        Action::TurnLeft,
        Action::MoveForward,
        Action::MoveForward,
        Action::TeleportToDepth(36),
        Action::TurnRight,
        Action::MoveForward,
        Action::AdjustBias(0.1),
        Action::MoveBackward,
        Action::TurnRight,
        Action::MoveForward,
        Action::Descend,
        Action::MoveForward,
        Action::TurnLeft,
        Action::MoveForward,
    ]
}

fn run(seed: u64) -> (Vec<Frame>, Session) {
    let mut session = Session::new(config(seed));
    let mut frames = Vec::new();
    let actions = script();
    for tick in 0..150usize {
        if tick % 10 == 0 {
            if let Some(action) = actions.get(tick / 10) {
                session.apply(*action);
            }
        }
        session.tick();
        if tick % 25 == 0 {
            let mut frame = Frame::new(60, 20);
            session.render(&mut frame);
            frames.push(frame);
        }
    }
    (frames, session)
}

fn heading_quarter(player: &Player) -> i64 {
    ((player.angle() / FRAC_PI_2).round() as i64).rem_euclid(4)
}

fn walk_to_stairs(session: &mut Session) {
    let floor = session.floor().expect("current floor").clone();
    let field = ReachabilityField::from_map(floor.map(), floor.stairs());
    while session.player().cell() != floor.stairs() {
        let cell = session.player().cell();
        let here = field.distance(cell).expect("player can reach the stairs");
        let quarter = [(0, (1, 0)), (1, (0, 1)), (2, (-1, 0)), (3, (0, -1))]
            .into_iter()
            .find(|(_, (dx, dy))| field.distance(cell.offset(*dx, *dy)) == Some(here - 1))
            .map(|(quarter, _)| quarter)
            .expect("a neighbour closer to the stairs");
        while heading_quarter(session.player()) != quarter {
            session.apply(Action::TurnRight);
        }
        session.apply(Action::MoveForward);
    }
}

#[test]
fn identical_scripts_replay_identically() {
    let (first_frames, first) = run(0xc0ffee);
    let (second_frames, second) = run(0xc0ffee);

    assert_eq!(first_frames, second_frames);
    assert_eq!(first.player(), second.player());
    assert_eq!(first.corruption(), second.corruption());
    assert_eq!(first.watchers(), second.watchers());
    assert!(first.depth() >= 37);
}

#[test]
fn different_seeds_produce_different_floors() {
    let first = Session::new(config(1));
    let second = Session::new(config(2));
    assert_ne!(
        first.floor().expect("floor").map(),
        second.floor().expect("floor").map()
    );
}

#[test]
fn rendered_frames_cover_the_screen() {
    let (frames, _) = run(7);
    for frame in frames {
        assert!(frame.cells.iter().all(Option::is_some));
    }
}

#[test]
fn reaching_the_stairs_descends_on_next_tick() {
    let mut session = Session::new(config(21));
    walk_to_stairs(&mut session);
    assert_eq!(session.depth(), 1);

    let heading = session.player().angle();
    session.tick();

    assert_eq!(session.hint(), NEAR_STAIRS_HINT);
    assert_eq!(session.depth(), 2);
    assert_eq!(session.corruption().depth(), 2);
    assert_eq!(
        session.player().cell(),
        session.floor().expect("next floor").spawn()
    );
    assert_eq!(session.player().angle(), heading);
}

#[test]
fn visible_watchers_accumulate_exposure() {
    let mut session = Session::new(config(5));
    session.apply(Action::TeleportToDepth(45));
    for _ in 0..300 {
        session.tick();
    }
    assert!(session.corruption().exposure() > 0.0);
    assert!(session.corruption().bias() > 0.0);
}
