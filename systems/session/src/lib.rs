#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless composition of one descent: floors, player, watchers, corruption
//! and the rendered view.
//!
//! A [`Session`] advances only when asked. Adapters translate input into
//! [`Action`]s, call [`Session::tick`] once per simulated frame and draw with
//! [`Session::render`]. Nothing here reads a clock or polls a terminal, so two
//! sessions fed the same configuration and actions stay identical.

use std::f64::consts::FRAC_PI_2;

use depthcrawl_core::{Canvas, CellKind, Player, Point};
use depthcrawl_system_effects::{apply_fake_geometry, render_whisper, EffectsContext, VisualSettings};
use depthcrawl_system_raycaster::Raycaster;
use depthcrawl_system_watchers::WatcherManager;
use depthcrawl_world::{CorruptionState, Floor, FloorManager};
use tracing::{debug, info};

/// Hint shown when the stairs are at most one step away.
pub const NEAR_STAIRS_HINT: &str = "A cold draft spills from a nearby opening.";
/// Hint shown when the stairs are a few steps away.
pub const FAINT_STAIRS_HINT: &str = "The air thins. Something leads down.";

const NEAR_STAIRS_DISTANCE: u32 = 1;
const FAINT_STAIRS_DISTANCE: u32 = 4;

/// Heading the player faces after entering a session.
const SPAWN_HEADING: f64 = -FRAC_PI_2;

/// Returns the stairs hint for a player standing on `player_cell`.
///
/// The hint is empty once the stairs are more than a few steps away by
/// Manhattan distance.
#[must_use]
pub fn stairs_hint(player_cell: Point, stairs: Point) -> &'static str {
    let distance = player_cell.manhattan_distance(stairs);
    if distance <= NEAR_STAIRS_DISTANCE {
        NEAR_STAIRS_HINT
    } else if distance <= FAINT_STAIRS_DISTANCE {
        FAINT_STAIRS_HINT
    } else {
        ""
    }
}

/// Parameters fixed when a session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Width of every generated floor in cells.
    pub map_width: u32,
    /// Height of every generated floor in cells.
    pub map_height: u32,
    /// Base seed for floor generation and watcher spawning.
    pub seed: u64,
    /// Width of the rendered view in character cells.
    pub screen_width: u32,
    /// Height of the rendered view in character cells.
    pub screen_height: u32,
    /// Whether watchers are drawn and contribute exposure.
    pub show_watchers: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            map_width: 32,
            map_height: 32,
            seed: 0,
            screen_width: 120,
            screen_height: 40,
            show_watchers: true,
        }
    }
}

/// Discrete request applied to a running session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Step one cell along the heading.
    MoveForward,
    /// Step one cell against the heading.
    MoveBackward,
    /// Turn a quarter revolution to the left.
    TurnLeft,
    /// Turn a quarter revolution to the right.
    TurnRight,
    /// Shift the corruption bias by the provided amount.
    AdjustBias(f64),
    /// Jump straight to the provided depth.
    TeleportToDepth(u32),
    /// Leave for the next floor without reaching the stairs.
    Descend,
    /// Show or hide watchers and their exposure.
    ToggleWatchers,
}

/// One player descending through generated floors.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    floors: FloorManager,
    player: Player,
    corruption: CorruptionState,
    watchers: WatcherManager,
    raycaster: Raycaster,
    visual_settings: VisualSettings,
    show_watchers: bool,
    hint: &'static str,
}

impl Session {
    /// Generates the first floor and places the player on its spawn facing
    /// north.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let mut floors = FloorManager::new(config.map_width, config.map_height, config.seed);
        let raycaster = Raycaster::new(config.screen_width, config.screen_height);
        let floor = floors.generate_first_floor();
        let player = Player::at_cell(floor.spawn(), SPAWN_HEADING);
        let watchers = WatcherManager::new(floor.depth(), config.seed, raycaster.fov());
        info!(
            seed = config.seed,
            width = floor.map().width(),
            height = floor.map().height(),
            "session started"
        );

        Self {
            config,
            floors,
            player,
            corruption: CorruptionState::new(),
            watchers,
            raycaster,
            visual_settings: VisualSettings::default(),
            show_watchers: config.show_watchers,
            hint: "",
        }
    }

    /// Configuration the session was started with.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Floor the player is currently on.
    #[must_use]
    pub fn floor(&self) -> Option<&Floor> {
        self.floors.current_floor()
    }

    /// Depth of the current floor.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.floors.current_depth()
    }

    /// Player pose.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Corruption accumulated so far.
    #[must_use]
    pub const fn corruption(&self) -> &CorruptionState {
        &self.corruption
    }

    /// Watchers of the current floor.
    #[must_use]
    pub const fn watchers(&self) -> &WatcherManager {
        &self.watchers
    }

    /// Whether watchers are currently drawn.
    #[must_use]
    pub const fn show_watchers(&self) -> bool {
        self.show_watchers
    }

    /// Visual tuning applied to corruption effects.
    #[must_use]
    pub const fn visual_settings(&self) -> &VisualSettings {
        &self.visual_settings
    }

    /// Mutable access to the visual tuning.
    pub fn visual_settings_mut(&mut self) -> &mut VisualSettings {
        &mut self.visual_settings
    }

    /// Stairs hint computed on the most recent tick.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        self.hint
    }

    /// Size of the rendered view as `(width, height)`.
    #[must_use]
    pub const fn screen_size(&self) -> (u32, u32) {
        self.raycaster.screen_size()
    }

    /// Changes the size of the rendered view.
    pub fn resize(&mut self, screen_width: u32, screen_height: u32) {
        self.raycaster.set_screen_size(screen_width, screen_height);
    }

    /// Applies a single player or operator request.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::MoveForward => {
                if let Some(floor) = self.floors.current_floor() {
                    let _ = self.player.move_forward(floor.map());
                }
            }
            Action::MoveBackward => {
                if let Some(floor) = self.floors.current_floor() {
                    let _ = self.player.move_backward(floor.map());
                }
            }
            Action::TurnLeft => self.player.rotate_left(),
            Action::TurnRight => self.player.rotate_right(),
            Action::AdjustBias(delta) => {
                self.corruption.adjust_bias(delta);
                debug!(bias = self.corruption.bias(), "adjusted corruption bias");
            }
            Action::TeleportToDepth(depth) => {
                let floor = self.floors.teleport_to_depth(depth);
                let (spawn, depth) = (floor.spawn(), floor.depth());
                self.enter_floor(spawn, depth);
            }
            Action::Descend => self.descend(),
            Action::ToggleWatchers => self.show_watchers = !self.show_watchers,
        }
    }

    /// Advances the simulation by one frame.
    ///
    /// The hint is taken from the cell the player occupies before any
    /// descent. Standing on stairs moves the player to the next floor's spawn
    /// with the same heading.
    pub fn tick(&mut self) {
        let Some(floor) = self.floors.current_floor() else {
            return;
        };
        let cell = self.player.cell();
        self.hint = stairs_hint(cell, floor.stairs());
        let on_stairs = floor.map().cell_at(cell) == CellKind::Stairs;

        if on_stairs {
            self.descend();
        }

        self.watchers.update();
        if self.show_watchers {
            self.corruption.add_exposure(self.watchers.corruption_delta());
        }
        self.corruption.update(self.floors.current_depth());
    }

    /// Draws the first-person view and the corruption overlays.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let Some(floor) = self.floors.current_floor() else {
            return;
        };
        let effects = EffectsContext::new(
            self.corruption.depth(),
            self.corruption.level(),
            self.corruption.ticks(),
        );
        let config = self.visual_settings.get();
        let watchers = self.show_watchers.then_some(&self.watchers);

        self.raycaster
            .render(canvas, &self.player, floor.map(), &effects, &config, watchers);
        render_whisper(canvas, &effects, &config);
        apply_fake_geometry(canvas, &effects, &config);
    }

    fn descend(&mut self) {
        let floor = self.floors.descend_to_next_floor();
        let (spawn, depth) = (floor.spawn(), floor.depth());
        self.enter_floor(spawn, depth);
    }

    fn enter_floor(&mut self, spawn: Point, depth: u32) {
        self.player.set_cell(spawn);
        self.watchers = WatcherManager::new(depth, self.config.seed, self.raycaster.fov());
        debug!(
            depth,
            watchers = self.watchers.watchers().len(),
            "placed player on new floor"
        );
    }
}
