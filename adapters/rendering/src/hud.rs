//! Status line, mini-map and controls drawn over the first-person view.

use depthcrawl_core::{Canvas, CellKind, CellStyle, Color, Map, Point, STAIRS_GLYPH};
use depthcrawl_system_session::Session;

use crate::FrameBuffer;

/// Style of the status line, controls and mini-map walls.
pub const HUD_STYLE: CellStyle = CellStyle::new(Color::Green, Color::Black);
/// Style of the player marker on the mini-map.
pub const PLAYER_STYLE: CellStyle = CellStyle::new(Color::Aqua, Color::Black);
/// Style of the stairs marker and the stairs hint.
pub const STAIRS_STYLE: CellStyle = CellStyle::new(Color::Yellow, Color::Black);
/// Style of open floor on the mini-map.
pub const DIM_STYLE: CellStyle = CellStyle::new(Color::DarkGray, Color::Black);

/// Key bindings shown on the bottom row.
pub const CONTROLS_LINE: &str = " W/S: Move | A/D: Turn | +/-: Bias | >: Descend | V: Watchers ";
/// Vertical mini-map radius; the horizontal radius is twice as wide.
pub const DEFAULT_MINI_MAP_RADIUS: u32 = 6;
/// Columns left free between the mini-map and the right screen edge.
pub const MINI_MAP_RIGHT_MARGIN: u32 = 1;

const MINI_MAP_TOP: u32 = 1;
const PLAYER_GLYPH: char = '@';
const WALL_GLYPH: char = '#';
const FLOOR_GLYPH: char = '.';

/// Which optional HUD elements are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudOptions {
    /// Draw the mini-map in the top-right corner.
    pub show_mini_map: bool,
}

impl Default for HudOptions {
    fn default() -> Self {
        Self {
            show_mini_map: true,
        }
    }
}

/// Status text for the top row, corruption shown as a whole percentage.
#[must_use]
pub fn status_line(depth: u32, corruption: f64) -> String {
    format!(" Depth: {depth} | Corruption: {:.0}% ", corruption * 100.0)
}

/// Text rows of the map around the player.
///
/// Rows span `2 * radius_y + 1` cells and columns `2 * radius_x + 1`. Walls are
/// `#`, open cells `.`, the stairs `>` and the player `@`; coordinates outside
/// the map are blank.
#[must_use]
pub fn mini_map(
    map: &Map,
    player: Point,
    stairs: Point,
    radius_x: u32,
    radius_y: u32,
) -> Vec<String> {
    let radius_x = i32::try_from(radius_x).unwrap_or(i32::MAX / 2);
    let radius_y = i32::try_from(radius_y).unwrap_or(i32::MAX / 2);

    (-radius_y..=radius_y)
        .map(|dy| {
            (-radius_x..=radius_x)
                .map(|dx| {
                    let cell = player.offset(dx, dy);
                    if cell == player {
                        PLAYER_GLYPH
                    } else if cell == stairs {
                        STAIRS_GLYPH
                    } else if !map.contains(cell.x(), cell.y()) {
                        ' '
                    } else {
                        match map.cell_at(cell) {
                            CellKind::Wall => WALL_GLYPH,
                            CellKind::Stairs => STAIRS_GLYPH,
                            CellKind::Empty => FLOOR_GLYPH,
                        }
                    }
                })
                .collect()
        })
        .collect()
}

/// Left column of a mini-map `map_width` wide, kept on screen.
#[must_use]
pub fn mini_map_start_x(screen_width: u32, map_width: u32) -> u32 {
    screen_width.saturating_sub(map_width + MINI_MAP_RIGHT_MARGIN)
}

/// Draws the status line, mini-map, controls and stairs hint for a session.
pub fn draw_hud(frame: &mut FrameBuffer, session: &Session, options: HudOptions) {
    let (width, height) = (frame.width(), frame.height());
    if width == 0 || height == 0 {
        return;
    }

    let status = status_line(session.depth(), session.corruption().level());
    frame.draw_text(0, 0, &status, HUD_STYLE);

    if options.show_mini_map {
        if let Some(floor) = session.floor() {
            let lines = mini_map(
                floor.map(),
                session.player().cell(),
                floor.stairs(),
                DEFAULT_MINI_MAP_RADIUS * 2,
                DEFAULT_MINI_MAP_RADIUS,
            );
            draw_mini_map(frame, &lines);
        }
    }

    frame.draw_text(0, height - 1, CONTROLS_LINE, HUD_STYLE);

    let hint = session.hint();
    if !hint.is_empty() && height >= 2 {
        frame.draw_text(0, height - 2, &format!(" {hint} "), STAIRS_STYLE);
    }
}

fn draw_mini_map(frame: &mut FrameBuffer, lines: &[String]) {
    let map_height = lines.len() as u32;
    let map_width = lines.first().map_or(0, |line| line.chars().count() as u32);
    if map_height == 0 || MINI_MAP_TOP + map_height >= frame.height() {
        return;
    }

    let start_x = mini_map_start_x(frame.width(), map_width);
    let right_edge = frame.width().saturating_sub(MINI_MAP_RIGHT_MARGIN);
    for (row, line) in (MINI_MAP_TOP..).zip(lines) {
        for (column, glyph) in (start_x..).zip(line.chars()) {
            if column >= right_edge {
                break;
            }
            let style = match glyph {
                WALL_GLYPH => HUD_STYLE,
                PLAYER_GLYPH => PLAYER_STYLE,
                STAIRS_GLYPH => STAIRS_STYLE,
                _ => DIM_STYLE,
            };
            frame.set_cell(column, row, glyph, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depthcrawl_system_session::SessionConfig;

    fn room() -> Map {
        Map::parse(&["#####", "#..>#", "#...#", "#####"]).expect("valid room")
    }

    #[test]
    fn status_line_rounds_corruption_percentage() {
        assert_eq!(status_line(1, 0.0), " Depth: 1 | Corruption: 0% ");
        assert_eq!(status_line(27, 0.456), " Depth: 27 | Corruption: 46% ");
        assert_eq!(status_line(60, 1.0), " Depth: 60 | Corruption: 100% ");
    }

    #[test]
    fn mini_map_marks_player_stairs_and_outside() {
        let lines = mini_map(&room(), Point::new(1, 1), Point::new(3, 1), 2, 1);
        assert_eq!(lines, vec![" ####", " #@.>", " #..."]);
    }

    #[test]
    fn stairs_hint_is_available_to_hud_callers() {
        let stairs = Point::new(5, 5);
        assert_eq!(
            crate::stairs_hint(Point::new(5, 4), stairs),
            crate::stairs_hint(Point::new(4, 5), stairs)
        );
        assert!(!crate::stairs_hint(Point::new(5, 4), stairs).is_empty());
        assert!(crate::stairs_hint(Point::new(0, 0), stairs).is_empty());
    }

    #[test]
    fn mini_map_with_zero_radius_is_just_the_player() {
        let lines = mini_map(&room(), Point::new(2, 2), Point::new(3, 1), 0, 0);
        assert_eq!(lines, vec!["@"]);
    }

    #[test]
    fn mini_map_start_stays_on_screen() {
        assert_eq!(mini_map_start_x(60, 25), 34);
        assert_eq!(mini_map_start_x(10, 25), 0);
    }

    #[test]
    fn hud_draws_status_controls_and_mini_map() {
        let session = Session::new(SessionConfig {
            screen_width: 60,
            screen_height: 20,
            ..SessionConfig::default()
        });
        let mut frame = FrameBuffer::new(60, 20);
        draw_hud(&mut frame, &session, HudOptions::default());

        let rows = frame.rows_as_text();
        assert!(rows[0].starts_with(" Depth: 1 | Corruption: 0% "));
        assert!(rows[19].starts_with(" W/S: Move | A/D: Turn"));
        let player = frame.cell(34 + 12, 1 + 6).expect("mini-map cell");
        assert_eq!(player.glyph, PLAYER_GLYPH);
        assert_eq!(player.style, PLAYER_STYLE);
        assert_eq!(frame.cell(59, 7).map(|cell| cell.glyph), Some(' '));
    }

    #[test]
    fn hud_skips_mini_map_when_disabled_or_too_tall() {
        let session = Session::new(SessionConfig::default());

        let mut frame = FrameBuffer::new(60, 20);
        draw_hud(&mut frame, &session, HudOptions { show_mini_map: false });
        assert!(frame.rows_as_text()[7].trim().is_empty());

        let mut short = FrameBuffer::new(60, 14);
        draw_hud(&mut short, &session, HudOptions::default());
        assert!(short.rows_as_text()[7].trim().is_empty());
    }
}
