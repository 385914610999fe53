use std::{error::Error, fmt, num::ParseIntError};

use depthcrawl_system_session::Action;

/// Smallest accepted floor edge.
pub(crate) const MIN_FLOOR_SIZE: u32 = 5;
/// Largest accepted floor edge.
pub(crate) const MAX_FLOOR_SIZE: u32 = 256;
/// Corruption bias change applied by one `+` or `-` in a script.
pub(crate) const BIAS_STEP: f64 = 0.05;

/// Floor dimensions requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FloorSize {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl fmt::Display for FloorSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Errors produced while reading command-line values.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum OptionError {
    /// The floor size was empty or whitespace.
    EmptyFloorSize,
    /// The floor size was not of the form `WxH`.
    MalformedFloorSize(String),
    /// The width component was not an integer.
    InvalidWidth(ParseIntError),
    /// The height component was not an integer.
    InvalidHeight(ParseIntError),
    /// An edge was below the minimum size.
    FloorTooSmall,
    /// An edge was above the maximum size.
    FloorTooLarge,
    /// A script contained a character with no action.
    UnknownScriptKey {
        /// Offending character.
        key: char,
        /// Character index within the script.
        position: usize,
    },
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFloorSize => write!(f, "floor size is empty"),
            Self::MalformedFloorSize(raw) => {
                write!(f, "expected WxH (e.g. 16x16), got '{raw}'")
            }
            Self::InvalidWidth(error) => write!(f, "invalid width: {error}"),
            Self::InvalidHeight(error) => write!(f, "invalid height: {error}"),
            Self::FloorTooSmall => {
                write!(f, "min size is {MIN_FLOOR_SIZE}x{MIN_FLOOR_SIZE}")
            }
            Self::FloorTooLarge => {
                write!(f, "max size is {MAX_FLOOR_SIZE}x{MAX_FLOOR_SIZE}")
            }
            Self::UnknownScriptKey { key, position } => {
                write!(f, "script key '{key}' at position {position} has no action")
            }
        }
    }
}

impl Error for OptionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidWidth(error) | Self::InvalidHeight(error) => Some(error),
            _ => None,
        }
    }
}

/// Parses a `WxH` floor size, case-insensitive and tolerant of spaces.
pub(crate) fn parse_floor_size(raw: &str) -> Result<FloorSize, OptionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(OptionError::EmptyFloorSize);
    }

    let lowered = trimmed.to_lowercase();
    let mut parts = lowered.split('x');
    let (Some(width), Some(height), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(OptionError::MalformedFloorSize(raw.to_owned()));
    };

    let width = width.trim().parse::<i64>().map_err(OptionError::InvalidWidth)?;
    let height = height.trim().parse::<i64>().map_err(OptionError::InvalidHeight)?;

    let (min, max) = (i64::from(MIN_FLOOR_SIZE), i64::from(MAX_FLOOR_SIZE));
    if width < min || height < min {
        return Err(OptionError::FloorTooSmall);
    }
    if width > max || height > max {
        return Err(OptionError::FloorTooLarge);
    }

    Ok(FloorSize {
        width: width as u32,
        height: height as u32,
    })
}

/// Adapter for clap's `value_parser`.
pub(crate) fn floor_size_arg(raw: &str) -> Result<FloorSize, String> {
    parse_floor_size(raw).map_err(|error| error.to_string())
}

/// Translates a keystroke script into session actions.
///
/// `w`/`s` move, `a`/`d` turn, `+`/`-` nudge the corruption bias, `>`
/// descends and `v` toggles watchers. Whitespace is ignored.
pub(crate) fn parse_script(script: &str) -> Result<Vec<Action>, OptionError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, key)| !key.is_whitespace())
        .map(|(position, key)| match key.to_ascii_lowercase() {
            'w' => Ok(Action::MoveForward),
            's' => Ok(Action::MoveBackward),
            'a' => Ok(Action::TurnLeft),
            'd' => Ok(Action::TurnRight),
            '+' => Ok(Action::AdjustBias(BIAS_STEP)),
            '-' => Ok(Action::AdjustBias(-BIAS_STEP)),
            '>' => Ok(Action::Descend),
            'v' => Ok(Action::ToggleWatchers),
            _ => Err(OptionError::UnknownScriptKey { key, position }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: u32, height: u32) -> FloorSize {
        FloorSize { width, height }
    }

    #[test]
    fn floor_size_accepts_mixed_case_and_spaces() {
        assert_eq!(parse_floor_size(" 16X24 "), Ok(size(16, 24)));
        assert_eq!(parse_floor_size("5 x 256"), Ok(size(5, 256)));
    }

    #[test]
    fn floor_size_rejects_bad_input() {
        assert_eq!(parse_floor_size("   "), Err(OptionError::EmptyFloorSize));
        assert!(matches!(
            parse_floor_size("16"),
            Err(OptionError::MalformedFloorSize(_))
        ));
        assert!(matches!(
            parse_floor_size("16x16x16"),
            Err(OptionError::MalformedFloorSize(_))
        ));
        assert!(matches!(
            parse_floor_size("ax16"),
            Err(OptionError::InvalidWidth(_))
        ));
        assert!(matches!(
            parse_floor_size("16x"),
            Err(OptionError::InvalidHeight(_))
        ));
        assert_eq!(parse_floor_size("4x16"), Err(OptionError::FloorTooSmall));
        assert_eq!(parse_floor_size("-3x16"), Err(OptionError::FloorTooSmall));
        assert_eq!(parse_floor_size("16x257"), Err(OptionError::FloorTooLarge));
    }

    #[test]
    fn floor_size_errors_read_well() {
        assert_eq!(floor_size_arg("2x2"), Err("min size is 5x5".to_owned()));
        assert_eq!(size(7, 9).to_string(), "7x9");
    }

    #[test]
    fn script_maps_keys_to_actions() {
        let actions = parse_script("wA d\n+->V").expect("valid script");
        assert_eq!(
            actions,
            vec![
                Action::MoveForward,
                Action::TurnLeft,
                Action::TurnRight,
                Action::AdjustBias(BIAS_STEP),
                Action::AdjustBias(-BIAS_STEP),
                Action::Descend,
                Action::ToggleWatchers,
            ]
        );
    }

    #[test]
    fn script_reports_unknown_keys() {
        assert_eq!(
            parse_script("ww?"),
            Err(OptionError::UnknownScriptKey {
                key: '?',
                position: 2
            })
        );
    }
}
