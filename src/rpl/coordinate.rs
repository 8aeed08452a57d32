/// Packed Degree/Minute Coordinate Parser
///
/// RPL sheets store positions as text like "N 12 34.5" or "W 020 15.250":
/// a hemisphere letter followed by whole degrees and decimal minutes.
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static PACKED_COORDINATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*(?P<dir>[A-Za-z])(?P<rest>.*)$").expect("coordinate pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn accepts(self, direction: char) -> bool {
        match self {
            Axis::Latitude => matches!(direction, 'N' | 'S'),
            Axis::Longitude => matches!(direction, 'E' | 'W'),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

/// A decoded position component.
///
/// `decimal` is `degrees + minutes / 60` and is always unsigned; the hemisphere
/// lives in `direction`. Use [`Coordinate::signed_decimal`] to fold it in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coordinate {
    pub direction: char,
    pub degrees: f64,
    pub minutes: f64,
    pub decimal: f64,
}

impl Coordinate {
    pub fn signed_decimal(&self) -> f64 {
        match self.direction {
            'S' | 'W' => -self.decimal,
            _ => self.decimal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("missing direction letter in {0:?}")]
    MissingDirection(String),

    #[error("direction '{direction}' is not valid for {axis} in {raw:?}")]
    InvalidDirection {
        axis: Axis,
        direction: char,
        raw: String,
    },

    #[error("expected degrees and minutes in {0:?}")]
    MissingComponent(String),

    #[error("cannot parse {token:?} as a number in {raw:?}")]
    InvalidNumber { token: String, raw: String },
}

/// Parse a packed coordinate of the form `<dir><ws>*<degrees><ws>+<minutes>`.
///
/// Degrees and minutes are not range checked.
pub fn parse_coordinate(raw: &str, axis: Axis) -> Result<Coordinate, CoordinateError> {
    let caps = PACKED_COORDINATE
        .captures(raw)
        .ok_or_else(|| CoordinateError::MissingDirection(raw.to_string()))?;

    let direction = caps["dir"]
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .ok_or_else(|| CoordinateError::MissingDirection(raw.to_string()))?;

    if !axis.accepts(direction) {
        return Err(CoordinateError::InvalidDirection {
            axis,
            direction,
            raw: raw.to_string(),
        });
    }

    let mut tokens = caps["rest"].split_whitespace();
    let (Some(degrees_token), Some(minutes_token)) = (tokens.next(), tokens.next()) else {
        return Err(CoordinateError::MissingComponent(raw.to_string()));
    };

    let degrees = parse_number(degrees_token, raw)?;
    let minutes = parse_number(minutes_token, raw)?;

    Ok(Coordinate {
        direction,
        degrees,
        minutes,
        decimal: degrees + minutes / 60.0,
    })
}

fn parse_number(token: &str, raw: &str) -> Result<f64, CoordinateError> {
    token
        .parse::<f64>()
        .map_err(|_| CoordinateError::InvalidNumber {
            token: token.to_string(),
            raw: raw.to_string(),
        })
}
