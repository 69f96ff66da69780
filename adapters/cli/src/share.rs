use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use platformer_core::{Grid, GridError, LevelDimensions};
use serde::{Deserialize, Serialize};

const SHARE_DOMAIN: &str = "level";
const SHARE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const SHARE_HEADER: &str = "level:v1";
/// Delimiter used to separate the prefix, level dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Generated level packed for transfer as a single line of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LevelShare {
    /// Size of the shared level in tiles.
    pub(crate) dimensions: LevelDimensions,
    /// Seed the level was generated from, if known.
    pub(crate) seed: Option<u64>,
    /// Interchange rows, top to bottom.
    pub(crate) rows: Vec<String>,
}

impl LevelShare {
    /// Captures rows together with the seed that produced them.
    pub(crate) fn new(seed: Option<u64>, rows: Vec<String>) -> Self {
        let width_tiles = rows.first().map_or(0, |row| row.chars().count()) as u32;
        Self {
            dimensions: LevelDimensions::new(width_tiles, rows.len() as u32),
            seed,
            rows,
        }
    }

    /// Encodes the level into a single-line string suitable for sharing.
    pub(crate) fn encode(&self) -> Result<String, serde_json::Error> {
        let payload = SharePayload {
            seed: self.seed,
            rows: self.rows.clone(),
        };
        let json = serde_json::to_vec(&payload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SHARE_HEADER}:{}x{}:{encoded}",
            self.dimensions.width_tiles, self.dimensions.height_tiles
        ))
    }

    /// Decodes a level from its share string, checking the rows against the
    /// advertised dimensions and the tile alphabet.
    pub(crate) fn decode(value: &str) -> Result<Self, ShareError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ShareError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(ShareError::MissingPrefix)?;
        let version = parts.next().ok_or(ShareError::MissingVersion)?;
        let dimensions = parts.next().ok_or(ShareError::MissingDimensions)?;
        let payload = parts.next().ok_or(ShareError::MissingPayload)?;

        if domain != SHARE_DOMAIN {
            return Err(ShareError::InvalidPrefix(domain.to_owned()));
        }
        if version != SHARE_VERSION {
            return Err(ShareError::UnsupportedVersion(version.to_owned()));
        }

        let dimensions = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(ShareError::InvalidEncoding)?;
        let decoded: SharePayload =
            serde_json::from_slice(&bytes).map_err(ShareError::InvalidPayload)?;

        let grid = Grid::from_rows(decoded.rows.as_slice()).map_err(ShareError::InvalidLayout)?;
        if grid.dimensions() != dimensions {
            return Err(ShareError::DimensionMismatch {
                expected: dimensions,
                found: grid.dimensions(),
            });
        }

        Ok(Self {
            dimensions,
            seed: decoded.seed,
            rows: decoded.rows,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SharePayload {
    seed: Option<u64>,
    rows: Vec<String>,
}

/// Errors that can occur while decoding level share strings.
#[derive(Debug)]
pub(crate) enum ShareError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the share string.
    MissingPrefix,
    /// The share string did not contain a version segment.
    MissingVersion,
    /// The share string did not include level dimensions.
    MissingDimensions,
    /// The share string did not include the payload segment.
    MissingPayload,
    /// The share string used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The share string used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The level dimensions could not be parsed from the share string.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The decoded rows do not form a valid layout.
    InvalidLayout(GridError),
    /// The decoded rows disagree with the advertised dimensions.
    DimensionMismatch {
        /// Dimensions written in the share string header.
        expected: LevelDimensions,
        /// Dimensions of the decoded rows.
        found: LevelDimensions,
    },
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "share string was empty"),
            Self::MissingPrefix => write!(f, "share string is missing the prefix"),
            Self::MissingVersion => write!(f, "share string is missing the version"),
            Self::MissingDimensions => write!(f, "share string is missing the level dimensions"),
            Self::MissingPayload => write!(f, "share string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "share prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "share version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse level dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => write!(f, "could not decode level payload: {error}"),
            Self::InvalidPayload(error) => write!(f, "could not parse level payload: {error}"),
            Self::InvalidLayout(error) => write!(f, "shared rows are not a valid level: {error}"),
            Self::DimensionMismatch { expected, found } => write!(
                f,
                "share string advertises {}x{} but holds {}x{} rows",
                expected.width_tiles, expected.height_tiles, found.width_tiles, found.height_tiles
            ),
        }
    }
}

impl Error for ShareError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            Self::InvalidLayout(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<LevelDimensions, ShareError> {
    let invalid = || ShareError::InvalidDimensions(dimensions.to_owned());
    let (width, height) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }

    Ok(LevelDimensions::new(width, height))
}
