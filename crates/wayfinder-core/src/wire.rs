//! Directory backend response parsing.
//!
//! The directory speaks plain text:
//!
//! | Request | Body |
//! |---------|------|
//! | `GET <base>?search=<query>` | destination names, one per line |
//! | `GET <base>?destination=<name>` | `x,y,z` |

use crate::error::WayfindError;
use crate::geometry::Vec3;

/// Splits a filter response into destination names.
///
/// Lines are trimmed and blank lines dropped; server order is preserved.
/// An empty body means no matches.
pub fn parse_destination_list(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a resolve response into a position.
///
/// The body must split on `,` into exactly three finite decimal numbers.
/// Whitespace around each number (a trailing newline, say) is ignored.
pub fn parse_position(body: &str) -> Result<Vec3, WayfindError> {
    let parts: Vec<&str> = body.split(',').collect();
    if parts.len() != 3 {
        return Err(WayfindError::MalformedPosition(format!(
            "expected 3 comma-separated numbers, got {} in {:?}",
            parts.len(),
            body
        )));
    }

    let mut coords = [0.0f32; 3];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        let trimmed = part.trim();
        let value: f32 = trimmed.parse().map_err(|_| {
            WayfindError::MalformedPosition(format!("not a number: {:?}", trimmed))
        })?;
        if !value.is_finite() {
            return Err(WayfindError::MalformedPosition(format!(
                "not a finite number: {:?}",
                trimmed
            )));
        }
        *slot = value;
    }

    Ok(Vec3::from(coords))
}
