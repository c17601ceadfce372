use roadnet::errors::{RoadNetError, RoadNetResult};

/// Largest grid edge accepted on the command line
pub const MAX_GRID_EDGE: u32 = 4096;

/// Parse exactly `N` values separated by `delimiter`
pub fn parse_delimited<const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
) -> RoadNetResult<[f32; N]> {
    let parts: Vec<&str> = input.split(delimiter).map(str::trim).collect();
    if parts.len() != N {
        return Err(RoadNetError::configuration(format!(
            "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
        )));
    }

    let mut result = [0.0; N];
    for (slot, part) in result.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| {
            RoadNetError::configuration(format!("Invalid {type_name} value: '{part}'"))
        })?;
    }

    Ok(result)
}

/// Parse size string "WIDTHxHEIGHT"
pub fn parse_size(size_str: &str) -> RoadNetResult<(u32, u32)> {
    let [width, height] = parse_delimited::<2>(size_str, 'x', "size")?;
    let (width, height) = (width as u32, height as u32);

    if width < 2 || height < 2 {
        return Err(RoadNetError::configuration(
            "Width and height must be at least 2",
        ));
    }

    if width > MAX_GRID_EDGE || height > MAX_GRID_EDGE {
        return Err(RoadNetError::configuration(format!(
            "Width and height must not exceed {MAX_GRID_EDGE}"
        )));
    }

    Ok((width, height))
}

/// Parse a world position "X,Z"
pub fn parse_point(point_str: &str) -> RoadNetResult<[f32; 2]> {
    parse_delimited::<2>(point_str, ',', "point")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64x64").unwrap(), (64, 64));
        assert_eq!(parse_size("128x256").unwrap(), (128, 256));
        assert_eq!(parse_size("2x2").unwrap(), (2, 2));

        assert!(parse_size("64").is_err());
        assert!(parse_size("1x64").is_err());
        assert!(parse_size("5000x64").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("0.0,1.5").unwrap(), [0.0, 1.5]);
        assert_eq!(parse_point("-5.5, 10").unwrap(), [-5.5, 10.0]);

        assert!(parse_point("1.0").is_err());
        assert!(parse_point("1,2,3").is_err());
        assert!(parse_point("abc,def").is_err());
    }
}
