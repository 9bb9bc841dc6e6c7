//! Richmond, VA street data and coordinate sampling.
//!
//! Coordinates are drawn uniformly from the bounding box of
//! [`CITY_BOUNDARY`] and rejected until one falls inside the polygon.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::context::GenerationContext;
use crate::models::{Coordinates, Location};

#[rustfmt::skip]
pub const STREETS: &[&str] = &[
    "Main Street", "Cary Street", "Broad Street", "Monument Avenue",
    "Lombardy Street", "Grace Street", "Franklin Street", "Marshall Street",
    "Clay Street", "Leigh Street", "Chamberlayne Avenue", "Patterson Avenue",
    "Hull Street", "Midlothian Turnpike", "Forest Hill Avenue", "Semmes Avenue",
    "Grove Avenue", "Staples Mill Road", "Parham Road", "Three Chopt Road",
];

#[rustfmt::skip]
pub const AREAS: &[&str] = &[
    "Fan District", "Museum District", "Carytown", "Shockoe Bottom",
    "Church Hill", "Jackson Ward", "Oregon Hill", "West End",
    "North Side", "South Side", "East End", "Westover Hills",
    "Bellevue", "Ginter Park", "Lakeside", "Bon Air",
];

#[rustfmt::skip]
pub const ZIP_CODES: &[&str] = &[
    "23219", "23220", "23221", "23222", "23223", "23224", "23225", "23226",
    "23227", "23228", "23229", "23230", "23231", "23232", "23233", "23234",
    "23235", "23236", "23237", "23238", "23239", "23240", "23241", "23242",
];

/// Simplified city limits as (latitude, longitude) vertices.
pub const CITY_BOUNDARY: &[(f64, f64)] = &[
    (37.556, -77.601),
    (37.605, -77.535),
    (37.602, -77.455),
    (37.570, -77.385),
    (37.505, -77.390),
    (37.455, -77.420),
    (37.447, -77.500),
    (37.480, -77.590),
];

/// Downtown reference point, inside [`CITY_BOUNDARY`].
pub const CITY_CENTER: Coordinates = Coordinates {
    latitude: 37.5407,
    longitude: -77.4348,
};

const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// Ray-casting point-in-polygon test against [`CITY_BOUNDARY`].
pub fn within_city(point: &Coordinates) -> bool {
    let (y, x) = (point.latitude, point.longitude);
    let n = CITY_BOUNDARY.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (yi, xi) = CITY_BOUNDARY[i];
        let (yj, xj) = CITY_BOUNDARY[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn bounding_box() -> (f64, f64, f64, f64) {
    CITY_BOUNDARY.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(lat_min, lat_max, lng_min, lng_max), &(lat, lng)| {
            (
                lat_min.min(lat),
                lat_max.max(lat),
                lng_min.min(lng),
                lng_max.max(lng),
            )
        },
    )
}

fn round6(v: f64) -> f64 {
    (v * 1_000_000.0).round() / 1_000_000.0
}

/// Sample a coordinate inside the city limits, rounded to 6 decimals.
///
/// Falls back to [`CITY_CENTER`] if no sample lands inside the polygon
/// within a bounded number of attempts.
pub fn sample_coordinates(ctx: &mut GenerationContext) -> Coordinates {
    let (lat_min, lat_max, lng_min, lng_max) = bounding_box();
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let candidate = Coordinates {
            latitude: round6(ctx.rng().gen_range(lat_min..=lat_max)),
            longitude: round6(ctx.rng().gen_range(lng_min..=lng_max)),
        };
        if within_city(&candidate) {
            return candidate;
        }
    }
    CITY_CENTER
}

fn pick<'a>(ctx: &mut GenerationContext, items: &[&'a str]) -> &'a str {
    items.choose(ctx.rng()).copied().unwrap_or_default()
}

/// Build a full street address plus coordinates.
pub fn sample_location(ctx: &mut GenerationContext) -> Location {
    let number: u32 = ctx.rng().gen_range(100..=9999);
    let street = pick(ctx, STREETS);
    let area = pick(ctx, AREAS);
    let zip = pick(ctx, ZIP_CODES);
    let coordinates = sample_coordinates(ctx);

    Location {
        address: format!("{} {}, {}, Richmond, VA {}", number, street, area, zip),
        area: area.to_string(),
        zip: zip.to_string(),
        coordinates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_inside() {
        assert!(within_city(&CITY_CENTER));
    }

    #[test]
    fn test_far_points_are_outside() {
        let norfolk = Coordinates {
            latitude: 36.8508,
            longitude: -76.2859,
        };
        assert!(!within_city(&norfolk));
        let corner = Coordinates {
            latitude: 37.604,
            longitude: -77.600,
        };
        assert!(!within_city(&corner));
    }

    #[test]
    fn test_sampled_points_inside() {
        let mut ctx = GenerationContext::seeded(7);
        for _ in 0..500 {
            let c = sample_coordinates(&mut ctx);
            assert!(within_city(&c), "{:?} outside city limits", c);
        }
    }

    #[test]
    fn test_address_format() {
        let mut ctx = GenerationContext::seeded(11);
        let loc = sample_location(&mut ctx);
        assert!(loc.address.contains(", Richmond, VA "));
        assert!(loc.address.ends_with(&loc.zip));
        assert!(loc.address.contains(&loc.area));
        assert!(ZIP_CODES.contains(&loc.zip.as_str()));
    }
}
