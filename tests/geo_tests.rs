//! Unit tests for coordinates, city presets and map bounds.

use route_demo::error::DemoError;
use route_demo::geo::{capitalize_first_letter, distance_km, lerp, Bounds, City, LatLng};

#[test]
fn test_distance_scaled_to_km() {
    let a = LatLng::new(0.0, 0.0);
    let b = LatLng::new(3.0, 4.0);

    assert!((distance_km(&a, &b) - 5.0 * 111.32).abs() < 1e-9);
    assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-12);
    assert_eq!(distance_km(&a, &a), 0.0);
}

#[test]
fn test_lerp_clamps_fraction() {
    let a = LatLng::new(0.0, 0.0);
    let b = LatLng::new(2.0, 4.0);

    assert_eq!(lerp(&a, &b, 0.5), LatLng::new(1.0, 2.0));
    assert_eq!(lerp(&a, &b, -1.0), a);
    assert_eq!(lerp(&a, &b, 3.0), b);
}

#[test]
fn test_city_parsing_and_names() {
    assert_eq!("Mumbai".parse::<City>().unwrap(), City::Mumbai);
    assert_eq!(" chennai ".parse::<City>().unwrap(), City::Chennai);
    assert!(matches!(
        "paris".parse::<City>(),
        Err(DemoError::UnknownCity(name)) if name == "paris"
    ));

    assert_eq!(City::Bangalore.display_name(), "Bangalore");
    assert_eq!(City::Chennai.title(), "Chennai Route Optimization");
    assert_eq!(City::Delhi.center(), LatLng::new(28.7041, 77.1025));
    assert_eq!(City::default(), City::Bangalore);

    for city in City::ALL {
        assert_eq!(city.zoom(), 12);
        assert_eq!(city.key().parse::<City>().unwrap(), city);
    }
}

#[test]
fn test_capitalize_first_letter() {
    assert_eq!(capitalize_first_letter("hyderabad"), "Hyderabad");
    assert_eq!(capitalize_first_letter(""), "");
    assert_eq!(capitalize_first_letter("a"), "A");
}

#[test]
fn test_viewport_matches_tile_math() {
    let center = LatLng::new(0.0, 0.0);
    let bounds = Bounds::viewport(center, 12, 1024, 600);

    // 1024 px at zoom 12 is 1024 * 360 / (256 * 4096) degrees of longitude.
    assert!((bounds.lng_span() - 0.3515625).abs() < 1e-9);
    assert!((bounds.lat_span() - 0.3515625 * 600.0 / 1024.0).abs() < 1e-9);
    assert!(bounds.contains(&center));
    assert_eq!(bounds.center(), center);

    // Latitude span shrinks away from the equator.
    let north = Bounds::viewport(City::Delhi.center(), 12, 1024, 600);
    assert!(north.lat_span() < bounds.lat_span());
    assert!((north.lng_span() - bounds.lng_span()).abs() < 1e-12);
}

#[test]
fn test_bounds_from_points_and_pad() {
    assert!(Bounds::from_points(&Vec::<LatLng>::new()).is_none());

    let points = vec![
        LatLng::new(1.0, 2.0),
        LatLng::new(-1.0, 5.0),
        LatLng::new(0.5, 3.0),
    ];
    let bounds = Bounds::from_points(&points).unwrap();
    assert_eq!(bounds, Bounds::new(-1.0, 2.0, 1.0, 5.0));
    assert!(points.iter().all(|p| bounds.contains(p)));

    let padded = bounds.pad(0.1);
    assert!((padded.south - (-1.2)).abs() < 1e-12);
    assert!((padded.north - 1.2).abs() < 1e-12);
    assert!((padded.west - 1.7).abs() < 1e-12);
    assert!((padded.east - 5.3).abs() < 1e-12);
}
