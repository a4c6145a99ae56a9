use super::*;

#[test]
fn ids_round_trip_through_from_str() {
    for preset in GradientPreset::ALL {
        assert_eq!(preset.id().parse::<GradientPreset>().unwrap(), preset);
    }
}

#[test]
fn legacy_ids_are_accepted() {
    assert_eq!(
        "gradient3".parse::<GradientPreset>().unwrap(),
        GradientPreset::DarkTeal
    );
    let parsed: GradientPreset = serde_json::from_str("\"gradient4\"").unwrap();
    assert_eq!(parsed, GradientPreset::Midnight);
}

#[test]
fn unknown_id_falls_back_to_deep_blue() {
    assert!("sunset".parse::<GradientPreset>().is_err());
    assert_eq!(
        GradientPreset::from_id_or_default("sunset"),
        GradientPreset::DeepBlue
    );
}

#[test]
fn deep_blue_palette_matches_hex_table() {
    let p = GradientPreset::DeepBlue.palette();
    assert_eq!(p.stops[0], Rgba8::from_hex("#0a1628").unwrap());
    assert_eq!(p.stops[3], Rgba8::from_hex("#162d4a").unwrap());
    assert_eq!(p.bokeh[1], Rgba8::from_hex("#4a7fb8").unwrap());
    assert!(p.stops.iter().chain(p.bokeh.iter()).all(|c| c.a == 255));
}
