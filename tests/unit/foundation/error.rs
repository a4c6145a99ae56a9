use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TelescrollError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TelescrollError::playback("x")
            .to_string()
            .contains("playback error:")
    );
    assert!(
        TelescrollError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        TelescrollError::asset("x")
            .to_string()
            .contains("asset error:")
    );
    assert!(
        TelescrollError::capture("x")
            .to_string()
            .contains("capture error:")
    );
    assert_eq!(TelescrollError::Cancelled.to_string(), "export cancelled");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TelescrollError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_cancelled());
    assert!(TelescrollError::Cancelled.is_cancelled());
}
