use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScintillaError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ScintillaError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        ScintillaError::render("x")
            .to_string()
            .contains("render error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScintillaError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
