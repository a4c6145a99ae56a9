use super::*;

#[test]
fn two_word_script_shows_fixed_duration() {
    let s = ScriptSummary::from_script("Hello world", 14_000);
    assert_eq!(s.word_count, 2);
    assert_eq!(s.duration_label(), "0:14");
    assert_eq!(s.scene_count, 1);
    assert_eq!(s.recommendation, Recommendation::Slow);
    assert!(s.recommendation_text().starts_with("2 words (0.1 words/sec)"));
}

#[test]
fn empty_script_shows_default_hint() {
    let s = ScriptSummary::from_script("   ", 14_000);
    assert_eq!(s.word_count, 0);
    assert_eq!(s.duration_label(), "0:14");
    assert_eq!(s.recommendation, Recommendation::Empty);
    assert!(s.recommendation_text().starts_with("14 second video"));
}

#[test]
fn recommendation_tiers_follow_word_count() {
    assert_eq!(Recommendation::for_word_count(49), Recommendation::Slow);
    assert_eq!(Recommendation::for_word_count(50), Recommendation::Medium);
    assert_eq!(Recommendation::for_word_count(100), Recommendation::Medium);
    assert_eq!(Recommendation::for_word_count(101), Recommendation::Fast);
    assert_eq!(Recommendation::for_word_count(150), Recommendation::Fast);
    assert_eq!(Recommendation::for_word_count(151), Recommendation::VeryFast);
    assert!(Recommendation::Fast.is_warning());
    assert!(!Recommendation::Medium.is_warning());
}

#[test]
fn words_split_on_any_whitespace() {
    assert_eq!(count_words("one\ntwo\t three    four"), 4);
    assert_eq!(count_words(""), 0);
}

#[test]
fn duration_formats() {
    assert_eq!(format_duration(14_000), "0:14");
    assert_eq!(format_duration(75_400), "1:15");
    assert_eq!(format_duration(75_600), "1:16");
    assert_eq!(format_clock(0), "00:00");
    assert_eq!(format_clock(7_999), "00:07");
    assert_eq!(format_clock(14_000), "00:14");
    assert_eq!(format_clock(125_000), "02:05");
}
