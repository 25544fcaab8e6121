use super::*;

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

#[test]
fn relative_phrase_picks_largest_whole_unit() {
    let cases: &[(i64, &str)] = &[
        (0, "now"),
        (1, "1 second ago"),
        (59, "59 seconds ago"),
        (60, "1 minute ago"),
        (3 * HOUR + 5, "3 hours ago"),
        (3 * DAY, "3 days ago"),
        (45 * DAY, "1 month ago"),
        (800 * DAY, "2 years ago"),
        (-1, "in 1 second"),
        (-2 * DAY, "in 2 days"),
    ];

    for (delta, expected) in cases {
        assert_eq!(relative_phrase(*delta), *expected, "delta {delta}");
    }
}

#[test]
fn formats_with_pattern_and_relative_suffix() {
    let instant = at(1_700_000_000);
    let now = at(1_700_000_000 + 3 * DAY);

    assert_eq!(
        format_date(&instant, now, Some("%Y-%m-%d %H:%M"), true),
        "2023-11-14 22:13 (3 days ago)"
    );
    assert_eq!(
        format_date(&instant, now, Some("%Y-%m-%d"), false),
        "2023-11-14"
    );
}

#[test]
fn default_pattern_when_none_or_invalid() {
    let instant = at(1_700_000_000);
    let expected = instant.format(DEFAULT_DATE_FORMAT).to_string();

    assert_eq!(format_date(&instant, instant, None, false), expected);
    assert_eq!(format_date(&instant, instant, Some("%Q broken"), false), expected);
    assert_eq!(
        format_date(&instant, instant, None, true),
        format!("{expected} (now)")
    );
}
