//! Pure value coercions between typed fields and their flat cell form.
//!
//! Every function here is total: garbage in yields a defined fallback
//! (`None`, `false`, or an enum fallback), never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Tag;

static STRICT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("strict date pattern to compile"));

static TAG_COLOR_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\|\s*(#[0-9a-fA-F]{3,8})\s*$").expect("tag color pattern to compile")
});

// A leading pictographic grapheme: one Extended_Pictographic scalar plus any
// joiners, variation selectors, combining marks, or further pictographs fused
// to it (so ZWJ sequences like 🏳️‍🌈 stay one icon).
static TAG_ICON_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\p{Extended_Pictographic}(?:\p{Extended_Pictographic}|\p{M}|\x{FE0F}|\x{200D}|\x{20E3})*)\s*(.*)$",
    )
    .expect("tag icon pattern to compile")
});

/// Lenient fallback shapes accepted for dates that are not strict
/// `YYYY-MM-DD`. Kept short on purpose; anything else is "no value".
const LENIENT_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y"];

const LENIENT_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// Parse a calendar date.
///
/// A strict `YYYY-MM-DD` string is taken as a local calendar date — never
/// routed through a zoned timestamp — so the same day comes back regardless
/// of the host's UTC offset.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if STRICT_DATE.is_match(trimmed) {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok();
    }
    if let Some(dt) = parse_datetime(trimmed) {
        return Some(dt.date_naive());
    }
    for fmt in LENIENT_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }
    None
}

pub fn format_datetime(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => String::new(),
    }
}

pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in LENIENT_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// `true` iff the trimmed, case-folded value is `"yes"`.
pub fn yes_no(value: Option<&str>) -> bool {
    value
        .map(|v| v.trim().eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

pub fn format_yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Clamp an imported value to an allowed enumeration.
///
/// Membership is exact; anything else — including garbled foreign input —
/// becomes `fallback`, so an out-of-domain value can never be stored.
pub fn validate_enum(value: &str, allowed: &[&str], fallback: &str) -> String {
    if allowed.contains(&value) {
        value.to_string()
    } else {
        fallback.to_string()
    }
}

/// Flatten tags to `icon name|color` entries joined by `"; "`. The color
/// suffix is only written for tags that carry an explicit color.
pub fn format_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| {
            let mut entry = String::new();
            if let Some(icon) = &tag.icon {
                entry.push_str(icon);
            }
            entry.push_str(&tag.name);
            if let Some(color) = &tag.color {
                entry.push('|');
                entry.push_str(color);
            }
            entry
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse a flat tag list.
///
/// Entries split on `;` or `,` — the two export formats historically
/// disagreed on the joiner, so both are accepted. A trailing `|#hex` suffix
/// becomes the color; a leading pictographic grapheme becomes the icon.
/// Whitespace-only entries are dropped.
pub fn parse_tags(value: &str) -> Vec<Tag> {
    value
        .split([';', ','])
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }

            let (body, color) = match TAG_COLOR_SUFFIX
                .captures(entry)
                .and_then(|caps| caps.get(0).zip(caps.get(1)))
            {
                Some((whole, color)) => (
                    entry[..whole.start()].trim(),
                    Some(color.as_str().to_string()),
                ),
                None => (entry, None),
            };
            if body.is_empty() {
                return None;
            }

            let (icon, name) = match TAG_ICON_PREFIX.captures(body) {
                Some(caps) => (Some(caps[1].to_string()), caps[2].trim().to_string()),
                None => (None, body.to_string()),
            };
            if name.is_empty() && icon.is_none() {
                return None;
            }

            Some(Tag { name, icon, color })
        })
        .collect()
}

/// Render minor currency units as a plain two-decimal string.
pub fn format_amount_minor(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a money string into minor units; `None` for blanks and garbage.
/// Currency symbols and thousands separators are tolerated.
pub fn parse_amount_minor(value: &str) -> Option<i64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '£' | '€' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let parsed: f64 = cleaned.parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    Some((parsed * 100.0).round() as i64)
}

/// Strip the CSV formula-injection guard from an imported value.
///
/// Export prefixes `=`/`+`/`-`/`@`/TAB/CR-leading fields with an apostrophe;
/// the prefix is presentation-only and must not survive into stored data.
pub fn unguard(value: &str) -> &str {
    if let Some(rest) = value.strip_prefix('\'') {
        if matches!(rest.chars().next(), Some('=' | '+' | '-' | '@' | '\t' | '\r')) {
            return rest;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, FixedOffset};

    #[test]
    fn strict_date_round_trips() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(parse_date(&format_date(Some(day))), Some(day));
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn strict_date_is_a_calendar_date_in_any_offset() {
        // The same calendar day must come back whether the host clock sits
        // far west or far east of UTC.
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for offset_hours in [-11, 13] {
            let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
            let zoned = day
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_local_timezone(offset)
                .unwrap();
            let rendered = format_date(Some(zoned.date_naive()));
            let parsed = parse_date(&rendered).unwrap();
            assert_eq!(
                (parsed.year(), parsed.month(), parsed.day()),
                (2024, 1, 1),
                "offset {offset_hours}h shifted the day"
            );
        }
    }

    #[test]
    fn lenient_dates_parse_and_garbage_does_not() {
        assert_eq!(
            parse_date("2024/03/05"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_date("Mar 5, 2024"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("   "), None);
    }

    #[test]
    fn datetime_round_trips_through_rfc3339() {
        let dt = Utc.with_ymd_and_hms(2024, 6, 1, 18, 30, 0).unwrap();
        assert_eq!(parse_datetime(&format_datetime(Some(dt))), Some(dt));
        assert_eq!(format_datetime(None), "");
        assert_eq!(parse_datetime("yesterday-ish"), None);
    }

    #[test]
    fn yes_no_accepts_only_yes() {
        assert!(yes_no(Some("yes")));
        assert!(yes_no(Some("  YES ")));
        assert!(!yes_no(Some("y")));
        assert!(!yes_no(Some("true")));
        assert!(!yes_no(Some("")));
        assert!(!yes_no(None));
    }

    #[test]
    fn validate_enum_membership_and_fallback() {
        assert_eq!(validate_enum("garbage", &["A", "B"], "A"), "A");
        assert_eq!(validate_enum("B", &["A", "B"], "A"), "B");
    }

    #[test]
    fn tags_round_trip_with_icon_and_color() {
        let parsed = parse_tags("🔥Hot|#ff0000; 💎VIP");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "Hot");
        assert_eq!(parsed[0].icon.as_deref(), Some("🔥"));
        assert_eq!(parsed[0].color.as_deref(), Some("#ff0000"));
        assert_eq!(parsed[1].name, "VIP");
        assert_eq!(parsed[1].icon.as_deref(), Some("💎"));
        assert_eq!(parsed[1].color, None);

        assert_eq!(parse_tags(&format_tags(&parsed)), parsed);
    }

    #[test]
    fn tags_accept_comma_joiner_and_drop_blanks() {
        let parsed = parse_tags("Regular, ; ,Late Payer|#aa0000");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "Regular");
        assert_eq!(parsed[1].name, "Late Payer");
        assert_eq!(parsed[1].color.as_deref(), Some("#aa0000"));
    }

    #[test]
    fn multi_scalar_emoji_stays_one_icon() {
        let parsed = parse_tags("🏳️‍🌈 Pride");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].icon.as_deref(), Some("🏳️‍🌈"));
        assert_eq!(parsed[0].name, "Pride");
    }

    #[test]
    fn plain_names_have_no_icon() {
        let parsed = parse_tags("Regular");
        assert_eq!(parsed[0].icon, None);
        assert_eq!(parsed[0].name, "Regular");
    }

    #[test]
    fn amounts_round_trip_in_minor_units() {
        assert_eq!(format_amount_minor(12050), "120.50");
        assert_eq!(format_amount_minor(-905), "-9.05");
        assert_eq!(parse_amount_minor("120.50"), Some(12050));
        assert_eq!(parse_amount_minor("£1,200"), Some(120000));
        assert_eq!(parse_amount_minor(""), None);
        assert_eq!(parse_amount_minor("free"), None);
    }

    #[test]
    fn unguard_strips_only_guarded_prefixes() {
        assert_eq!(unguard("'=1+1"), "=1+1");
        assert_eq!(unguard("'+44 700 900"), "+44 700 900");
        assert_eq!(unguard("'ordinary"), "'ordinary");
        assert_eq!(unguard("plain"), "plain");
    }
}
