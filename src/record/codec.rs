//! Fixed-size binary codec for [`GameRecord`].
//!
//! Records serialize to exactly [`RECORD_SIZE`] bytes so heap pages can hold
//! a packed array of them and address any slot by multiplication. The date
//! string is converted to an integer on encode and rendered back as
//! `YYYY-MM-DD` on decode - the original formatting is not preserved.

use crate::common::{Error, Result};
use crate::record::GameRecord;

/// Serialized size of one record: 9 scalar fields × 4 bytes.
pub const RECORD_SIZE: usize = 36;

/// Field offsets within the 36-byte layout.
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     date as YYYYMMDD integer
/// 4       4     team_id
/// 8       4     points
/// 12      4     fg_pct (f32)
/// 16      4     ft_pct (f32, index key)
/// 20      4     fg3_pct (f32)
/// 24      4     assists
/// 28      4     rebounds
/// 32      4     wins
/// ```
const OFF_DATE: usize = 0;
const OFF_TEAM_ID: usize = 4;
const OFF_POINTS: usize = 8;
const OFF_FG_PCT: usize = 12;
const OFF_FT_PCT: usize = 16;
const OFF_FG3_PCT: usize = 20;
const OFF_ASSISTS: usize = 24;
const OFF_REBOUNDS: usize = 28;
const OFF_WINS: usize = 32;

#[inline]
fn put_i32(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

#[inline]
fn put_f32(buf: &mut [u8], offset: usize, value: f32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

#[inline]
fn get_i32(buf: &[u8], offset: usize) -> i32 {
    i32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

#[inline]
fn get_f32(buf: &[u8], offset: usize) -> f32 {
    f32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// Serialize a record into the first [`RECORD_SIZE`] bytes of `buf`.
///
/// # Errors
/// Fails only when the record's date string is unparseable.
///
/// # Panics
/// Panics if `buf.len() < RECORD_SIZE`.
pub fn encode(record: &GameRecord, buf: &mut [u8]) -> Result<()> {
    assert!(buf.len() >= RECORD_SIZE, "buffer too small for record");

    put_i32(buf, OFF_DATE, parse_date_to_int(&record.game_date)?);
    put_i32(buf, OFF_TEAM_ID, record.team_id);
    put_i32(buf, OFF_POINTS, record.points);
    put_f32(buf, OFF_FG_PCT, record.fg_pct);
    put_f32(buf, OFF_FT_PCT, record.ft_pct);
    put_f32(buf, OFF_FG3_PCT, record.fg3_pct);
    put_i32(buf, OFF_ASSISTS, record.assists);
    put_i32(buf, OFF_REBOUNDS, record.rebounds);
    put_i32(buf, OFF_WINS, record.wins);
    Ok(())
}

/// Deserialize a record from the first [`RECORD_SIZE`] bytes of `buf`.
///
/// The date is rendered as `YYYY-MM-DD` regardless of the formatting it was
/// originally encoded from.
///
/// # Panics
/// Panics if `buf.len() < RECORD_SIZE`.
pub fn decode(buf: &[u8]) -> GameRecord {
    assert!(buf.len() >= RECORD_SIZE, "buffer too small for record");

    GameRecord {
        game_date: format_date_int(get_i32(buf, OFF_DATE)),
        team_id: get_i32(buf, OFF_TEAM_ID),
        points: get_i32(buf, OFF_POINTS),
        fg_pct: get_f32(buf, OFF_FG_PCT),
        ft_pct: get_f32(buf, OFF_FT_PCT),
        fg3_pct: get_f32(buf, OFF_FG3_PCT),
        assists: get_i32(buf, OFF_ASSISTS),
        rebounds: get_i32(buf, OFF_REBOUNDS),
        wins: get_i32(buf, OFF_WINS),
    }
}

fn component(token: &str, original: &str) -> Result<i32> {
    token
        .trim()
        .parse::<i32>()
        .map_err(|_| Error::InvalidDate(original.to_string()))
}

/// Parse a date string into a `year*10000 + month*100 + day` integer.
///
/// Accepted shapes:
/// - slash-separated: `M/D/Y`, `D/M/Y`, or `Y/M/D`
/// - dash-separated: `Y-M-D`
/// - a digits-only fallback taking the first 8 digits as `YYYYMMDD`
///
/// Slash-separated dates are disambiguated heuristically: a first token
/// over 31 must be the year; otherwise a last token over 31 is the year and
/// day/month order is chosen by whichever remaining token exceeds 12; when
/// nothing disambiguates, month/day/year is assumed. The empty string maps
/// to 0.
///
/// # Errors
/// `Error::InvalidDate` when no accepted shape matches.
pub fn parse_date_to_int(s: &str) -> Result<i32> {
    if s.is_empty() {
        return Ok(0);
    }

    if let Some((first, rest)) = s.split_once('/') {
        let (second, third) = rest
            .split_once('/')
            .ok_or_else(|| Error::InvalidDate(s.to_string()))?;
        let a = component(first, s)?;
        let b = component(second, s)?;
        let c = component(third, s)?;

        let (year, month, day) = if a > 31 {
            // Y/M/D
            (a, b, c)
        } else if c > 31 {
            // M/D/Y or D/M/Y
            if a > 12 {
                (c, b, a)
            } else {
                (c, a, b)
            }
        } else {
            // fallback: assume M/D/Y
            (c, a, b)
        };
        return Ok(year * 10000 + month * 100 + day);
    }

    if let Some((first, rest)) = s.split_once('-') {
        // Y-M-D
        let (second, third) = rest
            .split_once('-')
            .ok_or_else(|| Error::InvalidDate(s.to_string()))?;
        let y = component(first, s)?;
        let m = component(second, s)?;
        let d = component(third, s)?;
        return Ok(y * 10000 + m * 100 + d);
    }

    // digits-only fallback (rare)
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 8 {
        let y = component(&digits[0..4], s)?;
        let m = component(&digits[4..6], s)?;
        let d = component(&digits[6..8], s)?;
        return Ok(y * 10000 + m * 100 + d);
    }

    Err(Error::InvalidDate(s.to_string()))
}

/// Render a `YYYYMMDD` integer as a zero-padded `YYYY-MM-DD` string.
pub fn format_date_int(date_int: i32) -> String {
    let s = format!("{:08}", date_int);
    format!("{}-{}-{}", &s[0..4], &s[4..6], &s[6..8])
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> GameRecord {
        GameRecord {
            game_date: "12/25/2003".to_string(),
            team_id: 1610612747,
            points: 98,
            fg_pct: 0.456,
            ft_pct: 0.789,
            fg3_pct: 0.333,
            assists: 22,
            rebounds: 44,
            wins: 1,
        }
    }

    // --- date parsing ---

    #[test]
    fn test_parse_month_day_year() {
        assert_eq!(parse_date_to_int("12/25/2003").unwrap(), 20031225);
        assert_eq!(parse_date_to_int("1/5/2003").unwrap(), 20030105);
    }

    #[test]
    fn test_parse_day_month_year() {
        // First token over 12 can only be a day
        assert_eq!(parse_date_to_int("25/12/2003").unwrap(), 20031225);
    }

    #[test]
    fn test_parse_year_first_slashes() {
        assert_eq!(parse_date_to_int("2003/12/25").unwrap(), 20031225);
    }

    #[test]
    fn test_parse_iso_dashes() {
        assert_eq!(parse_date_to_int("2003-12-25").unwrap(), 20031225);
        assert_eq!(parse_date_to_int("2003-1-5").unwrap(), 20030105);
    }

    #[test]
    fn test_parse_digits_only_fallback() {
        assert_eq!(parse_date_to_int("20031225").unwrap(), 20031225);
        // Non-digit noise is stripped before the fallback fires
        assert_eq!(parse_date_to_int("2003.12.25").unwrap(), 20031225);
    }

    #[test]
    fn test_parse_ambiguous_defaults_to_month_day_year() {
        // Every token fits in a month or day, so M/D/Y wins
        assert_eq!(parse_date_to_int("1/2/3").unwrap(), 30102);
    }

    #[test]
    fn test_parse_empty_is_zero() {
        assert_eq!(parse_date_to_int("").unwrap(), 0);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(matches!(
            parse_date_to_int("hello"),
            Err(Error::InvalidDate(_))
        ));
        assert!(parse_date_to_int("12/25").is_err());
        assert!(parse_date_to_int("12/x/2003").is_err());
    }

    #[test]
    fn test_format_date_int() {
        assert_eq!(format_date_int(20031225), "2003-12-25");
        assert_eq!(format_date_int(20030105), "2003-01-05");
        assert_eq!(format_date_int(0), "0000-00-00");
    }

    // --- codec ---

    #[test]
    fn test_encode_exact_layout() {
        let mut buf = [0u8; RECORD_SIZE];
        encode(&sample(), &mut buf).unwrap();

        assert_eq!(get_i32(&buf, 0), 20031225);
        assert_eq!(get_i32(&buf, 4), 1610612747);
        assert_eq!(get_i32(&buf, 8), 98);
        assert_eq!(get_f32(&buf, 16), 0.789); // key field
        assert_eq!(get_i32(&buf, 32), 1);
    }

    #[test]
    fn test_roundtrip_renormalizes_date() {
        let mut buf = [0u8; RECORD_SIZE];
        let original = sample();
        encode(&original, &mut buf).unwrap();
        let decoded = decode(&buf);

        // Every field survives except the date string, which is rendered
        // in ISO form.
        assert_eq!(decoded.game_date, "2003-12-25");
        assert_eq!(decoded.team_id, original.team_id);
        assert_eq!(decoded.points, original.points);
        assert_eq!(decoded.fg_pct, original.fg_pct);
        assert_eq!(decoded.ft_pct, original.ft_pct);
        assert_eq!(decoded.fg3_pct, original.fg3_pct);
        assert_eq!(decoded.assists, original.assists);
        assert_eq!(decoded.rebounds, original.rebounds);
        assert_eq!(decoded.wins, original.wins);
    }

    #[test]
    fn test_encode_bad_date_fails() {
        let mut rec = sample();
        rec.game_date = "not-a-date".to_string();
        let mut buf = [0u8; RECORD_SIZE];
        assert!(encode(&rec, &mut buf).is_err());
    }

    #[test]
    #[should_panic(expected = "buffer too small")]
    fn test_encode_short_buffer_panics() {
        let mut buf = [0u8; RECORD_SIZE - 1];
        let _ = encode(&sample(), &mut buf);
    }

    proptest! {
        #[test]
        fn test_roundtrip_property(
            year in 1900i32..=2099,
            month in 1i32..=12,
            day in 1i32..=28,
            team_id in any::<i32>(),
            points in 0i32..=200,
            fg_pct in 0.0f32..=1.0,
            ft_pct in 0.0f32..=1.0,
            fg3_pct in 0.0f32..=1.0,
            assists in 0i32..=100,
            rebounds in 0i32..=100,
            wins in 0i32..=1,
        ) {
            let record = GameRecord {
                game_date: format!("{}-{:02}-{:02}", year, month, day),
                team_id,
                points,
                fg_pct,
                ft_pct,
                fg3_pct,
                assists,
                rebounds,
                wins,
            };

            let mut buf = [0u8; RECORD_SIZE];
            encode(&record, &mut buf).unwrap();
            let decoded = decode(&buf);

            // Already-ISO dates round-trip exactly; everything else too.
            prop_assert_eq!(decoded, record);
        }
    }
}
