use chrono::{
    format::{self, Parsed, StrftimeItems},
    NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone,
};
use thiserror::Error;

pub(crate) const PERIOD_FORMAT: &str = "%Y-%m";

#[derive(Error, Debug)]
pub(crate) enum PeriodError {
    #[error("expected a four digit year, a hyphen and a one or two digit month")]
    Shape,
    #[error(transparent)]
    Invalid(#[from] chrono::ParseError),
}

/// Parses a `YYYY-MM` value into midnight of the first day of that month.
pub(crate) fn parse_period(value: &str) -> Result<NaiveDateTime, PeriodError> {
    // chrono's %Y also takes signs, padding and any width
    let (year, month) = value.split_once('-').ok_or(PeriodError::Shape)?;
    if year.len() != 4
        || !year.bytes().all(|b| b.is_ascii_digit())
        || !(1..=2).contains(&month.len())
        || !month.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(PeriodError::Shape);
    }

    let mut parsed = Parsed::default();
    format::parse(&mut parsed, value, StrftimeItems::new(PERIOD_FORMAT))?;
    parsed.set_day(1)?;

    Ok(parsed.to_naive_date()?.and_time(NaiveTime::MIN))
}

/// Interprets a wall-clock time in `tz` and returns its epoch seconds.
///
/// Ambiguous times pick the earliest instant. A time skipped by a transition
/// is read with the offset in force before it, which lands on the transition.
pub(crate) fn to_epoch_seconds<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<i64> {
    if let Some(datetime) = tz.from_local_datetime(naive).earliest() {
        return Some(datetime.timestamp());
    }

    let day_before = naive.checked_sub_signed(TimeDelta::days(1))?;
    let offset = tz
        .from_local_datetime(&day_before)
        .earliest()?
        .offset()
        .fix()
        .local_minus_utc();

    Some(naive.and_utc().timestamp() - i64::from(offset))
}
