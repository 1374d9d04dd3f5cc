use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday,
};

/// Timezone and day/night boundaries every date decision is made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub offset: FixedOffset,
    /// Local time before which the clock still counts as the previous day.
    pub day_start: NaiveTime,
    /// Local time from which divided cards are resolved as their night half.
    pub night_start: NaiveTime,
}

impl Schedule {
    pub fn new(offset: FixedOffset, day_start: NaiveTime, night_start: NaiveTime) -> Self {
        Self {
            offset,
            day_start,
            night_start,
        }
    }

    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    fn day_start_offset(&self) -> Duration {
        self.day_start - NaiveTime::MIN
    }

    /// `now` moved back by the day-start boundary, so 01:00 on the 16th with a
    /// 03:00 day start reads as 22:00 on the 15th.
    pub fn reference_instant(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        self.local(now) - self.day_start_offset()
    }

    pub fn logical_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.reference_instant(instant).date_naive()
    }

    pub fn reference_weekday(&self, now: DateTime<Utc>) -> Weekday {
        self.logical_date(now).weekday()
    }

    /// Whole logical days from `now` to `instant`; negative for the past.
    pub fn days_between(&self, now: DateTime<Utc>, instant: DateTime<Utc>) -> i64 {
        (self.logical_date(instant) - self.logical_date(now)).num_days()
    }

    pub fn today_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.at_local(self.logical_date(now), self.day_start)
    }

    pub fn tomorrow_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.today_start(now) + Duration::days(1)
    }

    pub fn is_night(&self, now: DateTime<Utc>) -> bool {
        let time = self.local(now).time();
        time >= self.night_start || time < self.day_start
    }

    /// `date` at `time` in the configured offset.
    pub fn at_local(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let naive = date.and_time(time);
        (naive - Duration::seconds(self.offset.local_minus_utc() as i64)).and_utc()
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            offset: FixedOffset::west_opt(7 * 3600).expect("UTC-7 is a valid offset"),
            day_start: NaiveTime::from_hms_opt(3, 0, 0).expect("03:00 is a valid time"),
            night_start: NaiveTime::from_hms_opt(19, 0, 0).expect("19:00 is a valid time"),
        }
    }
}
