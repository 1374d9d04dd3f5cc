use chrono::Weekday;

/// Sunday-first order used for every weekday comparison.
pub const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "sunday",
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
    }
}

/// Position of `day` in a Sunday-first week.
pub fn ordinal(day: Weekday) -> u32 {
    day.num_days_from_sunday()
}

/// Reads a weekday out of a checklist item name.
///
/// Two-letter prefixes win ("mo", "Tue", "thurs"), then a full weekday name
/// anywhere in the text ("lunch on tuesday").
pub fn parse_weekday(input: &str) -> Option<Weekday> {
    if input.chars().count() < 2 {
        return None;
    }

    let lowered = input.to_lowercase();
    let prefix: String = lowered.chars().take(2).collect();

    WEEK.into_iter()
        .find(|day| weekday_name(*day).starts_with(&prefix))
        .or_else(|| {
            WEEK.into_iter()
                .find(|day| lowered.contains(weekday_name(*day)))
        })
}
