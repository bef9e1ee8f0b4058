use chrono::NaiveDateTime;

/// Whole seconds between `start` and `finish`, or `None` when either is
/// missing or the finish precedes the start.
pub fn elapsed_seconds(
    start: Option<NaiveDateTime>,
    finish: Option<NaiveDateTime>,
) -> Option<i64> {
    match (start, finish) {
        (Some(start), Some(finish)) if finish >= start => Some((finish - start).num_seconds()),
        _ => None,
    }
}

/// Renders seconds as `mm:ss`. Minutes are not wrapped at the hour.
pub fn format_elapsed(total_seconds: i64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Final race time as `mm:ss`, shared by racer records and the time override.
pub fn elapsed(start: Option<NaiveDateTime>, finish: Option<NaiveDateTime>) -> Option<String> {
    elapsed_seconds(start, finish).map(format_elapsed)
}
