use chrono::{DateTime, Local, NaiveDate, SecondsFormat};

/// `YYYY_MM_DD.json`, the name of the log file for `date`.
pub fn day_file_name(date: NaiveDate) -> String {
    format!("{}.json", date.format("%Y_%m_%d"))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn to_timestamp(dt: &DateTime<Local>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, false)
}
