use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

// Twinfield writes dates as YYYYMMDD without separators
const COMPACT_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year][month][day]");

pub fn parse_date(date_str: &str) -> Result<Date, String> {
    Date::parse(date_str.trim(), COMPACT_DATE)
        .map_err(|e| format!("Failed to parse date '{date_str}': {e}"))
}

pub fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(COMPACT_DATE)
}
