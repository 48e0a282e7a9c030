//! Clock widget formatting: long localized date plus 24h time, and the
//! machine-readable ISO-8601 instant of the same moment.

use std::fmt::Display;

use chrono::{DateTime, Datelike, Local, Locale, SecondsFormat, TimeZone, Utc};

use tvdir_proto::config::ClockConfig;

/// Offset between the Gregorian and the Thai Buddhist era.
const BUDDHIST_ERA_OFFSET: i32 = 543;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClockReading {
    /// Human text, e.g. `วันศุกร์ที่ 16 ตุลาคม พ.ศ. 2569 14:05`.
    pub display: String,
    /// UTC instant with milliseconds, e.g. `2026-10-16T07:05:09.000Z`.
    pub iso: String,
}

#[derive(Debug, Clone)]
pub struct ClockFormat {
    locale: Locale,
    date_format: String,
    time_format: String,
    buddhist_era: bool,
}

impl ClockFormat {
    pub fn from_config(cfg: &ClockConfig) -> Self {
        let locale = Locale::try_from(cfg.locale.as_str()).unwrap_or_else(|_| {
            tracing::warn!("unknown clock locale {:?}, falling back to POSIX", cfg.locale);
            Locale::POSIX
        });
        Self {
            locale,
            date_format: cfg.date_format.clone(),
            time_format: cfg.time_format.clone(),
            buddhist_era: cfg.buddhist_era,
        }
    }

    pub fn read<Tz>(&self, now: &DateTime<Tz>) -> ClockReading
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let date = now.format_localized(&self.date_format, self.locale);
        let time = now.format_localized(&self.time_format, self.locale);
        let year = if self.buddhist_era {
            format!("พ.ศ. {}", now.year() + BUDDHIST_ERA_OFFSET)
        } else {
            now.year().to_string()
        };
        ClockReading {
            display: format!("{} {} {}", date, year, time),
            iso: now
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn now(&self) -> ClockReading {
        self.read(&Local::now())
    }
}
