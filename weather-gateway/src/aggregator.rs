//! Turns 3-hour forecast samples into daily summaries and a 24-hour slice.

use crate::units::{probability_percent, round_half_up};
use chrono::{DateTime, NaiveDate, TimeZone};
use common::models::{ForecastBundle, ForecastDay, HourlyForecast};

/// Maximum number of daily summaries returned.
pub const MAX_DAYS: usize = 5;

/// Number of raw samples projected into the hourly slice (~24 hours).
pub const HOURLY_SAMPLES: usize = 8;

/// One 3-hour data point as delivered by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    /// Epoch seconds
    pub dt: i64,
    pub temp: f64,
    pub condition: String,
    pub icon: String,
    /// Probability of precipitation, 0.0-1.0
    pub pop: f64,
}

struct DayGroup<'a> {
    date: NaiveDate,
    first: &'a ForecastSample,
    max_temp: f64,
    min_temp: f64,
    max_pop: f64,
}

fn local_time<Tz: TimeZone>(sample: &ForecastSample, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.timestamp_opt(sample.dt, 0).single()
}

/// Builds the full bundle. Calendar dates and labels are computed in `tz`.
pub fn aggregate<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> ForecastBundle {
    ForecastBundle {
        forecast: daily_summaries(samples, tz),
        hourly: hourly_slice(samples, tz),
    }
}

/// Groups samples by local calendar date in first-seen order and keeps the
/// first [`MAX_DAYS`] groups. Partial days are kept as they are.
///
/// Condition and icon come from the first sample of each day, not from a
/// majority vote.
pub fn daily_summaries<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<ForecastDay> {
    let mut groups: Vec<DayGroup<'_>> = Vec::new();

    for sample in samples {
        let Some(local) = local_time(sample, tz) else {
            continue;
        };
        let date = local.date_naive();

        match groups.iter_mut().find(|g| g.date == date) {
            Some(group) => {
                group.max_temp = group.max_temp.max(sample.temp);
                group.min_temp = group.min_temp.min(sample.temp);
                group.max_pop = group.max_pop.max(sample.pop);
            }
            None => groups.push(DayGroup {
                date,
                first: sample,
                max_temp: sample.temp,
                min_temp: sample.temp,
                max_pop: sample.pop,
            }),
        }
    }

    groups
        .into_iter()
        .take(MAX_DAYS)
        .map(|group| ForecastDay {
            date: date_label(group.date),
            max_temp: round_half_up(group.max_temp),
            min_temp: round_half_up(group.min_temp),
            condition: group.first.condition.clone(),
            icon: group.first.icon.clone(),
            precip_chance: probability_percent(group.max_pop),
        })
        .collect()
}

/// Projects the first [`HOURLY_SAMPLES`] samples one-to-one.
pub fn hourly_slice<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<HourlyForecast> {
    samples
        .iter()
        .take(HOURLY_SAMPLES)
        .map(|sample| HourlyForecast {
            time: local_time(sample, tz)
                .map(|t| hour_label(&t))
                .unwrap_or_default(),
            temp: round_half_up(sample.temp),
            condition: sample.condition.clone(),
            icon: sample.icon.clone(),
            precip_chance: probability_percent(sample.pop),
        })
        .collect()
}

/// `M/D/YYYY`, e.g. `1/15/2024`
fn date_label(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// 12-hour clock hour, e.g. `3 PM`
fn hour_label<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    time.naive_local().format("%-I %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    // 2024-01-15 00:00:00 UTC, a Monday
    const MONDAY: i64 = 1_705_276_800;
    const HOUR: i64 = 3_600;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).expect("valid offset")
    }

    fn sample(dt: i64, temp: f64, pop: f64, condition: &str, icon: &str) -> ForecastSample {
        ForecastSample {
            dt,
            temp,
            condition: condition.to_string(),
            icon: icon.to_string(),
            pop,
        }
    }

    fn series(start: i64, count: usize) -> Vec<ForecastSample> {
        (0..count)
            .map(|i| sample(start + i as i64 * 3 * HOUR, i as f64, 0.0, "Clouds", "04d"))
            .collect()
    }

    #[test]
    fn test_single_day_min_max_precip_and_first_condition() {
        let samples = vec![
            sample(MONDAY, 10.0, 0.1, "Clear", "01n"),
            sample(MONDAY + 3 * HOUR, 15.0, 0.3, "Clouds", "03d"),
            sample(MONDAY + 6 * HOUR, 12.0, 0.0, "Rain", "10d"),
            sample(MONDAY + 9 * HOUR, 18.0, 0.5, "Rain", "10d"),
        ];

        let days = daily_summaries(&samples, &utc());

        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.date, "1/15/2024");
        assert_eq!(day.max_temp, 18);
        assert_eq!(day.min_temp, 10);
        assert_eq!(day.precip_chance, 50);
        assert_eq!(day.condition, "Clear");
        assert_eq!(day.icon, "01n");
    }

    #[test]
    fn test_rounding_of_extremes() {
        let samples = vec![
            sample(MONDAY, -2.5, 0.0, "Snow", "13d"),
            sample(MONDAY + 3 * HOUR, 7.5, 0.294, "Snow", "13d"),
        ];

        let days = daily_summaries(&samples, &utc());
        assert_eq!(days[0].min_temp, -2);
        assert_eq!(days[0].max_temp, 8);
        assert_eq!(days[0].precip_chance, 29);
    }

    #[test]
    fn test_forty_samples_truncate_to_five_days() {
        // Starting at 09:00 the 120-hour window touches six calendar dates
        let samples = series(MONDAY + 9 * HOUR, 40);

        let days = daily_summaries(&samples, &utc());

        assert_eq!(days.len(), MAX_DAYS);
        let labels: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(labels, ["1/15/2024", "1/16/2024", "1/17/2024", "1/18/2024", "1/19/2024"]);
        // First day is partial: 09:00..21:00 holds samples 0..=4
        assert_eq!(days[0].min_temp, 0);
        assert_eq!(days[0].max_temp, 4);
    }

    #[test]
    fn test_fewer_dates_than_five() {
        let samples = series(MONDAY, 12);
        let days = daily_summaries(&samples, &utc());
        assert_eq!(days.len(), 2);
    }

    #[test]
    fn test_grouping_uses_given_timezone() {
        let samples = vec![
            sample(MONDAY + 12 * HOUR, 5.0, 0.0, "Clear", "01d"),
            sample(MONDAY + 15 * HOUR, 6.0, 0.0, "Clear", "01n"),
        ];
        let tokyo = FixedOffset::east_opt(9 * 3600).expect("valid offset");

        assert_eq!(daily_summaries(&samples, &utc()).len(), 1);

        let days = daily_summaries(&samples, &tokyo);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "1/15/2024");
        assert_eq!(days[1].date, "1/16/2024");
    }

    #[test]
    fn test_hourly_slice_takes_first_eight_in_order() {
        let samples = series(MONDAY, 10);

        let hourly = hourly_slice(&samples, &utc());

        assert_eq!(hourly.len(), HOURLY_SAMPLES);
        let temps: Vec<_> = hourly.iter().map(|h| h.temp).collect();
        assert_eq!(temps, [0, 1, 2, 3, 4, 5, 6, 7]);
        let labels: Vec<_> = hourly.iter().map(|h| h.time.as_str()).collect();
        assert_eq!(
            labels,
            ["12 AM", "3 AM", "6 AM", "9 AM", "12 PM", "3 PM", "6 PM", "9 PM"]
        );
    }

    #[test]
    fn test_hourly_slice_is_a_projection() {
        let samples = vec![
            sample(MONDAY, 4.4, 0.12, "Drizzle", "09d"),
            sample(MONDAY + 3 * HOUR, 4.6, 0.87, "Rain", "10d"),
        ];

        let hourly = hourly_slice(&samples, &utc());

        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly[0].temp, 4);
        assert_eq!(hourly[0].precip_chance, 12);
        assert_eq!(hourly[0].condition, "Drizzle");
        assert_eq!(hourly[1].temp, 5);
        assert_eq!(hourly[1].precip_chance, 87);
        assert_eq!(hourly[1].icon, "10d");
    }

    #[test]
    fn test_empty_input() {
        let bundle = aggregate(&[], &utc());
        assert!(bundle.forecast.is_empty());
        assert!(bundle.hourly.is_empty());
    }
}
