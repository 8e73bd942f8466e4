// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time tick generation and formatting.
//!
//! Time is a numeric value in **seconds** since the unix epoch. Tick steps run from seconds up
//! to years; labels switch from clock time to calendar dates once the step reaches a day.

const DAY: f64 = 86_400.0;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Returns "nice" tick values inside `[min, max]`, roughly `count` of them.
pub fn nice_time_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }

    let step = nice_time_step((max - min) / count as f64);
    if step == 0.0 {
        return vec![min, max];
    }

    let start = (min / step).ceil() * step;
    let n_f = ((max - start) / step).floor();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };

    (0..=n).map(|i| start + step * i as f64).collect()
}

/// The smallest candidate step at least as large as `step`.
pub fn nice_time_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }

    const STEPS: &[f64] = &[
        1.0,
        5.0,
        15.0,
        30.0,
        60.0,
        5.0 * 60.0,
        15.0 * 60.0,
        30.0 * 60.0,
        3600.0,
        3.0 * 3600.0,
        6.0 * 3600.0,
        12.0 * 3600.0,
        DAY,
        2.0 * DAY,
        7.0 * DAY,
        14.0 * DAY,
        30.0 * DAY,
        91.0 * DAY,
        365.0 * DAY,
    ];

    for &s in STEPS {
        if s >= step {
            return s;
        }
    }
    let years = (step / (365.0 * DAY)).ceil();
    years.max(1.0) * 365.0 * DAY
}

/// Formats a tick value (seconds) given the tick step (seconds).
///
/// Steps of a day or more format as `Jan 05`; shorter steps as clock time `14:05`.
pub fn format_time(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return String::new();
    }
    let secs = {
        let secs_f = v.floor().clamp(-1e15, 1e15);
        #[allow(clippy::cast_possible_truncation, reason = "clamped well inside i64")]
        {
            secs_f as i64
        }
    };
    let days = secs.div_euclid(86_400);
    let of_day = secs.rem_euclid(86_400);

    if step.abs() >= 365.0 * DAY {
        let (year, _, _) = civil_from_days(days);
        format!("{year}")
    } else if step.abs() >= DAY {
        let (_, month, day) = civil_from_days(days);
        let name = usize::try_from(month - 1)
            .ok()
            .and_then(|m| MONTHS.get(m))
            .copied()
            .unwrap_or("");
        format!("{name} {day:02}")
    } else {
        let h = of_day / 3600;
        let m = (of_day / 60) % 60;
        let s = of_day % 60;
        if step.abs() >= 60.0 {
            format!("{h:02}:{m:02}")
        } else {
            format!("{h:02}:{m:02}:{s:02}")
        }
    }
}

/// Converts days since 1970-01-01 to `(year, month, day)`.
pub(crate) fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_choose_day_steps_for_month_spans() {
        let ticks = nice_time_ticks(0.0, 30.0 * DAY, 5);
        assert!(ticks.len() >= 2);
        let step = ticks[1] - ticks[0];
        assert_eq!(step, 7.0 * DAY);
        assert!(ticks.iter().all(|t| (0.0..=30.0 * DAY).contains(t)));
    }

    #[test]
    fn formats_dates_and_clock_time() {
        assert_eq!(format_time(0.0, DAY), "Jan 01");
        assert_eq!(format_time(DAY * 59.0, DAY), "Mar 01");
        assert_eq!(format_time(3723.0, 60.0), "01:02");
        assert_eq!(format_time(3723.0, 1.0), "01:02:03");
        assert_eq!(format_time(DAY * 365.0, 365.0 * DAY), "1971");
    }

    #[test]
    fn civil_round_trip() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(11_017), (2000, 3, 1));
        assert_eq!(
            crate::data::days_from_civil(2018, 12, 31),
            crate::data::days_from_civil(2019, 1, 1) - 1
        );
    }
}
