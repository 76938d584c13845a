//! Solar geometry after the NOAA solar calculator.
//!
//! Timestamps are local standard clock time at the site. Longitude is
//! positive east and the timezone is the offset from UTC in hours (negative
//! west of Greenwich).

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::units::MINUTES_PER_DAY;

/// Julian day of the J2000.0 epoch.
pub const J2000: f64 = 2_451_545.0;
/// Latitudes are clamped to ±this value before trigonometric division.
pub const MAX_LATITUDE: f64 = 89.8;

const DAYS_PER_CENTURY: f64 = 36_525.0;
/// Zenith angle of the sun's upper limb at sunrise, including refraction [deg].
const SUNRISE_ZENITH: f64 = 90.833;

/// Where the sun is observed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    /// Degrees, positive north.
    pub latitude: f64,
    /// Degrees, positive east.
    pub longitude: f64,
    /// Hours from UTC, negative west.
    pub timezone: f64,
    /// Clock is one hour ahead of standard time.
    pub daylight_savings: bool,
}

impl SiteLocation {
    pub fn new(latitude: f64, longitude: f64, timezone: f64, daylight_savings: bool) -> Self {
        Self {
            latitude,
            longitude,
            timezone,
            daylight_savings,
        }
    }

    fn clamped_latitude(&self) -> f64 {
        self.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Total clock offset from UTC in hours, including daylight savings.
    fn utc_offset_hours(&self) -> f64 {
        self.timezone + if self.daylight_savings { 1.0 } else { 0.0 }
    }
}

/// Solar position for one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Degrees clockwise from north, in [0, 360).
    pub azimuth: f64,
    /// Degrees above the horizon, corrected for refraction.
    pub elevation: f64,
    /// `90 - elevation` [deg].
    pub zenith: f64,
    /// Earth-Sun distance [AU].
    pub earth_sun_distance: f64,
}

impl SolarPosition {
    /// Calculates the solar position at a site for a local clock time.
    pub fn calculate(site: &SiteLocation, local_time: NaiveDateTime) -> Self {
        let lat = site.clamped_latitude();
        let offset_hours = site.utc_offset_hours();
        let utc = local_time - Duration::seconds((offset_hours * 3600.0).round() as i64);

        let jd = julian_day(utc.date()) + seconds_of_day(utc) / 86_400.0;
        let orbit = SunOrbit::at(julian_century(jd));

        let local_minutes = seconds_of_day(local_time) / 60.0;
        let time_offset = orbit.equation_of_time + 4.0 * site.longitude - 60.0 * offset_hours;
        let true_solar_time = (local_minutes + time_offset).rem_euclid(MINUTES_PER_DAY);
        let hour_angle = true_solar_time / 4.0 - 180.0;

        let lat_rad = lat.to_radians();
        let decl_rad = orbit.declination.to_radians();
        let cos_zenith = (lat_rad.sin() * decl_rad.sin()
            + lat_rad.cos() * decl_rad.cos() * hour_angle.to_radians().cos())
        .clamp(-1.0, 1.0);
        let geometric_zenith = cos_zenith.acos().to_degrees();

        let elevation = 90.0 - geometric_zenith + refraction_correction(90.0 - geometric_zenith);

        let denom = lat_rad.cos() * geometric_zenith.to_radians().sin();
        let azimuth = if denom.abs() > 1e-9 {
            let cos_az = ((lat_rad.sin() * geometric_zenith.to_radians().cos()) - decl_rad.sin())
                / denom;
            let mut az = 180.0 - cos_az.clamp(-1.0, 1.0).acos().to_degrees();
            if hour_angle > 0.0 {
                az = -az;
            }
            if az < 0.0 {
                az += 360.0;
            }
            az
        } else if lat > 0.0 {
            180.0
        } else {
            0.0
        };

        Self {
            azimuth: azimuth.rem_euclid(360.0),
            elevation,
            zenith: 90.0 - elevation,
            earth_sun_distance: orbit.radius_vector,
        }
    }

    /// Returns true if the sun is above the horizon.
    pub fn is_above_horizon(&self) -> bool {
        self.elevation > 0.0
    }
}

/// Sunrise, sunset and solar noon for one local day.
///
/// All three are fractions of the local day (0.5 = noon clock time).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunTimes {
    pub sunrise: f64,
    pub sunset: f64,
    pub solar_noon: f64,
}

impl SunTimes {
    /// Computes the sun times with one refinement pass for sunrise and sunset.
    ///
    /// Only meaningful away from the poles; polar day or night collapses the
    /// hour angle to 0° or 180°.
    pub fn calculate(site: &SiteLocation, date: NaiveDate) -> Self {
        let lat = site.clamped_latitude();
        let jd = julian_day(date);
        let offset_minutes = 60.0 * site.utc_offset_hours();

        let event_utc = |sign: f64| {
            let first = SunOrbit::at(julian_century(jd));
            let ha = sunrise_hour_angle(lat, first.declination);
            let estimate = 720.0 - 4.0 * (site.longitude + sign * ha) - first.equation_of_time;

            let refined = SunOrbit::at(julian_century(jd + estimate / MINUTES_PER_DAY));
            let ha = sunrise_hour_angle(lat, refined.declination);
            720.0 - 4.0 * (site.longitude + sign * ha) - refined.equation_of_time
        };

        let sunrise_utc = event_utc(1.0);
        let sunset_utc = event_utc(-1.0);
        let noon_utc =
            720.0 - 4.0 * site.longitude - SunOrbit::at(julian_century(jd)).equation_of_time;

        Self {
            sunrise: (sunrise_utc + offset_minutes) / MINUTES_PER_DAY,
            sunset: (sunset_utc + offset_minutes) / MINUTES_PER_DAY,
            solar_noon: (noon_utc + offset_minutes) / MINUTES_PER_DAY,
        }
    }

    /// Hours between sunrise and sunset.
    pub fn photoperiod_hours(&self) -> f64 {
        (self.sunset - self.sunrise) * 24.0
    }
}

/// Julian day at 0h UT of a calendar date (Meeus).
pub fn julian_day(date: NaiveDate) -> f64 {
    let (mut year, mut month) = (date.year(), date.month() as i32);
    if month <= 2 {
        year -= 1;
        month += 12;
    }
    let a = year.div_euclid(100);
    let b = 2 - a + a.div_euclid(4);
    (365.25 * f64::from(year + 4716)).floor()
        + (30.6001 * f64::from(month + 1)).floor()
        + f64::from(date.day())
        + f64::from(b)
        - 1524.5
}

/// Julian centuries since J2000.0.
pub fn julian_century(jd: f64) -> f64 {
    (jd - J2000) / DAYS_PER_CENTURY
}

fn seconds_of_day(t: NaiveDateTime) -> f64 {
    f64::from(t.num_seconds_from_midnight()) + f64::from(t.nanosecond()) * 1e-9
}

/// Orbital quantities that drive the solar geometry.
#[derive(Debug, Clone, Copy)]
struct SunOrbit {
    /// Degrees.
    declination: f64,
    /// Minutes.
    equation_of_time: f64,
    /// AU.
    radius_vector: f64,
}

impl SunOrbit {
    fn at(t: f64) -> Self {
        let l0 = (280.46646 + t * (36000.76983 + 0.0003032 * t)).rem_euclid(360.0);
        let m = 357.52911 + t * (35999.05029 - 0.0001537 * t);
        let e = 0.016708634 - t * (0.000042037 + 0.0000001267 * t);

        let m_rad = m.to_radians();
        let center = m_rad.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
            + (2.0 * m_rad).sin() * (0.019993 - 0.000101 * t)
            + (3.0 * m_rad).sin() * 0.000289;
        let true_longitude = l0 + center;

        let omega = (125.04 - 1934.136 * t).to_radians();
        let apparent_longitude = true_longitude - 0.00569 - 0.00478 * omega.sin();

        let seconds = 21.448 - t * (46.815 + t * (0.00059 - t * 0.001813));
        let mean_obliquity = 23.0 + (26.0 + seconds / 60.0) / 60.0;
        let obliquity = mean_obliquity + 0.00256 * omega.cos();

        let declination = (obliquity.to_radians().sin() * apparent_longitude.to_radians().sin())
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees();

        let y = (obliquity.to_radians() / 2.0).tan().powi(2);
        let l0_rad = l0.to_radians();
        let eot = y * (2.0 * l0_rad).sin() - 2.0 * e * m_rad.sin()
            + 4.0 * e * y * m_rad.sin() * (2.0 * l0_rad).cos()
            - 0.5 * y * y * (4.0 * l0_rad).sin()
            - 1.25 * e * e * (2.0 * m_rad).sin();

        let true_anomaly = m + center;
        let radius_vector =
            1.000001018 * (1.0 - e * e) / (1.0 + e * true_anomaly.to_radians().cos());

        Self {
            declination,
            equation_of_time: eot.to_degrees() * 4.0,
            radius_vector,
        }
    }
}

/// Atmospheric refraction [deg] to add to a geometric elevation [deg].
fn refraction_correction(elevation: f64) -> f64 {
    if elevation > 85.0 {
        return 0.0;
    }
    let te = elevation.to_radians().tan();
    let arcsec = if elevation > 5.0 {
        58.1 / te - 0.07 / te.powi(3) + 0.000086 / te.powi(5)
    } else if elevation > -0.575 {
        1735.0
            + elevation
                * (-518.2 + elevation * (103.4 + elevation * (-12.79 + elevation * 0.711)))
    } else {
        -20.772 / te
    };
    arcsec / 3600.0
}

/// Hour angle of sunrise [deg]; sunset uses the same magnitude.
fn sunrise_hour_angle(latitude: f64, declination: f64) -> f64 {
    let lat = latitude.to_radians();
    let decl = declination.to_radians();
    let cos_ha = SUNRISE_ZENITH.to_radians().cos() / (lat.cos() * decl.cos())
        - lat.tan() * decl.tan();
    cos_ha.clamp(-1.0, 1.0).acos().to_degrees()
}
