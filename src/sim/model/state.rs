use chrono::NaiveDateTime;

use super::config::Configuration;

/// Water body state between two timesteps.
///
/// The integrator replaces the state each step instead of mutating it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    /// Timestamp of the last processed record, `None` before the first step.
    pub datetime: Option<NaiveDateTime>,
    /// °C
    pub water_temperature: f64,
    /// °C
    pub sediment_temperature: f64,
    /// Metres.
    pub water_depth: f64,
    pub effective_shade: f64,
}

impl SimulationState {
    pub fn initial(config: &Configuration) -> Self {
        Self {
            datetime: None,
            water_temperature: config.initial_water_temperature,
            sediment_temperature: config.initial_sediment_temperature,
            water_depth: config.water_depth,
            effective_shade: config.effective_shade,
        }
    }

    pub fn is_first_step(&self) -> bool {
        self.datetime.is_none()
    }

    /// Elapsed time to `next` in hours, zero before the first step.
    pub fn hours_until(&self, next: NaiveDateTime) -> f64 {
        match self.datetime {
            Some(prev) => (next - prev).num_milliseconds() as f64 / 3_600_000.0,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Duration;

    #[test]
    fn test_initial_state_from_config() {
        let cfg = Configuration {
            initial_water_temperature: 12.0,
            initial_sediment_temperature: 9.0,
            water_depth: 2.5,
            ..Configuration::default()
        };
        let s = SimulationState::initial(&cfg);
        assert!(s.is_first_step());
        assert_eq!(s.water_temperature, 12.0);
        assert_eq!(s.sediment_temperature, 9.0);
        assert_eq!(s.water_depth, 2.5);
    }

    #[test]
    fn test_hours_until() {
        let t = NaiveDateTime::parse_from_str("2024-01-01 06:00", "%Y-%m-%d %H:%M")
            .expect("valid timestamp");
        let mut s = SimulationState::initial(&Configuration::default());
        assert_eq!(s.hours_until(t), 0.0);
        s.datetime = Some(t);
        assert_eq!(s.hours_until(t + Duration::minutes(90)), 1.5);
        assert_eq!(s.hours_until(t), 0.0);
        assert!(s.hours_until(t - Duration::hours(1)) < 0.0);
    }

    #[test]
    fn test_hours_until_keeps_subsecond_gaps() {
        let t = NaiveDateTime::parse_from_str("2024-01-01 06:00", "%Y-%m-%d %H:%M")
            .expect("valid timestamp");
        let s = SimulationState {
            datetime: Some(t),
            ..SimulationState::initial(&Configuration::default())
        };
        let h = s.hours_until(t + Duration::milliseconds(500));
        assert!(h > 0.0, "got {h}");
        assert_relative_eq!(h, 0.5 / 3600.0, epsilon = 1e-15);
        assert!(s.hours_until(t - Duration::milliseconds(500)) < 0.0);
    }
}
