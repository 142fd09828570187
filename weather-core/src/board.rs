//! Latest-wins holder for the report currently on screen.
//!
//! Every fetch is tagged with a ticket before it starts. A result is only applied if its ticket
//! is still the newest one issued, so a slow response for an old location can never overwrite
//! the answer to a newer request. Failures leave the last good report in place.

use crate::{WeatherReport, error::AggregationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct ReportBoard {
    issued: u64,
    current: Option<WeatherReport>,
}

/// What happened to a result handed to [`ReportBoard::apply`].
#[derive(Debug)]
pub enum Applied<'a> {
    Updated(&'a WeatherReport),
    Failed {
        error: AggregationError,
        /// Last good report, still on display.
        retained: Option<&'a WeatherReport>,
    },
    /// A newer request was issued after this one; the result was dropped.
    Stale(RequestTicket),
}

impl ReportBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new request. Any ticket issued earlier becomes stale.
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    pub fn current(&self) -> Option<&WeatherReport> {
        self.current.as_ref()
    }

    pub fn apply(
        &mut self,
        ticket: RequestTicket,
        result: Result<WeatherReport, AggregationError>,
    ) -> Applied<'_> {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.issued, "dropping stale result");
            return Applied::Stale(ticket);
        }

        match result {
            Ok(report) => Applied::Updated(self.current.insert(report)),
            Err(error) => Applied::Failed { error, retained: self.current.as_ref() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{UnitSystem, error::MissingField};

    fn report(name: &str) -> WeatherReport {
        WeatherReport {
            name: name.to_string(),
            country: "US".to_string(),
            lat: 1.0,
            lon: 2.0,
            units: UnitSystem::Metric,
            temp: 20.0,
            feels_like: 19.0,
            humidity: 40,
            pressure: 1013,
            wind_speed: 1.5,
            wind_direction_deg: 90.0,
            sunrise: 0,
            sunset: 0,
            timezone_offset_seconds: 0,
            condition_summary: "Clear".to_string(),
            icon_ref: "https://openweathermap.org/img/wn/01d.png".to_string(),
            uv_index: 4.0,
        }
    }

    fn validation_error() -> AggregationError {
        AggregationError::Validation { missing_field: MissingField::City }
    }

    #[test]
    fn latest_ticket_updates_report() {
        let mut board = ReportBoard::new();
        let ticket = board.begin();

        assert!(matches!(board.apply(ticket, Ok(report("Redmond"))), Applied::Updated(r) if r.name == "Redmond"));
        assert_eq!(board.current().map(|r| r.name.as_str()), Some("Redmond"));
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut board = ReportBoard::new();
        let old = board.begin();
        let new = board.begin();

        assert!(old < new);
        assert!(matches!(board.apply(old, Ok(report("Seattle"))), Applied::Stale(t) if t == old));
        assert!(board.current().is_none());

        board.apply(new, Ok(report("Portland")));
        assert!(matches!(board.apply(old, Ok(report("Seattle"))), Applied::Stale(_)));
        assert_eq!(board.current().map(|r| r.name.as_str()), Some("Portland"));
    }

    #[test]
    fn failure_keeps_last_known_report() {
        let mut board = ReportBoard::new();
        let first = board.begin();
        board.apply(first, Ok(report("Redmond")));

        let second = board.begin();
        match board.apply(second, Err(validation_error())) {
            Applied::Failed { error, retained } => {
                assert_eq!(error.user_message(), "Please enter the city.");
                assert_eq!(retained.map(|r| r.name.as_str()), Some("Redmond"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(board.current().map(|r| r.name.as_str()), Some("Redmond"));
    }
}
