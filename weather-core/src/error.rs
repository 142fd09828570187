use std::{fmt, time::Duration};

use thiserror::Error;

use crate::provider::ProviderId;

/// Failure of a single call to an upstream provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed")]
    Transport {
        provider: ProviderId,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} responded with status {status}: {body}")]
    Status {
        provider: ProviderId,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not decode {provider} response")]
    Decode {
        provider: ProviderId,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider} response is missing {field}")]
    MissingField {
        provider: ProviderId,
        field: &'static str,
    },

    #[error("{provider} did not answer within {after:?}")]
    Timeout { provider: ProviderId, after: Duration },
}

impl ProviderError {
    /// Wrap a transport failure. The request URL is dropped because it can carry credentials.
    pub fn transport(provider: ProviderId, source: reqwest::Error) -> Self {
        ProviderError::Transport { provider, source: source.without_url() }
    }

    /// True when the provider answered but the payload had the wrong shape.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ProviderError::Decode { .. } | ProviderError::MissingField { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    City,
    RegionCode,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MissingField::City => "city",
            MissingField::RegionCode => "state code",
        })
    }
}

/// Everything that can stop `fetch_report` from producing a report.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("missing {missing_field}")]
    Validation { missing_field: MissingField },

    #[error("weather data not found for {location}")]
    PrimaryProvider {
        location: String,
        #[source]
        source: ProviderError,
    },

    #[error("weather response was malformed")]
    MalformedResponse {
        #[source]
        source: ProviderError,
    },

    #[error("failed to fetch UV index")]
    SecondaryProvider {
        #[source]
        source: ProviderError,
    },
}

impl AggregationError {
    /// Notice text for the presentation layer.
    pub fn user_message(&self) -> &'static str {
        match self {
            AggregationError::Validation { missing_field: MissingField::City } => {
                "Please enter the city."
            }
            AggregationError::Validation { missing_field: MissingField::RegionCode } => {
                "Please enter the state code."
            }
            AggregationError::PrimaryProvider { .. } => "Please check the city and state code.",
            AggregationError::MalformedResponse { .. } => {
                "The weather service returned unexpected data. Please try again."
            }
            AggregationError::SecondaryProvider { .. } => {
                "The UV index service is unavailable. Please try again later."
            }
        }
    }
}
