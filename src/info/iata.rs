use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::{Result, agent_error::AgentError};

/// IATA city codes for the destinations the providers cover.
static IATA: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Barcelona", "BCN"),
        ("Paris", "PAR"),
        ("Amsterdam", "AMS"),
        ("Berlin", "BER"),
        ("Dubai", "DXB"),
        ("London", "LHR"),
        ("Rome", "FCO"),
    ])
});

/// Looks up the IATA code for a city name. An unmapped city fails
/// explicitly; there is no fallback code.
pub fn convert_to_iata(city: &str) -> Result<&'static str> {
    IATA.get(city)
        .copied()
        .ok_or_else(|| AgentError::UnknownCity(city.to_string()).into())
}
