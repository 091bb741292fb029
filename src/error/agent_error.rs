#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("malformed message: {0}")]
    ParseError(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("no IATA code for city: {0}")]
    UnknownCity(String),

    #[error("provider error: {0}")]
    ProviderError(String),

    #[error("message delivery failed: {0}")]
    DeliveryError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}
