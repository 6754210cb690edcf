use pharma_core::CoreError;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};

/// Lazily connected channel; the first call dials the service.
pub(crate) fn lazy_channel(url: &str) -> Result<Channel, tonic::transport::Error> {
    Ok(Endpoint::from_shared(url.to_string())?.connect_lazy())
}

/// `NOT_FOUND` keeps its meaning; every other failure is internal.
pub(crate) fn status_to_core(service: &str, status: Status) -> CoreError {
    match status.code() {
        Code::NotFound => CoreError::NotFound(status.message().to_string()),
        code => CoreError::Internal(format!("{} call failed ({:?}): {}", service, code, status.message())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = status_to_core("product service", Status::not_found("product missing"));
        assert!(matches!(err, CoreError::NotFound(ref msg) if msg == "product missing"));

        let err = status_to_core("product service", Status::unavailable("connection refused"));
        assert!(matches!(err, CoreError::Internal(ref msg) if msg.contains("connection refused")));
    }
}
