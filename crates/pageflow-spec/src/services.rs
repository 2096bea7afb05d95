use thiserror::Error;

/// Services this module can build flows and summaries for.
pub const SUPPORTED_SERVICES: &[&str] = &["notify"];

pub const NOTIFY_SERVICE: &str = SUPPORTED_SERVICES[0];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("service '{0}' is not supported")]
pub struct UnsupportedService(pub String);

pub fn is_service_supported(service: &str) -> bool {
    SUPPORTED_SERVICES.contains(&service)
}

pub fn check_service_supported(service: &str) -> Result<(), UnsupportedService> {
    if is_service_supported(service) {
        Ok(())
    } else {
        Err(UnsupportedService(service.to_string()))
    }
}
