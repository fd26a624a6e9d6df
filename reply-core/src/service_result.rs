//! Outcome of a single downstream service call.

/// Result of one bounded-timeout call to an auxiliary service.
///
/// Only the service client distinguishes `Unavailable` from `Timeout` (for logging);
/// everything above it treats both as "absent" through [`ServiceResult::success`].
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResult<T> {
    Success(T),
    /// Non-2xx status, network failure or a payload that failed validation.
    Unavailable,
    /// The per-call deadline expired; the in-flight request was dropped.
    Timeout,
}

impl<T> ServiceResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ServiceResult::Success(_))
    }

    /// Returns the value on success; `None` for both absent outcomes.
    pub fn success(self) -> Option<T> {
        match self {
            ServiceResult::Success(value) => Some(value),
            ServiceResult::Unavailable | ServiceResult::Timeout => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ServiceResult<U> {
        match self {
            ServiceResult::Success(value) => ServiceResult::Success(f(value)),
            ServiceResult::Unavailable => ServiceResult::Unavailable,
            ServiceResult::Timeout => ServiceResult::Timeout,
        }
    }

    /// Short label for structured logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            ServiceResult::Success(_) => "success",
            ServiceResult::Unavailable => "unavailable",
            ServiceResult::Timeout => "timeout",
        }
    }
}

impl<T> From<ServiceResult<T>> for Option<T> {
    fn from(result: ServiceResult<T>) -> Self {
        result.success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_outcomes_collapse_to_none() {
        assert_eq!(ServiceResult::<u8>::Unavailable.success(), None);
        assert_eq!(ServiceResult::<u8>::Timeout.success(), None);
        assert_eq!(ServiceResult::Success(7u8).success(), Some(7));
    }

    #[test]
    fn test_map_preserves_outcome() {
        let timed_out: ServiceResult<u8> = ServiceResult::Timeout;
        assert_eq!(timed_out.map(|v| v + 1), ServiceResult::Timeout);
        assert_eq!(ServiceResult::Success(1u8).map(|v| v + 1), ServiceResult::Success(2));
        assert_eq!(ServiceResult::<u8>::Unavailable.outcome(), "unavailable");
    }
}
