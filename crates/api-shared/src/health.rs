use crate::wire::HealthRes;
use hysio_core::knowledge_base::ENTRIES;

/// Health service behind the REST `/health` endpoint.
///
/// Besides liveness it reports the size of the loaded DCSPH knowledge base,
/// so an empty or truncated table shows up in monitoring.
pub struct HealthService;

impl HealthService {
    /// Checks health of the loaded knowledge base.
    ///
    /// # Returns
    /// A `HealthRes` that is `ok` when the knowledge base has entries.
    pub fn check_health() -> HealthRes {
        let codes = ENTRIES.len();
        HealthRes {
            ok: codes > 0,
            message: format!("Hysio is alive ({codes} DCSPH codes loaded)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health_reports_codes() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert!(res.message.contains("DCSPH codes loaded"));
    }
}
