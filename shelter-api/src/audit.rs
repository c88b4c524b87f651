use tracing::info;

/// Audit trail for mutating API operations.
///
/// Events go to the `audit` tracing target so they can be filtered or
/// shipped independently of the regular service logs.
pub struct ApiAuditLogger;

impl ApiAuditLogger {
    pub fn new() -> Self {
        Self
    }

    pub fn pet_created(&self, pet_id: i64, name: &str) {
        info!(target: "audit", pet_id, "Pet created: {} ({})", name, pet_id);
    }

    pub fn pet_updated(&self, pet_id: i64) {
        info!(target: "audit", pet_id, "Pet updated: {}", pet_id);
    }

    pub fn pet_deleted(&self, pet_id: i64) {
        info!(target: "audit", pet_id, "Pet deleted: {}", pet_id);
    }
}

impl Default for ApiAuditLogger {
    fn default() -> Self {
        Self::new()
    }
}
