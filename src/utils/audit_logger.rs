// Audit logging for core lifecycle mutations
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub enum AuditAction {
    JobCreated,
    JobDeleted,
    ApplicationCreated,
    ApplicationTransitioned,
    ApplicationWithdrawn,
    ApplicationDeleted,
    CvForwarded,
    ForwardedCvActioned,
    MeetingScheduled,
    SubEmployerCreated,
    SubscriptionRenewed,
    SubscriptionCancelled,
    UserCascadeDeleted,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub action: AuditAction,
    pub actor_id: Uuid,
    pub resource_id: Option<String>,
    pub resource_type: String,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct AuditLogger;

impl AuditLogger {
    /// Log an audit event for a core mutation
    pub async fn log_action(
        action: AuditAction,
        actor_id: Uuid,
        resource_type: &str,
        resource_id: Option<String>,
        details: Option<String>,
    ) {
        let audit_log = AuditLog {
            id: Uuid::new_v4(),
            action,
            actor_id,
            resource_id,
            resource_type: resource_type.to_string(),
            details,
            timestamp: Utc::now(),
        };

        // Log to tracing system (in production, this would also write to database/queue)
        let json_log = serde_json::to_string(&audit_log).unwrap_or_else(|e| {
            warn!("Failed to serialize audit log: {}", e);
            format!("{:?}", audit_log)
        });

        info!(target: "audit", "{}", json_log);
    }
}
