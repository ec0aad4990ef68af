//! Lost SCTP connection handling

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::handlers::{NotificationHandler, NotificationRequest};
use crate::managers::RanReconnectionManager;

pub struct RanLostConnectionHandler {
    reconnection: Arc<RanReconnectionManager>,
}

impl RanLostConnectionHandler {
    pub fn new(reconnection: Arc<RanReconnectionManager>) -> Self {
        Self { reconnection }
    }
}

#[async_trait]
impl NotificationHandler for RanLostConnectionHandler {
    async fn handle(&self, request: &NotificationRequest) {
        warn!("RAN {}: connection lost", request.ran_name);
        if let Err(e) = self.reconnection.reconnect_ran(&request.ran_name).await {
            error!("RAN {}: reconnection failed: {}", request.ran_name, e);
        }
    }
}
