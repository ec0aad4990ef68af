//! E2 Reset Request handling
//!
//! The RAN stays UNDER_RESET for the configured reset time, measured from
//! message arrival, before the response goes out and it is CONNECTED again.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nextgric_common::{log_e2ap_message, Direction};
use nextgric_e2ap::{E2apCodec, E2apPdu, ResetResponse};
use tracing::{error, info, warn};

use crate::handlers::{NotificationHandler, NotificationRequest};
use crate::managers::RanResetManager;
use crate::services::{MessageType, RmrMessage, RmrSender};

pub struct E2ResetRequestNotificationHandler {
    codec: Arc<dyn E2apCodec>,
    rmr_sender: Arc<dyn RmrSender>,
    ran_reset: Arc<RanResetManager>,
    reset_timeout: Duration,
}

impl E2ResetRequestNotificationHandler {
    pub fn new(
        codec: Arc<dyn E2apCodec>,
        rmr_sender: Arc<dyn RmrSender>,
        ran_reset: Arc<RanResetManager>,
        reset_timeout: Duration,
    ) -> Self {
        Self {
            codec,
            rmr_sender,
            ran_reset,
            reset_timeout,
        }
    }
}

#[async_trait]
impl NotificationHandler for E2ResetRequestNotificationHandler {
    async fn handle(&self, request: &NotificationRequest) {
        let ran_name = request.ran_name.as_str();
        log_e2ap_message(Direction::Rx, "ResetRequest", ran_name, &request.payload);

        let reset = match self.codec.decode_reset_request(&request.payload) {
            Ok(reset) => reset,
            Err(e) => {
                error!("RAN {}: failed decoding Reset Request: {}", ran_name, e);
                return;
            }
        };

        let mut nodeb = match self.ran_reset.begin_reset(ran_name).await {
            Ok(nodeb) => nodeb,
            Err(e) => {
                warn!("RAN {}: reset dropped: {}", ran_name, e);
                return;
            }
        };
        info!("RAN {}: reset requested, cause {}", ran_name, reset.cause);

        let remaining = self
            .reset_timeout
            .saturating_sub(request.start_time.elapsed());
        tokio::time::sleep(remaining).await;

        let response = E2apPdu::ResetResponse(ResetResponse {
            transaction_id: reset.transaction_id,
        });
        match self.codec.encode(&response) {
            Ok(payload) => {
                let msg = RmrMessage::new(
                    MessageType::RicE2ResetResp,
                    ran_name,
                    payload,
                    request.transaction_id.clone(),
                );
                if let Err(e) = self.rmr_sender.send(msg).await {
                    error!("RAN {}: failed sending Reset Response: {}", ran_name, e);
                }
            }
            Err(e) => error!("RAN {}: failed encoding Reset Response: {}", ran_name, e),
        }

        if let Err(e) = self.ran_reset.complete_reset(&mut nodeb).await {
            error!("RAN {}: failed leaving reset: {}", ran_name, e);
        }
    }
}
