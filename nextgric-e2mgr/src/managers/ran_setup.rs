//! Controller-initiated setup attempts
//!
//! Used when a lost RAN is retried: bumps the attempt counter, marks the RAN
//! CONNECTING and hands an X2 (eNB) or EN-DC X2 (gNB) setup request to the
//! transport. The request PDUs are packed once by the wire codec at startup
//! and handed in as [`SetupRequestPayloads`].

use std::sync::Arc;

use bytes::Bytes;
use nextgric_rnib::{ConnectionStatus, NodeType, NodebInfo};
use tracing::{error, info};

use crate::error::E2mgrError;
use crate::managers::RanConnectStatusChangeManager;
use crate::services::{MessageType, RmrMessage, RmrSender};

/// Pre-packed setup request PDUs.
#[derive(Debug, Clone, Default)]
pub struct SetupRequestPayloads {
    pub x2_setup: Bytes,
    pub endc_x2_setup: Bytes,
}

pub struct RanSetupManager {
    status_change: Arc<RanConnectStatusChangeManager>,
    rmr_sender: Arc<dyn RmrSender>,
    payloads: SetupRequestPayloads,
}

impl RanSetupManager {
    pub fn new(
        status_change: Arc<RanConnectStatusChangeManager>,
        rmr_sender: Arc<dyn RmrSender>,
        payloads: SetupRequestPayloads,
    ) -> Self {
        Self {
            status_change,
            rmr_sender,
            payloads,
        }
    }

    fn prepare_setup_request(&self, nodeb: &NodebInfo) -> Result<(MessageType, Bytes), E2mgrError> {
        match nodeb.node_type {
            NodeType::Enb => Ok((MessageType::RicX2SetupReq, self.payloads.x2_setup.clone())),
            NodeType::Gnb => Ok((
                MessageType::RicEndcX2SetupReq,
                self.payloads.endc_x2_setup.clone(),
            )),
            NodeType::Unknown => Err(E2mgrError::Internal(format!(
                "RAN {} has no node type, cannot build setup request",
                nodeb.ran_name
            ))),
        }
    }

    /// Starts a new setup attempt towards `nodeb`.
    ///
    /// If the transport refuses the request the attempt is given back and
    /// the RAN returns to DISCONNECTED.
    pub async fn execute_setup(&self, nodeb: &mut NodebInfo) -> Result<(), E2mgrError> {
        let (msg_type, payload) = self.prepare_setup_request(nodeb)?;

        nodeb.connection_attempts += 1;
        self.status_change
            .change_status(nodeb, ConnectionStatus::Connecting)
            .await?;
        info!(
            "RAN {}: setup attempt {} started",
            nodeb.ran_name, nodeb.connection_attempts
        );

        let msg = RmrMessage::new(
            msg_type,
            nodeb.ran_name.clone(),
            payload,
            Bytes::from(nodeb.ran_name.clone().into_bytes()),
        );
        if let Err(e) = self.rmr_sender.send(msg).await {
            error!("RAN {}: failed sending setup request: {}", nodeb.ran_name, e);
            nodeb.connection_attempts = nodeb.connection_attempts.saturating_sub(1);
            self.status_change
                .change_status(nodeb, ConnectionStatus::Disconnected)
                .await?;
            return Err(E2mgrError::Transport(e));
        }

        Ok(())
    }
}
