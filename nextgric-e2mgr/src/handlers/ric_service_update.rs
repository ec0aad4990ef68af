//! RIC Service Update handling

use std::sync::Arc;

use async_trait::async_trait;
use nextgric_common::{log_e2ap_message, Direction};
use nextgric_e2ap::{
    E2apCodec, E2apPdu, RanFunctionIdItem, RicServiceUpdate, RicServiceUpdateAcknowledge,
};
use nextgric_rnib::{ConnectionStatus, RnibDataService};
use tracing::{debug, error, info, warn};

use crate::error::E2mgrError;
use crate::handlers::{NotificationHandler, NotificationRequest};
use crate::managers::{RanListManager, RicServiceUpdateManager};
use crate::services::{MessageType, RmrMessage, RmrSender};
use crate::state::{ProcedureState, ProcedureStateTracker};

pub struct RicServiceUpdateHandler {
    rnib: Arc<dyn RnibDataService>,
    codec: Arc<dyn E2apCodec>,
    rmr_sender: Arc<dyn RmrSender>,
    ran_list: Arc<RanListManager>,
    service_update: Arc<RicServiceUpdateManager>,
    procedure_states: Arc<ProcedureStateTracker>,
}

impl RicServiceUpdateHandler {
    pub fn new(
        rnib: Arc<dyn RnibDataService>,
        codec: Arc<dyn E2apCodec>,
        rmr_sender: Arc<dyn RmrSender>,
        ran_list: Arc<RanListManager>,
        service_update: Arc<RicServiceUpdateManager>,
        procedure_states: Arc<ProcedureStateTracker>,
    ) -> Self {
        Self {
            rnib,
            codec,
            rmr_sender,
            ran_list,
            service_update,
            procedure_states,
        }
    }

    async fn process(
        &self,
        request: &NotificationRequest,
        update: &RicServiceUpdate,
    ) -> Result<(), E2mgrError> {
        let ran_name = request.ran_name.as_str();
        let mut nodeb = self.rnib.get_nodeb(ran_name).await?;
        if nodeb.connection_status == ConnectionStatus::ShuttingDown {
            return Err(E2mgrError::WrongState(format!(
                "RAN {} is {}",
                ran_name, nodeb.connection_status
            )));
        }

        self.service_update.store_existing_ran_functions(&nodeb).await?;
        let accepted = self
            .service_update
            .apply_update(&mut nodeb, &update.changes)
            .await?;

        if let Err(e) = self
            .ran_list
            .update_health_check_timestamp_received(ran_name)
            .await
        {
            warn!("RAN {}: failed refreshing health check timestamp: {}", ran_name, e);
        }

        self.send_ack(request, update.transaction_id, accepted).await
    }

    async fn send_ack(
        &self,
        request: &NotificationRequest,
        transaction_id: u32,
        accepted: Vec<RanFunctionIdItem>,
    ) -> Result<(), E2mgrError> {
        let ack = RicServiceUpdateAcknowledge::new(transaction_id, accepted);
        let payload = self
            .codec
            .encode(&E2apPdu::RicServiceUpdateAcknowledge(ack))?;
        let msg = RmrMessage::new(
            MessageType::RicServiceUpdateAck,
            request.ran_name.clone(),
            payload,
            request.transaction_id.clone(),
        );
        self.rmr_sender.send(msg).await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationHandler for RicServiceUpdateHandler {
    async fn handle(&self, request: &NotificationRequest) {
        let ran_name = request.ran_name.as_str();
        log_e2ap_message(Direction::Rx, "RICserviceUpdate", ran_name, &request.payload);

        let update = match self.codec.decode_ric_service_update(&request.payload) {
            Ok(update) => update,
            Err(e) => {
                error!("RAN {}: failed decoding RIC Service Update: {}", ran_name, e);
                return;
            }
        };
        debug!("RAN {}: RIC Service Update {:?}", ran_name, update);

        match self.process(request, &update).await {
            Ok(()) => {
                self.procedure_states
                    .set(ran_name, ProcedureState::ServiceUpdateCompleted)
                    .await;
                info!("RAN {}: RIC service update completed", ran_name);
            }
            Err(e) => {
                self.procedure_states
                    .set(ran_name, ProcedureState::ServiceUpdateFailure)
                    .await;
                error!("RAN {}: RIC service update failed: {}", ran_name, e);
            }
        }
    }
}
