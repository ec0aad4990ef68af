//! E2 Setup Request handling
//!
//! ```text
//! enableRic? ──no──> E2 Setup Failure (misc/om-intervention)
//!     │
//! E2T known? ──no──> drop
//!     │
//! RAN record ──absent──> create (CONNECTING) ─┐
//!     │                                      │
//!     └─present──> state checks, merge ──────┴─> associate ─> E2 Setup Response
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nextgric_common::{log_e2ap_message, Direction, GlobalRicId};
use nextgric_e2ap::{
    split_address_prefix, E2NodeKind, E2SetupFailure, E2SetupRequest, E2SetupResponse, E2apCause,
    E2apCodec, E2apPdu, MiscCause, ProtocolCause, RanFunctionItem, RicRequestCause,
    TransportCause,
};
use nextgric_rnib::{
    now_nanos, ConnectionStatus, GlobalNbId, NodebInfo, RanFunction, RnibDataService,
};
use tracing::{debug, error, info, warn};

use crate::error::E2mgrError;
use crate::handlers::{NotificationHandler, NotificationRequest};
use crate::managers::{E2TAssociationManager, E2TInstancesManager, RanListManager};
use crate::services::{MessageType, RmrMessage, RmrSender};
use crate::state::{ProcedureState, ProcedureStateTracker};

fn to_ran_function(item: &RanFunctionItem) -> RanFunction {
    RanFunction {
        ran_function_id: item.ran_function_id,
        ran_function_definition: item.ran_function_definition.clone(),
        ran_function_revision: item.ran_function_revision,
        ran_function_oid: item.ran_function_oid.clone(),
    }
}

fn request_id_unknown() -> E2mgrError {
    E2mgrError::RequestRejected(E2apCause::RicRequest(RicRequestCause::RequestIdUnknown))
}

fn not_compatible() -> E2mgrError {
    E2mgrError::RequestRejected(E2apCause::Protocol(
        ProtocolCause::MessageNotCompatibleWithReceiverState,
    ))
}

pub struct E2SetupRequestNotificationHandler {
    rnib: Arc<dyn RnibDataService>,
    codec: Arc<dyn E2apCodec>,
    rmr_sender: Arc<dyn RmrSender>,
    e2t_instances: Arc<E2TInstancesManager>,
    e2t_association: Arc<E2TAssociationManager>,
    ran_list: Arc<RanListManager>,
    procedure_states: Arc<ProcedureStateTracker>,
    global_ric_id: GlobalRicId,
    quiet_period: Duration,
}

impl E2SetupRequestNotificationHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rnib: Arc<dyn RnibDataService>,
        codec: Arc<dyn E2apCodec>,
        rmr_sender: Arc<dyn RmrSender>,
        e2t_instances: Arc<E2TInstancesManager>,
        e2t_association: Arc<E2TAssociationManager>,
        ran_list: Arc<RanListManager>,
        procedure_states: Arc<ProcedureStateTracker>,
        global_ric_id: GlobalRicId,
        quiet_period: Duration,
    ) -> Self {
        Self {
            rnib,
            codec,
            rmr_sender,
            e2t_instances,
            e2t_association,
            ran_list,
            procedure_states,
            global_ric_id,
            quiet_period,
        }
    }

    async fn process(
        &self,
        request: &NotificationRequest,
        e2t_address: &str,
        setup: &E2SetupRequest,
    ) -> Result<(), E2mgrError> {
        let ran_name = request.ran_name.as_str();

        let general = self.rnib.get_general_configuration().await?;
        if !general.enable_ric {
            info!("RAN {}: RIC is disabled, rejecting setup", ran_name);
            return Err(E2mgrError::RequestRejected(E2apCause::Misc(
                MiscCause::OmIntervention,
            )));
        }

        self.e2t_instances.get_e2t_instance(e2t_address).await?;

        let functions: Vec<RanFunction> = setup.ran_functions.iter().map(to_ran_function).collect();
        let (mut nodeb, functions_changed) = match self.rnib.get_nodeb(ran_name).await {
            Ok(existing) => {
                self.check_state(&existing)?;
                merge_functions(existing, functions)?
            }
            Err(e) if e.is_not_found() => {
                (self.create_nodeb(ran_name, setup, functions).await?, false)
            }
            Err(e) => return Err(e.into()),
        };

        self.procedure_states
            .set(ran_name, ProcedureState::Ongoing)
            .await;

        let published = match self
            .e2t_association
            .associate_ran(e2t_address, &mut nodeb)
            .await
        {
            Ok(published) => published,
            Err(E2mgrError::RoutingManager(e)) => {
                warn!("RAN {}: association with E2T {} failed: {}", ran_name, e2t_address, e);
                if let Err(e) = self.rnib.update_nodeb_info(&nodeb).await {
                    error!("RAN {}: failed saving record after routing failure: {}", ran_name, e);
                }
                return Err(E2mgrError::RequestRejected(E2apCause::Transport(
                    TransportCause::TransportResourceUnavailable,
                )));
            }
            Err(e) => {
                self.procedure_states
                    .set(ran_name, ProcedureState::SetupFailure)
                    .await;
                return Err(e);
            }
        };

        if !published && functions_changed {
            self.rnib
                .update_nodeb_info_and_publish(&nodeb)
                .await
                .map_err(|e| E2mgrError::RnibDb(e.to_string()))?;
        }

        Ok(())
    }

    fn check_state(&self, nodeb: &NodebInfo) -> Result<(), E2mgrError> {
        match nodeb.connection_status {
            ConnectionStatus::Disconnected => {
                let elapsed = now_nanos().saturating_sub(nodeb.status_update_time_stamp);
                if u128::from(elapsed) < self.quiet_period.as_nanos() {
                    return Err(E2mgrError::WrongState(format!(
                        "RAN {}: disconnection in progress",
                        nodeb.ran_name
                    )));
                }
                Ok(())
            }
            ConnectionStatus::ShuttingDown => Err(E2mgrError::WrongState(format!(
                "RAN {}: incorrect state {}",
                nodeb.ran_name, nodeb.connection_status
            ))),
            _ => Ok(()),
        }
    }

    async fn create_nodeb(
        &self,
        ran_name: &str,
        setup: &E2SetupRequest,
        functions: Vec<RanFunction>,
    ) -> Result<NodebInfo, E2mgrError> {
        if functions.is_empty() {
            return Err(request_id_unknown());
        }

        let node_id = &setup.global_e2_node_id;
        let global_nb_id = GlobalNbId::new(node_id.plmn_id.clone(), node_id.node_id.clone());
        let mut nodeb = match node_id.kind {
            E2NodeKind::Gnb => NodebInfo::new_gnb(ran_name, global_nb_id, functions),
            E2NodeKind::Enb => {
                let mut nodeb = NodebInfo::new_enb(ran_name, global_nb_id);
                nodeb.set_ran_functions(functions).map_err(|_| not_compatible())?;
                nodeb
            }
        };
        nodeb.connection_status = ConnectionStatus::Connecting;
        nodeb.setup_from_network = true;
        nodeb.status_update_time_stamp = now_nanos();

        let identity = nodeb.to_nb_identity();
        self.rnib.save_nodeb(&identity, &nodeb).await?;
        self.ran_list
            .add_nb_identity(nodeb.node_type, &identity)
            .await?;
        info!("RAN {}: new {:?} record created", ran_name, nodeb.node_type);
        Ok(nodeb)
    }

    async fn send_response(
        &self,
        request: &NotificationRequest,
        setup: &E2SetupRequest,
    ) -> Result<(), E2mgrError> {
        let response =
            E2SetupResponse::new(setup.transaction_id, &self.global_ric_id, setup.ran_function_ids());
        let payload = self.codec.encode(&E2apPdu::E2SetupResponse(response))?;
        let msg = RmrMessage::new(
            MessageType::RicE2SetupResp,
            request.ran_name.clone(),
            payload,
            request.transaction_id.clone(),
        );
        self.rmr_sender.send(msg).await?;
        Ok(())
    }

    async fn send_failure(
        &self,
        request: &NotificationRequest,
        setup: &E2SetupRequest,
        cause: E2apCause,
    ) -> Result<(), E2mgrError> {
        let failure = E2SetupFailure::new(setup.transaction_id, cause);
        let payload = self.codec.encode(&E2apPdu::E2SetupFailure(failure))?;
        let msg = RmrMessage::new(
            MessageType::RicE2SetupFailure,
            request.ran_name.clone(),
            payload,
            request.transaction_id.clone(),
        );
        self.rmr_sender.wh_send(msg).await?;
        Ok(())
    }
}

/// Merges the advertised functions into an existing record.
///
/// An empty advertisement keeps what is stored, unless nothing is stored.
/// Returns the record and whether its functions changed.
fn merge_functions(
    mut nodeb: NodebInfo,
    functions: Vec<RanFunction>,
) -> Result<(NodebInfo, bool), E2mgrError> {
    let stored_empty = nodeb.ran_functions().map_or(true, <[RanFunction]>::is_empty);
    if functions.is_empty() {
        if stored_empty {
            return Err(request_id_unknown());
        }
        return Ok((nodeb, false));
    }

    let changed = nodeb.ran_functions() != Some(functions.as_slice());
    if changed {
        nodeb.set_ran_functions(functions).map_err(|_| not_compatible())?;
    }
    Ok((nodeb, changed))
}

#[async_trait]
impl NotificationHandler for E2SetupRequestNotificationHandler {
    async fn handle(&self, request: &NotificationRequest) {
        let ran_name = request.ran_name.as_str();
        log_e2ap_message(Direction::Rx, "E2SetupRequest", ran_name, &request.payload);

        let (e2t_address, pdu) = match split_address_prefix(&request.payload) {
            Ok(parts) => parts,
            Err(e) => {
                error!("RAN {}: malformed setup payload: {}", ran_name, e);
                return;
            }
        };
        let setup = match self.codec.decode_e2_setup_request(pdu) {
            Ok(setup) => setup,
            Err(e) => {
                error!("RAN {}: failed decoding E2 Setup Request: {}", ran_name, e);
                return;
            }
        };
        debug!("RAN {}: E2 Setup Request via E2T {}: {:?}", ran_name, e2t_address, setup);

        match self.process(request, &e2t_address, &setup).await {
            Ok(()) => {
                self.procedure_states
                    .set(ran_name, ProcedureState::SetupCompleted)
                    .await;
                match self.send_response(request, &setup).await {
                    Ok(()) => info!("RAN {}: E2 setup completed", ran_name),
                    Err(e) => error!("RAN {}: failed sending E2 Setup Response: {}", ran_name, e),
                }
            }
            Err(E2mgrError::RequestRejected(cause)) => {
                info!("RAN {}: rejecting E2 setup, cause {}", ran_name, cause);
                self.procedure_states
                    .set(ran_name, ProcedureState::SetupFailure)
                    .await;
                if let Err(e) = self.send_failure(request, &setup, cause).await {
                    error!("RAN {}: failed sending E2 Setup Failure: {}", ran_name, e);
                }
            }
            Err(e) => error!("RAN {}: E2 setup dropped: {}", ran_name, e),
        }

        info!(
            "RAN {}: setup request handled in {:.3} ms",
            ran_name,
            request.start_time.elapsed().as_secs_f64() * 1000.0
        );
    }
}
