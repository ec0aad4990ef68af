//! Test fixtures and configuration helpers
//!
//! [`TestE2mgr`] bundles an in-memory RNIB seeded with one terminator, a
//! `wiremock` routing manager answering every request with a fixed status,
//! and a [`RecordingRmrSender`]. The payload builders produce what the
//! JSON codec expects on the wire.

use std::sync::Arc;

use bytes::Bytes;
use nextgric_common::{
    E2mgrConfig, GlobalRicIdConfig, LoggingConfig, RnibWriterConfig, RoutingManagerConfig,
};
use nextgric_e2ap::{
    CriticalityDiagnostics, E2NodeKind, E2SetupRequest, E2apCause, E2apCodec, E2apPdu,
    ErrorIndication, GlobalE2NodeId, JsonE2apCodec, MiscCause, ProcedureCode,
    RanFunctionChangeItem, RanFunctionItem, ResetRequest, RicServiceUpdate, TriggeringMessage,
};
use nextgric_e2mgr::clients::HttpRoutingManagerClient;
use nextgric_e2mgr::managers::SetupRequestPayloads;
use nextgric_e2mgr::{E2ManagerContext, MessageType, NotificationRequest};
use nextgric_rnib::{
    now_nanos, ConnectionStatus, E2TInstance, GlobalNbId, InMemoryRnib, NodebInfo, RanFunction,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::recording_sender::RecordingRmrSender;

/// Address of the terminator every harness starts with.
pub const TEST_E2T_ADDRESS: &str = "10.0.2.15:38000";

/// Configuration pointing at `routing_manager_url`.
pub fn test_config(routing_manager_url: &str) -> E2mgrConfig {
    E2mgrConfig {
        logging: LoggingConfig::default(),
        routing_manager: RoutingManagerConfig {
            base_url: routing_manager_url.to_string(),
            timeout_ms: 2000,
        },
        max_connection_attempts: 3,
        setup_quiet_period_ms: 10_000,
        e2_reset_timeout_sec: 1,
        global_ric_id: GlobalRicIdConfig {
            ric_id: "AACCE".to_string(),
            mcc: "310".to_string(),
            mnc: "411".to_string(),
        },
        rnib_writer: RnibWriterConfig::default(),
        procedure_state_ttl_sec: None,
    }
}

/// E2 manager collaborators for one test.
pub struct TestE2mgr {
    pub rnib: InMemoryRnib,
    pub routing_manager: MockServer,
    pub sender: Arc<RecordingRmrSender>,
    pub config: E2mgrConfig,
}

impl TestE2mgr {
    /// Harness whose routing manager answers every request with `status`.
    pub async fn start(status: u16) -> Self {
        let routing_manager = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(status))
            .mount(&routing_manager)
            .await;

        let rnib = InMemoryRnib::new();
        rnib.insert_e2t_instance(E2TInstance::new(TEST_E2T_ADDRESS, "e2term-0"))
            .await;

        let config = test_config(&routing_manager.uri());
        Self {
            rnib,
            routing_manager,
            sender: Arc::new(RecordingRmrSender::new()),
            config,
        }
    }

    /// Wires a fresh set of managers over the shared collaborators.
    pub fn context(&self) -> E2ManagerContext {
        let rm_client = HttpRoutingManagerClient::new(&self.config.routing_manager)
            .expect("routing manager client");
        E2ManagerContext::new(
            &self.config,
            Arc::new(self.rnib.clone()),
            Arc::new(rm_client),
            self.sender.clone(),
            SetupRequestPayloads::default(),
        )
        .expect("valid test configuration")
    }

    /// Paths the routing manager was called on, in order.
    pub async fn routing_manager_paths(&self) -> Vec<String> {
        self.routing_manager
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| request.url.path().to_string())
            .collect()
    }
}

/// Notification as the transport would deliver it.
pub fn notification(msg_type: MessageType, ran_name: &str, payload: Bytes) -> NotificationRequest {
    NotificationRequest::new(
        msg_type,
        ran_name,
        payload,
        Bytes::from(format!("{ran_name}-tid")),
    )
}

pub fn ran_function(id: u32, revision: u32) -> RanFunctionItem {
    RanFunctionItem {
        ran_function_id: id,
        ran_function_definition: format!("definition-{id}-{revision}"),
        ran_function_revision: revision,
        ran_function_oid: format!("1.3.6.1.4.1.53148.1.1.2.{id}"),
    }
}

/// Stored form of [`ran_function`].
pub fn stored_function(id: u32, revision: u32) -> RanFunction {
    let item = ran_function(id, revision);
    RanFunction {
        ran_function_id: item.ran_function_id,
        ran_function_definition: item.ran_function_definition,
        ran_function_revision: item.ran_function_revision,
        ran_function_oid: item.ran_function_oid,
    }
}

/// gNB record bound to [`TEST_E2T_ADDRESS`].
pub fn gnb_record(ran_name: &str, status: ConnectionStatus, functions: Vec<RanFunction>) -> NodebInfo {
    let mut nodeb = NodebInfo::new_gnb(ran_name, GlobalNbId::new("13f184", "0000000000010011"), functions);
    nodeb.connection_status = status;
    nodeb.associated_e2t_instance_address = TEST_E2T_ADDRESS.to_string();
    nodeb.status_update_time_stamp = now_nanos();
    nodeb
}

fn encode(pdu: E2apPdu) -> Bytes {
    JsonE2apCodec.encode(&pdu).expect("encodable pdu")
}

/// `address|E2SetupRequest` for a gNB advertising `functions`.
pub fn setup_payload(e2t_address: &str, functions: Vec<RanFunctionItem>) -> Bytes {
    let setup = E2SetupRequest {
        transaction_id: 1,
        global_e2_node_id: GlobalE2NodeId {
            kind: E2NodeKind::Gnb,
            plmn_id: "13f184".to_string(),
            node_id: "0000000000010011".to_string(),
        },
        ran_functions: functions,
    };
    let mut payload = format!("{e2t_address}|").into_bytes();
    payload.extend_from_slice(&encode(E2apPdu::E2SetupRequest(setup)));
    Bytes::from(payload)
}

pub fn service_update_payload(changes: Vec<RanFunctionChangeItem>) -> Bytes {
    encode(E2apPdu::RicServiceUpdate(RicServiceUpdate {
        transaction_id: 7,
        changes,
    }))
}

/// Error indication reporting a failed successful outcome of `procedure`.
pub fn error_indication_payload(procedure: ProcedureCode) -> Bytes {
    encode(E2apPdu::ErrorIndication(ErrorIndication {
        criticality_diagnostics: Some(CriticalityDiagnostics {
            procedure_code: Some(procedure.value()),
            triggering_message: Some(TriggeringMessage::SuccessfulOutcome),
            ..Default::default()
        }),
        ..Default::default()
    }))
}

pub fn reset_request_payload() -> Bytes {
    encode(E2apPdu::ResetRequest(ResetRequest {
        transaction_id: 3,
        cause: E2apCause::Misc(MiscCause::OmIntervention),
    }))
}
