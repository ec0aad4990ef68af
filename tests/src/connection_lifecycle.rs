//! Connection lifecycle scenario tests
//!
//! Each test wires a fresh E2 manager over an in-memory RNIB and a mock
//! routing manager, then drives one inbound notification through its
//! handler and inspects the store, the procedure state and the transport.

use integration_tests::{
    error_indication_payload, gnb_record, init_test_logging, notification, ran_function,
    service_update_payload, setup_payload, stored_function, SendPath, TestE2mgr,
    TEST_E2T_ADDRESS,
};
use nextgric_common::GlobalRicId;
use nextgric_e2ap::{
    E2apCause, E2apCodec, E2apPdu, FunctionChange, JsonE2apCodec, MiscCause, ProcedureCode,
    RanFunctionChangeItem, RanFunctionIdItem, RicRequestCause, TransportCause,
};
use nextgric_e2mgr::tasks::NotificationHandlerProvider;
use nextgric_e2mgr::{E2mgrError, MessageType, NotificationRequest, ProcedureState};
use nextgric_rnib::{
    now_nanos, ConnectionStatus, GeneralConfiguration, NodebInfo, RnibOperation,
};

const RAN: &str = "gnb_13f184_0000000000010011";

async fn dispatch(provider: &NotificationHandlerProvider, request: NotificationRequest) {
    provider
        .get(request.msg_type)
        .expect("handler registered")
        .handle(&request)
        .await;
}

fn change(change: FunctionChange, id: u32, revision: u32) -> RanFunctionChangeItem {
    let item = ran_function(id, revision);
    RanFunctionChangeItem {
        change,
        ran_function_id: item.ran_function_id,
        ran_function_definition: item.ran_function_definition,
        ran_function_revision: item.ran_function_revision,
        ran_function_oid: item.ran_function_oid,
    }
}

/// Cause of the single E2 Setup Failure sent back to the RAN.
fn setup_failure_cause(harness: &TestE2mgr) -> E2apCause {
    let failures = harness.sender.sent_of_type(MessageType::RicE2SetupFailure);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, SendPath::WormholeReply);
    match JsonE2apCodec.decode(&failures[0].message.payload).unwrap() {
        E2apPdu::E2SetupFailure(failure) => failure.cause,
        other => panic!("expected E2SetupFailure, got {}", other.name()),
    }
}

fn function_ids(nodeb: &NodebInfo) -> Vec<u32> {
    nodeb
        .ran_functions()
        .unwrap_or_default()
        .iter()
        .map(|f| f.ran_function_id)
        .collect()
}

// ============================================================================
// E2 Setup
// ============================================================================

#[tokio::test]
async fn test_new_gnb_setup_creates_record_and_responds() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let context = harness.context();
    let provider = context.handler_provider();

    let payload = setup_payload(TEST_E2T_ADDRESS, vec![ran_function(1, 1), ran_function(2, 3)]);
    dispatch(&provider, notification(MessageType::RicE2SetupReq, RAN, payload)).await;

    let nodeb = harness.rnib.nodeb(RAN).await.expect("record created");
    assert_eq!(nodeb.connection_status, ConnectionStatus::Connected);
    assert_eq!(nodeb.associated_e2t_instance_address, TEST_E2T_ADDRESS);
    assert!(nodeb.setup_from_network);
    assert_eq!(function_ids(&nodeb), vec![1, 2]);
    assert_eq!(
        context.procedure_states.get(RAN).await,
        Some(ProcedureState::SetupCompleted)
    );

    let e2t = harness.rnib.e2t_instance(TEST_E2T_ADDRESS).await.unwrap();
    assert_eq!(e2t.associated_ran_list, vec![RAN.to_string()]);
    assert_eq!(
        harness.routing_manager_paths().await,
        vec!["/associate-ran-to-e2t".to_string()]
    );

    let responses = harness.sender.sent_of_type(MessageType::RicE2SetupResp);
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].path, SendPath::Routed);
    let response = match JsonE2apCodec.decode(&responses[0].message.payload).unwrap() {
        E2apPdu::E2SetupResponse(response) => response,
        other => panic!("expected E2SetupResponse, got {}", other.name()),
    };
    let ric_id = GlobalRicId::parse("AACCE", "310", "411").unwrap();
    assert_eq!(response.global_ric_id.ric_id, ric_id.ric_id_bits());
    assert_eq!(response.global_ric_id.plmn_id, ric_id.plmn.to_hex());
    assert_eq!(
        response.ran_functions_accepted,
        vec![
            RanFunctionIdItem {
                ran_function_id: 1,
                ran_function_revision: 1
            },
            RanFunctionIdItem {
                ran_function_id: 2,
                ran_function_revision: 3
            },
        ]
    );
}

#[tokio::test]
async fn test_setup_within_quiet_period_is_dropped() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let mut nodeb = gnb_record(RAN, ConnectionStatus::Disconnected, vec![stored_function(1, 1)]);
    nodeb.associated_e2t_instance_address.clear();
    nodeb.status_update_time_stamp = now_nanos();
    harness.rnib.insert_nodeb(nodeb.clone()).await;
    let context = harness.context();
    let provider = context.handler_provider();

    let payload = setup_payload(TEST_E2T_ADDRESS, vec![ran_function(1, 2)]);
    dispatch(&provider, notification(MessageType::RicE2SetupReq, RAN, payload)).await;

    assert!(harness.sender.sent().is_empty());
    assert_eq!(harness.rnib.nodeb_write_count().await, 0);
    assert_eq!(harness.rnib.nodeb(RAN).await, Some(nodeb));
    assert!(harness.routing_manager_paths().await.is_empty());
}

#[tokio::test]
async fn test_setup_routing_failure_answers_transport_cause() {
    init_test_logging();
    let harness = TestE2mgr::start(400).await;
    let context = harness.context();
    let provider = context.handler_provider();

    let payload = setup_payload(TEST_E2T_ADDRESS, vec![ran_function(1, 1)]);
    dispatch(&provider, notification(MessageType::RicE2SetupReq, RAN, payload)).await;

    assert!(harness.sender.sent_of_type(MessageType::RicE2SetupResp).is_empty());
    let failures = harness.sender.sent_of_type(MessageType::RicE2SetupFailure);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, SendPath::WormholeReply);
    match JsonE2apCodec.decode(&failures[0].message.payload).unwrap() {
        E2apPdu::E2SetupFailure(failure) => assert_eq!(
            failure.cause,
            E2apCause::Transport(TransportCause::TransportResourceUnavailable)
        ),
        other => panic!("expected E2SetupFailure, got {}", other.name()),
    }
    assert_eq!(
        context.procedure_states.get(RAN).await,
        Some(ProcedureState::SetupFailure)
    );

    let nodeb = harness.rnib.nodeb(RAN).await.expect("record kept");
    assert!(nodeb.associated_e2t_instance_address.is_empty());
    assert_ne!(nodeb.connection_status, ConnectionStatus::Connected);
}

#[tokio::test]
async fn test_setup_redelivery_for_connected_ran_does_not_duplicate() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let context = harness.context();
    let provider = context.handler_provider();
    let payload = setup_payload(TEST_E2T_ADDRESS, vec![ran_function(1, 1)]);

    dispatch(&provider, notification(MessageType::RicE2SetupReq, RAN, payload.clone())).await;
    dispatch(&provider, notification(MessageType::RicE2SetupReq, RAN, payload)).await;

    assert_eq!(harness.rnib.identities().await.len(), 1);
    let e2t = harness.rnib.e2t_instance(TEST_E2T_ADDRESS).await.unwrap();
    assert_eq!(e2t.associated_ran_list, vec![RAN.to_string()]);
    assert_eq!(harness.sender.sent_of_type(MessageType::RicE2SetupResp).len(), 2);
}

#[tokio::test]
async fn test_setup_with_ric_disabled_is_rejected() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    harness
        .rnib
        .set_general_configuration(GeneralConfiguration { enable_ric: false })
        .await;
    let context = harness.context();
    let provider = context.handler_provider();

    let payload = setup_payload(TEST_E2T_ADDRESS, vec![ran_function(1, 1)]);
    dispatch(&provider, notification(MessageType::RicE2SetupReq, RAN, payload)).await;

    assert_eq!(
        setup_failure_cause(&harness),
        E2apCause::Misc(MiscCause::OmIntervention)
    );
    assert_eq!(harness.sender.sent().len(), 1);
    assert_eq!(harness.rnib.nodeb_write_count().await, 0);
    assert!(harness.rnib.nodeb(RAN).await.is_none());
    assert!(harness.routing_manager_paths().await.is_empty());
    assert_eq!(
        context.procedure_states.get(RAN).await,
        Some(ProcedureState::SetupFailure)
    );
}

#[tokio::test]
async fn test_setup_via_unknown_e2t_is_dropped() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let context = harness.context();
    let provider = context.handler_provider();

    let payload = setup_payload("10.0.2.99:38000", vec![ran_function(1, 1)]);
    dispatch(&provider, notification(MessageType::RicE2SetupReq, RAN, payload)).await;

    assert!(harness.sender.sent().is_empty());
    assert_eq!(harness.rnib.nodeb_write_count().await, 0);
    assert!(harness.rnib.nodeb(RAN).await.is_none());
    assert!(harness.routing_manager_paths().await.is_empty());
}

#[tokio::test]
async fn test_setup_for_shutting_down_ran_is_dropped() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let nodeb = gnb_record(RAN, ConnectionStatus::ShuttingDown, vec![stored_function(1, 1)]);
    harness.rnib.insert_nodeb(nodeb.clone()).await;
    let context = harness.context();
    let provider = context.handler_provider();

    let payload = setup_payload(TEST_E2T_ADDRESS, vec![ran_function(1, 2)]);
    dispatch(&provider, notification(MessageType::RicE2SetupReq, RAN, payload)).await;

    assert!(harness.sender.sent().is_empty());
    assert_eq!(harness.rnib.nodeb_write_count().await, 0);
    assert_eq!(harness.rnib.nodeb(RAN).await, Some(nodeb));
    assert!(harness.routing_manager_paths().await.is_empty());
}

#[tokio::test]
async fn test_new_ran_without_functions_is_rejected() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let context = harness.context();
    let provider = context.handler_provider();

    let payload = setup_payload(TEST_E2T_ADDRESS, vec![]);
    dispatch(&provider, notification(MessageType::RicE2SetupReq, RAN, payload)).await;

    assert_eq!(
        setup_failure_cause(&harness),
        E2apCause::RicRequest(RicRequestCause::RequestIdUnknown)
    );
    assert!(harness.sender.sent_of_type(MessageType::RicE2SetupResp).is_empty());
    assert_eq!(harness.rnib.nodeb_write_count().await, 0);
    assert!(harness.rnib.nodeb(RAN).await.is_none());
    assert!(harness.routing_manager_paths().await.is_empty());
}

// ============================================================================
// RIC Service Update and Error Indication
// ============================================================================

#[tokio::test]
async fn test_service_update_echoes_absent_delete() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let functions = vec![stored_function(1, 1), stored_function(2, 1)];
    harness
        .rnib
        .insert_nodeb(gnb_record(RAN, ConnectionStatus::Connected, functions.clone()))
        .await;
    let context = harness.context();
    let provider = context.handler_provider();

    let payload = service_update_payload(vec![change(FunctionChange::Deleted, 9, 4)]);
    dispatch(&provider, notification(MessageType::RicServiceUpdate, RAN, payload)).await;

    let acks = harness.sender.sent_of_type(MessageType::RicServiceUpdateAck);
    assert_eq!(acks.len(), 1);
    match JsonE2apCodec.decode(&acks[0].message.payload).unwrap() {
        E2apPdu::RicServiceUpdateAcknowledge(ack) => assert_eq!(
            ack.ran_functions_accepted,
            vec![RanFunctionIdItem {
                ran_function_id: 9,
                ran_function_revision: 4
            }]
        ),
        other => panic!("expected RICserviceUpdateAcknowledge, got {}", other.name()),
    }

    let nodeb = harness.rnib.nodeb(RAN).await.unwrap();
    assert_eq!(nodeb.ran_functions(), Some(functions.as_slice()));
    assert_eq!(
        context.procedure_states.get(RAN).await,
        Some(ProcedureState::ServiceUpdateCompleted)
    );
}

#[tokio::test]
async fn test_error_indication_reverts_service_update() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let before = vec![stored_function(1, 1), stored_function(2, 1)];
    harness
        .rnib
        .insert_nodeb(gnb_record(RAN, ConnectionStatus::Connected, before.clone()))
        .await;
    let context = harness.context();
    let provider = context.handler_provider();

    let update = service_update_payload(vec![
        change(FunctionChange::Added, 3, 1),
        change(FunctionChange::Deleted, 1, 1),
    ]);
    dispatch(&provider, notification(MessageType::RicServiceUpdate, RAN, update)).await;
    assert_eq!(function_ids(&harness.rnib.nodeb(RAN).await.unwrap()), vec![2, 3]);

    let indication = error_indication_payload(ProcedureCode::RicServiceUpdate);
    dispatch(&provider, notification(MessageType::RicErrorIndication, RAN, indication)).await;

    let nodeb = harness.rnib.nodeb(RAN).await.unwrap();
    assert_eq!(nodeb.ran_functions(), Some(before.as_slice()));
    assert_eq!(nodeb.connection_status, ConnectionStatus::Connected);
}

#[tokio::test]
async fn test_error_indication_after_setup_disconnects() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let context = harness.context();
    let provider = context.handler_provider();

    let payload = setup_payload(TEST_E2T_ADDRESS, vec![ran_function(1, 1)]);
    dispatch(&provider, notification(MessageType::RicE2SetupReq, RAN, payload)).await;
    let indication = error_indication_payload(ProcedureCode::E2Setup);
    dispatch(&provider, notification(MessageType::RicErrorIndication, RAN, indication)).await;

    let nodeb = harness.rnib.nodeb(RAN).await.unwrap();
    assert_eq!(nodeb.connection_status, ConnectionStatus::Disconnected);
    assert!(nodeb.associated_e2t_instance_address.is_empty());
    let e2t = harness.rnib.e2t_instance(TEST_E2T_ADDRESS).await.unwrap();
    assert!(e2t.associated_ran_list.is_empty());
    assert_eq!(
        harness.routing_manager_paths().await,
        vec![
            "/associate-ran-to-e2t".to_string(),
            "/dissociate-ran".to_string()
        ]
    );
}

// ============================================================================
// Association and Reconnection
// ============================================================================

#[tokio::test]
async fn test_associate_routing_rejection_keeps_address() {
    init_test_logging();
    let harness = TestE2mgr::start(400).await;
    let mut nodeb = gnb_record(RAN, ConnectionStatus::Connecting, vec![stored_function(1, 1)]);
    nodeb.associated_e2t_instance_address = "10.0.2.16:38000".to_string();
    harness.rnib.insert_nodeb(nodeb.clone()).await;
    let context = harness.context();

    let mut working = nodeb.clone();
    let err = context
        .e2t_association
        .associate_ran(TEST_E2T_ADDRESS, &mut working)
        .await
        .unwrap_err();

    assert!(matches!(err, E2mgrError::RoutingManager(_)));
    assert_eq!(working.associated_e2t_instance_address, "10.0.2.16:38000");
    assert_eq!(harness.rnib.nodeb(RAN).await, Some(nodeb));
    let e2t = harness.rnib.e2t_instance(TEST_E2T_ADDRESS).await.unwrap();
    assert!(e2t.associated_ran_list.is_empty());
}

#[tokio::test]
async fn test_lost_connection_retries_below_ceiling() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let mut nodeb = gnb_record(RAN, ConnectionStatus::Connected, vec![stored_function(1, 1)]);
    nodeb.connection_attempts = 2;
    harness.rnib.insert_nodeb(nodeb).await;
    let context = harness.context();
    let provider = context.handler_provider();

    let request = notification(MessageType::RicSctpConnectionFailure, RAN, Default::default());
    dispatch(&provider, request).await;

    let nodeb = harness.rnib.nodeb(RAN).await.unwrap();
    assert_eq!(nodeb.connection_status, ConnectionStatus::Connecting);
    assert_eq!(nodeb.connection_attempts, 3);
    assert_eq!(harness.sender.sent_of_type(MessageType::RicEndcX2SetupReq).len(), 1);
}

#[tokio::test]
async fn test_lost_connection_gives_up_at_ceiling() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let mut nodeb = gnb_record(RAN, ConnectionStatus::Connecting, vec![stored_function(1, 1)]);
    nodeb.connection_attempts = 3;
    harness.rnib.insert_nodeb(nodeb).await;
    let context = harness.context();
    let provider = context.handler_provider();

    let request = notification(MessageType::RicSctpConnectionFailure, RAN, Default::default());
    dispatch(&provider, request).await;

    let nodeb = harness.rnib.nodeb(RAN).await.unwrap();
    assert_eq!(nodeb.connection_status, ConnectionStatus::Disconnected);
    assert!(harness.sender.sent().is_empty());
    assert_eq!(
        harness.routing_manager_paths().await,
        vec!["/dissociate-ran".to_string()]
    );
}

#[tokio::test]
async fn test_lost_connection_for_shut_down_ran_writes_nothing() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    harness
        .rnib
        .insert_nodeb(gnb_record(RAN, ConnectionStatus::ShutDown, vec![]))
        .await;
    let context = harness.context();
    let provider = context.handler_provider();

    let request = notification(MessageType::RicSctpConnectionFailure, RAN, Default::default());
    dispatch(&provider, request).await;

    assert_eq!(harness.rnib.nodeb_write_count().await, 0);
    assert_eq!(harness.rnib.call_count(RnibOperation::UpdateNodebInfo).await, 0);
    assert!(harness.sender.sent().is_empty());
}
