//! Dispatcher scenario tests
//!
//! Notifications go through a running [`E2ManagerApp`], the way the
//! transport feeds them, instead of straight into a handler.

use integration_tests::{
    gnb_record, init_test_logging, notification, ran_function, reset_request_payload,
    setup_payload, stored_function, wait_for_procedure_state, wait_for_sent, TestE2mgr,
    TEST_E2T_ADDRESS,
};
use bytes::Bytes;
use nextgric_e2mgr::handlers::E2TermInitPayload;
use nextgric_e2mgr::{E2ManagerApp, MessageType, ProcedureState};
use nextgric_rnib::{ConnectionStatus, E2TInstance, E2TInstanceState};

#[tokio::test]
async fn test_setup_through_running_manager() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let app = E2ManagerApp::start(harness.context()).await.unwrap();
    let handle = app.notification_handle();

    let payload = setup_payload(TEST_E2T_ADDRESS, vec![ran_function(1, 1)]);
    handle
        .send(notification(MessageType::RicE2SetupReq, "gnb_a", payload))
        .await
        .unwrap();

    let context = app.context().clone();
    wait_for_procedure_state(&context, "gnb_a", ProcedureState::SetupCompleted)
        .await
        .unwrap();

    assert_eq!(harness.sender.sent_of_type(MessageType::RicE2SetupResp).len(), 1);
    assert_eq!(
        context.ran_list.get_nb_identity("gnb_a").await.map(|id| id.connection_status),
        Some(ConnectionStatus::Connected)
    );

    app.shutdown().await;
}

#[tokio::test]
async fn test_same_ran_resets_are_serialized() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    harness
        .rnib
        .insert_nodeb(gnb_record("gnb_a", ConnectionStatus::Connected, vec![stored_function(1, 1)]))
        .await;
    let app = E2ManagerApp::start(harness.context()).await.unwrap();
    let handle = app.notification_handle();

    // The second reset would find the RAN UNDER_RESET if both ran at once
    for _ in 0..2 {
        handle
            .send(notification(MessageType::RicE2ResetReq, "gnb_a", reset_request_payload()))
            .await
            .unwrap();
    }

    wait_for_sent(&harness.sender, MessageType::RicE2ResetResp, 2)
        .await
        .unwrap();

    app.shutdown().await;

    let nodeb = harness.rnib.nodeb("gnb_a").await.unwrap();
    assert_eq!(nodeb.connection_status, ConnectionStatus::Connected);
    let events: Vec<String> = harness
        .rnib
        .published_events()
        .await
        .into_iter()
        .map(|event| event.event)
        .collect();
    assert_eq!(
        events,
        vec![
            "gnb_a_DISCONNECTED",
            "gnb_a_CONNECTED",
            "gnb_a_DISCONNECTED",
            "gnb_a_CONNECTED"
        ]
    );
}

#[tokio::test]
async fn test_e2t_init_reactivates_and_replays_rans() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let mut instance = E2TInstance::new(TEST_E2T_ADDRESS, "e2term-0");
    instance.state = E2TInstanceState::RoutingManagerFailure;
    instance.associated_ran_list = vec!["gnb_a".to_string(), "gnb_b".to_string()];
    harness.rnib.insert_e2t_instance(instance).await;
    for ran in ["gnb_a", "gnb_b"] {
        harness
            .rnib
            .insert_nodeb(gnb_record(ran, ConnectionStatus::Disconnected, vec![stored_function(1, 1)]))
            .await;
    }
    let app = E2ManagerApp::start(harness.context()).await.unwrap();

    let payload = serde_json::to_vec(&E2TermInitPayload {
        address: TEST_E2T_ADDRESS.to_string(),
        pod_name: "e2term-0".to_string(),
    })
    .unwrap();
    app.notification_handle()
        .send(notification(MessageType::E2TermInit, "", Bytes::from(payload)))
        .await
        .unwrap();

    wait_for_sent(&harness.sender, MessageType::RicEndcX2SetupReq, 2)
        .await
        .unwrap();
    app.shutdown().await;

    let instance = harness.rnib.e2t_instance(TEST_E2T_ADDRESS).await.unwrap();
    assert_eq!(instance.state, E2TInstanceState::Active);
    for ran in ["gnb_a", "gnb_b"] {
        let nodeb = harness.rnib.nodeb(ran).await.unwrap();
        assert_eq!(nodeb.connection_status, ConnectionStatus::Connecting);
        assert_eq!(nodeb.connection_attempts, 1);
    }
}

#[tokio::test]
async fn test_shutdown_closes_notification_handle() {
    init_test_logging();
    let harness = TestE2mgr::start(201).await;
    let app = E2ManagerApp::start(harness.context()).await.unwrap();
    let handle = app.notification_handle();

    app.shutdown().await;

    assert!(handle.is_closed());
}
