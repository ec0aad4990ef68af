//! Wiring of the E2 manager components

use std::sync::Arc;
use std::time::Duration;

use nextgric_common::{E2mgrConfig, GlobalRicId};
use nextgric_e2ap::{E2apCodec, JsonE2apCodec};
use nextgric_rnib::RnibDataService;

use crate::app::config_loader::{global_ric_id, ConfigValidationError};
use crate::clients::RoutingManagerClient;
use crate::handlers::{
    E2ResetRequestNotificationHandler, E2SetupRequestNotificationHandler,
    E2TermInitNotificationHandler, ErrorIndicationNotificationHandler, RanLostConnectionHandler,
    RicServiceUpdateHandler,
};
use crate::managers::{
    E2TAssociationManager, E2TInstancesManager, RanConnectStatusChangeManager,
    RanDisconnectionManager, RanListManager, RanReconnectionManager, RanResetManager,
    RanSetupManager, RicServiceUpdateManager, SetupRequestPayloads,
};
use crate::services::{LoggingRanAlarmService, MessageType, RmrSender};
use crate::state::{ProcedureStateTracker, RanFunctionSnapshots};
use crate::tasks::{NotificationHandlerProvider, RanLocks};

/// Every shared component of a running E2 manager.
pub struct E2ManagerContext {
    pub global_ric_id: GlobalRicId,
    pub setup_quiet_period: Duration,
    pub e2_reset_timeout: Duration,
    pub procedure_state_ttl: Option<Duration>,

    pub rnib: Arc<dyn RnibDataService>,
    pub rm_client: Arc<dyn RoutingManagerClient>,
    pub rmr_sender: Arc<dyn RmrSender>,
    pub codec: Arc<dyn E2apCodec>,

    pub procedure_states: Arc<ProcedureStateTracker>,
    pub snapshots: Arc<RanFunctionSnapshots>,
    pub ran_locks: Arc<RanLocks>,

    pub ran_list: Arc<RanListManager>,
    pub status_change: Arc<RanConnectStatusChangeManager>,
    pub e2t_instances: Arc<E2TInstancesManager>,
    pub e2t_association: Arc<E2TAssociationManager>,
    pub ran_setup: Arc<RanSetupManager>,
    pub ran_reconnection: Arc<RanReconnectionManager>,
    pub ran_disconnection: Arc<RanDisconnectionManager>,
    pub ran_reset: Arc<RanResetManager>,
    pub ric_service_update: Arc<RicServiceUpdateManager>,
}

impl E2ManagerContext {
    pub fn new(
        config: &E2mgrConfig,
        rnib: Arc<dyn RnibDataService>,
        rm_client: Arc<dyn RoutingManagerClient>,
        rmr_sender: Arc<dyn RmrSender>,
        setup_payloads: SetupRequestPayloads,
    ) -> Result<Self, ConfigValidationError> {
        let global_ric_id = global_ric_id(config)?;

        let procedure_states = Arc::new(ProcedureStateTracker::new());
        let snapshots = Arc::new(RanFunctionSnapshots::new());

        let ran_list = Arc::new(RanListManager::new(rnib.clone()));
        let status_change = Arc::new(RanConnectStatusChangeManager::new(
            rnib.clone(),
            ran_list.clone(),
            Arc::new(LoggingRanAlarmService),
        ));
        let e2t_instances = Arc::new(E2TInstancesManager::new(rnib.clone()));
        let e2t_association = Arc::new(E2TAssociationManager::new(
            rnib.clone(),
            e2t_instances.clone(),
            rm_client.clone(),
            status_change.clone(),
        ));
        let ran_setup = Arc::new(RanSetupManager::new(
            status_change.clone(),
            rmr_sender.clone(),
            setup_payloads,
        ));
        let ran_reconnection = Arc::new(RanReconnectionManager::new(
            rnib.clone(),
            config.max_connection_attempts,
            status_change.clone(),
            ran_setup.clone(),
            e2t_association.clone(),
        ));
        let ran_disconnection = Arc::new(RanDisconnectionManager::new(
            rnib.clone(),
            status_change.clone(),
            e2t_association.clone(),
        ));
        let ran_reset = Arc::new(RanResetManager::new(rnib.clone(), status_change.clone()));
        let ric_service_update = Arc::new(RicServiceUpdateManager::new(
            rnib.clone(),
            snapshots.clone(),
        ));

        Ok(Self {
            global_ric_id,
            setup_quiet_period: config.setup_quiet_period(),
            e2_reset_timeout: config.e2_reset_timeout(),
            procedure_state_ttl: config.procedure_state_ttl(),
            rnib,
            rm_client,
            rmr_sender,
            codec: Arc::new(JsonE2apCodec),
            procedure_states,
            snapshots,
            ran_locks: Arc::new(RanLocks::new()),
            ran_list,
            status_change,
            e2t_instances,
            e2t_association,
            ran_setup,
            ran_reconnection,
            ran_disconnection,
            ran_reset,
            ric_service_update,
        })
    }

    /// Replaces the wire codec.
    pub fn with_codec(mut self, codec: Arc<dyn E2apCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Builds the handler for every inbound message type.
    pub fn handler_provider(&self) -> NotificationHandlerProvider {
        let mut provider = NotificationHandlerProvider::new();

        provider.register(
            MessageType::RicE2SetupReq,
            Arc::new(E2SetupRequestNotificationHandler::new(
                self.rnib.clone(),
                self.codec.clone(),
                self.rmr_sender.clone(),
                self.e2t_instances.clone(),
                self.e2t_association.clone(),
                self.ran_list.clone(),
                self.procedure_states.clone(),
                self.global_ric_id,
                self.setup_quiet_period,
            )),
        );
        provider.register(
            MessageType::RicServiceUpdate,
            Arc::new(RicServiceUpdateHandler::new(
                self.rnib.clone(),
                self.codec.clone(),
                self.rmr_sender.clone(),
                self.ran_list.clone(),
                self.ric_service_update.clone(),
                self.procedure_states.clone(),
            )),
        );
        provider.register(
            MessageType::RicErrorIndication,
            Arc::new(ErrorIndicationNotificationHandler::new(
                self.codec.clone(),
                self.ran_disconnection.clone(),
                self.ric_service_update.clone(),
                self.procedure_states.clone(),
            )),
        );
        provider.register(
            MessageType::RicE2ResetReq,
            Arc::new(E2ResetRequestNotificationHandler::new(
                self.codec.clone(),
                self.rmr_sender.clone(),
                self.ran_reset.clone(),
                self.e2_reset_timeout,
            )),
        );
        provider.register(
            MessageType::E2TermInit,
            Arc::new(E2TermInitNotificationHandler::new(
                self.e2t_instances.clone(),
                self.ran_reconnection.clone(),
                self.rm_client.clone(),
                self.ran_locks.clone(),
            )),
        );
        provider.register(
            MessageType::RicSctpConnectionFailure,
            Arc::new(RanLostConnectionHandler::new(self.ran_reconnection.clone())),
        );

        provider
    }
}
