//! Error Indication handling
//!
//! Works out which completed procedure the RAN is complaining about and
//! unwinds it. The criticality diagnostics are consulted first; when they
//! do not name a successful outcome, the last procedure state recorded for
//! the RAN decides.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use nextgric_common::{log_e2ap_message, Direction};
use nextgric_e2ap::{
    split_address_prefix, E2apCodec, E2apCodecError, ErrorIndication, ProcedureCode,
};
use tracing::{debug, error, info};

use crate::handlers::{NotificationHandler, NotificationRequest};
use crate::managers::{RanDisconnectionManager, RicServiceUpdateManager};
use crate::state::{ProcedureState, ProcedureStateTracker};

/// What to do about an error indication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Disconnect the RAN
    Disconnect,
    /// Restore the functions stored before the last service update
    RevertFunctions,
    /// Nothing to unwind
    None,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryAction::Disconnect => write!(f, "disconnect"),
            RecoveryAction::RevertFunctions => write!(f, "revert-functions"),
            RecoveryAction::None => write!(f, "none"),
        }
    }
}

impl RecoveryAction {
    /// Picks the action for an indication, falling back to `tracked` when
    /// the diagnostics do not identify a successful outcome.
    pub fn resolve(indication: &ErrorIndication, tracked: Option<ProcedureState>) -> Self {
        if let Some(code) = indication.failed_successful_outcome() {
            return match ProcedureCode::from_value(code) {
                Some(ProcedureCode::E2Setup) => RecoveryAction::Disconnect,
                Some(ProcedureCode::RicServiceUpdate) => RecoveryAction::RevertFunctions,
                _ => {
                    info!("Error indication for procedure code {}, no action", code);
                    RecoveryAction::None
                }
            };
        }
        Self::from_procedure_state(tracked)
    }

    pub fn from_procedure_state(tracked: Option<ProcedureState>) -> Self {
        match tracked {
            Some(ProcedureState::SetupCompleted) => RecoveryAction::Disconnect,
            Some(ProcedureState::ServiceUpdateCompleted) => RecoveryAction::RevertFunctions,
            Some(ProcedureState::SetupFailure) | Some(ProcedureState::ServiceUpdateFailure) => {
                debug!("Error indication arrived after a failed procedure, ignoring");
                RecoveryAction::None
            }
            other => {
                info!("No completed procedure to unwind (state {:?})", other);
                RecoveryAction::None
            }
        }
    }
}

pub struct ErrorIndicationNotificationHandler {
    codec: Arc<dyn E2apCodec>,
    disconnection: Arc<RanDisconnectionManager>,
    service_update: Arc<RicServiceUpdateManager>,
    procedure_states: Arc<ProcedureStateTracker>,
}

impl ErrorIndicationNotificationHandler {
    pub fn new(
        codec: Arc<dyn E2apCodec>,
        disconnection: Arc<RanDisconnectionManager>,
        service_update: Arc<RicServiceUpdateManager>,
        procedure_states: Arc<ProcedureStateTracker>,
    ) -> Self {
        Self {
            codec,
            disconnection,
            service_update,
            procedure_states,
        }
    }
}

/// Decodes the payload as is, and only when that fails as `address|pdu`.
fn decode_indication(
    codec: &dyn E2apCodec,
    payload: &[u8],
) -> Result<ErrorIndication, E2apCodecError> {
    match codec.decode_error_indication(payload) {
        Ok(indication) => Ok(indication),
        Err(e) => match split_address_prefix(payload) {
            Ok((_, pdu)) => codec.decode_error_indication(pdu),
            Err(_) => Err(e),
        },
    }
}

#[async_trait]
impl NotificationHandler for ErrorIndicationNotificationHandler {
    async fn handle(&self, request: &NotificationRequest) {
        let ran_name = request.ran_name.as_str();
        log_e2ap_message(Direction::Rx, "ErrorIndication", ran_name, &request.payload);

        let indication = match decode_indication(self.codec.as_ref(), &request.payload) {
            Ok(indication) => indication,
            Err(e) => {
                error!("RAN {}: failed decoding Error Indication: {}", ran_name, e);
                return;
            }
        };
        debug!("RAN {}: Error Indication {:?}", ran_name, indication);

        let tracked = self.procedure_states.get(ran_name).await;
        let action = RecoveryAction::resolve(&indication, tracked);
        info!("RAN {}: error indication recovery action {}", ran_name, action);

        let result = match action {
            RecoveryAction::Disconnect => self.disconnection.disconnect_ran(ran_name).await,
            RecoveryAction::RevertFunctions => {
                self.service_update.revert_ran_functions(ran_name).await
            }
            RecoveryAction::None => Ok(()),
        };
        if let Err(e) = result {
            error!("RAN {}: recovery action {} failed: {}", ran_name, action, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextgric_e2ap::{CriticalityDiagnostics, E2apPdu, JsonE2apCodec, TriggeringMessage};

    fn indication(code: Option<u8>, trigger: Option<TriggeringMessage>) -> ErrorIndication {
        ErrorIndication {
            transaction_id: Some(1),
            ran_function_id: None,
            cause: None,
            criticality_diagnostics: Some(CriticalityDiagnostics {
                procedure_code: code,
                triggering_message: trigger,
                procedure_criticality: None,
                ies_criticality_diagnostics: Vec::new(),
            }),
        }
    }

    #[test]
    fn test_diagnostics_take_precedence() {
        let setup = indication(
            Some(ProcedureCode::E2Setup.value()),
            Some(TriggeringMessage::SuccessfulOutcome),
        );
        assert_eq!(
            RecoveryAction::resolve(&setup, Some(ProcedureState::ServiceUpdateCompleted)),
            RecoveryAction::Disconnect
        );

        let update = indication(
            Some(ProcedureCode::RicServiceUpdate.value()),
            Some(TriggeringMessage::SuccessfulOutcome),
        );
        assert_eq!(
            RecoveryAction::resolve(&update, None),
            RecoveryAction::RevertFunctions
        );
    }

    #[test]
    fn test_other_procedure_code_does_not_fall_back() {
        let reset = indication(
            Some(ProcedureCode::Reset.value()),
            Some(TriggeringMessage::SuccessfulOutcome),
        );
        assert_eq!(
            RecoveryAction::resolve(&reset, Some(ProcedureState::SetupCompleted)),
            RecoveryAction::None
        );
    }

    #[test]
    fn test_unusable_diagnostics_fall_back_to_tracker() {
        let initiating = indication(
            Some(ProcedureCode::E2Setup.value()),
            Some(TriggeringMessage::InitiatingMessage),
        );
        assert_eq!(
            RecoveryAction::resolve(&initiating, Some(ProcedureState::ServiceUpdateCompleted)),
            RecoveryAction::RevertFunctions
        );

        let bare = ErrorIndication::default();
        assert_eq!(
            RecoveryAction::resolve(&bare, Some(ProcedureState::SetupCompleted)),
            RecoveryAction::Disconnect
        );
    }

    #[test]
    fn test_tracker_states() {
        assert_eq!(
            RecoveryAction::from_procedure_state(Some(ProcedureState::SetupFailure)),
            RecoveryAction::None
        );
        assert_eq!(
            RecoveryAction::from_procedure_state(Some(ProcedureState::ServiceUpdateFailure)),
            RecoveryAction::None
        );
        assert_eq!(
            RecoveryAction::from_procedure_state(Some(ProcedureState::Ongoing)),
            RecoveryAction::None
        );
        assert_eq!(RecoveryAction::from_procedure_state(None), RecoveryAction::None);
    }

    fn encoded(indication: ErrorIndication) -> Vec<u8> {
        JsonE2apCodec
            .encode(&E2apPdu::ErrorIndication(indication))
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_decode_keeps_separator_inside_payload() {
        let expected = indication(
            Some(ProcedureCode::E2Setup.value()),
            Some(TriggeringMessage::SuccessfulOutcome),
        );
        let mut json: serde_json::Value = serde_json::from_slice(&encoded(expected.clone())).unwrap();
        json["value"]["note"] = serde_json::json!("lost|link");
        let payload = serde_json::to_vec(&json).unwrap();

        let decoded = decode_indication(&JsonE2apCodec, &payload).unwrap();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_decode_strips_address_prefix() {
        let expected = indication(None, None);
        let mut payload = b"10.0.2.15:38000|".to_vec();
        payload.extend(encoded(expected.clone()));

        assert_eq!(decode_indication(&JsonE2apCodec, &payload).unwrap(), expected);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_indication(&JsonE2apCodec, b"not|an indication").is_err());
    }
}
