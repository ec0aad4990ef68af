//! E2AP Procedures
//!
//! Flat message structures for the procedures the E2 manager takes part in.

pub mod cause;
pub mod e2_setup;
pub mod error_indication;
pub mod reset;
pub mod ric_service_update;

pub use cause::*;
pub use e2_setup::*;
pub use error_indication::*;
pub use reset::*;
pub use ric_service_update::*;

use std::fmt;

use serde::{Deserialize, Serialize};

/// E2AP elementary procedure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcedureCode {
    E2Setup,
    ErrorIndication,
    Reset,
    RicControl,
    RicIndication,
    RicServiceQuery,
    RicServiceUpdate,
    RicSubscription,
    RicSubscriptionDelete,
    E2NodeConfigurationUpdate,
    E2ConnectionUpdate,
}

impl ProcedureCode {
    /// Numeric procedure code.
    pub fn value(&self) -> u8 {
        match self {
            ProcedureCode::E2Setup => 1,
            ProcedureCode::ErrorIndication => 2,
            ProcedureCode::Reset => 3,
            ProcedureCode::RicControl => 4,
            ProcedureCode::RicIndication => 5,
            ProcedureCode::RicServiceQuery => 6,
            ProcedureCode::RicServiceUpdate => 7,
            ProcedureCode::RicSubscription => 8,
            ProcedureCode::RicSubscriptionDelete => 9,
            ProcedureCode::E2NodeConfigurationUpdate => 10,
            ProcedureCode::E2ConnectionUpdate => 11,
        }
    }

    /// Maps a numeric code back, `None` for codes this crate does not know.
    pub fn from_value(value: u8) -> Option<Self> {
        let code = match value {
            1 => ProcedureCode::E2Setup,
            2 => ProcedureCode::ErrorIndication,
            3 => ProcedureCode::Reset,
            4 => ProcedureCode::RicControl,
            5 => ProcedureCode::RicIndication,
            6 => ProcedureCode::RicServiceQuery,
            7 => ProcedureCode::RicServiceUpdate,
            8 => ProcedureCode::RicSubscription,
            9 => ProcedureCode::RicSubscriptionDelete,
            10 => ProcedureCode::E2NodeConfigurationUpdate,
            11 => ProcedureCode::E2ConnectionUpdate,
            _ => return None,
        };
        Some(code)
    }
}

impl fmt::Display for ProcedureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.value())
    }
}
