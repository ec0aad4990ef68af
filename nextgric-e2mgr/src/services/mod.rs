//! Services consumed by the managers: outbound transport and alarms.

mod alarm;
mod rmr_sender;

pub use alarm::{LoggingRanAlarmService, RanAlarmService};
pub use rmr_sender::{ChannelRmrSender, MessageType, RmrMessage, RmrSender, TransportError};
