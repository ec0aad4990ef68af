//! E2AP boundary types for nextgric
//!
//! The E2 manager never sees the wire shape of E2AP. Inbound payloads are
//! decoded once by an [`E2apCodec`] into the flat structures in
//! [`procedures`], and responses are encoded back the same way.
//!
//! # Modules
//!
//! - [`procedures`]: setup, service update, error indication, reset, causes
//! - [`codec`]: the codec trait, the tagged PDU enum and a JSON reference codec

pub mod codec;
pub mod procedures;

pub use codec::{split_address_prefix, E2apCodec, E2apCodecError, E2apPdu, JsonE2apCodec};
pub use procedures::*;
