//! Identity types shared across the E2 manager
//!
//! PLMN identity in its 3GPP packed form and the controller's own global
//! near-RT RIC identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Maximum value of the 20-bit near-RT RIC id.
pub const MAX_RIC_ID: u32 = 0xF_FFFF;

/// Public Land Mobile Network identifier.
///
/// The `long_mnc` field indicates whether the MNC uses 3 digits (true) or 2 digits (false).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Plmn {
    /// Mobile Country Code (3 digits, range 0-999)
    pub mcc: u16,
    /// Mobile Network Code (2-3 digits, range 0-999)
    pub mnc: u16,
    /// True if MNC is 3 digits, false if 2 digits
    pub long_mnc: bool,
}

impl Plmn {
    /// Creates a new PLMN with the given MCC and MNC.
    pub const fn new(mcc: u16, mnc: u16, long_mnc: bool) -> Self {
        Self { mcc, mnc, long_mnc }
    }

    /// Parses a PLMN from its decimal digit strings.
    ///
    /// The MNC length is taken from the number of digits given.
    pub fn from_digits(mcc: &str, mnc: &str) -> Result<Self, Error> {
        let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if mcc.len() != 3 || !all_digits(mcc) {
            return Err(Error::InvalidIdentity(format!("MCC must be 3 digits, got '{mcc}'")));
        }
        if !(2..=3).contains(&mnc.len()) || !all_digits(mnc) {
            return Err(Error::InvalidIdentity(format!("MNC must be 2-3 digits, got '{mnc}'")));
        }
        let mcc = mcc
            .parse::<u16>()
            .map_err(|e| Error::InvalidIdentity(e.to_string()))?;
        let long_mnc = mnc.len() == 3;
        let mnc = mnc
            .parse::<u16>()
            .map_err(|e| Error::InvalidIdentity(e.to_string()))?;
        Ok(Self::new(mcc, mnc, long_mnc))
    }

    /// Encodes the PLMN to 3GPP format (3 bytes).
    ///
    /// - Byte 0: MCC digit 2 (high nibble) | MCC digit 1 (low nibble)
    /// - Byte 1: MNC digit 3 or 0xF (high nibble) | MCC digit 3 (low nibble)
    /// - Byte 2: MNC digit 2 (high nibble) | MNC digit 1 (low nibble)
    pub fn encode(&self) -> [u8; 3] {
        let mcc3 = (self.mcc % 10) as u8;
        let mcc2 = ((self.mcc % 100) / 10) as u8;
        let mcc1 = ((self.mcc % 1000) / 100) as u8;

        let (mnc1, mnc2, mnc3) = if self.long_mnc {
            (
                ((self.mnc % 1000) / 100) as u8,
                ((self.mnc % 100) / 10) as u8,
                (self.mnc % 10) as u8,
            )
        } else {
            (((self.mnc % 100) / 10) as u8, (self.mnc % 10) as u8, 0x0F)
        };

        [(mcc2 << 4) | mcc1, (mnc3 << 4) | mcc3, (mnc2 << 4) | mnc1]
    }

    /// Decodes a PLMN from 3GPP format (3 bytes).
    pub fn decode(bytes: [u8; 3]) -> Self {
        let [octet1, octet2, octet3] = bytes;

        let mcc1 = (octet1 & 0x0F) as u16;
        let mcc2 = ((octet1 >> 4) & 0x0F) as u16;
        let mcc3 = (octet2 & 0x0F) as u16;
        let mcc = 100 * mcc1 + 10 * mcc2 + mcc3;

        let mnc3 = (octet2 >> 4) & 0x0F;
        let mnc1 = (octet3 & 0x0F) as u16;
        let mnc2 = ((octet3 >> 4) & 0x0F) as u16;

        if mnc3 != 0x0F {
            Self::new(mcc, 100 * mnc1 + 10 * mnc2 + mnc3 as u16, true)
        } else {
            Self::new(mcc, 10 * mnc1 + mnc2, false)
        }
    }

    /// Returns the packed form as a lowercase hex string, as stored in RAN records.
    pub fn to_hex(&self) -> String {
        hex::encode(self.encode())
    }

    /// Parses the packed hex form produced by [`Plmn::to_hex`].
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = hex::decode(s).map_err(|e| Error::InvalidIdentity(e.to_string()))?;
        let packed: [u8; 3] = bytes
            .try_into()
            .map_err(|_| Error::InvalidIdentity(format!("PLMN '{s}' is not 3 octets")))?;
        Ok(Self::decode(packed))
    }
}

impl fmt::Display for Plmn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.long_mnc {
            write!(f, "{:03}-{:03}", self.mcc, self.mnc)
        } else {
            write!(f, "{:03}-{:02}", self.mcc, self.mnc)
        }
    }
}

/// Global identity of this near-RT RIC, sent in every E2 setup response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalRicId {
    /// Controller PLMN
    pub plmn: Plmn,
    /// 20-bit near-RT RIC id
    pub ric_id: u32,
}

impl GlobalRicId {
    /// Builds the id from configuration values: a hex RIC id and PLMN digits.
    pub fn parse(ric_id_hex: &str, mcc: &str, mnc: &str) -> Result<Self, Error> {
        let ric_id = u32::from_str_radix(ric_id_hex, 16)
            .map_err(|e| Error::InvalidIdentity(format!("RIC id '{ric_id_hex}': {e}")))?;
        if ric_id > MAX_RIC_ID {
            return Err(Error::InvalidIdentity(format!(
                "RIC id '{ric_id_hex}' exceeds 20 bits"
            )));
        }
        Ok(Self {
            plmn: Plmn::from_digits(mcc, mnc)?,
            ric_id,
        })
    }

    /// RIC id as the 20-character bit string carried on the wire.
    pub fn ric_id_bits(&self) -> String {
        format!("{:020b}", self.ric_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plmn_encode_two_digit_mnc() {
        let plmn = Plmn::new(208, 93, false);
        assert_eq!(plmn.encode(), [0x02, 0xf8, 0x39]);
        assert_eq!(Plmn::decode(plmn.encode()), plmn);
    }

    #[test]
    fn test_plmn_encode_three_digit_mnc() {
        let plmn = Plmn::new(310, 410, true);
        assert_eq!(Plmn::decode(plmn.encode()), plmn);
    }

    #[test]
    fn test_plmn_hex() {
        let plmn = Plmn::from_digits("208", "92").unwrap();
        assert_eq!(plmn.to_hex(), "02f829");
        assert_eq!(Plmn::from_hex("02f829").unwrap(), plmn);
        assert!(Plmn::from_hex("02f8").is_err());
    }

    #[test]
    fn test_plmn_from_digits_rejects_bad_input() {
        assert!(Plmn::from_digits("20", "92").is_err());
        assert!(Plmn::from_digits("208", "9").is_err());
        assert!(Plmn::from_digits("2a8", "92").is_err());
    }

    #[test]
    fn test_plmn_display() {
        assert_eq!(Plmn::new(1, 1, false).to_string(), "001-01");
        assert_eq!(Plmn::new(310, 410, true).to_string(), "310-410");
    }

    #[test]
    fn test_global_ric_id_bits() {
        let id = GlobalRicId::parse("AACCE", "310", "410").unwrap();
        assert_eq!(id.ric_id, 0xAACCE);
        assert_eq!(id.ric_id_bits(), "10101010110011001110");
        assert_eq!(id.ric_id_bits().len(), 20);
    }

    #[test]
    fn test_global_ric_id_rejects_wide_id() {
        assert!(GlobalRicId::parse("1FFFFF", "310", "410").is_err());
        assert!(GlobalRicId::parse("XYZ", "310", "410").is_err());
    }
}
