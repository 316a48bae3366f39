use log::debug;

use crate::apdu::CommandApdu;
use crate::status::{IsoError, IsoResult};

pub fn handle_get_data(apdu: &CommandApdu) -> IsoResult<()> {
    debug!("GET DATA tag {:04X}", apdu.p12());
    Err(IsoError::InsNotSupported)
}

pub fn handle_put_data(apdu: &CommandApdu) -> IsoResult<()> {
    debug!("PUT DATA tag {:04X}", apdu.p12());
    Err(IsoError::InsNotSupported)
}
