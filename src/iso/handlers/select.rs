use log::info;

use crate::apdu::{CommandApdu, ResponseApdu};
use crate::fs::FileSystem;
use crate::fs::ber::BER_MAX_LENGTH;
use crate::iso::IsoSession;
use crate::iso::types::*;
use crate::iso::utils::file_locator::{FileLocator, read_fid};
use crate::iso::utils::metadata::{ResponseBuilder, ReturnFormat};
use crate::status::{IsoError, IsoResult};

fn return_format(p2: u8) -> IsoResult<ReturnFormat> {
    match p2 & SELECT_P2_RETURN_MASK {
        SELECT_P2_RETURN_FCI => Ok(ReturnFormat::Fci),
        SELECT_P2_RETURN_FCP => Ok(ReturnFormat::Fcp),
        SELECT_P2_RETURN_FMD => Ok(ReturnFormat::Fmd),
        // risposta proprietaria non supportata
        _ => Err(IsoError::IncorrectP1P2),
    }
}

pub fn handle_select(
    session: &mut IsoSession,
    fs: &FileSystem,
    apdu: &CommandApdu,
    response: &mut ResponseApdu,
) -> IsoResult<()> {
    let p2 = apdu.p2;

    // solo "first or only occurrence"
    if p2 & SELECT_P2_ITERATE_MASK != SELECT_P2_ITERATE_FIRST {
        return Err(IsoError::IncorrectP1P2);
    }
    let format = return_format(p2)?;
    if p2 & SELECT_P2_RESERVED_MASK != SELECT_P2_RESERVED_OKAY {
        return Err(IsoError::IncorrectP1P2);
    }

    let locator = FileLocator::new(fs);
    let current = session.current_df(fs);

    let selected = match apdu.p1 {
        SELECT_P1_SELECT_MF_DF_EF => match apdu.lc() {
            0 => Some(locator.root()),
            2 => locator.by_fid_upwards(current, read_fid(apdu.data)?),
            _ => return Err(IsoError::WrongLength),
        },
        SELECT_P1_SELECT_CHILD_DF => locator.child_df(current, read_fid(apdu.data)?),
        SELECT_P1_SELECT_CHILD_EF => locator.child_ef(current, read_fid(apdu.data)?),
        SELECT_P1_SELECT_PARENT => locator.parent(current),
        SELECT_P1_SELECT_DFNAME => locator.by_df_name(apdu.data),
        SELECT_P1_SELECT_PATH_MF => locator.by_path_from_root(apdu.data)?,
        SELECT_P1_SELECT_PATH_DF => locator.by_path_from(current, apdu.data)?,
        _ => return Err(IsoError::IncorrectP1P2),
    };
    let selected = selected.ok_or(IsoError::FileNotFound)?;

    session.select_file(fs, selected);
    info!("SELECT {:04X} ({:?})", fs.file(selected).fid, format);

    session.writer.begin(BER_MAX_LENGTH);
    ResponseBuilder::write(fs, selected, format, &mut session.writer)?;
    session.writer.finish_and_send(response)
}
