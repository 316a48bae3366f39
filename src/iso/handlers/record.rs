use log::debug;

use crate::apdu::CommandApdu;
use crate::fs::{FileAccess, FileSystem, NodeId};
use crate::iso::IsoSession;
use crate::iso::types::*;
use crate::iso::utils::addressing::{AddressingResolver, RecordFileRef};
use crate::iso::utils::file_locator::FileLocator;
use crate::status::{IsoError, IsoResult};

/// I comandi RECORD condividono la codifica dello SFI in P2
///
/// Solo l'indirizzamento è implementato: una volta individuato il file,
/// ogni comando termina con "instruction not supported".
pub fn handle_record(
    session: &mut IsoSession,
    fs: &mut FileSystem,
    apdu: &CommandApdu,
) -> IsoResult<()> {
    if apdu.ins == INS_SEARCH_RECORD {
        return Err(IsoError::InsNotSupported);
    }

    let file = find_file(session, fs, apdu.p2)?;

    match apdu.ins & 0xFE {
        INS_READ_RECORD1 => read_record(apdu),
        INS_UPDATE_RECORD1 => update_record(apdu),
        INS_WRITE_RECORD => write_record(apdu),
        INS_APPEND_RECORD => append_record(fs, apdu, file),
        INS_ERASE_RECORD => erase_record(apdu),
        _ => Err(IsoError::InsNotSupported),
    }
}

fn find_file(session: &IsoSession, fs: &FileSystem, p2: u8) -> IsoResult<NodeId> {
    match AddressingResolver::record_file(p2) {
        RecordFileRef::Selected => session.state.selected_ef().ok_or(IsoError::CommandNotAllowed),
        RecordFileRef::Sfi(sfi) => FileLocator::new(fs)
            .child_ef_by_sfi(session.current_df(fs), sfi)
            .ok_or(IsoError::FileNotFound),
    }
}

fn read_record(apdu: &CommandApdu) -> IsoResult<()> {
    let range = AddressingResolver::read_range(apdu.p1, apdu.p2)?;
    debug!("READ RECORD {:?}", range);
    Err(IsoError::InsNotSupported)
}

fn write_record(apdu: &CommandApdu) -> IsoResult<()> {
    let target = AddressingResolver::write_target(apdu.p1, apdu.p2)?;
    debug!("WRITE RECORD {:?}", target);
    Err(IsoError::InsNotSupported)
}

fn update_record(apdu: &CommandApdu) -> IsoResult<()> {
    let target = AddressingResolver::update_target(apdu.p1, apdu.p2)?;
    debug!("UPDATE RECORD {:?}", target);
    Err(IsoError::InsNotSupported)
}

fn append_record(fs: &mut FileSystem, apdu: &CommandApdu, file: NodeId) -> IsoResult<()> {
    let records = fs.access_records(file, FileAccess::Write)?;

    if apdu.p1 != 0 {
        return Err(IsoError::IncorrectP1P2);
    }

    debug!(
        "APPEND RECORD ({} of {} records)",
        records.records.len(),
        records.max_records
    );
    Err(IsoError::InsNotSupported)
}

fn erase_record(apdu: &CommandApdu) -> IsoResult<()> {
    let range = AddressingResolver::erase_range(apdu.p1, apdu.p2)?;
    debug!("ERASE RECORD {:?}", range);
    Err(IsoError::InsNotSupported)
}
