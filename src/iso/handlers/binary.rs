use log::info;

use crate::apdu::{CommandApdu, ResponseApdu};
use crate::fs::{FileAccess, FileSystem, NodeId};
use crate::iso::IsoSession;
use crate::iso::types::*;
use crate::iso::utils::addressing::{AddressingResolver, BinaryFileRef};
use crate::iso::utils::file_locator::FileLocator;
use crate::status::{IsoError, IsoResult};

/// I comandi BINARY condividono la codifica di P1-P2
pub fn handle_binary(
    session: &mut IsoSession,
    fs: &mut FileSystem,
    apdu: &CommandApdu,
    response: &mut ResponseApdu,
) -> IsoResult<()> {
    let p12 = apdu.p12();

    let file = find_file(session, fs, apdu.ins, p12)?;
    let offset = AddressingResolver::binary_offset(apdu.ins, p12)? as usize;

    match apdu.ins & 0xFE {
        INS_READ_BINARY1 => read_binary(fs, apdu, file, offset, response),
        INS_SEARCH_BINARY1 => search_binary(fs, file),
        INS_WRITE_BINARY1 => write_binary(fs, apdu, file, offset),
        INS_UPDATE_BINARY1 => update_binary(fs, apdu, file, offset),
        INS_ERASE_BINARY1 => erase_binary(fs, file, offset),
        _ => Err(IsoError::InsNotSupported),
    }
}

/// Risolve l'EF; se diverso da quello selezionato, lo seleziona
fn find_file(
    session: &mut IsoSession,
    fs: &FileSystem,
    ins: u8,
    p12: u16,
) -> IsoResult<NodeId> {
    let locator = FileLocator::new(fs);
    let current = session.current_df(fs);
    let selected = session.state.selected_ef();

    let file = match AddressingResolver::binary_file(ins, p12) {
        BinaryFileRef::Selected => selected.ok_or(IsoError::CommandNotAllowed)?,
        BinaryFileRef::Sfi(sfi) => locator
            .child_ef_by_sfi(current, sfi)
            .ok_or(IsoError::FileNotFound)?,
        BinaryFileRef::Fid(fid) => locator.child_ef(current, fid).ok_or(IsoError::FileNotFound)?,
    };

    if selected != Some(file) {
        session.select_file(fs, file);
    }
    Ok(file)
}

/// Fine dell'intervallo richiesto; oltre 15 bit è un overflow
fn limit(offset: usize, length: usize) -> IsoResult<usize> {
    let limit = offset + length;
    if limit > i16::MAX as usize {
        return Err(IsoError::WrongLength);
    }
    Ok(limit)
}

fn read_binary(
    fs: &mut FileSystem,
    apdu: &CommandApdu,
    file: NodeId,
    offset: usize,
    response: &mut ResponseApdu,
) -> IsoResult<()> {
    let eft = fs.access_transparent(file, FileAccess::Read)?;
    let data = eft.data();

    let mut le = apdu.expected_length();

    // non oltre la fine del file
    if limit(offset, le)? >= data.len() {
        le = data.len().checked_sub(offset).ok_or(IsoError::WrongP1P2)?;
    }

    info!("READ BINARY offset {} length {}", offset, le);
    response.send(&data[offset..offset + le])
}

fn search_binary(fs: &mut FileSystem, file: NodeId) -> IsoResult<()> {
    fs.access_transparent(file, FileAccess::Read)?;
    Err(IsoError::InsNotSupported)
}

fn write_binary(
    fs: &mut FileSystem,
    apdu: &CommandApdu,
    file: NodeId,
    offset: usize,
) -> IsoResult<()> {
    let eft = fs.access_transparent(file, FileAccess::Write)?;

    // anche la scrittura che arriva esattamente all'ultimo byte è rifiutata
    if limit(offset, apdu.lc())? >= eft.len() {
        return Err(IsoError::WrongLength);
    }

    info!("WRITE BINARY offset {} length {}", offset, apdu.lc());
    eft.write_data(offset, apdu.data);
    Ok(())
}

fn update_binary(
    fs: &mut FileSystem,
    apdu: &CommandApdu,
    file: NodeId,
    offset: usize,
) -> IsoResult<()> {
    let eft = fs.access_transparent(file, FileAccess::Update)?;

    if limit(offset, apdu.lc())? >= eft.len() {
        return Err(IsoError::WrongLength);
    }

    info!("UPDATE BINARY offset {} length {}", offset, apdu.lc());
    eft.update_data(offset, apdu.data);
    Ok(())
}

fn erase_binary(fs: &mut FileSystem, file: NodeId, offset: usize) -> IsoResult<()> {
    let eft = fs.access_transparent(file, FileAccess::Update)?;

    // nessun offset finale: sempre fino alla fine del file
    let end = eft.len();
    info!("ERASE BINARY {}..{}", offset, end);
    eft.erase_data(offset, end);
    Ok(())
}
