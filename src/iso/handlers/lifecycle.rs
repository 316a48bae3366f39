use log::info;

use crate::apdu::CommandApdu;
use crate::fs::{FileSystem, NodeId};
use crate::iso::IsoSession;
use crate::iso::types::*;
use crate::iso::utils::file_locator::{FileLocator, read_fid};
use crate::status::{IsoError, IsoResult};

/// Individua il file indirizzato da P1 per DELETE, ACTIVATE, DEACTIVATE e TERMINATE
fn find_file(session: &IsoSession, fs: &FileSystem, apdu: &CommandApdu) -> IsoResult<NodeId> {
    if apdu.p1 & LIFECYCLE_P1_TYPE_MASK != LIFECYCLE_P1_TYPE_FILE {
        return Err(IsoError::WrongP1P2);
    }
    if apdu.p2 != 0 {
        return Err(IsoError::WrongP1P2);
    }

    let locator = FileLocator::new(fs);
    let current = session.current_df(fs);

    let found = match apdu.p1 & LIFECYCLE_P1_SELECT_MASK {
        // senza selezione vale la DF corrente, cioè la MF
        LIFECYCLE_P1_SELECT_FILE_SELECTED => session.state.selected().or(Some(current)),
        LIFECYCLE_P1_SELECT_FILE_CHILD_DF => locator.child_df(current, read_fid(apdu.data)?),
        LIFECYCLE_P1_SELECT_FILE_CHILD_EF => locator.child_ef(current, read_fid(apdu.data)?),
        LIFECYCLE_P1_SELECT_FILE_DFNAME => locator.by_df_name(apdu.data),
        LIFECYCLE_P1_SELECT_FILE_PATH_MF => locator.by_path_from_root(apdu.data)?,
        LIFECYCLE_P1_SELECT_FILE_PATH_DF => locator.by_path_from(current, apdu.data)?,
        _ => return Err(IsoError::WrongP1P2),
    };
    found.ok_or(IsoError::FileNotFound)
}

/// DELETE FILE: individua il file e riseleziona la DF madre.
///
/// La rimozione del nodo non è ancora implementata.
// TODO: rimuovere il nodo tramite il file system dopo il controllo di accesso
pub fn handle_delete(
    session: &mut IsoSession,
    fs: &mut FileSystem,
    apdu: &CommandApdu,
) -> IsoResult<()> {
    let file = find_file(session, fs, apdu)?;
    let parent = fs.parent(file).ok_or(IsoError::ConditionsNotSatisfied)?;
    info!("DELETE {:04X}: selecting parent", fs.file(file).fid);
    session.select_file(fs, parent);
    Ok(())
}

pub fn handle_activate(
    session: &mut IsoSession,
    fs: &mut FileSystem,
    apdu: &CommandApdu,
) -> IsoResult<()> {
    let file = find_file(session, fs, apdu)?;
    fs.activate(file)
}

pub fn handle_deactivate(
    session: &mut IsoSession,
    fs: &mut FileSystem,
    apdu: &CommandApdu,
) -> IsoResult<()> {
    let file = find_file(session, fs, apdu)?;
    fs.deactivate(file)
}

pub fn handle_terminate(
    session: &mut IsoSession,
    fs: &mut FileSystem,
    apdu: &CommandApdu,
) -> IsoResult<()> {
    let file = find_file(session, fs, apdu)?;
    fs.terminate(file)
}

pub fn handle_terminate_ef(
    session: &mut IsoSession,
    fs: &mut FileSystem,
    apdu: &CommandApdu,
) -> IsoResult<()> {
    let file = find_file(session, fs, apdu)?;
    if fs.is_directory(file) {
        return Err(IsoError::ConditionsNotSatisfied);
    }
    fs.terminate(file)
}
