use log::{debug, info, warn};

use crate::apdu::{CommandApdu, ResponseApdu};
use crate::fs::ber::{BerReader, BerWriter};
use crate::fs::{FileKind, FileSystem, NodeId};
use crate::status::IsoResult;

use super::{SelectionState, handlers, types::*};

/// Sessione ISO 7816-4 legata a un canale logico
///
/// Contiene lo stato di selezione del canale e i buffer TLV, allocati una volta
/// sola alla creazione. Il file system non appartiene alla sessione: viene
/// passato a ogni comando, così più canali possono condividerlo.
pub struct IsoSession {
    pub(crate) state: SelectionState,
    pub(crate) writer: BerWriter,
    pub(crate) reader: BerReader,
}

impl Default for IsoSession {
    fn default() -> Self {
        Self::new()
    }
}

impl IsoSession {
    pub fn new() -> Self {
        Self {
            state: SelectionState::default(),
            writer: BerWriter::new(),
            reader: BerReader,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected_df(&self) -> Option<NodeId> {
        self.state.selected_df()
    }

    pub fn selected_ef(&self) -> Option<NodeId> {
        self.state.selected_ef()
    }

    /// Deselezione del canale
    pub fn reset(&mut self) {
        debug!("session reset");
        self.state.reset();
    }

    /// DF corrente; prima di qualsiasi selezione vale la MF
    pub(crate) fn current_df(&self, fs: &FileSystem) -> NodeId {
        self.state.selected_df().unwrap_or_else(|| fs.root())
    }

    pub(crate) fn select_file(&mut self, fs: &FileSystem, file: NodeId) {
        match &fs.file(file).kind {
            FileKind::Directory(_) => self.state.select_directory(file),
            FileKind::Elementary(_) => {
                let parent = fs.parent(file).unwrap_or_else(|| fs.root());
                self.state.select_elementary(file, parent);
            }
        }
        debug!("selected {:04X}", fs.file(file).fid);
    }

    /// Elabora un comando; `Ok(false)` se il comando non appartiene a questa sessione
    pub fn process(
        &mut self,
        fs: &mut FileSystem,
        apdu: &CommandApdu,
        response: &mut ResponseApdu,
    ) -> IsoResult<bool> {
        response.clear();

        // solo APDU senza secure messaging
        if apdu.is_secure_messaging() {
            debug!("CLA {:02X}: secure messaging not handled", apdu.cla);
            return Ok(false);
        }

        // solo comandi interindustry
        if !apdu.is_interindustry() {
            debug!("CLA {:02X}: not interindustry", apdu.cla);
            return Ok(false);
        }

        info!(
            "INS {:02X} P1 {:02X} P2 {:02X} Lc {}",
            apdu.ins,
            apdu.p1,
            apdu.p2,
            apdu.lc()
        );

        let result = match apdu.ins {
            INS_SELECT => handlers::select::handle_select(self, fs, apdu, response),
            INS_CREATE_FILE => handlers::create::handle_create_file(self, fs, apdu),
            INS_DELETE => handlers::lifecycle::handle_delete(self, fs, apdu),
            INS_ACTIVATE => handlers::lifecycle::handle_activate(self, fs, apdu),
            INS_DEACTIVATE => handlers::lifecycle::handle_deactivate(self, fs, apdu),
            INS_TERMINATE => handlers::lifecycle::handle_terminate(self, fs, apdu),
            INS_TERMINATE_EF => handlers::lifecycle::handle_terminate_ef(self, fs, apdu),
            INS_READ_BINARY1 | INS_READ_BINARY2 | INS_SEARCH_BINARY1 | INS_SEARCH_BINARY2
            | INS_WRITE_BINARY1 | INS_WRITE_BINARY2 | INS_UPDATE_BINARY1
            | INS_UPDATE_BINARY2 | INS_ERASE_BINARY1 | INS_ERASE_BINARY2 => {
                handlers::binary::handle_binary(self, fs, apdu, response)
            }
            INS_READ_RECORD1 | INS_READ_RECORD2 | INS_SEARCH_RECORD | INS_UPDATE_RECORD1
            | INS_UPDATE_RECORD2 | INS_WRITE_RECORD | INS_APPEND_RECORD | INS_ERASE_RECORD => {
                handlers::record::handle_record(self, fs, apdu)
            }
            INS_GET_DATA => handlers::data::handle_get_data(apdu),
            INS_PUT_DATA => handlers::data::handle_put_data(apdu),
            INS_ACTIVATE_RECORD | INS_DEACTIVATE_RECORD | INS_MANAGE_DATA => return Ok(false),
            _ => return Ok(false),
        };

        match result {
            Ok(()) => Ok(true),
            Err(e) => {
                // nessuna risposta parziale
                response.clear();
                warn!("INS {:02X} failed: {} ({:04X})", apdu.ins, e, e.sw());
                Err(e)
            }
        }
    }
}
