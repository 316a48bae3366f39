use log::debug;

use crate::fs::{FID_MF, FileSystem, FindType, NodeId};
use crate::status::{IsoError, IsoResult};

/// Legge un FID a due byte dal campo dati, che deve essere lungo esattamente 2
pub fn read_fid(data: &[u8]) -> IsoResult<u16> {
    match data {
        [hi, lo] => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(IsoError::WrongLength),
    }
}

/// Ricerca dei file nell'albero per conto dei gestori dei comandi
pub struct FileLocator<'a> {
    fs: &'a FileSystem,
}

impl<'a> FileLocator<'a> {
    pub fn new(fs: &'a FileSystem) -> Self {
        Self { fs }
    }

    pub fn root(&self) -> NodeId {
        self.fs.root()
    }

    pub fn parent(&self, file: NodeId) -> Option<NodeId> {
        self.fs.parent(file)
    }

    /// FID cercato a partire dalla DF corrente verso la MF; 3F00 indica sempre la MF
    pub fn by_fid_upwards(&self, df: NodeId, fid: u16) -> Option<NodeId> {
        if fid == FID_MF {
            return Some(self.fs.root());
        }
        self.fs.find_upwards_by_fid(df, fid)
    }

    pub fn child_df(&self, df: NodeId, fid: u16) -> Option<NodeId> {
        self.fs.child_by_fid(df, fid, FindType::Directory)
    }

    pub fn child_ef(&self, df: NodeId, fid: u16) -> Option<NodeId> {
        self.fs.child_by_fid(df, fid, FindType::Elementary)
    }

    pub fn child_ef_by_sfi(&self, df: NodeId, sfi: u8) -> Option<NodeId> {
        self.fs
            .child_by_sfi(df, sfi)
            .filter(|&ef| !self.fs.is_directory(ef))
    }

    pub fn by_df_name(&self, name: &[u8]) -> Option<NodeId> {
        self.fs.find_by_df_name(name)
    }

    pub fn by_path_from_root(&self, path: &[u8]) -> IsoResult<Option<NodeId>> {
        self.by_path_from(self.fs.root(), path)
    }

    pub fn by_path_from(&self, df: NodeId, path: &[u8]) -> IsoResult<Option<NodeId>> {
        let found = self.fs.find_by_path(df, path)?;
        debug!("path {:02X?} -> {:?}", path, found);
        Ok(found)
    }
}
