use log::warn;

use crate::status::{IsoError, IsoResult};

use super::file_info::IsoFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryAccess {
    CreateDf,
    CreateEf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAccess {
    Read,
    Write,
    Update,
}

/// Politica di controllo degli accessi consultata dal file system
pub trait AccessPolicy: Send {
    fn authorize_directory(&self, df: &IsoFile, access: DirectoryAccess) -> IsoResult<()>;

    fn authorize_file(&self, ef: &IsoFile, access: FileAccess) -> IsoResult<()>;
}

/// Consente tutto
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenPolicy;

impl AccessPolicy for OpenPolicy {
    fn authorize_directory(&self, _df: &IsoFile, _access: DirectoryAccess) -> IsoResult<()> {
        Ok(())
    }

    fn authorize_file(&self, _ef: &IsoFile, _access: FileAccess) -> IsoResult<()> {
        Ok(())
    }
}

/// Consente solo la lettura
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadOnlyPolicy;

impl AccessPolicy for ReadOnlyPolicy {
    fn authorize_directory(&self, df: &IsoFile, access: DirectoryAccess) -> IsoResult<()> {
        warn!("read-only card: {:?} refused below {:04X}", access, df.fid);
        Err(IsoError::SecurityStatusNotSatisfied)
    }

    fn authorize_file(&self, ef: &IsoFile, access: FileAccess) -> IsoResult<()> {
        match access {
            FileAccess::Read => Ok(()),
            FileAccess::Write | FileAccess::Update => {
                warn!("read-only card: {:?} refused on {:04X}", access, ef.fid);
                Err(IsoError::SecurityStatusNotSatisfied)
            }
        }
    }
}
