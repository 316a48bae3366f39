use log::info;

use crate::status::{IsoError, IsoResult};

use super::FileSystem;
use super::ber::TlvHandler;
use super::file_info::{
    DF_NAME_MAX_LENGTH, EfContent, Lifecycle, NodeId, RecordData, TransparentData,
};

const TAG_FCP: u16 = 0x62;
const TAG_SIZE: u16 = 0x80;
const TAG_DESCRIPTOR: u16 = 0x82;
const TAG_FID: u16 = 0x83;
const TAG_DF_NAME: u16 = 0x84;
const TAG_SFI: u16 = 0x88;
const TAG_LIFECYCLE: u16 = 0x8A;

const DESCRIPTOR_DF: u8 = 0x38;
const DESCRIPTOR_EF_MASK: u8 = 0x38;
const DESCRIPTOR_STRUCTURE_MASK: u8 = 0x07;

/// Attributi del nuovo file raccolti dal template FCP
#[derive(Debug, Default)]
struct Staged {
    seen_template: bool,
    descriptor: Option<u8>,
    max_record_size: u8,
    max_records: u8,
    fid: Option<u16>,
    name: Option<Vec<u8>>,
    size: Option<u16>,
    sfi: Option<u8>,
    lifecycle: Option<Lifecycle>,
}

/// Creazione di un file sotto una DF, in due fasi: parsing e materializzazione
#[derive(Debug)]
pub struct FileCreator {
    parent: NodeId,
    staged: Staged,
}

impl FileCreator {
    pub fn prepare(parent: NodeId) -> Self {
        Self {
            parent,
            staged: Staged::default(),
        }
    }

    pub fn is_creating_df(&self) -> IsoResult<bool> {
        if !self.staged.seen_template {
            return Err(IsoError::IncorrectData);
        }
        match self.staged.descriptor {
            Some(descriptor) => Ok(descriptor & DESCRIPTOR_DF == DESCRIPTOR_DF),
            None => Err(IsoError::IncorrectData),
        }
    }

    fn ef_content(&self, descriptor: u8) -> IsoResult<EfContent> {
        if descriptor & DESCRIPTOR_EF_MASK > 0x08 {
            return Err(IsoError::IncorrectData);
        }
        match descriptor & DESCRIPTOR_STRUCTURE_MASK {
            0x01 => {
                let size = self.staged.size.ok_or(IsoError::IncorrectData)?;
                Ok(EfContent::Transparent(TransparentData::new(size as usize)))
            }
            0x02..=0x05 => {
                if self.staged.max_record_size == 0 {
                    return Err(IsoError::IncorrectData);
                }
                Ok(EfContent::Records(RecordData {
                    descriptor,
                    max_record_size: self.staged.max_record_size,
                    max_records: self.staged.max_records,
                    records: Vec::new(),
                }))
            }
            _ => Err(IsoError::IncorrectData),
        }
    }

    /// Materializza il file nell'albero
    pub fn create(self, fs: &mut FileSystem) -> IsoResult<NodeId> {
        let fid = self.staged.fid.ok_or(IsoError::IncorrectData)?;
        let lifecycle = self.staged.lifecycle.unwrap_or(Lifecycle::Activated);

        let node = if self.is_creating_df()? {
            fs.add_directory(self.parent, fid, self.staged.name.clone())?
        } else {
            let descriptor = self.staged.descriptor.ok_or(IsoError::IncorrectData)?;
            let content = self.ef_content(descriptor)?;
            fs.add_elementary(self.parent, fid, self.staged.sfi, content)?
        };
        fs.file_mut(node).lifecycle = lifecycle;

        info!("created file {:04X} (lifecycle {:?})", fid, lifecycle);
        Ok(node)
    }
}

impl TlvHandler for FileCreator {
    fn handle_begin_constructed(&mut self, depth: usize, tag: u16) -> IsoResult<()> {
        if depth == 0 {
            if tag != TAG_FCP || self.staged.seen_template {
                return Err(IsoError::IncorrectData);
            }
            self.staged.seen_template = true;
        }
        Ok(())
    }

    fn handle_primitive(&mut self, depth: usize, tag: u16, value: &[u8]) -> IsoResult<()> {
        match depth {
            0 => return Err(IsoError::IncorrectData),
            1 => {}
            // attributi di sicurezza e simili: ignorati
            _ => return Ok(()),
        }

        match (tag, value) {
            (TAG_DESCRIPTOR, [descriptor]) => self.staged.descriptor = Some(*descriptor),
            (TAG_DESCRIPTOR, [descriptor, _coding, size_hi, size_lo, count]) => {
                if *size_hi != 0 {
                    return Err(IsoError::IncorrectData);
                }
                self.staged.descriptor = Some(*descriptor);
                self.staged.max_record_size = *size_lo;
                self.staged.max_records = *count;
            }
            (TAG_FID, [hi, lo]) => self.staged.fid = Some(u16::from_be_bytes([*hi, *lo])),
            (TAG_DF_NAME, name) if !name.is_empty() && name.len() <= DF_NAME_MAX_LENGTH => {
                self.staged.name = Some(name.to_vec())
            }
            (TAG_SIZE, [size]) => self.staged.size = Some(*size as u16),
            (TAG_SIZE, [hi, lo]) => self.staged.size = Some(u16::from_be_bytes([*hi, *lo])),
            (TAG_SFI, []) => self.staged.sfi = None,
            (TAG_SFI, [sfi]) => self.staged.sfi = Some(*sfi >> 3),
            (TAG_LIFECYCLE, [lcs]) => {
                self.staged.lifecycle =
                    Some(Lifecycle::from_byte(*lcs).ok_or(IsoError::IncorrectData)?)
            }
            (
                TAG_DESCRIPTOR | TAG_FID | TAG_DF_NAME | TAG_SIZE | TAG_SFI | TAG_LIFECYCLE,
                _,
            ) => return Err(IsoError::IncorrectData),
            _ => {}
        }
        Ok(())
    }
}
