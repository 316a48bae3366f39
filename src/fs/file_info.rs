/// Identificatori riservati
pub const FID_MF: u16 = 0x3F00;
pub const FID_CURRENT_DF: u16 = 0x3FFF;
pub const FID_RESERVED: u16 = 0xFFFF;

pub const DF_NAME_MAX_LENGTH: usize = 16;

/// Handle di un nodo nell'albero dei file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Stato del ciclo di vita (byte LCS)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Creation,
    Initialisation,
    Activated,
    Deactivated,
    Terminated,
}

impl Lifecycle {
    pub fn to_byte(self) -> u8 {
        match self {
            Lifecycle::Creation => 0x01,
            Lifecycle::Initialisation => 0x03,
            Lifecycle::Activated => 0x05,
            Lifecycle::Deactivated => 0x04,
            Lifecycle::Terminated => 0x0C,
        }
    }

    pub fn from_byte(lcs: u8) -> Option<Self> {
        match lcs {
            0x01 => Some(Lifecycle::Creation),
            0x03 => Some(Lifecycle::Initialisation),
            0x05 | 0x07 => Some(Lifecycle::Activated),
            0x04 | 0x06 => Some(Lifecycle::Deactivated),
            0x0C..=0x0F => Some(Lifecycle::Terminated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindType {
    Any,
    Directory,
    Elementary,
}

#[derive(Debug)]
pub struct IsoFile {
    pub fid: u16,
    pub parent: Option<NodeId>,
    pub lifecycle: Lifecycle,
    pub kind: FileKind,
}

#[derive(Debug)]
pub enum FileKind {
    Directory(DedicatedFile),
    Elementary(ElementaryFile),
}

#[derive(Debug, Default)]
pub struct DedicatedFile {
    pub name: Option<Vec<u8>>,
    pub children: Vec<NodeId>,
}

#[derive(Debug)]
pub struct ElementaryFile {
    pub sfi: Option<u8>,
    pub content: EfContent,
}

#[derive(Debug)]
pub enum EfContent {
    Transparent(TransparentData),
    Records(RecordData),
}

/// Contenuto di un EF trasparente, di dimensione dichiarata fissa
#[derive(Debug)]
pub struct TransparentData {
    data: Vec<u8>,
}

impl TransparentData {
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0u8; size],
        }
    }

    pub fn with_content(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// WRITE BINARY: OR logico con il contenuto esistente
    pub fn write_data(&mut self, offset: usize, bytes: &[u8]) {
        for (dst, src) in self.data[offset..offset + bytes.len()].iter_mut().zip(bytes) {
            *dst |= *src;
        }
    }

    /// UPDATE BINARY: sostituzione
    pub fn update_data(&mut self, offset: usize, bytes: &[u8]) {
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// ERASE BINARY: azzera da `start` a `end` escluso
    pub fn erase_data(&mut self, start: usize, end: usize) {
        let end = end.min(self.data.len());
        if start < end {
            self.data[start..end].fill(0);
        }
    }
}

/// Contenuto di un EF a record; la struttura è quella dichiarata alla creazione
#[derive(Debug)]
pub struct RecordData {
    /// Byte descrittore (tag 82), da 02 a 05
    pub descriptor: u8,
    pub max_record_size: u8,
    pub max_records: u8,
    pub records: Vec<Vec<u8>>,
}

impl IsoFile {
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, FileKind::Directory(_))
    }

    pub fn matches(&self, find: FindType) -> bool {
        match (find, &self.kind) {
            (FindType::Any, _) => true,
            (FindType::Directory, FileKind::Directory(_)) => true,
            (FindType::Elementary, FileKind::Elementary(_)) => true,
            _ => false,
        }
    }

    pub fn df_name(&self) -> Option<&[u8]> {
        match &self.kind {
            FileKind::Directory(df) => df.name.as_deref(),
            FileKind::Elementary(_) => None,
        }
    }

    pub fn sfi(&self) -> Option<u8> {
        match &self.kind {
            FileKind::Directory(_) => None,
            FileKind::Elementary(ef) => ef.sfi,
        }
    }

    /// Byte descrittore del file (tag 82)
    pub fn descriptor(&self) -> u8 {
        match &self.kind {
            FileKind::Directory(_) => 0x38,
            FileKind::Elementary(ef) => match &ef.content {
                EfContent::Transparent(_) => 0x01,
                EfContent::Records(records) => records.descriptor,
            },
        }
    }
}
