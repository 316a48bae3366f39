pub mod access;
pub mod ber;
pub mod creator;
pub mod file_info;

use log::{debug, info};

use crate::status::{IsoError, IsoResult};

pub use access::{AccessPolicy, DirectoryAccess, FileAccess, OpenPolicy, ReadOnlyPolicy};
pub use creator::FileCreator;
pub use file_info::*;

/// Albero dei file della carta, indicizzato per `NodeId`
pub struct FileSystem {
    nodes: Vec<IsoFile>,
    policy: Box<dyn AccessPolicy>,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem {
    /// File system con la sola MF
    pub fn new() -> Self {
        Self::with_policy(Box::new(OpenPolicy))
    }

    pub fn with_policy(policy: Box<dyn AccessPolicy>) -> Self {
        Self {
            nodes: vec![IsoFile {
                fid: FID_MF,
                parent: None,
                lifecycle: Lifecycle::Activated,
                kind: FileKind::Directory(DedicatedFile::default()),
            }],
            policy,
        }
    }

    pub fn set_policy(&mut self, policy: Box<dyn AccessPolicy>) {
        self.policy = policy;
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn file(&self, id: NodeId) -> &IsoFile {
        &self.nodes[id.0]
    }

    pub(crate) fn file_mut(&mut self, id: NodeId) -> &mut IsoFile {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.file(id).parent
    }

    pub fn is_directory(&self, id: NodeId) -> bool {
        self.file(id).is_directory()
    }

    pub fn children(&self, df: NodeId) -> &[NodeId] {
        match &self.file(df).kind {
            FileKind::Directory(dir) => &dir.children,
            FileKind::Elementary(_) => &[],
        }
    }

    pub fn child_by_fid(&self, df: NodeId, fid: u16, find: FindType) -> Option<NodeId> {
        self.children(df).iter().copied().find(|&child| {
            let file = self.file(child);
            file.fid == fid && file.matches(find)
        })
    }

    pub fn child_by_sfi(&self, df: NodeId, sfi: u8) -> Option<NodeId> {
        self.children(df)
            .iter()
            .copied()
            .find(|&child| self.file(child).sfi() == Some(sfi))
    }

    /// Cerca la DF stessa, i suoi figli, poi risale verso la MF
    pub fn find_upwards_by_fid(&self, df: NodeId, fid: u16) -> Option<NodeId> {
        let mut current = Some(df);
        while let Some(dir) = current {
            if self.file(dir).fid == fid {
                return Some(dir);
            }
            if let Some(child) = self.child_by_fid(dir, fid, FindType::Any) {
                return Some(child);
            }
            current = self.parent(dir);
        }
        None
    }

    /// Percorso come sequenza di FID a due byte, relativo a `df`
    pub fn find_by_path(&self, df: NodeId, path: &[u8]) -> IsoResult<Option<NodeId>> {
        if path.is_empty() || path.len() % 2 != 0 {
            return Err(IsoError::WrongLength);
        }

        let mut current = df;
        for step in path.chunks_exact(2) {
            if !self.is_directory(current) {
                return Ok(None);
            }
            let fid = u16::from_be_bytes([step[0], step[1]]);
            match self.child_by_fid(current, fid, FindType::Any) {
                Some(child) => current = child,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    pub fn find_by_df_name(&self, name: &[u8]) -> Option<NodeId> {
        if name.is_empty() {
            return None;
        }
        (0..self.nodes.len())
            .map(NodeId)
            .find(|&id| self.file(id).df_name() == Some(name))
    }

    fn check_new_child(&self, parent: NodeId, fid: u16, sfi: Option<u8>) -> IsoResult<()> {
        if !self.is_directory(parent) {
            return Err(IsoError::CommandIncompatible);
        }
        if matches!(fid, FID_MF | FID_CURRENT_DF | FID_RESERVED) {
            return Err(IsoError::IncorrectData);
        }
        if self.child_by_fid(parent, fid, FindType::Any).is_some() {
            return Err(IsoError::FileExists);
        }
        if let Some(sfi) = sfi {
            if !(1..=30).contains(&sfi) {
                return Err(IsoError::IncorrectData);
            }
            if self.child_by_sfi(parent, sfi).is_some() {
                return Err(IsoError::FileExists);
            }
        }
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, file: IsoFile) -> NodeId {
        let id = NodeId(self.nodes.len());
        debug!("attach {:04X} below {:04X}", file.fid, self.file(parent).fid);
        self.nodes.push(file);
        if let FileKind::Directory(dir) = &mut self.file_mut(parent).kind {
            dir.children.push(id);
        }
        id
    }

    pub fn add_directory(
        &mut self,
        parent: NodeId,
        fid: u16,
        name: Option<Vec<u8>>,
    ) -> IsoResult<NodeId> {
        self.check_new_child(parent, fid, None)?;
        if let Some(name) = &name {
            if name.is_empty() || name.len() > DF_NAME_MAX_LENGTH {
                return Err(IsoError::IncorrectData);
            }
            if self.find_by_df_name(name).is_some() {
                return Err(IsoError::DfNameExists);
            }
        }

        Ok(self.attach(
            parent,
            IsoFile {
                fid,
                parent: Some(parent),
                lifecycle: Lifecycle::Activated,
                kind: FileKind::Directory(DedicatedFile {
                    name,
                    children: Vec::new(),
                }),
            },
        ))
    }

    pub fn add_elementary(
        &mut self,
        parent: NodeId,
        fid: u16,
        sfi: Option<u8>,
        content: EfContent,
    ) -> IsoResult<NodeId> {
        self.check_new_child(parent, fid, sfi)?;

        Ok(self.attach(
            parent,
            IsoFile {
                fid,
                parent: Some(parent),
                lifecycle: Lifecycle::Activated,
                kind: FileKind::Elementary(ElementaryFile { sfi, content }),
            },
        ))
    }

    pub fn activate(&mut self, id: NodeId) -> IsoResult<()> {
        self.transition(id, Lifecycle::Activated)
    }

    pub fn deactivate(&mut self, id: NodeId) -> IsoResult<()> {
        self.transition(id, Lifecycle::Deactivated)
    }

    pub fn terminate(&mut self, id: NodeId) -> IsoResult<()> {
        self.transition(id, Lifecycle::Terminated)
    }

    fn transition(&mut self, id: NodeId, to: Lifecycle) -> IsoResult<()> {
        let file = self.file_mut(id);
        if file.lifecycle == Lifecycle::Terminated && to != Lifecycle::Terminated {
            return Err(IsoError::ConditionsNotSatisfied);
        }
        info!("file {:04X}: {:?} -> {:?}", file.fid, file.lifecycle, to);
        file.lifecycle = to;
        Ok(())
    }

    fn check_usable(file: &IsoFile) -> IsoResult<()> {
        match file.lifecycle {
            Lifecycle::Creation | Lifecycle::Initialisation | Lifecycle::Activated => Ok(()),
            Lifecycle::Deactivated | Lifecycle::Terminated => Err(IsoError::ConditionsNotSatisfied),
        }
    }

    pub fn access_directory(&self, df: NodeId, access: DirectoryAccess) -> IsoResult<()> {
        let file = self.file(df);
        if !file.is_directory() {
            return Err(IsoError::CommandIncompatible);
        }
        Self::check_usable(file)?;
        self.policy.authorize_directory(file, access)
    }

    pub fn access_transparent(
        &mut self,
        ef: NodeId,
        access: FileAccess,
    ) -> IsoResult<&mut TransparentData> {
        let file = self.file(ef);
        if !matches!(
            &file.kind,
            FileKind::Elementary(ElementaryFile {
                content: EfContent::Transparent(_),
                ..
            })
        ) {
            return Err(IsoError::CommandIncompatible);
        }
        Self::check_usable(file)?;
        self.policy.authorize_file(file, access)?;

        match &mut self.file_mut(ef).kind {
            FileKind::Elementary(ElementaryFile {
                content: EfContent::Transparent(data),
                ..
            }) => Ok(data),
            _ => Err(IsoError::CommandIncompatible),
        }
    }

    pub fn access_records(&mut self, ef: NodeId, access: FileAccess) -> IsoResult<&mut RecordData> {
        let file = self.file(ef);
        if !matches!(
            &file.kind,
            FileKind::Elementary(ElementaryFile {
                content: EfContent::Records(_),
                ..
            })
        ) {
            return Err(IsoError::CommandIncompatible);
        }
        Self::check_usable(file)?;
        self.policy.authorize_file(file, access)?;

        match &mut self.file_mut(ef).kind {
            FileKind::Elementary(ElementaryFile {
                content: EfContent::Records(records),
                ..
            }) => Ok(records),
            _ => Err(IsoError::CommandIncompatible),
        }
    }

    /// Struttura dimostrativa usata dal server
    pub fn with_default_layout(policy: Box<dyn AccessPolicy>) -> IsoResult<Self> {
        let mut fs = Self::with_policy(policy);
        let mf = fs.root();

        let mut dir = vec![0u8; 32];
        let template = [
            0x61, 0x0A, 0x4F, 0x06, 0xA0, 0x00, 0x00, 0x00, 0x01, 0x01, 0x50, 0x00,
        ];
        dir[..template.len()].copy_from_slice(&template);
        fs.add_elementary(
            mf,
            0x2F00,
            Some(30),
            EfContent::Transparent(TransparentData::with_content(dir)),
        )?;

        let app = fs.add_directory(mf, 0x5000, Some(vec![0xA0, 0x00, 0x00, 0x00, 0x01, 0x01]))?;

        let mut banner = vec![0u8; 64];
        let text = b"rustedbytes isofs";
        banner[..text.len()].copy_from_slice(text);
        fs.add_elementary(
            app,
            0x5001,
            Some(1),
            EfContent::Transparent(TransparentData::with_content(banner)),
        )?;
        fs.add_elementary(
            app,
            0x5002,
            Some(2),
            EfContent::Records(RecordData {
                descriptor: 0x02,
                max_record_size: 32,
                max_records: 8,
                records: Vec::new(),
            }),
        )?;

        Ok(fs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (FileSystem, NodeId, NodeId, NodeId) {
        let mut fs = FileSystem::new();
        let mf = fs.root();
        let df = fs.add_directory(mf, 0x5000, Some(b"APP".to_vec())).unwrap();
        let ef = fs
            .add_elementary(df, 0x5001, Some(1), EfContent::Transparent(TransparentData::new(8)))
            .unwrap();
        let top = fs
            .add_elementary(mf, 0x2F00, None, EfContent::Transparent(TransparentData::new(4)))
            .unwrap();
        (fs, df, ef, top)
    }

    #[test]
    fn lookup_by_fid_sfi_and_name() {
        let (fs, df, ef, _) = sample();
        assert_eq!(fs.child_by_fid(fs.root(), 0x5000, FindType::Directory), Some(df));
        assert_eq!(fs.child_by_fid(fs.root(), 0x5000, FindType::Elementary), None);
        assert_eq!(fs.child_by_sfi(df, 1), Some(ef));
        assert_eq!(fs.find_by_df_name(b"APP"), Some(df));
        assert_eq!(fs.find_by_df_name(b""), None);
    }

    #[test]
    fn upward_search_reaches_ancestor_siblings() {
        let (fs, df, ef, top) = sample();
        assert_eq!(fs.find_upwards_by_fid(df, 0x5001), Some(ef));
        assert_eq!(fs.find_upwards_by_fid(df, 0x2F00), Some(top));
        assert_eq!(fs.find_upwards_by_fid(df, 0x5000), Some(df));
        assert_eq!(fs.find_upwards_by_fid(df, 0x1234), None);
    }

    #[test]
    fn path_resolution() {
        let (fs, _, ef, _) = sample();
        assert_eq!(fs.find_by_path(fs.root(), &[0x50, 0x00, 0x50, 0x01]), Ok(Some(ef)));
        assert_eq!(fs.find_by_path(fs.root(), &[0x2F, 0x00, 0x50, 0x01]), Ok(None));
        assert_eq!(fs.find_by_path(fs.root(), &[0x50]), Err(IsoError::WrongLength));
        assert_eq!(fs.find_by_path(fs.root(), &[]), Err(IsoError::WrongLength));
    }

    #[test]
    fn duplicate_identifiers_are_refused() {
        let (mut fs, df, _, _) = sample();
        assert_eq!(
            fs.add_directory(fs.root(), 0x5000, None),
            Err(IsoError::FileExists)
        );
        assert_eq!(
            fs.add_directory(fs.root(), 0x6000, Some(b"APP".to_vec())),
            Err(IsoError::DfNameExists)
        );
        assert_eq!(
            fs.add_elementary(df, 0x5002, Some(1), EfContent::Transparent(TransparentData::new(1))),
            Err(IsoError::FileExists)
        );
        assert_eq!(
            fs.add_directory(fs.root(), FID_MF, None),
            Err(IsoError::IncorrectData)
        );
    }

    #[test]
    fn terminated_files_stay_terminated() {
        let (mut fs, _, ef, _) = sample();
        fs.deactivate(ef).unwrap();
        assert_eq!(
            fs.access_transparent(ef, FileAccess::Read).map(|_| ()),
            Err(IsoError::ConditionsNotSatisfied)
        );
        fs.activate(ef).unwrap();
        assert!(fs.access_transparent(ef, FileAccess::Read).is_ok());

        fs.terminate(ef).unwrap();
        assert_eq!(fs.activate(ef), Err(IsoError::ConditionsNotSatisfied));
        assert_eq!(fs.file(ef).lifecycle, Lifecycle::Terminated);
    }

    #[test]
    fn wrong_structure_is_incompatible() {
        let (mut fs, df, ef, _) = sample();
        assert_eq!(
            fs.access_records(ef, FileAccess::Read).map(|_| ()),
            Err(IsoError::CommandIncompatible)
        );
        assert_eq!(
            fs.access_transparent(df, FileAccess::Read).map(|_| ()),
            Err(IsoError::CommandIncompatible)
        );
    }

    #[test]
    fn read_only_policy_blocks_updates() {
        let (mut fs, df, ef, _) = sample();
        fs.set_policy(Box::new(ReadOnlyPolicy));
        assert!(fs.access_transparent(ef, FileAccess::Read).is_ok());
        assert_eq!(
            fs.access_transparent(ef, FileAccess::Update).map(|_| ()),
            Err(IsoError::SecurityStatusNotSatisfied)
        );
        assert_eq!(
            fs.access_directory(df, DirectoryAccess::CreateEf),
            Err(IsoError::SecurityStatusNotSatisfied)
        );
    }

    #[test]
    fn default_layout_is_consistent() {
        let fs = FileSystem::with_default_layout(Box::new(OpenPolicy)).unwrap();
        let app = fs.find_by_df_name(&[0xA0, 0x00, 0x00, 0x00, 0x01, 0x01]).unwrap();
        assert_eq!(fs.file(app).fid, 0x5000);
        assert!(fs.child_by_sfi(app, 1).is_some());
        assert!(fs.child_by_sfi(app, 2).is_some());
        assert!(fs.child_by_sfi(fs.root(), 30).is_some());
    }
}
