use crate::fs::ber::BerWriter;
use crate::fs::{EfContent, FileKind, FileSystem, IsoFile, NodeId};
use crate::status::IsoResult;

const TAG_FCI: u8 = 0x6F;
const TAG_FCP: u8 = 0x62;
const TAG_FMD: u8 = 0x64;
const TAG_SIZE: u8 = 0x80;
const TAG_DESCRIPTOR: u8 = 0x82;
const TAG_FID: u8 = 0x83;
const TAG_DF_NAME: u8 = 0x84;
const TAG_SFI: u8 = 0x88;
const TAG_LIFECYCLE: u8 = 0x8A;

/// Struttura richiesta in P2 di SELECT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnFormat {
    Fci,
    Fcp,
    Fmd,
}

/// Costruisce le risposte FCI/FCP/FMD di un file
pub struct ResponseBuilder;

impl ResponseBuilder {
    pub fn write(
        fs: &FileSystem,
        file: NodeId,
        format: ReturnFormat,
        writer: &mut BerWriter,
    ) -> IsoResult<()> {
        let file = fs.file(file);
        match format {
            ReturnFormat::Fci => Self::write_fci(file, writer),
            ReturnFormat::Fcp => Self::write_fcp(file, writer),
            ReturnFormat::Fmd => Self::write_fmd(file, writer),
        }
    }

    pub fn write_fci(file: &IsoFile, writer: &mut BerWriter) -> IsoResult<()> {
        writer.begin_constructed(TAG_FCI)?;
        Self::write_fcp(file, writer)?;
        Self::write_fmd(file, writer)?;
        writer.end_constructed()
    }

    pub fn write_fcp(file: &IsoFile, writer: &mut BerWriter) -> IsoResult<()> {
        writer.begin_constructed(TAG_FCP)?;
        match &file.kind {
            FileKind::Directory(df) => {
                writer.primitive_u8(TAG_DESCRIPTOR, file.descriptor())?;
                writer.primitive_u16(TAG_FID, file.fid)?;
                if let Some(name) = &df.name {
                    writer.primitive(TAG_DF_NAME, name)?;
                }
            }
            FileKind::Elementary(ef) => {
                match &ef.content {
                    EfContent::Transparent(data) => {
                        writer.primitive_u8(TAG_DESCRIPTOR, file.descriptor())?;
                        writer.primitive_u16(TAG_FID, file.fid)?;
                        writer.primitive_u16(TAG_SIZE, data.len() as u16)?;
                    }
                    EfContent::Records(records) => {
                        writer.primitive(
                            TAG_DESCRIPTOR,
                            &[
                                file.descriptor(),
                                0x21,
                                0x00,
                                records.max_record_size,
                                records.max_records,
                            ],
                        )?;
                        writer.primitive_u16(TAG_FID, file.fid)?;
                    }
                }
                match ef.sfi {
                    Some(sfi) => writer.primitive_u8(TAG_SFI, sfi << 3)?,
                    None => writer.primitive(TAG_SFI, &[])?,
                }
            }
        }
        writer.primitive_u8(TAG_LIFECYCLE, file.lifecycle.to_byte())?;
        writer.end_constructed()
    }

    pub fn write_fmd(file: &IsoFile, writer: &mut BerWriter) -> IsoResult<()> {
        writer.begin_constructed(TAG_FMD)?;
        if let Some(name) = file.df_name() {
            writer.primitive(TAG_DF_NAME, name)?;
        }
        writer.end_constructed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::ber::BER_MAX_LENGTH;
    use crate::fs::{RecordData, TransparentData};

    fn render(fs: &FileSystem, file: NodeId, format: ReturnFormat) -> Vec<u8> {
        let mut writer = BerWriter::new();
        writer.begin(BER_MAX_LENGTH);
        ResponseBuilder::write(fs, file, format, &mut writer).unwrap();
        writer.finish().unwrap().to_vec()
    }

    #[test]
    fn fcp_of_the_mf() {
        let fs = FileSystem::new();
        assert_eq!(
            render(&fs, fs.root(), ReturnFormat::Fcp),
            vec![0x62, 0x0A, 0x82, 0x01, 0x38, 0x83, 0x02, 0x3F, 0x00, 0x8A, 0x01, 0x05]
        );
    }

    #[test]
    fn fcp_of_a_transparent_ef() {
        let mut fs = FileSystem::new();
        let ef = fs
            .add_elementary(fs.root(), 0x2F00, Some(30), EfContent::Transparent(TransparentData::new(0x20)))
            .unwrap();
        assert_eq!(
            render(&fs, ef, ReturnFormat::Fcp),
            vec![
                0x62, 0x11, 0x82, 0x01, 0x01, 0x83, 0x02, 0x2F, 0x00, 0x80, 0x02, 0x00, 0x20,
                0x88, 0x01, 0xF0, 0x8A, 0x01, 0x05
            ]
        );
    }

    #[test]
    fn fcp_of_a_record_ef_carries_record_size() {
        let mut fs = FileSystem::new();
        let ef = fs
            .add_elementary(
                fs.root(),
                0x2F01,
                None,
                EfContent::Records(RecordData {
                    descriptor: 0x02,
                    max_record_size: 0x10,
                    max_records: 4,
                    records: vec![vec![0x01]],
                }),
            )
            .unwrap();
        let fcp = render(&fs, ef, ReturnFormat::Fcp);
        assert_eq!(&fcp[2..9], &[0x82, 0x05, 0x02, 0x21, 0x00, 0x10, 0x04]);
        assert!(fcp.windows(2).any(|w| w == [0x88, 0x00]));
    }

    #[test]
    fn fci_wraps_fcp_and_fmd() {
        let mut fs = FileSystem::new();
        let df = fs.add_directory(fs.root(), 0x5000, Some(vec![0xA0, 0x01])).unwrap();
        let fci = render(&fs, df, ReturnFormat::Fci);
        assert_eq!(fci[0], 0x6F);
        assert_eq!(fci[1] as usize, fci.len() - 2);
        assert_eq!(fci[2], 0x62);
        assert_eq!(&fci[fci.len() - 6..], &[0x64, 0x04, 0x84, 0x02, 0xA0, 0x01]);

        assert_eq!(
            render(&fs, df, ReturnFormat::Fmd),
            vec![0x64, 0x04, 0x84, 0x02, 0xA0, 0x01]
        );
    }
}
