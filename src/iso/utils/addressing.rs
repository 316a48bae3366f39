use crate::iso::types::*;
use crate::status::{IsoError, IsoResult};

/// Riferimento all'EF di un comando BINARY
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFileRef {
    Selected,
    Sfi(u8),
    Fid(u16),
}

/// Riferimento all'EF di un comando RECORD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFileRef {
    Selected,
    Sfi(u8),
}

/// Record indirizzati da READ RECORD ed ERASE RECORD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRange {
    Number(u8),
    FromNumberDown(u8),
    UpToNumber(u8),
}

/// Record indirizzato da WRITE, UPDATE e APPEND RECORD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTarget {
    First,
    Last,
    Next,
    Previous,
    Number(u8),
}

pub struct AddressingResolver;

impl AddressingResolver {
    fn is_fid_variant(ins: u8) -> bool {
        ins & 0x01 != 0
    }

    pub fn binary_file(ins: u8, p12: u16) -> BinaryFileRef {
        if Self::is_fid_variant(ins) {
            BinaryFileRef::Fid(p12 & BINARY_P12_FID_MASK)
        } else if p12 & BINARY_P12_DIRECT != 0 {
            BinaryFileRef::Sfi((p12 & BINARY_P12_SFI_MASK) as u8)
        } else {
            BinaryFileRef::Selected
        }
    }

    /// Offset iniziale; l'indirizzamento diretto per SFI parte dall'inizio del file
    pub fn binary_offset(ins: u8, p12: u16) -> IsoResult<u16> {
        if Self::is_fid_variant(ins) {
            // offset DO non supportato
            return Err(IsoError::FunctionNotSupported);
        }
        if p12 & BINARY_P12_DIRECT != 0 {
            Ok(0)
        } else {
            Ok(p12 & BINARY_P12_OFFSET_MASK)
        }
    }

    pub fn record_file(p2: u8) -> RecordFileRef {
        let sfi = (p2 >> RECORD_P2_SFI_SHIFT) & RECORD_P2_SFI_MASK;
        if sfi != 0 && sfi != RECORD_P2_SFI_CURRENT {
            RecordFileRef::Sfi(sfi)
        } else {
            RecordFileRef::Selected
        }
    }

    pub fn read_range(p1: u8, p2: u8) -> IsoResult<RecordRange> {
        match p2 & READ_RECORD_P2_SELECT_MASK {
            // ricerca per identificatore di record non supportata
            READ_RECORD_P2_SELECT_RID_FIRST
            | READ_RECORD_P2_SELECT_RID_LAST
            | READ_RECORD_P2_SELECT_RID_NEXT
            | READ_RECORD_P2_SELECT_RID_PREV => Err(IsoError::IncorrectP1P2),
            READ_RECORD_P2_SELECT_NUMBER => Ok(RecordRange::Number(p1)),
            READ_RECORD_P2_SELECT_NUMBER_DOWN => Ok(RecordRange::FromNumberDown(p1)),
            READ_RECORD_P2_SELECT_NUMBER_UP => Ok(RecordRange::UpToNumber(p1)),
            _ => Err(IsoError::IncorrectP1P2),
        }
    }

    pub fn erase_range(p1: u8, p2: u8) -> IsoResult<RecordRange> {
        match p2 & READ_RECORD_P2_SELECT_MASK {
            READ_RECORD_P2_SELECT_NUMBER => Ok(RecordRange::Number(p1)),
            READ_RECORD_P2_SELECT_NUMBER_DOWN => Ok(RecordRange::FromNumberDown(p1)),
            _ => Err(IsoError::IncorrectP1P2),
        }
    }

    pub fn write_target(p1: u8, p2: u8) -> IsoResult<RecordTarget> {
        match p2 & WRITE_RECORD_P2_SELECT_MASK {
            WRITE_RECORD_P2_SELECT_FIRST => Ok(RecordTarget::First),
            WRITE_RECORD_P2_SELECT_LAST => Ok(RecordTarget::Last),
            WRITE_RECORD_P2_SELECT_NEXT => Ok(RecordTarget::Next),
            WRITE_RECORD_P2_SELECT_PREV => Ok(RecordTarget::Previous),
            WRITE_RECORD_P2_SELECT_NUMBER => Ok(RecordTarget::Number(p1)),
            _ => Err(IsoError::IncorrectP1P2),
        }
    }

    /// UPDATE RECORD usa la stessa codifica di WRITE RECORD
    pub fn update_target(p1: u8, p2: u8) -> IsoResult<RecordTarget> {
        Self::write_target(p1, p2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_offset_addressing() {
        assert_eq!(
            AddressingResolver::binary_file(INS_READ_BINARY1, 0x0123),
            BinaryFileRef::Selected
        );
        assert_eq!(AddressingResolver::binary_offset(INS_READ_BINARY1, 0x0123), Ok(0x0123));
        assert_eq!(AddressingResolver::binary_offset(INS_READ_BINARY1, 0x7FFF), Ok(0x7FFF));
    }

    #[test]
    fn binary_direct_sfi_addressing() {
        assert_eq!(
            AddressingResolver::binary_file(INS_UPDATE_BINARY1, 0x8003),
            BinaryFileRef::Sfi(3)
        );
        assert_eq!(AddressingResolver::binary_offset(INS_UPDATE_BINARY1, 0x8003), Ok(0));
    }

    #[test]
    fn binary_fid_variant_has_no_offset() {
        assert_eq!(
            AddressingResolver::binary_file(INS_READ_BINARY2, 0xD001),
            BinaryFileRef::Fid(0x5001)
        );
        assert_eq!(
            AddressingResolver::binary_offset(INS_READ_BINARY2, 0x5001),
            Err(IsoError::FunctionNotSupported)
        );
    }

    #[test]
    fn record_sfi_sentinels() {
        assert_eq!(AddressingResolver::record_file(0x04), RecordFileRef::Selected);
        assert_eq!(AddressingResolver::record_file(0xFC), RecordFileRef::Selected);
        assert_eq!(AddressingResolver::record_file(0x14), RecordFileRef::Sfi(2));
    }

    #[test]
    fn record_modes() {
        assert_eq!(AddressingResolver::read_range(3, 0x04), Ok(RecordRange::Number(3)));
        assert_eq!(AddressingResolver::read_range(3, 0x05), Ok(RecordRange::FromNumberDown(3)));
        assert_eq!(AddressingResolver::read_range(3, 0x06), Ok(RecordRange::UpToNumber(3)));
        for rid in 0..4 {
            assert_eq!(AddressingResolver::read_range(3, rid), Err(IsoError::IncorrectP1P2));
        }
        assert_eq!(AddressingResolver::read_range(3, 0x07), Err(IsoError::IncorrectP1P2));

        assert_eq!(AddressingResolver::write_target(1, 0x02), Ok(RecordTarget::Next));
        assert_eq!(AddressingResolver::update_target(9, 0x04), Ok(RecordTarget::Number(9)));
        assert_eq!(AddressingResolver::update_target(9, 0x05), Err(IsoError::IncorrectP1P2));
        assert_eq!(AddressingResolver::erase_range(2, 0x06), Err(IsoError::IncorrectP1P2));
    }
}
