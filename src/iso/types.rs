//! Codici di istruzione e layout dei bit di P1/P2 (ISO 7816-4)

pub const INS_SELECT: u8 = 0xA4;
pub const INS_CREATE_FILE: u8 = 0xE0;
pub const INS_DELETE: u8 = 0xE4;
pub const INS_ACTIVATE: u8 = 0x44;
pub const INS_DEACTIVATE: u8 = 0x04;
pub const INS_TERMINATE: u8 = 0xE6;
pub const INS_TERMINATE_EF: u8 = 0xE8;

pub const INS_READ_BINARY1: u8 = 0xB0;
pub const INS_READ_BINARY2: u8 = 0xB1;
pub const INS_SEARCH_BINARY1: u8 = 0xA0;
pub const INS_SEARCH_BINARY2: u8 = 0xA1;
pub const INS_WRITE_BINARY1: u8 = 0xD0;
pub const INS_WRITE_BINARY2: u8 = 0xD1;
pub const INS_UPDATE_BINARY1: u8 = 0xD6;
pub const INS_UPDATE_BINARY2: u8 = 0xD7;
pub const INS_ERASE_BINARY1: u8 = 0x0E;
pub const INS_ERASE_BINARY2: u8 = 0x0F;

pub const INS_ACTIVATE_RECORD: u8 = 0x08;
pub const INS_DEACTIVATE_RECORD: u8 = 0x06;
pub const INS_READ_RECORD1: u8 = 0xB2;
pub const INS_READ_RECORD2: u8 = 0xB3;
pub const INS_SEARCH_RECORD: u8 = 0xA2;
pub const INS_WRITE_RECORD: u8 = 0xD2;
pub const INS_UPDATE_RECORD1: u8 = 0xDC;
pub const INS_UPDATE_RECORD2: u8 = 0xDD;
pub const INS_APPEND_RECORD: u8 = 0xE2;
pub const INS_ERASE_RECORD: u8 = 0x0C;

pub const INS_GET_DATA: u8 = 0xCA;
pub const INS_PUT_DATA: u8 = 0xDA;
pub const INS_MANAGE_DATA: u8 = 0xCF;

// SELECT
pub const SELECT_P1_SELECT_MF_DF_EF: u8 = 0x00;
pub const SELECT_P1_SELECT_CHILD_DF: u8 = 0x01;
pub const SELECT_P1_SELECT_CHILD_EF: u8 = 0x02;
pub const SELECT_P1_SELECT_PARENT: u8 = 0x03;
pub const SELECT_P1_SELECT_DFNAME: u8 = 0x04;
pub const SELECT_P1_SELECT_PATH_MF: u8 = 0x08;
pub const SELECT_P1_SELECT_PATH_DF: u8 = 0x09;

pub const SELECT_P2_ITERATE_MASK: u8 = 0x03;
pub const SELECT_P2_ITERATE_FIRST: u8 = 0x00;
pub const SELECT_P2_RETURN_MASK: u8 = 0x0C;
pub const SELECT_P2_RETURN_FCI: u8 = 0x00;
pub const SELECT_P2_RETURN_FCP: u8 = 0x04;
pub const SELECT_P2_RETURN_FMD: u8 = 0x08;
pub const SELECT_P2_RETURN_PROPRIETARY: u8 = 0x0C;
pub const SELECT_P2_RESERVED_MASK: u8 = 0xF0;
pub const SELECT_P2_RESERVED_OKAY: u8 = 0x00;

// DELETE, ACTIVATE, DEACTIVATE, TERMINATE
pub const LIFECYCLE_P1_TYPE_MASK: u8 = 0xF0;
pub const LIFECYCLE_P1_TYPE_FILE: u8 = 0x00;
pub const LIFECYCLE_P1_SELECT_MASK: u8 = 0x0F;
pub const LIFECYCLE_P1_SELECT_FILE_SELECTED: u8 = 0x00;
pub const LIFECYCLE_P1_SELECT_FILE_CHILD_DF: u8 = 0x01;
pub const LIFECYCLE_P1_SELECT_FILE_CHILD_EF: u8 = 0x02;
pub const LIFECYCLE_P1_SELECT_FILE_DFNAME: u8 = 0x04;
pub const LIFECYCLE_P1_SELECT_FILE_PATH_MF: u8 = 0x08;
pub const LIFECYCLE_P1_SELECT_FILE_PATH_DF: u8 = 0x09;

// BINARY
pub const BINARY_P12_DIRECT: u16 = 0x8000;
pub const BINARY_P12_SFI_MASK: u16 = 0x001F;
pub const BINARY_P12_OFFSET_MASK: u16 = 0x7FFF;
pub const BINARY_P12_FID_MASK: u16 = 0x7FFF;

// RECORD
pub const RECORD_P2_SFI_SHIFT: u8 = 3;
pub const RECORD_P2_SFI_MASK: u8 = 0x1F;
pub const RECORD_P2_SFI_CURRENT: u8 = 0x1F;

pub const READ_RECORD_P2_SELECT_MASK: u8 = 0x07;
pub const READ_RECORD_P2_SELECT_RID_FIRST: u8 = 0x00;
pub const READ_RECORD_P2_SELECT_RID_LAST: u8 = 0x01;
pub const READ_RECORD_P2_SELECT_RID_NEXT: u8 = 0x02;
pub const READ_RECORD_P2_SELECT_RID_PREV: u8 = 0x03;
pub const READ_RECORD_P2_SELECT_NUMBER: u8 = 0x04;
pub const READ_RECORD_P2_SELECT_NUMBER_DOWN: u8 = 0x05;
pub const READ_RECORD_P2_SELECT_NUMBER_UP: u8 = 0x06;

pub const WRITE_RECORD_P2_SELECT_MASK: u8 = 0x07;
pub const WRITE_RECORD_P2_SELECT_FIRST: u8 = 0x00;
pub const WRITE_RECORD_P2_SELECT_LAST: u8 = 0x01;
pub const WRITE_RECORD_P2_SELECT_NEXT: u8 = 0x02;
pub const WRITE_RECORD_P2_SELECT_PREV: u8 = 0x03;
pub const WRITE_RECORD_P2_SELECT_NUMBER: u8 = 0x04;
