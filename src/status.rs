use thiserror::Error;

pub const SW_NO_ERROR: u16 = 0x9000;

/// Esito negativo di un comando, codificato come status word ISO 7816-4
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IsoError {
    #[error("wrong length")]
    WrongLength,

    #[error("command incompatible with file structure")]
    CommandIncompatible,

    #[error("security status not satisfied")]
    SecurityStatusNotSatisfied,

    #[error("conditions of use not satisfied")]
    ConditionsNotSatisfied,

    /// Nessun EF corrente
    #[error("command not allowed")]
    CommandNotAllowed,

    #[error("incorrect parameters in the data field")]
    IncorrectData,

    #[error("function not supported")]
    FunctionNotSupported,

    #[error("file or application not found")]
    FileNotFound,

    #[error("incorrect parameters P1-P2")]
    IncorrectP1P2,

    #[error("file already exists")]
    FileExists,

    #[error("DF name already exists")]
    DfNameExists,

    #[error("wrong parameters P1-P2")]
    WrongP1P2,

    #[error("instruction code not supported")]
    InsNotSupported,

    #[error("class not supported")]
    ClaNotSupported,
}

impl IsoError {
    pub fn sw(self) -> u16 {
        match self {
            IsoError::WrongLength => 0x6700,
            IsoError::CommandIncompatible => 0x6981,
            IsoError::SecurityStatusNotSatisfied => 0x6982,
            IsoError::ConditionsNotSatisfied => 0x6985,
            IsoError::CommandNotAllowed => 0x6986,
            IsoError::IncorrectData => 0x6A80,
            IsoError::FunctionNotSupported => 0x6A81,
            IsoError::FileNotFound => 0x6A82,
            IsoError::IncorrectP1P2 => 0x6A86,
            IsoError::FileExists => 0x6A89,
            IsoError::DfNameExists => 0x6A8A,
            IsoError::WrongP1P2 => 0x6B00,
            IsoError::InsNotSupported => 0x6D00,
            IsoError::ClaNotSupported => 0x6E00,
        }
    }
}

pub type IsoResult<T> = Result<T, IsoError>;
