use crate::status::{IsoError, IsoResult, SW_NO_ERROR};

pub const OFFSET_CLA: usize = 0;
pub const OFFSET_INS: usize = 1;
pub const OFFSET_P1: usize = 2;
pub const OFFSET_P2: usize = 3;
pub const OFFSET_LC: usize = 4;
pub const OFFSET_CDATA: usize = 5;

/// Massima lunghezza dei dati di risposta per APDU brevi
pub const RESPONSE_MAX_LENGTH: usize = 256;

/// APDU di comando in formato breve, con riferimento al frame ricevuto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandApdu<'a> {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: &'a [u8],
    pub le: Option<usize>,
}

impl<'a> CommandApdu<'a> {
    pub fn parse(frame: &'a [u8]) -> IsoResult<Self> {
        if frame.len() < OFFSET_LC {
            return Err(IsoError::WrongLength);
        }

        let mut apdu = CommandApdu {
            cla: frame[OFFSET_CLA],
            ins: frame[OFFSET_INS],
            p1: frame[OFFSET_P1],
            p2: frame[OFFSET_P2],
            data: &[],
            le: None,
        };

        let body = &frame[OFFSET_LC..];
        match body.len() {
            // caso 1
            0 => {}
            // caso 2
            1 => apdu.le = Some(decode_le(body[0])),
            _ => {
                let lc = body[0] as usize;
                if lc == 0 {
                    return Err(IsoError::WrongLength);
                }
                let rest = &frame[OFFSET_CDATA..];
                if rest.len() == lc {
                    // caso 3
                    apdu.data = rest;
                } else if rest.len() == lc + 1 {
                    // caso 4
                    apdu.data = &rest[..lc];
                    apdu.le = Some(decode_le(rest[lc]));
                } else {
                    return Err(IsoError::WrongLength);
                }
            }
        }

        Ok(apdu)
    }

    pub fn lc(&self) -> usize {
        self.data.len()
    }

    /// P1 e P2 come valore a 16 bit
    pub fn p12(&self) -> u16 {
        u16::from_be_bytes([self.p1, self.p2])
    }

    /// Lunghezza attesa dal terminale, senza concatenazione della risposta
    pub fn expected_length(&self) -> usize {
        self.le.unwrap_or(RESPONSE_MAX_LENGTH)
    }

    pub fn is_interindustry(&self) -> bool {
        self.cla & 0x80 == 0
    }

    pub fn is_secure_messaging(&self) -> bool {
        if self.cla & 0x40 == 0 {
            self.cla & 0x0C != 0
        } else {
            self.cla & 0x20 != 0
        }
    }

    pub fn logical_channel(&self) -> usize {
        if self.cla & 0x40 == 0 {
            (self.cla & 0x03) as usize
        } else {
            4 + (self.cla & 0x0F) as usize
        }
    }
}

fn decode_le(le: u8) -> usize {
    if le == 0 { RESPONSE_MAX_LENGTH } else { le as usize }
}

/// Dati di risposta con capacità fissa, riempiti solo a comando riuscito
#[derive(Debug, Clone)]
pub struct ResponseApdu {
    data: [u8; RESPONSE_MAX_LENGTH],
    len: usize,
}

impl Default for ResponseApdu {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseApdu {
    pub fn new() -> Self {
        Self {
            data: [0u8; RESPONSE_MAX_LENGTH],
            len: 0,
        }
    }

    pub fn send(&mut self, bytes: &[u8]) -> IsoResult<()> {
        if bytes.len() > RESPONSE_MAX_LENGTH {
            return Err(IsoError::WrongLength);
        }
        self.data[..bytes.len()].copy_from_slice(bytes);
        self.len = bytes.len();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dati seguiti dalla status word
    pub fn to_bytes(&self, sw: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len + 2);
        out.extend_from_slice(self.data());
        out.extend_from_slice(&sw.to_be_bytes());
        out
    }

    pub fn to_success_bytes(&self) -> Vec<u8> {
        self.to_bytes(SW_NO_ERROR)
    }
}
