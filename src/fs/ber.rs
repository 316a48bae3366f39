use crate::apdu::ResponseApdu;
use crate::status::{IsoError, IsoResult};

/// Dimensione massima di una struttura TLV prodotta in risposta
pub const BER_MAX_LENGTH: usize = 256;

const MAX_DEPTH: usize = 4;

/// Scrittore BER-TLV su buffer fisso, con template annidati
pub struct BerWriter {
    buf: [u8; BER_MAX_LENGTH],
    len: usize,
    limit: usize,
    stack: [usize; MAX_DEPTH],
    depth: usize,
}

impl Default for BerWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BerWriter {
    pub fn new() -> Self {
        Self {
            buf: [0u8; BER_MAX_LENGTH],
            len: 0,
            limit: BER_MAX_LENGTH,
            stack: [0; MAX_DEPTH],
            depth: 0,
        }
    }

    pub fn begin(&mut self, limit: usize) {
        self.len = 0;
        self.depth = 0;
        self.limit = limit.min(BER_MAX_LENGTH);
    }

    fn put(&mut self, byte: u8) -> IsoResult<()> {
        if self.len >= self.limit {
            return Err(IsoError::WrongLength);
        }
        self.buf[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    fn put_length(&mut self, length: usize) -> IsoResult<()> {
        if length < 0x80 {
            self.put(length as u8)
        } else if length <= 0xFF {
            self.put(0x81)?;
            self.put(length as u8)
        } else {
            self.put(0x82)?;
            self.put((length >> 8) as u8)?;
            self.put(length as u8)
        }
    }

    pub fn begin_constructed(&mut self, tag: u8) -> IsoResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(IsoError::WrongLength);
        }
        self.put(tag)?;
        // lunghezza provvisoria, corretta in end_constructed
        self.put(0)?;
        self.stack[self.depth] = self.len;
        self.depth += 1;
        Ok(())
    }

    pub fn end_constructed(&mut self) -> IsoResult<()> {
        if self.depth == 0 {
            return Err(IsoError::IncorrectData);
        }
        self.depth -= 1;
        let start = self.stack[self.depth];
        let content = self.len - start;

        let extra = match content {
            0..=0x7F => 0,
            0x80..=0xFF => 1,
            _ => 2,
        };
        if self.len + extra > self.limit {
            return Err(IsoError::WrongLength);
        }
        if extra > 0 {
            self.buf.copy_within(start..self.len, start + extra);
            self.len += extra;
        }

        match extra {
            0 => self.buf[start - 1] = content as u8,
            1 => {
                self.buf[start - 1] = 0x81;
                self.buf[start] = content as u8;
            }
            _ => {
                self.buf[start - 1] = 0x82;
                self.buf[start] = (content >> 8) as u8;
                self.buf[start + 1] = content as u8;
            }
        }
        Ok(())
    }

    pub fn primitive(&mut self, tag: u8, value: &[u8]) -> IsoResult<()> {
        self.put(tag)?;
        self.put_length(value.len())?;
        if self.len + value.len() > self.limit {
            return Err(IsoError::WrongLength);
        }
        self.buf[self.len..self.len + value.len()].copy_from_slice(value);
        self.len += value.len();
        Ok(())
    }

    pub fn primitive_u8(&mut self, tag: u8, value: u8) -> IsoResult<()> {
        self.primitive(tag, &[value])
    }

    pub fn primitive_u16(&mut self, tag: u8, value: u16) -> IsoResult<()> {
        self.primitive(tag, &value.to_be_bytes())
    }

    pub fn finish(&self) -> IsoResult<&[u8]> {
        if self.depth != 0 {
            return Err(IsoError::IncorrectData);
        }
        Ok(&self.buf[..self.len])
    }

    pub fn finish_and_send(&self, response: &mut ResponseApdu) -> IsoResult<()> {
        response.send(self.finish()?)
    }
}

/// Destinatario degli oggetti letti da `BerReader`
pub trait TlvHandler {
    fn handle_begin_constructed(&mut self, depth: usize, tag: u16) -> IsoResult<()>;

    fn handle_primitive(&mut self, depth: usize, tag: u16, value: &[u8]) -> IsoResult<()>;
}

/// Lettore BER-TLV senza allocazioni
#[derive(Debug, Default, Clone, Copy)]
pub struct BerReader;

impl BerReader {
    pub fn parse<H: TlvHandler>(&self, data: &[u8], handler: &mut H) -> IsoResult<()> {
        Self::parse_level(data, 0, handler)
    }

    fn parse_level<H: TlvHandler>(mut data: &[u8], depth: usize, handler: &mut H) -> IsoResult<()> {
        if depth >= MAX_DEPTH {
            return Err(IsoError::IncorrectData);
        }
        while !data.is_empty() {
            let (tag, constructed, rest) = Self::read_tag(data)?;
            let (length, rest) = Self::read_length(rest)?;
            if rest.len() < length {
                return Err(IsoError::IncorrectData);
            }
            let (value, rest) = rest.split_at(length);
            if constructed {
                handler.handle_begin_constructed(depth, tag)?;
                Self::parse_level(value, depth + 1, handler)?;
            } else {
                handler.handle_primitive(depth, tag, value)?;
            }
            data = rest;
        }
        Ok(())
    }

    fn read_tag(data: &[u8]) -> IsoResult<(u16, bool, &[u8])> {
        let first = data[0];
        let constructed = first & 0x20 != 0;
        if first & 0x1F != 0x1F {
            return Ok((first as u16, constructed, &data[1..]));
        }
        // tag su due byte
        match data.get(1) {
            Some(&second) if second & 0x80 == 0 => {
                Ok((u16::from_be_bytes([first, second]), constructed, &data[2..]))
            }
            _ => Err(IsoError::IncorrectData),
        }
    }

    fn read_length(data: &[u8]) -> IsoResult<(usize, &[u8])> {
        match data {
            [len, rest @ ..] if *len < 0x80 => Ok((*len as usize, rest)),
            [0x81, len, rest @ ..] => Ok((*len as usize, rest)),
            [0x82, hi, lo, rest @ ..] => Ok((u16::from_be_bytes([*hi, *lo]) as usize, rest)),
            _ => Err(IsoError::IncorrectData),
        }
    }
}
