use log::{debug, info};

use crate::apdu::{CommandApdu, ResponseApdu};
use crate::fs::FileSystem;
use crate::iso::IsoSession;
use crate::status::IsoError;

/// Canali logici indirizzabili dal CLA: 4 di base e 16 estesi
pub const LOGICAL_CHANNELS: usize = 20;

/// ATR minimale: T=0 e T=1, nessun byte storico
pub const ATR: [u8; 5] = [0x3B, 0x80, 0x80, 0x01, 0x01];

/// Carta completa: un file system condiviso e una sessione per canale logico
pub struct Card {
    fs: FileSystem,
    sessions: [IsoSession; LOGICAL_CHANNELS],
    response: ResponseApdu,
}

impl Card {
    pub fn new(fs: FileSystem) -> Self {
        Self {
            fs,
            sessions: std::array::from_fn(|_| IsoSession::new()),
            response: ResponseApdu::new(),
        }
    }

    pub fn fs(&self) -> &FileSystem {
        &self.fs
    }

    pub fn session(&self, channel: usize) -> Option<&IsoSession> {
        self.sessions.get(channel)
    }

    pub fn atr(&self) -> &[u8] {
        &ATR
    }

    /// Reset a caldo o a freddo: ogni canale perde la propria selezione
    pub fn reset(&mut self) {
        info!("card reset");
        for session in self.sessions.iter_mut() {
            session.reset();
        }
    }

    /// Elabora un APDU grezzo e restituisce dati e status word
    pub fn transmit(&mut self, frame: &[u8]) -> Vec<u8> {
        let apdu = match CommandApdu::parse(frame) {
            Ok(apdu) => apdu,
            Err(e) => {
                debug!("malformed APDU {:02X?}: {}", frame, e);
                return e.sw().to_be_bytes().to_vec();
            }
        };

        let channel = apdu.logical_channel();
        let Some(session) = self.sessions.get_mut(channel) else {
            return IsoError::ClaNotSupported.sw().to_be_bytes().to_vec();
        };

        match session.process(&mut self.fs, &apdu, &mut self.response) {
            Ok(true) => self.response.to_success_bytes(),
            Ok(false) => {
                let error = if apdu.is_secure_messaging() || !apdu.is_interindustry() {
                    IsoError::ClaNotSupported
                } else {
                    IsoError::InsNotSupported
                };
                self.response.to_bytes(error.sw())
            }
            Err(e) => self.response.to_bytes(e.sw()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::OpenPolicy;

    fn card() -> Card {
        Card::new(FileSystem::with_default_layout(Box::new(OpenPolicy)).unwrap())
    }

    #[test]
    fn select_and_read_banner() {
        let mut card = card();
        let response = card.transmit(&[0x00, 0xA4, 0x08, 0x0C, 0x04, 0x50, 0x00, 0x50, 0x01]);
        // risposta proprietaria non supportata
        assert_eq!(response, vec![0x6A, 0x86]);

        let response = card.transmit(&[0x00, 0xA4, 0x08, 0x04, 0x04, 0x50, 0x00, 0x50, 0x01]);
        assert_eq!(&response[response.len() - 2..], &[0x90, 0x00]);
        assert_eq!(response[0], 0x62);

        let response = card.transmit(&[0x00, 0xB0, 0x00, 0x00, 0x0B]);
        assert_eq!(&response[..11], b"rustedbytes");
        assert_eq!(&response[11..], &[0x90, 0x00]);
    }

    #[test]
    fn unowned_commands_map_to_status_words() {
        let mut card = card();
        assert_eq!(card.transmit(&[0x00, 0x70, 0x00, 0x00]), vec![0x6D, 0x00]);
        assert_eq!(card.transmit(&[0x00, 0xCF, 0x00, 0x00]), vec![0x6D, 0x00]);
        assert_eq!(card.transmit(&[0x80, 0xA4, 0x00, 0x00]), vec![0x6E, 0x00]);
        assert_eq!(card.transmit(&[0x0C, 0xA4, 0x00, 0x00]), vec![0x6E, 0x00]);
        assert_eq!(card.transmit(&[0x00, 0xA4, 0x00]), vec![0x67, 0x00]);
    }

    #[test]
    fn channels_keep_separate_selections() {
        let mut card = card();
        card.transmit(&[0x00, 0xA4, 0x01, 0x00, 0x02, 0x50, 0x00]);
        card.transmit(&[0x01, 0xA4, 0x02, 0x00, 0x02, 0x2F, 0x00]);

        let df = card.session(0).unwrap().selected_df();
        assert_eq!(df.map(|id| card.fs().file(id).fid), Some(0x5000));
        assert_eq!(card.session(0).unwrap().selected_ef(), None);

        let ef = card.session(1).unwrap().selected_ef();
        assert_eq!(ef.map(|id| card.fs().file(id).fid), Some(0x2F00));

        // canale esteso 19
        let response = card.transmit(&[0x4F, 0xA4, 0x00, 0x00]);
        assert_eq!(&response[response.len() - 2..], &[0x90, 0x00]);
        assert!(card.session(19).unwrap().selected_df().is_some());
    }

    #[test]
    fn reset_deselects_every_channel() {
        let mut card = card();
        card.transmit(&[0x00, 0xA4, 0x01, 0x00, 0x02, 0x50, 0x00]);
        card.transmit(&[0x02, 0xA4, 0x01, 0x00, 0x02, 0x50, 0x00]);
        card.reset();
        for channel in 0..LOGICAL_CHANNELS {
            assert_eq!(card.session(channel).unwrap().selected_df(), None);
        }
        assert_eq!(card.atr(), &ATR);
    }
}
