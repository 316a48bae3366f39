use std::sync::Arc;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::card::Card;
use crate::fs::{AccessPolicy, FileSystem, OpenPolicy, ReadOnlyPolicy};

/// Messaggi di controllo: frame di un solo byte
pub const CONTROL_POWER_OFF: u8 = 0x00;
pub const CONTROL_POWER_ON: u8 = 0x01;
pub const CONTROL_RESET: u8 = 0x02;
pub const CONTROL_GET_ATR: u8 = 0x04;

/// APDU breve più lungo: intestazione, Lc, 255 byte di dati e Le
pub const MAX_FRAME_LENGTH: usize = 261;

#[derive(Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub read_only: bool,
}

/// Lettore virtuale: tutte le connessioni condividono la stessa carta
#[derive(Clone)]
pub struct Server {
    pub config: Arc<ServerConfig>,
    card: Arc<Mutex<Card>>,
}

impl Server {
    pub fn new(config: Arc<ServerConfig>) -> anyhow::Result<Self> {
        let policy: Box<dyn AccessPolicy> = if config.read_only {
            Box::new(ReadOnlyPolicy)
        } else {
            Box::new(OpenPolicy)
        };
        let fs = FileSystem::with_default_layout(policy)?;

        Ok(Self {
            config,
            card: Arc::new(Mutex::new(Card::new(fs))),
        })
    }

    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        let listener =
            TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        info!("listening on {}", listener.local_addr()?);
        Ok(listener)
    }

    /// Accetta connessioni finché il listener è valido
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (stream, peer) = listener.accept().await?;
            info!("client connected: {}", peer);

            let card = self.card.clone();
            tokio::spawn(async move {
                match handle_connection(stream, card).await {
                    Ok(()) => info!("client disconnected: {}", peer),
                    Err(e) => error!("client {}: {}", peer, e),
                }
            });
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }
}

/// Codec dei frame: lunghezza su 2 byte big-endian seguita dal contenuto
pub fn frame_codec() -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .length_field_length(2)
        .max_frame_length(MAX_FRAME_LENGTH)
        .new_codec()
}

async fn handle_connection(stream: TcpStream, card: Arc<Mutex<Card>>) -> anyhow::Result<()> {
    let mut framed = Framed::new(stream, frame_codec());

    while let Some(frame) = framed.next().await {
        let frame = frame?;

        let reply = {
            let mut card = card.lock().await;
            match &frame[..] {
                [control] => handle_control(&mut card, *control),
                apdu => {
                    debug!("C-APDU {:02X?}", apdu);
                    let reply = card.transmit(apdu);
                    debug!("R-APDU {:02X?}", reply);
                    reply
                }
            }
        };

        framed.send(Bytes::from(reply)).await?;
    }
    Ok(())
}

fn handle_control(card: &mut Card, control: u8) -> Vec<u8> {
    match control {
        CONTROL_POWER_OFF => {
            info!("power off");
            card.reset();
            Vec::new()
        }
        CONTROL_POWER_ON | CONTROL_RESET => {
            card.reset();
            card.atr().to_vec()
        }
        CONTROL_GET_ATR => card.atr().to_vec(),
        _ => {
            warn!("unknown control message {:02X}", control);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::ATR;

    type Client = Framed<TcpStream, LengthDelimitedCodec>;

    async fn start(read_only: bool) -> Client {
        let server = Server::new(Arc::new(ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            read_only,
        }))
        .unwrap();
        let listener = server.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { server.serve(listener).await });
        Framed::new(TcpStream::connect(addr).await.unwrap(), frame_codec())
    }

    async fn exchange(client: &mut Client, frame: &[u8]) -> Vec<u8> {
        client.send(Bytes::copy_from_slice(frame)).await.unwrap();
        client.next().await.unwrap().unwrap().to_vec()
    }

    #[tokio::test]
    async fn power_on_returns_atr() {
        let mut client = start(false).await;
        assert_eq!(exchange(&mut client, &[CONTROL_POWER_ON]).await, ATR.to_vec());
        assert_eq!(exchange(&mut client, &[CONTROL_GET_ATR]).await, ATR.to_vec());
        assert!(exchange(&mut client, &[CONTROL_POWER_OFF]).await.is_empty());
    }

    #[tokio::test]
    async fn apdu_round_trip() {
        let mut client = start(false).await;
        exchange(&mut client, &[CONTROL_POWER_ON]).await;

        let reply = exchange(&mut client, &[0x00, 0xA4, 0x02, 0x0C, 0x02, 0x2F, 0x00]).await;
        assert_eq!(reply, vec![0x6A, 0x86]);

        let reply = exchange(&mut client, &[0x00, 0xA4, 0x02, 0x04, 0x02, 0x2F, 0x00]).await;
        assert_eq!(&reply[reply.len() - 2..], &[0x90, 0x00]);

        let reply = exchange(&mut client, &[0x00, 0xB0, 0x00, 0x00, 0x02]).await;
        assert_eq!(reply, vec![0x61, 0x0A, 0x90, 0x00]);
    }

    #[tokio::test]
    async fn frames_carry_a_two_byte_length() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let client = start(false).await;
        let mut stream = client.into_inner();
        stream.write_all(&[0x00, 0x01, CONTROL_GET_ATR]).await.unwrap();

        let mut reply = [0u8; 2 + ATR.len()];
        stream.read_exact(&mut reply).await.unwrap();
        assert_eq!(&reply[..2], &(ATR.len() as u16).to_be_bytes());
        assert_eq!(&reply[2..], &ATR);
    }

    #[tokio::test]
    async fn read_only_card_refuses_updates() {
        let mut client = start(true).await;
        exchange(&mut client, &[0x00, 0xA4, 0x02, 0x04, 0x02, 0x2F, 0x00]).await;
        let reply = exchange(&mut client, &[0x00, 0xD6, 0x00, 0x00, 0x01, 0xFF]).await;
        assert_eq!(reply, vec![0x69, 0x82]);
    }
}
