use clap::Parser;
use log::LevelFilter;

/// Configurazione da linea di comando
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Indirizzo IP su cui ascoltare
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Porta su cui ascoltare
    #[arg(short, long, default_value = "35963")]
    pub port: u16,

    /// Livello di log (off, error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Rifiuta creazione e modifica dei file
    #[arg(long)]
    pub read_only: bool,
}
