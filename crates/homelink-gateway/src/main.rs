//! The homelink gateway binary.
//!
//! Loads the configuration, wires the concrete collaborators into the
//! pipeline, and runs until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use homelink_common::{GatewayConfig, HardwareLink, PayloadCipher};
use homelink_gateway::{
    ChaChaPayloadCipher, CloudTransportFactory, Gateway, GatewayDeps, GatewayError,
    HardwareLinkFactory, JsonlArchive, SysfsGpio, TcpSerialBridge,
};

#[derive(Parser, Debug)]
#[command(name = "homelink", about = "Home-automation gateway bridging a cloud broker and 433MHz hardware")]
struct Args {
    /// Path to the gateway configuration file.
    #[arg(short, long)]
    config: PathBuf,

    /// Log filter, e.g. "info" or "homelink_gateway=debug".
    #[arg(long, default_value = "info")]
    log_filter: String,
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_filter))
        .init();

    if let Err(fault) = run(&args) {
        error!(error = %fault, "gateway failed");
        eprintln!("homelink: {fault}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), GatewayError> {
    let config = GatewayConfig::from_file(&args.config)?;
    info!(config = %args.config.display(), "configuration loaded");

    let archive = Box::new(JsonlArchive::create(&config.archive.dir)?);
    let cipher: Arc<dyn PayloadCipher> =
        Arc::new(ChaChaPayloadCipher::from_hex_key(&config.cloud.secret_key)?);
    let make_cloud_transport = cloud_transport_factory(&config)?;

    let device_address = config.hardware.device_address.clone();
    let make_hardware_link: HardwareLinkFactory = Box::new(move || {
        Box::new(TcpSerialBridge::new(device_address.clone())) as Box<dyn HardwareLink>
    });

    let gateway = Gateway::start(
        &config,
        GatewayDeps {
            archive,
            cipher,
            make_cloud_transport,
            make_hardware_link,
            gpio: Box::new(SysfsGpio::new()),
        },
    );

    let (interrupt_tx, interrupt_rx) = crossbeam_channel::bounded(1);
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.try_send(());
    })
    .expect("failed to install interrupt handler");

    let _ = interrupt_rx.recv();
    info!("interrupt received, shutting down");
    gateway.shutdown();
    Ok(())
}

#[cfg(feature = "mqtt")]
fn cloud_transport_factory(config: &GatewayConfig) -> Result<CloudTransportFactory, GatewayError> {
    use homelink_common::CloudTransport;
    use homelink_gateway::MqttTransport;
    use std::sync::atomic::{AtomicU64, Ordering};

    let cloud = config.cloud.clone();
    let session_counter = Arc::new(AtomicU64::new(0));
    Ok(Box::new(move || {
        let session = session_counter.fetch_add(1, Ordering::Relaxed);
        let name = format!("homelink-{session}");
        Box::new(MqttTransport::from_config(&cloud, &name)) as Box<dyn CloudTransport>
    }))
}

#[cfg(not(feature = "mqtt"))]
fn cloud_transport_factory(_config: &GatewayConfig) -> Result<CloudTransportFactory, GatewayError> {
    use homelink_common::TransportError;

    Err(GatewayError::Connection(TransportError::Connection(
        "built without mqtt support".to_string(),
    )))
}
