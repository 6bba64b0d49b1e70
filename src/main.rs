use std::process;
use std::sync::Arc;

use log::{error, info};

use upload_queue::app::{cli, logging};
use upload_queue::{HttpTransport, UploadStore, UploaderConfig};

fn main() {
    logging::init();

    let config = match UploaderConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };
    let transport = match HttpTransport::new(&config) {
        Ok(transport) => transport,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };
    info!(
        "Uploading to {} with up to {} concurrent transfers.",
        transport.endpoint(),
        config.concurrency
    );

    let store = UploadStore::new(&config, Arc::new(transport));
    if let Err(e) = cli::run_cli(&store) {
        error!("Terminal error: {}", e);
        process::exit(1);
    }
}
