use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dlt645_frame::{FrameConfig, FrameError, FrameReader};
use tracing::{debug, warn};

use crate::cmd::MonitorArgs;
use crate::exit::{frame_error, transport_error, CliError, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let serial = args.serial.to_config()?;
    let stream =
        dlt645_transport::open(&serial).map_err(|err| transport_error("open failed", err))?;
    let config = FrameConfig {
        version: args.serial.protocol,
        ..FrameConfig::default()
    };
    let mut reader = FrameReader::with_config(stream, config);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;
    while running.load(Ordering::SeqCst) {
        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(FrameError::Timeout) => {
                debug!("bus idle");
                continue;
            }
            Err(err @ (FrameError::Structure { .. } | FrameError::Checksum { .. })) => {
                warn!(error = %err, "dropping corrupt frame");
                continue;
            }
            Err(err) => return Err(frame_error("receive failed", err)),
        };

        print_frame(&frame, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
