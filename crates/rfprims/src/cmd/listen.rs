use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rfprims_frame::Frame;
use rfprims_link::{Coordinator, LinkObserver};
use rfprims_serial::{TransportError, TtyLink};

use crate::cmd::ListenArgs;
use crate::exit::{
    link_error, transport_error, CliError, CliResult, SUCCESS, TRANSPORT_ERROR,
};
use crate::output::{hex_string, print_frame, OutputFormat};

struct PrintObserver {
    format: OutputFormat,
    show_dropped: bool,
    received: AtomicUsize,
    faulted: AtomicBool,
}

impl LinkObserver for PrintObserver {
    fn frame_received(&self, frame: &Frame) {
        print_frame(frame, self.format);
        self.received.fetch_add(1, Ordering::SeqCst);
    }

    fn frame_dropped(&self, raw: &[u8]) {
        if self.show_dropped {
            eprintln!("dropped (bad checksum): {}", hex_string(raw));
        }
    }

    fn link_fault(&self, error: &TransportError) {
        tracing::error!("link fault: {error}");
        self.faulted.store(true, Ordering::SeqCst);
    }
}

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let link = TtyLink::open(&args.device, args.baud)
        .map_err(|err| transport_error("open failed", err))?;
    let coordinator =
        Coordinator::new(Box::new(link)).map_err(|err| link_error("link setup failed", err))?;

    let observer = Arc::new(PrintObserver {
        format,
        show_dropped: args.show_dropped,
        received: AtomicUsize::new(0),
        faulted: AtomicBool::new(false),
    });
    coordinator.add_observer(observer.clone());
    coordinator.start_listen();

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    while running.load(Ordering::SeqCst) {
        if observer.faulted.load(Ordering::SeqCst) {
            return Err(CliError::new(
                TRANSPORT_ERROR,
                "link fault, receive path stopped",
            ));
        }
        if let Some(count) = args.count {
            if observer.received.load(Ordering::SeqCst) >= count {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(25));
    }

    coordinator.close();
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
