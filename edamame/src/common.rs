pub use log::{debug, info, warn};

pub type Mat = nalgebra::DMatrix<f64>;

pub use netpres::common::Stat;
pub use netpres::CancelToken;

pub fn init_logger(verbose: bool) {
    if verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
}

/// Ctrl-C raises the returned token instead of killing the process
pub fn interrupt_on_ctrlc() -> anyhow::Result<CancelToken> {
    let token = CancelToken::new();
    {
        let token = token.clone();
        ctrlc::set_handler(move || {
            info!("Interrupt received: stopping early and keeping what has been computed");
            token.cancel();
        })
        .map_err(|e| anyhow::anyhow!("failed to set signal handler: {}", e))?;
    }
    Ok(token)
}
