use dictionary_core::manifest::ResolvedLoggingConfig;
use log::LevelFilter;

/// Build the `fern` dispatch used inside the Worker, writing formatted records to `output`.
pub fn build_dispatch(level: LevelFilter, output: fern::Output) -> fern::Dispatch {
    fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {}: {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(output)
}

/// Install the global logger. Fails if a logger is already installed in this isolate.
pub fn init_logger(config: &ResolvedLoggingConfig) -> Result<(), log::SetLoggerError> {
    let level = if config.echo_stdout {
        LevelFilter::from(config.level)
    } else {
        LevelFilter::Off
    };
    build_dispatch(level, console_output()).apply()?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
fn console_output() -> fern::Output {
    fern::Output::call(|record| worker::console_log!("{}", record.args()))
}

#[cfg(not(all(feature = "cloudflare", target_arch = "wasm32")))]
fn console_output() -> fern::Output {
    std::io::stderr().into()
}
