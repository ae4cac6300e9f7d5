use std::sync::Once;

const DEFAULT_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Installs the env_logger backend once per process.
///
/// An explicit `filter` wins over `RUST_LOG`; without either, `info` and
/// above are shown. Later calls are ignored.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = match filter {
            Some(filter) => {
                let mut builder = env_logger::Builder::new();
                builder.parse_filters(filter);
                builder
            }
            None => env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(DEFAULT_FILTER),
            ),
        };
        // wgpu is chatty at info
        if filter.is_none() && std::env::var_os("RUST_LOG").is_none() {
            builder.filter_module("wgpu_core", log::LevelFilter::Warn);
            builder.filter_module("wgpu_hal", log::LevelFilter::Warn);
        }
        builder.format_timestamp_millis();

        if let Err(err) = builder.try_init() {
            eprintln!("logger already initialised: {err}");
        }
    });
}
