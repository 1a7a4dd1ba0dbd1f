use std::io;

use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

#[derive(Debug, thiserror::Error)]
pub enum ObsInitError {
    #[error("tracing subscriber already initialized")]
    AlreadyInitialized,
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize logging for a binary.
pub struct ObsInit;

impl ObsInit {
    /// Install a global JSON subscriber writing to stderr.
    ///
    /// Events emitted inside [`service_span`] carry the service name.
    pub fn init(service: &str) -> Result<(), ObsInitError> {
        let subscriber = Self::subscriber_with_writer(default_filter(), io::stderr);
        tracing::subscriber::set_global_default(subscriber).map_err(|err| {
            if tracing::dispatcher::has_been_set() {
                ObsInitError::AlreadyInitialized
            } else {
                ObsInitError::Install(err)
            }
        })?;
        tracing::debug!(service, "logging initialized");
        Ok(())
    }

    /// Build a JSON subscriber with the given filter and writer.
    pub fn subscriber_with_writer<W>(
        filter: EnvFilter,
        writer: W,
    ) -> impl tracing::Subscriber + Send + Sync
    where
        W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
    {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_ansi(false)
            .with_writer(writer);

        Registry::default().with(filter).with(fmt_layer)
    }
}

/// Root span tagging every event with the service name.
pub fn service_span(service: &str) -> tracing::Span {
    tracing::info_span!("service", service)
}

/// `RUST_LOG` if set, otherwise `LOG_LEVEL`, otherwise `debug` in debug
/// builds and `info` in release builds.
pub fn default_filter() -> EnvFilter {
    let env_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug".to_string()
        } else {
            "info".to_string()
        }
    });
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(env_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
