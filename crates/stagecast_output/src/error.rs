use stagecast_core::error::{CoreError, Domain, ErrorKind, Severity};
use tokio::runtime::Handle;

pub fn log_core_error(err: CoreError) {
    match err.severity {
        Severity::Trace => tracing::trace!("{err}"),
        Severity::Debug => tracing::debug!("{err}"),
        Severity::Info => tracing::info!("{err}"),
        Severity::Warn => tracing::warn!("{err}"),
        Severity::Error | Severity::Fatal => tracing::error!("{err}"),
    }
}

/// Handle of the tokio runtime the caller is running in.
pub(crate) fn current_runtime(domain: Domain) -> Result<Handle, CoreError> {
    Handle::try_current().map_err(|e| {
        CoreError::error()
            .domain(domain)
            .kind(ErrorKind::NotSupported)
            .msgf(format_args!("a tokio runtime is required: {e}"))
            .build()
    })
}
