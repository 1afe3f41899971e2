//! Canonical logging macros
//!
//! Every facade operation emits exactly one start event and one end (or
//! end_error) event through these macros.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use resident_core::log_op_start;
/// log_op_start!("get_valid_document_by_lang_code");
/// log_op_start!("get_valid_document_by_lang_code", request_id = "r-1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::resident_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::resident_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use resident_core::log_op_end;
/// log_op_end!("get_latest_id_schema", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::resident_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::resident_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation that ended in a [`ResidentError`](crate::errors::ResidentError)
///
/// Only kind and code are logged; metadata goes through the failure audit.
///
/// # Example
///
/// ```
/// # use resident_core::log_op_error;
/// use resident_core::errors::{ErrorCatalog, ErrorKind, ResidentError};
///
/// let catalog = ErrorCatalog::standard();
/// let err = ResidentError::new(&catalog, ErrorKind::DataNotFound);
/// log_op_error!("get_location_details", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let resident_err: &$crate::errors::ResidentError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::resident_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = resident_err.kind().name(),
            err.code = resident_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let resident_err: &$crate::errors::ResidentError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::resident_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = resident_err.kind().name(),
            err.code = resident_err.code(),
            $($field)*
        );
    }};
}
