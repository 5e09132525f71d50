//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log diff operations.
//! Field keys and event names come from `casdiff_core_types::schema`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use casdiff_core::log_op_start;
/// log_op_start!("compute_diff");
/// log_op_start!("compute_diff", party_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::casdiff_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::casdiff_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use casdiff_core::log_op_end;
/// log_op_end!("compute_diff", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::casdiff_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::casdiff_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted into an [`ExError`](crate::errors::ExError) so the
/// event carries the stable error code, plus the layer and party the error
/// names (empty when it names none).
///
/// # Example
///
/// ```
/// # use casdiff_core::{log_op_error, errors::CasDiffError};
/// let err = CasDiffError::InvalidScope { begin: 5, end: 1 };
/// log_op_error!("compute_diff", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::casdiff_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_layer = ex_err.layer().unwrap_or_default(),
            err_party = ex_err.party().unwrap_or_default(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::casdiff_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_layer = ex_err.layer().unwrap_or_default(),
            err_party = ex_err.party().unwrap_or_default(),
            $($field)*
        );
    }};
}
