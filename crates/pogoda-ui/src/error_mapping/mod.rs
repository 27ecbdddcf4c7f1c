//! Maps UI service errors to pogoda_core::AppError for consistent user-facing messages.

mod weather;
