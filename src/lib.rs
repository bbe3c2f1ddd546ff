pub mod app;

pub use app::{
    apply_order, inspect, reset_order, ApplyReport, AppError, InspectReport, ProtectedSet, Result,
};
