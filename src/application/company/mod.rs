//! Company membership use-cases

pub mod service;

pub use service::{CompanyService, EmployeeHours};
