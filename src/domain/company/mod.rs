//! Company aggregate

pub mod model;
pub mod repository;

pub use model::{Company, CompanyCode, COMPANY_CODE_LEN};
pub use repository::CompanyRepository;
