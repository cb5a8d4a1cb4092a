pub mod models;

pub mod services;

pub use services::academic_service::{AcademicService, AcademicServiceImpl};
pub use services::ml_service::{MlService, MlServiceImpl};
pub use services::user_service::{UserService, UserServiceImpl};
