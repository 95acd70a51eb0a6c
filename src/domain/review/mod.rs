pub mod entity;
pub mod errors;
pub mod mapper;
pub mod status;
pub mod store;
pub mod validator;
