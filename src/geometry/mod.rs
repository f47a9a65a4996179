pub mod layout;
pub mod mapper;
pub mod scaler;
