pub mod dto;
pub mod hooks;
pub mod use_case;
