pub mod errors;
pub mod db;
pub mod user;
pub mod company;
pub mod service;
pub mod company_service;
pub mod booking;
pub mod booking_service;
