pub mod account;
pub mod oauth;
pub mod token;
pub mod user;
pub mod web;
