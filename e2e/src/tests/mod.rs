mod auth;
mod utils;
