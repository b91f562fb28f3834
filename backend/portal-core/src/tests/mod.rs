mod config;
mod requirements;
mod session;
mod validation;
mod wizard;
