mod helpers;

mod auth;
mod gate;
mod refresh;
mod wizard_flow;
