mod app;
mod capture;
mod dom;
mod gallery;
mod geometry;
mod net;
mod render;
mod session;
mod smooth;
mod state;

pub use app::run;
