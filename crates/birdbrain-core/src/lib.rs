pub mod agent;
pub mod config;
pub mod course;
pub mod nn;
pub mod render;
pub mod world;
