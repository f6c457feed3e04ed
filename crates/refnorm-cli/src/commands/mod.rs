pub mod familiar;
pub mod normalize;
pub mod serve;
pub mod show_config;
