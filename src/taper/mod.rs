pub mod taper_resampler;
pub use taper_resampler::*;

#[cfg(test)]
mod tests;
