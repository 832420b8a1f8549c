mod clip;
mod mocks;
mod transform;
