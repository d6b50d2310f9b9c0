pub mod directory;

pub use directory::{HttpDirectory, SeedDirectory, Student, StudentDirectory};
