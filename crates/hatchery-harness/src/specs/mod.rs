//! Checks applied to a generated project tree.

pub mod ci;
pub mod filesystem;
pub mod makefile;
pub mod requirements;

pub use ci::CiConfigSpec;
pub use filesystem::FileSystemSpec;
pub use makefile::MakefileSpec;
pub use requirements::RequirementsSpec;
