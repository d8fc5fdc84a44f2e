pub mod file;
pub mod profile;

pub use file::AudioFile;
pub use profile::AudioProfile;
