pub mod archive;
pub mod pitfall;

pub use archive::{ArchiveEntry, ArchiveItem, ArchiveMonth, ArchiveYear, build_archive, parse_timestamp};
pub use pitfall::{PatternError, PitfallExtractor, PitfallSections, Section, SectionPattern};
