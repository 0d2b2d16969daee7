pub mod libraries;

pub use libraries::InMemoryLibraryRepository;
