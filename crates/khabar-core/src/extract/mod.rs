pub mod entities;
pub mod lexicon;

pub use entities::EntityExtractor;
pub use lexicon::Lexicon;
