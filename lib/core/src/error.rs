use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal run errors.
///
/// Per-product problems (unusable rerank text, embedding-service failures)
/// are absorbed into the affected outcome's reason trail and never surface
/// here; only input errors abort a run before per-product work begins.
#[derive(Error, Debug)]
pub enum Error {
    #[error("category corpus is empty: at least one category path is required")]
    EmptyCategoryCorpus,
}
