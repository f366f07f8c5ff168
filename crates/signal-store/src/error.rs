use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
	#[error("Item already exists: {0}")]
	DuplicateItem(String),

	#[error("Item not found: {0}")]
	MissingItem(String),

	#[error("Invalid signal path: {0}")]
	InvalidPath(String),
}
