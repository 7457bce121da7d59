use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Missing configuration: {0}")]
    MissingConfig(String),
}
