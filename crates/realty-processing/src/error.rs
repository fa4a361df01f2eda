/// Failures raised while optimizing an image. Both are caused by the input and
/// retrying with the same bytes will not help.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("unable to decode image: {0}")]
    Decode(String),

    #[error("unable to encode {encoding}: {reason}")]
    Encode {
        encoding: &'static str,
        reason: String,
    },
}
