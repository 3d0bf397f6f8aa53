pub type CueburnResult<T> = Result<T, CueburnError>;

#[derive(thiserror::Error, Debug)]
pub enum CueburnError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("subtitle parse error: {0}")]
    Parse(String),

    #[error("segmentation error: {0}")]
    Segmentation(String),

    /// The token stream was empty but the caller required cues.
    #[error("segmentation produced no cues: {0}")]
    SegmentationEmpty(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("probe error: {0}")]
    Probe(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CueburnError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn segmentation(msg: impl Into<String>) -> Self {
        Self::Segmentation(msg.into())
    }

    pub fn segmentation_empty(msg: impl Into<String>) -> Self {
        Self::SegmentationEmpty(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            CueburnError::parse("x")
                .to_string()
                .contains("subtitle parse error:")
        );
        assert!(
            CueburnError::segmentation("x")
                .to_string()
                .contains("segmentation error:")
        );
        assert!(
            CueburnError::render("x")
                .to_string()
                .contains("render error:")
        );
        assert!(
            CueburnError::probe("x")
                .to_string()
                .contains("probe error:")
        );
        assert!(
            CueburnError::encode("x")
                .to_string()
                .contains("encode error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = CueburnError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
