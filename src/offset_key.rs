use thiserror::Error;

/// Separator between the block, decorator, and leaf segments of a compound
/// offset key.
const SEGMENT_SEPARATOR: char = '-';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OffsetKeyError {
    #[error("malformed offset key '{raw}': expected block-decorator-leaf")]
    Malformed { raw: String },
}

/// Address of one decorated leaf of text: which block it sits in, which
/// decorator recognized it, and which leaf of that decorator it is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OffsetKey {
    pub block_key: String,
    pub decorator_key: String,
    pub leaf_key: String,
}

impl OffsetKey {
    pub fn new(
        block_key: impl Into<String>,
        decorator_key: impl Into<String>,
        leaf_key: impl Into<String>,
    ) -> Self {
        Self {
            block_key: block_key.into(),
            decorator_key: decorator_key.into(),
            leaf_key: leaf_key.into(),
        }
    }

    /// Decodes a compound key of exactly three separator-joined segments.
    pub fn decode(raw: &str) -> Result<Self, OffsetKeyError> {
        let mut segments = raw.split(SEGMENT_SEPARATOR);
        match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(block), Some(decorator), Some(leaf), None) => {
                Ok(Self::new(block, decorator, leaf))
            }
            _ => Err(OffsetKeyError::Malformed {
                raw: raw.to_string(),
            }),
        }
    }

    /// Compound form of the key, the inverse of [`OffsetKey::decode`].
    pub fn encode(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.block_key,
            self.decorator_key,
            self.leaf_key,
            sep = SEGMENT_SEPARATOR
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_three_segments() {
        let key = OffsetKey::decode("b1-d2-l3").unwrap();
        assert_eq!(key.block_key, "b1");
        assert_eq!(key.decorator_key, "d2");
        assert_eq!(key.leaf_key, "l3");
    }

    #[test]
    fn rejects_too_few_segments() {
        assert!(matches!(
            OffsetKey::decode("bad"),
            Err(OffsetKeyError::Malformed { .. })
        ));
        assert!(matches!(
            OffsetKey::decode("b1-d2"),
            Err(OffsetKeyError::Malformed { .. })
        ));
    }

    #[test]
    fn rejects_extra_segments() {
        assert!(matches!(
            OffsetKey::decode("b1-d2-l3-x4"),
            Err(OffsetKeyError::Malformed { .. })
        ));
    }

    #[test]
    fn encode_round_trips() {
        let key = OffsetKey::new("b1", "0", "0");
        assert_eq!(OffsetKey::decode(&key.encode()).unwrap(), key);
    }

    #[test]
    fn empty_segments_still_decode() {
        // "a--b" has three segments, the middle one empty
        let key = OffsetKey::decode("a--b").unwrap();
        assert_eq!(key.decorator_key, "");
    }
}
