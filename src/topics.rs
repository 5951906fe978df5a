//! Topic name validation for outgoing publishes
//!
//! MQTT topic names used for PUBLISH must be non-empty UTF-8 strings of at
//! most 65 535 bytes and may not contain the `+`/`#` wildcards or NUL.
//! Slashes are significant, so topics are never rewritten.

use thiserror::Error;

/// Maximum encoded length of an MQTT topic name
pub const MAX_TOPIC_LEN: usize = 65_535;

pub fn validate_publish_topic(topic: &str) -> Result<(), TopicError> {
    if topic.is_empty() {
        return Err(TopicError::Empty);
    }

    if topic.len() > MAX_TOPIC_LEN {
        return Err(TopicError::TooLong(topic.len()));
    }

    for ch in topic.chars() {
        match ch {
            '+' | '#' => return Err(TopicError::Wildcard(ch)),
            '\0' => return Err(TopicError::NulCharacter),
            _ => {}
        }
    }

    Ok(())
}

/// Topic validation errors
#[derive(Debug, Error, PartialEq)]
pub enum TopicError {
    #[error("Topic cannot be empty")]
    Empty,
    #[error("Topic is {0} bytes long, the maximum is 65535")]
    TooLong(usize),
    #[error("Topic contains wildcard '{0}', which is only valid in subscriptions")]
    Wildcard(char),
    #[error("Topic contains a NUL character")]
    NulCharacter,
}
