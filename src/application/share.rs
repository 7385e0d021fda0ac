//! Share links: a whole post carried as base64-encoded JSON in a URL query
//! parameter, readable without touching the post store.

use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::STANDARD},
};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::domain::posts::Post;

/// Query parameter holding the encoded post.
pub const SHARE_PARAM: &str = "post";

/// Standard alphabet that tolerates payloads whose padding was stripped in transit.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("share payload is not a valid post: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of reading a location that may carry a shared post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SharedLink {
    /// The location has no share parameter.
    #[default]
    Absent,
    Post(Box<Post>),
    /// A share parameter was present but could not be decoded.
    Invalid,
}

impl SharedLink {
    pub fn post(&self) -> Option<&Post> {
        match self {
            SharedLink::Post(post) => Some(post),
            SharedLink::Absent | SharedLink::Invalid => None,
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, SharedLink::Absent)
    }
}

pub fn encode(post: &Post) -> String {
    let serialized = serde_json::to_vec(post).expect("serializing a post should succeed");
    STANDARD.encode(serialized)
}

pub fn decode(payload: &str) -> Result<Post, ShareError> {
    let bytes = LENIENT_STANDARD.decode(payload.trim())?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// `base` with the share parameter set to the encoded post, replacing any
/// previous share parameter.
pub fn share_url(base: &Url, post: &Post) -> Url {
    let mut url = base.clone();
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != SHARE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(SHARE_PARAM, &encode(post));
    url
}

/// Raw share parameter of `url`, if any.
pub fn payload_from_url(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == SHARE_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Decode the post carried by `url`; decode failures degrade to
/// [`SharedLink::Invalid`] instead of an error.
pub fn resolve(url: &Url) -> SharedLink {
    let Some(payload) = payload_from_url(url) else {
        return SharedLink::Absent;
    };

    match decode(&payload) {
        Ok(post) => SharedLink::Post(Box::new(post)),
        Err(err) => {
            warn!(error = %err, payload_len = payload.len(), "ignoring invalid share link");
            SharedLink::Invalid
        }
    }
}
