//! Embedded media handling.
//!
//! Only `data:` URLs can be embedded deterministically; anything else
//! (remote URLs, malformed payloads) degrades to the layout's
//! placeholder fill at the call site.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// A decoded image ready to become a `ppt/media/` part.
pub(crate) struct MediaAsset {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Decode a `data:image/...;base64,` URL into media bytes.
///
/// Returns `None` for non-data URLs and undecodable payloads.
pub(crate) fn decode_data_url(url: &str) -> Option<MediaAsset> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;

    let extension = match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpeg",
        "image/gif" => "gif",
        other if other.starts_with("image/") => "png",
        _ => return None,
    };

    match STANDARD.decode(payload) {
        Ok(bytes) if !bytes.is_empty() => Some(MediaAsset { bytes, extension }),
        Ok(_) => None,
        Err(err) => {
            log::warn!("Undecodable embedded image payload: {err}");
            None
        }
    }
}
