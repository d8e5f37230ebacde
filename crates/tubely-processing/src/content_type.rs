//! Declared content types of multipart parts

use tubely_core::AppError;

/// A `type/subtype` pair with any parameters stripped, lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    pub type_: String,
    pub subtype: String,
}

impl MediaType {
    /// Parse a header value such as `video/mp4; codecs="avc1"`.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        let (type_, subtype) = essence
            .split_once('/')
            .ok_or_else(|| AppError::BadRequest(format!("Invalid Content-Type: {}", value)))?;

        let valid = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c))
        };
        if !valid(type_) || !valid(subtype) {
            return Err(AppError::BadRequest(format!(
                "Invalid Content-Type: {}",
                value
            )));
        }

        Ok(Self {
            type_: type_.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
        })
    }

    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    /// File extension for an `image/*` type, taken from the subtype.
    pub fn image_extension(&self) -> Option<&str> {
        if self.type_ == "image" && !self.subtype.starts_with('.') && !self.subtype.contains("..")
        {
            Some(&self.subtype)
        } else {
            None
        }
    }
}
