use std::fmt::{Display, Formatter};
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::ValidationError;

/// Digest algorithms offered by the hash capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    #[default]
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            other => Err(ValidationError::UnsupportedAlgorithm {
                value: other.to_owned(),
            }),
        }
    }
}

/// Lower-case hex digest of the UTF-8 bytes of `text`.
pub fn digest(text: &str, algorithm: HashAlgorithm) -> String {
    let bytes = text.as_bytes();
    match algorithm {
        HashAlgorithm::Md5 => hex::encode(Md5::digest(bytes)),
        HashAlgorithm::Sha1 => hex::encode(Sha1::digest(bytes)),
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(bytes)),
        HashAlgorithm::Sha512 => hex::encode(Sha512::digest(bytes)),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Base64Mode {
    #[default]
    Encode,
    Decode,
}

impl Base64Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encode => "encode",
            Self::Decode => "decode",
        }
    }
}

impl FromStr for Base64Mode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "encode" => Ok(Self::Encode),
            "decode" => Ok(Self::Decode),
            other => Err(ValidationError::InvalidBase64Mode {
                value: other.to_owned(),
            }),
        }
    }
}

/// Encodes text to standard base64, or decodes base64 back to UTF-8 text.
pub fn base64_transform(text: &str, mode: Base64Mode) -> Result<String, ValidationError> {
    match mode {
        Base64Mode::Encode => Ok(STANDARD.encode(text.as_bytes())),
        Base64Mode::Decode => {
            let bytes = STANDARD
                .decode(text.trim())
                .map_err(|_| ValidationError::InvalidBase64)?;
            String::from_utf8(bytes).map_err(|_| ValidationError::InvalidBase64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digests() {
        assert_eq!(digest("hello", HashAlgorithm::Md5), "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(
            digest("hello", HashAlgorithm::Sha1),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
        assert_eq!(digest("hello", HashAlgorithm::Sha512).len(), 128);
    }

    #[test]
    fn algorithm_names_are_case_sensitive() {
        assert_eq!("sha256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert!("SHA256".parse::<HashAlgorithm>().is_err());
        assert!("crc32".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn decode_rejects_garbage_and_non_utf8() {
        assert_eq!(base64_transform("aGVsbG8=", Base64Mode::Decode), Ok(String::from("hello")));
        assert_eq!(base64_transform("@@not base64@@", Base64Mode::Decode), Err(ValidationError::InvalidBase64));
        assert_eq!(base64_transform("/w==", Base64Mode::Decode), Err(ValidationError::InvalidBase64));
    }
}
