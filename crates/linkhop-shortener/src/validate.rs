use crate::error::UrlError;
use url::Url;

/// Longest raw input accepted, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// Validates a user supplied destination and returns its normalized form.
///
/// The input must parse as an absolute URL with an `http` or `https` scheme.
/// The length bound applies to the raw input, not the normalized output.
pub fn validate_long_url(input: &str) -> Result<String, UrlError> {
    let url = Url::parse(input).map_err(|_| UrlError::Malformed)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::UnsupportedScheme);
    }

    if input.chars().count() > MAX_URL_LENGTH {
        return Err(UrlError::TooLong);
    }

    Ok(url.into())
}
