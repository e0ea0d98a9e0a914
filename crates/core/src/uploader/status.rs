//! Reading the upload verdict out of ruTorrent's redirect target.

use reqwest::Url;

use super::{UploadError, UploadStatus};

const RESULT_KEY: &str = "result[]";

/// Extract the first `result[]` query value of the final response URL.
pub fn parse_result_token(url: &Url) -> Result<UploadStatus, UploadError> {
    url.query_pairs()
        .find(|(key, _)| key == RESULT_KEY)
        .map(|(_, value)| UploadStatus::new(value.into_owned()))
        .ok_or_else(|| UploadError::MissingResultToken(url.to_string()))
}

/// `parse_result_token` for a URL string.
pub fn parse_result_url(url: &str) -> Result<UploadStatus, UploadError> {
    let url = Url::parse(url)
        .map_err(|e| UploadError::Unexpected(format!("Invalid response URL {:?}: {}", url, e)))?;
    parse_result_token(&url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_token() {
        let status = parse_result_url("https://example.com?result[]=Success").unwrap();
        assert!(status.is_success());
        assert_eq!(status.token(), "Success");
    }

    #[test]
    fn test_failure_token() {
        let status = parse_result_url("https://example.com/addtorrent.php?result[]=Failure").unwrap();
        assert!(!status.is_success());
        assert_eq!(status.to_string(), "Failure");
    }

    #[test]
    fn test_first_token_wins() {
        let status = parse_result_url("https://example.com?result[]=Success&result[]=baz").unwrap();
        assert_eq!(status.token(), "Success");
    }

    #[test]
    fn test_percent_encoded_key() {
        let status = parse_result_url("https://example.com?x=1&result%5B%5D=success").unwrap();
        assert!(status.is_success());
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let result = parse_result_url("https://example.com");
        assert!(matches!(result, Err(UploadError::MissingResultToken(_))));

        let result = parse_result_url("https://example.com?result=Success");
        assert!(matches!(result, Err(UploadError::MissingResultToken(_))));
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            parse_result_url("not a url"),
            Err(UploadError::Unexpected(_))
        ));
    }
}
