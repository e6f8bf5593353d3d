use anyhow::Result;

/// Blocking HTTP GET returning the full response body.
pub trait HttpClient {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
