use super::client::HttpClient;
use anyhow::{Result, bail};
use std::time::Duration;

pub struct BasicClient(reqwest::blocking::Client);

impl BasicClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self(client))
    }
}

impl HttpClient for BasicClient {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.0.get(url).send()?;

        // An error page cached to disk would be reused forever
        if !resp.status().is_success() {
            let status = resp.status();
            bail!("GET {url} returned status {status}");
        }

        Ok(resp.bytes()?.to_vec())
    }
}
