use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{RedpaperError, Result};

const REDDIT_BASE_URL: &str = "http://www.reddit.com";

// Reddit rejects the stock client user agent with 429s.
const APP_USER_AGENT: &str = concat!("redpaper/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize, Deserialize, Debug)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ListingData {
    pub children: Vec<Post>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Post {
    pub data: PostData,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct PostData {
    pub url: String,
}

/// One GET against the subreddit's listing endpoint.
pub async fn fetch_listing(client: &Client, subreddit: &str) -> Result<Listing> {
    let url = format!("{}/r/{}/.json", REDDIT_BASE_URL, subreddit);
    let fetch_err = |message: String| RedpaperError::Fetch {
        url: url.clone(),
        message,
    };

    let response = client
        .get(&url)
        .header(USER_AGENT, APP_USER_AGENT)
        .send()
        .await
        .map_err(|err| fetch_err(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(fetch_err(format!("server answered {}", status)));
    }
    let body = response
        .text()
        .await
        .map_err(|err| fetch_err(err.to_string()))?;
    let listing = serde_json::from_str(&body)
        .map_err(|err| fetch_err(format!("unexpected listing shape: {}", err)))?;
    Ok(listing)
}

/// Every child entry's url, filtered down to direct jpg links.
pub fn image_links(listing: &Listing) -> Vec<String> {
    listing
        .data
        .children
        .iter()
        .map(|post| post.data.url.as_str())
        .filter(|url| is_jpg_link(url))
        .map(str::to_string)
        .collect()
}

// Links whose path doesn't end in .jpg usually lead to an HTML page rather
// than an image, so they are dropped outright.
fn is_jpg_link(url: &str) -> bool {
    let path = url
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".jpg")
}
