//! Discord CDN URL helpers.

/// Checks if a URL is a Discord CDN URL.
#[must_use]
pub fn is_discord_cdn_url(url: &str) -> bool {
    url.contains("cdn.discordapp.com") || url.contains("media.discordapp.net")
}

/// Splits a URL into its path part and optional query string.
fn split_query(url: &str) -> (&str, Option<&str>) {
    match url.find('?') {
        Some(idx) => (&url[..idx], Some(&url[idx + 1..])),
        None => (url, None),
    }
}

/// Rewrites an avatar URL to request a static PNG at `size` pixels.
///
/// WebP avatars are swapped to PNG since not every decoder build handles
/// animated WebP. Non-Discord URLs are returned unchanged.
#[must_use]
pub fn static_avatar_url(url: &str, size: u32) -> String {
    if !is_discord_cdn_url(url) {
        return url.to_string();
    }

    let (path, existing) = split_query(url);
    let path = path
        .strip_suffix(".webp")
        .map_or_else(|| path.to_string(), |base| format!("{base}.png"));

    let mut params = vec![format!("size={}", discord_size_bucket(size))];
    if let Some(existing) = existing {
        for param in existing.split('&') {
            let key = param.split('=').next().unwrap_or("");
            if !key.is_empty() && !["size", "format"].contains(&key) {
                params.push(param.to_string());
            }
        }
    }

    format!("{}?{}", path, params.join("&"))
}

/// Smallest power of two the CDN accepts that covers `size`.
fn discord_size_bucket(size: u32) -> u32 {
    size.clamp(16, 4096).next_power_of_two()
}
